//! Incremental writer for the chart record.
//!
//! The record is streamed fragment by fragment while bodies and houses are
//! resolved. Numbers are fixed-point with six decimals so output stays
//! byte-compatible with existing consumers of the record.

use crate::chart::data::{Angles, CelestialBody, HouseCusps, TimeReference};
use crate::error::ChartError;
use std::fmt::Write;

const DECIMALS: usize = 6;

/// Streams one chart record into a growable buffer.
pub struct ChartWriter {
    buf: String,
    scratch: String,
    limit: Option<usize>,
    planets: usize,
}

impl ChartWriter {
    /// Start a record with room for `initial_capacity` bytes. The buffer
    /// grows on demand; `limit` caps the finished record size.
    pub fn new(initial_capacity: usize, limit: Option<usize>) -> Result<Self, ChartError> {
        let mut buf = String::new();
        let initial = limit.map_or(initial_capacity, |l| initial_capacity.min(l));
        buf.try_reserve(initial)?;
        Ok(Self {
            buf,
            scratch: String::with_capacity(32),
            limit,
            planets: 0,
        })
    }

    fn push(&mut self, fragment: &str) -> Result<(), ChartError> {
        let needed = self.buf.len() + fragment.len();
        if let Some(limit) = self.limit {
            if needed > limit {
                return Err(ChartError::OutputLimit { limit, needed });
            }
        }
        self.buf.try_reserve(fragment.len())?;
        self.buf.push_str(fragment);
        Ok(())
    }

    fn push_number(&mut self, value: f64) -> Result<(), ChartError> {
        if !value.is_finite() {
            return self.push("null");
        }
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        write!(scratch, "{:.*}", DECIMALS, value)?;
        let res = self.push(&scratch);
        self.scratch = scratch;
        res
    }

    fn push_string(&mut self, value: &str) -> Result<(), ChartError> {
        let quoted = serde_json::to_string(value)?;
        self.push(&quoted)
    }

    /// `{ "jd_ut": J, "planets": [`
    pub fn begin(&mut self, time: TimeReference) -> Result<(), ChartError> {
        self.push("{ \"jd_ut\": ")?;
        self.push_number(time.jd())?;
        self.push(", \"planets\": [")
    }

    pub fn planet(&mut self, body: &CelestialBody) -> Result<(), ChartError> {
        if self.planets > 0 {
            self.push(", ")?;
        }
        self.push("{\"name\": ")?;
        self.push_string(&body.name)?;
        self.push(", \"long\": ")?;
        self.push_number(body.longitude)?;
        self.push(", \"retro\": ")?;
        self.push(if body.retrograde { "true" } else { "false" })?;
        self.push("}")?;
        self.planets += 1;
        Ok(())
    }

    /// Closes the planet list and writes both angles.
    pub fn angles(&mut self, angles: &Angles) -> Result<(), ChartError> {
        self.push("], \"asc\": ")?;
        self.push_number(angles.ascendant)?;
        self.push(", \"mc\": ")?;
        self.push_number(angles.midheaven)?;
        self.push(", ")
    }

    /// Writes the cusp list and closes the record.
    pub fn houses(&mut self, cusps: &HouseCusps) -> Result<(), ChartError> {
        self.push("\"houses\": [")?;
        for (i, cusp) in cusps.iter().enumerate() {
            if i > 0 {
                self.push(", ")?;
            }
            self.push_number(cusp)?;
        }
        self.push("]}")
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::BodyId;

    fn body(name: &str, longitude: f64, retrograde: bool) -> CelestialBody {
        CelestialBody {
            id: BodyId::SUN,
            name: name.to_string(),
            longitude,
            speed: if retrograde { -1.0 } else { 1.0 },
            retrograde,
        }
    }

    fn write_record(bodies: &[CelestialBody]) -> String {
        let mut w = ChartWriter::new(16, None).unwrap();
        w.begin(TimeReference(2451545.0)).unwrap();
        for b in bodies {
            w.planet(b).unwrap();
        }
        w.angles(&Angles { ascendant: 1.5, midheaven: 270.25 }).unwrap();
        let mut cusps = [0.0; 12];
        for (i, c) in cusps.iter_mut().enumerate() {
            *c = i as f64 * 30.0;
        }
        w.houses(&HouseCusps(cusps)).unwrap();
        w.finish()
    }

    #[test]
    fn test_record_layout() {
        let out = write_record(&[body("sun", 280.5, false), body("mercury", 10.0, true)]);
        assert_eq!(
            out,
            "{ \"jd_ut\": 2451545.000000, \"planets\": [\
             {\"name\": \"sun\", \"long\": 280.500000, \"retro\": false}, \
             {\"name\": \"mercury\", \"long\": 10.000000, \"retro\": true}], \
             \"asc\": 1.500000, \"mc\": 270.250000, \
             \"houses\": [0.000000, 30.000000, 60.000000, 90.000000, 120.000000, 150.000000, \
             180.000000, 210.000000, 240.000000, 270.000000, 300.000000, 330.000000]}"
        );
    }

    #[test]
    fn test_empty_planet_list() {
        let out = write_record(&[]);
        assert!(out.contains("\"planets\": [], \"asc\""));
        serde_json::from_str::<serde_json::Value>(&out).unwrap();
    }

    #[test]
    fn test_buffer_grows_past_initial_capacity() {
        let bodies: Vec<_> = (0..50).map(|i| body("pluto", i as f64, false)).collect();
        let out = write_record(&bodies);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["planets"].as_array().unwrap().len(), 50);
    }

    #[test]
    fn test_limit_is_an_error_not_a_truncation() {
        let mut w = ChartWriter::new(1024, Some(20)).unwrap();
        let err = w.begin(TimeReference(2451545.0)).unwrap_err();
        match err {
            ChartError::OutputLimit { limit, needed } => {
                assert_eq!(limit, 20);
                assert!(needed > 20);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_numbers_become_null() {
        let out = write_record(&[body("moon", f64::NAN, false)]);
        assert!(out.contains("\"long\": null"));
        serde_json::from_str::<serde_json::Value>(&out).unwrap();
    }

    #[test]
    fn test_names_are_escaped() {
        let out = write_record(&[body("osc. \"apogee\"", 1.0, false)]);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["planets"][0]["name"], "osc. \"apogee\"");
    }
}
