use crate::ephemeris::service::EphemerisService;
use crate::ephemeris::types::{BodyCalc, BodyId, CalcFlags, HouseCalc, HouseSystem};
use std::env;
use std::path::{Path, PathBuf};
use swisseph::swe::{calc_ut, get_planet_name, houses_ex, julday, set_ephe_path};
use swisseph::{CalcPrimRet, Out};
use thiserror::Error;

/// Errors that can occur while setting up the ephemeris
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Unknown house system: {name}. Valid systems: {valid:?}")]
    UnknownHouseSystem { name: String, valid: Vec<String> },
}

/// GREG_CAL
const GREGORIAN: u32 = 1;

/// Swiss Ephemeris adapter implementation
#[derive(Debug, Clone, Default)]
pub struct SwissEphemerisAdapter {
    ephemeris_path: Option<PathBuf>,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path.
    ///
    /// Without a path (explicit or `SWISS_EPHEMERIS_PATH`) only the built-in
    /// Moshier ephemeris is usable, which is what charts ask for by default.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.or_else(|| env::var("SWISS_EPHEMERIS_PATH").ok().map(PathBuf::from));

        if let Some(path) = &path {
            if !path.exists() {
                return Err(EphemerisError::FileNotFound {
                    path: path.display().to_string(),
                    message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
                });
            }
            set_ephe_path(&path.to_string_lossy());
        }

        Ok(Self {
            ephemeris_path: path,
        })
    }

    /// Adapter that relies on the built-in ephemeris only.
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn ephemeris_path(&self) -> Option<&Path> {
        self.ephemeris_path.as_deref()
    }
}

impl EphemerisService for SwissEphemerisAdapter {
    fn julian_day(&self, year: i32, month: i32, day: i32, hour: f64) -> f64 {
        julday(year, month, day, hour, GREGORIAN)
    }

    fn calc_body(&self, jd_ut: f64, body: BodyId, flags: CalcFlags) -> BodyCalc {
        body_calc(calc_ut(jd_ut, body.code() as u32, flags.bits() as u32))
    }

    fn houses(
        &self,
        jd_ut: f64,
        flags: CalcFlags,
        lat: f64,
        lon: f64,
        system: HouseSystem,
    ) -> HouseCalc {
        let (cusps, ascmc) = houses_ex(jd_ut, flags.bits(), lat, lon, system.code() as i32);
        HouseCalc { cusps, ascmc }
    }

    fn body_name(&self, body: BodyId) -> String {
        get_planet_name(body.code())
    }
}

/// The status is the flag word the library returned, which names the
/// ephemeris it actually used.
fn body_calc(result: Result<Out<CalcPrimRet, i32>, String>) -> BodyCalc {
    match result {
        Ok(result) => BodyCalc {
            status: result.code,
            longitude: result.out[0],
            speed: result.out[3],
            message: String::new(),
        },
        Err(e) => BodyCalc {
            status: -1,
            longitude: 0.0,
            speed: 0.0,
            message: format!("Swiss Ephemeris error: {}", e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_the_returned_flag_word() {
        // Asked for data files, got the Moshier fallback
        let requested = CalcFlags::SWIEPH | CalcFlags::SPEED;
        let calc = body_calc(Ok(Out {
            out: [280.5, 0.0, 0.98, -0.25, 0.0, 0.0],
            code: (CalcFlags::MOSEPH | CalcFlags::SPEED).bits(),
        }));
        assert_eq!(calc.status, 260);
        assert_eq!(calc.status & requested.ephemeris_bits(), 0);
        assert_eq!(calc.longitude, 280.5);
        assert_eq!(calc.speed, -0.25);
    }

    #[test]
    fn test_library_error_is_a_negative_status() {
        let calc = body_calc(Err("no data".to_string()));
        assert_eq!(calc.status, -1);
        assert_eq!(calc.message, "Swiss Ephemeris error: no data");
    }

    #[test]
    fn test_missing_ephemeris_path_is_rejected() {
        let err = SwissEphemerisAdapter::new(Some(PathBuf::from("/nonexistent/urania/ephe")))
            .unwrap_err();
        assert!(matches!(err, EphemerisError::FileNotFound { .. }));
    }

    #[test]
    #[ignore] // Requires the Swiss Ephemeris library
    fn test_julian_day_j2000() {
        let adapter = SwissEphemerisAdapter::builtin();
        assert_eq!(adapter.julian_day(2000, 1, 1, 12.0), 2451545.0);
    }
}
