#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use urania::ephemeris::{BodyCalc, BodyId, CalcFlags, EphemerisService, HouseCalc, HouseSystem};

/// In-memory ephemeris with predictable, scriptable answers.
#[derive(Default)]
pub struct ScriptedEphemeris {
    /// Status override per body id; otherwise the requested flags echo back
    pub statuses: HashMap<i32, i32>,
    /// Speed override per body id; otherwise 1.0
    pub speeds: HashMap<i32, f64>,
    pub names: HashMap<i32, String>,
    pub house_codes: Mutex<Vec<u8>>,
}

impl ScriptedEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, body: BodyId, status: i32) -> Self {
        self.statuses.insert(body.code(), status);
        self
    }

    pub fn with_speed(mut self, body: BodyId, speed: f64) -> Self {
        self.speeds.insert(body.code(), speed);
        self
    }

    pub fn with_name(mut self, body: BodyId, name: &str) -> Self {
        self.names.insert(body.code(), name.to_string());
        self
    }

    pub fn longitude_of(jd: f64, body: BodyId) -> f64 {
        ((jd - 2451545.0) * 0.9856 + body.code() as f64 * 30.0 + 0.123456).rem_euclid(360.0)
    }
}

impl EphemerisService for ScriptedEphemeris {
    /// Meeus' Gregorian Julian Day.
    fn julian_day(&self, year: i32, month: i32, day: i32, hour: f64) -> f64 {
        let (y, m) = if month <= 2 {
            (year - 1, month + 12)
        } else {
            (year, month)
        };
        let a = (y as f64 / 100.0).floor();
        let b = 2.0 - a + (a / 4.0).floor();
        (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor()
            + day as f64
            + b
            - 1524.5
            + hour / 24.0
    }

    fn calc_body(&self, jd_ut: f64, body: BodyId, flags: CalcFlags) -> BodyCalc {
        let status = self.statuses.get(&body.code()).copied().unwrap_or(flags.bits());
        BodyCalc {
            status,
            longitude: Self::longitude_of(jd_ut, body),
            speed: self.speeds.get(&body.code()).copied().unwrap_or(1.0),
            message: if status < 0 { "scripted failure".to_string() } else { String::new() },
        }
    }

    fn houses(
        &self,
        _jd_ut: f64,
        _flags: CalcFlags,
        lat: f64,
        lon: f64,
        system: HouseSystem,
    ) -> HouseCalc {
        self.house_codes.lock().unwrap().push(system.code());
        let asc = (100.0 + lon + lat / 10.0).rem_euclid(360.0);
        let mut cusps = [0.0; 13];
        for (i, cusp) in cusps.iter_mut().enumerate().skip(1) {
            *cusp = (asc + (i as f64 - 1.0) * 30.0).rem_euclid(360.0);
        }
        let mut ascmc = [0.0; 10];
        ascmc[0] = asc;
        ascmc[1] = (asc + 270.0).rem_euclid(360.0);
        ascmc[2] = 999.0;
        HouseCalc { cusps, ascmc }
    }

    fn body_name(&self, body: BodyId) -> String {
        self.names
            .get(&body.code())
            .cloned()
            .unwrap_or_else(|| format!("Body {}", body))
    }
}
