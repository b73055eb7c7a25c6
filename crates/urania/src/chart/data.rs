use crate::ephemeris::{BodyId, GeoLocation, HouseSystem};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};

/// Everything needed to cast one chart.
///
/// Civil time is taken as already adjusted to UT; no timezone handling
/// happens here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartRequest {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub location: GeoLocation,
    pub house_system: HouseSystem,
}

impl ChartRequest {
    /// Build a request from a civil datetime. Seconds are dropped.
    pub fn from_datetime(
        dt: NaiveDateTime,
        location: GeoLocation,
        house_system: HouseSystem,
    ) -> Self {
        Self {
            year: dt.year(),
            month: dt.month() as i32,
            day: dt.day() as i32,
            hour: dt.hour() as i32,
            minute: dt.minute() as i32,
            location,
            house_system,
        }
    }

    /// `hour + minute / 60`
    pub fn fractional_hour(&self) -> f64 {
        self.hour as f64 + self.minute as f64 / 60.0
    }
}

/// Julian Day UT of the chart moment
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TimeReference(pub f64);

impl TimeReference {
    pub fn jd(self) -> f64 {
        self.0
    }
}

/// A body accepted into the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CelestialBody {
    pub id: BodyId,
    /// Lowercase canonical name
    pub name: String,
    /// Ecliptic longitude in degrees, as wrapped by the ephemeris
    pub longitude: f64,
    /// Speed in longitude (degrees per day)
    pub speed: f64,
    /// `speed < 0`; a stationary body is not retrograde
    pub retrograde: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Angles {
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Twelve cusp longitudes; element 0 is house 1.
///
/// Not guaranteed monotonic, some systems fold near the poles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseCusps(pub [f64; 12]);

impl HouseCusps {
    /// Cusp of a 1-based house number.
    pub fn house(&self, number: usize) -> Option<f64> {
        number.checked_sub(1).and_then(|i| self.0.get(i)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl Serialize for HouseCusps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Structured form of a computed chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResult {
    pub time: TimeReference,
    pub bodies: Vec<CelestialBody>,
    pub angles: Angles,
    pub cusps: HouseCusps,
}
