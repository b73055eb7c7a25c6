use crate::ephemeris::types::{BodyCalc, BodyId, CalcFlags, HouseCalc, HouseSystem};

/// Calendar conversion, body positions, houses and body names.
///
/// Chart computation keeps no state between calls, so charts may be
/// computed from several threads at once as long as the implementation is
/// `Sync` and whatever it wraps tolerates concurrent use. That guarantee
/// belongs to the implementor.
pub trait EphemerisService {
    /// Gregorian calendar date and fractional hour to Julian Day UT.
    fn julian_day(&self, year: i32, month: i32, day: i32, hour: f64) -> f64;

    /// Longitude and speed of one body. The status follows the Swiss
    /// Ephemeris convention: negative on failure, otherwise the flags that
    /// were actually honored.
    fn calc_body(&self, jd_ut: f64, body: BodyId, flags: CalcFlags) -> BodyCalc;

    /// House cusps and chart angles for a location and house system.
    fn houses(
        &self,
        jd_ut: f64,
        flags: CalcFlags,
        lat: f64,
        lon: f64,
        system: HouseSystem,
    ) -> HouseCalc;

    /// Canonical (library-cased) name of a body.
    fn body_name(&self, body: BodyId) -> String;
}
