use crate::chart::data::{ChartRequest, TimeReference};
use crate::ephemeris::EphemerisService;

/// Convert the request's civil date and time to Julian Day UT.
///
/// Fields are forwarded without range checks; the ephemeris decides what
/// an out-of-range month or day means.
pub fn normalize<S: EphemerisService + ?Sized>(service: &S, request: &ChartRequest) -> TimeReference {
    TimeReference(service.julian_day(
        request.year,
        request.month,
        request.day,
        request.fractional_hour(),
    ))
}
