//! Snapshot chart computation: body longitudes with retrograde state,
//! ascendant, midheaven and house cusps, streamed into a compact JSON
//! record.

pub mod chart;
pub mod coords;
pub mod ephemeris;
pub mod error;

pub use chart::{compute_chart, ChartOptions, ChartOutput, ChartRequest, ChartResult};
pub use ephemeris::{
    BodyId, CalcFlags, EphemerisError, EphemerisService, GeoLocation, HouseSystem,
    SwissEphemerisAdapter,
};
pub use error::{ChartError, OmissionReason, OmittedBody};

/// Compute a chart with the built-in Swiss (Moshier) ephemeris and default
/// options.
pub fn compute_chart_json(request: &ChartRequest) -> Result<ChartOutput, ChartError> {
    let adapter = SwissEphemerisAdapter::builtin();
    compute_chart(&adapter, request, &ChartOptions::default())
}
