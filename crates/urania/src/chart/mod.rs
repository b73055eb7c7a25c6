pub mod bodies;
pub mod data;
pub mod houses;
pub mod time;
pub mod writer;

pub use data::{Angles, CelestialBody, ChartRequest, ChartResult, HouseCusps, TimeReference};
pub use writer::ChartWriter;

use crate::ephemeris::{CalcFlags, EphemerisService};
use crate::error::{ChartError, OmittedBody};
use serde::Serialize;

/// Knobs for a single chart computation
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// Flags passed to every ephemeris query
    pub flags: CalcFlags,
    /// Bytes reserved for the record up front
    pub initial_capacity: usize,
    /// Upper bound on the record size, `None` for unbounded
    pub max_output_bytes: Option<usize>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            flags: CalcFlags::default(),
            initial_capacity: 1024,
            max_output_bytes: None,
        }
    }
}

/// A finished chart: the serialized record plus what went into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOutput {
    /// The JSON record, owned by the caller
    pub json: String,
    pub result: ChartResult,
    /// Bodies dropped from the planet list
    pub omitted: Vec<OmittedBody>,
}

impl ChartOutput {
    /// True when at least one body is missing from the record.
    pub fn is_partial(&self) -> bool {
        !self.omitted.is_empty()
    }
}

/// Compute a chart and stream it into its JSON record.
///
/// Bodies the ephemeris cannot resolve are left out of the record and
/// listed in [`ChartOutput::omitted`]; only buffer failures abort.
pub fn compute_chart<S: EphemerisService + ?Sized>(
    service: &S,
    request: &ChartRequest,
    options: &ChartOptions,
) -> Result<ChartOutput, ChartError> {
    let time = time::normalize(service, request);
    let mut writer = ChartWriter::new(options.initial_capacity, options.max_output_bytes)?;
    writer.begin(time)?;

    let mut bodies = Vec::new();
    let mut omitted = Vec::new();
    for id in bodies::chart_bodies() {
        match bodies::resolve_body(service, time, id, options.flags) {
            Ok(body) => {
                log::debug!(
                    "Resolved {} at {:.6} (speed {:.6})",
                    body.name,
                    body.longitude,
                    body.speed
                );
                writer.planet(&body)?;
                bodies.push(body);
            }
            Err(reason) => {
                log::warn!("Omitting body {} from chart at JD {}: {}", id, time.jd(), reason);
                omitted.push(OmittedBody { id, reason });
            }
        }
    }

    let (angles, cusps) = houses::resolve_houses(
        service,
        time,
        request.location,
        request.house_system,
        options.flags,
    );
    writer.angles(&angles)?;
    writer.houses(&cusps)?;

    Ok(ChartOutput {
        json: writer.finish(),
        result: ChartResult {
            time,
            bodies,
            angles,
            cusps,
        },
        omitted,
    })
}
