use crate::chart::data::{CelestialBody, TimeReference};
use crate::ephemeris::{BodyId, CalcFlags, EphemerisService};
use crate::error::OmissionReason;

/// Fixed lowercase names; anything else asks the ephemeris.
const BODY_NAMES: &[(BodyId, &str)] = &[
    (BodyId::SUN, "sun"),
    (BodyId::MOON, "moon"),
    (BodyId::MERCURY, "mercury"),
    (BodyId::VENUS, "venus"),
    (BodyId::MARS, "mars"),
    (BodyId::JUPITER, "jupiter"),
    (BodyId::SATURN, "saturn"),
    (BodyId::URANUS, "uranus"),
    (BodyId::NEPTUNE, "neptune"),
    (BodyId::PLUTO, "pluto"),
    (BodyId::MEAN_NODE, "mean node"),
];

/// Bodies that make up a chart, in output order.
pub fn chart_bodies() -> impl Iterator<Item = BodyId> {
    // Earth lies outside the walked range today; the guard keeps it out if
    // the range is ever widened.
    BodyId::chart_range().filter(|id| *id != BodyId::EARTH)
}

/// Lowercase canonical name for a body.
pub fn canonical_name<S: EphemerisService + ?Sized>(service: &S, id: BodyId) -> String {
    match BODY_NAMES.iter().find(|(known, _)| *known == id) {
        Some((_, name)) => name.to_string(),
        None => service.body_name(id).to_lowercase(),
    }
}

/// Query one body and decide whether it belongs in the chart.
///
/// A body is accepted only when the status is positive and carries the
/// ephemeris source that was asked for.
pub fn resolve_body<S: EphemerisService + ?Sized>(
    service: &S,
    time: TimeReference,
    id: BodyId,
    flags: CalcFlags,
) -> Result<CelestialBody, OmissionReason> {
    let calc = service.calc_body(time.jd(), id, flags);

    if calc.status <= 0 {
        return Err(OmissionReason::Failed {
            status: calc.status,
            message: calc.message,
        });
    }
    let requested = flags.ephemeris_bits();
    if calc.status & requested == 0 {
        return Err(OmissionReason::ModeNotHonored {
            status: calc.status,
            requested,
        });
    }

    Ok(CelestialBody {
        id,
        name: canonical_name(service, id),
        longitude: calc.longitude,
        speed: calc.speed,
        retrograde: calc.speed < 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_bodies_cover_sun_through_mean_node() {
        let ids: Vec<i32> = chart_bodies().map(BodyId::code).collect();
        assert_eq!(ids, (0..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_name_table_is_ordered_by_id() {
        assert!(BODY_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(BODY_NAMES.len(), chart_bodies().count());
    }
}
