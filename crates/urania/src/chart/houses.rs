use crate::chart::data::{Angles, HouseCusps, TimeReference};
use crate::ephemeris::{CalcFlags, EphemerisService, GeoLocation, HouseSystem};

const ASCMC_ASC: usize = 0;
const ASCMC_MC: usize = 1;

/// Ascendant, midheaven and the twelve cusps for a location.
///
/// The house system code is not checked; an unknown code gets whatever the
/// ephemeris falls back to.
pub fn resolve_houses<S: EphemerisService + ?Sized>(
    service: &S,
    time: TimeReference,
    location: GeoLocation,
    system: HouseSystem,
    flags: CalcFlags,
) -> (Angles, HouseCusps) {
    let calc = service.houses(time.jd(), flags, location.lat, location.lon, system);

    let angles = Angles {
        ascendant: calc.ascmc[ASCMC_ASC],
        midheaven: calc.ascmc[ASCMC_MC],
    };

    let mut cusps = [0.0; 12];
    cusps.copy_from_slice(&calc.cusps[1..=12]);

    (angles, HouseCusps(cusps))
}
