use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Swiss Ephemeris body identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub i32);

impl BodyId {
    pub const SUN: BodyId = BodyId(0);
    pub const MOON: BodyId = BodyId(1);
    pub const MERCURY: BodyId = BodyId(2);
    pub const VENUS: BodyId = BodyId(3);
    pub const MARS: BodyId = BodyId(4);
    pub const JUPITER: BodyId = BodyId(5);
    pub const SATURN: BodyId = BodyId(6);
    pub const URANUS: BodyId = BodyId(7);
    pub const NEPTUNE: BodyId = BodyId(8);
    pub const PLUTO: BodyId = BodyId(9);
    pub const MEAN_NODE: BodyId = BodyId(10);
    pub const EARTH: BodyId = BodyId(14);
    pub const CHIRON: BodyId = BodyId(15);

    /// Bodies a chart walks through, in emission order.
    pub fn chart_range() -> impl Iterator<Item = BodyId> {
        (Self::SUN.0..=Self::MEAN_NODE.0).map(BodyId)
    }

    pub fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// House system mapping
const HOUSE_SYSTEMS: &[(&str, u8)] = &[
    ("placidus", b'P'),
    ("koch", b'K'),
    ("porphyrius", b'O'),
    ("regiomontanus", b'R'),
    ("campanus", b'C'),
    ("equal", b'E'),
    ("whole_sign", b'W'),
    ("topocentric", b'T'),
    ("alcabitius", b'B'),
    ("morinus", b'M'),
    ("horizontal", b'H'),
    ("meridian", b'X'),
    ("vehlow", b'V'),
];

/// Single-byte house system code, forwarded to the ephemeris unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HouseSystem(pub u8);

impl HouseSystem {
    pub const PLACIDUS: HouseSystem = HouseSystem(b'P');

    pub fn code(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }

    /// Catalogue name for this code, if it is a well-known one.
    pub fn name(self) -> Option<&'static str> {
        HOUSE_SYSTEMS
            .iter()
            .find(|(_, code)| *code == self.0)
            .map(|(name, _)| *name)
    }

    /// Resolve a catalogue name or a single ASCII code character.
    ///
    /// Single characters pass through even when they are not in the
    /// catalogue; the ephemeris decides what an unknown code means.
    pub fn parse(input: &str) -> Option<HouseSystem> {
        let trimmed = input.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return c.is_ascii().then(|| HouseSystem(c as u8));
        }
        let lower = trimmed.to_lowercase().replace(['-', ' '], "_");
        HOUSE_SYSTEMS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, code)| HouseSystem(*code))
    }

    pub fn catalogue() -> impl Iterator<Item = (&'static str, HouseSystem)> {
        HOUSE_SYSTEMS
            .iter()
            .map(|(name, code)| (*name, HouseSystem(*code)))
    }

    pub fn catalogue_names() -> Vec<String> {
        HOUSE_SYSTEMS.iter().map(|(name, _)| name.to_string()).collect()
    }
}

impl Default for HouseSystem {
    fn default() -> Self {
        Self::PLACIDUS
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Computation flags in Swiss Ephemeris bit layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalcFlags(pub i32);

impl CalcFlags {
    pub const SWIEPH: CalcFlags = CalcFlags(2);
    pub const MOSEPH: CalcFlags = CalcFlags(4);
    pub const SPEED: CalcFlags = CalcFlags(256);

    /// JPL, Swiss and Moshier source bits
    const EPHEMERIS_MASK: i32 = 1 | 2 | 4;

    pub fn bits(self) -> i32 {
        self.0
    }

    /// The ephemeris source bits the caller asked for.
    pub fn ephemeris_bits(self) -> i32 {
        self.0 & Self::EPHEMERIS_MASK
    }
}

impl Default for CalcFlags {
    /// Built-in analytic ephemeris with speeds; needs no data files.
    fn default() -> Self {
        CalcFlags::MOSEPH | CalcFlags::SPEED
    }
}

impl std::ops::BitOr for CalcFlags {
    type Output = CalcFlags;

    fn bitor(self, rhs: CalcFlags) -> CalcFlags {
        CalcFlags(self.0 | rhs.0)
    }
}

/// Raw result of a single body position query
#[derive(Debug, Clone, PartialEq)]
pub struct BodyCalc {
    /// Positive on success, encoding which computation modes were honored
    pub status: i32,
    /// Ecliptic longitude in degrees
    pub longitude: f64,
    /// Speed in longitude (degrees per day)
    pub speed: f64,
    /// Library diagnostic, empty when there is nothing to report
    pub message: String,
}

/// Raw result of a houses-and-angles query
#[derive(Debug, Clone, PartialEq)]
pub struct HouseCalc {
    /// Cusps indexed 1..=12; index 0 is unused
    pub cusps: [f64; 13],
    /// Ascendant at 0, midheaven at 1, remaining points unused here
    pub ascmc: [f64; 10],
}
