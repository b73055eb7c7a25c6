//! Geographic coordinate input.
//!
//! Accepts signed decimal degrees or degrees/minutes/seconds with a
//! hemisphere letter, in either the trailing form (`40:42:51N`,
//! `74°0'0"W`) or the astrological inline form (`74W00'00"`, `40N42`).
//! West and south are negative. Ranges are not checked.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoordinateError {
    #[error("Unrecognized coordinate: {0}")]
    Unrecognized(String),
    #[error("Hemisphere {hemisphere} does not apply to {axis}")]
    WrongHemisphere { hemisphere: char, axis: Axis },
    #[error("Minutes and seconds must be below 60 in {0}")]
    SexagesimalOverflow(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

lazy_static! {
    static ref DECIMAL: Regex = Regex::new(r"^[+-]?\d+(?:\.\d+)?$").unwrap();
    static ref TRAILING: Regex = Regex::new(
        r#"^(\d+(?:\.\d+)?)(?:\s*[°:\s]\s*(\d+(?:\.\d+)?)(?:\s*['′:\s]\s*(\d+(?:\.\d+)?)\s*["″]?)?\s*'?)?\s*([NSEWnsew])$"#
    )
    .unwrap();
    static ref INLINE: Regex = Regex::new(
        r#"^(\d+)\s*([NSEWnsew])\s*(\d+(?:\.\d+)?)?(?:\s*['′]\s*(\d+(?:\.\d+)?)\s*["″]?)?$"#
    )
    .unwrap();
}

/// Degrees, minutes, seconds and a hemisphere letter to signed degrees.
pub fn dms_to_degrees(
    degrees: f64,
    minutes: f64,
    seconds: f64,
    hemisphere: char,
    axis: Axis,
) -> Result<f64, CoordinateError> {
    let sign = match (hemisphere.to_ascii_uppercase(), axis) {
        ('N', Axis::Latitude) | ('E', Axis::Longitude) => 1.0,
        ('S', Axis::Latitude) | ('W', Axis::Longitude) => -1.0,
        (h, axis) => return Err(CoordinateError::WrongHemisphere { hemisphere: h, axis }),
    };
    Ok(sign * (degrees + minutes / 60.0 + seconds / 3600.0))
}

/// Parse one coordinate for the given axis.
pub fn parse_coordinate(input: &str, axis: Axis) -> Result<f64, CoordinateError> {
    let s = input.trim();
    if DECIMAL.is_match(s) {
        return s
            .parse::<f64>()
            .map_err(|_| CoordinateError::Unrecognized(input.to_string()));
    }

    let (deg, min, sec, hemi) = if let Some(c) = TRAILING.captures(s) {
        (c.get(1), c.get(2), c.get(3), c.get(4))
    } else if let Some(c) = INLINE.captures(s) {
        (c.get(1), c.get(3), c.get(4), c.get(2))
    } else {
        return Err(CoordinateError::Unrecognized(input.to_string()));
    };

    let number = |m: Option<regex::Match<'_>>| -> Result<f64, CoordinateError> {
        m.map_or(Ok(0.0), |m| {
            m.as_str()
                .parse::<f64>()
                .map_err(|_| CoordinateError::Unrecognized(input.to_string()))
        })
    };
    let minutes = number(min)?;
    let seconds = number(sec)?;
    if minutes >= 60.0 || seconds >= 60.0 {
        return Err(CoordinateError::SexagesimalOverflow(input.to_string()));
    }
    let hemisphere = hemi
        .and_then(|m| m.as_str().chars().next())
        .ok_or_else(|| CoordinateError::Unrecognized(input.to_string()))?;

    dms_to_degrees(number(deg)?, minutes, seconds, hemisphere, axis)
}
