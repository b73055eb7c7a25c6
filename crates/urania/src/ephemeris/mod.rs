pub mod adapter;
pub mod service;
pub mod types;

pub use adapter::{EphemerisError, SwissEphemerisAdapter};
pub use service::EphemerisService;
pub use types::{BodyCalc, BodyId, CalcFlags, GeoLocation, HouseCalc, HouseSystem};
