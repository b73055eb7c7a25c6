//! C ABI for chart computation.
//!
//! One implementation backs every export; Cargo features choose which
//! symbols exist. Strings handed out here belong to the caller and must be
//! released with [`astro_free`].

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use urania::{
    compute_chart, ChartError, ChartOptions, ChartRequest, EphemerisService, GeoLocation,
    HouseSystem, SwissEphemerisAdapter,
};

/// Current ABI version - increment when making breaking changes
pub const ABI_VERSION: u32 = 1;

/// C-facing status codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstroStatus {
    Ok = 0,
    /// Record written, but some bodies are missing from it
    Partial = 1,
    NullPointer = 2,
    OutputAllocation = 3,
    OutputLimit = 4,
    Internal = 255,
}

impl From<&ChartError> for AstroStatus {
    fn from(value: &ChartError) -> Self {
        match value {
            ChartError::OutputAllocation(_) => Self::OutputAllocation,
            ChartError::OutputLimit { .. } => Self::OutputLimit,
            ChartError::Format(_) | ChartError::Encode(_) => Self::Internal,
        }
    }
}

/// C-compatible chart request.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AstroRequest {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    /// Degrees, negative for west
    pub longitude: f64,
    /// Degrees, negative for south
    pub latitude: f64,
    /// House system code, e.g. `'P'`
    pub house_system: c_char,
}

impl From<&AstroRequest> for ChartRequest {
    fn from(value: &AstroRequest) -> Self {
        ChartRequest {
            year: value.year,
            month: value.month,
            day: value.day,
            hour: value.hour,
            minute: value.minute,
            location: GeoLocation {
                lat: value.latitude,
                lon: value.longitude,
            },
            house_system: HouseSystem(value.house_system as u8),
        }
    }
}

/// A computed record ready to cross the boundary.
#[derive(Debug)]
pub struct AstroRecord {
    pub json: CString,
    pub omitted: usize,
}

/// Compute a chart and convert the record to a C string.
pub fn astro_compute_internal<S: EphemerisService + ?Sized>(
    service: &S,
    request: &AstroRequest,
    options: &ChartOptions,
) -> Result<AstroRecord, AstroStatus> {
    let output = compute_chart(service, &ChartRequest::from(request), options).map_err(|err| {
        log::error!("Chart computation failed: {}", err);
        AstroStatus::from(&err)
    })?;
    let omitted = output.omitted.len();
    let json = CString::new(output.json).map_err(|_| AstroStatus::Internal)?;
    Ok(AstroRecord { json, omitted })
}

/// Return ABI version of the exported C API.
#[unsafe(no_mangle)]
pub extern "C" fn urania_abi_version() -> u32 {
    ABI_VERSION
}

/// Compute a chart record.
///
/// On `Ok` or `Partial`, `*out_json` receives a NUL-terminated JSON string
/// to be released with [`astro_free`]; otherwise it is set to null.
/// `out_omitted` is optional and receives the number of dropped bodies.
///
/// # Safety
/// `request` and `out_json` must be valid, non-null pointers. `out_omitted`
/// must be null or valid for a single write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn astro_compute(
    request: *const AstroRequest,
    out_json: *mut *mut c_char,
    out_omitted: *mut u32,
) -> AstroStatus {
    ffi_boundary(AstroStatus::Internal, || {
        if request.is_null() || out_json.is_null() {
            return AstroStatus::NullPointer;
        }

        // SAFETY: Pointer is checked for null and copied by value.
        let request = unsafe { *request };
        // SAFETY: Pointer is checked for null and we only write a single pointer value.
        let out_json = unsafe { &mut *out_json };

        let adapter = SwissEphemerisAdapter::builtin();
        match astro_compute_internal(&adapter, &request, &ChartOptions::default()) {
            Ok(record) => {
                if !out_omitted.is_null() {
                    // SAFETY: Pointer is checked for null and written once.
                    unsafe { *out_omitted = record.omitted as u32 };
                }
                *out_json = record.json.into_raw();
                if record.omitted > 0 {
                    AstroStatus::Partial
                } else {
                    AstroStatus::Ok
                }
            }
            Err(status) => {
                *out_json = ptr::null_mut();
                status
            }
        }
    })
}

/// Release a string returned by this library.
///
/// # Safety
/// `json` must be null or a pointer returned by [`astro_compute`] or
/// `astro` that has not been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn astro_free(json: *mut c_char) {
    if json.is_null() {
        return;
    }
    // SAFETY: Ownership is transferred back from a pointer created by CString::into_raw.
    drop(unsafe { CString::from_raw(json) });
}

/// Legacy entry shared by `astro` and `get`: the first byte of `house` is
/// the house system code. Returns null on any failure.
pub fn legacy_record<S: EphemerisService + ?Sized>(
    service: &S,
    request: &AstroRequest,
) -> *mut c_char {
    match astro_compute_internal(service, request, &ChartOptions::default()) {
        Ok(record) => record.json.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Historical entry point: compute a chart and return its JSON record.
///
/// # Safety
/// `house` must be null or point to at least one readable byte. The result
/// is null on failure and must otherwise be released with [`astro_free`].
#[cfg(feature = "legacy-entry")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn astro(
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    longitude: f64,
    latitude: f64,
    house: *const c_char,
) -> *mut c_char {
    ffi_boundary(ptr::null_mut(), || {
        if house.is_null() {
            return ptr::null_mut();
        }
        // SAFETY: Pointer is checked for null; only the first byte is read.
        let house_system = unsafe { *house };
        let request = AstroRequest {
            year,
            month,
            day,
            hour,
            minute,
            longitude,
            latitude,
            house_system,
        };
        legacy_record(&SwissEphemerisAdapter::builtin(), &request)
    })
}

/// Same as `astro`, under the name the browser worker invokes.
///
/// # Safety
/// See `astro`.
#[cfg(feature = "worker-entry")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn get(
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    longitude: f64,
    latitude: f64,
    house: *const c_char,
) -> *mut c_char {
    // SAFETY: Same contract as `astro`.
    unsafe { astro(year, month, day, hour, minute, longitude, latitude, house) }
}

fn ffi_boundary<T>(fallback: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            log::error!("Panic caught at the C boundary");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ChartError::OutputLimit { limit: 1, needed: 2 };
        assert_eq!(AstroStatus::from(&err), AstroStatus::OutputLimit);
        assert_eq!(
            AstroStatus::from(&ChartError::Format(std::fmt::Error)),
            AstroStatus::Internal
        );
    }

    #[test]
    fn test_status_codes_are_stable() {
        let codes = [
            AstroStatus::Ok,
            AstroStatus::Partial,
            AstroStatus::NullPointer,
            AstroStatus::OutputAllocation,
            AstroStatus::OutputLimit,
            AstroStatus::Internal,
        ]
        .map(|s| s as i32);
        assert_eq!(codes, [0, 1, 2, 3, 4, 255]);
    }

    #[test]
    fn test_boundary_converts_panics() {
        let status = ffi_boundary(AstroStatus::Internal, || -> AstroStatus { panic!("boom") });
        assert_eq!(status, AstroStatus::Internal);
    }

    #[test]
    fn test_request_conversion() {
        let req = AstroRequest {
            year: 2024,
            month: 1,
            day: 15,
            hour: 14,
            minute: 30,
            longitude: -74.0,
            latitude: 40.714,
            house_system: b'K' as c_char,
        };
        let chart = ChartRequest::from(&req);
        assert_eq!(chart.location, GeoLocation { lat: 40.714, lon: -74.0 });
        assert_eq!(chart.house_system, HouseSystem(b'K'));
        assert_eq!(chart.fractional_hour(), 14.5);
    }

    #[test]
    fn test_null_pointers_are_rejected() {
        let mut out: *mut c_char = ptr::null_mut();
        // SAFETY: Null request is the case under test; out is valid.
        let status = unsafe { astro_compute(ptr::null(), &mut out, ptr::null_mut()) };
        assert_eq!(status, AstroStatus::NullPointer);
        assert!(out.is_null());
        // SAFETY: Freeing null is a no-op.
        unsafe { astro_free(ptr::null_mut()) };
    }
}
