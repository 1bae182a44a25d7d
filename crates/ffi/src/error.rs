use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use stud_map_core::{ExportError, StudMapError};

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait StudMapFfiError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> StudMapErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `StudMapFfiError` for the FFI failure scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultStudMapError {
    code: StudMapErrorCode,
    msg: String,
}

impl DefaultStudMapError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_map"`, `"probe"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: StudMapErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a string argument that is not valid UTF-8.
    pub fn invalid_string(param_name: &str) -> Self {
        Self {
            code: StudMapErrorCode::InvalidParameter,
            msg: format!("Parameter '{param_name}' is not valid UTF-8"),
        }
    }

    /// Create error for a grid position outside the map.
    pub fn out_of_bounds(x: u32, z: u32, width: usize, depth: usize) -> Self {
        Self {
            code: StudMapErrorCode::OutOfBounds,
            msg: format!("Cell ({x}, {z}) is outside the {width}x{depth} map"),
        }
    }
}

impl StudMapFfiError for DefaultStudMapError {
    fn code(&self) -> StudMapErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<StudMapError> for DefaultStudMapError {
    fn from(error: StudMapError) -> Self {
        let code = match error {
            StudMapError::InvalidConfiguration { .. } => StudMapErrorCode::InvalidConfiguration,
            StudMapError::QueryFailure { .. } => StudMapErrorCode::QueryFailure,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl From<ExportError> for DefaultStudMapError {
    fn from(error: ExportError) -> Self {
        match error {
            ExportError::Compute(inner) => inner.into(),
            other => Self {
                code: StudMapErrorCode::ExportFailed,
                msg: other.to_string(),
            },
        }
    }
}

/// FFI error codes returned by stud map functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudMapErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Grid dimensions, scale, max height or anchor are out of range.
    InvalidConfiguration = 2,

    /// The host probe callback reported an error or an out-of-range distance.
    QueryFailure = 3,

    /// Invalid parameter passed to function.
    InvalidParameter = 4,

    /// Grid position outside the map.
    OutOfBounds = 5,

    /// The map could not be written to disk.
    ExportFailed = 6,
}

impl From<DefaultStudMapError> for StudMapErrorCode {
    fn from(error: DefaultStudMapError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is kept here so the pointer handed out stays valid until the next call.
    static LAST_ERROR: RefCell<(Option<CString>, StudMapErrorCode)> = const { RefCell::new((None, StudMapErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, StudMapErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, StudMapErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// StudMap* map = nullptr;
/// StudMapErrorCode err = stud_map_compute(&config, probe, user_data, &map);
/// if (err != StudMapErrorCode::Ok) {
///     const char* error = stud_map_get_last_error();
///     if (error) {
///         printf("Stud map failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn stud_map_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
#[no_mangle]
pub extern "C" fn stud_map_get_last_error_code() -> StudMapErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
