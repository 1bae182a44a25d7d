use crate::error::{
    with_last_error_mut, DefaultStudMapError, StudMapErrorCode, StudMapFfiError,
};
use std::ffi::{c_char, CStr, CString};

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
/// Accepts any type implementing `StudMapFfiError` trait.
pub(crate) fn set_last_error(error: &impl StudMapFfiError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl StudMapFfiError) -> StudMapErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result, or clear the last error on success.
pub(crate) fn track_result<T, E>(result: Result<T, E>) -> Result<T, StudMapErrorCode>
where
    E: StudMapFfiError,
{
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Clear the thread-local error message and code.
/// Internal helper called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = StudMapErrorCode::Ok;
    });
}

/// Borrow a caller-owned C string argument as UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a valid null-terminated string that outlives `'a`.
pub(crate) unsafe fn str_arg<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<&'a str, DefaultStudMapError> {
    if ptr.is_null() {
        return Err(DefaultStudMapError::null_pointer(param_name));
    }
    let cstr = unsafe { CStr::from_ptr(ptr) };
    cstr.to_str()
        .map_err(|_| DefaultStudMapError::invalid_string(param_name))
}
