use std::ffi::{c_char, c_void, CStr};
use std::ptr;
use stud_map_core::{ProbeError, ProbeHit, ProbeResult, SurfaceProbe, Vec3};

/// Plain 3-component vector for the C boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudMapVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for StudMapVec3 {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Hit record filled in by the host probe callback.
///
/// `tag` may be null (treated as untagged). It only needs to stay valid until the
/// callback returns; the string is copied before the next probe is cast.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct StudMapProbeHit {
    pub distance: f32,
    pub tag: *const c_char,
}

/// Callback answering a single downward probe.
///
/// Return `1` after writing `out_hit` for a hit, `0` for a miss, and any negative
/// value if the query could not be answered (the sweep then fails with
/// `StudMapErrorCode::QueryFailure`).
pub type StudMapProbeFn = Option<
    unsafe extern "C" fn(
        user_data: *mut c_void,
        origin: StudMapVec3,
        direction: StudMapVec3,
        max_distance: f32,
        out_hit: *mut StudMapProbeHit,
    ) -> i32,
>;

/// [`SurfaceProbe`] that forwards every query to a host callback.
pub(crate) struct HostProbe {
    callback: unsafe extern "C" fn(
        *mut c_void,
        StudMapVec3,
        StudMapVec3,
        f32,
        *mut StudMapProbeHit,
    ) -> i32,
    user_data: *mut c_void,
}

impl HostProbe {
    /// Wrap a host callback; `None` if the callback is null.
    ///
    /// # Safety
    /// The callback must be safe to call with `user_data` for the lifetime of the probe.
    pub(crate) unsafe fn new(callback: StudMapProbeFn, user_data: *mut c_void) -> Option<Self> {
        callback.map(|callback| Self {
            callback,
            user_data,
        })
    }
}

impl SurfaceProbe for HostProbe {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> ProbeResult {
        let mut hit = StudMapProbeHit {
            distance: 0.0,
            tag: ptr::null(),
        };

        // SAFETY: the caller of `HostProbe::new` vouched for the callback and user data
        let status = unsafe {
            (self.callback)(
                self.user_data,
                origin.into(),
                direction.into(),
                max_distance,
                &mut hit,
            )
        };

        match status {
            0 => Ok(None),
            1 => {
                let tag = if hit.tag.is_null() {
                    String::new()
                } else {
                    // SAFETY: the callback contract keeps `tag` valid until it returns
                    unsafe { CStr::from_ptr(hit.tag) }
                        .to_string_lossy()
                        .into_owned()
                };
                Ok(Some(ProbeHit::new(hit.distance, tag)))
            }
            code => Err(ProbeError::Unavailable(format!(
                "host probe callback returned {code}"
            ))),
        }
    }
}
