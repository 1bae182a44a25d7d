use std::ffi::{c_char, c_void};
use std::ptr;
use stud_map_core::{HeightMap, StudMapAnalyser, SurfaceKind};

use crate::config::StudMapConfig;
use crate::error::{DefaultStudMapError, StudMapErrorCode};
use crate::helpers::{str_arg, track_error, track_result};
use crate::probe::{HostProbe, StudMapProbeFn};

/// A computed stud map owned by Rust.
///
/// Created by `stud_map_compute` and released with `stud_map_destroy`. The map is
/// immutable once computed, so accessors may be called from any thread.
pub struct StudMap {
    pub(crate) map: HeightMap,
}

/// Surface category of a cell.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudMapSurfaceKind {
    Default = 0,
    Ground = 1,
    Building = 2,
}

impl From<SurfaceKind> for StudMapSurfaceKind {
    fn from(kind: SurfaceKind) -> Self {
        match kind {
            SurfaceKind::Default => Self::Default,
            SurfaceKind::Ground => Self::Ground,
            SurfaceKind::Building => Self::Building,
            // Kinds added to the core later surface as Default until mapped here
            _ => Self::Default,
        }
    }
}

/// C-compatible copy of one quantized cell.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudMapCell {
    /// Quantized height, a whole number of bricks
    pub height: f32,
    pub kind: StudMapSurfaceKind,
    /// Bricks stacked in this cell
    pub units: u32,
}

impl StudMap {
    fn compute(
        config: &StudMapConfig,
        probe: HostProbe,
    ) -> Result<Box<Self>, DefaultStudMapError> {
        let analyser = StudMapAnalyser::new(config.to_grid_config(), probe)?;
        let map = analyser.compute()?;
        Ok(Box::new(Self { map }))
    }
}

/// Sweep the sampling area with the host's probe and quantize the result.
///
/// The callback is invoked once per cell, in row-major order (x outer, z inner),
/// on the calling thread, before this function returns.
///
/// Returns
/// - `StudMapErrorCode::Ok` (0) with a new map in `out_map`
/// - `StudMapErrorCode::NullPointer` if `config`, `probe` or `out_map` is null
/// - `StudMapErrorCode::InvalidConfiguration` if the sampling area is malformed
/// - `StudMapErrorCode::QueryFailure` if the callback failed or reported a bad distance
///
/// On failure `out_map` is set to null and `stud_map_get_last_error()` describes why.
///
/// # Safety
/// - `config` must point to a valid `StudMapConfig`.
/// - `probe` must be safe to call with `user_data` for the duration of this call.
/// - `out_map` must be a valid pointer to writable memory.
/// - The caller owns the returned map and MUST release it with `stud_map_destroy`.
///
/// Example (C++)
/// ```cpp
/// StudMapConfig config;
/// stud_map_config_default(&config);
/// config.anchor_y = 20.0f;
///
/// StudMap* map = nullptr;
/// if (stud_map_compute(&config, raycast_down, world, &map) != StudMapErrorCode::Ok) {
///     fprintf(stderr, "%s\n", stud_map_get_last_error());
///     return;
/// }
/// printf("%llu bricks\n", stud_map_total_unit_count(map));
/// stud_map_destroy(map);
/// ```
#[no_mangle]
pub unsafe extern "C" fn stud_map_compute(
    config: *const StudMapConfig,
    probe: StudMapProbeFn,
    user_data: *mut c_void,
    out_map: *mut *mut StudMap,
) -> StudMapErrorCode {
    if out_map.is_null() {
        return track_error(&DefaultStudMapError::null_pointer("out_map"));
    }
    // Null on every error path
    unsafe {
        *out_map = ptr::null_mut();
    }

    if config.is_null() {
        return track_error(&DefaultStudMapError::null_pointer("config"));
    }
    let Some(probe) = (unsafe { HostProbe::new(probe, user_data) }) else {
        return track_error(&DefaultStudMapError::null_pointer("probe"));
    };

    let config = unsafe { &*config };
    match track_result(StudMap::compute(config, probe)) {
        Ok(map) => {
            unsafe {
                *out_map = Box::into_raw(map);
            }
            StudMapErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Destroys a map previously returned by `stud_map_compute`. Null is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `stud_map_compute` and not destroyed already.
/// - The pointer must not be used after this call.
#[no_mangle]
pub unsafe extern "C" fn stud_map_destroy(map: *mut StudMap) {
    if map.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `stud_map_compute`
    unsafe {
        drop(Box::from_raw(map));
    }
}

/// Cells along the anchor's local X axis (0 if `map` is null).
///
/// # Safety
/// `map` must be null or a live pointer from `stud_map_compute`.
#[no_mangle]
pub unsafe extern "C" fn stud_map_width(map: *const StudMap) -> u32 {
    unsafe { map.as_ref() }.map_or(0, |m| m.map.width as u32)
}

/// Cells along the anchor's local Z axis (0 if `map` is null).
///
/// # Safety
/// `map` must be null or a live pointer from `stud_map_compute`.
#[no_mangle]
pub unsafe extern "C" fn stud_map_depth(map: *const StudMap) -> u32 {
    unsafe { map.as_ref() }.map_or(0, |m| m.map.depth as u32)
}

/// Bricks needed to build the whole map (0 if `map` is null).
///
/// # Safety
/// `map` must be null or a live pointer from `stud_map_compute`.
#[no_mangle]
pub unsafe extern "C" fn stud_map_total_unit_count(map: *const StudMap) -> u64 {
    unsafe { map.as_ref() }.map_or(0, |m| m.map.total_unit_count)
}

/// Copy the cell at grid position (`x`, `z`) into `out_cell`.
///
/// # Safety
/// - `map` must be null or a live pointer from `stud_map_compute`.
/// - `out_cell` must be null or a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn stud_map_get_cell(
    map: *const StudMap,
    x: u32,
    z: u32,
    out_cell: *mut StudMapCell,
) -> StudMapErrorCode {
    let Some(map) = (unsafe { map.as_ref() }) else {
        return track_error(&DefaultStudMapError::null_pointer("map"));
    };
    if out_cell.is_null() {
        return track_error(&DefaultStudMapError::null_pointer("out_cell"));
    }

    let map = &map.map;
    let result = map
        .cell(x as usize, z as usize)
        .map(|cell| StudMapCell {
            height: cell.height,
            kind: cell.kind.into(),
            units: cell.units,
        })
        .ok_or_else(|| DefaultStudMapError::out_of_bounds(x, z, map.width, map.depth));

    match track_result(result) {
        Ok(cell) => {
            unsafe {
                *out_cell = cell;
            }
            StudMapErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Write the map as `<dir>/<name>.json`, creating `dir` if needed.
///
/// # Safety
/// - `map` must be null or a live pointer from `stud_map_compute`.
/// - `dir` and `name` must be null or valid null-terminated UTF-8 strings.
#[no_mangle]
pub unsafe extern "C" fn stud_map_export(
    map: *const StudMap,
    dir: *const c_char,
    name: *const c_char,
) -> StudMapErrorCode {
    let Some(map) = (unsafe { map.as_ref() }) else {
        return track_error(&DefaultStudMapError::null_pointer("map"));
    };

    let result = unsafe { str_arg(dir, "dir") }.and_then(|dir| {
        let name = unsafe { str_arg(name, "name") }?;
        map.map.export_to(dir, name).map_err(DefaultStudMapError::from)
    });

    match track_result(result) {
        Ok(_) => StudMapErrorCode::Ok,
        Err(code) => code,
    }
}
