use stud_map_core::{Anchor, GridConfig, Vec3};

/// Sampling area description passed in from the host.
///
/// Mirrors `GridConfig` with C-compatible field types. The anchor is the centre
/// of the area's top face; `yaw` is in radians about the world up axis.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudMapConfig {
    /// Cells along the anchor's local X axis
    pub width: u32,
    /// Cells along the anchor's local Z axis
    pub depth: u32,
    /// Cell edge length in world units
    pub scale: f32,
    /// Probe length and sampling volume height
    pub max_height: f32,
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub anchor_z: f32,
    pub yaw: f32,
    /// Measure heights relative to the lowest hit
    pub flatten_ground: bool,
}

impl StudMapConfig {
    /// Convert into the core configuration. Validation happens in the core.
    pub(crate) fn to_grid_config(self) -> GridConfig {
        GridConfig {
            width: self.width as usize,
            depth: self.depth as usize,
            scale: self.scale,
            max_height: self.max_height,
            anchor: Anchor::new(
                Vec3::new(self.anchor_x, self.anchor_y, self.anchor_z),
                self.yaw,
            ),
            flatten_ground: self.flatten_ground,
            ..GridConfig::default()
        }
    }
}

/// Fill `out_config` with the default sampling area (100x100 cells, scale 1, height 10).
///
/// # Safety
/// `out_config` must be null or a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn stud_map_config_default(out_config: *mut StudMapConfig) {
    if out_config.is_null() {
        return;
    }

    let defaults = GridConfig::default();
    let position = defaults.anchor.position;
    let config = StudMapConfig {
        width: u32::try_from(defaults.width).unwrap_or(u32::MAX),
        depth: u32::try_from(defaults.depth).unwrap_or(u32::MAX),
        scale: defaults.scale,
        max_height: defaults.max_height,
        anchor_x: position.x,
        anchor_y: position.y,
        anchor_z: position.z,
        yaw: defaults.anchor.yaw,
        flatten_ground: defaults.flatten_ground,
    };

    unsafe {
        *out_config = config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_to_core_default() {
        let mut config = StudMapConfig {
            width: 0,
            depth: 0,
            scale: 0.0,
            max_height: 0.0,
            anchor_x: 0.0,
            anchor_y: 0.0,
            anchor_z: 0.0,
            yaw: 0.0,
            flatten_ground: true,
        };
        unsafe { stud_map_config_default(&mut config) };

        assert_eq!(config.width, 100);
        assert_eq!(config.depth, 100);
        assert!(!config.flatten_ground);

        let grid = config.to_grid_config();
        let defaults = GridConfig::default();
        assert_eq!(grid.width, defaults.width);
        assert_eq!(grid.scale, defaults.scale);
        assert_eq!(grid.max_height, defaults.max_height);
    }

    #[test]
    fn test_anchor_fields_map_to_anchor() {
        let config = StudMapConfig {
            width: 4,
            depth: 2,
            scale: 0.5,
            max_height: 20.0,
            anchor_x: 1.0,
            anchor_y: 15.0,
            anchor_z: -3.0,
            yaw: 0.25,
            flatten_ground: true,
        };
        let grid = config.to_grid_config();
        assert_eq!(grid.anchor.position, Vec3::new(1.0, 15.0, -3.0));
        assert_eq!(grid.anchor.yaw, 0.25);
        assert_eq!(grid.cell_count(), 8);
        assert!(grid.validate().is_ok());
    }
}
