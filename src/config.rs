//! Simulation tuning
//!
//! Everything a level designer might want to tweak without recompiling.
//! Loadable from JSON; defaults match the constants in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts;

/// Tunable simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Tessellation resolution for static data (arc length, bounding boxes).
    /// Coarser than `draw_segments` since it only feeds physics.
    pub update_segments: u32,
    /// Tessellation resolution for rendering meshes
    pub draw_segments: u32,
    /// Global multiplier applied to every enemy's speed
    pub speed_multiplier: f32,
    /// Hit points of the base at the end of the lane
    pub base_health: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            update_segments: consts::PATH_UPDATE_SEGMENTS,
            draw_segments: consts::PATH_DRAW_SEGMENTS,
            speed_multiplier: consts::PATH_SPEED_MULTIPLIER,
            base_health: consts::BASE_HEALTH,
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => {
                log::info!("Loaded simulation config");
                config
            }
            Err(err) => {
                log::warn!("Bad simulation config ({err}), using defaults");
                Self::default()
            }
        }
    }
}
