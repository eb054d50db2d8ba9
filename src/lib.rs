//! Lane TD - simulation core for a curved-lane tower defense
//!
//! Core modules:
//! - `sim`: Deterministic simulation (curves, spatial index, enemies, map)
//! - `config`: Data-driven simulation tuning
//! - `render`: Mesh data and the renderer trait the map draws through
//!
//! The simulation is single-threaded and deterministic: a fixed timestep,
//! seeded RNG only, and stable iteration order (chain order, then slot order).
//! Rendering, windowing and resource loading live outside this crate.

pub mod config;
pub mod render;
pub mod sim;

pub use config::SimConfig;
pub use render::{MeshData, ShapeRenderer};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Segments used when tessellating curves for rendering meshes.
    /// Larger values create more triangles.
    pub const PATH_DRAW_SEGMENTS: u32 = 32;
    /// Segments used when deriving static data (arc length, bounding boxes)
    pub const PATH_UPDATE_SEGMENTS: u32 = 64;

    /// Global multiplier applied to every enemy's path speed
    pub const PATH_SPEED_MULTIPLIER: f32 = 2.0;

    /// Default hit points of the base at the end of the lane
    pub const BASE_HEALTH: f32 = 100.0;
}

/// Perpendicular (counter-clockwise) of a direction vector
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}
