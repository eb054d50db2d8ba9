//! Mesh data and the drawing seam
//!
//! The simulation never talks to a GPU. It produces plain vertex/index data
//! and hands positions to whatever implements [`ShapeRenderer`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGBA color, linear, 0..1 per channel
pub type Color = [f32; 4];

/// A triangle mesh in 2D, indexed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Append another mesh, rebasing its indices
    pub fn with(&mut self, other: MeshData) -> &mut Self {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// What the map needs from a renderer: meshes for the lane, markers for
/// enemies. Implementations live outside the simulation core.
pub trait ShapeRenderer {
    fn draw_mesh(&mut self, mesh: &MeshData, color: Color);
    fn draw_marker(&mut self, pos: Vec2, size: f32, color: Color);
}
