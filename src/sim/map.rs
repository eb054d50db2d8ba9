//! The lane: an ordered chain of path segments
//!
//! `update` is the heart of the simulation. Each tick it advances every live
//! enemy in chain order, hands completers to the next segment, and sums the
//! damage of enemies walking off the end of the lane. Hand-offs land with
//! progress 0 and are not advanced again until the next tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::render::{MeshData, ShapeRenderer};

use super::bounds::BoundingBox;
use super::bvh::Bvh;
use super::curve::Curve;
use super::enemies::{DamageType, EnemyId, EnemyRegistry};
use super::path::{EnemyInstance, PathSegment};

/// Lane mesh color (debug draw)
const LANE_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
/// Enemy marker color (debug draw)
const ENEMY_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
/// Enemy marker size in world units (debug draw)
const ENEMY_MARKER_SIZE: f32 = 10.0;

/// An ordered chain of path segments with a spatial index over their boxes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    segments: Vec<PathSegment>,
    /// Built once per level from the segment boxes, in chain order, so
    /// `NodeId::index() == segment index`. Replacing the lane swaps the
    /// whole map.
    bvh: Bvh,
}

impl Map {
    /// Build a lane from authored curves, in traversal order
    pub fn new(curves: Vec<Curve>, config: &SimConfig) -> Self {
        let segments: Vec<_> = curves
            .into_iter()
            .map(|c| PathSegment::new(c, config.update_segments))
            .collect();
        let mut bvh = Bvh::new();
        for segment in &segments {
            bvh.add_node(*segment.bounds());
        }
        log::info!("Built map with {} path segments", segments.len());
        Self { segments, bvh }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Total live enemies across the chain
    pub fn live_count(&self) -> usize {
        self.segments.iter().map(|s| s.live_count()).sum()
    }

    /// Insert a new enemy at the head of the chain with full health.
    ///
    /// Spawning into an empty chain or spawning an unregistered kind is a
    /// setup bug and panics.
    pub fn spawn(&mut self, registry: &EnemyRegistry, kind: EnemyId) {
        assert!(!self.segments.is_empty(), "spawn on a map with no segments");
        let stats = registry.stats(kind);
        let slot = self.segments[0].add_enemy(kind, stats.health, 0.0);
        log::trace!("Spawned {kind:?} into segment 0 slot {slot}");
    }

    /// Advance the simulation by one tick.
    ///
    /// Returns the total damage dealt to the base by enemies that completed
    /// the final segment this tick.
    pub fn update(&mut self, registry: &EnemyRegistry, config: &SimConfig, dt: f32) -> f32 {
        let mut damage = 0.0;
        let mut handed_off: Vec<(usize, EnemyInstance)> = Vec::new();

        let last = self.segments.len().saturating_sub(1);
        for i in 0..self.segments.len() {
            let completed = self.segments[i].advance(registry, config.speed_multiplier, dt);
            for enemy in completed {
                if i == last {
                    damage += registry.stats(enemy.kind).damage;
                } else {
                    handed_off.push((i + 1, enemy));
                }
            }
        }

        // Hand-offs are applied after the sweep so an enemy is never
        // advanced twice in one tick.
        for (target, enemy) in handed_off {
            self.segments[target].add_enemy(enemy.kind, enemy.health_left, 0.0);
        }

        damage
    }

    /// Damage one enemy, honoring its kind's resistance mask.
    ///
    /// Returns true when the hit killed it. A kill releases the slot and
    /// spawns the kind's children in place, at the same progress. Hits on
    /// stale slots (already dead or out of range) are ignored.
    pub fn apply_damage(
        &mut self,
        registry: &EnemyRegistry,
        segment: usize,
        slot: usize,
        amount: f32,
        damage_type: DamageType,
    ) -> bool {
        let Some(seg) = self.segments.get_mut(segment) else {
            return false;
        };
        let Some(enemy) = seg.enemy_mut(slot) else {
            return false;
        };
        if !enemy.is_alive {
            return false;
        }

        let kind = enemy.kind;
        let stats = registry.stats(kind);
        if stats.resistance.resists(damage_type) {
            return false;
        }

        enemy.health_left -= amount;
        if enemy.health_left > 0.0 {
            return false;
        }

        let percent = enemy.percent_along_path;
        seg.release_slot(slot);
        for &child in &stats.children {
            let child_stats = registry.stats(child);
            seg.add_enemy(child, child_stats.health, percent);
        }
        log::trace!("Killed {kind:?} in segment {segment} slot {slot}");
        true
    }

    /// Segments whose bounding box contains the point (broad phase only)
    pub fn segments_at(&self, point: Vec2) -> Vec<usize> {
        self.bvh
            .query_point(point)
            .into_iter()
            .map(|id| id.index())
            .collect()
    }

    /// Segments whose bounding box intersects the query box
    pub fn segments_in(&self, bounds: &BoundingBox) -> Vec<usize> {
        self.bvh
            .query_box(bounds)
            .into_iter()
            .map(|id| id.index())
            .collect()
    }

    /// Stitched tessellation of the whole lane at the given line thickness
    pub fn mesh_data(&self, config: &SimConfig, thickness: f32) -> MeshData {
        let mut mesh = MeshData::default();
        for segment in &self.segments {
            mesh.with(segment.curve().to_mesh(config.draw_segments, thickness));
        }
        mesh
    }

    /// Debug draw: lane mesh plus a marker per live enemy. Pure pass-through,
    /// no simulation state changes.
    pub fn draw(&self, renderer: &mut dyn ShapeRenderer, config: &SimConfig) {
        let mesh = self.mesh_data(config, 10.0);
        renderer.draw_mesh(&mesh, LANE_COLOR);
        for segment in &self.segments {
            for pos in segment.positions() {
                renderer.draw_marker(pos, ENEMY_MARKER_SIZE, ENEMY_COLOR);
            }
        }
    }
}
