//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (chain order, then slot order)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod bvh;
pub mod curve;
pub mod enemies;
pub mod map;
pub mod path;
pub mod state;
pub mod tick;

pub use bounds::BoundingBox;
pub use bvh::{Bvh, BvhNode, NodeId};
pub use curve::Curve;
pub use enemies::{DamageMask, DamageType, EnemyId, EnemyKind, EnemyRegistry};
pub use map::Map;
pub use path::{EnemyInstance, PathSegment};
pub use state::{SimPhase, SimState};
pub use tick::{generate_wave, queue_wave, tick, TickOutput};
