//! Enemy kinds and the registry
//!
//! Kinds are registered once during setup and immutable afterwards; the
//! simulation loop only reads. Lookups of unknown ids are an explicit
//! `None`, never a sentinel stat block a caller could silently run with.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identifier for a registered enemy kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u16);

/// Damage categories, one bit each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum DamageType {
    Physical = 1,
    Fire = 2,
    Frost = 4,
    Poison = 8,
    Shock = 16,
    /// Ignores resistance masks entirely
    Pure = 32,
}

/// Set of damage types an enemy shrugs off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DamageMask(u8);

impl DamageMask {
    pub const NONE: DamageMask = DamageMask(0);

    pub fn of(types: &[DamageType]) -> Self {
        Self(types.iter().fold(0, |acc, t| acc | *t as u8))
    }

    pub fn with(self, damage_type: DamageType) -> Self {
        Self(self.0 | damage_type as u8)
    }

    /// Whether damage of this type is ignored. Pure damage always lands.
    pub fn resists(&self, damage_type: DamageType) -> bool {
        damage_type != DamageType::Pure && (self.0 & damage_type as u8) != 0
    }
}

/// Immutable stat block for one enemy kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyKind {
    /// Name of the texture the renderer should look up
    pub texture: String,
    /// Kinds spawned in place when this enemy is killed
    pub children: Vec<EnemyId>,
    /// Damage types this kind is immune to
    pub resistance: DamageMask,
    pub health: f32,
    /// Damage dealt to the base on reaching the end of the lane
    pub damage: f32,
    /// Path speed in world units per second
    pub speed: f32,
}

impl EnemyKind {
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            texture: texture.into(),
            children: Vec::new(),
            resistance: DamageMask::NONE,
            health: 1.0,
            damage: 1.0,
            speed: 1.0,
        }
    }

    pub fn with_children(mut self, children: Vec<EnemyId>) -> Self {
        self.children = children;
        self
    }

    pub fn with_resistance(mut self, resistance: DamageMask) -> Self {
        self.resistance = resistance;
        self
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health;
        self
    }

    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

/// Append-only table of enemy kinds, populated before the tick loop starts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyRegistry {
    kinds: HashMap<EnemyId, EnemyKind>,
}

impl EnemyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind. Re-registering an id is a setup bug.
    pub fn register(&mut self, id: EnemyId, kind: EnemyKind) {
        log::debug!("Registering enemy kind {:?} ({})", id, kind.texture);
        let previous = self.kinds.insert(id, kind);
        assert!(
            previous.is_none(),
            "enemy kind {id:?} registered twice"
        );
    }

    /// Stat block for a kind, `None` when the id was never registered
    pub fn get(&self, id: EnemyId) -> Option<&EnemyKind> {
        self.kinds.get(&id)
    }

    /// Stat block for a kind that must exist. Spawning or simulating an
    /// unregistered kind is a programming error and fails loudly here.
    pub fn stats(&self, id: EnemyId) -> &EnemyKind {
        match self.kinds.get(&id) {
            Some(kind) => kind,
            None => panic!("enemy kind {id:?} is not registered"),
        }
    }

    pub fn is_registered(&self, id: EnemyId) -> bool {
        self.kinds.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = EnemyRegistry::new();
        let id = EnemyId(0);
        registry.register(id, EnemyKind::new("runner").with_speed(10.0));

        let kind = registry.get(id).unwrap();
        assert_eq!(kind.texture, "runner");
        assert_eq!(kind.speed, 10.0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregistered_lookup_is_none() {
        let registry = EnemyRegistry::new();
        assert!(registry.get(EnemyId(42)).is_none());
        assert!(!registry.is_registered(EnemyId(42)));
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn test_stats_panics_on_unknown_kind() {
        let registry = EnemyRegistry::new();
        registry.stats(EnemyId(7));
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_double_registration_panics() {
        let mut registry = EnemyRegistry::new();
        registry.register(EnemyId(1), EnemyKind::new("a"));
        registry.register(EnemyId(1), EnemyKind::new("b"));
    }

    #[test]
    fn test_damage_mask() {
        let mask = DamageMask::of(&[DamageType::Fire]).with(DamageType::Frost);
        assert_eq!(mask, DamageMask::of(&[DamageType::Fire, DamageType::Frost]));
        assert!(mask.resists(DamageType::Fire));
        assert!(mask.resists(DamageType::Frost));
        assert!(!mask.resists(DamageType::Physical));
        // Pure cuts through any mask
        let all = DamageMask::of(&[
            DamageType::Physical,
            DamageType::Fire,
            DamageType::Frost,
            DamageType::Poison,
            DamageType::Shock,
            DamageType::Pure,
        ]);
        assert!(!all.resists(DamageType::Pure));
    }
}
