//! Core types shared across the element engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation ticks per second of game time
pub const TICKS_PER_SECOND: u32 = 20;

/// Convert a duration in seconds into whole simulation ticks
pub fn seconds_to_ticks(seconds: f64) -> u32 {
    (seconds.max(0.0) * TICKS_PER_SECOND as f64).round() as u32
}

/// Identity of a combatant inside the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        EntityId(id)
    }
}

/// A point in world space, measured in blocks
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Position { x, y, z }
    }

    /// Squared distance, cheaper when only comparing against a radius
    pub fn distance_squared(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Whether `other` lies inside a sphere of `radius` around this point
    pub fn is_within(&self, other: &Position, radius: f64) -> bool {
        radius >= 0.0 && self.distance_squared(other) <= radius * radius
    }
}

impl From<[f64; 3]> for Position {
    fn from(p: [f64; 3]) -> Self {
        Position::new(p[0], p[1], p[2])
    }
}
