//! Arena RPG - simulation core for a five-chapter arena action RPG
//!
//! Core modules:
//! - `sim`: Simulation (entities, abilities, combat, spawning, chapter progression)
//! - `game`: Command surface used by input/UI collaborators
//! - `persistence`: Versioned JSON snapshot envelope
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use game::{AbilitySlot, Game, ShopItem, StatKind};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the caller should hand to `update` (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 1600.0;
    pub const ARENA_HEIGHT: f32 = 900.0;

    /// Projectiles outside the arena by more than this are expired
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 50.0;

    /// Snapshot format version; anything else is discarded on import
    pub const SNAPSHOT_VERSION: u32 = 1;
    /// Storage key for collaborators that persist snapshots
    pub const STORAGE_KEY: &str = "arena_rpg_v1";

    /// Number of story chapters
    pub const FINAL_CHAPTER: u8 = 5;
}

/// Unit vector from `from` toward `to`, or `fallback` if they coincide
#[inline]
pub fn direction_or(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    let delta = to - from;
    let len = delta.length();
    if len > 0.0 { delta / len } else { fallback }
}

/// Clamp a box's top-left corner so the whole box stays inside `[0, bounds]`
#[inline]
pub fn clamp_into(pos: Vec2, size: Vec2, bounds: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, (bounds.x - size.x).max(0.0)),
        pos.y.clamp(0.0, (bounds.y - size.y).max(0.0)),
    )
}
