//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame delta, clamped by the caller
//! - Seeded RNG only
//! - Stable iteration order (insertion order, IDs ascending)
//! - No rendering, input or storage dependencies

pub mod abilities;
pub mod chapter;
pub mod combat;
pub mod enemy;
pub mod geometry;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use abilities::{Abilities, Barrage, Dash, Knockback, RapidFire};
pub use chapter::{CHAPTERS, ChapterDef, ChapterPhase, ChapterProgress, KillCounts, chapter_def};
pub use enemy::{Enemy, EnemyBehavior, EnemyKind};
pub use geometry::{Aabb, experience_to_next, overlaps, roll_damage};
pub use snapshot::{PlayerSnapshot, SnapshotV1, export_snapshot, import_snapshot};
pub use spawn::spawn_enemy;
pub use state::{GameEvent, GameState, Player, Projectile, ShopItem, StatKind};
pub use tick::{TickInput, advance_chapter, tick};
