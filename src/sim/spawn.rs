//! Enemy spawn policy
//!
//! Freshly spawned enemies are scaled by the zone (`max(0, level - 1)`) at
//! spawn time and never rescaled afterwards.

use glam::Vec2;
use rand::Rng;

use super::chapter::Roster;
use super::enemy::{Enemy, EnemyBehavior, EnemyKind};
use super::state::GameState;
use crate::tuning::Tuning;

/// Difficulty zone for a player level
#[inline]
pub fn zone_for_level(level: u32) -> u32 {
    level.saturating_sub(1)
}

/// Build an enemy of `kind` scaled for `player_level`.
///
/// Regular enemies appear just inside a random arena edge; the boss appears
/// centred in the arena.
pub fn spawn_enemy<R: Rng + ?Sized>(
    id: u32,
    kind: EnemyKind,
    player_level: u32,
    arena: Vec2,
    tuning: &Tuning,
    rng: &mut R,
) -> Enemy {
    let zone = zone_for_level(player_level);
    let stats = tuning.enemies.stats.get(kind);
    let size = Vec2::splat(stats.size);

    let pos = if kind.is_boss() {
        arena * 0.5 - size * 0.5
    } else {
        edge_position(arena, tuning.spawn.edge_margin, rng)
    };

    let hp = stats.hp.at(zone);
    Enemy {
        id,
        kind,
        pos,
        size,
        hp,
        max_hp: hp,
        atk: stats.atk.at(zone),
        def: stats.def.floored_at(zone),
        spd: stats.spd.at(zone),
        xp: stats.xp.floored_at(zone) as u32,
        gold: stats.gold.floored_at(zone) as u32,
        hit_cd: 0.0,
        touch_cd: 0.0,
        dead: false,
        behavior: EnemyBehavior::for_kind(kind, &tuning.enemies),
    }
}

/// Uniform point on a random arena edge, `margin` inward
pub fn edge_position<R: Rng + ?Sized>(arena: Vec2, margin: f32, rng: &mut R) -> Vec2 {
    let along_x = rng.random_range(margin..=(arena.x - margin).max(margin));
    let along_y = rng.random_range(margin..=(arena.y - margin).max(margin));
    match rng.random_range(0..4) {
        0 => Vec2::new(along_x, margin),
        1 => Vec2::new(arena.x - margin, along_y),
        2 => Vec2::new(along_x, arena.y - margin),
        _ => Vec2::new(margin, along_y),
    }
}

/// Run the spawn timer and spawn at most one enemy.
///
/// Suppressed entirely outside active chapter play. Returns the spawned kind.
pub fn run_spawn_policy(state: &mut GameState, dt: f32) -> Option<EnemyKind> {
    if state.progress.spawning_suppressed() {
        return None;
    }

    state.spawn_timer -= dt;
    let def = state.progress.def();
    if state.live_enemies() >= def.enemy_cap || state.spawn_timer > 0.0 {
        return None;
    }

    let kind = match def.roster {
        Roster::Single(kind) => Some(kind),
        Roster::Mixed {
            primary,
            secondary,
            primary_chance,
        } => Some(if state.rng.random_bool(primary_chance) {
            primary
        } else {
            secondary
        }),
        Roster::Boss(kind) if !state.progress.boss_spawned => {
            state.progress.boss_spawned = true;
            Some(kind)
        }
        Roster::Boss(_) => None,
    };

    let spawn = &state.tuning.spawn;
    state.spawn_timer = state
        .rng
        .random_range(spawn.interval_min..=spawn.interval_max);

    let kind = kind?;
    let id = state.next_entity_id();
    let enemy = spawn_enemy(
        id,
        kind,
        state.player.level,
        state.arena,
        &state.tuning,
        &mut state.rng,
    );
    log::debug!(
        "Spawned {} #{} at ({:.0}, {:.0}) hp {:.0}",
        kind.as_str(),
        id,
        enemy.pos.x,
        enemy.pos.y,
        enemy.hp
    );
    state.enemies.push(enemy);
    Some(kind)
}
