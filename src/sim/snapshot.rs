//! Versioned plain-data snapshot for save/load
//!
//! Only the player, chapter and kill state are captured. Enemies and
//! projectiles are never saved; importing clears them so a load can't land
//! the player in an instant hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::abilities::Abilities;
use super::chapter::{ChapterPhase, KillCounts};
use super::geometry::experience_to_next;
use super::state::GameState;
use crate::consts::{FINAL_CHAPTER, SNAPSHOT_VERSION};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub atk: f32,
    pub def: f32,
    pub spd: f32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub stat_points: u32,
    pub gold: u32,
    pub weapon: u32,
    pub armor: u32,
    /// Absent in legacy saves; rebuilt from the level on import
    #[serde(default)]
    pub abilities: Option<Abilities>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotV1 {
    pub version: u32,
    pub player: PlayerSnapshot,
    pub chapter: u8,
    #[serde(default)]
    pub kill_counts: KillCounts,
    #[serde(default)]
    pub story_shown: bool,
}

/// Capture the persistent part of the simulation
pub fn export_snapshot(state: &GameState) -> SnapshotV1 {
    let p = &state.player;
    SnapshotV1 {
        version: SNAPSHOT_VERSION,
        player: PlayerSnapshot {
            pos: p.pos,
            hp: p.hp,
            max_hp: p.max_hp,
            atk: p.atk,
            def: p.def,
            spd: p.spd,
            level: p.level,
            xp: p.xp,
            xp_to_next: p.xp_to_next,
            stat_points: p.stat_points,
            gold: p.gold,
            weapon: p.weapon,
            armor: p.armor,
            abilities: Some(p.abilities.clone()),
        },
        chapter: state.progress.chapter,
        kill_counts: state.progress.kills.clone(),
        story_shown: state.progress.story_shown,
    }
}

/// Overwrite player and chapter state from a snapshot.
///
/// Absent or wrong-version data is discarded; returns whether it was applied.
pub fn import_snapshot(state: &mut GameState, snapshot: Option<&SnapshotV1>) -> bool {
    let Some(snapshot) = snapshot else {
        log::warn!("No snapshot to import");
        return false;
    };
    if snapshot.version != SNAPSHOT_VERSION {
        log::warn!(
            "Discarding snapshot version {} (expected {})",
            snapshot.version,
            SNAPSHOT_VERSION
        );
        return false;
    }

    let saved = &snapshot.player;
    let tuning = &state.tuning.abilities;
    let p = &mut state.player;
    p.pos = saved.pos;
    p.hp = saved.hp.min(saved.max_hp);
    p.max_hp = saved.max_hp;
    p.atk = saved.atk;
    p.def = saved.def;
    p.spd = saved.spd;
    p.level = saved.level.max(1);
    p.xp = saved.xp;
    p.xp_to_next = experience_to_next(p.level);
    p.stat_points = saved.stat_points;
    p.gold = saved.gold;
    p.weapon = saved.weapon;
    p.armor = saved.armor;
    p.abilities = match &saved.abilities {
        Some(abilities) => {
            let mut abilities = abilities.clone();
            abilities.clamp_max_cooldowns(tuning);
            abilities
        }
        None => Abilities::for_level(p.level, tuning),
    };

    let progress = &mut state.progress;
    progress.chapter = snapshot.chapter.clamp(1, FINAL_CHAPTER);
    progress.kills = snapshot.kill_counts.clone();
    progress.story_shown = snapshot.story_shown;
    progress.phase = ChapterPhase::InChapter;
    progress.boss_spawned = false;

    state.clear_arena();
    log::info!(
        "Loaded snapshot: level {} in chapter {}",
        state.player.level,
        state.progress.chapter
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EnemyKind;
    use crate::sim::combat::fire_projectile;
    use crate::sim::spawn::spawn_enemy;

    fn played_state() -> GameState {
        let mut state = GameState::new(4);
        state.paused = false;
        let tuning = state.tuning.clone();
        state.player.gain_experience(200, &tuning.player, &tuning.abilities);
        state.player.gold = 37;
        state.player.weapon = 2;
        state.player.pos = Vec2::new(120.0, 340.0);
        state.player.abilities.dash.cooldown = 1.25;
        state.progress.chapter = 3;
        state.progress.kills.slimes = 20;
        state.progress.kills.orcs = 15;
        state.progress.kills.fire_bats = 4;
        state
    }

    #[test]
    fn test_round_trip() {
        let state = played_state();
        let snapshot = export_snapshot(&state);

        let mut restored = GameState::new(99);
        assert!(import_snapshot(&mut restored, Some(&snapshot)));

        assert_eq!(restored.player.pos, state.player.pos);
        assert_eq!(restored.player.hp, state.player.hp);
        assert_eq!(restored.player.max_hp, state.player.max_hp);
        assert_eq!(restored.player.atk, state.player.atk);
        assert_eq!(restored.player.level, state.player.level);
        assert_eq!(restored.player.xp, state.player.xp);
        assert_eq!(restored.player.xp_to_next, state.player.xp_to_next);
        assert_eq!(restored.player.gold, 37);
        assert_eq!(restored.player.weapon, 2);
        assert_eq!(restored.player.abilities, state.player.abilities);
        assert_eq!(restored.progress.chapter, 3);
        assert_eq!(restored.progress.kills, state.progress.kills);
        assert_eq!(export_snapshot(&restored), snapshot);
    }

    #[test]
    fn test_import_clears_arena() {
        let snapshot = export_snapshot(&played_state());
        let mut state = GameState::new(8);
        let id = state.next_entity_id();
        let enemy = spawn_enemy(id, EnemyKind::Slime, 1, state.arena, &state.tuning, &mut state.rng);
        state.enemies.push(enemy);
        fire_projectile(&mut state, Vec2::X, 5.0);

        assert!(import_snapshot(&mut state, Some(&snapshot)));
        assert!(state.enemies.is_empty());
        assert!(state.player_projectiles.is_empty());
        assert!(state.enemy_projectiles.is_empty());
    }

    #[test]
    fn test_rejects_missing_and_wrong_version() {
        let mut state = GameState::new(8);
        let before = state.player.clone();
        assert!(!import_snapshot(&mut state, None));

        let mut snapshot = export_snapshot(&played_state());
        snapshot.version = 2;
        assert!(!import_snapshot(&mut state, Some(&snapshot)));
        assert_eq!(state.player, before);
        assert_eq!(state.progress.chapter, 1);
    }

    #[test]
    fn test_legacy_abilities_rebuilt_from_level() {
        let mut snapshot = export_snapshot(&played_state());
        snapshot.player.abilities = None;
        snapshot.player.level = 9;

        let mut state = GameState::new(8);
        assert!(import_snapshot(&mut state, Some(&snapshot)));
        let a = &state.player.abilities;
        assert_eq!(a.dash.level, 9);
        assert_eq!(a.rapid_fire.level, 9);
        assert_eq!(a.knockback.level, 9);
        assert_eq!(a.barrage.level, 3);
        assert_eq!(a.dash.cooldown, 0.0);
        assert_eq!(state.player.xp_to_next, experience_to_next(9));
    }

    #[test]
    fn test_stale_max_cooldowns_lowered() {
        let mut snapshot = export_snapshot(&played_state());
        if let Some(abilities) = snapshot.player.abilities.as_mut() {
            abilities.dash.max_cooldown = 8.0;
            abilities.knockback.max_cooldown = 0.5;
        }
        let mut state = GameState::new(8);
        assert!(import_snapshot(&mut state, Some(&snapshot)));
        assert_eq!(state.player.abilities.dash.max_cooldown, 2.5);
        assert_eq!(state.player.abilities.knockback.max_cooldown, 0.5);
    }
}
