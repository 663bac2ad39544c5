//! Per-frame simulation tick
//!
//! Order, every tick: cooldowns, rapid-fire, movement, ability and attack
//! intents, player projectiles, enemies, enemy projectiles, sweep, spawning,
//! chapter timer.

use glam::Vec2;

use super::abilities::{drive_rapid_fire, use_barrage, use_dash, use_knockback, use_rapid_fire};
use super::combat::{
    player_attack, resolve_enemies, resolve_enemy_projectiles, resolve_player_projectiles,
    sweep_dead,
};
use super::spawn::run_spawn_policy;
use super::state::{GameEvent, GameState};
use crate::clamp_into;

/// Debounced input intents for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Normal attack held
    pub attack: bool,
    pub dash: bool,
    pub rapid_fire: bool,
    pub barrage: bool,
    /// Knockback, or "continue" while a chapter advance is pending
    pub knockback_or_advance: bool,
}

impl TickInput {
    /// Normalised movement direction (zero when idle)
    pub fn movement(&self) -> Vec2 {
        let dx = self.right as i32 - self.left as i32;
        let dy = self.down as i32 - self.up as i32;
        Vec2::new(dx as f32, dy as f32).normalize_or_zero()
    }
}

/// Advance the game state by `dt` seconds.
///
/// The caller clamps `dt`; nothing advances while paused.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.paused {
        return;
    }

    let was_celebrating = state.progress.is_celebrating();

    // Cooldowns
    state.player.abilities.tick(dt);
    state.player.attack_cd = (state.player.attack_cd - dt).max(0.0);

    drive_rapid_fire(state);

    move_player(state, input.movement(), dt);

    if input.dash {
        use_dash(state);
    }
    if input.rapid_fire {
        use_rapid_fire(state);
    }
    if input.barrage {
        use_barrage(state);
    }
    if input.knockback_or_advance {
        if state.progress.awaiting_advance() {
            // The new chapter opens paused on its story; nothing else runs
            advance_chapter(state);
            return;
        }
        use_knockback(state);
    }
    if input.attack {
        player_attack(state);
    }

    resolve_player_projectiles(state, dt);
    resolve_enemies(state, dt);
    resolve_enemy_projectiles(state, dt);
    sweep_dead(state);

    run_spawn_policy(state, dt);

    // A celebration that began this tick keeps its full window
    if was_celebrating {
        if let Some(next) = state.progress.advance_timer(dt) {
            log::info!("Celebration over; waiting to enter chapter {}", next);
            state.events.push(GameEvent::AwaitingAdvance { next });
        }
    }
}

fn move_player(state: &mut GameState, dir: Vec2, dt: f32) {
    let player = &mut state.player;
    if dir != Vec2::ZERO {
        player.facing = dir;
        player.last_move = dir;
    }

    let speed = if player.abilities.dash.active {
        player.spd * state.tuning.abilities.dash_speed_multiplier
    } else {
        player.spd
    };
    player.pos = clamp_into(player.pos + dir * speed * dt, player.size, state.arena);
}

/// Enter the pending chapter after the player's acknowledgment.
///
/// Returns false (no-op) unless a chapter advance is pending.
pub fn advance_chapter(state: &mut GameState) -> bool {
    let Some(chapter) = state.progress.acknowledge() else {
        return false;
    };

    state.clear_arena();
    state.spawn_timer = state.tuning.spawn.chapter_start_delay;
    log::info!("Entering chapter {}: {}", chapter, state.progress.def().title);
    state.events.push(GameEvent::ChapterStarted { chapter });
    state.show_chapter_story();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::spawn_enemy;
    use crate::sim::{ChapterPhase, EnemyKind};

    const DT: f32 = 1.0 / 60.0;

    fn active_state() -> GameState {
        let mut state = GameState::new(12345);
        state.paused = false;
        state.events.clear();
        // No spawns unless a test asks for them
        state.spawn_timer = 1.0e9;
        state
    }

    #[test]
    fn test_paused_tick_changes_nothing() {
        let mut state = active_state();
        state.player.abilities.dash.cooldown = 1.0;
        state.player.attack_cd = 0.2;
        state.spawn_timer = 0.7;
        state.paused = true;

        let input = TickInput {
            right: true,
            attack: true,
            dash: true,
            ..Default::default()
        };
        let before = state.player.clone();
        tick(&mut state, &input, 0.05);

        assert_eq!(state.player, before);
        assert_eq!(state.spawn_timer, 0.7);
        assert!(state.enemies.is_empty());
        assert!(state.player_projectiles.is_empty());
    }

    #[test]
    fn test_movement_and_clamp() {
        let mut state = active_state();
        let start = state.player.pos;
        let input = TickInput {
            right: true,
            down: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.05);
        let step = 150.0 * 0.05 / 2f32.sqrt();
        assert!((state.player.pos - (start + Vec2::splat(step))).length() < 1e-3);
        assert!((state.player.last_move - Vec2::splat(1.0 / 2f32.sqrt())).length() < 1e-5);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..400 {
            tick(&mut state, &left, 0.05);
        }
        assert_eq!(state.player.pos.x, 0.0);
        assert_eq!(state.player.last_move, Vec2::new(-1.0, 0.0));

        // Idle keeps the last direction
        tick(&mut state, &TickInput::default(), 0.05);
        assert_eq!(state.player.last_move, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_dash_doubles_speed() {
        let mut state = active_state();
        let start = state.player.pos.x;
        let input = TickInput {
            right: true,
            dash: true,
            ..Default::default()
        };
        // Activation happens after movement on the first tick
        tick(&mut state, &input, 0.01);
        assert!(state.player.abilities.dash.active);
        let first = state.player.pos.x - start;
        assert!((first - 1.5).abs() < 1e-3);

        tick(&mut state, &input, 0.01);
        let second = state.player.pos.x - start - first;
        assert!((second - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_attack_held_fires_on_interval() {
        let mut state = active_state();
        let input = TickInput {
            attack: true,
            ..Default::default()
        };
        for _ in 0..16 {
            tick(&mut state, &input, 0.0625);
        }
        // 1s of fire at 0.25s spacing
        assert_eq!(state.player_projectiles.len(), 4);
    }

    #[test]
    fn test_rapid_fire_burst() {
        let mut state = active_state();
        state.player.abilities.rapid_fire.level = 3;

        let press = TickInput {
            rapid_fire: true,
            ..Default::default()
        };
        tick(&mut state, &press, DT);
        assert!(state.player.abilities.rapid_fire.active);
        assert_eq!(state.player.abilities.rapid_fire.shots, 13);

        let mut fired = 0;
        for _ in 0..100 {
            let before = state.player_projectiles.len();
            tick(&mut state, &TickInput::default(), DT);
            if state.player_projectiles.len() > before {
                fired += 1;
            }
        }
        assert_eq!(fired, 13);
        assert!(!state.player.abilities.rapid_fire.active);
        assert_eq!(state.player.abilities.rapid_fire.shots, 0);
    }

    #[test]
    fn test_knockback_slot_advances_when_pending() {
        let mut state = active_state();
        state.progress.phase = ChapterPhase::AwaitingAdvance { next: 2 };
        state.progress.story_shown = true;
        state.spawn_timer = 0.0;
        let input = TickInput {
            knockback_or_advance: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);

        assert_eq!(state.progress.chapter, 2);
        assert_eq!(state.progress.phase, ChapterPhase::InChapter);
        assert!(state.paused);
        assert_eq!(state.spawn_timer, 1.0);
        assert_eq!(state.player.abilities.knockback.cooldown, 0.0);
        assert!(state.events.contains(&GameEvent::ChapterStarted { chapter: 2 }));
        assert!(state.events.contains(&GameEvent::StoryIntro { chapter: 2 }));
    }

    #[test]
    fn test_celebration_window_closes_after_three_seconds() {
        let mut state = active_state();
        state.progress.kills.slimes = 19;
        let id = state.next_entity_id();
        let mut slime =
            spawn_enemy(id, EnemyKind::Slime, 1, state.arena, &state.tuning, &mut state.rng);
        slime.hp = 0.5;
        slime.spd = 0.0;
        slime.pos = state.player.center() + Vec2::new(60.0, -10.0);
        state.enemies.push(slime);

        let input = TickInput {
            attack: true,
            ..Default::default()
        };
        let mut ticks = 0;
        while !state.progress.is_celebrating() && ticks < 100 {
            tick(&mut state, &input, DT);
            ticks += 1;
        }
        assert_eq!(
            state.progress.phase,
            ChapterPhase::Celebrating { remaining: 3.0, next: 2 }
        );
        assert!(state.enemies.is_empty());

        for _ in 0..47 {
            tick(&mut state, &TickInput::default(), 0.0625);
        }
        assert!(state.progress.is_celebrating());
        tick(&mut state, &TickInput::default(), 0.0625);
        assert_eq!(state.progress.phase, ChapterPhase::AwaitingAdvance { next: 2 });
        assert!(state.events.contains(&GameEvent::AwaitingAdvance { next: 2 }));
        assert!(state.enemies.is_empty());
    }
}
