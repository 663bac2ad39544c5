//! Combat resolution
//!
//! Projectile travel and hits, enemy movement and contact damage, enemy
//! ranged fire, kill rewards, and the full-arena reset on player defeat.

use glam::Vec2;
use rand::Rng;

use super::chapter::Completion;
use super::enemy::EnemyKind;
use super::geometry::{overlaps, roll_damage};
use super::state::{GameEvent, GameState, Projectile};
use crate::direction_or;

/// Aim toward the nearest live enemy, else along the last movement
pub fn attack_direction(state: &GameState) -> Vec2 {
    let origin = state.player.center();
    state
        .enemies
        .iter()
        .filter(|e| !e.dead)
        .map(|e| e.center())
        .min_by(|a, b| {
            a.distance_squared(origin)
                .partial_cmp(&b.distance_squared(origin))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|target| direction_or(origin, target, state.player.last_move))
        .unwrap_or(state.player.last_move)
}

/// Spawn a player projectile in front of the player
pub fn fire_projectile(state: &mut GameState, dir: Vec2, damage: f32) {
    let tuning = &state.tuning.projectiles;
    let size = Vec2::splat(tuning.size);
    let center = state.player.center() + dir * tuning.spawn_distance;
    state.player_projectiles.push(Projectile {
        pos: center - size * 0.5,
        vel: dir * tuning.speed,
        size,
        damage: damage * tuning.damage_multiplier,
        life: tuning.lifetime,
        dead: false,
    });
}

/// Normal attack; returns false while the attack cooldown runs
pub fn player_attack(state: &mut GameState) -> bool {
    if state.player.attack_cd > 0.0 {
        return false;
    }
    state.player.attack_cd = state.tuning.projectiles.attack_interval;
    let dir = attack_direction(state);
    let damage = state.player.atk;
    fire_projectile(state, dir, damage);
    true
}

/// Advance player projectiles; each lands on at most one enemy.
///
/// A kill is rewarded on the hit itself, so a quota-completing kill clears
/// the field before the remaining projectiles look for targets.
pub fn resolve_player_projectiles(state: &mut GameState, dt: f32) {
    let hit_cd = state.tuning.enemies.hit_cooldown;
    let mut projectiles = std::mem::take(&mut state.player_projectiles);

    for proj in projectiles.iter_mut().filter(|p| !p.dead) {
        if !proj.advance(dt, state.arena) {
            continue;
        }

        let bounds = proj.bounds();
        let Some(enemy) = state
            .enemies
            .iter_mut()
            .filter(|e| !e.dead)
            .find(|e| overlaps(&bounds, &e.bounds()))
        else {
            continue;
        };

        let dmg = roll_damage(proj.damage, enemy.def, &mut state.rng);
        proj.dead = true;
        if enemy.take_damage(dmg, hit_cd) {
            let (kind, xp, gold) = (enemy.kind, enemy.xp, enemy.gold);
            grant_kill(state, kind, xp, gold);
        }
    }

    projectiles.append(&mut state.player_projectiles);
    state.player_projectiles = projectiles;
}

/// Rewards, kill count and the chapter quota check for one confirmed kill
pub fn grant_kill(state: &mut GameState, kind: EnemyKind, xp: u32, gold: u32) {
    state.player.gold += gold;
    let gained = state
        .player
        .gain_experience(xp, &state.tuning.player, &state.tuning.abilities);
    let level = state.player.level;
    for offset in (0..gained).rev() {
        let reached = level - offset;
        log::info!("Level up! Now level {}", reached);
        state.events.push(GameEvent::LevelUp { level: reached });
    }
    state.events.push(GameEvent::EnemyKilled { kind });

    let celebration = state.tuning.spawn.celebration_time;
    match state.progress.record_kill(kind, celebration) {
        Some(Completion::Chapter { completed, next }) => {
            log::info!("Chapter {} complete, chapter {} pending", completed, next);
            state.enemies.clear();
            state.events.push(GameEvent::ChapterComplete { chapter: completed });
        }
        Some(Completion::Victory) => {
            log::info!("Final boss defeated - victory!");
            state.enemies.clear();
            state.events.push(GameEvent::Victory);
        }
        None => {}
    }
}

/// Move enemies, fire archer arrows and apply contact damage
pub fn resolve_enemies(state: &mut GameState, dt: f32) {
    let player_center = state.player.center();
    let player_bounds = state.player.bounds();
    let tuning = &state.tuning;
    let mut defeated = false;

    for enemy in state.enemies.iter_mut().filter(|e| !e.dead) {
        enemy.hit_cd = (enemy.hit_cd - dt).max(0.0);

        let center = enemy.center();
        let delta = player_center - center;
        let dist = match delta.length() {
            d if d > 0.0 => d,
            _ => 1.0,
        };
        let toward = delta / dist;

        let intent = enemy
            .behavior
            .advance(dt, enemy.spd, toward, dist, &tuning.enemies);
        if let Some(dir) = intent.fire {
            let p = &tuning.projectiles;
            let size = Vec2::splat(p.arrow_size);
            state.enemy_projectiles.push(Projectile {
                pos: center - size * 0.5,
                vel: dir * p.arrow_speed,
                size,
                damage: enemy.atk,
                life: p.arrow_lifetime,
                dead: false,
            });
        }
        enemy.pos += intent.step;

        enemy.touch_cd = (enemy.touch_cd - dt).max(0.0);
        if enemy.touch_cd <= 0.0 && overlaps(&enemy.bounds(), &player_bounds) {
            let dmg = roll_damage(enemy.atk, state.player.def, &mut state.rng);
            state.player.hp -= dmg;
            enemy.touch_cd = tuning.enemies.contact_cooldown;
            if state.player.hp <= 0.0 {
                defeated = true;
                break;
            }
        }
    }

    if defeated {
        defeat_player(state);
    }
}

/// Advance enemy projectiles against the player
pub fn resolve_enemy_projectiles(state: &mut GameState, dt: f32) {
    let player_bounds = state.player.bounds();
    let mut defeated = false;

    for proj in state.enemy_projectiles.iter_mut().filter(|p| !p.dead) {
        if !proj.advance(dt, state.arena) {
            continue;
        }
        if overlaps(&proj.bounds(), &player_bounds) {
            let dmg = roll_damage(proj.damage, state.player.def, &mut state.rng);
            state.player.hp -= dmg;
            proj.dead = true;
            if state.player.hp <= 0.0 {
                defeated = true;
                break;
            }
        }
    }

    if defeated {
        defeat_player(state);
    }
}

/// Respawn at full hp in the arena centre, pay the penalty, wipe the arena
pub fn defeat_player(state: &mut GameState) {
    let penalty = state.tuning.player.death_penalty;
    let player = &mut state.player;
    player.hp = player.max_hp;
    player.gold = player.gold.saturating_sub(penalty);
    player.recenter(state.arena);
    state.clear_arena();
    log::info!("Player defeated; respawned with {} gold", state.player.gold);
    state.events.push(GameEvent::PlayerDefeated);
}

/// Drop dead projectiles now; dead enemies linger for a short random window
pub fn sweep_dead(state: &mut GameState) {
    state.player_projectiles.retain(|p| !p.dead);
    state.enemy_projectiles.retain(|p| !p.dead);

    let chance = state.tuning.enemies.dead_removal_chance;
    let rng = &mut state.rng;
    state.enemies.retain(|e| !e.dead || !rng.random_bool(chance));
}
