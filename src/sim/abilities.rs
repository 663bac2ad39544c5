//! Player abilities: dash, rapid-fire, circular barrage, knockback pulse
//!
//! Each ability keeps its own cooldown; any combination may be active at once.

use serde::{Deserialize, Serialize};

use super::combat::{attack_direction, fire_projectile};
use super::state::GameState;
use crate::clamp_into;
use crate::tuning::AbilityTuning;

/// Doubles movement speed while active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dash {
    pub level: u32,
    pub cooldown: f32,
    pub max_cooldown: f32,
    pub active: bool,
    /// Seconds left while active
    pub duration: f32,
}

/// Fires a burst of shots at the rapid-fire interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RapidFire {
    pub level: u32,
    pub cooldown: f32,
    pub max_cooldown: f32,
    pub active: bool,
    /// Shots left in the current burst
    pub shots: u32,
}

/// Instantaneous ring of projectiles; level 0 means locked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrage {
    pub level: u32,
    pub cooldown: f32,
    pub max_cooldown: f32,
}

/// Pushes nearby enemies away; deals no damage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Knockback {
    pub level: u32,
    pub cooldown: f32,
    pub max_cooldown: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Abilities {
    pub dash: Dash,
    pub rapid_fire: RapidFire,
    pub barrage: Barrage,
    pub knockback: Knockback,
}

impl Abilities {
    /// Ability state for a player of the given level, all cooldowns ready
    pub fn for_level(level: u32, tuning: &AbilityTuning) -> Self {
        let mut abilities = Self {
            dash: Dash {
                level: 1,
                cooldown: 0.0,
                max_cooldown: tuning.dash_cooldown,
                active: false,
                duration: 0.0,
            },
            rapid_fire: RapidFire {
                level: 1,
                cooldown: 0.0,
                max_cooldown: tuning.rapid_fire_cooldown,
                active: false,
                shots: 0,
            },
            barrage: Barrage {
                level: 0,
                cooldown: 0.0,
                max_cooldown: tuning.barrage_cooldown,
            },
            knockback: Knockback {
                level: 1,
                cooldown: 0.0,
                max_cooldown: tuning.knockback_cooldown,
            },
        };
        abilities.sync_to_level(level, tuning);
        abilities
    }

    /// Level rule: dash/rapid-fire/knockback track the player level,
    /// the barrage unlocks at the unlock level and counts up from 1.
    pub fn sync_to_level(&mut self, level: u32, tuning: &AbilityTuning) {
        let level = level.max(1);
        self.dash.level = level;
        self.rapid_fire.level = level;
        self.knockback.level = level;
        if level >= tuning.barrage_unlock_level {
            self.barrage.level = level - tuning.barrage_unlock_level + 1;
        }
    }

    /// Tick cooldowns and the dash window, flooring everything at zero
    pub fn tick(&mut self, dt: f32) {
        self.dash.cooldown = (self.dash.cooldown - dt).max(0.0);
        self.rapid_fire.cooldown = (self.rapid_fire.cooldown - dt).max(0.0);
        self.barrage.cooldown = (self.barrage.cooldown - dt).max(0.0);
        self.knockback.cooldown = (self.knockback.cooldown - dt).max(0.0);

        if self.dash.active {
            self.dash.duration = (self.dash.duration - dt).max(0.0);
            if self.dash.duration <= 0.0 {
                self.dash.active = false;
            }
        }
    }

    /// Lower any max cooldown above the configured value
    pub fn clamp_max_cooldowns(&mut self, tuning: &AbilityTuning) {
        self.dash.max_cooldown = self.dash.max_cooldown.min(tuning.dash_cooldown);
        self.rapid_fire.max_cooldown = self.rapid_fire.max_cooldown.min(tuning.rapid_fire_cooldown);
        self.barrage.max_cooldown = self.barrage.max_cooldown.min(tuning.barrage_cooldown);
        self.knockback.max_cooldown = self.knockback.max_cooldown.min(tuning.knockback_cooldown);
    }
}

impl Dash {
    pub fn try_activate(&mut self, tuning: &AbilityTuning) -> bool {
        if self.level == 0 || self.cooldown > 0.0 || self.active {
            return false;
        }
        self.cooldown = self.max_cooldown;
        self.active = true;
        self.duration = tuning.dash_base_duration + self.level as f32;
        true
    }
}

impl RapidFire {
    pub fn try_activate(&mut self, tuning: &AbilityTuning) -> bool {
        if self.level == 0 || self.cooldown > 0.0 || self.active {
            return false;
        }
        self.cooldown = self.max_cooldown;
        self.active = true;
        self.shots = tuning.rapid_fire_base_shots + self.level;
        true
    }

    /// Spend one shot, ending the burst on the last one
    pub fn consume_shot(&mut self) {
        self.shots = self.shots.saturating_sub(1);
        if self.shots == 0 {
            self.active = false;
        }
    }
}

impl Barrage {
    pub fn try_activate(&mut self) -> bool {
        if self.level == 0 || self.cooldown > 0.0 {
            return false;
        }
        self.cooldown = self.max_cooldown;
        true
    }

    pub fn projectile_count(&self, tuning: &AbilityTuning) -> u32 {
        tuning.barrage_base_count + tuning.barrage_count_per_level * self.level
    }

    pub fn damage_factor(&self, tuning: &AbilityTuning) -> f32 {
        tuning.barrage_base_damage + tuning.barrage_damage_per_level * self.level as f32
    }
}

impl Knockback {
    pub fn try_activate(&mut self) -> bool {
        if self.level == 0 || self.cooldown > 0.0 {
            return false;
        }
        self.cooldown = self.max_cooldown;
        true
    }
}

pub fn use_dash(state: &mut GameState) -> bool {
    let activated = state.player.abilities.dash.try_activate(&state.tuning.abilities);
    if activated {
        log::debug!("Dash for {:.1}s", state.player.abilities.dash.duration);
    }
    activated
}

pub fn use_rapid_fire(state: &mut GameState) -> bool {
    let activated = state
        .player
        .abilities
        .rapid_fire
        .try_activate(&state.tuning.abilities);
    if activated {
        log::debug!("Rapid-fire with {} shots", state.player.abilities.rapid_fire.shots);
    }
    activated
}

/// Fire the evenly spaced ring of projectiles
pub fn use_barrage(state: &mut GameState) -> bool {
    if !state.player.abilities.barrage.try_activate() {
        return false;
    }

    let tuning = &state.tuning.abilities;
    let barrage = &state.player.abilities.barrage;
    let count = barrage.projectile_count(tuning);
    let damage = state.player.atk * barrage.damage_factor(tuning);

    for i in 0..count {
        let angle = std::f32::consts::TAU * i as f32 / count as f32;
        let dir = glam::Vec2::new(angle.cos(), angle.sin());
        fire_projectile(state, dir, damage);
    }
    log::debug!("Barrage of {} projectiles", count);
    true
}

/// Push every live enemy within range directly away from the player
pub fn use_knockback(state: &mut GameState) -> bool {
    if !state.player.abilities.knockback.try_activate() {
        return false;
    }

    let tuning = &state.tuning.abilities;
    let origin = state.player.center();
    let mut pushed = 0;

    for enemy in state.enemies.iter_mut().filter(|e| !e.dead) {
        let delta = enemy.center() - origin;
        let distance = delta.length();
        if distance <= tuning.knockback_radius && distance > 0.0 {
            let dir = delta / distance;
            enemy.pos = clamp_into(
                enemy.pos + dir * tuning.knockback_distance,
                enemy.size,
                state.arena,
            );
            enemy.hit_cd = tuning.knockback_hit_cooldown;
            pushed += 1;
        }
    }
    log::debug!("Knockback pushed {} enemies", pushed);
    true
}

/// Rapid-fire auto shot: one projectile whenever the attack cooldown allows
pub fn drive_rapid_fire(state: &mut GameState) {
    let rapid = &state.player.abilities.rapid_fire;
    if !rapid.active {
        return;
    }
    if rapid.shots == 0 {
        state.player.abilities.rapid_fire.active = false;
        return;
    }
    if state.player.attack_cd > 0.0 {
        return;
    }

    let dir = attack_direction(state);
    let damage = state.player.atk;
    fire_projectile(state, dir, damage);
    state.player.attack_cd = state.tuning.projectiles.rapid_fire_interval;
    state.player.abilities.rapid_fire.consume_shot();
}
