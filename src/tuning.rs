//! Data-driven game balance
//!
//! `Tuning::default()` is the shipped balance. Collaborators may override any
//! subset of it from JSON; absent fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::EnemyKind;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tuning value out of range: {field}")]
    Invalid { field: &'static str },
}

/// Linear stat curve: `base + per_zone * zone`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatCurve {
    pub base: f32,
    pub per_zone: f32,
}

impl StatCurve {
    pub const fn new(base: f32, per_zone: f32) -> Self {
        Self { base, per_zone }
    }

    pub const fn flat(base: f32) -> Self {
        Self { base, per_zone: 0.0 }
    }

    #[inline]
    pub fn at(&self, zone: u32) -> f32 {
        self.base + self.per_zone * zone as f32
    }

    /// Like `at`, but the zone term is floored before adding the base
    #[inline]
    pub fn floored_at(&self, zone: u32) -> f32 {
        self.base + (self.per_zone * zone as f32).floor()
    }
}

/// Spawn-time stat table row for one enemy kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Square bounding box edge
    pub size: f32,
    pub hp: StatCurve,
    pub atk: StatCurve,
    /// Zone term floored
    pub def: StatCurve,
    pub spd: StatCurve,
    /// Zone term floored
    pub xp: StatCurve,
    /// Zone term floored
    pub gold: StatCurve,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub slime: EnemyStats,
    pub orc: EnemyStats,
    pub fire_bat: EnemyStats,
    pub lava_giant: EnemyStats,
    pub ice_archer: EnemyStats,
    pub ice_knight: EnemyStats,
    pub demon_lord: EnemyStats,
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Slime => &self.slime,
            EnemyKind::Orc => &self.orc,
            EnemyKind::FireBat => &self.fire_bat,
            EnemyKind::LavaGiant => &self.lava_giant,
            EnemyKind::IceArcher => &self.ice_archer,
            EnemyKind::IceKnight => &self.ice_knight,
            EnemyKind::DemonLord => &self.demon_lord,
        }
    }
}

impl Default for EnemyTable {
    fn default() -> Self {
        use StatCurve as C;
        Self {
            slime: EnemyStats {
                size: 20.0,
                hp: C::new(25.0, 2.0),
                atk: C::new(8.0, 1.5),
                def: C::new(3.0, 1.0 / 3.0),
                spd: C::new(70.0, 3.0),
                xp: C::new(4.0, 1.0),
                gold: C::new(2.0, 0.5),
            },
            orc: EnemyStats {
                size: 25.0,
                hp: C::new(150.0, 4.0),
                atk: C::new(15.0, 3.0),
                def: C::new(8.0, 0.5),
                spd: C::new(55.0, 2.0),
                xp: C::new(12.0, 2.0),
                gold: C::new(5.0, 1.5),
            },
            fire_bat: EnemyStats {
                size: 18.0,
                hp: C::new(50.0, 2.0),
                atk: C::new(12.0, 2.0),
                def: C::flat(3.0),
                spd: C::new(120.0, 4.0),
                xp: C::new(6.0, 1.0),
                gold: C::new(5.0, 0.5),
            },
            lava_giant: EnemyStats {
                size: 40.0,
                hp: C::new(300.0, 8.0),
                atk: C::new(25.0, 4.0),
                def: C::new(12.0, 0.8),
                spd: C::new(40.0, 1.5),
                xp: C::new(20.0, 3.0),
                gold: C::new(25.0, 2.0),
            },
            ice_archer: EnemyStats {
                size: 22.0,
                hp: C::new(100.0, 3.0),
                atk: C::new(18.0, 3.0),
                def: C::new(4.0, 1.0 / 3.0),
                spd: C::new(90.0, 2.0),
                xp: C::new(15.0, 2.0),
                gold: C::new(15.0, 1.5),
            },
            ice_knight: EnemyStats {
                size: 30.0,
                hp: C::new(200.0, 6.0),
                atk: C::new(22.0, 4.0),
                def: C::new(10.0, 0.6),
                spd: C::new(60.0, 3.0),
                xp: C::new(25.0, 4.0),
                gold: C::new(40.0, 3.0),
            },
            demon_lord: EnemyStats {
                size: 100.0,
                hp: C::flat(2000.0),
                atk: C::flat(35.0),
                def: C::flat(20.0),
                spd: C::flat(90.0),
                xp: C::flat(1000.0),
                gold: C::flat(500.0),
            },
        }
    }
}

/// Player baseline, growth, shop and stat-point balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub size: f32,
    pub hp: f32,
    pub atk: f32,
    pub def: f32,
    pub spd: f32,

    // === Level up ===
    pub level_hp: f32,
    pub level_atk: f32,
    pub level_def: f32,
    pub level_spd: f32,
    pub level_stat_points: u32,

    // === Stat points ===
    pub point_hp: f32,
    pub point_atk: f32,
    pub point_def: f32,
    pub point_spd: f32,

    // === Shop ===
    pub weapon_cost: u32,
    pub weapon_atk: f32,
    pub armor_cost: u32,
    pub armor_def: f32,
    pub heal_cost: u32,

    /// Currency lost on defeat (floored at 0)
    pub death_penalty: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: 18.0,
            hp: 75.0,
            atk: 12.0,
            def: 5.0,
            spd: 150.0,

            level_hp: 15.0,
            level_atk: 5.0,
            level_def: 3.0,
            level_spd: 5.0,
            level_stat_points: 2,

            point_hp: 100.0,
            point_atk: 20.0,
            point_def: 10.0,
            point_spd: 15.0,

            weapon_cost: 20,
            weapon_atk: 20.0,
            armor_cost: 20,
            armor_def: 15.0,
            heal_cost: 10,

            death_penalty: 10,
        }
    }
}

/// Projectile and attack-timing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Normal attack interval (seconds)
    pub attack_interval: f32,
    /// Rapid-fire shot interval (seconds)
    pub rapid_fire_interval: f32,
    pub size: f32,
    pub speed: f32,
    pub lifetime: f32,
    /// Distance from the player centre where shots appear
    pub spawn_distance: f32,
    /// Payload = requested damage × this
    pub damage_multiplier: f32,

    pub arrow_size: f32,
    pub arrow_speed: f32,
    pub arrow_lifetime: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            attack_interval: 0.25,
            rapid_fire_interval: 0.08,
            size: 10.0,
            speed: 450.0,
            lifetime: 2.0,
            spawn_distance: 25.0,
            damage_multiplier: 1.0,

            arrow_size: 6.0,
            arrow_speed: 200.0,
            arrow_lifetime: 2.5,
        }
    }
}

/// Ability cooldowns and effect constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityTuning {
    pub dash_cooldown: f32,
    pub dash_base_duration: f32,
    pub dash_speed_multiplier: f32,

    pub rapid_fire_cooldown: f32,
    pub rapid_fire_base_shots: u32,

    pub barrage_cooldown: f32,
    pub barrage_base_count: u32,
    pub barrage_count_per_level: u32,
    pub barrage_base_damage: f32,
    pub barrage_damage_per_level: f32,
    /// Player level at which the barrage unlocks
    pub barrage_unlock_level: u32,

    pub knockback_cooldown: f32,
    pub knockback_radius: f32,
    pub knockback_distance: f32,
    pub knockback_hit_cooldown: f32,
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            dash_cooldown: 2.5,
            dash_base_duration: 5.0,
            dash_speed_multiplier: 2.0,

            rapid_fire_cooldown: 4.0,
            rapid_fire_base_shots: 10,

            barrage_cooldown: 6.0,
            barrage_base_count: 8,
            barrage_count_per_level: 2,
            barrage_base_damage: 0.7,
            barrage_damage_per_level: 0.1,
            barrage_unlock_level: 7,

            knockback_cooldown: 1.0,
            knockback_radius: 80.0,
            knockback_distance: 180.0,
            knockback_hit_cooldown: 0.3,
        }
    }
}

/// Enemy behavior timings shared by every kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub stats: EnemyTable,
    /// Delay between repeat contact hits from the same enemy
    pub contact_cooldown: f32,
    /// Visual cooldown applied when a projectile lands
    pub hit_cooldown: f32,
    /// Chance per tick a dead enemy is swept
    pub dead_removal_chance: f64,

    pub archer_range: f32,
    pub archer_attack_cooldown: f32,
    /// Archers close in beyond this distance
    pub archer_advance_distance: f32,
    pub archer_advance_factor: f32,
    /// Archers back off inside this distance
    pub archer_retreat_distance: f32,
    pub archer_retreat_factor: f32,

    pub knight_charge_cooldown: f32,
    pub boss_skill_cooldown: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            stats: EnemyTable::default(),
            contact_cooldown: 0.5,
            hit_cooldown: 0.2,
            dead_removal_chance: 0.002,

            archer_range: 250.0,
            archer_attack_cooldown: 1.5,
            archer_advance_distance: 120.0,
            archer_advance_factor: 0.4,
            archer_retreat_distance: 80.0,
            archer_retreat_factor: 0.5,

            knight_charge_cooldown: 3.0,
            boss_skill_cooldown: 2.5,
        }
    }
}

/// Spawn timer and placement parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub interval_min: f32,
    pub interval_max: f32,
    /// Spawn timer value on entering a new chapter
    pub chapter_start_delay: f32,
    /// Inward offset from the arena edge
    pub edge_margin: f32,
    /// Chapter celebration window (seconds)
    pub celebration_time: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval_min: 0.5,
            interval_max: 1.2,
            chapter_start_delay: 1.0,
            edge_margin: 5.0,
            celebration_time: 3.0,
        }
    }
}

/// Complete balance data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub projectiles: ProjectileTuning,
    pub abilities: AbilityTuning,
    pub enemies: EnemyTuning,
    pub spawn: SpawnTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the spawn and sweep rolls can't sample from
    pub fn validate(&self) -> Result<(), TuningError> {
        let spawn = &self.spawn;
        let invalid = |field: &'static str| Err(TuningError::Invalid { field });

        if !(spawn.interval_min.is_finite() && spawn.interval_min >= 0.0) {
            return invalid("spawn.interval_min");
        }
        if !(spawn.interval_max.is_finite() && spawn.interval_max >= spawn.interval_min) {
            return invalid("spawn.interval_max");
        }
        if !(spawn.edge_margin.is_finite() && spawn.edge_margin >= 0.0) {
            return invalid("spawn.edge_margin");
        }
        if !(0.0..=1.0).contains(&self.enemies.dead_removal_chance) {
            return invalid("enemies.dead_removal_chance");
        }
        Ok(())
    }

    /// Parse an override, falling back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring tuning override: {}", err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floored_curve() {
        let def = StatCurve::new(3.0, 1.0 / 3.0);
        assert_eq!(def.floored_at(0), 3.0);
        assert_eq!(def.floored_at(2), 3.0);
        assert_eq!(def.floored_at(3), 4.0);
        assert_eq!(def.floored_at(6), 5.0);

        let gold = StatCurve::new(5.0, 1.5);
        assert_eq!(gold.floored_at(3), 9.0);
        assert_eq!(gold.at(3), 9.5);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player": { "hp": 200.0 } }"#).unwrap();
        assert_eq!(tuning.player.hp, 200.0);
        assert_eq!(tuning.player.atk, 12.0);
        assert_eq!(tuning.abilities.dash_cooldown, 2.5);
        assert_eq!(tuning.enemies.stats.slime.hp.base, 25.0);
    }

    #[test]
    fn test_out_of_range_override_rejected() {
        let err = Tuning::from_json(r#"{ "spawn": { "interval_min": 2.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "spawn.interval_max"
            }
        ));

        let err = Tuning::from_json(r#"{ "enemies": { "dead_removal_chance": 1.5 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "enemies.dead_removal_chance"
            }
        ));

        let tuning = Tuning::from_json_or_default(r#"{ "spawn": { "interval_min": 2.0 } }"#);
        assert_eq!(tuning.spawn.interval_min, 0.5);
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_bad_override_falls_back() {
        let tuning = Tuning::from_json_or_default("{ not json");
        assert_eq!(tuning.player.hp, 75.0);
        assert!(Tuning::from_json("[1, 2]").is_err());
    }
}
