//! Enemy entities and their movement behaviors
//!
//! Behavior is picked once at spawn from the enemy kind, so the hot loop never
//! branches on the kind itself.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use crate::tuning::EnemyTuning;

/// The seven enemy kinds, one roster per chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Slime,
    Orc,
    FireBat,
    LavaGiant,
    IceArcher,
    IceKnight,
    DemonLord,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 7] = [
        EnemyKind::Slime,
        EnemyKind::Orc,
        EnemyKind::FireBat,
        EnemyKind::LavaGiant,
        EnemyKind::IceArcher,
        EnemyKind::IceKnight,
        EnemyKind::DemonLord,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Slime => "slime",
            EnemyKind::Orc => "orc",
            EnemyKind::FireBat => "fire_bat",
            EnemyKind::LavaGiant => "lava_giant",
            EnemyKind::IceArcher => "ice_archer",
            EnemyKind::IceKnight => "ice_knight",
            EnemyKind::DemonLord => "demon_lord",
        }
    }

    pub fn is_boss(&self) -> bool {
        *self == EnemyKind::DemonLord
    }
}

/// Per-kind movement/attack state, chosen at spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    /// Walk straight at the player
    Melee,
    /// Melee walker carrying charge state (knights)
    Charger {
        charge_timer: f32,
        charge_cooldown: f32,
        charging: bool,
    },
    /// Keep distance and shoot (archers)
    Kiting {
        attack_timer: f32,
        attack_cooldown: f32,
    },
    /// Final boss: melee movement, phase/skill/summon timers are held but not driven
    Boss {
        phase: u8,
        skill_timer: f32,
        skill_cooldown: f32,
        summon_timer: f32,
    },
}

impl EnemyBehavior {
    pub fn for_kind(kind: EnemyKind, tuning: &EnemyTuning) -> Self {
        match kind {
            EnemyKind::IceArcher => EnemyBehavior::Kiting {
                attack_timer: 0.0,
                attack_cooldown: tuning.archer_attack_cooldown,
            },
            EnemyKind::IceKnight => EnemyBehavior::Charger {
                charge_timer: 0.0,
                charge_cooldown: tuning.knight_charge_cooldown,
                charging: false,
            },
            EnemyKind::DemonLord => EnemyBehavior::Boss {
                phase: 1,
                skill_timer: 0.0,
                skill_cooldown: tuning.boss_skill_cooldown,
                summon_timer: 0.0,
            },
            _ => EnemyBehavior::Melee,
        }
    }

    /// Decide this tick's displacement and whether to shoot.
    ///
    /// `toward` is the unit vector to the player, `dist` the centre distance.
    pub fn advance(
        &mut self,
        dt: f32,
        speed: f32,
        toward: Vec2,
        dist: f32,
        tuning: &EnemyTuning,
    ) -> BehaviorIntent {
        match self {
            EnemyBehavior::Kiting {
                attack_timer,
                attack_cooldown,
            } => {
                *attack_timer -= dt;
                let fire = if dist <= tuning.archer_range && *attack_timer <= 0.0 {
                    *attack_timer = *attack_cooldown;
                    Some(toward)
                } else {
                    None
                };

                let step = if dist > tuning.archer_advance_distance {
                    toward * speed * dt * tuning.archer_advance_factor
                } else if dist < tuning.archer_retreat_distance {
                    -toward * speed * dt * tuning.archer_retreat_factor
                } else {
                    Vec2::ZERO
                };

                BehaviorIntent { step, fire }
            }
            EnemyBehavior::Melee | EnemyBehavior::Charger { .. } | EnemyBehavior::Boss { .. } => {
                BehaviorIntent {
                    step: toward * speed * dt,
                    fire: None,
                }
            }
        }
    }
}

/// Output of one behavior step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorIntent {
    /// Displacement to apply this tick
    pub step: Vec2,
    /// Direction of a ranged shot, if one fires this tick
    pub fire: Option<Vec2>,
}

/// A live or recently-killed enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: f32,
    /// Fixed at spawn
    pub max_hp: f32,
    pub atk: f32,
    pub def: f32,
    pub spd: f32,
    pub xp: u32,
    pub gold: u32,
    /// Hit flash timer (visual only)
    pub hit_cd: f32,
    /// Gate for repeat contact damage
    pub touch_cd: f32,
    pub dead: bool,
    pub behavior: EnemyBehavior,
}

impl Enemy {
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Apply damage; returns true if this hit killed a living enemy
    pub fn take_damage(&mut self, amount: f32, hit_cd: f32) -> bool {
        self.hp -= amount;
        self.hit_cd = hit_cd;
        if self.hp <= 0.0 && !self.dead {
            self.dead = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behavior_selection() {
        let tuning = EnemyTuning::default();
        assert_eq!(
            EnemyBehavior::for_kind(EnemyKind::Slime, &tuning),
            EnemyBehavior::Melee
        );
        assert!(matches!(
            EnemyBehavior::for_kind(EnemyKind::IceArcher, &tuning),
            EnemyBehavior::Kiting { attack_cooldown, .. } if attack_cooldown == 1.5
        ));
        assert!(matches!(
            EnemyBehavior::for_kind(EnemyKind::IceKnight, &tuning),
            EnemyBehavior::Charger { charging: false, .. }
        ));
        assert!(matches!(
            EnemyBehavior::for_kind(EnemyKind::DemonLord, &tuning),
            EnemyBehavior::Boss { phase: 1, .. }
        ));
    }

    #[test]
    fn test_melee_walks_at_full_speed() {
        let tuning = EnemyTuning::default();
        let mut behavior = EnemyBehavior::Melee;
        let intent = behavior.advance(0.5, 100.0, Vec2::X, 300.0, &tuning);
        assert_eq!(intent.step, Vec2::new(50.0, 0.0));
        assert!(intent.fire.is_none());
    }

    #[test]
    fn test_kiting_fires_and_keeps_distance() {
        let tuning = EnemyTuning::default();
        let mut behavior = EnemyBehavior::for_kind(EnemyKind::IceArcher, &tuning);

        // In range, timer elapsed: shoot and advance slowly
        let intent = behavior.advance(0.1, 100.0, Vec2::X, 200.0, &tuning);
        assert_eq!(intent.fire, Some(Vec2::X));
        assert!((intent.step.x - 4.0).abs() < 1e-5);

        // Timer reset, no second shot
        let intent = behavior.advance(0.1, 100.0, Vec2::X, 200.0, &tuning);
        assert!(intent.fire.is_none());

        // Too close: retreat
        let intent = behavior.advance(0.1, 100.0, Vec2::X, 50.0, &tuning);
        assert!(intent.step.x < 0.0);

        // Comfort band: hold position
        let intent = behavior.advance(0.1, 100.0, Vec2::X, 100.0, &tuning);
        assert_eq!(intent.step, Vec2::ZERO);
    }

    #[test]
    fn test_kiting_out_of_range_does_not_fire() {
        let tuning = EnemyTuning::default();
        let mut behavior = EnemyBehavior::for_kind(EnemyKind::IceArcher, &tuning);
        let intent = behavior.advance(0.1, 100.0, Vec2::Y, 400.0, &tuning);
        assert!(intent.fire.is_none());
        assert!(intent.step.y > 0.0);
    }
}
