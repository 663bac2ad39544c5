//! Bounding boxes, damage rolls and the experience curve
//!
//! Pure helpers shared by every combat path. The only side effect is the
//! injected RNG in `roll_damage`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }
}

/// True iff the two boxes share interior area.
///
/// Boxes that only touch along an edge or corner do not overlap.
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    let a_max = a.max();
    let b_max = b.max();
    a.pos.x < b_max.x && a_max.x > b.pos.x && a.pos.y < b_max.y && a_max.y > b.pos.y
}

/// Lowest multiplier of the damage variance roll
pub const DAMAGE_VARIANCE_MIN: f32 = 0.9;
/// Highest multiplier of the damage variance roll
pub const DAMAGE_VARIANCE_MAX: f32 = 1.1;

/// `max(1, attack - defense)` scaled by a uniform roll in [0.9, 1.1].
///
/// The result is never below 1, however large the defense.
pub fn roll_damage<R: Rng + ?Sized>(attack: f32, defense: f32, rng: &mut R) -> f32 {
    let base = (attack - defense).max(1.0);
    let roll = rng.random_range(DAMAGE_VARIANCE_MIN..=DAMAGE_VARIANCE_MAX);
    (base * roll).max(1.0)
}

/// Experience needed to advance from `level`: `round(10 * level^1.5)`
pub fn experience_to_next(level: u32) -> u32 {
    (10.0 * (level as f64).powf(1.5)).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap_basic() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &boxed(5.0, 5.0, 10.0, 10.0)));
        assert!(overlaps(&a, &boxed(2.0, 2.0, 2.0, 2.0)));
        assert!(!overlaps(&a, &boxed(20.0, 0.0, 5.0, 5.0)));
        assert!(!overlaps(&a, &boxed(0.0, -20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &boxed(10.0, 0.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &boxed(0.0, 10.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &boxed(10.0, 10.0, 1.0, 1.0)));
        assert!(overlaps(&a, &boxed(9.9, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_experience_curve() {
        assert_eq!(experience_to_next(1), 10);
        assert_eq!(experience_to_next(2), 28);
        assert_eq!(experience_to_next(3), 52);
        assert_eq!(experience_to_next(4), 80);
        assert_eq!(experience_to_next(10), 316);
    }

    #[test]
    fn test_damage_floor_against_huge_defense() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let dmg = roll_damage(5.0, 10_000.0, &mut rng);
            assert!((1.0..=1.1).contains(&dmg));
        }
    }

    proptest! {
        #[test]
        fn prop_damage_within_variance(
            attack in 0.0f32..500.0,
            defense in 0.0f32..500.0,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let dmg = roll_damage(attack, defense, &mut rng);
            let base = (attack - defense).max(1.0);
            prop_assert!(dmg >= 1.0);
            prop_assert!(dmg >= base * DAMAGE_VARIANCE_MIN - 1e-3);
            prop_assert!(dmg <= base * DAMAGE_VARIANCE_MAX + 1e-3);
        }

        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            w in 1.0f32..50.0, h in 1.0f32..50.0,
        ) {
            let a = boxed(ax, ay, w, h);
            let b = boxed(bx, by, h, w);
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_experience_curve_strictly_increasing(level in 1u32..500) {
            prop_assert!(experience_to_next(level + 1) > experience_to_next(level));
        }
    }
}
