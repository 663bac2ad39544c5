//! Game state and core simulation types
//!
//! Everything the per-frame tick mutates lives on `GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::abilities::Abilities;
use super::chapter::ChapterProgress;
use super::enemy::{Enemy, EnemyKind};
use super::geometry::{Aabb, experience_to_next};
use crate::consts::*;
use crate::tuning::{AbilityTuning, PlayerTuning, Tuning};

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Show the chapter's introductory narrative (simulation is paused)
    StoryIntro { chapter: u8 },
    /// A chapter became active
    ChapterStarted { chapter: u8 },
    LevelUp { level: u32 },
    EnemyKilled { kind: EnemyKind },
    /// Kill quota met, celebration window opened
    ChapterComplete { chapter: u8 },
    /// Celebration over, waiting for the player to continue
    AwaitingAdvance { next: u8 },
    /// Final boss defeated
    Victory,
    /// Player hp hit zero and the arena was reset
    PlayerDefeated,
}

/// Shop items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopItem {
    Weapon,
    Armor,
    Heal,
}

impl ShopItem {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weapon" | "sword" => Some(ShopItem::Weapon),
            "armor" => Some(ShopItem::Armor),
            "heal" => Some(ShopItem::Heal),
            _ => None,
        }
    }
}

/// Stats that accept allocated points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    Hp,
    Atk,
    Def,
    Spd,
}

impl StatKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hp" => Some(StatKind::Hp),
            "atk" => Some(StatKind::Atk),
            "def" => Some(StatKind::Def),
            "spd" => Some(StatKind::Spd),
            _ => None,
        }
    }
}

/// The protagonist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
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
    /// Weapon upgrade tier
    pub weapon: u32,
    /// Armor upgrade tier
    pub armor: u32,
    /// Seconds until the next shot
    pub attack_cd: f32,
    pub facing: Vec2,
    /// Last non-zero movement direction, used to aim with no target
    pub last_move: Vec2,
    pub abilities: Abilities,
}

impl Player {
    pub fn new(tuning: &Tuning, arena: Vec2) -> Self {
        let p = &tuning.player;
        let size = Vec2::splat(p.size);
        Self {
            pos: arena * 0.5 - size * 0.5,
            size,
            hp: p.hp,
            max_hp: p.hp,
            atk: p.atk,
            def: p.def,
            spd: p.spd,
            level: 1,
            xp: 0,
            xp_to_next: experience_to_next(1),
            stat_points: 0,
            gold: 0,
            weapon: 0,
            armor: 0,
            attack_cd: 0.0,
            facing: Vec2::X,
            last_move: Vec2::X,
            abilities: Abilities::for_level(1, &tuning.abilities),
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Place the player's box centred in the arena
    pub fn recenter(&mut self, arena: Vec2) {
        self.pos = arena * 0.5 - self.size * 0.5;
    }

    /// Add experience, applying every level-up it pays for.
    ///
    /// Returns the number of levels gained.
    pub fn gain_experience(
        &mut self,
        amount: u32,
        growth: &PlayerTuning,
        abilities: &AbilityTuning,
    ) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        while self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level += 1;
            self.stat_points += growth.level_stat_points;
            self.xp_to_next = experience_to_next(self.level);

            self.max_hp += growth.level_hp;
            self.hp = self.max_hp;
            self.atk += growth.level_atk;
            self.def += growth.level_def;
            self.spd += growth.level_spd;

            self.abilities.sync_to_level(self.level, abilities);
            gained += 1;
        }
        gained
    }

    /// Buy from the shop; silently ignored without enough currency
    pub fn purchase(&mut self, item: ShopItem, shop: &PlayerTuning) {
        match item {
            ShopItem::Weapon if self.gold >= shop.weapon_cost => {
                self.gold -= shop.weapon_cost;
                self.atk += shop.weapon_atk;
                self.weapon += 1;
            }
            ShopItem::Armor if self.gold >= shop.armor_cost => {
                self.gold -= shop.armor_cost;
                self.def += shop.armor_def;
                self.armor += 1;
            }
            ShopItem::Heal if self.gold >= shop.heal_cost => {
                self.gold -= shop.heal_cost;
                self.hp = self.max_hp;
            }
            _ => {}
        }
    }

    /// Spend one unspent stat point; silently ignored with none left
    pub fn allocate_stat_point(&mut self, stat: StatKind, points: &PlayerTuning) {
        if self.stat_points == 0 {
            return;
        }
        match stat {
            StatKind::Hp => {
                self.max_hp += points.point_hp;
                self.hp = self.max_hp;
            }
            StatKind::Atk => self.atk += points.point_atk,
            StatKind::Def => self.def += points.point_def,
            StatKind::Spd => self.spd += points.point_spd,
        }
        self.stat_points -= 1;
    }
}

/// A projectile, player- or enemy-owned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub damage: f32,
    /// Seconds left before expiry
    pub life: f32,
    pub dead: bool,
}

impl Projectile {
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Move and age the projectile; marks it dead when it expires or leaves
    /// the arena by more than the margin. Returns whether it is still live.
    pub fn advance(&mut self, dt: f32, arena: Vec2) -> bool {
        self.pos += self.vel * dt;
        self.life -= dt;

        let m = OUT_OF_BOUNDS_MARGIN;
        let outside = self.pos.x < -m
            || self.pos.x > arena.x + m
            || self.pos.y < -m
            || self.pos.y > arena.y + m;
        if self.life <= 0.0 || outside {
            self.dead = true;
        }
        !self.dead
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Arena size; the arena spans `[0, arena]`
    pub arena: Vec2,
    /// While set, `tick` does nothing
    pub paused: bool,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    /// Seconds until the next spawn attempt
    pub spawn_timer: f32,
    pub progress: ChapterProgress,
    /// Pending notifications for the presentation layer.
    ///
    /// Nothing here drains the queue; the embedder must take it every frame
    /// (`Game::drain_events`) or it grows for the whole session.
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with default balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game with custom balance; invalid tuning falls back to
    /// the defaults
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Using default tuning: {}", e);
                Tuning::default()
            }
        };
        let arena = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT);
        let player = Player::new(&tuning, arena);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            arena,
            paused: false,
            player,
            enemies: Vec::new(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            spawn_timer: 0.0,
            progress: ChapterProgress::new(),
            events: Vec::new(),
            next_id: 1,
        };

        state.show_chapter_story();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Remove every enemy and projectile
    pub fn clear_arena(&mut self) {
        self.enemies.clear();
        self.player_projectiles.clear();
        self.enemy_projectiles.clear();
    }

    /// Present the current chapter's intro once, pausing until dismissed
    pub fn show_chapter_story(&mut self) {
        if self.progress.story_shown {
            return;
        }
        self.progress.story_shown = true;
        self.paused = true;
        self.events.push(GameEvent::StoryIntro {
            chapter: self.progress.chapter,
        });
    }

    /// Live (not dead) enemy count
    pub fn live_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| !e.dead).count()
    }
}
