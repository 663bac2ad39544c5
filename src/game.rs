//! Game object: the command surface used by input and UI collaborators
//!
//! Input intents are latched here and handed to the simulation on every
//! `update`. Everything else is a direct, synchronous command.

use crate::persistence::{self, SnapshotError};
use crate::sim::abilities::{use_barrage, use_dash, use_knockback, use_rapid_fire};
use crate::sim::{
    GameEvent, GameState, Player, SnapshotV1, TickInput, advance_chapter, export_snapshot,
    import_snapshot, tick,
};
use crate::tuning::Tuning;

pub use crate::sim::state::{ShopItem, StatKind};

/// Ability input slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilitySlot {
    Dash,
    RapidFire,
    Barrage,
    /// Knockback, or "continue" while a chapter advance is pending
    KnockbackOrAdvance,
}

impl AbilitySlot {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dash" => Some(AbilitySlot::Dash),
            "rapidfire" | "rapid_fire" => Some(AbilitySlot::RapidFire),
            "barrage" => Some(AbilitySlot::Barrage),
            "knockback" | "knockbackoradvance" | "advance" => {
                Some(AbilitySlot::KnockbackOrAdvance)
            }
            _ => None,
        }
    }
}

/// Game instance holding all state
pub struct Game {
    state: GameState,
    input: TickInput,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        log::info!("New game with seed {}", seed);
        Self {
            state: GameState::with_tuning(seed, tuning),
            input: TickInput::default(),
        }
    }

    /// Start over with a fresh seed, keeping the current tuning
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.state.tuning.clone();
        *self = Self::with_tuning(seed, tuning);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn set_movement_intent(&mut self, up: bool, down: bool, left: bool, right: bool) {
        self.input.up = up;
        self.input.down = down;
        self.input.left = left;
        self.input.right = right;
    }

    pub fn set_attack_intent(&mut self, pressed: bool) {
        self.input.attack = pressed;
    }

    pub fn set_ability_intent(&mut self, slot: AbilitySlot, pressed: bool) {
        match slot {
            AbilitySlot::Dash => self.input.dash = pressed,
            AbilitySlot::RapidFire => self.input.rapid_fire = pressed,
            AbilitySlot::Barrage => self.input.barrage = pressed,
            AbilitySlot::KnockbackOrAdvance => self.input.knockback_or_advance = pressed,
        }
    }

    /// Advance one frame. `dt` must already be clamped by the caller.
    pub fn update(&mut self, dt: f32) {
        tick(&mut self.state, &self.input, dt);
    }

    /// Try to activate an ability right now; false if rejected
    pub fn activate_ability(&mut self, slot: AbilitySlot) -> bool {
        if self.state.paused {
            return false;
        }
        match slot {
            AbilitySlot::Dash => use_dash(&mut self.state),
            AbilitySlot::RapidFire => use_rapid_fire(&mut self.state),
            AbilitySlot::Barrage => use_barrage(&mut self.state),
            AbilitySlot::KnockbackOrAdvance => {
                if self.state.progress.awaiting_advance() {
                    advance_chapter(&mut self.state)
                } else {
                    use_knockback(&mut self.state)
                }
            }
        }
    }

    /// Enter the pending chapter. No-op unless an advance is pending.
    pub fn acknowledge(&mut self) -> bool {
        advance_chapter(&mut self.state)
    }

    /// Resume after the chapter story has been presented
    pub fn dismiss_story(&mut self) {
        self.state.paused = false;
    }

    /// Set or flip the pause flag; returns the resulting state
    pub fn toggle_pause(&mut self, explicit: Option<bool>) -> bool {
        self.state.paused = explicit.unwrap_or(!self.state.paused);
        log::debug!("Paused: {}", self.state.paused);
        self.state.paused
    }

    /// Buy a shop item; silently ignored without enough gold
    pub fn purchase(&mut self, item: ShopItem) {
        self.state.player.purchase(item, &self.state.tuning.player);
    }

    /// Spend one stat point; silently ignored with none available
    pub fn allocate_stat_point(&mut self, stat: StatKind) {
        self.state
            .player
            .allocate_stat_point(stat, &self.state.tuning.player);
    }

    /// Take every pending presentation event. Call once per frame; the
    /// queue is never trimmed otherwise.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn export_snapshot(&self) -> SnapshotV1 {
        export_snapshot(&self.state)
    }

    /// Apply a snapshot; absent or wrong-version data is discarded
    pub fn import_snapshot(&mut self, snapshot: Option<&SnapshotV1>) {
        import_snapshot(&mut self.state, snapshot);
    }

    pub fn save_json(&self) -> Result<String, SnapshotError> {
        persistence::encode(&self.export_snapshot())
    }

    /// Load a JSON snapshot. Bad data is logged and discarded.
    pub fn load_json(&mut self, json: &str) -> bool {
        match persistence::decode(json) {
            Ok(snapshot) => import_snapshot(&mut self.state, Some(&snapshot)),
            Err(e) => {
                log::warn!("Ignoring saved game: {}", e);
                false
            }
        }
    }
}
