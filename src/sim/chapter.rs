//! Chapter progression state machine
//!
//! `InChapter -> Celebrating -> AwaitingAdvance -> InChapter(n + 1)` for
//! chapters 1-4; the final chapter ends in `Victory`. The celebration window
//! closes on its own, the advance only on an explicit acknowledgment.

use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use crate::consts::FINAL_CHAPTER;

/// Confirmed kills per enemy kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KillCounts {
    pub slimes: u32,
    pub orcs: u32,
    pub fire_bats: u32,
    pub lava_giants: u32,
    pub ice_archers: u32,
    pub ice_knights: u32,
    pub demon_lord: u32,
}

impl KillCounts {
    pub fn get(&self, kind: EnemyKind) -> u32 {
        match kind {
            EnemyKind::Slime => self.slimes,
            EnemyKind::Orc => self.orcs,
            EnemyKind::FireBat => self.fire_bats,
            EnemyKind::LavaGiant => self.lava_giants,
            EnemyKind::IceArcher => self.ice_archers,
            EnemyKind::IceKnight => self.ice_knights,
            EnemyKind::DemonLord => self.demon_lord,
        }
    }

    pub fn record(&mut self, kind: EnemyKind) {
        let counter = match kind {
            EnemyKind::Slime => &mut self.slimes,
            EnemyKind::Orc => &mut self.orcs,
            EnemyKind::FireBat => &mut self.fire_bats,
            EnemyKind::LavaGiant => &mut self.lava_giants,
            EnemyKind::IceArcher => &mut self.ice_archers,
            EnemyKind::IceKnight => &mut self.ice_knights,
            EnemyKind::DemonLord => &mut self.demon_lord,
        };
        *counter += 1;
    }
}

/// How a chapter picks which enemy to spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roster {
    Single(EnemyKind),
    /// `primary` with the given probability, otherwise `secondary`
    Mixed {
        primary: EnemyKind,
        secondary: EnemyKind,
        primary_chance: f64,
    },
    /// One boss per chapter activation
    Boss(EnemyKind),
}

/// Static description of one chapter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChapterDef {
    pub number: u8,
    pub title: &'static str,
    pub objective: &'static str,
    pub roster: Roster,
    /// Every `(kind, count)` must be reached to complete the chapter
    pub quota: &'static [(EnemyKind, u32)],
    /// Maximum live enemies
    pub enemy_cap: usize,
}

impl ChapterDef {
    pub fn quota_met(&self, kills: &KillCounts) -> bool {
        self.quota.iter().all(|&(kind, count)| kills.get(kind) >= count)
    }
}

pub const CHAPTERS: [ChapterDef; 5] = [
    ChapterDef {
        number: 1,
        title: "Chapter 1: Misty Forest Outskirts",
        objective: "Clear 20 corrupted slimes.",
        roster: Roster::Single(EnemyKind::Slime),
        quota: &[(EnemyKind::Slime, 20)],
        enemy_cap: 6,
    },
    ChapterDef {
        number: 2,
        title: "Chapter 2: The Wailing Abyss",
        objective: "Defeat 15 fallen orcs.",
        roster: Roster::Single(EnemyKind::Orc),
        quota: &[(EnemyKind::Orc, 15)],
        enemy_cap: 8,
    },
    ChapterDef {
        number: 3,
        title: "Chapter 3: Flame Ridge",
        objective: "Destroy 20 fire bats and 10 lava giants.",
        roster: Roster::Mixed {
            primary: EnemyKind::FireBat,
            secondary: EnemyKind::LavaGiant,
            primary_chance: 0.6,
        },
        quota: &[(EnemyKind::FireBat, 20), (EnemyKind::LavaGiant, 10)],
        enemy_cap: 8,
    },
    ChapterDef {
        number: 4,
        title: "Chapter 4: Frost Fortress",
        objective: "Defeat 20 ice archers and 10 ice knights.",
        roster: Roster::Mixed {
            primary: EnemyKind::IceArcher,
            secondary: EnemyKind::IceKnight,
            primary_chance: 0.65,
        },
        quota: &[(EnemyKind::IceArcher, 20), (EnemyKind::IceKnight, 10)],
        enemy_cap: 10,
    },
    ChapterDef {
        number: 5,
        title: "Chapter 5: The Demon Castle",
        objective: "Defeat the Demon Lord.",
        roster: Roster::Boss(EnemyKind::DemonLord),
        quota: &[(EnemyKind::DemonLord, 1)],
        enemy_cap: 10,
    },
];

/// Look up a chapter (clamped into 1..=5)
pub fn chapter_def(chapter: u8) -> &'static ChapterDef {
    let index = chapter.clamp(1, FINAL_CHAPTER) as usize - 1;
    &CHAPTERS[index]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChapterPhase {
    InChapter,
    /// Quota met; the countdown closes the celebration window
    Celebrating { remaining: f32, next: u8 },
    /// Waiting for an explicit acknowledgment to enter `next`
    AwaitingAdvance { next: u8 },
    /// Final boss defeated
    Victory,
}

/// Outcome of a kill-quota check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Celebration started; next chapter pending
    Chapter { completed: u8, next: u8 },
    Victory,
}

/// Per-session chapter bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterProgress {
    /// Current chapter, 1..=5
    pub chapter: u8,
    pub kills: KillCounts,
    pub story_shown: bool,
    pub phase: ChapterPhase,
    /// The final chapter's boss has been spawned this activation
    pub boss_spawned: bool,
}

impl Default for ChapterProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ChapterProgress {
    pub fn new() -> Self {
        Self {
            chapter: 1,
            kills: KillCounts::default(),
            story_shown: false,
            phase: ChapterPhase::InChapter,
            boss_spawned: false,
        }
    }

    pub fn def(&self) -> &'static ChapterDef {
        chapter_def(self.chapter)
    }

    /// Spawning is off outside of active chapter play
    pub fn spawning_suppressed(&self) -> bool {
        !matches!(self.phase, ChapterPhase::InChapter)
    }

    pub fn is_celebrating(&self) -> bool {
        matches!(self.phase, ChapterPhase::Celebrating { .. })
    }

    pub fn awaiting_advance(&self) -> bool {
        matches!(self.phase, ChapterPhase::AwaitingAdvance { .. })
    }

    /// Count a confirmed kill and check the chapter quota
    pub fn record_kill(&mut self, kind: EnemyKind, celebration_time: f32) -> Option<Completion> {
        self.kills.record(kind);
        self.check_quota(celebration_time)
    }

    /// Quotas use `>=`, so overshooting still completes the chapter
    pub fn check_quota(&mut self, celebration_time: f32) -> Option<Completion> {
        if self.phase != ChapterPhase::InChapter || !self.def().quota_met(&self.kills) {
            return None;
        }

        if self.chapter >= FINAL_CHAPTER {
            self.phase = ChapterPhase::Victory;
            return Some(Completion::Victory);
        }

        let next = self.chapter + 1;
        self.phase = ChapterPhase::Celebrating {
            remaining: celebration_time,
            next,
        };
        Some(Completion::Chapter {
            completed: self.chapter,
            next,
        })
    }

    /// Run the celebration countdown; returns the pending chapter when the
    /// window closes this call.
    pub fn advance_timer(&mut self, dt: f32) -> Option<u8> {
        if let ChapterPhase::Celebrating { remaining, next } = &mut self.phase {
            *remaining -= dt;
            if *remaining <= 0.0 {
                let next = *next;
                self.phase = ChapterPhase::AwaitingAdvance { next };
                return Some(next);
            }
        }
        None
    }

    /// Enter the pending chapter. Ignored unless awaiting confirmation.
    pub fn acknowledge(&mut self) -> Option<u8> {
        let ChapterPhase::AwaitingAdvance { next } = self.phase else {
            return None;
        };
        self.chapter = next;
        self.story_shown = false;
        self.boss_spawned = false;
        self.phase = ChapterPhase::InChapter;
        Some(next)
    }
}
