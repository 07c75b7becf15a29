//! Game state and core simulation types
//!
//! One `GameState` per session. Restart builds a new one.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pieces::PieceSet;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing moves
    Ready,
    /// Active gameplay
    Running,
    /// Out of lives (terminal)
    Lost,
    /// Puzzle revealed and win delay elapsed (terminal)
    Won,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Lost | GamePhase::Won)
    }
}

/// Falling item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Beer,
    Wine,
    Bomb,
}

impl ItemKind {
    pub fn glyph(&self) -> &'static str {
        match self {
            ItemKind::Beer => "🍺",
            ItemKind::Wine => "🍾",
            ItemKind::Bomb => "💣",
        }
    }
}

/// A falling item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    /// Horizontal position, percent of screen width (fixed at spawn)
    pub x: f32,
    /// Vertical position in px (negative = above the screen)
    pub y: f32,
    pub kind: ItemKind,
    /// Multiplier on the base fall rate (fixed at spawn)
    pub speed: f32,
}

/// Confetti request for the effects collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct Burst {
    pub particle_count: u32,
    /// Cone width in degrees, centred on straight up
    pub spread: f32,
    /// Origin as a 0-1 fraction of the viewport
    pub origin: Vec2,
    /// `#rrggbb` colors, empty = default palette
    pub colors: &'static [&'static str],
}

impl Burst {
    pub fn beer(origin: Vec2) -> Self {
        Self {
            particle_count: 10,
            spread: 30.0,
            origin,
            colors: &["#f1c40f", "#ffffff"],
        }
    }

    pub fn wine(origin: Vec2) -> Self {
        Self {
            particle_count: 25,
            spread: 50.0,
            origin,
            colors: &["#e74c3c", "#ffffff"],
        }
    }

    pub fn puzzle_complete() -> Self {
        Self {
            particle_count: 200,
            spread: 100.0,
            origin: Vec2::new(0.5, 0.6),
            colors: &[],
        }
    }
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Beer or wine caught; `score` is the new total
    Caught { id: u32, kind: ItemKind, score: u64 },
    /// Bomb caught; `lives` is what remains
    LifeLost { id: u32, lives: u8 },
    /// Pieces newly revealed by a catch
    PiecesUnlocked { pieces: Vec<u8> },
    /// Fire-and-forget confetti
    Burst(Burst),
    /// Last piece revealed, win screen follows after the delay
    PuzzleComplete,
    GameOver,
    Won,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Epoch of the session this state belongs to
    pub session: u32,
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub pieces: PieceSet,
    /// Basket centre in px, written only by the pointer tracker
    pub basket_x: f32,
    /// Active items, in spawn order
    pub items: Vec<Item>,
    /// Set once the final piece is revealed (one-shot per session)
    pub puzzle_complete: bool,
    /// The tick wants the delayed win scheduled
    pub win_requested: bool,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh session state
    pub fn new(seed: u64, session: u32, basket_x: f32) -> Self {
        Self {
            session,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Ready,
            score: 0,
            lives: STARTING_LIVES,
            pieces: PieceSet::default(),
            basket_x,
            items: Vec::new(),
            puzzle_complete: false,
            win_requested: false,
            events: Vec::new(),
            next_id: 0,
        }
    }

    /// Allocate a new item ID
    pub fn next_item_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::Lost
    }

    pub fn game_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Everything the renderer needs for one frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            unlocked: self.pieces.iter().collect(),
            basket_x: self.basket_x,
            items: self.items.clone(),
        }
    }
}

/// Read-only frame view handed to the rendering collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub unlocked: Vec<u8>,
    pub basket_x: f32,
    pub items: Vec<Item>,
}
