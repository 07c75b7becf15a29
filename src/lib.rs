//! Brew Catch - drag the crate, catch the drinks, dodge the bombs
//!
//! Core modules:
//! - `sim`: Simulation (falling items, catch detection, puzzle unlocks, game state)
//! - `session`: Drives the sim once per frame, owns timers and restart epochs
//! - `input`: Pointer/touch samples to basket position
//! - `layout`: Viewport-dependent geometry
//! - `tuning`: Data-driven game balance
//! - `fx`: Confetti particles for catch and win bursts

pub mod fx;
pub mod input;
pub mod layout;
pub mod session;
pub mod sim;
pub mod tuning;

pub use input::PointerSample;
pub use layout::{Layout, Viewport};
pub use session::Session;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Puzzle grid is GRID_SIZE x GRID_SIZE pieces
    pub const GRID_SIZE: usize = 4;
    pub const TOTAL_PIECES: usize = GRID_SIZE * GRID_SIZE;
    /// Top row of the puzzle, revealed last
    pub const SECONDARY_PIECES: usize = GRID_SIZE;

    /// Lives at the start of every session
    pub const STARTING_LIVES: u8 = 3;

    /// Largest frame delta fed to the sim (tab switches, breakpoints)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
