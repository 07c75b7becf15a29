//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (one per session)
//! - Items processed in spawn order
//! - No rendering or platform dependencies

pub mod catch;
pub mod pieces;
pub mod spawn;
pub mod state;
pub mod tick;

pub use catch::CatchZone;
pub use pieces::{PieceSet, unlock};
pub use spawn::{SPAWN_TABLE, Spawner, spawn_item};
pub use state::{Burst, GameEvent, GamePhase, GameState, Item, ItemKind, Snapshot};
pub use tick::tick;
