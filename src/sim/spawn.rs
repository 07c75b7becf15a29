//! Item spawning
//!
//! A fixed-interval clock drops a new item each time it elapses. Kind comes
//! from a weighted table, position from a centred band, and speed creeps up
//! with score.

use rand::Rng;

use super::state::{GameState, Item, ItemKind};
use crate::layout::Layout;
use crate::tuning::Tuning;

/// Weighted kind table: 3 beer, 1 wine, 3 bomb
pub const SPAWN_TABLE: [ItemKind; 7] = [
    ItemKind::Beer,
    ItemKind::Beer,
    ItemKind::Beer,
    ItemKind::Wine,
    ItemKind::Bomb,
    ItemKind::Bomb,
    ItemKind::Bomb,
];

/// Create one item and append it to the active list
pub fn spawn_item(state: &mut GameState, tuning: &Tuning) -> u32 {
    let kind = SPAWN_TABLE[state.rng.random_range(0..SPAWN_TABLE.len())];
    let x = tuning.spawn_x_min + state.rng.random::<f32>() * tuning.spawn_x_span;
    let speed = tuning.speed_min
        + state.rng.random::<f32>() * tuning.speed_span
        + state.score as f32 / tuning.speed_score_divisor;

    let id = state.next_item_id();
    state.items.push(Item {
        id,
        x,
        y: tuning.spawn_y,
        kind,
        speed,
    });
    log::trace!("Spawned {:?} #{} at x={:.1}% speed={:.2}", kind, id, x, speed);
    id
}

/// Fixed-interval spawn clock
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    elapsed: f32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the interval from zero
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Advance the clock by `dt`, spawning once per elapsed interval
    ///
    /// Does nothing (and does not accumulate time) unless the game is
    /// running. Returns how many items were spawned.
    pub fn advance(&mut self, state: &mut GameState, tuning: &Tuning, layout: &Layout, dt: f32) -> usize {
        if !state.is_running() {
            self.elapsed = 0.0;
            return 0;
        }

        self.elapsed += dt;
        let mut spawned = 0;
        while self.elapsed >= layout.spawn_interval {
            self.elapsed -= layout.spawn_interval;
            spawn_item(state, tuning);
            spawned += 1;
        }
        spawned
    }
}
