//! Pointer tracking
//!
//! Mouse and touch both steer the basket. The raw horizontal coordinate is
//! passed through verbatim, no smoothing or clamping.

use crate::sim::GameState;

/// One raw input event from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSample<'a> {
    /// Mouse/pointer move, client x in px
    Mouse { client_x: f32 },
    /// Touch start or move, client x of every active touch point
    Touch { client_xs: &'a [f32] },
}

impl PointerSample<'_> {
    /// Horizontal coordinate for the basket (first touch wins)
    pub fn horizontal(&self) -> Option<f32> {
        match self {
            PointerSample::Mouse { client_x } => Some(*client_x),
            PointerSample::Touch { client_xs } => client_xs.first().copied(),
        }
    }
}

/// Overwrite the basket position from an input sample
///
/// Returns whether the basket moved. Touch samples without touch points
/// (e.g. the last finger lifting) leave the basket where it is.
pub fn track(state: &mut GameState, sample: PointerSample<'_>) -> bool {
    match sample.horizontal() {
        Some(x) => {
            state.basket_x = x;
            true
        }
        None => false,
    }
}
