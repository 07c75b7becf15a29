//! Hidden-picture puzzle pieces
//!
//! The picture is a 4x4 grid. Pieces 0-3 are the top row and are held back
//! until every other piece is revealed.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{SECONDARY_PIECES, TOTAL_PIECES};

const ALL_PIECES: u16 = ((1u32 << TOTAL_PIECES) - 1) as u16;

/// Set of revealed piece indices in `0..TOTAL_PIECES`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSet(u16);

impl PieceSet {
    pub fn contains(&self, piece: u8) -> bool {
        (piece as usize) < TOTAL_PIECES && self.0 & (1 << piece) != 0
    }

    /// Reveal a piece. Returns false if it was already revealed or out of range.
    pub fn insert(&mut self, piece: u8) -> bool {
        if (piece as usize) >= TOTAL_PIECES || self.contains(piece) {
            return false;
        }
        self.0 |= 1 << piece;
        true
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_complete(&self) -> bool {
        self.0 == ALL_PIECES
    }

    /// Revealed pieces in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..TOTAL_PIECES as u8).filter(|&p| self.contains(p))
    }

    /// Locked pieces within `range`, ascending
    fn locked_in(&self, range: std::ops::Range<usize>) -> Vec<u8> {
        range
            .map(|p| p as u8)
            .filter(|&p| !self.contains(p))
            .collect()
    }
}

/// Reveal up to `count` pieces, primary group (4-15) first
///
/// The pool is the locked primary pieces while any remain, otherwise the
/// locked top-row pieces. Never spills from one group into the other within
/// a single call. Returns the newly revealed pieces (empty when the
/// puzzle is already complete).
pub fn unlock<R: Rng + ?Sized>(pieces: &mut PieceSet, count: usize, rng: &mut R) -> Vec<u8> {
    let primary = pieces.locked_in(SECONDARY_PIECES..TOTAL_PIECES);
    let mut pool = if primary.is_empty() {
        pieces.locked_in(0..SECONDARY_PIECES)
    } else {
        primary
    };
    if pool.is_empty() {
        return pool;
    }

    pool.shuffle(rng);
    pool.truncate(count);
    for &piece in &pool {
        pieces.insert(piece);
    }
    log::debug!("Unlocked pieces {:?} ({}/{})", pool, pieces.len(), TOTAL_PIECES);
    pool
}
