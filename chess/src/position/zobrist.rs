//! Incremental Zobrist hashing of a [`Position`][Position], consistent with the FIDE Article 9.2
//! equality used for repetition detection: the hash depends only on `qbb`, `color`, and `flags`,
//! never on the clocks.
//!
//! [Position]: ../struct.Position.html
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use once_cell::sync::Lazy;
use crate::square::{Color, File, PieceType, Square};

/// A fixed, seeded splitmix64 stream. The keys only need to be well-distributed and stable across
/// runs (so that two equal positions always hash equal); they need not be cryptographically
/// random, so no external RNG crate is pulled in for this.
struct SplitMix64(u64);

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        SplitMix64(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }
}

struct Keys {
    piece_placement: [[[u64; Square::COUNT]; PieceType::COUNT]; Color::COUNT],
    castling: [u64; 4],
    ep_file: [u64; File::COUNT],
    turn: u64,
}

static KEYS: Lazy<Keys> = Lazy::new(|| {
    let mut rng = SplitMix64::new(0x4368_6573_7331_3232);

    let mut piece_placement = [[[0u64; Square::COUNT]; PieceType::COUNT]; Color::COUNT];
    for color in piece_placement.iter_mut() {
        for piece in color.iter_mut() {
            for key in piece.iter_mut() {
                *key = rng.next();
            }
        }
    }

    let mut castling = [0u64; 4];
    for key in castling.iter_mut() {
        *key = rng.next();
    }

    let mut ep_file = [0u64; File::COUNT];
    for key in ep_file.iter_mut() {
        *key = rng.next();
    }

    Keys { piece_placement, castling, ep_file, turn: rng.next() }
});

/// Indexes [`castling`][Keys::castling] keys: White queenside, White kingside, Black queenside,
/// Black kingside, matching the corner squares A1, H1, A8, H8.
pub(crate) const WHITE_QUEENSIDE: usize = 0;
pub(crate) const WHITE_KINGSIDE: usize = 1;
pub(crate) const BLACK_QUEENSIDE: usize = 2;
pub(crate) const BLACK_KINGSIDE: usize = 3;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// An incrementally-maintained Zobrist hash of a position's `qbb`, `color`, and `flags`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash)]
pub struct Zobrist(u64);

impl Zobrist {
    /// The hash of the empty board with White to move and no castling/en-passant rights.
    pub fn new() -> Zobrist {
        Zobrist(0)
    }

    /// Toggles the presence of `(color, piece)` at `sq`.
    pub fn toggle_piece_placement(&mut self, color: Color, piece: PieceType, sq: Square) {
        self.0 ^= KEYS.piece_placement[color as usize][piece as usize][sq.index()];
    }

    /// Toggles the en-passant flag on `file`.
    pub fn toggle_ep_file(&mut self, file: File) {
        self.0 ^= KEYS.ep_file[file as usize];
    }

    /// Toggles one of the four castling-right bits (see the index constants above).
    pub(crate) fn toggle_castling_bit(&mut self, index: usize) {
        self.0 ^= KEYS.castling[index];
    }

    /// Toggles side to move.
    pub fn toggle_turn(&mut self) {
        self.0 ^= KEYS.turn;
    }

    /// The raw 64-bit hash value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Zobrist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<Zobrist> for u64 {
    fn from(z: Zobrist) -> u64 {
        z.0
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn toggling_the_same_key_twice_is_the_identity() {
        let mut z = Zobrist::new();
        let sq = Square::try_from(12usize).unwrap();
        z.toggle_piece_placement(Color::White, PieceType::Knight, sq);
        z.toggle_piece_placement(Color::White, PieceType::Knight, sq);
        assert_eq!(z, Zobrist::new());
    }

    #[test]
    fn turn_toggle_changes_the_hash() {
        let mut z = Zobrist::new();
        z.toggle_turn();
        assert_ne!(z, Zobrist::new());
    }
}
