//! Precomputed attack tables and sliding-piece attack computation.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! Fixed-offset attacks (king, knight, pawn) are looked up in tables built once at first use via
//! [`once_cell::sync::Lazy`][Lazy]. Sliding attacks (bishop/rook/queen) are computed on the fly by
//! the classical ray-scan-with-bitscan technique: a full ray from the source square to the edge of
//! the board is precomputed per direction, then truncated at the nearest blocker in the current
//! occupancy.
//!
//! [Lazy]: https://docs.rs/once_cell/latest/once_cell/sync/struct.Lazy.html
////////////////////////////////////////////////////////////////////////////////////////////////////
use once_cell::sync::Lazy;
use crate::bitboard::Bitboard;
use crate::square::Square;
use std::convert::TryFrom;

type Table = [Bitboard; Square::COUNT];

fn build_table(shift: impl Fn(Bitboard) -> Bitboard) -> Table {
    let mut table = [Bitboard::EMPTY; Square::COUNT];
    for (index, entry) in table.iter_mut().enumerate() {
        let sq = Square::try_from(index).expect("INFALLIBLE");
        *entry = shift(Bitboard::from(sq));
    }
    table
}

/// Builds the full ray from each square to the edge of the board in the direction of repeated
/// application of `shift`, not including the source square itself.
fn build_ray_table(shift: impl Fn(Bitboard) -> Bitboard) -> Table {
    let mut table = [Bitboard::EMPTY; Square::COUNT];
    for (index, entry) in table.iter_mut().enumerate() {
        let sq = Square::try_from(index).expect("INFALLIBLE");
        let mut ray = Bitboard::EMPTY;
        let mut cur = shift(Bitboard::from(sq));
        while !cur.is_empty() {
            ray |= cur;
            cur = shift(cur);
        }
        *entry = ray;
    }
    table
}

static KING_ATTACKS: Lazy<Table> = Lazy::new(|| build_table(|bb| {
    bb.shift_n() | bb.shift_ne() | bb.shift_e() | bb.shift_se()
        | bb.shift_s() | bb.shift_sw() | bb.shift_w() | bb.shift_nw()
}));

static KNIGHT_ATTACKS: Lazy<Table> = Lazy::new(|| build_table(|bb| {
    bb.shift_nne() | bb.shift_nee() | bb.shift_see() | bb.shift_sse()
        | bb.shift_ssw() | bb.shift_sww() | bb.shift_nww() | bb.shift_nnw()
}));

static WHITE_PAWN_ATTACKS: Lazy<Table> = Lazy::new(|| build_table(|bb| {
    bb.shift_ne() | bb.shift_nw()
}));

static BLACK_PAWN_ATTACKS: Lazy<Table> = Lazy::new(|| build_table(|bb| {
    bb.shift_se() | bb.shift_sw()
}));

static RAY_N: Lazy<Table> = Lazy::new(|| build_ray_table(Bitboard::shift_n));
static RAY_S: Lazy<Table> = Lazy::new(|| build_ray_table(Bitboard::shift_s));
static RAY_E: Lazy<Table> = Lazy::new(|| build_ray_table(Bitboard::shift_e));
static RAY_W: Lazy<Table> = Lazy::new(|| build_ray_table(Bitboard::shift_w));
static RAY_NE: Lazy<Table> = Lazy::new(|| build_ray_table(Bitboard::shift_ne));
static RAY_NW: Lazy<Table> = Lazy::new(|| build_ray_table(Bitboard::shift_nw));
static RAY_SE: Lazy<Table> = Lazy::new(|| build_ray_table(Bitboard::shift_se));
static RAY_SW: Lazy<Table> = Lazy::new(|| build_ray_table(Bitboard::shift_sw));

/// Truncates a ray whose squares increase in index moving away from the source (N, E, NE, NW) at
/// the nearest blocker in `occ`.
fn positive_ray_attacks(full_ray: Bitboard, occ: Bitboard) -> Bitboard {
    let blockers = full_ray.0 & occ.0;
    if blockers == 0 {
        return full_ray;
    }
    let nearest = blockers.trailing_zeros();
    let mask = if nearest >= 63 { u64::MAX } else { (1u64 << (nearest + 1)) - 1 };
    Bitboard(full_ray.0 & mask)
}

/// Truncates a ray whose squares decrease in index moving away from the source (S, W, SE, SW) at
/// the nearest blocker in `occ`.
fn negative_ray_attacks(full_ray: Bitboard, occ: Bitboard) -> Bitboard {
    let blockers = full_ray.0 & occ.0;
    if blockers == 0 {
        return full_ray;
    }
    let nearest = 63 - blockers.leading_zeros();
    let mask = !((1u64 << nearest) - 1);
    Bitboard(full_ray.0 & mask)
}

/// The squares attacked by a king standing on `sq`.
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

/// The squares attacked by a knight standing on `sq`.
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

/// The squares a white pawn standing on `sq` attacks (diagonal capture targets).
pub fn white_pawn_attacks(sq: Square) -> Bitboard {
    WHITE_PAWN_ATTACKS[sq.index()]
}

/// The squares a black pawn standing on `sq` attacks (diagonal capture targets).
pub fn black_pawn_attacks(sq: Square) -> Bitboard {
    BLACK_PAWN_ATTACKS[sq.index()]
}

/// The squares attacked by a rook standing on `sq`, given the board's occupancy `occ`. Includes
/// the first blocking piece on each ray, if any; does not include `sq` itself.
pub fn orthogonal(sq: Square, occ: Bitboard) -> Bitboard {
    let index = sq.index();
    positive_ray_attacks(RAY_N[index], occ)
        | negative_ray_attacks(RAY_S[index], occ)
        | positive_ray_attacks(RAY_E[index], occ)
        | negative_ray_attacks(RAY_W[index], occ)
}

/// The squares attacked by a bishop standing on `sq`, given the board's occupancy `occ`. Includes
/// the first blocking piece on each ray, if any; does not include `sq` itself.
pub fn diagonal(sq: Square, occ: Bitboard) -> Bitboard {
    let index = sq.index();
    positive_ray_attacks(RAY_NE[index], occ)
        | positive_ray_attacks(RAY_NW[index], occ)
        | negative_ray_attacks(RAY_SE[index], occ)
        | negative_ray_attacks(RAY_SW[index], occ)
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::{File, Rank};

    #[test]
    fn king_in_center_has_eight_attacks() {
        let sq = Square::new(File::D, Rank::R4);
        assert_eq!(king_attacks(sq).len(), 8);
    }

    #[test]
    fn king_in_corner_has_three_attacks() {
        let sq = Square::new(File::A, Rank::R1);
        assert_eq!(king_attacks(sq).len(), 3);
    }

    #[test]
    fn knight_in_center_has_eight_attacks() {
        let sq = Square::new(File::D, Rank::R4);
        assert_eq!(knight_attacks(sq).len(), 8);
    }

    #[test]
    fn knight_in_corner_has_two_attacks() {
        let sq = Square::new(File::A, Rank::R1);
        assert_eq!(knight_attacks(sq).len(), 2);
    }

    #[test]
    fn rook_on_empty_board_attacks_whole_rank_and_file() {
        let sq = Square::new(File::D, Rank::R4);
        assert_eq!(orthogonal(sq, Bitboard::EMPTY).len(), 14);
    }

    #[test]
    fn rook_attacks_stop_at_first_blocker_in_each_direction() {
        let sq = Square::new(File::D, Rank::R4);
        let blocker = Bitboard::from(Square::new(File::D, Rank::R6));
        let attacks = orthogonal(sq, blocker);
        assert!(attacks.contains(Square::new(File::D, Rank::R5)));
        assert!(attacks.contains(Square::new(File::D, Rank::R6)));
        assert!(!attacks.contains(Square::new(File::D, Rank::R7)));
    }

    #[test]
    fn bishop_on_empty_board_in_center_attacks_thirteen_squares() {
        let sq = Square::new(File::D, Rank::R4);
        assert_eq!(diagonal(sq, Bitboard::EMPTY).len(), 13);
    }
}
