//! The position: a [`QuadBitboard`][QuadBitboard] plus side to move, castling/en-passant flags,
//! and the two FEN clocks.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! Two positions are equal, for the purposes of FIDE Article 9.2 (repetition) and this crate's
//! [`PartialEq`][PartialEq] impl, iff their `qbb`, `color`, and `flags` agree; the half-move clock
//! and move number are not part of a position's identity.
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use crate::qbb::{self, QuadBitboard};
use crate::square::{Color, File, PieceType, Rank, Square};
use crate::ply::Ply;
use crate::error::Error;

pub mod zobrist;
use zobrist::Zobrist;

// Corner and castling-relevant square indices, in the little-endian rank-file mapping.
const A1: usize = 0;
const C1: usize = 2;
const E1: usize = 4;
const G1: usize = 6;
const H1: usize = 7;
const A8: usize = 56;
const C8: usize = 58;
const E8: usize = 60;
const G8: usize = 62;
const H8: usize = 63;

const WHITE_QUEENSIDE_BIT: u64 = 1 << A1;
const WHITE_KINGSIDE_BIT: u64 = 1 << H1;
const BLACK_QUEENSIDE_BIT: u64 = 1 << A8;
const BLACK_KINGSIDE_BIT: u64 = 1 << H8;
const EP_MASK: u64 = (0xffu64 << 16) | (0xffu64 << 40);

fn sq(index: usize) -> Square {
    Square::try_from(index).expect("INFALLIBLE")
}

/// Which of the four castling plies, if any, `ply` matches.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum CastlingMatch {
    WhiteKingside,
    WhiteQueenside,
    BlackKingside,
    BlackQueenside,
}

pub(crate) fn castling_match(ply: Ply) -> Option<CastlingMatch> {
    use CastlingMatch::*;
    match (ply.source().index(), ply.target().index()) {
        (E1, G1) => Some(WhiteKingside),
        (E1, C1) => Some(WhiteQueenside),
        (E8, G8) => Some(BlackKingside),
        (E8, C8) => Some(BlackQueenside),
        _ => None,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A complete, immutable chess position.
#[derive(Debug, Copy, Clone)]
pub struct Position {
    qbb: QuadBitboard,
    color: Color,
    flags: u64,
    half_move_clock: u32,
    move_number: u32,
    zobrist: Zobrist,
}

impl PartialEq for Position {
    /// Positions are equal per FIDE Article 9.2: the clocks are not part of a position's
    /// identity.
    fn eq(&self, other: &Position) -> bool {
        self.qbb == other.qbb && self.color == other.color && self.flags == other.flags
    }
}

impl Eq for Position { }

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.zobrist.hash(state);
    }
}

impl Position {
    /// The standard starting position.
    pub fn start() -> Position {
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse().expect("INFALLIBLE")
    }

    /// The board.
    pub fn qbb(&self) -> QuadBitboard {
        self.qbb
    }

    /// The side to move.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The raw castling/en-passant flags word.
    pub fn flags(&self) -> u64 {
        self.flags
    }

    /// The half-move clock (plies since the last capture or pawn push).
    pub fn half_move_clock(&self) -> u32 {
        self.half_move_clock
    }

    /// The full-move number, starting at 1 and incrementing after Black's move.
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// The incremental Zobrist hash of this position's `qbb`, `color`, and `flags`.
    pub fn zobrist(&self) -> Zobrist {
        self.zobrist
    }

    /// The en-passant target square, if the previous move was a pawn double push.
    pub fn ep_square(&self) -> Option<Square> {
        let bits = self.flags & EP_MASK;
        if bits == 0 {
            None
        } else {
            Some(sq(bits.trailing_zeros() as usize))
        }
    }

    /// Whether `color` still has the right to castle kingside.
    pub fn has_kingside_castling_right(&self, color: Color) -> bool {
        let bit = match color {
            Color::White => WHITE_KINGSIDE_BIT,
            Color::Black => BLACK_KINGSIDE_BIT,
        };
        self.flags & bit != 0
    }

    /// Whether `color` still has the right to castle queenside.
    pub fn has_queenside_castling_right(&self, color: Color) -> bool {
        let bit = match color {
            Color::White => WHITE_QUEENSIDE_BIT,
            Color::Black => BLACK_QUEENSIDE_BIT,
        };
        self.flags & bit != 0
    }

    /// `true` iff `color`'s king is currently attacked.
    pub fn in_check(&self, color: Color) -> bool {
        let king_sq = self.qbb.king_square(color);
        crate::movegen::attacked_by(!color, &self.qbb, king_sq)
    }

    /// `true` iff neither side has enough material to force checkmate.
    pub fn insufficient_material(&self) -> bool {
        self.qbb.insufficient_material()
    }

    /// Parses a FEN string: either the standard 6-field form, or a 4-field abbreviated form that
    /// omits the half-move clock and move number (defaulting them to 0 and 1).
    pub fn from_fen(s: &str) -> Result<Position, Error> {
        let fields: Vec<&str> = s.trim().split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(Error::ParseFenError);
        }

        let qbb = QuadBitboard::from_placement(fields[0])?;
        let color: Color = fields[1].parse()?;

        let mut flags = 0u64;
        if fields[2] != "-" {
            let mut remaining = fields[2];
            for (bit, letter) in [
                (WHITE_KINGSIDE_BIT, 'K'),
                (WHITE_QUEENSIDE_BIT, 'Q'),
                (BLACK_KINGSIDE_BIT, 'k'),
                (BLACK_QUEENSIDE_BIT, 'q'),
            ] {
                if let Some(rest) = remaining.strip_prefix(letter) {
                    flags |= bit;
                    remaining = rest;
                }
            }
            if !remaining.is_empty() {
                return Err(Error::ParseFenError);
            }
        }

        if fields[3] != "-" {
            let ep: Square = fields[3].parse().map_err(|_| Error::ParseFenError)?;
            if ep.rank() != Rank::R3 && ep.rank() != Rank::R6 {
                return Err(Error::ParseFenError);
            }
            flags |= 1 << ep.index();
        }

        let (half_move_clock, move_number) = if fields.len() == 6 {
            let half_move_clock: u32 = fields[4].parse().map_err(|_| Error::ParseFenError)?;
            let move_number: u32 = fields[5].parse().map_err(|_| Error::ParseFenError)?;
            if move_number == 0 {
                return Err(Error::ParseFenError);
            }
            (half_move_clock, move_number)
        } else {
            (0, 1)
        };

        Ok(Position::assemble(qbb, color, flags, half_move_clock, move_number))
    }

    /// Renders this position as a 6-field FEN string.
    pub fn to_fen(&self) -> String {
        let mut castling = String::new();
        if self.flags & WHITE_KINGSIDE_BIT != 0 { castling.push('K'); }
        if self.flags & WHITE_QUEENSIDE_BIT != 0 { castling.push('Q'); }
        if self.flags & BLACK_KINGSIDE_BIT != 0 { castling.push('k'); }
        if self.flags & BLACK_QUEENSIDE_BIT != 0 { castling.push('q'); }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = match self.ep_square() {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!("{} {} {} {} {} {}",
            self.qbb.to_placement(), self.color, castling, ep,
            self.half_move_clock, self.move_number)
    }

    fn assemble(qbb: QuadBitboard, color: Color, flags: u64, half_move_clock: u32, move_number: u32)
        -> Position
    {
        let mut zobrist = Zobrist::new();
        for index in 0..Square::COUNT {
            let square = sq(index);
            if let Some((piece_color, piece)) = qbb.at(square) {
                zobrist.toggle_piece_placement(piece_color, piece, square);
            }
        }
        if flags & WHITE_KINGSIDE_BIT != 0 { zobrist.toggle_castling_bit(zobrist::WHITE_KINGSIDE); }
        if flags & WHITE_QUEENSIDE_BIT != 0 { zobrist.toggle_castling_bit(zobrist::WHITE_QUEENSIDE); }
        if flags & BLACK_KINGSIDE_BIT != 0 { zobrist.toggle_castling_bit(zobrist::BLACK_KINGSIDE); }
        if flags & BLACK_QUEENSIDE_BIT != 0 { zobrist.toggle_castling_bit(zobrist::BLACK_QUEENSIDE); }
        let ep_bits = flags & EP_MASK;
        if ep_bits != 0 {
            zobrist.toggle_ep_file(sq(ep_bits.trailing_zeros() as usize).file());
        }
        if color == Color::Black {
            zobrist.toggle_turn();
        }

        Position { qbb, color, flags, half_move_clock, move_number, zobrist }
    }

    /// Applies `ply` without checking its legality; the caller must have obtained `ply` from
    /// [`legal_plies`][crate::movegen::legal_plies] (or otherwise know it to be legal).
    pub fn unsafe_do_ply(&self, ply: Ply) -> Position {
        let color = self.color;
        let (_, moving_piece) = self.qbb.at(ply.source())
            .expect("ply source square must be occupied");
        let is_capture = self.qbb.at(ply.target()).is_some();

        let mut qbb = self.qbb;
        let mut flags = self.flags & !EP_MASK;

        if let Some(castle) = castling_match(ply) {
            use CastlingMatch::*;
            let (delta, right_still_held) = match castle {
                WhiteKingside => (qbb::castling::white_kingside(), self.has_kingside_castling_right(Color::White)),
                WhiteQueenside => (qbb::castling::white_queenside(), self.has_queenside_castling_right(Color::White)),
                BlackKingside => (qbb::castling::black_kingside(), self.has_kingside_castling_right(Color::Black)),
                BlackQueenside => (qbb::castling::black_queenside(), self.has_queenside_castling_right(Color::Black)),
            };

            if right_still_held && moving_piece == PieceType::King {
                qbb ^= delta;
                match color {
                    Color::White => flags &= !(WHITE_KINGSIDE_BIT | WHITE_QUEENSIDE_BIT),
                    Color::Black => flags &= !(BLACK_KINGSIDE_BIT | BLACK_QUEENSIDE_BIT),
                }
            } else {
                qbb = qbb.make_move(ply.source(), ply.target());
                flags = clear_castling_rights_touching(flags, ply.source(), ply.target());
            }
        } else if let Some(promotion) = ply.promotion() {
            qbb = match color {
                Color::White => qbb.white_promotion(ply.source(), ply.target(), promotion),
                Color::Black => qbb.black_promotion(ply.source(), ply.target(), promotion),
            };
            flags = clear_castling_rights_touching(flags, ply.source(), ply.target());
        } else if moving_piece == PieceType::Pawn && Some(ply.target()) == self.ep_square() {
            qbb = qbb.en_passant(ply.source(), ply.target());
        } else {
            qbb = qbb.make_move(ply.source(), ply.target());
            flags = clear_castling_rights_touching(flags, ply.source(), ply.target());

            if moving_piece == PieceType::Pawn {
                let src_rank: usize = ply.source().rank().into();
                let dst_rank: usize = ply.target().rank().into();
                if (src_rank as i32 - dst_rank as i32).abs() == 2 {
                    let skip = (ply.source().index() + ply.target().index()) / 2;
                    flags |= 1 << skip;
                }
            }
        }

        let half_move_clock = if moving_piece == PieceType::Pawn || is_capture {
            0
        } else {
            self.half_move_clock + 1
        };
        let move_number = if color == Color::Black { self.move_number + 1 } else { self.move_number };

        Position::assemble(qbb, !color, flags, half_move_clock, move_number)
    }

    /// Applies `ply`, rejecting it if it is not legal in this position.
    pub fn do_ply(&self, ply: Ply) -> Result<Position, Error> {
        if crate::movegen::legal_plies(self).contains(&ply) {
            Ok(self.unsafe_do_ply(ply))
        } else {
            Err(Error::IllegalMove)
        }
    }
}

fn clear_castling_rights_touching(flags: u64, src: Square, dst: Square) -> u64 {
    let touched = (1u64 << src.index()) | (1u64 << dst.index());
    let corners = WHITE_KINGSIDE_BIT | WHITE_QUEENSIDE_BIT | BLACK_KINGSIDE_BIT | BLACK_QUEENSIDE_BIT;
    flags & !(touched & corners)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_fen().fmt(f)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Position, Error> {
        Position::from_fen(s)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_from_fen_matches_start() {
        let pos = Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(pos, Position::start());
        assert_eq!(pos.half_move_clock(), 0);
        assert_eq!(pos.move_number(), 1);
    }

    #[test]
    fn abbreviated_four_field_fen_defaults_clocks() {
        let pos = Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap();
        assert_eq!(pos.half_move_clock(), 0);
        assert_eq!(pos.move_number(), 1);
    }

    #[test]
    fn to_fen_round_trips_starting_position() {
        let pos = Position::start();
        assert_eq!(pos.to_fen().parse::<Position>().unwrap(), pos);
    }

    #[test]
    fn from_fen_rejects_wrong_field_count() {
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq").is_err());
    }

    #[test]
    fn from_fen_rejects_garbage_castling_field() {
        assert!(Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XYZx - 0 1").is_err());
    }

    #[test]
    fn from_fen_rejects_move_number_zero() {
        assert!(Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0").is_err());
    }

    #[test]
    fn from_fen_rejects_position_missing_a_king() {
        assert!(Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
    }

    #[test]
    fn pawn_double_push_sets_en_passant_square() {
        let pos = Position::start();
        let e2 = Square::new(File::E, Rank::R2);
        let e4 = Square::new(File::E, Rank::R4);
        let after = pos.unsafe_do_ply(Ply::new(e2, e4));
        assert_eq!(after.ep_square(), Some(Square::new(File::E, Rank::R3)));
    }

    #[test]
    fn king_move_clears_both_castling_rights() {
        let pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let e1 = Square::new(File::E, Rank::R1);
        let f1 = Square::new(File::F, Rank::R1);
        let after = pos.unsafe_do_ply(Ply::new(e1, f1));
        assert!(!after.has_kingside_castling_right(Color::White));
        assert!(!after.has_queenside_castling_right(Color::White));
        assert!(after.has_kingside_castling_right(Color::Black));
    }

    #[test]
    fn rook_capture_clears_opponents_castling_right() {
        let pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let a1 = Square::new(File::A, Rank::R1);
        let a8 = Square::new(File::A, Rank::R8);
        let after = pos.unsafe_do_ply(Ply::new(a1, a8));
        assert!(!after.has_queenside_castling_right(Color::Black));
    }

    #[test]
    fn capture_resets_half_move_clock() {
        let pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 5 3".parse().unwrap();
        let a1 = Square::new(File::A, Rank::R1);
        let a8 = Square::new(File::A, Rank::R8);
        let after = pos.unsafe_do_ply(Ply::new(a1, a8));
        assert_eq!(after.half_move_clock(), 0);
    }

    #[test]
    fn move_number_increments_only_after_black() {
        let pos = Position::start();
        let e2 = Square::new(File::E, Rank::R2);
        let e4 = Square::new(File::E, Rank::R4);
        let after_white = pos.unsafe_do_ply(Ply::new(e2, e4));
        assert_eq!(after_white.move_number(), 1);

        let e7 = Square::new(File::E, Rank::R7);
        let e5 = Square::new(File::E, Rank::R5);
        let after_black = after_white.unsafe_do_ply(Ply::new(e7, e5));
        assert_eq!(after_black.move_number(), 2);
    }

    #[test]
    fn equality_ignores_clocks() {
        let a: Position = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse().unwrap();
        let b: Position = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 7 12".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.zobrist(), b.zobrist());
    }
}
