//! The legal-ply generator: pseudo-legal generation per piece type, castling gating, and the
//! check-filter pass.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use crate::attacks;
use crate::bitboard::Bitboard;
use crate::ply::Ply;
use crate::position::{self, Position};
use crate::qbb::QuadBitboard;
use crate::square::{Color, PieceType, Rank, Square};

/// A safe upper bound on the number of legal plies in any reachable chess position, used to size
/// the buffer `legal_plies` allocates once per call.
const MAX_PLIES: usize = 256;

const E1: usize = 4; const F1: usize = 5; const G1: usize = 6;
const B1: usize = 1; const C1: usize = 2; const D1: usize = 3;
const E8: usize = 60; const F8: usize = 61; const G8: usize = 62;
const B8: usize = 57; const C8: usize = 58; const D8: usize = 59;

fn sq(index: usize) -> Square {
    Square::try_from(index).expect("INFALLIBLE")
}

/// Returns every legal ply available to the side to move in `pos`. Order is unspecified but
/// deterministic for a given position.
pub fn legal_plies(pos: &Position) -> Vec<Ply> {
    let mut plies = Vec::with_capacity(MAX_PLIES);
    generate_pseudo_legal(pos, &mut plies);

    let color = pos.color();
    plies.retain(|&ply| {
        let after = minimal_apply(pos, ply);
        !attacked_by(!color, &after, after.king_square(color))
    });

    plies
}

/// `true` iff some piece of `attacker`'s color attacks `sq`, given board contents `qbb`.
pub fn attacked_by(attacker: Color, qbb: &QuadBitboard, target: Square) -> bool {
    let occ = qbb.occupied();

    let pawn_attackers = match attacker {
        Color::White => attacks::black_pawn_attacks(target) & qbb.by_piece(Color::White, PieceType::Pawn),
        Color::Black => attacks::white_pawn_attacks(target) & qbb.by_piece(Color::Black, PieceType::Pawn),
    };

    !pawn_attackers.is_empty()
        || attacks::knight_attacks(target).intersects(qbb.by_piece(attacker, PieceType::Knight))
        || attacks::diagonal(target, occ).intersects(qbb.diagonals() & qbb.by_color(attacker))
        || attacks::orthogonal(target, occ).intersects(qbb.orthogonals() & qbb.by_color(attacker))
        || attacks::king_attacks(target).intersects(qbb.by_piece(attacker, PieceType::King))
}

/// Applies `ply` to `pos`'s board only, skipping flag and clock bookkeeping, for use by the
/// check-filter pass.
fn minimal_apply(pos: &Position, ply: Ply) -> QuadBitboard {
    use crate::qbb::castling;
    use position::CastlingMatch::*;

    let qbb = pos.qbb();
    let color = pos.color();

    if let Some(castle) = position::castling_match(ply) {
        let (delta, right_held) = match castle {
            WhiteKingside => (castling::white_kingside(), pos.has_kingside_castling_right(Color::White)),
            WhiteQueenside => (castling::white_queenside(), pos.has_queenside_castling_right(Color::White)),
            BlackKingside => (castling::black_kingside(), pos.has_kingside_castling_right(Color::Black)),
            BlackQueenside => (castling::black_queenside(), pos.has_queenside_castling_right(Color::Black)),
        };
        if right_held {
            return qbb ^ delta;
        }
        return qbb.make_move(ply.source(), ply.target());
    }

    if let Some(promotion) = ply.promotion() {
        return match color {
            Color::White => qbb.white_promotion(ply.source(), ply.target(), promotion),
            Color::Black => qbb.black_promotion(ply.source(), ply.target(), promotion),
        };
    }

    let (_, moving_piece) = qbb.at(ply.source()).expect("ply source square must be occupied");
    if moving_piece == PieceType::Pawn && Some(ply.target()) == pos.ep_square() {
        return qbb.en_passant(ply.source(), ply.target());
    }

    qbb.make_move(ply.source(), ply.target())
}

fn generate_pseudo_legal(pos: &Position, plies: &mut Vec<Ply>) {
    let color = pos.color();
    let qbb = pos.qbb();
    let us = qbb.by_color(color);
    let them = qbb.by_color(!color);
    let occ = us | them;
    let not_us = !us;

    generate_pawn_plies(pos, &mut *plies, color, qbb, occ, them);

    for src in qbb.by_piece(color, PieceType::Knight) {
        emit(plies, src, attacks::knight_attacks(src) & not_us);
    }
    for src in qbb.by_piece(color, PieceType::Bishop) {
        emit(plies, src, attacks::diagonal(src, occ) & not_us);
    }
    for src in qbb.by_piece(color, PieceType::Rook) {
        emit(plies, src, attacks::orthogonal(src, occ) & not_us);
    }
    for src in qbb.by_piece(color, PieceType::Queen) {
        let attacked = attacks::diagonal(src, occ) | attacks::orthogonal(src, occ);
        emit(plies, src, attacked & not_us);
    }

    let king_sq = qbb.king_square(color);
    emit(plies, king_sq, attacks::king_attacks(king_sq) & not_us);

    generate_castling(pos, plies, color, occ);
}

fn emit(plies: &mut Vec<Ply>, src: Square, targets: Bitboard) {
    for dst in targets {
        plies.push(Ply::new(src, dst));
    }
}

fn generate_pawn_plies(
    pos: &Position, plies: &mut Vec<Ply>, color: Color, qbb: QuadBitboard, occ: Bitboard, them: Bitboard,
) {
    let not_occ = !occ;
    let capture_targets = match pos.ep_square() {
        Some(ep) => them | Bitboard::from(ep),
        None => them,
    };
    let promotion_rank = match color { Color::White => Rank::R8, Color::Black => Rank::R1 };

    for src in qbb.by_piece(color, PieceType::Pawn) {
        let src_bb = Bitboard::from(src);

        let (push1, ep_ne, ep_nw) = match color {
            Color::White => (src_bb.shift_n(), src_bb.shift_ne(), src_bb.shift_nw()),
            Color::Black => (src_bb.shift_s(), src_bb.shift_se(), src_bb.shift_sw()),
        };

        let single_push = push1 & not_occ;
        emit_pawn_targets(plies, src, single_push, promotion_rank);

        if !single_push.is_empty() {
            let push2 = match color {
                Color::White => single_push.shift_n(),
                Color::Black => single_push.shift_s(),
            };
            let rank4_or_5 = match color { Color::White => crate::bitboard::RANK_4, Color::Black => crate::bitboard::RANK_5 };
            let double_push = push2 & not_occ & rank4_or_5;
            emit_pawn_targets(plies, src, double_push, promotion_rank);
        }

        emit_pawn_targets(plies, src, ep_ne & capture_targets, promotion_rank);
        emit_pawn_targets(plies, src, ep_nw & capture_targets, promotion_rank);
    }
}

fn emit_pawn_targets(plies: &mut Vec<Ply>, src: Square, targets: Bitboard, promotion_rank: Rank) {
    for dst in targets {
        if dst.rank() == promotion_rank {
            plies.push(Ply::new(src, dst).promote_to(PieceType::Queen));
            plies.push(Ply::new(src, dst).promote_to(PieceType::Rook));
            plies.push(Ply::new(src, dst).promote_to(PieceType::Bishop));
            plies.push(Ply::new(src, dst).promote_to(PieceType::Knight));
        } else {
            plies.push(Ply::new(src, dst));
        }
    }
}

fn generate_castling(pos: &Position, plies: &mut Vec<Ply>, color: Color, occ: Bitboard) {
    let opponent = !color;
    let (e, f, g, b, c, d) = match color {
        Color::White => (E1, F1, G1, B1, C1, D1),
        Color::Black => (E8, F8, G8, B8, C8, D8),
    };

    if pos.has_kingside_castling_right(color) {
        let empty = Bitboard::from(sq(f)) | Bitboard::from(sq(g));
        if (occ & empty).is_empty()
            && !attacked_by(opponent, &pos.qbb(), sq(e))
            && !attacked_by(opponent, &pos.qbb(), sq(f))
            && !attacked_by(opponent, &pos.qbb(), sq(g))
        {
            plies.push(Ply::new(sq(e), sq(g)));
        }
    }

    if pos.has_queenside_castling_right(color) {
        let empty = Bitboard::from(sq(b)) | Bitboard::from(sq(c)) | Bitboard::from(sq(d));
        if (occ & empty).is_empty()
            && !attacked_by(opponent, &pos.qbb(), sq(e))
            && !attacked_by(opponent, &pos.qbb(), sq(d))
            && !attacked_by(opponent, &pos.qbb(), sq(c))
        {
            plies.push(Ply::new(sq(e), sq(c)));
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_twenty_legal_plies() {
        let pos = Position::start();
        assert_eq!(legal_plies(&pos).len(), 20);
    }

    #[test]
    fn no_legal_plies_leave_the_mover_in_check() {
        let pos: Position = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse().unwrap();
        for ply in legal_plies(&pos) {
            let after = pos.unsafe_do_ply(ply);
            assert!(!after.in_check(pos.color()));
        }
    }

    #[test]
    fn checkmate_position_has_no_legal_plies() {
        // fool's mate
        let pos: Position = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
            .parse().unwrap();
        assert!(legal_plies(&pos).is_empty());
        assert!(pos.in_check(pos.color()));
    }

    #[test]
    fn white_can_castle_both_sides_when_path_is_clear() {
        let pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let plies = legal_plies(&pos);
        let castles: Vec<_> = plies.iter().filter(|p| p.source().index() == E1
            && (p.target().index() == G1 || p.target().index() == C1)).collect();
        assert_eq!(castles.len(), 2);
    }

    #[test]
    fn castling_through_check_is_illegal() {
        // black rook on f8 attacks f1, the kingside castling pass square
        let pos: Position = "4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1".parse().unwrap();
        let plies = legal_plies(&pos);
        assert!(!plies.iter().any(|p| p.source().index() == E1 && p.target().index() == G1));
    }
}
