//! The `chess` crate: a bitboard position encoding, legal-ply generator, and perft driver.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! The core data structures are [`QuadBitboard`][qbb::QuadBitboard] (the packed board
//! representation), [`Position`][position::Position] (a `QuadBitboard` plus side to move,
//! castling/en-passant flags, and the two FEN clocks), and [`Ply`][ply::Ply] (a packed half-move).
//!
//! [`movegen::legal_plies`] generates every legal ply available to the side to move in a
//! `Position`; [`Position::unsafe_do_ply`][position::Position::unsafe_do_ply] and
//! [`Position::do_ply`][position::Position::do_ply] apply one. [`perft::count`] recursively counts
//! leaf positions for move-generator correctness testing and throughput benchmarking, and
//! [`repetition::repetitions`] finds the most-repeated position in a game history per FIDE
//! Article 9.2.
//!
//! PGN/SAN text conversion, UCI protocol framing, and search/evaluation are deliberately out of
//! scope for this crate; it covers position representation and move generation only.
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]

pub mod square;
pub mod bitboard;
pub mod qbb;
pub mod attacks;
pub mod position;
pub mod ply;
pub mod movegen;
pub mod perft;
pub mod repetition;
pub mod epd;
mod error;

pub use square::{Color, File, PieceType, Rank, Square};
pub use bitboard::Bitboard;
pub use qbb::QuadBitboard;
pub use position::Position;
pub use ply::Ply;
pub use error::{Error, Result};
