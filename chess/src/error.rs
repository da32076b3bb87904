//! Defines the error types needed by the chess crate
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error type used by methods in the `chess` crate
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cannot parse a FEN string
    ParseFenError,
    /// Cannot parse a UCI move string
    ParseUciError,
    /// Failed to convert an integer to another type
    TryFromIntError,
    /// Ply is not legal in the position it was applied to
    IllegalMove,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match self {
            ParseFenError => "cannot parse FEN string",
            ParseUciError => "cannot parse UCI move string",
            TryFromIntError => "integer out of range",
            IllegalMove => "illegal move",
        }.fmt(f)
    }
}

impl std::error::Error for Error { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Result type used by methods in the `chess` crate
pub type Result<T> = std::result::Result<T, Error>;
