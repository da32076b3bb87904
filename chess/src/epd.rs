//! Parsing of EPD (Extended Position Description) perft-suite lines: a FEN prefix followed by one
//! or more `;Dk v` opcodes asserting `perft(k, FEN) == v`.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::error::Error;
use crate::perft::Assertion;
use crate::position::Position;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// One line of an EPD perft suite: a position together with the `;Dk v` assertions that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The FEN prefix of the line, as written in the file (used for diagnostics).
    pub fen: String,
    /// The position described by [`fen`][Line::fen].
    pub position: Position,
    /// The `;Dk v` assertions following the FEN prefix, in file order.
    pub assertions: Vec<Assertion>,
}

/// Parses a single EPD perft-suite line: the FEN prefix (the field-4 abbreviated form, i.e.
/// placement, side to move, castling rights, and en-passant target) followed by semicolon-
/// separated `Dk v` opcodes.
pub fn parse_line(line: &str) -> Result<Line, Error> {
    let mut fields = line.split(';');
    let fen = fields.next().ok_or(Error::ParseFenError)?.trim().to_string();
    let position = Position::from_fen(&fen)?;

    let mut assertions = Vec::new();
    for field in fields {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let rest = field.strip_prefix('D').ok_or(Error::ParseFenError)?;
        let tokens: Vec<&str> = rest.split_whitespace().collect();
        if tokens.len() != 2 {
            return Err(Error::ParseFenError);
        }
        let depth: u32 = tokens[0].parse().map_err(|_| Error::ParseFenError)?;
        let expected: u64 = tokens[1].parse().map_err(|_| Error::ParseFenError)?;
        assertions.push(Assertion { depth, expected });
    }

    Ok(Line { fen, position, assertions })
}

/// Parses every non-blank line of an EPD suite file, in order. The first malformed line aborts
/// parsing and returns its error: a malformed suite is a fatal, whole-file condition.
pub fn parse_suite(text: &str) -> Result<Vec<Line>, Error> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fen_and_assertions() {
        let line = parse_line(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - ;D1 20 ;D2 400"
        ).unwrap();
        assert_eq!(line.position, Position::start());
        assert_eq!(line.assertions, vec![
            Assertion { depth: 1, expected: 20 },
            Assertion { depth: 2, expected: 400 },
        ]);
    }

    #[test]
    fn rejects_malformed_opcode() {
        assert!(parse_line("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - ;Dx 20").is_err());
    }

    #[test]
    fn rejects_garbage_fen_prefix() {
        assert!(parse_line("not a fen ;D1 20").is_err());
    }

    #[test]
    fn parse_suite_skips_blank_lines() {
        let suite = parse_suite(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - ;D1 20\n\n\
             rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - ;D1 20\n"
        ).unwrap();
        assert_eq!(suite.len(), 2);
    }
}
