//! Repetition detection per FIDE Article 9.2.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::position::Position;

/// Finds the most-repeated position in `history`, under the Article-9.2 equality defined by
/// [`Position`][Position]'s `PartialEq` (clocks excluded).
///
/// Positions are bucketed by that equality in the order they occur in `history`; the bucket with
/// the highest count wins. Ties are broken in favor of the bucket whose first occurrence comes
/// earliest in `history`, which falls out naturally from scanning `history` in order and only
/// replacing the current leader on a strict improvement.
///
/// Returns `None` if `history` is empty.
///
/// [Position]: crate::position::Position
pub fn repetitions(history: &[Position]) -> Option<(u32, Position)> {
    let mut buckets: Vec<(Position, u32)> = Vec::new();

    for &pos in history {
        match buckets.iter_mut().find(|(p, _)| *p == pos) {
            Some((_, count)) => *count += 1,
            None => buckets.push((pos, 1)),
        }
    }

    buckets.into_iter()
        .fold(None, |best: Option<(Position, u32)>, (pos, count)| {
            match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((pos, count)),
            }
        })
        .map(|(pos, count)| (count, pos))
}
