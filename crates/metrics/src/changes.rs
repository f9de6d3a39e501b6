//! Change & flip detector
//!
//! Week-over-week first differences for any per-market series, and
//! net-exposure sign-flip detection. Differences are only ever taken
//! within one market's series; the first observation has no prior week
//! and stays `None`.

use cot_core::NetSide;
use rust_decimal::Decimal;

/// First differences of a series; `None` at index 0
pub fn diff(values: &[Decimal]) -> Vec<Option<Decimal>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| if i == 0 { None } else { Some(v - values[i - 1]) })
        .collect()
}

/// First differences of an already-nullable series
///
/// `None` at index 0 and wherever either operand is undefined (e.g. a
/// share series whose denominator vanished that week).
pub fn diff_opt(values: &[Option<Decimal>]) -> Vec<Option<Decimal>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if i == 0 {
                None
            } else {
                Some((*v)? - values[i - 1]?)
            }
        })
        .collect()
}

/// Net-side flip flags for a per-market side series
///
/// Policy: only a strict adjacent NET_LONG <-> NET_SHORT reversal counts.
/// Entering, leaving, or sitting at FLAT never flags, and a reversal that
/// takes two weeks via FLAT is two non-flips. `None` at index 0.
pub fn flips(sides: &[NetSide]) -> Vec<Option<bool>> {
    sides
        .iter()
        .enumerate()
        .map(|(i, &side)| {
            if i == 0 {
                None
            } else {
                let prev = sides[i - 1];
                Some(!prev.is_flat() && prev.opposite() == Some(side))
            }
        })
        .collect()
}
