//! Heat-range normalizer
//!
//! Locates each observation between the minimum and maximum of its
//! historical window. Two windows apply to every series: the expanding
//! full history (defined from the first observation) and a trailing
//! window gated by a warm-up threshold.
//!
//! A single-observation window carries no variance information and is
//! placed at the midpoint. A longer window with `max == min` is a
//! zero-variance data-quality condition: it yields `pos = None` rather
//! than a divide-by-zero sentinel, and the validation suite rejects any
//! table where that occurred.

use rust_decimal::Decimal;

/// Midpoint assigned when a window holds a single observation
pub const SINGLETON_POS: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Window extrema and the value's percentile position within them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub min: Decimal,
    pub max: Decimal,
    /// `(value - min) / (max - min)`, in [0, 1]; 0.5 for a one-observation
    /// window; `None` when a longer window has `max == min`
    pub pos: Option<Decimal>,
}

impl HeatPoint {
    fn at(value: Decimal, min: Decimal, max: Decimal, window_len: usize) -> Self {
        let pos = if max > min {
            Some((value - min) / (max - min))
        } else if window_len == 1 {
            Some(SINGLETON_POS)
        } else {
            None
        };
        Self { min, max, pos }
    }
}

/// Expanding full-history ranges, one per observation
///
/// The window always contains at least the current observation, so every
/// point carries extrema and `pos` is `None` only for degenerate
/// (constant, multi-observation) windows.
pub fn expanding_ranges(values: &[Decimal]) -> Vec<HeatPoint> {
    let mut points = Vec::with_capacity(values.len());
    let mut min = Decimal::MAX;
    let mut max = Decimal::MIN;
    for (i, &value) in values.iter().enumerate() {
        min = min.min(value);
        max = max.max(value);
        points.push(HeatPoint::at(value, min, max, i + 1));
    }
    points
}

/// Trailing-window ranges, one per observation
///
/// `None` until `warmup` observations have accumulated; defined thereafter
/// over the most recent `window` observations (fewer, if the history is
/// still shorter than the window).
pub fn trailing_ranges(values: &[Decimal], window: usize, warmup: usize) -> Vec<Option<HeatPoint>> {
    let mut points = Vec::with_capacity(values.len());
    for (i, &value) in values.iter().enumerate() {
        if i + 1 < warmup.max(1) {
            points.push(None);
            continue;
        }
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        let mut min = slice[0];
        let mut max = slice[0];
        for &v in &slice[1..] {
            min = min.min(v);
            max = max.max(v);
        }
        points.push(Some(HeatPoint::at(value, min, max, slice.len())));
    }
    points
}
