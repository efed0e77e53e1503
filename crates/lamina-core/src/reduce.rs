//! Reduction strategies: collapse accumulated samples into output bytes.
//!
//! This module defines the [`ReduceMode`] selector and the per-mode
//! [`Accumulator`] representation. The two modes share the collector and
//! orchestration code and differ only in what they retain per flat index
//! and how [`Accumulator::reduce`] computes the final value:
//!
//! - **Mean** keeps one running sum per index (plus the shared sample
//!   count) and averages with round-half-up.
//! - **Median** retains every sample value per index and selects the
//!   upper median after ordering.

use serde::{Deserialize, Serialize};

/// Selects which statistical reduction collapses the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReduceMode {
    /// Arithmetic mean per flat index, rounded half-up.
    #[default]
    Mean,
    /// Upper median per flat index: the element at position
    /// `count / 2` (0-indexed) of the ascending-sorted sample list.
    /// For even counts this is the larger of the two middle values,
    /// never their average.
    Median,
}

impl ReduceMode {
    /// Output filename prefix for composites produced in this mode.
    #[must_use]
    pub const fn output_prefix(self) -> &'static str {
        match self {
            Self::Mean => "avg_result_",
            Self::Median => "median_result_",
        }
    }
}

/// Per-flat-index accumulation state for one run.
///
/// Holds one entry per pixel-channel position in the reference shape.
/// The shared sample count lives in the collector, not here, since it
/// is identical across all positions.
#[derive(Debug)]
pub(crate) enum Accumulator {
    /// Running sums. `u64` cannot overflow here: each sample adds at
    /// most 255, so overflow would need ~7e16 images.
    Mean { sums: Vec<u64> },
    /// All sample values seen per index, unsorted until reduction.
    Median { values: Vec<Vec<u8>> },
}

impl Accumulator {
    /// Create an empty accumulator with `len` flat positions.
    pub(crate) fn new(mode: ReduceMode, len: usize) -> Self {
        match mode {
            ReduceMode::Mean => Self::Mean { sums: vec![0; len] },
            ReduceMode::Median => Self::Median {
                values: vec![Vec::new(); len],
            },
        }
    }

    /// Fold one accepted sample's buffer into the accumulator.
    ///
    /// `data` must have exactly as many entries as the accumulator has
    /// positions; the collector validates shapes before calling this.
    pub(crate) fn absorb(&mut self, data: &[u8]) {
        match self {
            Self::Mean { sums } => {
                debug_assert_eq!(sums.len(), data.len());
                for (sum, &value) in sums.iter_mut().zip(data) {
                    *sum += u64::from(value);
                }
            }
            Self::Median { values } => {
                debug_assert_eq!(values.len(), data.len());
                for (list, &value) in values.iter_mut().zip(data) {
                    list.push(value);
                }
            }
        }
    }

    /// Collapse the accumulator into output bytes.
    ///
    /// `count` is the shared accepted-sample count and must be at least
    /// 1 (the collector refuses to reduce an empty stack).
    pub(crate) fn reduce(self, count: usize) -> Vec<u8> {
        debug_assert!(count >= 1, "reduce requires at least one sample");
        match self {
            Self::Mean { sums } => sums.iter().map(|&sum| mean_byte(sum, count)).collect(),
            Self::Median { mut values } => {
                // Upper-median convention: position count/2, 0-indexed.
                let mid = count / 2;
                values
                    .iter_mut()
                    .map(|list| *list.select_nth_unstable(mid).1)
                    .collect()
            }
        }
    }
}

/// Round-half-up mean of `sum` over `count`, clamped to 255.
///
/// `+0.5` followed by truncation is round-half-up only because the sum
/// is non-negative (samples are unsigned bytes); the rule must be
/// revisited if signed or wider channels are ever added. No lower clamp
/// is needed for the same reason.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn mean_byte(sum: u64, count: usize) -> u8 {
    let rounded = (sum as f64 / count as f64 + 0.5) as u64;
    rounded.min(255) as u8
}
