//! Sample collection: shape validation and per-pixel accumulation.
//!
//! The [`SampleCollector`] is fed one decoded [`ImageSample`] at a time.
//! The first accepted sample establishes the reference shape and sizes
//! the accumulator; later samples either match that shape exactly and
//! are folded in, or are rejected without touching any state. Rejection
//! is never fatal — the caller records it and moves on to the next
//! input.

use crate::reduce::{Accumulator, ReduceMode};
use crate::types::{Composite, ImageSample, Shape, StackError};

/// Outcome of offering one sample to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptResult {
    /// The sample was folded into the accumulator.
    Accepted,
    /// The sample's shape disagrees with the reference shape; nothing
    /// was accumulated and the accepted count is unchanged.
    ShapeMismatch {
        /// The reference shape established by the first accepted sample.
        expected: Shape,
        /// The rejected sample's shape.
        actual: Shape,
    },
}

/// Accumulates decoded samples and produces the reduced composite.
///
/// One collector serves one run: construct it, [`accept`](Self::accept)
/// every decoded input, then [`finish`](Self::finish) exactly once.
#[derive(Debug)]
pub struct SampleCollector {
    mode: ReduceMode,
    /// `None` until the first sample is accepted.
    state: Option<RunState>,
}

#[derive(Debug)]
struct RunState {
    reference: Shape,
    accumulator: Accumulator,
    accepted: usize,
}

impl SampleCollector {
    /// Create a collector for the given reduction mode.
    #[must_use]
    pub const fn new(mode: ReduceMode) -> Self {
        Self { mode, state: None }
    }

    /// Offer one decoded sample to the stack.
    ///
    /// The first accepted sample fixes the reference shape; later
    /// samples must match it in every component or are rejected with
    /// [`AcceptResult::ShapeMismatch`].
    ///
    /// # Errors
    ///
    /// Returns [`StackError::UnsupportedChannelCount`] if the *first*
    /// sample carries a channel count other than 1 or 3 — no encoder
    /// output is defined for such stacks, so the run aborts rather than
    /// guess a serialization.
    pub fn accept(&mut self, sample: &ImageSample) -> Result<AcceptResult, StackError> {
        match &mut self.state {
            None => {
                let shape = sample.shape();
                if !matches!(shape.channels, 1 | 3) {
                    return Err(StackError::UnsupportedChannelCount(shape.channels));
                }
                let mut accumulator = Accumulator::new(self.mode, shape.len());
                accumulator.absorb(sample.data());
                self.state = Some(RunState {
                    reference: shape,
                    accumulator,
                    accepted: 1,
                });
                Ok(AcceptResult::Accepted)
            }
            Some(state) => {
                if sample.shape() != state.reference {
                    return Ok(AcceptResult::ShapeMismatch {
                        expected: state.reference,
                        actual: sample.shape(),
                    });
                }
                state.accumulator.absorb(sample.data());
                state.accepted += 1;
                Ok(AcceptResult::Accepted)
            }
        }
    }

    /// Number of samples accepted so far. Zero until the first accept.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.accepted)
    }

    /// The reference shape, once established.
    #[must_use]
    pub fn reference_shape(&self) -> Option<Shape> {
        self.state.as_ref().map(|s| s.reference)
    }

    /// Reduce the accumulated samples into the composite.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::EmptyStack`] if no sample was ever
    /// accepted — there is nothing to reduce and no artifact should be
    /// produced.
    pub fn finish(self) -> Result<Composite, StackError> {
        let state = self.state.ok_or(StackError::EmptyStack)?;
        let data = state.accumulator.reduce(state.accepted);
        Composite::from_raw(state.reference, data)
    }
}
