//! lamina-core: Per-pixel statistical aggregation for image stacks (sans-IO).
//!
//! Collapses N same-shape images into one composite whose value at every
//! pixel-channel position is the mean or median across the stack:
//! decode -> collect -> reduce.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. Filesystem interaction and
//! output serialization live in `lamina-stack` and `lamina-export`.

pub mod collect;
pub mod decode;
pub mod reduce;
pub mod types;

pub use collect::{AcceptResult, SampleCollector};
pub use reduce::ReduceMode;
pub use types::{
    Composite, ImageSample, Shape, SkipReason, Skipped, StackConfig, StackError, StackOutcome,
};

/// Run the full stacking pipeline over in-memory image bytes.
///
/// Each input is decoded and offered to the [`SampleCollector`]; inputs
/// that fail to decode or whose shape disagrees with the reference shape
/// (fixed by the first accepted input) are skipped and recorded, never
/// aborting the run. After the last input, the accumulated samples are
/// reduced according to `config.mode`.
///
/// Inputs are processed strictly in order, one at a time; each decoded
/// buffer is dropped as soon as its accumulation pass ends.
///
/// # Errors
///
/// Returns [`StackError::EmptyStack`] if no input was accepted.
/// Returns [`StackError::UnsupportedChannelCount`] if the first decodable
/// input carries a channel count other than 1 or 3.
pub fn stack(inputs: &[&[u8]], config: &StackConfig) -> Result<StackOutcome, StackError> {
    let mut collector = SampleCollector::new(config.mode);
    let mut skipped = Vec::new();

    for (index, bytes) in inputs.iter().enumerate() {
        let sample = match decode::decode_sample(bytes) {
            Ok(sample) => sample,
            Err(error) => {
                skipped.push(Skipped {
                    index,
                    reason: SkipReason::DecodeFailed(error.to_string()),
                });
                continue;
            }
        };

        match collector.accept(&sample)? {
            AcceptResult::Accepted => {}
            AcceptResult::ShapeMismatch { expected, actual } => {
                skipped.push(Skipped {
                    index,
                    reason: SkipReason::ShapeMismatch { expected, actual },
                });
            }
        }
    }

    let accepted = collector.accepted();
    let composite = collector.finish()?;
    Ok(StackOutcome {
        composite,
        accepted,
        skipped,
    })
}
