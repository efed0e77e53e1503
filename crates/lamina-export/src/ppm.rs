//! Plain-text netpbm serializer (PGM `P2` / PPM `P3`).
//!
//! Converts a composite into the ASCII netpbm layout:
//!
//! ```text
//! P3            <- magic: P2 for 1 channel, P3 for 3 channels
//! <width> <height>
//! 255           <- maximum channel value
//! <r> <g> <b>   <- one pixel per line, channels space-separated
//! ...
//! ```
//!
//! Values are decimal text in [0, 255]. This is a pure function with no
//! I/O — it returns a `String` and the caller decides where it goes.

use std::fmt::Write;

use lamina_core::Composite;

/// Errors that can occur during export serialization.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The composite's channel count has no netpbm text encoding.
    /// Only 1 (PGM `P2`) and 3 (PPM `P3`) are defined.
    #[error("unsupported channel count {0} for netpbm export (only 1 and 3)")]
    UnsupportedChannelCount(u8),
}

/// Serialize a composite into plain-text netpbm (`P2` or `P3`).
///
/// The header is three lines: the magic token, `<width> <height>`, and
/// the maximum channel value `255`. Pixel data follows as one line per
/// pixel with channels space-separated.
///
/// # Errors
///
/// Returns [`ExportError::UnsupportedChannelCount`] for channel counts
/// other than 1 or 3.
pub fn to_ppm(composite: &Composite) -> Result<String, ExportError> {
    let shape = composite.shape();
    let magic = match shape.channels {
        1 => "P2",
        3 => "P3",
        other => return Err(ExportError::UnsupportedChannelCount(other)),
    };

    // Worst case 4 bytes per value ("255" + separator) plus the header.
    let mut out = String::with_capacity(shape.len() * 4 + 32);
    let _ = writeln!(out, "{magic}");
    let _ = writeln!(out, "{} {}", shape.width, shape.height);
    let _ = writeln!(out, "255");

    for pixel in composite.data().chunks(usize::from(shape.channels)) {
        for (i, value) in pixel.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{value}");
        }
        out.push('\n');
    }

    Ok(out)
}
