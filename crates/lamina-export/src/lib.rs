//! lamina-export: Pure format serializers (sans-IO)
//!
//! Converts composites into output formats. Currently supports the
//! plain-text netpbm family (PGM `P2` for grayscale, PPM `P3` for RGB).

pub mod ppm;

pub use ppm::{ExportError, to_ppm};
