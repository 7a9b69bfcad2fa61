//! pensketch-export: Pure format serializers (sans-IO)
//!
//! Converts the strokes of a surface into output formats. Currently
//! supports SVG.

pub mod svg;

pub use svg::{Dimensions, SvgMetadata, canvas_dimensions, to_svg};
