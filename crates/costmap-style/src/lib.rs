#![forbid(unsafe_code)]

//! Palettes and color mapping for costmap tiles.

pub mod color;
pub mod palette;

pub use color::Rgb;
pub use palette::{ColorMapper, ColorScheme};
