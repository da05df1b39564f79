//! Utilities for plot views

pub mod colors;

// Re-export commonly used items
pub use colors::{categorical_color, parse_color, with_alpha};
