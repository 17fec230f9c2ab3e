//! Utilities for chart synthesis

pub mod colors;
pub mod stats;

// Re-export commonly used items
pub use colors::{categorical_color, palette, DEFAULT_PALETTE};
pub use stats::{mean, numeric_pairs, pearson};
