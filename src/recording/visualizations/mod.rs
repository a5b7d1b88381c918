//! Visualization building blocks for the recording display.
//!
//! The bar buffer turns metering samples into a bounded bar sequence; the
//! scroll animator keeps the sequence gliding leftward as it overflows.

pub mod bars;
pub mod scroll;

pub use bars::{bar_height, Bar, BarBuffer, BarUpdate};
pub use scroll::ScrollAnimator;
