//! Audio playback feature for vmemo.
//!
//! Wraps rodio playback of recorded WAV files and tracks the position
//! readout shown while a memo plays.

pub mod player;
pub mod position;

pub use player::Player;
pub use position::{PlaybackTick, PositionTracker};
