//! Audio recording feature for vmemo.
//!
//! Provides audio capture, periodic metering, the scrolling bar
//! visualization, and the recording session's file handling.

pub mod audio;
pub mod history;
pub mod meter;
pub mod paths;
pub mod ui;
pub mod visualizations;

pub use audio::AudioRecorder;
pub use history::RecordingHistory;
pub use meter::MeteringSource;
pub use ui::{RecorderTui, ScreenCommand};
