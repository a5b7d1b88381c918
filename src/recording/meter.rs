//! Periodic signal-level metering for the recording visualization.
//!
//! Samples the recorder's captured PCM at a fixed interval, computes an RMS
//! dBFS level over the most recent ~50 ms window, and normalizes it against
//! the configured reference level into the display scale consumed by the bar
//! buffer (0 at the reference level, -10 forty dB below it).

use std::time::{Duration, Instant};

use crate::recording::audio::AudioRecorder;

/// dBFS value reported for digital silence.
const SILENCE_DBFS: f32 = -160.0;

/// Width of the dBFS range mapped onto the display scale.
const DISPLAY_RANGE_DB: f32 = 40.0;

/// One metering sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterTick {
    /// Signal level in the display scale, or `None` when no audio has been
    /// captured yet. Consumers default a missing level to 0.
    pub metering: Option<f32>,
}

/// Emits a metering sample once per configured interval while recording.
#[derive(Debug)]
pub struct MeteringSource {
    interval: Duration,
    reference_level_db: i8,
    last_tick: Option<Instant>,
}

impl MeteringSource {
    pub fn new(interval: Duration, reference_level_db: i8) -> Self {
        Self {
            interval,
            reference_level_db,
            last_tick: None,
        }
    }

    /// Arms the source; the first tick fires one interval after this.
    pub fn start(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    /// Disarms the source so no further ticks fire.
    pub fn stop(&mut self) {
        self.last_tick = None;
    }

    /// Emits a tick when the interval has elapsed, otherwise `None`.
    ///
    /// The level is computed over the last ~50 ms of captured samples so the
    /// bar reflects the signal at the tick, not the whole recording.
    pub fn poll(&mut self, recorder: &AudioRecorder, now: Instant) -> Option<MeterTick> {
        let last = self.last_tick?;
        if now.saturating_duration_since(last) < self.interval {
            return None;
        }
        self.last_tick = Some(now);

        let window = (recorder.sample_rate() / 20).max(1) as usize;
        let samples = recorder.tail_samples(window);
        if samples.is_empty() {
            return Some(MeterTick { metering: None });
        }

        let db_fs = level_dbfs(&samples);
        let level = display_level(db_fs, self.reference_level_db);
        Some(MeterTick {
            metering: Some(level),
        })
    }
}

/// Computes the RMS level of the samples in dBFS.
///
/// Returns -160 for digital silence.
pub fn level_dbfs(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return SILENCE_DBFS;
    }

    let sum_of_squares: i64 = samples.iter().map(|&x| (x as i64).pow(2)).sum();
    let mean_square = sum_of_squares / samples.len() as i64;
    let rms = (mean_square as f32).sqrt();

    if rms > 0.0 {
        20.0 * (rms / 32767.0).log10()
    } else {
        SILENCE_DBFS
    }
}

/// Normalizes a dBFS level against the reference level into the display scale.
///
/// The reference level maps to 0 (loudest bar); forty dB below it maps to -10
/// (quietest bar). The result is clamped to [-160, 0].
pub fn display_level(db_fs: f32, reference_level_db: i8) -> f32 {
    let relative = db_fs - reference_level_db as f32;
    (relative / DISPLAY_RANGE_DB * 10.0).clamp(SILENCE_DBFS, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dbfs_of_silence() {
        assert_eq!(level_dbfs(&[]), -160.0);
        assert_eq!(level_dbfs(&[0; 512]), -160.0);
    }

    #[test]
    fn test_dbfs_of_full_scale() {
        let full_scale = vec![32767i16; 512];
        assert!(level_dbfs(&full_scale).abs() < 0.01);
    }

    #[test]
    fn test_dbfs_of_half_scale() {
        let half_scale = vec![16384i16; 512];
        let db = level_dbfs(&half_scale);
        assert!((db - (-6.02)).abs() < 0.05, "got {db}");
    }

    #[test]
    fn test_display_level_anchors() {
        // At the reference level the display is at its ceiling
        assert_eq!(display_level(-20.0, -20), 0.0);
        // Forty dB below the reference maps to the display floor anchor
        assert!((display_level(-60.0, -20) - (-10.0)).abs() < f32::EPSILON);
        // Louder than the reference clamps to the ceiling
        assert_eq!(display_level(-5.0, -20), 0.0);
    }

    #[test]
    fn test_display_level_midpoint() {
        // Twenty dB below the reference sits halfway down the display range
        assert!((display_level(-40.0, -20) - (-5.0)).abs() < f32::EPSILON);
    }
}
