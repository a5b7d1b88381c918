//! WAV playback via rodio.
//!
//! Decoding, mixing and device output are delegated to rodio; this module
//! only opens the recorded file, reads its duration from the WAV header, and
//! exposes the position/pause/seek surface the playing screen needs.

use anyhow::{anyhow, Result};
use rodio::{Decoder, OutputStream, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::playback::position::PlaybackTick;

/// Plays one recorded memo.
///
/// Dropping the player stops playback and releases the output device.
pub struct Player {
    // Kept alive for the lifetime of the sink; dropping it silences playback
    _output_stream: OutputStream,
    sink: Sink,
    duration: Duration,
}

impl Player {
    /// Opens the recorded file and starts playback immediately.
    ///
    /// The caller must ensure the file is fully written before this is
    /// invoked; the recorder finalizes the WAV before its stop call returns.
    ///
    /// # Errors
    /// - If no audio output device is available
    /// - If the file cannot be opened or decoded
    pub fn play(path: &Path) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;

        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))?;

        // Total duration from the WAV header
        let reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let duration = Duration::from_secs_f64(reader.duration() as f64 / spec.sample_rate as f64);

        sink.append(source);
        sink.play();

        tracing::info!(
            "Playback started: {} ({:.2}s)",
            path.display(),
            duration.as_secs_f64()
        );

        Ok(Self {
            _output_stream: stream,
            sink,
            duration,
        })
    }

    /// The current playback position and total duration.
    pub fn position(&self) -> PlaybackTick {
        let position = self.sink.get_pos().min(self.duration);
        PlaybackTick {
            position_ms: position.as_millis() as u64,
            duration_ms: self.duration.as_millis() as u64,
        }
    }

    /// Whether the clip has played to the end.
    pub fn finished(&self) -> bool {
        self.sink.empty()
    }

    pub fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    pub fn toggle_pause(&self) {
        if self.sink.is_paused() {
            self.sink.play();
            tracing::debug!("Playback resumed");
        } else {
            self.sink.pause();
            tracing::debug!("Playback paused");
        }
    }

    /// Seeks by the given signed amount, clamped to the clip bounds.
    ///
    /// # Errors
    /// - If the underlying decoder rejects the seek
    pub fn seek_by(&self, delta: Duration, backwards: bool) -> Result<()> {
        let current = self.sink.get_pos();
        let target = if backwards {
            current.saturating_sub(delta)
        } else {
            (current + delta).min(self.duration)
        };
        self.sink
            .try_seek(target)
            .map_err(|e| anyhow!("Seek failed: {e}"))?;
        tracing::debug!("Playback seeked to {:.2}s", target.as_secs_f64());
        Ok(())
    }

    /// Stops playback. Dropping the player has the same effect.
    pub fn stop(&self) {
        self.sink.stop();
        tracing::debug!("Playback stopped");
    }
}
