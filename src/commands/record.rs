//! The voice memo screen.
//!
//! Wires the session state machine to the audio engine: recording with the
//! live scrolling bar visualization, stop straight into playback with a
//! position readout, reset back to idle. Supports external session triggers
//! via SIGUSR1.

use crate::config::VmemoConfig;
use crate::playback::{Player, PositionTracker};
use crate::recording::visualizations::{BarBuffer, BarUpdate, ScrollAnimator};
use crate::recording::{
    paths, AudioRecorder, MeteringSource, RecorderTui, RecordingHistory, ScreenCommand,
};
use crate::session::{Session, SessionAction, SessionState};
use crate::ui::ErrorScreen;
use anyhow::anyhow;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How far one arrow-key press seeks during playback.
const SEEK_STEP: Duration = Duration::from_secs(5);

/// Handles the voice memo screen.
///
/// Runs the idle / recording / playing loop until the user quits. A SIGUSR1
/// advances the session the same way the space key does, so external tooling
/// can drive the screen.
pub async fn handle_record() -> Result<(), anyhow::Error> {
    tracing::info!("=== vmemo recorder started ===");

    let config_data = match VmemoConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err}");
            let error_message = format!(
                "Configuration Error:\n\n{err}\n\nPlease check your ~/.config/vmemo/vmemo.toml file and try again."
            );
            let mut error_screen = ErrorScreen::new()?;
            error_screen.show_error(&error_message)?;
            error_screen.cleanup()?;
            return Err(anyhow!("Configuration error: {err}"));
        }
    };

    tracing::info!(
        "Configuration loaded: device={}, sample_rate={}Hz, pitch={} cells, display_width={} cells, metering_interval={}ms",
        config_data.audio.device,
        config_data.audio.sample_rate,
        config_data.visualization.pitch(),
        config_data.visualization.display_width,
        config_data.metering.interval_ms
    );

    let mut screen = MemoScreen::new(&config_data)?;

    let mut tui = RecorderTui::new(config_data.visualization.clone())
        .map_err(|e| anyhow!("Failed to initialize UI: {e}"))?;

    let external_trigger = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, external_trigger.clone())
        .map_err(|e| anyhow!("Failed to register signal handler: {e}"))?;

    tracing::debug!("Entering memo loop. Space advances the session, 'q' quits.");

    let result = run_loop(&mut screen, &mut tui, &external_trigger).await;

    screen.shutdown();
    tui.cleanup()
        .map_err(|e| anyhow!("Cleanup failed: {e}"))?;

    if let Err(e) = &result {
        tracing::error!("Memo screen error: {e}");
        let mut error_screen = ErrorScreen::new()?;
        error_screen.show_error(&format!("Error:\n\n{e}"))?;
        error_screen.cleanup()?;
    }

    tracing::info!("=== vmemo recorder exited ===");
    result
}

/// The memo screen's event loop.
async fn run_loop(
    screen: &mut MemoScreen,
    tui: &mut RecorderTui,
    external_trigger: &AtomicBool,
) -> Result<(), anyhow::Error> {
    loop {
        if external_trigger.swap(false, Ordering::Relaxed) {
            tracing::info!("Received SIGUSR1: advancing session via external trigger");
            screen.advance()?;
        }

        match tui.handle_input() {
            Ok(ScreenCommand::Continue) => {}
            Ok(ScreenCommand::Advance) => {
                screen.advance()?;
            }
            Ok(ScreenCommand::TogglePause) => {
                screen.toggle_pause();
            }
            Ok(ScreenCommand::SeekBack) => {
                screen.seek(SEEK_STEP, true);
            }
            Ok(ScreenCommand::SeekForward) => {
                screen.seek(SEEK_STEP, false);
            }
            Ok(ScreenCommand::Quit) => {
                tracing::debug!("Quit requested");
                break;
            }
            Err(e) => {
                tracing::error!("Input handling error: {}", e);
                return Err(anyhow!("Input handling error: {e}"));
            }
        }

        screen.poll_ticks();
        screen.render(tui)?;
    }

    Ok(())
}

/// All state owned by the memo screen.
struct MemoScreen {
    session: Session,
    recorder: AudioRecorder,
    meter: MeteringSource,
    bars: BarBuffer,
    animator: ScrollAnimator,
    tracker: PositionTracker,
    player: Option<Player>,
    history: RecordingHistory,
    recording_path: Option<PathBuf>,
    last_playback_tick: Option<Instant>,
    playback_tick_interval: Duration,
}

impl MemoScreen {
    fn new(config: &VmemoConfig) -> Result<Self, anyhow::Error> {
        let viz = &config.visualization;
        Ok(Self {
            session: Session::new(),
            recorder: AudioRecorder::new(config.audio.sample_rate, config.audio.device.clone()),
            meter: MeteringSource::new(
                Duration::from_millis(config.metering.interval_ms),
                config.audio.reference_level_db,
            ),
            bars: BarBuffer::new(viz.pitch(), viz.display_width),
            animator: ScrollAnimator::new(Duration::from_millis(viz.scroll_duration_ms)),
            tracker: PositionTracker::new(),
            player: None,
            history: RecordingHistory::new(&paths::data_dir()?)?,
            recording_path: None,
            last_playback_tick: None,
            playback_tick_interval: Duration::from_millis(config.playback.tick_interval_ms),
        })
    }

    /// Advances the session: start from idle, stop into playback from
    /// recording, reset from playing. Rejected actions are no-ops.
    fn advance(&mut self) -> Result<(), anyhow::Error> {
        let action = match self.session.state() {
            SessionState::Idle => SessionAction::Start,
            SessionState::Recording => SessionAction::Stop,
            SessionState::Playing => SessionAction::Reset,
        };
        if let Err(e) = self.session.begin(action) {
            tracing::debug!("Session action rejected: {e}");
            return Ok(());
        }

        match action {
            SessionAction::Start => self.start_recording(),
            SessionAction::Stop => self.stop_into_playback(),
            SessionAction::Reset => {
                self.reset_playback();
                Ok(())
            }
        }
    }

    /// Idle -> Recording: fresh path, cleared visualization, armed meter.
    fn start_recording(&mut self) -> Result<(), anyhow::Error> {
        self.tracker.clear();
        self.bars.clear();
        self.animator.reset();

        let path = match paths::new_recording_path() {
            Ok(path) => path,
            Err(e) => {
                self.session.fail();
                return Err(e.context("Failed to create recording path"));
            }
        };

        if let Err(e) = self.recorder.start_recording() {
            tracing::error!("Failed to start recording: {}", e);
            self.session.fail();
            return Err(e.context("Failed to start recording"));
        }

        self.recording_path = Some(path);
        self.meter.start(Instant::now());
        self.session.confirm();
        tracing::info!("Session: recording started");
        Ok(())
    }

    /// Recording -> Playing: finalize the WAV, then start playback from it.
    ///
    /// The stop call completes (file readable on disk) before playback is
    /// attempted. An empty recording falls back to idle instead of playing.
    fn stop_into_playback(&mut self) -> Result<(), anyhow::Error> {
        self.meter.stop();

        let path = match self.recording_path.take() {
            Some(path) => path,
            None => {
                self.session.fail();
                return Err(anyhow!("No recording path for active session"));
            }
        };

        let sample_count = match self.recorder.stop_recording(&path) {
            Ok(count) => count,
            Err(e) => {
                self.session.fail();
                return Err(e.context("Failed to save recording"));
            }
        };

        self.bars.clear();
        self.animator.reset();

        if sample_count == 0 {
            tracing::warn!("Empty recording; returning to idle");
            self.session.abort();
            return Ok(());
        }

        let duration_ms =
            (sample_count as u64).saturating_mul(1000) / self.recorder.sample_rate() as u64;
        if let Err(e) = self.history.save_recording(path.clone(), duration_ms) {
            tracing::warn!("Failed to save recording history: {}", e);
        }

        let player = match Player::play(&path) {
            Ok(player) => player,
            Err(e) => {
                self.session.fail();
                return Err(e.context("Failed to start playback"));
            }
        };

        self.tracker.clear();
        self.tracker.on_tick(player.position());
        self.last_playback_tick = Some(Instant::now());
        self.player = Some(player);
        self.session.confirm();
        tracing::info!("Session: playback started");
        Ok(())
    }

    /// Playing -> Idle: stop playback, clear the readout.
    fn reset_playback(&mut self) {
        if let Some(player) = self.player.take() {
            player.stop();
        }
        self.tracker.clear();
        self.last_playback_tick = None;
        self.session.confirm();
        tracing::info!("Session: reset to idle");
    }

    fn toggle_pause(&self) {
        if self.session.state() != SessionState::Playing {
            return;
        }
        if let Some(player) = &self.player {
            player.toggle_pause();
        }
    }

    fn seek(&self, step: Duration, backwards: bool) {
        if self.session.state() != SessionState::Playing {
            return;
        }
        if let Some(player) = &self.player {
            if let Err(e) = player.seek_by(step, backwards) {
                tracing::warn!("Seek failed: {e}");
            }
        }
    }

    /// Drives the two periodic tick sources: metering while recording,
    /// playback position while playing.
    fn poll_ticks(&mut self) {
        let now = Instant::now();
        match self.session.state() {
            SessionState::Recording => {
                if let Some(tick) = self.meter.poll(&self.recorder, now) {
                    let level = tick.metering.unwrap_or(0.0);
                    if self.bars.push(level) == BarUpdate::Overflowed {
                        self.animator.trigger(self.bars.pitch() as f32, now);
                    }
                    tracing::trace!("Metering tick: level={:.2}, {} bars", level, self.bars.len());
                }
            }
            SessionState::Playing => {
                let due = self
                    .last_playback_tick
                    .is_none_or(|last| now.saturating_duration_since(last) >= self.playback_tick_interval);
                if due {
                    if let Some(player) = &self.player {
                        self.tracker.on_tick(player.position());
                        self.last_playback_tick = Some(now);
                    }
                }
            }
            SessionState::Idle => {}
        }
    }

    /// Renders the screen for the current session state.
    fn render(&mut self, tui: &mut RecorderTui) -> Result<(), anyhow::Error> {
        match self.session.state() {
            SessionState::Idle => tui
                .render_idle()
                .map_err(|e| anyhow!("Render failed: {e}")),
            SessionState::Recording => {
                let now = Instant::now();
                let elapsed = Duration::from_secs_f64(
                    self.recorder.sample_count() as f64 / self.recorder.sample_rate() as f64,
                );
                tui.render_recording(&self.bars, self.animator.offset_at(now), elapsed)
                    .map_err(|e| anyhow!("Render failed: {e}"))
            }
            SessionState::Playing => {
                let (paused, finished) = self
                    .player
                    .as_ref()
                    .map(|p| (p.is_paused(), p.finished()))
                    .unwrap_or((false, false));
                tui.render_playing(&self.tracker.display(), paused, finished)
                    .map_err(|e| anyhow!("Render failed: {e}"))
            }
        }
    }

    /// Tears the screen down on quit, finalizing an in-flight recording so a
    /// memo the user already spoke is not lost.
    fn shutdown(&mut self) {
        if self.session.state() == SessionState::Recording {
            self.meter.stop();
            if let Some(path) = self.recording_path.take() {
                match self.recorder.stop_recording(&path) {
                    Ok(0) => {}
                    Ok(sample_count) => {
                        let duration_ms = (sample_count as u64).saturating_mul(1000)
                            / self.recorder.sample_rate() as u64;
                        if let Err(e) = self.history.save_recording(path, duration_ms) {
                            tracing::warn!("Failed to save recording history: {}", e);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to finalize recording on quit: {}", e);
                    }
                }
            }
        }
        if let Some(player) = self.player.take() {
            player.stop();
        }
        self.session.abort();
    }
}
