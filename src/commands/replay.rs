//! Replay a previous memo from history with a position readout.

use crate::config::VmemoConfig;
use crate::playback::{Player, PositionTracker};
use crate::recording::{paths, RecorderTui, RecordingHistory, ScreenCommand};
use anyhow::anyhow;
use std::time::{Duration, Instant};

/// How far one arrow-key press seeks during playback.
const SEEK_STEP: Duration = Duration::from_secs(5);

/// Plays back a previous recording in-process with the playing screen.
///
/// # Arguments
/// * `recording_index` - Optional index of recording to play (1 = most recent, None = most recent)
pub async fn handle_replay(recording_index: Option<usize>) -> Result<(), anyhow::Error> {
    tracing::info!("=== vmemo replay ===");

    let config_data = VmemoConfig::load()?;

    let history = RecordingHistory::new(&paths::data_dir()?)?;
    let all_recordings = history.get_all_recordings()?;

    if all_recordings.is_empty() {
        return Err(anyhow!("No recordings found in history"));
    }

    // Get recording by index (1-indexed, where 1 is most recent)
    let index = recording_index.unwrap_or(1);
    if index < 1 || index > all_recordings.len() {
        return Err(anyhow!(
            "Recording index out of range. Available recordings: 1-{}",
            all_recordings.len()
        ));
    }

    let recording = &all_recordings[index - 1];
    let audio_path = &recording.audio_path;

    if !audio_path.exists() {
        return Err(anyhow!(
            "Audio file not found: {}",
            audio_path.display()
        ));
    }

    tracing::info!(
        "Playing recording #{} from {}",
        index,
        recording.created_at.format("%Y-%m-%d %H:%M:%S")
    );

    // Start playback before entering the alternate screen so a decode error
    // surfaces as a plain message
    let player = Player::play(audio_path)?;

    let mut tui = RecorderTui::new(config_data.visualization.clone())
        .map_err(|e| anyhow!("Failed to initialize UI: {e}"))?;

    let result = replay_loop(&mut tui, &player, &config_data).await;

    player.stop();
    tui.cleanup()
        .map_err(|e| anyhow!("Cleanup failed: {e}"))?;

    tracing::info!("Playback finished for recording #{}", index);
    result
}

/// Renders the playing screen until the clip ends or the user exits.
async fn replay_loop(
    tui: &mut RecorderTui,
    player: &Player,
    config: &VmemoConfig,
) -> Result<(), anyhow::Error> {
    let tick_interval = Duration::from_millis(config.playback.tick_interval_ms);
    let mut tracker = PositionTracker::new();
    tracker.on_tick(player.position());
    let mut last_tick = Instant::now();

    loop {
        match tui.handle_input() {
            Ok(ScreenCommand::Continue) => {}
            Ok(ScreenCommand::Advance) | Ok(ScreenCommand::Quit) => break,
            Ok(ScreenCommand::TogglePause) => player.toggle_pause(),
            Ok(ScreenCommand::SeekBack) => {
                if let Err(e) = player.seek_by(SEEK_STEP, true) {
                    tracing::warn!("Seek failed: {e}");
                }
            }
            Ok(ScreenCommand::SeekForward) => {
                if let Err(e) = player.seek_by(SEEK_STEP, false) {
                    tracing::warn!("Seek failed: {e}");
                }
            }
            Err(e) => {
                tracing::error!("Input handling error: {}", e);
                return Err(anyhow!("Input handling error: {e}"));
            }
        }

        if player.finished() {
            break;
        }

        let now = Instant::now();
        if now.saturating_duration_since(last_tick) >= tick_interval {
            tracker.on_tick(player.position());
            last_tick = now;
        }

        tui.render_playing(&tracker.display(), player.is_paused(), player.finished())
            .map_err(|e| anyhow!("Render failed: {e}"))?;
    }

    Ok(())
}
