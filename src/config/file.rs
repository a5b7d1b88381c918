//! Configuration file management for vmemo.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory. Geometry and timing
//! values are validated on load so a misconfigured bar layout is a startup error
//! rather than a silently broken visualization.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Audio capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `vmemo list-devices`
    /// - device name from `vmemo list-devices`
    pub device: String,
    /// Recording sample rate in Hz (actual rate may differ based on device)
    pub sample_rate: u32,
    /// Reference level in dBFS that maps to the loudest bar (typical: -20 to -6 dBFS)
    #[serde(default = "default_reference_level_db")]
    pub reference_level_db: i8,
}

fn default_reference_level_db() -> i8 {
    -20
}

/// Metering source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteringConfig {
    /// Interval between metering samples in milliseconds
    #[serde(default = "default_metering_interval_ms")]
    pub interval_ms: u64,
}

fn default_metering_interval_ms() -> u64 {
    500
}

impl Default for MeteringConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_metering_interval_ms(),
        }
    }
}

/// Bar visualization geometry and animation timing, measured in terminal cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationConfig {
    /// Width of one bar in cells
    #[serde(default = "default_bar_width")]
    pub bar_width: u16,
    /// Gap between bars in cells
    #[serde(default = "default_bar_gap")]
    pub bar_gap: u16,
    /// Width of the bar display area in cells
    #[serde(default = "default_display_width")]
    pub display_width: u16,
    /// Duration of the scroll animation in milliseconds.
    /// Must not exceed the metering interval, or bars would jump.
    #[serde(default = "default_scroll_duration_ms")]
    pub scroll_duration_ms: u64,
}

fn default_bar_width() -> u16 {
    2
}

fn default_bar_gap() -> u16 {
    1
}

fn default_display_width() -> u16 {
    42
}

fn default_scroll_duration_ms() -> u64 {
    470
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            bar_gap: default_bar_gap(),
            display_width: default_display_width(),
            scroll_duration_ms: default_scroll_duration_ms(),
        }
    }
}

impl VisualizationConfig {
    /// The horizontal footprint of one bar slot: bar width plus gap.
    pub fn pitch(&self) -> u16 {
        self.bar_width + self.bar_gap
    }
}

/// Playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Interval between playback position updates in milliseconds
    #[serde(default = "default_playback_tick_ms")]
    pub tick_interval_ms: u64,
}

fn default_playback_tick_ms() -> u64 {
    1000
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_playback_tick_ms(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmemoConfig {
    pub audio: AudioConfig,
    #[serde(default)]
    pub metering: MeteringConfig,
    #[serde(default)]
    pub visualization: VisualizationConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl VmemoConfig {
    /// Loads and validates configuration from the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed
    /// - If geometry or timing values fail validation
    pub fn load() -> Result<Self, anyhow::Error> {
        let config_path = config_file_path()?;
        let config_content = fs::read_to_string(&config_path)?;
        let config: VmemoConfig = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates geometry and timing values.
    ///
    /// # Errors
    /// - If the bar width is zero (the overflow condition would never advance)
    /// - If the display width holds fewer than two bar slots
    /// - If the scroll animation outlasts the metering interval
    /// - If any timer interval is zero
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let viz = &self.visualization;
        if viz.bar_width == 0 {
            anyhow::bail!("visualization.bar_width must be at least 1 cell");
        }
        if viz.display_width < 2 * viz.pitch() {
            anyhow::bail!(
                "visualization.display_width ({}) must hold at least two bar slots ({} cells)",
                viz.display_width,
                2 * viz.pitch()
            );
        }
        if self.metering.interval_ms == 0 {
            anyhow::bail!("metering.interval_ms must be greater than zero");
        }
        if viz.scroll_duration_ms > self.metering.interval_ms {
            anyhow::bail!(
                "visualization.scroll_duration_ms ({}) must not exceed metering.interval_ms ({})",
                viz.scroll_duration_ms,
                self.metering.interval_ms
            );
        }
        if self.playback.tick_interval_ms == 0 {
            anyhow::bail!("playback.tick_interval_ms must be greater than zero");
        }
        Ok(())
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    #[allow(dead_code)]
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = config_file_path()?;
        let config_content = toml::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }

    /// Returns default configuration values.
    #[allow(dead_code)]
    pub(crate) fn default() -> Self {
        VmemoConfig {
            audio: AudioConfig {
                device: "default".to_string(),
                sample_rate: 44100,
                reference_level_db: default_reference_level_db(),
            },
            metering: MeteringConfig::default(),
            visualization: VisualizationConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

/// Retrieves the path to the config file, creating the config directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn config_file_path() -> Result<PathBuf, std::io::Error> {
    let config_dir = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not find home directory",
        )
    })?;
    let config_path = config_dir.join(".config").join("vmemo").join("vmemo.toml");

    std::fs::create_dir_all(config_path.parent().unwrap())?;

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = VmemoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.visualization.pitch(), 3);
    }

    #[test]
    fn test_embedded_template_parses_and_validates() {
        let template = include_str!("../../environments/vmemo.toml");
        let config: VmemoConfig = toml::from_str(template).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.audio.device, "default");
    }

    #[test]
    fn test_zero_bar_width_rejected() {
        let mut config = VmemoConfig::default();
        config.visualization.bar_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display_width_must_hold_two_slots() {
        let mut config = VmemoConfig::default();
        config.visualization.display_width = config.visualization.pitch() * 2 - 1;
        assert!(config.validate().is_err());
        config.visualization.display_width = config.visualization.pitch() * 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scroll_duration_bounded_by_metering_interval() {
        let mut config = VmemoConfig::default();
        config.visualization.scroll_duration_ms = config.metering.interval_ms + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let minimal = r#"
[audio]
device = "default"
sample_rate = 16000
"#;
        let config: VmemoConfig = toml::from_str(minimal).unwrap();
        assert_eq!(config.metering.interval_ms, 500);
        assert_eq!(config.visualization.scroll_duration_ms, 470);
        assert_eq!(config.playback.tick_interval_ms, 1000);
    }
}
