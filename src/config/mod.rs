//! Configuration management for vmemo.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory.

pub mod file;

pub use file::{config_file_path, AudioConfig, MeteringConfig, PlaybackConfig, VisualizationConfig, VmemoConfig};
