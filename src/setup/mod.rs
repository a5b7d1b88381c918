//! Setup module for initial application configuration.
//!
//! Handles first-run setup by creating the config file from the embedded
//! default template, and migrating it when the application version changes.

pub mod version;

use anyhow::anyhow;

pub use version::{check_setup_needed, update_config_version};

/// Embedded default configuration template.
const DEFAULT_CONFIG: &str = include_str!("../../environments/vmemo.toml");

/// Current application version from Cargo.toml
const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs the setup process, writing the default config file.
///
/// Creates the config directory and writes the embedded default configuration
/// with a `config_version` header line.
///
/// # Errors
/// Returns an error if any file operations fail.
pub fn run_setup() -> anyhow::Result<()> {
    let config_dir = dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not determine home directory"))?
        .join(".config")
        .join("vmemo");
    std::fs::create_dir_all(&config_dir)?;

    let config_path = config_dir.join("vmemo.toml");
    let version_line = format!(r#"config_version = "{}""#, CURRENT_VERSION);
    let full_config = format!("{}\n{}", version_line, DEFAULT_CONFIG);
    std::fs::write(&config_path, full_config)?;

    tracing::info!("Default configuration written to {}", config_path.display());
    Ok(())
}
