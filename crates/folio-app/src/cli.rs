//! CLI argument definitions for the Folio share dialogue demo.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Folio: drive the share/embed dialogue through the command bus.
///
/// Each STEP is one of: open, embed, close, update, terms,
/// preset:<id>, width:<n>, height:<n>, copy:<url|manifest|embed>.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Link to the current view. Without it the share section stays hidden.
    #[arg(long = "share-url")]
    pub share_url: Option<String>,

    /// IIIF manifest link.
    #[arg(long = "manifest-url")]
    pub manifest_url: Option<String>,

    /// Base URL placed in the generated embed iframe.
    #[arg(long = "embed-url")]
    pub embed_url: Option<String>,

    /// Required statement of the resource, enabling the terms-of-use link.
    #[arg(long = "required-statement")]
    pub required_statement: Option<String>,

    /// Steps to run, in order.
    #[arg(value_name = "STEP")]
    pub steps: Vec<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > FOLIO_CONFIG env var > platform default (~/.folio/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("FOLIO_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".folio").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".folio").join("config.toml");
    }
    PathBuf::from("config.toml")
}
