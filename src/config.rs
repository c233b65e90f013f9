//! Runtime settings.
//!
//! Settings are layered with the `config` crate, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. An optional TOML/JSON/YAML file (`dpswatch.toml` unless overridden)
//! 3. `DPSWATCH_*` environment variables (e.g. `DPSWATCH_FPS=30`)
//! 4. `SOCKET_URL`, which overrides only the feed endpoint
//!
//! Command-line flags are applied on top by the binary.
//!
//! # Example file
//!
//! ```toml
//! socket_url = "ws://192.168.1.20:10501/MiniParse"
//! include_limit_break = true
//! fps = 30
//! replay_interval = "100ms"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer};

use crate::data::duration::parse_duration;

/// Endpoint OverlayPlugin listens on out of the box.
pub const DEFAULT_SOCKET_URL: &str = "ws://localhost:10501/MiniParse";

/// Config file read when none is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "dpswatch.toml";

/// Render cadence bounds, in frames per second.
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 240;

/// Which colour palette to draw with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// Pick from the terminal background.
    #[default]
    Auto,
    Dark,
    Light,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub socket_url: String,
    pub include_limit_break: bool,
    pub fps: u32,
    pub event_log: PathBuf,
    pub record_envelopes: bool,
    pub log_file: PathBuf,
    pub log_level: String,
    pub theme: ThemeChoice,
    #[serde(deserialize_with = "deserialize_duration")]
    pub replay_interval: Duration,
}

impl Settings {
    /// Load settings from defaults, `path`, and the environment.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let socket_url = std::env::var("SOCKET_URL").ok().filter(|url| !url.is_empty());
        Self::load_with(path, socket_url)
    }

    fn load_with(path: Option<&Path>, socket_url: Option<String>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let config = Config::builder()
            .set_default("socket_url", DEFAULT_SOCKET_URL)?
            .set_default("include_limit_break", false)?
            .set_default("fps", 60_i64)?
            .set_default("event_log", "event-log.txt")?
            .set_default("record_envelopes", true)?
            .set_default("log_file", "dpswatch.log")?
            .set_default("log_level", "info")?
            .set_default("theme", "auto")?
            .set_default("replay_interval", "250ms")?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("DPSWATCH").try_parsing(true))
            .set_override_option("socket_url", socket_url)?
            .build()
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut settings: Settings = config
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.fps = settings.fps.clamp(MIN_FPS, MAX_FPS);
        Ok(settings)
    }

    /// Time between two render ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.clamp(MIN_FPS, MAX_FPS)
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let settings =
            Settings::load_with(Some(Path::new("/nonexistent/dpswatch.toml")), None).unwrap();

        assert_eq!(settings.socket_url, DEFAULT_SOCKET_URL);
        assert!(!settings.include_limit_break);
        assert_eq!(settings.fps, 60);
        assert_eq!(settings.event_log, PathBuf::from("event-log.txt"));
        assert!(settings.record_envelopes);
        assert_eq!(settings.theme, ThemeChoice::Auto);
        assert_eq!(settings.replay_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"
socket_url = "ws://10.0.0.2:10501/MiniParse"
include_limit_break = true
fps = 30
theme = "light"
replay_interval = "1s"
"#,
        );

        let settings = Settings::load_with(Some(file.path()), None).unwrap();

        assert_eq!(settings.socket_url, "ws://10.0.0.2:10501/MiniParse");
        assert!(settings.include_limit_break);
        assert_eq!(settings.fps, 30);
        assert_eq!(settings.theme, ThemeChoice::Light);
        assert_eq!(settings.replay_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_socket_url_override_beats_file() {
        let file = write_config(r#"socket_url = "ws://file:1/MiniParse""#);

        let settings =
            Settings::load_with(Some(file.path()), Some("ws://env:2/MiniParse".to_string()))
                .unwrap();

        assert_eq!(settings.socket_url, "ws://env:2/MiniParse");
    }

    #[test]
    fn test_fps_is_clamped() {
        let file = write_config("fps = 10000");
        let settings = Settings::load_with(Some(file.path()), None).unwrap();
        assert_eq!(settings.fps, MAX_FPS);

        let file = write_config("fps = 0");
        let settings = Settings::load_with(Some(file.path()), None).unwrap();
        assert_eq!(settings.fps, MIN_FPS);
        assert_eq!(settings.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_frame_interval_at_sixty_fps() {
        let settings =
            Settings::load_with(Some(Path::new("/nonexistent/dpswatch.toml")), None).unwrap();
        assert_eq!(settings.frame_interval(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let file = write_config(r#"replay_interval = "soon""#);
        assert!(Settings::load_with(Some(file.path()), None).is_err());

        let file = write_config(r#"theme = "neon""#);
        assert!(Settings::load_with(Some(file.path()), None).is_err());
    }
}
