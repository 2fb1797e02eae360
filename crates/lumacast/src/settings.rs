//! Settings file
//!
//! A single TOML file with three sections:
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [artnet]
//! refresh-rate = 30
//!
//! [[artnet.senders]]
//! host = "10.0.0.50"
//!
//! [[artnet.senders.fixtures]]
//! type = "RGB"
//! start-address = 1
//! fixture-count = 8
//! width = 320.0
//! height = 180.0
//!
//! [pattern]
//! fps = 50.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lumacast_artnet::frame::VideoFormatDesc;
use lumacast_artnet::ArtNetSettings;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Whole application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub logging: LogConfig,
    pub artnet: ArtNetSettings,
    pub pattern: PatternSettings,
}

impl AppSettings {
    /// Read and parse a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        Self::from_toml(&text)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LogConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    pub console_output: bool,
    pub file_output: bool,
    pub log_directory: PathBuf,
    pub rotation: LogRotation,
    /// Rotated files kept in `log_directory`; 0 keeps all of them
    pub max_log_files: usize,
}

/// How often the log file is rolled over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// One `lumacast.log` appended to across runs
    Never,
    Hourly,
    #[default]
    Daily,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_directory: PathBuf::from("logs"),
            rotation: LogRotation::Daily,
            max_log_files: 7,
        }
    }
}

impl LogConfig {
    /// Level filter for the configured level, INFO if unrecognised
    pub fn parse_level(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::INFO)
    }

    pub fn ensure_log_directory(&self) -> std::io::Result<()> {
        if self.file_output {
            fs::create_dir_all(&self.log_directory)?;
        }
        Ok(())
    }
}

/// Built-in test pattern standing in for a video channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PatternSettings {
    pub width: u32,
    pub height: u32,
    /// Video frame rate, independent of the Art-Net refresh rate
    pub fps: f64,
    /// Seconds for the hue sweep to travel across the frame once
    pub cycle_seconds: f64,
    pub channel: i32,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            width: 320,
            height: 180,
            fps: 50.0,
            cycle_seconds: 10.0,
            channel: 1,
        }
    }
}

impl PatternSettings {
    pub fn format_desc(&self) -> VideoFormatDesc {
        VideoFormatDesc {
            name: format!("pattern {}x{}@{}", self.width, self.height, self.fps),
            width: self.width,
            height: self.height,
            fps: self.fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings = AppSettings::from_toml("").unwrap();
        assert_eq!(settings.logging.level, "info");
        assert!(settings.logging.console_output);
        assert_eq!(settings.logging.rotation, LogRotation::Daily);
        assert_eq!(settings.logging.max_log_files, 7);
        assert_eq!(settings.artnet.refresh_rate, 10);
        assert!(settings.artnet.senders.is_empty());
        assert_eq!(settings.pattern.width, 320);
    }

    #[test]
    fn test_full_file() {
        let settings = AppSettings::from_toml(
            r#"
            [logging]
            level = "debug"
            file-output = true
            rotation = "hourly"
            max-log-files = 3

            [artnet]
            refresh-rate = 44

            [[artnet.senders]]
            host = "10.1.1.1"
            universe = 2

            [[artnet.senders.fixtures]]
            type = "RGBW"
            start-address = 9
            fixture-count = 2

            [pattern]
            width = 64
            height = 36
            fps = 25.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.logging.parse_level(), LevelFilter::DEBUG);
        assert!(settings.logging.file_output);
        assert_eq!(settings.logging.rotation, LogRotation::Hourly);
        assert_eq!(settings.logging.max_log_files, 3);
        assert_eq!(settings.artnet.refresh_rate, 44);
        assert_eq!(settings.artnet.senders[0].universe, 2);
        assert_eq!(settings.artnet.senders[0].fixtures[0].start_address, Some(9));
        assert_eq!(settings.pattern.fps, 25.0);

        let format = settings.pattern.format_desc();
        assert_eq!((format.width, format.height), (64, 36));
    }

    #[test]
    fn test_bad_level_falls_back_to_info() {
        let config = LogConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert_eq!(config.parse_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[artnet]\nrefresh-rate = 12").unwrap();

        let settings = AppSettings::load(file.path()).unwrap();
        assert_eq!(settings.artnet.refresh_rate, 12);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = AppSettings::load(Path::new("/nonexistent/lumacast.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }
}
