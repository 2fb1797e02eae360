//! Error types for the lighting output system
use thiserror::Error;

use crate::config::FixtureType;

/// Art-Net lighting output errors
#[derive(Error, Debug)]
pub enum ArtNetError {
    /// Refresh rate below 1 Hz
    #[error("Refresh rate must be at least 1 (got {0})")]
    InvalidRefreshRate(i64),

    /// Missing or non-positive 1-based start address
    #[error("Fixture start address must be specified")]
    MissingStartAddress,

    /// Missing or non-positive repeat count
    #[error("Fixture count must be specified")]
    MissingFixtureCount,

    /// Missing or empty fixture type
    #[error("Fixture type must be specified")]
    MissingFixtureType,

    /// Fixture type not one of DIMMER, RGB, RGBW
    #[error("Unknown fixture type: {0}")]
    UnknownFixtureType(String),

    /// Declared channel stride is smaller than the color mode needs
    #[error(
        "Fixture channel count must be at least enough channels for the color mode \
         ({fixture_type} needs {required}, got {actual})"
    )]
    InsufficientChannels {
        fixture_type: FixtureType,
        required: usize,
        actual: i64,
    },

    /// Repeated fixture instances run past the last DMX channel
    #[error("Fixture channels exceed the DMX universe: channel {end} is past 512")]
    UniverseOverflow { end: usize },

    /// Art-Net port-address is 15 bits wide
    #[error("Universe must be between 0 and 32767 (got {0})")]
    InvalidUniverse(i64),

    /// UDP port out of range
    #[error("Port must be between 0 and 65535 (got {0})")]
    InvalidPort(i64),

    /// Host is not a valid IP address
    #[error("Invalid Art-Net host address '{host}': {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A fixture-level error, annotated with its position in the configuration
    #[error("Sender #{sender}, fixture #{fixture}: {source}")]
    InFixture {
        sender: usize,
        fixture: usize,
        #[source]
        source: Box<ArtNetError>,
    },

    /// DMX payload longer than one universe
    #[error("DMX payload too large: {0} bytes (max 512)")]
    PayloadTooLarge(usize),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ArtNetError {
    /// Wrap a fixture-level error with its sender and fixture index.
    pub fn in_fixture(sender: usize, fixture: usize, source: ArtNetError) -> Self {
        Self::InFixture {
            sender,
            fixture,
            source: Box::new(source),
        }
    }

    /// The innermost cause, with any positional annotation removed.
    pub fn kind(&self) -> &ArtNetError {
        match self {
            Self::InFixture { source, .. } => source.kind(),
            other => other,
        }
    }
}

/// Result type for lighting output operations
pub type Result<T> = std::result::Result<T, ArtNetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArtNetError::InvalidRefreshRate(0);
        assert_eq!(err.to_string(), "Refresh rate must be at least 1 (got 0)");
    }

    #[test]
    fn test_in_fixture_kind() {
        let err = ArtNetError::in_fixture(1, 2, ArtNetError::MissingFixtureCount);
        assert!(matches!(err.kind(), ArtNetError::MissingFixtureCount));

        let msg = err.to_string();
        assert!(msg.contains("Sender #1"));
        assert!(msg.contains("fixture #2"));
        assert!(msg.contains("Fixture count must be specified"));
    }

    #[test]
    fn test_insufficient_channels_message() {
        let err = ArtNetError::InsufficientChannels {
            fixture_type: FixtureType::Rgb,
            required: 3,
            actual: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("RGB needs 3"));
        assert!(msg.contains("got 2"));
    }
}
