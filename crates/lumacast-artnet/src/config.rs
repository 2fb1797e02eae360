//! Lighting output configuration
//!
//! Two layers live here:
//!
//! - **Settings** (`ArtNetSettings`, `SenderSettings`, `FixtureSettings`): the raw,
//!   deserializable shape of the settings tree. Numeric fields are signed so that
//!   out-of-range input reaches validation instead of failing to parse.
//! - **Configuration** (`Configuration`, `SenderDecl`, `FixtureDecl`): the validated,
//!   immutable form the consumer is built from.
//!
//! ```rust
//! use lumacast_artnet::config::{ArtNetSettings, Configuration, FixtureSettings, SenderSettings};
//!
//! let settings = ArtNetSettings {
//!     refresh_rate: 30,
//!     senders: vec![SenderSettings {
//!         fixtures: vec![FixtureSettings {
//!             fixture_type: Some("rgb".to_string()),
//!             start_address: Some(1),
//!             fixture_count: Some(4),
//!             ..Default::default()
//!         }],
//!         ..Default::default()
//!     }],
//! };
//!
//! let config = Configuration::from_settings(&settings).unwrap();
//! assert_eq!(config.refresh_rate(), 30);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dmx::UNIVERSE_SIZE;
use crate::error::{ArtNetError, Result};

/// Default refresh rate in Hz
pub const DEFAULT_REFRESH_RATE: i64 = 10;
/// Default Art-Net UDP port
pub const DEFAULT_PORT: i64 = 6454;
/// Default destination host
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Highest 15-bit Art-Net port-address
pub const MAX_UNIVERSE: i64 = 0x7fff;

/// Photometric model of a fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FixtureType {
    /// Single intensity channel
    Dimmer,
    /// Red, green, blue
    Rgb,
    /// Red, green, blue, white
    Rgbw,
}

impl FixtureType {
    /// Number of DMX channels the color mode writes
    pub fn channels_required(self) -> usize {
        match self {
            FixtureType::Dimmer => 1,
            FixtureType::Rgb => 3,
            FixtureType::Rgbw => 4,
        }
    }
}

impl FromStr for FixtureType {
    type Err = ArtNetError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ArtNetError::MissingFixtureType);
        }

        if trimmed.eq_ignore_ascii_case("DIMMER") {
            Ok(FixtureType::Dimmer)
        } else if trimmed.eq_ignore_ascii_case("RGB") {
            Ok(FixtureType::Rgb)
        } else if trimmed.eq_ignore_ascii_case("RGBW") {
            Ok(FixtureType::Rgbw)
        } else {
            Err(ArtNetError::UnknownFixtureType(trimmed.to_string()))
        }
    }
}

impl fmt::Display for FixtureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FixtureType::Dimmer => "DIMMER",
            FixtureType::Rgb => "RGB",
            FixtureType::Rgbw => "RGBW",
        };
        f.write_str(name)
    }
}

/// Bounding box of a fixture group in frame pixel space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, clockwise about the box center
    pub rotation: f32,
}

// --- Raw settings ---

/// Top-level lighting settings as read from a settings tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ArtNetSettings {
    pub refresh_rate: i64,
    pub senders: Vec<SenderSettings>,
}

impl Default for ArtNetSettings {
    fn default() -> Self {
        Self {
            refresh_rate: DEFAULT_REFRESH_RATE,
            senders: Vec::new(),
        }
    }
}

/// One Art-Net destination as read from a settings tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SenderSettings {
    pub universe: i64,
    pub host: String,
    pub port: i64,
    pub fixtures: Vec<FixtureSettings>,
}

impl Default for SenderSettings {
    fn default() -> Self {
        Self {
            universe: 0,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            fixtures: Vec::new(),
        }
    }
}

/// One fixture declaration (possibly repeated) as read from a settings tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FixtureSettings {
    #[serde(rename = "type")]
    pub fixture_type: Option<String>,
    /// 1-based
    pub start_address: Option<i64>,
    pub fixture_count: Option<i64>,
    pub fixture_channels: Option<i64>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

// --- Validated configuration ---

/// A validated fixture declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureDecl {
    pub fixture_type: FixtureType,
    /// 0-based DMX offset
    pub start_address: usize,
    pub fixture_count: usize,
    /// Channel stride between repeated instances
    pub fixture_channels: usize,
    pub fixture_box: FixtureBox,
}

/// A validated sender declaration
#[derive(Debug, Clone, PartialEq)]
pub struct SenderDecl {
    pub host: String,
    pub port: u16,
    pub universe: u16,
    pub fixtures: Vec<FixtureDecl>,
}

/// Validated lighting configuration, immutable after construction
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    refresh_rate: u32,
    senders: Vec<SenderDecl>,
}

impl Configuration {
    /// Validate raw settings, failing on the first invalid field.
    pub fn from_settings(settings: &ArtNetSettings) -> Result<Self> {
        if settings.refresh_rate < 1 {
            return Err(ArtNetError::InvalidRefreshRate(settings.refresh_rate));
        }
        let refresh_rate = u32::try_from(settings.refresh_rate)
            .map_err(|_| ArtNetError::InvalidRefreshRate(settings.refresh_rate))?;

        let senders = settings
            .senders
            .iter()
            .enumerate()
            .map(|(index, sender)| validate_sender(index, sender))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            refresh_rate,
            senders,
        })
    }

    /// Refresh rate in Hz (at least 1)
    pub fn refresh_rate(&self) -> u32 {
        self.refresh_rate
    }

    /// Senders in declaration order
    pub fn senders(&self) -> &[SenderDecl] {
        &self.senders
    }
}

impl TryFrom<ArtNetSettings> for Configuration {
    type Error = ArtNetError;

    fn try_from(settings: ArtNetSettings) -> Result<Self> {
        Self::from_settings(&settings)
    }
}

fn validate_sender(index: usize, sender: &SenderSettings) -> Result<SenderDecl> {
    let universe = u16::try_from(sender.universe)
        .ok()
        .filter(|u| i64::from(*u) <= MAX_UNIVERSE)
        .ok_or(ArtNetError::InvalidUniverse(sender.universe))?;

    let port = u16::try_from(sender.port).map_err(|_| ArtNetError::InvalidPort(sender.port))?;

    let fixtures = sender
        .fixtures
        .iter()
        .enumerate()
        .map(|(fixture, decl)| {
            validate_fixture(decl).map_err(|e| ArtNetError::in_fixture(index, fixture, e))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SenderDecl {
        host: sender.host.clone(),
        port,
        universe,
        fixtures,
    })
}

fn validate_fixture(fixture: &FixtureSettings) -> Result<FixtureDecl> {
    let start_address = match fixture.start_address {
        Some(address) if address >= 1 => channel_index(address - 1)?,
        _ => return Err(ArtNetError::MissingStartAddress),
    };

    let fixture_count = match fixture.fixture_count {
        Some(count) if count >= 1 => channel_index(count)?,
        _ => return Err(ArtNetError::MissingFixtureCount),
    };

    let fixture_type: FixtureType = fixture
        .fixture_type
        .as_deref()
        .ok_or(ArtNetError::MissingFixtureType)?
        .parse()?;

    let required = fixture_type.channels_required();
    let fixture_channels = match fixture.fixture_channels {
        None => required,
        Some(channels) if channels >= required as i64 => channel_index(channels)?,
        Some(channels) => {
            return Err(ArtNetError::InsufficientChannels {
                fixture_type,
                required,
                actual: channels,
            })
        }
    };

    // Last channel (exclusive) written by the final repeated instance
    let end = (fixture_count - 1)
        .checked_mul(fixture_channels)
        .and_then(|span| span.checked_add(start_address))
        .and_then(|last| last.checked_add(required))
        .unwrap_or(usize::MAX);
    if end > UNIVERSE_SIZE {
        return Err(ArtNetError::UniverseOverflow { end });
    }

    Ok(FixtureDecl {
        fixture_type,
        start_address,
        fixture_count,
        fixture_channels,
        fixture_box: FixtureBox {
            x: fixture.x,
            y: fixture.y,
            width: fixture.width,
            height: fixture.height,
            rotation: fixture.rotation,
        },
    })
}

/// A channel offset or count that does not fit `usize` lies past the universe
fn channel_index(value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| ArtNetError::UniverseOverflow { end: usize::MAX })
}
