/// Quality labels used by the catalog's image and stream variants
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Stream bitrate label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AudioQuality {
    /// 96 kbps
    #[serde(rename = "96kbps")]
    Low,
    /// 160 kbps
    #[serde(rename = "160kbps")]
    Medium,
    /// 320 kbps
    #[default]
    #[serde(rename = "320kbps")]
    High,
}

impl AudioQuality {
    /// The exact label the catalog tags variants with
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "96kbps",
            Self::Medium => "160kbps",
            Self::High => "320kbps",
        }
    }
}

impl std::str::FromStr for AudioQuality {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "96kbps" => Ok(Self::Low),
            "160kbps" => Ok(Self::Medium),
            "320kbps" => Ok(Self::High),
            other => Err(CoreError::invalid_input(format!(
                "unknown audio quality '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Artwork size label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArtworkSize {
    /// 50x50 thumbnail
    #[serde(rename = "50x50")]
    Thumbnail,
    /// 150x150, used in result lists
    #[serde(rename = "150x150")]
    List,
    /// 500x500, used for the now-playing screen
    #[default]
    #[serde(rename = "500x500")]
    Full,
}

impl ArtworkSize {
    /// The exact label the catalog tags variants with
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Thumbnail => "50x50",
            Self::List => "150x150",
            Self::Full => "500x500",
        }
    }
}

impl std::str::FromStr for ArtworkSize {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "50x50" => Ok(Self::Thumbnail),
            "150x150" => Ok(Self::List),
            "500x500" => Ok(Self::Full),
            other => Err(CoreError::invalid_input(format!(
                "unknown artwork size '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for ArtworkSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
