/// Repeat mode for playback
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Repeat mode
///
/// Serialized in lowercase (`"off"`, `"one"`, `"all"`), matching the
/// persisted settings format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,
    /// Replay the current track when it finishes
    One,
    /// Wrap around to the start of the queue
    All,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::One => "one",
            Self::All => "all",
        }
    }

    /// The mode that follows this one in the `off → one → all → off` cycle
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }
}

impl std::str::FromStr for RepeatMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "one" => Ok(Self::One),
            "all" => Ok(Self::All),
            other => Err(CoreError::invalid_input(format!(
                "unknown repeat mode '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_returns_to_off_after_three_steps() {
        let mode = RepeatMode::Off;
        assert_eq!(mode.next(), RepeatMode::One);
        assert_eq!(mode.next().next(), RepeatMode::All);
        assert_eq!(mode.next().next().next(), RepeatMode::Off);
    }

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("all".parse::<RepeatMode>().unwrap(), RepeatMode::All);
        assert!("ALL".parse::<RepeatMode>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RepeatMode::One).unwrap(), "\"one\"");
    }
}
