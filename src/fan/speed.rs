//! Named fan speeds and their percentage scale
//!
//! The device understands the preset names only. Percentages are derived
//! from a level's 1-based rank in [`ORDERED_NAMED_FAN_SPEEDS`]; "off" is the
//! implicit zeroth state and is not part of the list.

use crate::error::{FanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named fan speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedLevel {
    Low,
    Medium,
    High,
}

/// Speeds ordered from slowest to fastest (off is not included)
pub const ORDERED_NAMED_FAN_SPEEDS: [SpeedLevel; 3] =
    [SpeedLevel::Low, SpeedLevel::Medium, SpeedLevel::High];

/// Preset modes in the order they are offered to the user
pub const PRESET_MODES: [SpeedLevel; 3] = [SpeedLevel::High, SpeedLevel::Medium, SpeedLevel::Low];

/// Number of named speeds the fan supports
pub fn level_count() -> usize {
    ORDERED_NAMED_FAN_SPEEDS.len()
}

/// Percentage for a preset name, e.g. `"medium"` -> 67
pub fn percentage_of(name: &str) -> Result<u8> {
    name.parse::<SpeedLevel>().map(SpeedLevel::percentage)
}

impl SpeedLevel {
    /// Wire and display name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedLevel::Low => "low",
            SpeedLevel::Medium => "medium",
            SpeedLevel::High => "high",
        }
    }

    /// 1-based position in [`ORDERED_NAMED_FAN_SPEEDS`]
    pub fn rank(&self) -> usize {
        match self {
            SpeedLevel::Low => 1,
            SpeedLevel::Medium => 2,
            SpeedLevel::High => 3,
        }
    }

    /// Rounded `rank * 100 / level_count()`: low 33, medium 67, high 100
    pub fn percentage(self) -> u8 {
        let count = level_count();
        let scaled = (self.rank() * 100 + count / 2) / count;
        // rank <= count, so scaled <= 100
        scaled as u8
    }

    /// Nearest level for a percentage, `None` meaning off
    ///
    /// Picks the slowest level whose percentage is not below `percentage`,
    /// so every level maps back to itself.
    pub fn from_percentage(percentage: u32) -> Result<Option<SpeedLevel>> {
        if percentage > 100 {
            return Err(FanError::InvalidPercentage(percentage));
        }
        if percentage == 0 {
            return Ok(None);
        }

        let level = ORDERED_NAMED_FAN_SPEEDS
            .iter()
            .copied()
            .find(|level| u32::from(level.percentage()) >= percentage)
            .unwrap_or(SpeedLevel::High);
        Ok(Some(level))
    }
}

impl fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeedLevel {
    type Err = FanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(SpeedLevel::Low),
            "medium" => Ok(SpeedLevel::Medium),
            "high" => Ok(SpeedLevel::High),
            _ => Err(FanError::invalid_speed_level(s)),
        }
    }
}
