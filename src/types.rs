use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Trust level of a CI run.
///
/// Only `Three` (production trust) receives real secrets; lower levels, such
/// as runs for untrusted forks, get placeholder credentials instead.
///
/// Accepted in TOML as either an integer (`level = 3`) or a string
/// (`level = "3"`). It is rendered as the bare digit because `by-level`
/// tables are keyed by strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "LevelRepr")]
pub enum Level {
    #[default]
    One,
    Two,
    Three,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::One => "1",
            Level::Two => "2",
            Level::Three => "3",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Level::One),
            "2" => Ok(Level::Two),
            "3" => Ok(Level::Three),
            other => Err(format!("invalid level: {other} (expected 1, 2 or 3)")),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Int(i64),
    Str(String),
}

impl TryFrom<LevelRepr> for Level {
    type Error = String;

    fn try_from(repr: LevelRepr) -> Result<Self, Self::Error> {
        match repr {
            LevelRepr::Int(n) => n.to_string().parse(),
            LevelRepr::Str(s) => s.parse(),
        }
    }
}

/// Target of a `simctl` device operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Device {
    /// Every simulator known to `simctl`.
    #[default]
    All,
    /// A single simulator, by UDID or name.
    Udid(String),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::All => f.write_str("all"),
            Device::Udid(id) => f.write_str(id),
        }
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("device must not be empty".to_string()),
            "all" => Ok(Device::All),
            other => Ok(Device::Udid(other.to_string())),
        }
    }
}
