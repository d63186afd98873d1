use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Crawl-wide fidelity selector
///
/// The level is a property of a whole crawl run, not of individual records:
/// it decides whether detail pages are visited and which record shape the
/// run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DetailLevel {
    /// Level 1: listing-card fields only, no detail-page navigation
    Summary,

    /// Level 2: structured fields extracted from the detail page
    Structured,

    /// Level 3: structured fields plus the free-text description
    Full,
}

impl DetailLevel {
    /// Returns the numeric level (1, 2 or 3)
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Summary => 1,
            Self::Structured => 2,
            Self::Full => 3,
        }
    }

    /// Returns true if records at this level come from detail pages
    pub fn needs_detail_page(self) -> bool {
        !matches!(self, Self::Summary)
    }

    /// Returns a short human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Structured => "structured",
            Self::Full => "full",
        }
    }
}

impl Default for DetailLevel {
    fn default() -> Self {
        Self::Structured
    }
}

impl TryFrom<u8> for DetailLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Summary),
            2 => Ok(Self::Structured),
            3 => Ok(Self::Full),
            other => Err(format!("detail level must be 1, 2 or 3, got {}", other)),
        }
    }
}

impl From<DetailLevel> for u8 {
    fn from(level: DetailLevel) -> Self {
        level.as_u8()
    }
}

impl FromStr for DetailLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("detail level must be 1, 2 or 3, got '{}'", s))?;
        Self::try_from(value)
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_u8(), self.name())
    }
}
