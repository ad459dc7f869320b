//! Season types for the scraped leaderboards and split reports.

use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Earliest season the source sites publish split reports for.
pub const FIRST_SEASON: u16 = 1871;

/// Type-safe wrapper for Season years
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Season(pub u16);

impl Season {
    pub fn new(year: u16) -> Self {
        Self(year)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl Default for Season {
    fn default() -> Self {
        Self(2024)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Season {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        let year: u16 = s.trim().parse().map_err(|_| ScrapeError::InvalidSeason {
            value: s.to_string(),
        })?;
        if year < FIRST_SEASON {
            return Err(ScrapeError::InvalidSeason {
                value: s.to_string(),
            });
        }
        Ok(Self(year))
    }
}

/// Inclusive range of seasons walked by the multi-year scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonRange {
    from: Season,
    to: Season,
}

impl SeasonRange {
    pub fn new(from: Season, to: Season) -> Result<Self> {
        if from > to {
            return Err(ScrapeError::InvalidSeasonRange {
                from: from.as_u16(),
                to: to.as_u16(),
            });
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> Season {
        self.from
    }

    pub fn to(&self) -> Season {
        self.to
    }

    pub fn iter(&self) -> impl Iterator<Item = Season> {
        (self.from.as_u16()..=self.to.as_u16()).map(Season::new)
    }
}

impl fmt::Display for SeasonRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}
