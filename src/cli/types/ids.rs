//! Team identifiers used in split report URLs.

use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for a franchise abbreviation such as `COL` or `NYY`.
///
/// Codes are normalised to upper case so they can be dropped straight into
/// split report URLs and database file names.
///
/// # Examples
///
/// ```rust
/// use diamond_scrape::TeamCode;
///
/// let team: TeamCode = "col".parse().unwrap();
/// assert_eq!(team.as_str(), "COL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamCode(String);

impl TeamCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TeamCode {
    fn default() -> Self {
        Self("COL".to_string())
    }
}

impl fmt::Display for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeamCode {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        let valid = (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic());
        if !valid {
            return Err(ScrapeError::InvalidTeam {
                value: s.to_string(),
            });
        }
        Ok(Self(code.to_ascii_uppercase()))
    }
}
