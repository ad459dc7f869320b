//! Data models for the storage layer

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of the keyed `pitching_splits` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchingSplitRow {
    pub split_type: String,
    pub year: u16,
    /// Remaining columns by name; empty cells are absent.
    pub stats: BTreeMap<String, String>,
}

impl PitchingSplitRow {
    pub fn stat(&self, name: &str) -> Option<&str> {
        self.stats.get(name).map(String::as_str)
    }
}
