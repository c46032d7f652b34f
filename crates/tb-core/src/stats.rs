//! Aggregate blocking statistics.
//!
//! The engine itself only emits fire-and-forget block reports; counting is
//! the background script's job. This module defines the persisted counter
//! shape and its day-rollover rule so that logic has one tested home. No
//! clock is read here: callers pass the current date string, keeping the
//! rollover rule pure.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Persisted blocking counters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BlockStats {
    /// Ads blocked since the start of `last_date`.
    #[serde(default)]
    pub stats_today: u64,
    /// Ads blocked since install.
    #[serde(default)]
    pub stats_total: u64,
    /// Date string the daily counter belongs to.
    #[serde(default)]
    pub last_date: String,
}

impl BlockStats {
    pub fn new(today: &str) -> Self {
        Self {
            stats_today: 0,
            stats_total: 0,
            last_date: today.to_owned(),
        }
    }

    /// Reset the daily counter when the date has changed since the last
    /// update. Returns whether a rollover happened.
    pub fn roll_over(&mut self, today: &str) -> bool {
        if self.last_date == today {
            return false;
        }
        self.stats_today = 0;
        self.last_date = today.to_owned();
        true
    }

    /// Count one blocked ad on the given date.
    pub fn record(&mut self, today: &str) {
        self.roll_over(today);
        self.stats_today += 1;
        self.stats_total += 1;
    }
}
