//! Wear derivation
//!
//! Turns a part's install date and lifespan into elapsed days, percentage of
//! lifespan used and a [`PartStatus`]. Evaluation is pure: the caller passes
//! the instant to evaluate at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::part::{Part, PartId};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Percentage of lifespan at which a part becomes `Warning`.
pub const WARNING_THRESHOLD: f64 = 85.0;
/// Percentage of lifespan at which a part becomes `Critical`.
pub const CRITICAL_THRESHOLD: f64 = 100.0;

/// Derived health of every part, keyed by id.
pub type HealthMap = HashMap<PartId, PartHealth>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartStatus {
    Good,
    Warning,
    Critical,
}

impl PartStatus {
    /// Status for a percentage of lifespan used. `Critical` is checked first.
    #[must_use]
    pub fn from_percentage(percentage_used: f64) -> Self {
        if percentage_used >= CRITICAL_THRESHOLD {
            PartStatus::Critical
        } else if percentage_used >= WARNING_THRESHOLD {
            PartStatus::Warning
        } else {
            PartStatus::Good
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PartStatus::Good => "GOOD",
            PartStatus::Warning => "WARNING",
            PartStatus::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for PartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wear of one part at one instant. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartHealth {
    pub days_elapsed: i64,
    /// `lifespan_days - days_elapsed`; negative once the part is overdue.
    pub days_remaining: i64,
    /// Unclamped; above 100 once the part is overdue.
    #[serde(
        serialize_with = "crate::json_helpers::serialize_f64",
        deserialize_with = "crate::json_helpers::deserialize_f64"
    )]
    pub percentage_used: f64,
    pub status: PartStatus,
}

impl PartHealth {
    /// Percentage clamped to `0..=100` for progress bars.
    #[must_use]
    pub fn display_percentage(&self) -> f64 {
        if self.percentage_used.is_nan() {
            return 0.0;
        }
        self.percentage_used.clamp(0.0, 100.0)
    }
}

/// Whole days between `installed` and `now`, rounded up.
///
/// The distance is absolute, so an install date in the future counts the
/// same as one in the past.
#[must_use]
pub fn elapsed_days(installed: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (now - installed).num_milliseconds().abs();
    millis / DAY_MILLIS + i64::from(millis % DAY_MILLIS != 0)
}

/// Evaluate `part` at `now`.
///
/// A part with `lifespan_days <= 0` yields a non-finite percentage; such
/// parts are rejected when drafts are validated.
#[must_use]
pub fn evaluate(part: &Part, now: DateTime<Utc>) -> PartHealth {
    let days_elapsed = elapsed_days(part.install_date, now);
    let percentage_used = days_elapsed as f64 / part.lifespan_days as f64 * 100.0;
    PartHealth {
        days_elapsed,
        days_remaining: part.lifespan_days - days_elapsed,
        percentage_used,
        status: PartStatus::from_percentage(percentage_used),
    }
}

/// Evaluate every part at the same instant.
#[must_use]
pub fn evaluate_all(parts: &[Part], now: DateTime<Utc>) -> HealthMap {
    parts
        .iter()
        .map(|part| (part.id.clone(), evaluate(part, now)))
        .collect()
}

/// Dashboard counters over a health map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HealthSummary {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub good: usize,
}

impl HealthSummary {
    #[must_use]
    pub fn from_map(health: &HealthMap) -> Self {
        health.values().fold(Self::default(), |mut acc, h| {
            acc.total += 1;
            match h.status {
                PartStatus::Critical => acc.critical += 1,
                PartStatus::Warning => acc.warning += 1,
                PartStatus::Good => acc.good += 1,
            }
            acc
        })
    }
}
