//! Part fields supplied on the command line.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use partlife::PartDraft;

/// Optional overrides for every editable part field.
///
/// `add` starts from a blank draft, `edit` from the existing part and
/// `clone` from the source part; only flags that were given change the draft.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct DraftArgs {
    /// Machine identifier (e.g. M-01)
    #[arg(long)]
    pub machine: Option<String>,

    /// Part name
    #[arg(long)]
    pub name: Option<String>,

    /// Category (e.g. Engine, Brakes, Hydraulics)
    #[arg(long)]
    pub category: Option<String>,

    /// Expected lifespan in days
    #[arg(long, allow_negative_numbers = true)]
    pub lifespan: Option<i64>,

    /// Install date as YYYY-MM-DD
    #[arg(long, value_parser = parse_install_date)]
    pub installed: Option<DateTime<Utc>>,

    /// Free-form notes; pass an empty string to clear
    #[arg(long)]
    pub notes: Option<String>,
}

impl DraftArgs {
    pub fn apply(self, draft: &mut PartDraft) {
        if let Some(machine) = self.machine {
            draft.machine_id = machine;
        }
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(lifespan) = self.lifespan {
            draft.lifespan_days = lifespan;
        }
        if let Some(installed) = self.installed {
            draft.install_date = Some(installed);
        }
        if let Some(notes) = self.notes {
            draft.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        }
    }
}

/// Parse a calendar date as midnight UTC.
pub fn parse_install_date(value: &str) -> Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", value, e))
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
}
