//! Terminal and JSON rendering of parts and their health.

use colored::{ColoredString, Colorize};
use serde::Serialize;

use partlife::filter::EmptyReason;
use partlife::health::HealthSummary;
use partlife::{HealthMap, Part, PartHealth, PartStatus};

const BAR_WIDTH: usize = 20;

/// A part with its health, as emitted by `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartReport<'a> {
    #[serde(flatten)]
    pub part: &'a Part,
    pub health: Option<&'a PartHealth>,
}

#[must_use]
pub fn reports<'a>(parts: &[&'a Part], health: &'a HealthMap) -> Vec<PartReport<'a>> {
    parts
        .iter()
        .map(|part| PartReport {
            part,
            health: health.get(&part.id),
        })
        .collect()
}

#[must_use]
pub fn status_label(status: PartStatus) -> ColoredString {
    match status {
        PartStatus::Good => status.as_str().green(),
        PartStatus::Warning => status.as_str().yellow(),
        PartStatus::Critical => status.as_str().red().bold(),
    }
}

/// Fixed-width wear bar filled in proportion to the clamped percentage.
#[must_use]
pub fn wear_bar(health: &PartHealth) -> String {
    let filled = ((health.display_percentage() / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One line per part: id, machine, name, category, wear and days remaining.
#[must_use]
pub fn part_line(part: &Part, health: Option<&PartHealth>) -> String {
    let head = format!(
        "{:<34} {:<8} {:<24} {:<14}",
        part.id.as_str(),
        part.machine_id,
        part.name,
        part.category
    );
    match health {
        Some(h) => format!(
            "{} {} {:>6.1}% {:>6} days left  {}",
            head,
            wear_bar(h),
            h.percentage_used,
            h.days_remaining,
            status_label(h.status)
        ),
        None => format!("{} (no health data)", head),
    }
}

#[must_use]
pub fn empty_message(reason: EmptyReason) -> &'static str {
    match reason {
        EmptyReason::NoParts => "No parts in the inventory yet. Add one with `partlife add`.",
        EmptyReason::NoMatches => "No parts match the current filters.",
    }
}

#[must_use]
pub fn summary_lines(summary: &HealthSummary) -> Vec<String> {
    vec![
        format!("Total parts: {}", summary.total),
        format!("{}: {}", status_label(PartStatus::Critical), summary.critical),
        format!("{}: {}", status_label(PartStatus::Warning), summary.warning),
        format!("{}: {}", status_label(PartStatus::Good), summary.good),
    ]
}
