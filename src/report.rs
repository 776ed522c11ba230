//! Tabular health report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io;

use crate::health::{self, PartStatus};
use crate::part::Part;

/// One exported line: a part and its health at the report instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthRow {
    pub id: String,
    pub machine_id: String,
    pub name: String,
    pub category: String,
    pub install_date: String,
    pub lifespan_days: i64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    /// One decimal, as shown to operators
    pub percentage_used: String,
    pub status: PartStatus,
}

#[must_use]
pub fn health_rows<'a>(parts: impl IntoIterator<Item = &'a Part>, now: DateTime<Utc>) -> Vec<HealthRow> {
    parts
        .into_iter()
        .map(|part| {
            let h = health::evaluate(part, now);
            HealthRow {
                id: part.id.to_string(),
                machine_id: part.machine_id.clone(),
                name: part.name.clone(),
                category: part.category.clone(),
                install_date: part.install_date.format("%Y-%m-%d").to_string(),
                lifespan_days: part.lifespan_days,
                days_elapsed: h.days_elapsed,
                days_remaining: h.days_remaining,
                percentage_used: format!("{:.1}", h.percentage_used),
                status: h.status,
            }
        })
        .collect()
}

/// Write `rows` as CSV with a header line.
///
/// # Errors
///
/// Returns `csv::Error` if writing to `writer` fails.
pub fn write_csv<W: io::Write>(writer: W, rows: &[HealthRow]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
