//! Demo inventory used when storage holds no readable data.

use chrono::{DateTime, Duration, Utc};

use crate::part::{Part, PartId};

/// (id, machine, name, category, days since install, lifespan days)
const SEED: [(&str, &str, &str, &str, i64, i64); 5] = [
    ("1", "M-01", "Engine Air Filter", "Engine", 300, 365),
    ("2", "M-01", "Brake Pads (Front)", "Brakes", 60, 730),
    ("3", "M-02", "Synthetic Oil", "Engine", 170, 180),
    ("4", "M-02", "Timing Belt", "Transmission", 1000, 1800),
    ("5", "M-03", "Cabin Filter", "HVAC", 400, 365),
];

/// Seed parts with install dates relative to `now`.
#[must_use]
pub fn default_parts(now: DateTime<Utc>) -> Vec<Part> {
    SEED.iter()
        .map(|&(id, machine_id, name, category, age, lifespan_days)| Part {
            id: PartId::from(id),
            machine_id: machine_id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            install_date: now - Duration::days(age),
            lifespan_days,
            notes: None,
        })
        .collect()
}

/// Seed that starts from nothing.
#[must_use]
pub fn empty(_now: DateTime<Utc>) -> Vec<Part> {
    Vec::new()
}
