//! Part records and the drafts used to create or edit them.
//!
//! A [`Part`] is what gets persisted. A [`PartDraft`] is what an operator
//! fills in; it is validated into a `Part` by the inventory store.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::filter::{Facet, FilterSelection};
use crate::inventory::ValidationError;

/// Categories offered when filling in a draft. Any non-blank category is accepted.
pub const CATEGORY_SUGGESTIONS: [&str; 11] = [
    "General",
    "Engine",
    "Hydraulics",
    "Electronics",
    "Transmission",
    "Brakes",
    "HVAC",
    "Filters",
    "Fluids",
    "Belts",
    "Sensors",
];

/// Category used for blank create-drafts.
pub const DEFAULT_CATEGORY: &str = "General";

/// Midnight UTC of the day containing `instant`.
///
/// Drafts default to this, the same instant an operator gets by entering
/// today's date.
#[must_use]
pub fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Opaque part identifier, minted once at creation and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(String);

impl PartId {
    /// Mint a fresh random identifier.
    #[must_use]
    pub fn mint() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PartId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PartId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A replaceable component installed on a machine.
///
/// Serialized with the `camelCase` keys of the stored inventory blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: PartId,
    /// Owning machine. Free text, not a key into any machine registry.
    pub machine_id: String,
    pub name: String,
    pub category: String,
    /// Start of the current installation; reset by a replacement.
    pub install_date: DateTime<Utc>,
    /// Expected service life counted from `install_date`.
    pub lifespan_days: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Operator-supplied fields for a new or edited part.
///
/// Blank strings count as missing. Text fields are stored exactly as entered,
/// so facet filters match the submitted values. `install_date` is optional
/// here so a draft can be built incrementally; it is required by validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartDraft {
    pub machine_id: String,
    pub name: String,
    pub category: String,
    pub install_date: Option<DateTime<Utc>>,
    pub lifespan_days: i64,
    pub notes: Option<String>,
}

impl PartDraft {
    /// Blank create-draft.
    ///
    /// The machine is prefilled from the current machine filter unless that
    /// filter is "all"; the category defaults to `General` and the install
    /// date to the start of `now`'s day.
    #[must_use]
    pub fn new_for(selection: &FilterSelection, now: DateTime<Utc>) -> Self {
        let machine_id = match &selection.machine {
            Facet::All => String::new(),
            Facet::Only(machine) => machine.clone(),
        };
        Self {
            machine_id,
            category: DEFAULT_CATEGORY.to_string(),
            install_date: Some(start_of_day(now)),
            ..Self::default()
        }
    }

    /// Edit prefill: every field of `part` except its id.
    #[must_use]
    pub fn from_part(part: &Part) -> Self {
        Self {
            machine_id: part.machine_id.clone(),
            name: part.name.clone(),
            category: part.category.clone(),
            install_date: Some(part.install_date),
            lifespan_days: part.lifespan_days,
            notes: part.notes.clone(),
        }
    }

    /// Check required fields and the positive lifespan.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text("machineId", &self.machine_id)?;
        required_text("name", &self.name)?;
        required_text("category", &self.category)?;
        if self.install_date.is_none() {
            return Err(ValidationError::missing("installDate"));
        }
        if self.lifespan_days <= 0 {
            return Err(ValidationError::new(
                "lifespanDays",
                format!("must be a positive number of days, got {}", self.lifespan_days),
            ));
        }
        Ok(())
    }

    /// Validate and build a part carrying `id`.
    pub(crate) fn into_part(self, id: PartId) -> Result<Part, ValidationError> {
        self.validate()?;
        let install_date = self
            .install_date
            .ok_or_else(|| ValidationError::missing("installDate"))?;
        Ok(Part {
            id,
            machine_id: self.machine_id,
            name: self.name,
            category: self.category,
            install_date,
            lifespan_days: self.lifespan_days,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

fn required_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::missing(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn complete_draft() -> PartDraft {
        PartDraft {
            machine_id: "M-09".to_string(),
            name: "Hose".to_string(),
            category: "Hydraulics".to_string(),
            install_date: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
            lifespan_days: 180,
            notes: None,
        }
    }

    #[test]
    fn test_complete_draft_validates() {
        assert!(complete_draft().validate().is_ok());
    }

    #[test]
    fn test_blank_machine_is_missing() {
        let mut draft = complete_draft();
        draft.machine_id = "   ".to_string();
        let err = draft.validate().unwrap_err();
        assert_eq!(err.field, "machineId");
    }

    #[test]
    fn test_zero_and_negative_lifespan_rejected() {
        for lifespan in [0, -5] {
            let mut draft = complete_draft();
            draft.lifespan_days = lifespan;
            let err = draft.validate().unwrap_err();
            assert_eq!(err.field, "lifespanDays");
        }
    }

    #[test]
    fn test_missing_install_date_rejected() {
        let mut draft = complete_draft();
        draft.install_date = None;
        assert_eq!(draft.validate().unwrap_err().field, "installDate");
    }

    #[test]
    fn test_into_part_keeps_text_verbatim_and_drops_blank_notes() {
        let mut draft = complete_draft();
        draft.name = "  Hose ".to_string();
        draft.machine_id = "M-09 ".to_string();
        draft.notes = Some(" ".to_string());
        let part = draft.into_part(PartId::from("x")).unwrap();
        assert_eq!(part.name, "  Hose ");
        assert_eq!(part.machine_id, "M-09 ");
        assert_eq!(part.notes, None);
    }

    #[test]
    fn test_new_for_prefills_selected_machine() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let selection = FilterSelection::new(Facet::parse("M-02"), Facet::All);
        let draft = PartDraft::new_for(&selection, now);
        assert_eq!(draft.machine_id, "M-02");
        assert_eq!(draft.category, DEFAULT_CATEGORY);
        assert_eq!(draft.install_date, Some(now));

        let draft = PartDraft::new_for(&FilterSelection::default(), now);
        assert!(draft.machine_id.is_empty());
    }

    #[test]
    fn test_new_for_defaults_install_date_to_start_of_day() {
        let afternoon = Utc.with_ymd_and_hms(2025, 3, 1, 15, 42, 7).unwrap();
        let draft = PartDraft::new_for(&FilterSelection::default(), afternoon);
        assert_eq!(
            draft.install_date,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_part_serializes_with_camel_case_keys() {
        let part = complete_draft().into_part(PartId::from("7")).unwrap();
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["machineId"], "M-09");
        assert_eq!(json["lifespanDays"], 180);
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_minted_ids_differ() {
        assert_ne!(PartId::mint(), PartId::mint());
    }
}
