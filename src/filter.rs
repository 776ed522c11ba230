//! Filtered views and facet lists over the inventory.

use std::collections::BTreeSet;
use std::fmt;

use crate::part::Part;

/// Sentinel accepted by [`Facet::parse`] for "no filtering".
pub const ALL: &str = "all";

/// One filter control: everything, or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Facet {
    #[default]
    All,
    Only(String),
}

impl Facet {
    /// Parse a filter value; `"all"` and blank input select everything.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == ALL || value.trim().is_empty() {
            Facet::All
        } else {
            Facet::Only(value.to_string())
        }
    }

    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(selected) => selected == value,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::All => f.write_str(ALL),
            Facet::Only(value) => f.write_str(value),
        }
    }
}

/// The machine and part-name filters currently selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub machine: Facet,
    pub part_name: Facet,
}

impl FilterSelection {
    #[must_use]
    pub fn new(machine: Facet, part_name: Facet) -> Self {
        Self { machine, part_name }
    }

    #[must_use]
    pub fn accepts(&self, part: &Part) -> bool {
        self.machine.matches(&part.machine_id) && self.part_name.matches(&part.name)
    }

    /// Keep a newly created part visible: if a specific machine is selected
    /// and it is not the new part's machine, switch to the new part's machine.
    pub fn follow_new_part(&mut self, part: &Part) {
        if let Facet::Only(machine) = &self.machine {
            if machine != &part.machine_id {
                self.machine = Facet::Only(part.machine_id.clone());
            }
        }
    }

    pub fn clear(&mut self) {
        self.machine = Facet::All;
        self.part_name = Facet::All;
    }
}

/// Why a filtered view came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoParts,
    NoMatches,
}

/// Read-only projection of an inventory snapshot.
#[derive(Debug, Clone, Copy)]
pub struct FilterView<'a> {
    parts: &'a [Part],
}

impl<'a> FilterView<'a> {
    #[must_use]
    pub fn new(parts: &'a [Part]) -> Self {
        Self { parts }
    }

    /// Distinct machine ids, ascending.
    #[must_use]
    pub fn machines(&self) -> Vec<String> {
        distinct_sorted(self.parts.iter().map(|p| p.machine_id.as_str()))
    }

    /// Distinct part names, ascending.
    #[must_use]
    pub fn part_names(&self) -> Vec<String> {
        distinct_sorted(self.parts.iter().map(|p| p.name.as_str()))
    }

    /// Parts passing both facets, in inventory order.
    #[must_use]
    pub fn apply(&self, selection: &FilterSelection) -> Vec<&'a Part> {
        self.parts.iter().filter(|p| selection.accepts(p)).collect()
    }

    /// `None` when `filtered` has parts.
    #[must_use]
    pub fn empty_reason(&self, filtered: &[&Part]) -> Option<EmptyReason> {
        if !filtered.is_empty() {
            None
        } else if self.parts.is_empty() {
            Some(EmptyReason::NoParts)
        } else {
            Some(EmptyReason::NoMatches)
        }
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
