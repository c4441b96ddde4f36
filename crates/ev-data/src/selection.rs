//! Resolving user selections (categories, vehicle classes) against the
//! names a dataset actually declares.

use std::collections::HashSet;

use ev_core::models::{Observation, PipelineWarning, SelectionKind};
use tracing::warn;

/// Outcome of [`resolve_selection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Selected names that the dataset declares, in declaration order.
    pub names: Vec<String>,
    pub warnings: Vec<PipelineWarning>,
}

/// Intersect `requested` with `declared`.
///
/// Unknown names are dropped and reported as
/// [`PipelineWarning::UnknownSelection`]; an empty intersection is reported as
/// [`PipelineWarning::EmptySelection`]. Neither is an error.
pub fn resolve_selection(
    declared: &[String],
    requested: &[String],
    kind: SelectionKind,
) -> Selection {
    let wanted: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let known: HashSet<&str> = declared.iter().map(String::as_str).collect();

    let names: Vec<String> = declared
        .iter()
        .filter(|d| wanted.contains(d.as_str()))
        .cloned()
        .collect();

    let mut warnings = Vec::new();

    let mut unknown: Vec<String> = Vec::new();
    for name in requested {
        if !known.contains(name.as_str()) && !unknown.contains(name) {
            unknown.push(name.clone());
        }
    }
    if !unknown.is_empty() {
        warn!("Ignoring unknown {:?} selection(s): {:?}", kind, unknown);
        warnings.push(PipelineWarning::UnknownSelection {
            selection: kind,
            names: unknown,
        });
    }

    if names.is_empty() {
        warn!("Empty {:?} selection; series will be empty", kind);
        warnings.push(PipelineWarning::EmptySelection { selection: kind });
    }

    Selection { names, warnings }
}

/// Distinct category names of `observations` in first-seen order.
pub fn distinct_categories(observations: &[Observation]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    observations
        .iter()
        .filter(|o| seen.insert(o.category.as_str()))
        .map(|o| o.category.clone())
        .collect()
}

/// Keep the observations whose category is in `selected`, in original order.
pub fn retain_categories(observations: &[Observation], selected: &[String]) -> Vec<Observation> {
    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
    observations
        .iter()
        .filter(|o| selected.contains(o.category.as_str()))
        .cloned()
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // ── resolve_selection ─────────────────────────────────────────────────────

    #[test]
    fn test_resolve_selection_uses_declaration_order() {
        let declared = names(&["BUS", "TRUCK", "TWO WHEELER(NT)"]);
        let requested = names(&["TWO WHEELER(NT)", "BUS"]);

        let sel = resolve_selection(&declared, &requested, SelectionKind::Category);
        assert_eq!(sel.names, names(&["BUS", "TWO WHEELER(NT)"]));
        assert!(sel.warnings.is_empty());
    }

    #[test]
    fn test_resolve_selection_reports_unknown_names() {
        let declared = names(&["BUS"]);
        let requested = names(&["BUS", "HOVERCRAFT", "HOVERCRAFT"]);

        let sel = resolve_selection(&declared, &requested, SelectionKind::Category);
        assert_eq!(sel.names, names(&["BUS"]));
        assert_eq!(
            sel.warnings,
            vec![PipelineWarning::UnknownSelection {
                selection: SelectionKind::Category,
                names: names(&["HOVERCRAFT"]),
            }]
        );
    }

    #[test]
    fn test_resolve_selection_empty_request() {
        let declared = names(&["M1", "L5"]);
        let sel = resolve_selection(&declared, &[], SelectionKind::VehicleClass);

        assert!(sel.names.is_empty());
        assert_eq!(
            sel.warnings,
            vec![PipelineWarning::EmptySelection {
                selection: SelectionKind::VehicleClass
            }]
        );
    }

    #[test]
    fn test_resolve_selection_only_unknown_names() {
        let declared = names(&["M1"]);
        let sel = resolve_selection(&declared, &names(&["X"]), SelectionKind::VehicleClass);

        assert!(sel.names.is_empty());
        assert_eq!(sel.warnings.len(), 2);
    }

    // ── distinct_categories ───────────────────────────────────────────────────

    #[test]
    fn test_distinct_categories_first_seen_order() {
        let obs = vec![
            Observation::new(2020, "M1", 1),
            Observation::new(2020, "L5", 1),
            Observation::new(2021, "M1", 1),
        ];
        assert_eq!(distinct_categories(&obs), names(&["M1", "L5"]));
    }

    // ── retain_categories ─────────────────────────────────────────────────────

    #[test]
    fn test_retain_categories() {
        let obs = vec![
            Observation::new(2020, "M1", 1),
            Observation::new(2020, "L5", 2),
            Observation::new(2021, "M1", 3),
        ];
        let kept = retain_categories(&obs, &names(&["M1"]));
        assert_eq!(
            kept,
            vec![Observation::new(2020, "M1", 1), Observation::new(2021, "M1", 3)]
        );
        assert!(retain_categories(&obs, &[]).is_empty());
    }
}
