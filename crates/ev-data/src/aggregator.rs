//! Summing observations by year, or by year and category.

use std::collections::{BTreeMap, HashMap};

use ev_core::models::{AggregateRow, GroupKey, Observation};

/// Stateless helper that groups observations and sums their counts.
pub struct RegistrationAggregator;

impl RegistrationAggregator {
    /// Group `observations` by `key` and sum the counts.
    ///
    /// Rows are ordered by ascending year and, for [`GroupKey::YearCategory`],
    /// then by the order in which each category first appears in the input.
    pub fn aggregate(observations: &[Observation], key: GroupKey) -> Vec<AggregateRow> {
        match key {
            GroupKey::Year => Self::by_year(observations),
            GroupKey::YearCategory => Self::by_year_category(observations),
        }
    }

    /// One row per year; `category` is `None`.
    pub fn by_year(observations: &[Observation]) -> Vec<AggregateRow> {
        let mut totals: BTreeMap<i32, u64> = BTreeMap::new();
        for obs in observations {
            *totals.entry(obs.year).or_default() += obs.count;
        }

        totals
            .into_iter()
            .map(|(year, total)| AggregateRow {
                year,
                category: None,
                total,
            })
            .collect()
    }

    /// One row per (year, category) pair.
    pub fn by_year_category(observations: &[Observation]) -> Vec<AggregateRow> {
        // First-seen rank per category keeps the within-year order stable.
        let mut rank: HashMap<&str, usize> = HashMap::new();
        let mut totals: BTreeMap<(i32, usize), u64> = BTreeMap::new();
        let mut names: Vec<&str> = Vec::new();

        for obs in observations {
            let next = rank.len();
            let r = *rank.entry(obs.category.as_str()).or_insert_with(|| {
                names.push(obs.category.as_str());
                next
            });
            *totals.entry((obs.year, r)).or_default() += obs.count;
        }

        totals
            .into_iter()
            .map(|((year, r), total)| AggregateRow {
                year,
                category: Some(names[r].to_string()),
                total,
            })
            .collect()
    }

    /// Sum of the totals of every row.
    pub fn grand_total(rows: &[AggregateRow]) -> u64 {
        rows.iter().map(|r| r.total).sum()
    }

    /// Largest single total, or `0` for no rows.
    pub fn max_total(rows: &[AggregateRow]) -> u64 {
        rows.iter().map(|r| r.total).max().unwrap_or(0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reshaper::reshape;
    use ev_core::models::WideRecord;

    fn obs(year: i32, category: &str, count: u64) -> Observation {
        Observation::new(year, category, count)
    }

    fn row(year: i32, category: Option<&str>, total: u64) -> AggregateRow {
        AggregateRow {
            year,
            category: category.map(str::to_string),
            total,
        }
    }

    // ── by_year ───────────────────────────────────────────────────────────────

    #[test]
    fn test_by_year_sums_categories() {
        let input = vec![
            obs(2020, "TWO WHEELER(NT)", 100),
            obs(2020, "LIGHT GOODS VEHICLE", 50),
        ];
        assert_eq!(
            RegistrationAggregator::aggregate(&input, GroupKey::Year),
            vec![row(2020, None, 150)]
        );
    }

    #[test]
    fn test_by_year_sorted_ascending() {
        let input = vec![obs(2022, "A", 1), obs(2001, "A", 2), obs(2010, "A", 3)];
        let years: Vec<i32> = RegistrationAggregator::by_year(&input)
            .iter()
            .map(|r| r.year)
            .collect();
        assert_eq!(years, vec![2001, 2010, 2022]);
    }

    #[test]
    fn test_by_year_empty() {
        assert!(RegistrationAggregator::by_year(&[]).is_empty());
    }

    // ── by_year_category ──────────────────────────────────────────────────────

    #[test]
    fn test_by_year_category_merges_duplicates() {
        let input = vec![obs(2020, "M1", 4), obs(2020, "L5", 1), obs(2020, "M1", 6)];
        assert_eq!(
            RegistrationAggregator::aggregate(&input, GroupKey::YearCategory),
            vec![row(2020, Some("M1"), 10), row(2020, Some("L5"), 1)]
        );
    }

    #[test]
    fn test_by_year_category_first_seen_category_order() {
        let input = vec![
            obs(2021, "B", 1),
            obs(2021, "A", 2),
            obs(2020, "A", 3),
            obs(2020, "B", 4),
        ];
        assert_eq!(
            RegistrationAggregator::by_year_category(&input),
            vec![
                row(2020, Some("B"), 4),
                row(2020, Some("A"), 3),
                row(2021, Some("B"), 1),
                row(2021, Some("A"), 2),
            ]
        );
    }

    #[test]
    fn test_by_year_category_keeps_zero_totals() {
        let input = vec![obs(2020, "A", 0), obs(2020, "B", 2)];
        let rows = RegistrationAggregator::by_year_category(&input);
        assert_eq!(rows[0], row(2020, Some("A"), 0));
    }

    // ── conservation ──────────────────────────────────────────────────────────

    #[test]
    fn test_year_totals_match_wide_row_totals() {
        let categories: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        let records = vec![
            WideRecord::new(2018, [("A", 5), ("B", 0), ("C", 9)]),
            WideRecord::new(2019, [("A", 11), ("B", 22), ("C", 33)]),
            WideRecord::new(2020, [("A", 0), ("B", 0), ("C", 0)]),
        ];

        let totals = RegistrationAggregator::by_year(&reshape(&records, &categories));
        assert_eq!(totals.len(), records.len());
        for (record, total) in records.iter().zip(&totals) {
            assert_eq!(total.year, record.year);
            assert_eq!(total.total, record.row_total(&categories));
        }
    }

    #[test]
    fn test_year_category_rolls_up_to_year() {
        let input = vec![obs(2020, "A", 1), obs(2020, "B", 2), obs(2021, "A", 3)];
        let detailed = RegistrationAggregator::by_year_category(&input);
        let per_year = RegistrationAggregator::by_year(&input);

        for year_row in &per_year {
            let rolled: u64 = detailed
                .iter()
                .filter(|r| r.year == year_row.year)
                .map(|r| r.total)
                .sum();
            assert_eq!(rolled, year_row.total);
        }
        assert_eq!(
            RegistrationAggregator::grand_total(&detailed),
            RegistrationAggregator::grand_total(&per_year)
        );
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_grand_and_max_total() {
        let rows = vec![row(2020, None, 5), row(2021, None, 12)];
        assert_eq!(RegistrationAggregator::grand_total(&rows), 17);
        assert_eq!(RegistrationAggregator::max_total(&rows), 12);
        assert_eq!(RegistrationAggregator::max_total(&[]), 0);
    }
}
