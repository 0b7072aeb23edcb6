//! Near-duplicate resolution over company names.
//!
//! The default (greedy) mode walks rows in original order; each unconsumed
//! row seeds a group of every other unconsumed row whose token-sort
//! similarity clears the threshold. A row similar to a member of an existing
//! group but not to that group's seed is not retroactively merged, so
//! grouping is not transitive. The transitive mode merges overlapping
//! matches into connected components instead; both modes are exposed through
//! [`GroupingMode`].
//!
//! Pairwise scoring is parallel; consumption of matches is a strictly
//! sequential pass so the output is deterministic for a given input and
//! threshold.

use crate::dto::{Cell, DedupConfig, Frame, GroupingMode, COMPANY_NAME};
use crate::similarity::{key_ratio, token_sort_key};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Partitions a validated frame into (cleaned, removed).
///
/// Each duplicate group keeps exactly one canonical row: the one with the
/// most non-zero cells, ties broken by first occurrence. The cleaned frame
/// holds never-grouped rows in original order followed by one canonical row
/// per group in group-formation order; the removed frame holds all other
/// group members in the same group order, with every original column intact
/// so removed rows stay joinable to their source attributes.
///
/// A frame without a Company_Name column passes through untouched with an
/// empty removed frame.
pub fn resolve_duplicates(frame: &Frame, config: &DedupConfig) -> (Frame, Frame) {
    let Some(name_idx) = frame.column_index(COMPANY_NAME) else {
        return (frame.clone(), frame.empty_like());
    };

    let keys: Vec<String> = frame
        .rows()
        .iter()
        .map(|row| token_sort_key(&row[name_idx].to_string()))
        .collect();

    let groups = match config.grouping {
        GroupingMode::Greedy => greedy_groups(&keys, config.threshold),
        GroupingMode::Transitive => transitive_groups(&keys, config.threshold),
    };
    debug!(
        "resolved {} duplicate group(s) across {} row(s)",
        groups.len(),
        frame.len()
    );

    partition(frame, &groups)
}

/// Seed-anchored grouping: for each unconsumed row, score it against every
/// other unconsumed row in parallel, then consume the matches sequentially.
fn greedy_groups(keys: &[String], threshold: f64) -> Vec<Vec<usize>> {
    let mut consumed: FxHashSet<usize> = FxHashSet::default();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for seed in 0..keys.len() {
        if consumed.contains(&seed) {
            continue;
        }
        let mut group: Vec<usize> = (0..keys.len())
            .into_par_iter()
            .filter(|&j| j != seed && !consumed.contains(&j))
            .filter(|&j| key_ratio(&keys[seed], &keys[j]) >= threshold)
            .collect();
        if group.is_empty() {
            continue;
        }
        group.push(seed);
        group.sort_unstable();
        consumed.extend(group.iter().copied());
        groups.push(group);
    }
    groups
}

/// Connected-component grouping: every similar pair links its two rows, and
/// clusters that share a row are merged into the earlier cluster.
fn transitive_groups(keys: &[String], threshold: f64) -> Vec<Vec<usize>> {
    let pairs: Vec<(usize, usize)> = (0..keys.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            (i + 1..keys.len())
                .filter(move |&j| key_ratio(&keys[i], &keys[j]) >= threshold)
                .map(move |j| (i, j))
        })
        .collect();

    let mut table = ClusterTable::default();
    for (a, b) in pairs {
        table.link(a, b);
    }
    table.into_groups()
}

/// Wraps two mappings to accumulate duplicate clusters from pairwise links:
/// cluster id to member rows, and a reverse lookup from row to cluster id.
#[derive(Default)]
struct ClusterTable {
    clusters: FxHashMap<usize, Vec<usize>>,
    lookup: FxHashMap<usize, usize>,
    next_id: usize,
}

impl ClusterTable {
    fn link(&mut self, a: usize, b: usize) {
        match (self.lookup.get(&a).copied(), self.lookup.get(&b).copied()) {
            (None, None) => {
                let id = self.next_id;
                self.next_id += 1;
                self.clusters.insert(id, vec![a, b]);
                self.lookup.insert(a, id);
                self.lookup.insert(b, id);
            }
            (Some(id), None) => self.add(id, b),
            (None, Some(id)) => self.add(id, a),
            (Some(x), Some(y)) if x != y => self.merge(x.min(y), x.max(y)),
            _ => {}
        }
    }

    fn add(&mut self, cluster_id: usize, row: usize) {
        self.clusters.entry(cluster_id).or_default().push(row);
        self.lookup.insert(row, cluster_id);
    }

    fn merge(&mut self, keep: usize, drop: usize) {
        let moved = self.clusters.remove(&drop).unwrap_or_default();
        for &row in &moved {
            self.lookup.insert(row, keep);
        }
        self.clusters.entry(keep).or_default().extend(moved);
    }

    /// Clusters ordered by formation id, members by original row position.
    fn into_groups(self) -> Vec<Vec<usize>> {
        let mut entries: Vec<(usize, Vec<usize>)> = self.clusters.into_iter().collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
            .into_iter()
            .map(|(_, mut members)| {
                members.sort_unstable();
                members
            })
            .collect()
    }
}

fn partition(frame: &Frame, groups: &[Vec<usize>]) -> (Frame, Frame) {
    let grouped: FxHashSet<usize> = groups.iter().flatten().copied().collect();

    let mut cleaned: Vec<Vec<Cell>> = frame
        .rows()
        .iter()
        .enumerate()
        .filter(|(idx, _)| !grouped.contains(idx))
        .map(|(_, row)| row.clone())
        .collect();

    let mut removed: Vec<Vec<Cell>> = Vec::new();
    for group in groups {
        let keep = canonical_index(frame, group);
        cleaned.push(frame.row(keep).to_vec());
        for &idx in group {
            if idx != keep {
                removed.push(frame.row(idx).to_vec());
            }
        }
    }

    (
        Frame::new(frame.columns().to_vec(), cleaned),
        Frame::new(frame.columns().to_vec(), removed),
    )
}

/// The most complete row of a group, measured as the count of non-zero
/// cells. Groups are in ascending row order, so a strict comparison keeps
/// the first occurrence on ties.
fn canonical_index(frame: &Frame, group: &[usize]) -> usize {
    let mut best = group[0];
    let mut best_count = non_zero_cells(frame.row(best));
    for &idx in &group[1..] {
        let count = non_zero_cells(frame.row(idx));
        if count > best_count {
            best = idx;
            best_count = count;
        }
    }
    best
}

fn non_zero_cells(row: &[Cell]) -> usize {
    row.iter().filter(|cell| !cell.is_zero()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{ANNUAL_REVENUE, COMPANY_ID, INDUSTRY, MARKETING_SPEND};

    fn lead_columns() -> Vec<String> {
        vec![
            COMPANY_ID.to_string(),
            COMPANY_NAME.to_string(),
            INDUSTRY.to_string(),
            ANNUAL_REVENUE.to_string(),
            MARKETING_SPEND.to_string(),
        ]
    }

    fn lead(id: &str, name: &str, industry: &str, revenue: f64, spend: f64) -> Vec<Cell> {
        vec![
            Cell::from(id),
            Cell::from(name),
            Cell::from(industry),
            Cell::from(revenue),
            Cell::from(spend),
        ]
    }

    #[test]
    fn near_duplicates_collapse_to_the_most_complete_row() {
        let frame = Frame::new(
            lead_columns(),
            vec![
                lead("1", "Acme Corp", "Tech", 100.0, 0.0),
                lead("2", "ACME CORPORATION", "Tech", 100.0, 50.0),
            ],
        );
        let (cleaned, removed) = resolve_duplicates(&frame, &DedupConfig::default());
        assert_eq!(cleaned.len(), 1);
        assert_eq!(removed.len(), 1);
        assert_eq!(cleaned.cell(0, 0), &Cell::from("2"));
        assert_eq!(removed.cell(0, 0), &Cell::from("1"));
    }

    #[test]
    fn completeness_tie_keeps_the_first_occurrence() {
        let frame = Frame::new(
            lead_columns(),
            vec![
                lead("1", "Acme Corp", "Tech", 100.0, 50.0),
                lead("2", "ACME CORPORATION", "Tech", 100.0, 50.0),
            ],
        );
        let (cleaned, _) = resolve_duplicates(&frame, &DedupConfig::default());
        assert_eq!(cleaned.cell(0, 0), &Cell::from("1"));
    }

    #[test]
    fn cleaned_and_removed_partition_the_input() {
        let frame = Frame::new(
            lead_columns(),
            vec![
                lead("1", "Acme Corp", "Tech", 100.0, 10.0),
                lead("2", "Borealis Textiles", "Retail", 80.0, 5.0),
                lead("3", "ACME CORPORATION", "Tech", 100.0, 0.0),
                lead("4", "Cobalt Freight", "Logistics", 60.0, 8.0),
            ],
        );
        let (cleaned, removed) = resolve_duplicates(&frame, &DedupConfig::default());
        assert_eq!(cleaned.len() + removed.len(), frame.len());
        assert_eq!(removed.len(), 1);
    }

    #[test]
    fn singletons_precede_canonicals_in_cleaned_output() {
        let frame = Frame::new(
            lead_columns(),
            vec![
                lead("1", "Acme Corp", "Tech", 100.0, 10.0),
                lead("2", "Borealis Textiles", "Retail", 80.0, 5.0),
                lead("3", "ACME CORPORATION", "Tech", 100.0, 0.0),
            ],
        );
        let (cleaned, _) = resolve_duplicates(&frame, &DedupConfig::default());
        assert_eq!(cleaned.cell(0, 0), &Cell::from("2"));
        assert_eq!(cleaned.cell(1, 0), &Cell::from("1"));
    }

    #[test]
    fn missing_name_column_is_a_no_op() {
        let frame = Frame::new(
            vec![COMPANY_ID.to_string(), INDUSTRY.to_string()],
            vec![
                vec![Cell::from("1"), Cell::from("Tech")],
                vec![Cell::from("2"), Cell::from("Tech")],
            ],
        );
        let (cleaned, removed) = resolve_duplicates(&frame, &DedupConfig::default());
        assert_eq!(cleaned, frame);
        assert!(removed.is_empty());
        assert_eq!(removed.columns(), frame.columns());
    }

    #[test]
    fn rerunning_on_cleaned_output_removes_nothing() {
        let frame = Frame::new(
            lead_columns(),
            vec![
                lead("1", "Acme Corp", "Tech", 100.0, 10.0),
                lead("2", "ACME CORPORATION", "Tech", 100.0, 50.0),
                lead("3", "Borealis Textiles", "Retail", 80.0, 5.0),
            ],
        );
        let config = DedupConfig::default();
        let (cleaned, _) = resolve_duplicates(&frame, &config);
        let (again, removed) = resolve_duplicates(&cleaned, &config);
        assert_eq!(again.len(), cleaned.len());
        assert!(removed.is_empty());
    }

    #[test]
    fn greedy_grouping_is_not_transitive() {
        // "Acme Corp" matches "ACME CORPORATION" but not the GmbH variant,
        // while the two longer names match each other.
        let frame = Frame::new(
            lead_columns(),
            vec![
                lead("1", "Acme Corp", "Tech", 100.0, 10.0),
                lead("2", "ACME CORPORATION", "Tech", 100.0, 50.0),
                lead("3", "Acme Corporation GmbH", "Tech", 100.0, 50.0),
            ],
        );
        let (cleaned, removed) = resolve_duplicates(&frame, &DedupConfig::default());
        assert_eq!(cleaned.len(), 2);
        assert_eq!(removed.len(), 1);
    }

    #[test]
    fn transitive_grouping_merges_the_chain() {
        let frame = Frame::new(
            lead_columns(),
            vec![
                lead("1", "Acme Corp", "Tech", 100.0, 0.0),
                lead("2", "ACME CORPORATION", "Tech", 100.0, 50.0),
                lead("3", "Acme Corporation GmbH", "Tech", 100.0, 50.0),
            ],
        );
        let config = DedupConfig {
            grouping: GroupingMode::Transitive,
            ..DedupConfig::default()
        };
        let (cleaned, removed) = resolve_duplicates(&frame, &config);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(removed.len(), 2);
        // Canonical is the first of the two equally complete rows.
        assert_eq!(cleaned.cell(0, 0), &Cell::from("2"));
    }
}
