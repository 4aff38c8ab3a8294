//! Record aggregation and statistics.
//!
//! Pure functions over a table snapshot: row counts, distinct values,
//! grouped counts for the bar chart and the nested path counts that
//! feed the sunburst.

use crate::models::{Field, Table};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One bar of a grouped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCount {
    pub value: String,
    pub count: usize,
}

/// Grouped counts, highest count first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldCounts(Vec<FieldCount>);

#[allow(dead_code)] // Full accessor set, not all used by the renderers
impl FieldCounts {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldCount> {
        self.0.iter()
    }

    /// Count for a value, if it occurs.
    pub fn get(&self, value: &str) -> Option<usize> {
        self.0.iter().find(|c| c.value == value).map(|c| c.count)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.0.iter().map(|c| c.count).sum()
    }

    /// Largest single count (0 when empty).
    pub fn max_count(&self) -> usize {
        self.0.iter().map(|c| c.count).max().unwrap_or(0)
    }
}

/// A node of the hierarchy: one value of one path level under its ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    pub label: String,
    pub weight: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            weight: 0,
            children: Vec::new(),
        }
    }

    /// Number of leaves below (and including) this node.
    #[allow(dead_code)]
    pub fn leaf_count(&self) -> usize {
        if self.children.is_empty() {
            1
        } else {
            self.children.iter().map(HierarchyNode::leaf_count).sum()
        }
    }
}

/// Sunburst data source. Empty tables produce `NoData`, never an empty tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "roots", rename_all = "snake_case")]
pub enum Hierarchy {
    NoData,
    Tree(Vec<HierarchyNode>),
}

#[allow(dead_code)] // Queried by tests and JSON consumers
impl Hierarchy {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Hierarchy::NoData)
    }

    /// Top level nodes, empty for `NoData`.
    pub fn roots(&self) -> &[HierarchyNode] {
        match self {
            Hierarchy::NoData => &[],
            Hierarchy::Tree(roots) => roots,
        }
    }
}

/// Headline numbers of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCards {
    pub total_students: usize,
    pub unique_branches: usize,
    pub recruiters: usize,
}

/// Number of records in the table.
pub fn total_records(table: &Table) -> usize {
    table.len()
}

/// Number of distinct values of `field`.
pub fn distinct_count(table: &Table, field: Field) -> usize {
    table
        .iter()
        .map(|r| r.get(field))
        .collect::<HashSet<_>>()
        .len()
}

/// Count records per value of `field`, highest count first.
///
/// Ties keep the order in which the values first appear in the table.
pub fn counts_by_field(table: &Table, field: Field) -> FieldCounts {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<FieldCount> = Vec::new();

    for record in table {
        let value = record.get(field);
        match positions.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                positions.insert(value, counts.len());
                counts.push(FieldCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort, so first-seen order survives among equal counts
    counts.sort_by_key(|c| std::cmp::Reverse(c.count));
    FieldCounts(counts)
}

/// Build the nested path counts for `path` (e.g. Employer, Branch, Student).
///
/// Each node's weight is the number of records matching its path prefix.
/// Children appear in first-seen order.
pub fn hierarchical_counts(table: &Table, path: &[Field]) -> Hierarchy {
    if table.is_empty() {
        return Hierarchy::NoData;
    }

    let mut roots: Vec<HierarchyNode> = Vec::new();

    for record in table {
        let mut level = &mut roots;
        for field in path {
            let value = record.get(*field);
            let idx = match level.iter().position(|n| n.label == value) {
                Some(i) => i,
                None => {
                    level.push(HierarchyNode::new(value));
                    level.len() - 1
                }
            };
            let node = &mut level[idx];
            node.weight += 1;
            level = &mut node.children;
        }
    }

    Hierarchy::Tree(roots)
}

/// Compute the three summary cards.
pub fn summary_cards(table: &Table) -> SummaryCards {
    SummaryCards {
        total_students: total_records(table),
        unique_branches: distinct_count(table, Field::Branch),
        recruiters: distinct_count(table, Field::EmployerName),
    }
}
