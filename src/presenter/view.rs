//! Dashboard view model.

use crate::analysis::{self, FieldCounts, Hierarchy, SummaryCards};
use crate::config::DashboardConfig;
use crate::models::{Field, Table};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything one page render shows, computed from a single snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub data_file: String,
    pub summary: SummaryCards,
    pub records: Table,
    pub bar_field: Field,
    /// `None` when there are no records.
    pub bar_chart: Option<FieldCounts>,
    pub sunburst_path: Vec<Field>,
    pub hierarchy: Hierarchy,
}

impl DashboardView {
    /// Compute the view for `table`.
    pub fn build(table: &Table, settings: &DashboardConfig, data_file: &str) -> Self {
        let bar_chart = if table.is_empty() {
            None
        } else {
            Some(analysis::counts_by_field(table, settings.bar_field))
        };

        Self {
            title: settings.title.clone(),
            generated_at: Utc::now(),
            data_file: data_file.to_string(),
            summary: analysis::summary_cards(table),
            records: table.clone(),
            bar_field: settings.bar_field,
            bar_chart,
            sunburst_path: settings.sunburst_path.clone(),
            hierarchy: analysis::hierarchical_counts(table, &settings.sunburst_path),
        }
    }

    /// Title of the bar chart section.
    pub fn bar_chart_title(&self) -> String {
        format!("Number of Students Placed per {}", self.bar_field.label())
    }

    /// Title of the sunburst section.
    pub fn sunburst_title(&self) -> String {
        let path: Vec<&str> = self.sunburst_path.iter().map(|f| f.label()).collect();
        format!("Sunburst Chart: {}", path.join(" → "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record;

    #[test]
    fn test_build_empty() {
        let view = DashboardView::build(&Table::new(), &DashboardConfig::default(), "data.csv");

        assert_eq!(view.title, "Placement Data Analytics");
        assert_eq!(view.summary, SummaryCards::default());
        assert!(view.bar_chart.is_none());
        assert!(view.hierarchy.is_no_data());
    }

    #[test]
    fn test_build_with_records() {
        let table = Table::from(vec![
            record("2023", "1", "R1", "Asha", "CSE", "Acme"),
            record("2023", "2", "R2", "Ravi", "CSE", "Globex"),
        ]);
        let view = DashboardView::build(&table, &DashboardConfig::default(), "data.csv");

        assert_eq!(view.summary.total_students, 2);
        assert_eq!(view.summary.unique_branches, 1);
        assert_eq!(view.summary.recruiters, 2);
        assert_eq!(view.bar_chart.as_ref().and_then(|c| c.get("CSE")), Some(2));
        assert_eq!(view.hierarchy.roots().len(), 2);
    }

    #[test]
    fn test_titles() {
        let view = DashboardView::build(&Table::new(), &DashboardConfig::default(), "data.csv");
        assert_eq!(view.bar_chart_title(), "Number of Students Placed per Branch");
        assert_eq!(
            view.sunburst_title(),
            "Sunburst Chart: Employer → Branch → Student Name"
        );
    }
}
