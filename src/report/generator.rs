//! Dashboard rendering.
//!
//! This module renders a [`DashboardView`] as Markdown, plain terminal
//! text, or JSON. Markdown and text share the same section order: summary
//! cards, full table, bar chart, hierarchy.

use crate::analysis::{FieldCounts, Hierarchy, HierarchyNode, SummaryCards};
use crate::models::{Field, Table};
use crate::presenter::DashboardView;
use anyhow::Result;

/// Placeholder for the bar chart of an empty table.
pub const NO_CHART_DATA: &str = "No data available to display the chart.";

/// Placeholder for the sunburst of an empty table.
pub const NO_SUNBURST_DATA: &str = "No data available to display the sunburst chart.";

const BAR_CELL: char = '█';

/// Generate the complete Markdown dashboard.
pub fn generate_markdown_dashboard(view: &DashboardView, bar_width: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", view.title));
    output.push_str(&format!(
        "*Data file: `{}` | Generated: {}*\n\n",
        view.data_file,
        view.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str(&generate_summary_cards(&view.summary));
    output.push_str(&generate_markdown_table(&view.records));

    output.push_str(&format!("## {}\n\n", view.bar_chart_title()));
    match &view.bar_chart {
        Some(counts) => {
            output.push_str("```text\n");
            output.push_str(&render_bars(counts, bar_width));
            output.push_str("```\n\n");
        }
        None => output.push_str(&format!("> ℹ️ {}\n\n", NO_CHART_DATA)),
    }

    output.push_str(&format!("## {}\n\n", view.sunburst_title()));
    match &view.hierarchy {
        Hierarchy::NoData => output.push_str(&format!("> ℹ️ {}\n\n", NO_SUNBURST_DATA)),
        Hierarchy::Tree(roots) => {
            for node in roots {
                push_markdown_node(&mut output, node, 0);
            }
            output.push('\n');
        }
    }

    output
}

/// Generate the summary cards as a one-row table.
fn generate_summary_cards(summary: &SummaryCards) -> String {
    let mut section = String::new();

    section.push_str("| Total Students | Unique Branches | Recruiters |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| **{}** | **{}** | **{}** |\n\n",
        summary.total_students, summary.unique_branches, summary.recruiters
    ));

    section
}

/// Generate the full record table.
fn generate_markdown_table(table: &Table) -> String {
    let mut section = String::new();

    section.push_str("## Full Placement Data\n\n");

    if table.is_empty() {
        section.push_str("*No records yet.*\n\n");
        return section;
    }

    section.push_str(&format!("| {} |\n", Field::HEADERS.join(" | ")));
    section.push_str(&format!("|{}\n", ":---|".repeat(Field::HEADERS.len())));

    for record in table {
        let cells: Vec<String> = record.values().iter().map(|v| escape_cell(v)).collect();
        section.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    section.push('\n');

    section
}

fn push_markdown_node(output: &mut String, node: &HierarchyNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = escape_inline(&node.label);
    if node.children.is_empty() {
        output.push_str(&format!("{}- {} ({})\n", indent, label, node.weight));
    } else {
        output.push_str(&format!("{}- **{}** ({})\n", indent, label, node.weight));
        for child in &node.children {
            push_markdown_node(output, child, depth + 1);
        }
    }
}

/// Escape a value for use inside a Markdown table cell.
fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace(['\r', '\n'], " ")
}

/// Escape a value for use as inline Markdown text, e.g. a list item.
fn escape_inline(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#' | '|' => {
                escaped.push('\\');
                escaped.push(c);
            }
            // A leading marker would start a nested list
            '-' | '+' if i == 0 => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\r' | '\n' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Generate the dashboard as plain terminal text.
pub fn generate_text_dashboard(view: &DashboardView, bar_width: usize) -> String {
    let mut output = String::new();

    push_heading(&mut output, &view.title, '=');
    output.push_str(&format!(
        "Total Students: {}   Unique Branches: {}   Recruiters: {}\n\n",
        view.summary.total_students, view.summary.unique_branches, view.summary.recruiters
    ));

    push_heading(&mut output, "Full Placement Data", '-');
    if view.records.is_empty() {
        output.push_str("No records yet.\n\n");
    } else {
        output.push_str(&render_text_table(&view.records));
        output.push('\n');
    }

    push_heading(&mut output, &view.bar_chart_title(), '-');
    match &view.bar_chart {
        Some(counts) => output.push_str(&render_bars(counts, bar_width)),
        None => output.push_str(NO_CHART_DATA),
    }
    output.push_str("\n\n");

    push_heading(&mut output, &view.sunburst_title(), '-');
    match &view.hierarchy {
        Hierarchy::NoData => output.push_str(NO_SUNBURST_DATA),
        Hierarchy::Tree(roots) => {
            for node in roots {
                output.push_str(&format!("{} ({})\n", node.label, node.weight));
                push_text_children(&mut output, node, "");
            }
        }
    }
    output.push('\n');

    output
}

fn push_heading(output: &mut String, title: &str, underline: char) {
    output.push_str(title);
    output.push('\n');
    output.push_str(&underline.to_string().repeat(title.chars().count()));
    output.push_str("\n\n");
}

fn push_text_children(output: &mut String, node: &HierarchyNode, prefix: &str) {
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        let (branch, extension) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        output.push_str(&format!(
            "{}{}{} ({})\n",
            prefix, branch, child.label, child.weight
        ));
        push_text_children(output, child, &format!("{}{}", prefix, extension));
    }
}

/// Render records as aligned columns.
fn render_text_table(table: &Table) -> String {
    let mut widths: Vec<usize> = Field::HEADERS.iter().map(|h| h.chars().count()).collect();
    for record in table {
        for (width, value) in widths.iter_mut().zip(record.values()) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(table.len() + 2);
    lines.push(pad_row(&Field::HEADERS, &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for record in table {
        lines.push(pad_row(&record.values(), &widths));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn pad_row(values: &[&str], widths: &[usize]) -> String {
    values
        .iter()
        .zip(widths)
        .map(|(v, w)| format!("{}{}", v, " ".repeat(w - v.chars().count())))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Render counts as horizontal bars, the largest spanning `width` cells.
///
/// Every non-zero count gets at least one cell.
fn render_bars(counts: &FieldCounts, width: usize) -> String {
    let max = counts.max_count();
    let label_width = counts
        .iter()
        .map(|c| c.value.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for count in counts.iter() {
        let cells = if max == 0 {
            0
        } else {
            ((count.count * width + max - 1) / max).max(1)
        };
        out.push_str(&format!(
            "{}{} {} {}\n",
            count.value,
            " ".repeat(label_width - count.value.chars().count()),
            BAR_CELL.to_string().repeat(cells),
            count.count
        ));
    }
    out
}

/// Generate a JSON dashboard.
pub fn generate_json_dashboard(view: &DashboardView) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(Into::into)
}
