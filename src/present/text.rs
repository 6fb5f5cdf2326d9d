//! Plain-text rendering for the command line

use std::fmt::Write;

use serde_json::Value;

use super::model::{ChartSpec, DashboardView, PanelView};
use super::panels::display_value;

/// Render every panel of a view
pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = format!("{} (as of {})\n", view.title, view.as_of);
    for panel in &view.panels {
        out.push('\n');
        out.push_str(&render_panel(panel));
    }
    out
}

/// Render one panel: filters, KPI tiles, then each chart as a table
pub fn render_panel(panel: &PanelView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", panel.title);
    let _ = writeln!(out, "{}", "=".repeat(panel.title.chars().count()));

    for control in &panel.controls {
        let _ = writeln!(out, "{}: {}", control.label, control.selected.join(", "));
    }

    let _ = writeln!(out, "\n{}", panel.kpi_heading);
    for tile in &panel.kpis {
        let _ = writeln!(out, "  {} {:<20} {}", tile.icon, tile.label, tile.display);
    }
    for note in &panel.notes {
        let _ = writeln!(out, "  note: {}", note);
    }

    for chart in &panel.charts {
        out.push('\n');
        out.push_str(&render_chart(chart));
    }
    out
}

fn render_chart(chart: &ChartSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart.title);

    if chart.rows.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return out;
    }

    let cells: Vec<Vec<String>> = chart
        .rows
        .iter()
        .map(|row| {
            chart
                .columns
                .iter()
                .map(|c| {
                    let value = row.get(c).cloned().unwrap_or(Value::Null);
                    display_value(&value, chart.format_of(c))
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = chart
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(widths.iter())
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect();
        format!("  {}", padded.join("  ").trim_end())
    };

    let _ = writeln!(out, "{}", line(chart.columns.iter().map(String::as_str).collect()));
    for row in &cells {
        let _ = writeln!(out, "{}", line(row.iter().map(String::as_str).collect()));
    }
    out
}
