//! Server-rendered HTML page
//!
//! Draws a `DashboardView` with plain HTML and CSS: bars as sized divs,
//! lines as inline SVG, tables as tables. Each panel's form re-submits the
//! other panels' selections as hidden fields so a page load carries the
//! whole filter state.

use serde_json::Value;

use super::model::{ChartSpec, Control, ControlKind, DashboardView, KpiTile, Mark, PanelView};
use super::panels::display_value;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f6f7f9; color: #1f2933; }
header { background: #1f2933; color: #fff; padding: 16px 32px; }
nav a { color: #cbd2d9; margin-right: 16px; text-decoration: none; }
section.panel { background: #fff; margin: 24px 32px; padding: 16px 24px; border-radius: 8px; }
form.controls { margin-bottom: 12px; }
form.controls label { margin-right: 12px; }
.kpis { display: flex; gap: 16px; flex-wrap: wrap; }
.kpi { flex: 1; min-width: 160px; border: 1px solid #e4e7eb; border-radius: 6px; padding: 12px; }
.kpi .label { color: #616e7c; font-size: 0.9em; }
.kpi .value { font-size: 1.8em; font-weight: 600; }
.note { color: #8d2b0b; font-size: 0.9em; }
.chart { margin-top: 20px; }
.bar-row { display: flex; align-items: center; margin: 3px 0; }
.bar-label { width: 180px; }
.bar-track { flex: 1; background: #e4e7eb; height: 16px; border-radius: 3px; }
.bar { background: #3e7bfa; height: 16px; border-radius: 3px; }
.bar-value { width: 140px; text-align: right; }
table { border-collapse: collapse; }
td, th { border-bottom: 1px solid #e4e7eb; padding: 4px 12px; text-align: left; }
.empty { color: #9aa5b1; font-style: italic; }
"#;

/// Render the full page
pub fn render_page(view: &DashboardView) -> String {
    let nav: String = view
        .panels
        .iter()
        .map(|p| format!(r##"<a href="#{}">{}</a>"##, p.panel, escape(&p.title)))
        .collect();

    let sections: String = view
        .panels
        .iter()
        .map(|panel| panel_section(panel, view))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<header><h1>📊 {title}</h1><nav>{nav}</nav><small>As of {as_of}</small></header>
{sections}
</body>
</html>"#,
        title = escape(&view.title),
        as_of = view.as_of,
    )
}

fn panel_section(panel: &PanelView, view: &DashboardView) -> String {
    let own_controls: String = panel.controls.iter().map(control_html).collect();

    let carried: String = view
        .panels
        .iter()
        .filter(|p| p.panel != panel.panel)
        .flat_map(|p| p.controls.iter())
        .map(hidden_state)
        .collect();

    let notes: String = panel
        .notes
        .iter()
        .map(|n| format!(r#"<p class="note">{}</p>"#, escape(n)))
        .collect();

    let kpis: String = panel.kpis.iter().map(kpi_html).collect();
    let charts: String = panel.charts.iter().map(chart_html).collect();

    format!(
        r##"<section class="panel" id="{id}">
<h2>{title}</h2>
<form class="controls" method="get" action="/#{id}">{own_controls}{carried}<button type="submit">Apply</button></form>
<h3>{kpi_heading}</h3>
<div class="kpis">{kpis}</div>
{notes}
{charts}
</section>
"##,
        id = panel.panel,
        title = escape(&panel.title),
        kpi_heading = escape(&panel.kpi_heading),
    )
}

fn control_html(control: &Control) -> String {
    let param = escape(&control.param);
    match control.kind {
        ControlKind::Select => {
            let options: String = std::iter::once(crate::analytics::ALL_CHOICE.to_string())
                .chain(control.options.iter().cloned())
                .map(|o| {
                    let selected = if control.is_selected(&o) { " selected" } else { "" };
                    format!(r#"<option value="{v}"{selected}>{v}</option>"#, v = escape(&o))
                })
                .collect();
            format!(
                r#"<label>{label} <select name="{param}">{options}</select></label>"#,
                label = escape(&control.label),
            )
        }
        ControlKind::Radio => {
            let options: String = std::iter::once(crate::analytics::ALL_CHOICE.to_string())
                .chain(control.options.iter().cloned())
                .map(|o| {
                    let checked = if control.is_selected(&o) { " checked" } else { "" };
                    format!(
                        r#"<label><input type="radio" name="{param}" value="{v}"{checked}> {v}</label>"#,
                        v = escape(&o)
                    )
                })
                .collect();
            format!(r#"<fieldset><legend>{}</legend>{options}</fieldset>"#, escape(&control.label))
        }
        ControlKind::MultiSelect => {
            let options: String = control
                .options
                .iter()
                .map(|o| {
                    let checked = if control.is_selected(o) { " checked" } else { "" };
                    format!(
                        r#"<label><input type="checkbox" name="{param}" value="{v}"{checked}> {v}</label>"#,
                        v = escape(o)
                    )
                })
                .collect();
            // The blank value marks an explicit selection even when every box is cleared
            format!(
                r#"<fieldset><legend>{}</legend><input type="hidden" name="{param}" value="">{options}</fieldset>"#,
                escape(&control.label)
            )
        }
    }
}

fn hidden_state(control: &Control) -> String {
    let param = escape(&control.param);
    let marker = if control.kind == ControlKind::MultiSelect {
        format!(r#"<input type="hidden" name="{param}" value="">"#)
    } else {
        String::new()
    };
    let values: String = control
        .selected
        .iter()
        .map(|v| format!(r#"<input type="hidden" name="{param}" value="{}">"#, escape(v)))
        .collect();
    marker + &values
}

fn kpi_html(tile: &KpiTile) -> String {
    format!(
        r#"<div class="kpi"><div class="label">{} {}</div><div class="value">{}</div></div>"#,
        tile.icon,
        escape(&tile.label),
        escape(&tile.display)
    )
}

fn chart_html(chart: &ChartSpec) -> String {
    let body = if chart.rows.is_empty() {
        r#"<p class="empty">No data for the current selection.</p>"#.to_string()
    } else {
        match chart.mark {
            Mark::Line => line_svg(chart),
            Mark::Bar | Mark::Arc => bar_list(chart),
            Mark::Table => table(chart),
        }
    };
    format!(
        r#"<div class="chart"><h3>{}</h3>{}</div>"#,
        escape(&chart.title),
        body
    )
}

fn number(row: &Value, field: &str) -> f64 {
    row.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

fn line_svg(chart: &ChartSpec) -> String {
    const WIDTH: f64 = 640.0;
    const HEIGHT: f64 = 180.0;
    const PAD: f64 = 10.0;

    let (Some(x), Some(y)) = (&chart.x, &chart.y) else {
        return table(chart);
    };

    let values: Vec<f64> = chart.rows.iter().map(|r| number(r, &y.field)).collect();
    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };
    let step = if values.len() > 1 {
        (WIDTH - 2.0 * PAD) / (values.len() - 1) as f64
    } else {
        0.0
    };

    let points: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let px = PAD + step * i as f64;
            let py = HEIGHT - PAD - (v / max) * (HEIGHT - 2.0 * PAD);
            format!("{:.1},{:.1}", px, py)
        })
        .collect();

    let label = |row: Option<&Value>| {
        row.and_then(|r| r.get(&x.field))
            .map(|v| display_value(v, None))
            .unwrap_or_default()
    };

    format!(
        r##"<svg width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}"><polyline fill="none" stroke="#3e7bfa" stroke-width="2" points="{points}"/></svg>
<div><small>{first} → {last} · max {peak}</small></div>"##,
        points = points.join(" "),
        first = escape(&label(chart.rows.first())),
        last = escape(&label(chart.rows.last())),
        peak = escape(&display_value(&Value::from(max), y.format)),
    )
}

fn bar_list(chart: &ChartSpec) -> String {
    let (label_field, value_enc) = match chart.mark {
        Mark::Arc => (chart.color.as_ref(), chart.theta.as_ref()),
        _ => (chart.x.as_ref(), chart.y.as_ref()),
    };
    let (Some(label_field), Some(value_enc)) = (label_field, value_enc) else {
        return table(chart);
    };

    let values: Vec<f64> = chart.rows.iter().map(|r| number(r, &value_enc.field)).collect();
    let total: f64 = values.iter().sum();
    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    let format = chart.format_of(&value_enc.field);

    chart
        .rows
        .iter()
        .zip(values.iter())
        .map(|(row, value)| {
            let width = if max > 0.0 { value / max * 100.0 } else { 0.0 };
            let label = row
                .get(&label_field.field)
                .map(|v| display_value(v, None))
                .unwrap_or_default();
            let mut shown = display_value(&Value::from(*value), format);
            if chart.mark == Mark::Arc && total > 0.0 {
                shown = format!("{} ({:.1}%)", shown, value / total * 100.0);
            }
            format!(
                r#"<div class="bar-row"><span class="bar-label">{}</span><div class="bar-track"><div class="bar" style="width: {:.1}%"></div></div><span class="bar-value">{}</span></div>"#,
                escape(&label),
                width,
                escape(&shown)
            )
        })
        .collect()
}

fn table(chart: &ChartSpec) -> String {
    let head: String = chart
        .columns
        .iter()
        .map(|c| format!("<th>{}</th>", escape(c)))
        .collect();
    let body: String = chart
        .rows
        .iter()
        .map(|row| {
            let cells: String = chart
                .columns
                .iter()
                .map(|c| {
                    let value = row.get(c).cloned().unwrap_or(Value::Null);
                    format!("<td>{}</td>", escape(&display_value(&value, chart.format_of(c))))
                })
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();
    format!("<table><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table>")
}

/// Escape text for HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
