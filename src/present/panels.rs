//! Report → panel mapping
//!
//! Pure functions from an aggregation report to a `PanelView`. Bar charts
//! sorted "-y" get their rows emitted in that order.

use serde_json::{json, Value};

use super::format::{display_currency, display_percent, format_currency, format_integer};
use super::model::{ChartSpec, Control, Encoding, KpiTile, Mark, PanelView, ValueFormat};
use crate::analytics::aggregate::sort_desc_by;
use crate::analytics::{ConstructionReport, GroupTotal, RealEstateReport, RestaurantReport};
use crate::data::DatasetKind;

/// Restaurant chain panel
pub fn restaurant_panel(report: &RestaurantReport, controls: Vec<Control>) -> PanelView {
    let kpis = &report.kpis;

    let daily_sales: Vec<Value> = report
        .daily_sales
        .iter()
        .map(|d| json!({ "date": d.date, "total_sales": d.value }))
        .collect();

    let top_items: Vec<Value> = report
        .top_items
        .iter()
        .map(|i| {
            json!({
                "item": i.item,
                "category": i.category,
                "quantity": i.quantity,
                "revenue": i.revenue,
            })
        })
        .collect();

    let labor_ratio: Vec<Value> = report
        .labor_ratio_by_date
        .iter()
        .map(|d| json!({ "date": d.date, "labor_pct": d.value }))
        .collect();

    PanelView {
        panel: DatasetKind::Restaurant,
        title: "🍔 Restaurant Chain Dashboard".to_string(),
        controls,
        kpi_heading: "🍽️ Key Performance Indicators".to_string(),
        kpis: vec![
            KpiTile::new(
                "🧾",
                "Total Orders",
                Some(kpis.total_orders as f64),
                kpis.total_orders.to_string(),
            ),
            KpiTile::new(
                "💵",
                "Total Sales",
                Some(kpis.total_sales),
                format_currency(kpis.total_sales, 0),
            ),
            KpiTile::new(
                "📊",
                "Avg Order Value",
                kpis.avg_order_value,
                display_currency(kpis.avg_order_value, 2),
            ),
            KpiTile::new(
                "👷",
                "Avg Labor %",
                kpis.avg_labor_pct,
                display_percent(kpis.avg_labor_pct),
            ),
        ],
        charts: vec![
            ChartSpec::new("daily_sales", "Sales Overview", Mark::Line)
                .x(Encoding::temporal("date"))
                .y(Encoding::quantitative("total_sales").format(ValueFormat::Currency))
                .data(&["date", "total_sales"], daily_sales),
            ChartSpec::new("top_items", "Top-Selling Items", Mark::Bar)
                .x(Encoding::nominal("item").sorted_desc())
                .y(Encoding::quantitative("quantity"))
                .color(Encoding::nominal("category"))
                .tooltip(vec![
                    Encoding::nominal("item"),
                    Encoding::quantitative("quantity"),
                    Encoding::quantitative("revenue").format(ValueFormat::Currency),
                ])
                .data(&["item", "category", "quantity", "revenue"], top_items),
            ChartSpec::new("labor_ratio", "Labor Cost Ratio", Mark::Line)
                .x(Encoding::temporal("date"))
                .y(Encoding::quantitative("labor_pct").format(ValueFormat::Percent))
                .data(&["date", "labor_pct"], labor_ratio),
        ],
        notes: Vec::new(),
    }
}

/// Construction services panel
pub fn construction_panel(report: &ConstructionReport, controls: Vec<Control>) -> PanelView {
    let kpis = &report.kpis;

    let revenue: Vec<Value> = sorted_totals(&report.revenue_by_job_type)
        .iter()
        .map(|g| json!({ "job_type": g.key, "revenue": g.value }))
        .collect();

    let profitability: Vec<Value> = report
        .job_profitability
        .iter()
        .map(|j| {
            json!({
                "job_id": j.job_id,
                "job_type": j.job_type,
                "stage": j.stage,
                "profit": j.profit,
            })
        })
        .collect();

    let aging: Vec<Value> = report
        .active_jobs
        .iter()
        .map(|j| {
            json!({
                "job_id": j.job_id,
                "stage": j.stage,
                "start_date": j.start_date,
                "age_days": j.age_days,
            })
        })
        .collect();

    PanelView {
        panel: DatasetKind::Construction,
        title: "🏗️ Construction Services Dashboard".to_string(),
        controls,
        kpi_heading: "📐 Key Performance Indicators".to_string(),
        kpis: vec![
            KpiTile::new(
                "🧾",
                "Total Jobs",
                Some(kpis.total_jobs as f64),
                kpis.total_jobs.to_string(),
            ),
            KpiTile::new(
                "✅",
                "Completed Jobs",
                Some(kpis.completed_jobs as f64),
                kpis.completed_jobs.to_string(),
            ),
            KpiTile::new(
                "💰",
                "Total Revenue",
                Some(kpis.total_revenue),
                format_currency(kpis.total_revenue, 0),
            ),
            KpiTile::new(
                "📈",
                "Avg Job Profit",
                kpis.avg_profit,
                display_currency(kpis.avg_profit, 0),
            ),
        ],
        charts: vec![
            ChartSpec::new("revenue_by_job_type", "Revenue by Job Type", Mark::Bar)
                .x(Encoding::nominal("job_type").sorted_desc())
                .y(Encoding::quantitative("revenue"))
                .color(Encoding::nominal("job_type"))
                .tooltip(vec![
                    Encoding::nominal("job_type"),
                    Encoding::quantitative("revenue").format(ValueFormat::Currency),
                ])
                .data(&["job_type", "revenue"], revenue),
            ChartSpec::new("job_profitability", "Job Profitability", Mark::Table)
                .tooltip(vec![Encoding::quantitative("profit").format(ValueFormat::Currency)])
                .data(&["job_id", "job_type", "stage", "profit"], profitability),
            ChartSpec::new("active_job_aging", "Active Job Aging", Mark::Table)
                .data(&["job_id", "stage", "start_date", "age_days"], aging),
        ],
        notes: Vec::new(),
    }
}

/// Real-estate team panel
pub fn real_estate_panel(report: &RealEstateReport, controls: Vec<Control>) -> PanelView {
    let kpis = &report.kpis;

    let stages: Vec<Value> = report
        .stage_breakdown
        .iter()
        .map(|c| json!({ "stage": c.key, "count": c.count }))
        .collect();

    let commissions: Vec<Value> = sorted_totals(&report.commission_by_agent)
        .iter()
        .map(|g| json!({ "agent": g.key, "commission": g.value }))
        .collect();

    let sources: Vec<Value> = report
        .lead_sources
        .iter()
        .map(|c| json!({ "source": c.key, "count": c.count }))
        .collect();

    let notes = if report.charts_filtered {
        Vec::new()
    } else {
        vec!["Stage, agent and lead source charts cover all listings and ignore the stage filter."
            .to_string()]
    };

    PanelView {
        panel: DatasetKind::RealEstate,
        title: "🏘️ Real Estate Team Dashboard".to_string(),
        controls,
        kpi_heading: "🏡 Key Performance Indicators".to_string(),
        kpis: vec![
            KpiTile::new(
                "📋",
                "Total Listings",
                Some(kpis.total_listings as f64),
                kpis.total_listings.to_string(),
            ),
            KpiTile::new(
                "🏷️",
                "Avg Listing Price",
                kpis.avg_listing_price,
                display_currency(kpis.avg_listing_price, 0),
            ),
            KpiTile::new(
                "💰",
                "Total Commission",
                Some(kpis.total_commission),
                format_currency(kpis.total_commission, 2),
            ),
        ],
        charts: vec![
            ChartSpec::new("stage_breakdown", "Pipeline Stage Breakdown", Mark::Bar)
                .x(Encoding::nominal("stage").sorted_desc())
                .y(Encoding::quantitative("count").format(ValueFormat::Integer))
                .color(Encoding::nominal("stage"))
                .tooltip(vec![Encoding::nominal("stage"), Encoding::quantitative("count")])
                .data(&["stage", "count"], stages),
            ChartSpec::new("commission_by_agent", "Commissions by Agent", Mark::Bar)
                .x(Encoding::nominal("agent").sorted_desc())
                .y(Encoding::quantitative("commission"))
                .color(Encoding::nominal("agent"))
                .tooltip(vec![
                    Encoding::nominal("agent"),
                    Encoding::quantitative("commission").format(ValueFormat::Currency),
                ])
                .data(&["agent", "commission"], commissions),
            ChartSpec::new("lead_sources", "Lead Source Distribution", Mark::Arc)
                .theta(Encoding::quantitative("count").format(ValueFormat::Integer))
                .color(Encoding::nominal("source"))
                .tooltip(vec![Encoding::nominal("source"), Encoding::quantitative("count")])
                .data(&["source", "count"], sources),
        ],
        notes,
    }
}

/// Totals ordered for a "-y" sorted axis
fn sorted_totals(totals: &[GroupTotal]) -> Vec<GroupTotal> {
    let mut sorted = totals.to_vec();
    sort_desc_by(&mut sorted, |g| g.value);
    sorted
}

/// Format a row value for display using the chart's declared format
pub fn display_value(value: &Value, format: Option<ValueFormat>) -> String {
    match (value, format) {
        (Value::Number(n), Some(ValueFormat::Currency)) => {
            format_currency(n.as_f64().unwrap_or(0.0), 2)
        }
        (Value::Number(n), Some(ValueFormat::Percent)) => {
            super::format::format_percent(n.as_f64().unwrap_or(0.0) * 100.0)
        }
        (Value::Number(n), Some(ValueFormat::Integer)) => format_integer(n.as_f64().unwrap_or(0.0)),
        (Value::Number(n), None) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => format!("{:.2}", n.as_f64().unwrap_or(0.0)),
        },
        (Value::String(s), _) => s.clone(),
        (Value::Null, _) => String::new(),
        (other, _) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Selection;
    use crate::data::{JobRecord, ListingRecord, SalesRecord, COMPLETED_STAGE};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_restaurant_empty_renders_zero() {
        let report = RestaurantReport::compute(&[], &Selection::All);
        let panel = restaurant_panel(&report, Vec::new());
        let displays: Vec<&str> = panel.kpis.iter().map(|k| k.display.as_str()).collect();
        assert_eq!(displays, vec!["0", "$0", "$0.00", "0.0%"]);
        assert_eq!(panel.kpis[2].value, None);
        assert!(panel.charts.iter().all(|c| c.rows.is_empty()));
    }

    #[test]
    fn test_restaurant_kpi_formats() {
        let rows = vec![
            SalesRecord {
                date: date(1),
                location: "A".to_string(),
                item: "Burger".to_string(),
                category: "Mains".to_string(),
                quantity: 3,
                total_sales: 1_500.0,
                labor_cost: 450.0,
            },
            SalesRecord {
                date: date(2),
                location: "A".to_string(),
                item: "Fries".to_string(),
                category: "Sides".to_string(),
                quantity: 1,
                total_sales: 234.0,
                labor_cost: 10.0,
            },
        ];
        let report = RestaurantReport::compute(&rows, &Selection::All);
        let panel = restaurant_panel(&report, Vec::new());
        assert_eq!(panel.kpis[1].display, "$1,734");
        assert_eq!(panel.kpis[2].display, "$867.00");
        assert_eq!(panel.charts[1].rows[0]["item"], "Burger");
        assert_eq!(panel.charts[1].rows[0]["quantity"], 3);
    }

    #[test]
    fn test_construction_revenue_rows_sorted_desc() {
        let job = |id: &str, job_type: &str, revenue: f64| JobRecord {
            job_id: id.to_string(),
            job_type: job_type.to_string(),
            stage: "Completed".to_string(),
            start_date: date(1),
            revenue,
            labor_cost: 0.0,
            material_cost: 0.0,
        };
        let rows = vec![job("1", "Paving", 10.0), job("2", "Roofing", 30.0), job("3", "Deck", 20.0)];
        let report = ConstructionReport::compute(&rows, &Selection::All, COMPLETED_STAGE, date(2));
        let panel = construction_panel(&report, Vec::new());
        let order: Vec<&str> = panel.charts[0]
            .rows
            .iter()
            .filter_map(|r| r["job_type"].as_str())
            .collect();
        assert_eq!(order, vec!["Roofing", "Deck", "Paving"]);
        assert_eq!(panel.kpis[3].display, "$20");
    }

    #[test]
    fn test_real_estate_note_when_charts_unfiltered() {
        let rows = vec![ListingRecord {
            listing_id: "1".to_string(),
            stage: "Listed".to_string(),
            agent: "Ava".to_string(),
            lead_source: "Zillow".to_string(),
            listing_price: 410_000.0,
            commission: 12_300.0,
        }];
        let unfiltered = real_estate_panel(&RealEstateReport::compute(&rows, &Selection::All, false), Vec::new());
        assert_eq!(unfiltered.notes.len(), 1);
        assert_eq!(unfiltered.kpis[1].display, "$410,000");
        assert_eq!(unfiltered.kpis[2].display, "$12,300.00");
        assert_eq!(unfiltered.charts[2].mark, Mark::Arc);

        let filtered = real_estate_panel(&RealEstateReport::compute(&rows, &Selection::All, true), Vec::new());
        assert!(filtered.notes.is_empty());
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!(1234.5), Some(ValueFormat::Currency)), "$1,234.50");
        assert_eq!(display_value(&json!(0.425), Some(ValueFormat::Percent)), "42.5%");
        assert_eq!(display_value(&json!(12), None), "12");
        assert_eq!(display_value(&json!("Roofing"), None), "Roofing");
        assert_eq!(display_value(&json!(2.5), None), "2.50");
    }
}
