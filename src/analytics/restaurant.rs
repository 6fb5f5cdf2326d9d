//! Restaurant chain aggregations
//!
//! The location filter applies to every KPI and chart of this panel.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::{group_by, mean, sort_desc_by, sum};
use super::filter::Selection;
use crate::data::SalesRecord;

/// Scalar KPIs of the restaurant panel
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RestaurantKpis {
    /// Number of order rows
    pub total_orders: usize,
    pub total_sales: f64,
    /// Mean order revenue, undefined for an empty set
    pub avg_order_value: Option<f64>,
    /// Mean clamped labor ratio in percent, within [0, 100]
    pub avg_labor_pct: Option<f64>,
}

/// One point of a daily series
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub value: f64,
}

/// Per-item sales summary
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemSummary {
    pub item: String,
    /// Menu category of the item's first sale
    pub category: String,
    pub quantity: u64,
    pub revenue: f64,
}

/// Everything the restaurant panel shows for one filter state
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RestaurantReport {
    pub kpis: RestaurantKpis,
    /// Total sales per day, ascending date
    pub daily_sales: Vec<DailyValue>,
    /// Items by quantity sold, largest first
    pub top_items: Vec<ItemSummary>,
    /// Mean clamped labor ratio (0..=1) per day, ascending date
    pub labor_ratio_by_date: Vec<DailyValue>,
}

impl RestaurantReport {
    /// Filter by location, then aggregate
    pub fn compute(rows: &[SalesRecord], location: &Selection) -> Self {
        let filtered = location.apply(rows, |r| r.location.as_str());
        Self::from_rows(&filtered)
    }

    /// Aggregate an already filtered set
    pub fn from_rows(rows: &[&SalesRecord]) -> Self {
        Self {
            kpis: kpis(rows),
            daily_sales: daily_sales(rows),
            top_items: top_items(rows),
            labor_ratio_by_date: labor_ratio_by_date(rows),
        }
    }
}

fn kpis(rows: &[&SalesRecord]) -> RestaurantKpis {
    RestaurantKpis {
        total_orders: rows.len(),
        total_sales: sum(rows.iter().map(|r| r.total_sales)),
        avg_order_value: mean(rows.iter().map(|r| r.total_sales)),
        // Ratios are guarded per row before the mean
        avg_labor_pct: mean(rows.iter().filter_map(|r| r.labor_ratio())).map(|m| m * 100.0),
    }
}

fn daily_sales(rows: &[&SalesRecord]) -> Vec<DailyValue> {
    group_by(rows, |r| r.date)
        .into_iter()
        .map(|(date, day)| DailyValue {
            date,
            value: sum(day.iter().map(|r| r.total_sales)),
        })
        .collect()
}

fn top_items(rows: &[&SalesRecord]) -> Vec<ItemSummary> {
    let mut items: Vec<ItemSummary> = group_by(rows, |r| r.item.clone())
        .into_iter()
        .map(|(item, sales)| ItemSummary {
            category: sales
                .first()
                .map(|r| r.category.clone())
                .unwrap_or_default(),
            quantity: sales.iter().map(|r| u64::from(r.quantity)).sum(),
            revenue: sum(sales.iter().map(|r| r.total_sales)),
            item,
        })
        .collect();
    sort_desc_by(&mut items, |i| i.quantity as f64);
    items
}

fn labor_ratio_by_date(rows: &[&SalesRecord]) -> Vec<DailyValue> {
    group_by(rows, |r| r.date)
        .into_iter()
        .filter_map(|(date, day)| {
            mean(day.iter().filter_map(|r| r.labor_ratio())).map(|value| DailyValue { date, value })
        })
        .collect()
}
