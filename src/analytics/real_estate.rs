//! Real-estate team aggregations
//!
//! The KPI row follows the stage filter. The stage breakdown, commission by
//! agent and lead source charts are computed over the full dataset unless
//! `charts_follow_filter` is set.

use serde::Serialize;

use super::aggregate::{mean, sum, sum_by, value_counts, GroupCount, GroupTotal};
use super::filter::Selection;
use crate::data::ListingRecord;

/// Scalar KPIs of the real-estate panel
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RealEstateKpis {
    pub total_listings: usize,
    /// Mean listing price, undefined for an empty set
    pub avg_listing_price: Option<f64>,
    pub total_commission: f64,
}

/// Everything the real-estate panel shows for one filter state
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RealEstateReport {
    pub kpis: RealEstateKpis,
    /// Listings per stage, most frequent first
    pub stage_breakdown: Vec<GroupCount>,
    /// Commission per agent, ascending agent
    pub commission_by_agent: Vec<GroupTotal>,
    /// Listings per lead source, most frequent first
    pub lead_sources: Vec<GroupCount>,
    /// Whether the three charts above used the filtered set
    pub charts_filtered: bool,
}

impl RealEstateReport {
    /// Filter by stage, then aggregate
    pub fn compute(rows: &[ListingRecord], stage: &Selection, charts_follow_filter: bool) -> Self {
        let filtered = stage.apply(rows, |r| r.stage.as_str());
        let chart_rows: Vec<&ListingRecord> = if charts_follow_filter {
            filtered.clone()
        } else {
            rows.iter().collect()
        };

        Self {
            kpis: RealEstateKpis {
                total_listings: filtered.len(),
                avg_listing_price: mean(filtered.iter().map(|r| r.listing_price)),
                total_commission: sum(filtered.iter().map(|r| r.commission)),
            },
            stage_breakdown: value_counts(&chart_rows, |r| r.stage.as_str()),
            commission_by_agent: sum_by(&chart_rows, |r| r.agent.as_str(), |r| r.commission),
            lead_sources: value_counts(&chart_rows, |r| r.lead_source.as_str()),
            charts_filtered: charts_follow_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(stage: &str, agent: &str, source: &str, price: f64, commission: f64) -> ListingRecord {
        ListingRecord {
            listing_id: String::new(),
            stage: stage.to_string(),
            agent: agent.to_string(),
            lead_source: source.to_string(),
            listing_price: price,
            commission,
        }
    }

    fn sample() -> Vec<ListingRecord> {
        vec![
            listing("Listed", "Ava", "Zillow", 400_000.0, 12_000.0),
            listing("Closed", "Ben", "Referral", 300_000.0, 9_000.0),
            listing("Listed", "Ben", "Zillow", 500_000.0, 15_000.0),
            listing("Under Contract", "Cy", "Open House", 250_000.0, 7_500.0),
        ]
    }

    #[test]
    fn test_kpis_follow_filter() {
        let report = RealEstateReport::compute(&sample(), &Selection::choice("Listed"), false);
        assert_eq!(report.kpis.total_listings, 2);
        assert_eq!(report.kpis.avg_listing_price, Some(450_000.0));
        assert_eq!(report.kpis.total_commission, 27_000.0);
    }

    #[test]
    fn test_charts_ignore_filter_by_default() {
        let rows = sample();
        let all = RealEstateReport::compute(&rows, &Selection::All, false);
        let closed = RealEstateReport::compute(&rows, &Selection::choice("Closed"), false);

        assert_eq!(closed.kpis.total_listings, 1);
        assert_eq!(closed.stage_breakdown, all.stage_breakdown);
        assert_eq!(closed.commission_by_agent, all.commission_by_agent);
        assert_eq!(closed.lead_sources, all.lead_sources);
        assert!(!closed.charts_filtered);

        assert_eq!(all.stage_breakdown[0].key, "Listed");
        assert_eq!(all.stage_breakdown[0].count, 2);
        assert_eq!(all.lead_sources[0].key, "Zillow");
    }

    #[test]
    fn test_charts_can_follow_filter() {
        let report = RealEstateReport::compute(&sample(), &Selection::choice("Closed"), true);
        assert_eq!(report.stage_breakdown.len(), 1);
        assert_eq!(report.commission_by_agent.len(), 1);
        assert_eq!(report.commission_by_agent[0].key, "Ben");
        assert_eq!(report.commission_by_agent[0].value, 9_000.0);
        assert!(report.charts_filtered);
    }

    #[test]
    fn test_commission_by_agent_full_dataset() {
        let report = RealEstateReport::compute(&sample(), &Selection::All, false);
        let totals: Vec<(&str, f64)> = report
            .commission_by_agent
            .iter()
            .map(|g| (g.key.as_str(), g.value))
            .collect();
        assert_eq!(totals, vec![("Ava", 12_000.0), ("Ben", 24_000.0), ("Cy", 7_500.0)]);
    }

    #[test]
    fn test_empty_stage_degrades() {
        let report = RealEstateReport::compute(&sample(), &Selection::choice("Withdrawn"), false);
        assert_eq!(report.kpis.total_listings, 0);
        assert_eq!(report.kpis.avg_listing_price, None);
        assert_eq!(report.kpis.total_commission, 0.0);
        assert_eq!(report.stage_breakdown.len(), 3);
    }
}
