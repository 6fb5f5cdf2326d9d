//! Construction services aggregations
//!
//! The stage multi-select applies to every KPI and table of this panel.
//! Job aging is measured against an explicit reference date so that a
//! render is a pure function of its inputs.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::{mean, sort_desc_by, sum, sum_by, GroupTotal};
use super::filter::Selection;
use crate::data::JobRecord;

/// Scalar KPIs of the construction panel
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConstructionKpis {
    pub total_jobs: usize,
    pub completed_jobs: usize,
    pub total_revenue: f64,
    /// Mean job profit, undefined for an empty set
    pub avg_profit: Option<f64>,
}

/// Profit line of the job profitability table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobProfit {
    pub job_id: String,
    pub job_type: String,
    pub stage: String,
    pub profit: f64,
}

/// Row of the active job aging table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActiveJob {
    pub job_id: String,
    pub stage: String,
    pub start_date: NaiveDate,
    pub age_days: i64,
}

/// Everything the construction panel shows for one filter state
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConstructionReport {
    pub kpis: ConstructionKpis,
    /// Revenue per job type, ascending job type
    pub revenue_by_job_type: Vec<GroupTotal>,
    /// Every job with its profit, most profitable first
    pub job_profitability: Vec<JobProfit>,
    /// Jobs not yet completed, oldest first
    pub active_jobs: Vec<ActiveJob>,
}

impl ConstructionReport {
    /// Filter by stage set, then aggregate
    pub fn compute(
        rows: &[JobRecord],
        stages: &Selection,
        completed_stage: &str,
        today: NaiveDate,
    ) -> Self {
        let filtered = stages.apply(rows, |r| r.stage.as_str());
        Self::from_rows(&filtered, completed_stage, today)
    }

    /// Aggregate an already filtered set
    pub fn from_rows(rows: &[&JobRecord], completed_stage: &str, today: NaiveDate) -> Self {
        Self {
            kpis: ConstructionKpis {
                total_jobs: rows.len(),
                completed_jobs: rows
                    .iter()
                    .filter(|r| r.is_completed(completed_stage))
                    .count(),
                total_revenue: sum(rows.iter().map(|r| r.revenue)),
                avg_profit: mean(rows.iter().map(|r| r.profit())),
            },
            revenue_by_job_type: sum_by(rows, |r| r.job_type.as_str(), |r| r.revenue),
            job_profitability: job_profitability(rows),
            active_jobs: active_jobs(rows, completed_stage, today),
        }
    }
}

fn job_profitability(rows: &[&JobRecord]) -> Vec<JobProfit> {
    let mut jobs: Vec<JobProfit> = rows
        .iter()
        .map(|r| JobProfit {
            job_id: r.job_id.clone(),
            job_type: r.job_type.clone(),
            stage: r.stage.clone(),
            profit: r.profit(),
        })
        .collect();
    sort_desc_by(&mut jobs, |j| j.profit);
    jobs
}

fn active_jobs(rows: &[&JobRecord], completed_stage: &str, today: NaiveDate) -> Vec<ActiveJob> {
    let mut jobs: Vec<ActiveJob> = rows
        .iter()
        .filter(|r| !r.is_completed(completed_stage))
        .map(|r| ActiveJob {
            job_id: r.job_id.clone(),
            stage: r.stage.clone(),
            start_date: r.start_date,
            age_days: r.age_days(today),
        })
        .collect();
    jobs.sort_by(|a, b| b.age_days.cmp(&a.age_days));
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::COMPLETED_STAGE;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn job(id: &str, job_type: &str, stage: &str, start: NaiveDate, costs: (f64, f64, f64)) -> JobRecord {
        JobRecord {
            job_id: id.to_string(),
            job_type: job_type.to_string(),
            stage: stage.to_string(),
            start_date: start,
            revenue: costs.0,
            labor_cost: costs.1,
            material_cost: costs.2,
        }
    }

    fn sample() -> Vec<JobRecord> {
        vec![
            job("J-1", "Roofing", "Completed", date(2024, 1, 5), (12_000.0, 5_000.0, 3_000.0)),
            job("J-2", "Remodel", "In Progress", date(2024, 2, 1), (30_000.0, 9_000.0, 11_000.0)),
            job("J-3", "Roofing", "Bid", date(2024, 3, 1), (8_000.0, 6_000.0, 4_000.0)),
            job("J-4", "Paving", "In Progress", date(2024, 1, 20), (5_000.0, 1_000.0, 1_000.0)),
        ]
    }

    #[test]
    fn test_completed_and_active_scenario() {
        let rows = vec![
            job("J-1", "Roofing", "Completed", date(2024, 1, 5), (100.0, 10.0, 10.0)),
            job("J-2", "Roofing", "In Progress", date(2024, 2, 1), (100.0, 10.0, 10.0)),
        ];
        let today = date(2024, 3, 1);
        let report = ConstructionReport::compute(&rows, &Selection::All, COMPLETED_STAGE, today);

        assert_eq!(report.kpis.completed_jobs, 1);
        assert_eq!(report.active_jobs.len(), 1);
        assert_eq!(report.active_jobs[0].job_id, "J-2");
        assert_eq!(report.active_jobs[0].age_days, (today - date(2024, 2, 1)).num_days());
        assert_eq!(report.active_jobs[0].age_days, 29);
    }

    #[test]
    fn test_kpis_all_stages() {
        let report =
            ConstructionReport::compute(&sample(), &Selection::All, COMPLETED_STAGE, date(2024, 4, 1));
        assert_eq!(report.kpis.total_jobs, 4);
        assert_eq!(report.kpis.completed_jobs, 1);
        assert_eq!(report.kpis.total_revenue, 55_000.0);
        // profits: 4000, 10000, -2000, 3000
        assert_eq!(report.kpis.avg_profit, Some(3_750.0));
    }

    #[test]
    fn test_stage_multiselect_union() {
        let stages = Selection::many(["Bid", "Completed"]);
        let report = ConstructionReport::compute(&sample(), &stages, COMPLETED_STAGE, date(2024, 4, 1));
        assert_eq!(report.kpis.total_jobs, 2);
        assert_eq!(report.kpis.total_revenue, 20_000.0);
        assert_eq!(report.active_jobs.len(), 1);
        assert_eq!(report.active_jobs[0].job_id, "J-3");
    }

    #[test]
    fn test_no_stage_selected_is_empty() {
        let none: [&str; 0] = [];
        let report =
            ConstructionReport::compute(&sample(), &Selection::many(none), COMPLETED_STAGE, date(2024, 4, 1));
        assert_eq!(report.kpis.total_jobs, 0);
        assert_eq!(report.kpis.total_revenue, 0.0);
        assert_eq!(report.kpis.avg_profit, None);
        assert!(report.revenue_by_job_type.is_empty());
    }

    #[test]
    fn test_revenue_by_job_type() {
        let report =
            ConstructionReport::compute(&sample(), &Selection::All, COMPLETED_STAGE, date(2024, 4, 1));
        let totals: Vec<(&str, f64)> = report
            .revenue_by_job_type
            .iter()
            .map(|g| (g.key.as_str(), g.value))
            .collect();
        assert_eq!(
            totals,
            vec![("Paving", 5_000.0), ("Remodel", 30_000.0), ("Roofing", 20_000.0)]
        );
    }

    #[test]
    fn test_profit_is_filter_independent() {
        let rows = sample();
        let today = date(2024, 4, 1);
        for stages in [
            Selection::All,
            Selection::many(["In Progress"]),
            Selection::many(["Completed", "Bid"]),
        ] {
            let report = ConstructionReport::compute(&rows, &stages, COMPLETED_STAGE, today);
            for line in &report.job_profitability {
                let source = rows.iter().find(|r| r.job_id == line.job_id).unwrap();
                assert_eq!(
                    line.profit,
                    source.revenue - source.labor_cost - source.material_cost
                );
            }
        }
    }

    #[test]
    fn test_profitability_and_aging_order() {
        let report =
            ConstructionReport::compute(&sample(), &Selection::All, COMPLETED_STAGE, date(2024, 4, 1));
        let by_profit: Vec<&str> = report
            .job_profitability
            .iter()
            .map(|j| j.job_id.as_str())
            .collect();
        assert_eq!(by_profit, vec!["J-2", "J-1", "J-4", "J-3"]);

        let by_age: Vec<&str> = report.active_jobs.iter().map(|j| j.job_id.as_str()).collect();
        assert_eq!(by_age, vec!["J-4", "J-2", "J-3"]);
    }

    #[test]
    fn test_completed_match_is_exact() {
        let rows = vec![job("J-9", "Roofing", "completed", date(2024, 1, 1), (1.0, 0.0, 0.0))];
        let report = ConstructionReport::compute(&rows, &Selection::All, COMPLETED_STAGE, date(2024, 1, 2));
        assert_eq!(report.kpis.completed_jobs, 0);
        assert_eq!(report.active_jobs.len(), 1);
    }
}
