//! Benchmarks for the dashboard recompute pipeline
//!
//! Run with: cargo bench

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use smb_analytics::config::DashboardConfig;
use smb_analytics::dashboard::{Dashboard, FilterState};
use smb_analytics::data::{read_records, Datasets, JobRecord, ListingRecord, SalesRecord};
use smb_analytics::Selection;
use std::path::Path;
use std::sync::Arc;

const LOCATIONS: [&str; 4] = ["Downtown", "Uptown", "Airport", "Harbor"];
const STAGES: [&str; 4] = ["Bidding", "In Progress", "Inspection", "Completed"];
const LISTING_STAGES: [&str; 3] = ["Active", "Pending", "Sold"];

fn create_datasets(size: usize) -> Datasets {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let restaurant = (0..size)
        .map(|i| SalesRecord {
            date: base + chrono::Duration::days((i % 90) as i64),
            location: LOCATIONS[i % LOCATIONS.len()].to_string(),
            item: format!("Item {}", i % 40),
            category: format!("Category {}", i % 6),
            quantity: (i % 7) as u32 + 1,
            total_sales: 10.0 + (i % 50) as f64,
            labor_cost: 3.0 + (i % 20) as f64,
        })
        .collect();

    let construction = (0..size)
        .map(|i| JobRecord {
            job_id: format!("J-{}", i),
            job_type: format!("Type {}", i % 8),
            stage: STAGES[i % STAGES.len()].to_string(),
            start_date: base + chrono::Duration::days((i % 180) as i64),
            revenue: 5_000.0 + (i % 100) as f64 * 100.0,
            labor_cost: 1_500.0,
            material_cost: 1_000.0,
        })
        .collect();

    let real_estate = (0..size)
        .map(|i| ListingRecord {
            listing_id: format!("L-{}", i),
            stage: LISTING_STAGES[i % LISTING_STAGES.len()].to_string(),
            agent: format!("Agent {}", i % 12),
            lead_source: format!("Source {}", i % 5),
            listing_price: 250_000.0 + (i % 100) as f64 * 1_000.0,
            commission: 7_500.0,
        })
        .collect();

    Datasets::new(restaurant, construction, real_estate)
}

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute");
    let config = DashboardConfig {
        as_of: NaiveDate::from_ymd_opt(2024, 6, 30),
        ..Default::default()
    };

    for size in [1_000, 10_000, 100_000] {
        let dashboard = Dashboard::new(Arc::new(create_datasets(size)), config.clone());
        let filtered = FilterState {
            location: Selection::choice("Downtown"),
            stages: Selection::many(["Bidding", "In Progress"]),
            listing_stage: Selection::choice("Sold"),
        };

        group.throughput(Throughput::Elements(size as u64 * 3));

        group.bench_function(format!("default_{}", size), |b| {
            b.iter(|| dashboard.recompute(black_box(&FilterState::default())))
        });

        group.bench_function(format!("filtered_{}", size), |b| {
            b.iter(|| dashboard.recompute(black_box(&filtered)))
        });
    }

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    let mut csv = String::from("date,location,item,category,quantity,total_sales,labor_cost\n");
    for i in 0..10_000 {
        csv.push_str(&format!(
            "2024-01-{:02},{},Item {},Entree,{},{}.50,{}.25\n",
            i % 28 + 1,
            LOCATIONS[i % LOCATIONS.len()],
            i % 40,
            i % 7 + 1,
            10 + i % 50,
            3 + i % 20
        ));
    }

    group.throughput(Throughput::Elements(10_000));
    group.bench_function("restaurant_10000", |b| {
        b.iter(|| {
            read_records::<SalesRecord, _>(black_box(csv.as_bytes()), Path::new("bench.csv"))
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_recompute, bench_load);
criterion_main!(benches);
