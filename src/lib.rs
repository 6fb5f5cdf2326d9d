//! # SMB Analytics
//!
//! Filterable KPI dashboards over three small-business datasets: restaurant
//! sales, construction jobs and real-estate listings.
//!
//! ## Features
//!
//! - **CSV loading**: Strict, typed loading with file and line in every error
//! - **Filtering**: Single, multi and "All" selections per panel
//! - **Aggregation**: KPIs and grouped summaries recomputed on every change
//! - **Presentation**: A serializable render model drawn as HTML, JSON or text
//! - **Sessions**: Per-client filter state over WebSocket
//!
//! ## Modules
//!
//! - [`data`]: Record types and the CSV loader
//! - [`analytics`]: Filters and per-panel reports
//! - [`present`]: Render model and renderers
//! - [`dashboard`]: Recompute pipeline and sessions
//! - [`api`]: HTTP server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smb_analytics::dashboard::{Dashboard, FilterEvent, Session};
//! use smb_analytics::data::{DatasetPaths, Datasets};
//! use smb_analytics::config::DashboardConfig;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let datasets = Datasets::load(&DatasetPaths::in_dir("data"))?;
//!     let dashboard = Dashboard::new(Arc::new(datasets), DashboardConfig::default());
//!
//!     let mut session = Session::new();
//!     let panels = session.dispatch(
//!         &dashboard,
//!         FilterEvent::SelectLocation { value: "Downtown".to_string() },
//!     );
//!
//!     for panel in panels {
//!         println!("{}", smb_analytics::present::text::render_panel(&panel));
//!     }
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod logging;
pub mod present;
pub mod websocket;

// Re-export top-level types for convenience
pub use analytics::{
    ConstructionReport, RealEstateReport, RestaurantReport, Selection, ALL_CHOICE,
};

pub use data::{
    DataError, DataResult, DatasetKind, DatasetPaths, Datasets, JobRecord, ListingRecord,
    SalesRecord,
};

pub use dashboard::{Dashboard, FilterEvent, FilterState, Session};

pub use present::{ChartSpec, DashboardView, KpiTile, PanelView};

pub use api::{build_router, serve, ApiError, AppState};

pub use websocket::{
    ClientMessage, ConnectionHub, ControlMessage, HubConfig, HubError, ServerMessage,
};

pub use config::{ApiConfig, Config, ConfigError, DashboardConfig, DataConfig, LoggingConfig};
