//! Presenter
//!
//! Stateless mapping from analytics reports to a render model, plus the
//! two built-in renderers of that model:
//!
//! - **model**: KPI tiles, controls, chart directives
//! - **format**: Currency / percent / integer display
//! - **panels**: Report → `PanelView`
//! - **html**: Server-rendered page
//! - **text**: Terminal output

pub mod format;
pub mod html;
pub mod model;
pub mod panels;
pub mod text;

pub use format::{display_currency, display_percent, format_currency, format_integer, format_percent};
pub use model::{
    AxisSort, ChartSpec, Control, ControlKind, DashboardView, Encoding, FieldType, KpiTile, Mark,
    PanelView, ValueFormat,
};
pub use panels::{construction_panel, real_estate_panel, restaurant_panel};
