//! Render model
//!
//! Serializable description of what a client should draw: KPI tiles,
//! filter controls and chart directives. A chart directive names its mark,
//! its encodings and carries its data rows, already ordered the way the
//! encodings ask for.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::analytics::Selection;
use crate::data::DatasetKind;

/// One KPI tile
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KpiTile {
    pub label: String,
    pub icon: String,
    /// Raw value, `null` when undefined
    pub value: Option<f64>,
    /// Formatted value shown to the user
    pub display: String,
}

impl KpiTile {
    pub fn new(
        icon: impl Into<String>,
        label: impl Into<String>,
        value: Option<f64>,
        display: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
            value,
            display: display.into(),
        }
    }
}

/// Graphical mark of a chart
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Line,
    Bar,
    Arc,
    Table,
}

/// Measurement type of an encoded field
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Nominal,
    Temporal,
    Quantitative,
}

/// Display format applied to a field value
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// `$1,234.56`
    Currency,
    /// `42.5%` from a 0..=1 ratio
    Percent,
    /// `1,234`
    Integer,
}

/// Axis sort directive
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AxisSort {
    /// Descending by the y metric
    #[serde(rename = "-y")]
    DescendingY,
}

/// Field bound to a visual channel
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Encoding {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<AxisSort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ValueFormat>,
}

impl Encoding {
    pub fn nominal(field: impl Into<String>) -> Self {
        Self::new(field, FieldType::Nominal)
    }

    pub fn temporal(field: impl Into<String>) -> Self {
        Self::new(field, FieldType::Temporal)
    }

    pub fn quantitative(field: impl Into<String>) -> Self {
        Self::new(field, FieldType::Quantitative)
    }

    fn new(field: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: field.into(),
            field_type,
            sort: None,
            format: None,
        }
    }

    /// Builder method: sort descending by the y metric
    pub fn sorted_desc(mut self) -> Self {
        self.sort = Some(AxisSort::DescendingY);
        self
    }

    /// Builder method: display format
    pub fn format(mut self, format: ValueFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// Declarative chart or table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSpec {
    /// Stable identifier within the panel
    pub id: String,
    pub title: String,
    pub mark: Mark,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Encoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Encoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theta: Option<Encoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Encoding>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tooltip: Vec<Encoding>,
    /// Column order of `rows`
    pub columns: Vec<String>,
    /// One JSON object per data row
    pub rows: Vec<Value>,
}

impl ChartSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>, mark: Mark) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            mark,
            x: None,
            y: None,
            theta: None,
            color: None,
            tooltip: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn x(mut self, encoding: Encoding) -> Self {
        self.x = Some(encoding);
        self
    }

    pub fn y(mut self, encoding: Encoding) -> Self {
        self.y = Some(encoding);
        self
    }

    pub fn theta(mut self, encoding: Encoding) -> Self {
        self.theta = Some(encoding);
        self
    }

    pub fn color(mut self, encoding: Encoding) -> Self {
        self.color = Some(encoding);
        self
    }

    pub fn tooltip(mut self, fields: Vec<Encoding>) -> Self {
        self.tooltip = fields;
        self
    }

    /// Builder method: column order and data rows
    pub fn data(mut self, columns: &[&str], rows: Vec<Value>) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self.rows = rows;
        self
    }

    /// Display format declared for a field by any encoding
    pub fn format_of(&self, field: &str) -> Option<ValueFormat> {
        [&self.x, &self.y, &self.theta, &self.color]
            .into_iter()
            .flatten()
            .chain(self.tooltip.iter())
            .filter(|e| e.field == field)
            .find_map(|e| e.format)
    }
}

/// Kind of filter widget
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Select,
    MultiSelect,
    Radio,
}

/// A filter control and its current value
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Control {
    /// Query parameter carrying the control's value
    pub param: String,
    pub label: String,
    pub kind: ControlKind,
    pub options: Vec<String>,
    /// Options currently selected
    pub selected: Vec<String>,
}

impl Control {
    /// Control with its selected options resolved from a selection
    pub fn new(
        param: impl Into<String>,
        label: impl Into<String>,
        kind: ControlKind,
        options: Vec<String>,
        selection: &Selection,
    ) -> Self {
        let selected = match selection {
            Selection::All if kind == ControlKind::MultiSelect => options.clone(),
            Selection::All => vec![crate::analytics::ALL_CHOICE.to_string()],
            Selection::One(value) => vec![value.clone()],
            Selection::Many(values) => values.clone(),
        };
        Self {
            param: param.into(),
            label: label.into(),
            kind,
            options,
            selected,
        }
    }

    pub fn is_selected(&self, option: &str) -> bool {
        self.selected.iter().any(|s| s == option)
    }
}

/// One rendered panel
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PanelView {
    pub panel: DatasetKind,
    pub title: String,
    pub controls: Vec<Control>,
    pub kpi_heading: String,
    pub kpis: Vec<KpiTile>,
    pub charts: Vec<ChartSpec>,
    /// Caveats shown under the KPI row
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// The whole page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardView {
    pub title: String,
    /// Reference date used for date-relative metrics
    pub as_of: NaiveDate,
    pub panels: Vec<PanelView>,
}

impl DashboardView {
    pub fn panel(&self, kind: DatasetKind) -> Option<&PanelView> {
        self.panels.iter().find(|p| p.panel == kind)
    }
}
