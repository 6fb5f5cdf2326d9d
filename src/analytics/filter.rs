//! Row filtering by a categorical field
//!
//! A `Selection` is the value of one filter control. Applying it never
//! fails: a selection that matches nothing yields an empty set, and the
//! aggregators downstream handle empty sets.

use serde::{Deserialize, Serialize};

/// Label of the catch-all choice in single-select controls
pub const ALL_CHOICE: &str = "All";

/// Current value of a filter control
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "values", rename_all = "snake_case")]
pub enum Selection {
    /// No narrowing, every row passes
    #[default]
    All,
    /// Rows whose field equals this value
    One(String),
    /// Rows whose field is any of these values; empty selects nothing
    Many(Vec<String>),
}

impl Selection {
    /// Selection for a single-select control value; "All" or blank means all
    pub fn choice(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_CHOICE {
            Selection::All
        } else {
            Selection::One(trimmed.to_string())
        }
    }

    /// Selection for a multi-select control, dropping blanks and repeats
    pub fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            let value = value.trim();
            if !value.is_empty() && !selected.iter().any(|s| s == value) {
                selected.push(value.to_string());
            }
        }
        Selection::Many(selected)
    }

    /// Whether a field value passes this selection
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::One(selected) => selected == value,
            Selection::Many(selected) => selected.iter().any(|s| s == value),
        }
    }

    /// Rows passing the selection, in original order
    pub fn apply<'a, T, F>(&self, rows: &'a [T], field: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> &str,
    {
        rows.iter().filter(|row| self.matches(field(row))).collect()
    }

    /// Whether this selection leaves the dataset unchanged
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Short human-readable description for logs and page headers
    pub fn label(&self) -> String {
        match self {
            Selection::All => ALL_CHOICE.to_string(),
            Selection::One(value) => value.clone(),
            Selection::Many(values) if values.is_empty() => "none".to_string(),
            Selection::Many(values) => values.join(", "),
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<(&'static str, u32)> {
        vec![("A", 1), ("B", 2), ("A", 3), ("C", 4)]
    }

    #[test]
    fn test_all_is_identity() {
        let rows = rows();
        let filtered = Selection::All.apply(&rows, |r| r.0);
        assert_eq!(filtered.len(), rows.len());
        assert!(filtered.iter().zip(rows.iter()).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_single_value_preserves_order() {
        let rows = rows();
        let filtered = Selection::choice("A").apply(&rows, |r| r.0);
        let ids: Vec<u32> = filtered.iter().map(|r| r.1).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_choice_all_label() {
        assert_eq!(Selection::choice("All"), Selection::All);
        assert_eq!(Selection::choice("  "), Selection::All);
        assert_eq!(Selection::choice(" B "), Selection::One("B".to_string()));
    }

    #[test]
    fn test_many_is_union() {
        let rows = rows();
        let filtered = Selection::many(["C", "B", "C", ""]).apply(&rows, |r| r.0);
        let ids: Vec<u32> = filtered.iter().map(|r| r.1).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_empty_many_selects_nothing() {
        let rows = rows();
        let empty: [&str; 0] = [];
        assert!(Selection::many(empty).apply(&rows, |r| r.0).is_empty());
        assert_eq!(Selection::many(empty).label(), "none");
    }

    #[test]
    fn test_unknown_value_yields_empty_subset() {
        let rows = rows();
        assert!(Selection::choice("Z").apply(&rows, |r| r.0).is_empty());
    }

    #[test]
    fn test_selection_serde() {
        let json = serde_json::to_string(&Selection::Many(vec!["Bid".to_string()])).unwrap();
        assert_eq!(json, r#"{"mode":"many","values":["Bid"]}"#);
        let parsed: Selection = serde_json::from_str(r#"{"mode":"all"}"#).unwrap();
        assert_eq!(parsed, Selection::All);
    }
}
