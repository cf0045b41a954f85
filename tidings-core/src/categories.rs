//! Reconciling requested topic filters with the ones the results page offers.

use serde::Serialize;

/// Label of the catch-all filter.
pub const ANY: &str = "Any";

/// What should end up ticked in the category multiselect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<String>")]
pub enum CategorySelection {
    /// Only the catch-all filter.
    Any,
    /// A non-empty, ordered subset of the requested labels.
    Labels(Vec<String>),
}

impl CategorySelection {
    /// Labels to activate, in order.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            CategorySelection::Any => vec![ANY],
            CategorySelection::Labels(labels) => labels.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, CategorySelection::Any)
    }
}

impl From<CategorySelection> for Vec<String> {
    fn from(selection: CategorySelection) -> Self {
        match selection {
            CategorySelection::Any => vec![ANY.to_string()],
            CategorySelection::Labels(labels) => labels,
        }
    }
}

/// Outcome of [`resolve`]: the audit list plus the activation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryResolution {
    /// Requested labels confirmed present upstream, in request order.
    pub valid: Vec<String>,
    pub selection: CategorySelection,
}

/// Strip the result counters the page appends to labels (`"Arts12"`).
pub fn strip_counts(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Decide which category filters to activate.
///
/// ```
/// use tidings_core::categories::{resolve, CategorySelection};
///
/// let requested = vec!["Sports".to_string(), "Unknown".to_string()];
/// let available = vec!["Sports1".to_string(), "Arts2".to_string()];
/// let resolution = resolve(&requested, &available);
/// assert_eq!(resolution.valid, vec!["Sports"]);
/// assert_eq!(resolution.selection, CategorySelection::Labels(vec!["Sports".into()]));
/// ```
pub fn resolve(requested: &[String], available: &[String]) -> CategoryResolution {
    let offered: Vec<String> = available.iter().map(|label| strip_counts(label)).collect();

    let valid: Vec<String> = requested
        .iter()
        .filter(|label| offered.iter().any(|o| o == *label))
        .cloned()
        .collect();

    let selection = if valid.is_empty() || valid.iter().any(|label| label == ANY) {
        CategorySelection::Any
    } else {
        CategorySelection::Labels(valid.clone())
    };

    tracing::debug!(
        requested = ?requested,
        offered = ?offered,
        valid = ?valid,
        any = selection.is_any(),
        "categories.resolved"
    );

    CategoryResolution { valid, selection }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keeps_only_offered_labels() {
        let r = resolve(&labels(&["Sports", "Unknown"]), &labels(&["Sports1", "Arts2"]));
        assert_eq!(r.valid, labels(&["Sports"]));
        assert_eq!(r.selection.labels(), vec!["Sports"]);
    }

    #[test]
    fn any_short_circuits_other_labels() {
        let r = resolve(&labels(&["Any", "Sports"]), &labels(&["Any", "Sports3"]));
        assert_eq!(r.valid, labels(&["Any", "Sports"]));
        assert_eq!(r.selection, CategorySelection::Any);
    }

    #[test]
    fn no_overlap_falls_back_to_any() {
        let r = resolve(&labels(&["Zzz"]), &labels(&["Sports1", "Arts2"]));
        assert!(r.valid.is_empty());
        assert_eq!(r.selection.labels(), vec![ANY]);
    }

    #[test]
    fn empty_request_falls_back_to_any() {
        let r = resolve(&[], &labels(&["Sports1"]));
        assert!(r.selection.is_any());
    }

    #[test]
    fn preserves_request_order_and_is_case_sensitive() {
        let r = resolve(
            &labels(&["World", "arts", "Business"]),
            &labels(&["Business 120", "Arts 12", "World 7"]),
        );
        assert_eq!(r.valid, labels(&["World", "Business"]));
        assert_eq!(
            r.selection,
            CategorySelection::Labels(labels(&["World", "Business"]))
        );
    }

    #[test]
    fn strips_digits_anywhere() {
        assert_eq!(strip_counts("Sports1"), "Sports");
        assert_eq!(strip_counts("U.S.2,345"), "U.S.,");
        assert_eq!(strip_counts(" Opinion 99 "), "Opinion");
    }

    #[test]
    fn serializes_plan_as_label_list() {
        let any = serde_json::to_value(CategorySelection::Any).unwrap();
        assert_eq!(any, serde_json::json!(["Any"]));
    }
}
