use serde_json::Value;
use tidings_common::{Result, TidingsError};

use crate::window::months_back_from_value;

/// Validated run parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParameters {
    pub search_phrase: String,
    pub news_categories: Vec<String>,
    pub number_of_months: u32,
}

impl SearchParameters {
    /// Validate raw work item variables.
    ///
    /// A single category given as a bare string is accepted as a one-element
    /// list; a missing `news_categories` means no preference.
    pub fn from_value(variables: &Value) -> Result<Self> {
        let search_phrase = variables
            .get("search_phrase")
            .and_then(Value::as_str)
            .ok_or_else(|| TidingsError::Validation("search_phrase must be a string".into()))?
            .to_string();

        let news_categories = match variables.get("news_categories") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(single)) => vec![single.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        TidingsError::Validation(format!(
                            "news_categories entries must be strings, got {item}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(TidingsError::Validation(format!(
                    "news_categories must be a list of strings, got {other}"
                )))
            }
        };

        let number_of_months = months_back_from_value(
            variables.get("number_of_months").unwrap_or(&Value::Null),
        )?;

        Ok(Self {
            search_phrase,
            news_categories,
            number_of_months,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_variables() {
        let params = SearchParameters::from_value(&json!({
            "search_phrase": "climate",
            "news_categories": ["Science", "Any"],
            "number_of_months": 2
        }))
        .unwrap();
        assert_eq!(params.search_phrase, "climate");
        assert_eq!(params.news_categories, vec!["Science", "Any"]);
        assert_eq!(params.number_of_months, 2);
    }

    #[test]
    fn single_category_string_becomes_a_list() {
        let params = SearchParameters::from_value(&json!({
            "search_phrase": "x",
            "news_categories": "Arts",
            "number_of_months": 0
        }))
        .unwrap();
        assert_eq!(params.news_categories, vec!["Arts"]);
    }

    #[test]
    fn rejects_bad_month_counts_and_missing_phrase() {
        let negative = json!({"search_phrase": "x", "number_of_months": -2});
        assert!(SearchParameters::from_value(&negative).unwrap_err().is_validation());

        let missing = json!({"search_phrase": "x"});
        assert!(SearchParameters::from_value(&missing).unwrap_err().is_validation());

        let no_phrase = json!({"number_of_months": 1});
        assert!(SearchParameters::from_value(&no_phrase).unwrap_err().is_validation());

        let bad_categories = json!({"search_phrase": "x", "news_categories": 3, "number_of_months": 1});
        assert!(SearchParameters::from_value(&bad_categories).unwrap_err().is_validation());
    }
}
