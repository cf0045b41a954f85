//! File-backed work item: run variables in, audit record out.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tidings_core::traits::ParameterSource;
use tracing::info;

/// Reads `{search_phrase, news_categories, number_of_months}` from a JSON
/// file and writes `{"valid_categories": [...]}` next to it (or wherever
/// `output` points).
#[derive(Debug, Clone)]
pub struct JsonWorkItem {
    input: PathBuf,
    output: PathBuf,
}

impl JsonWorkItem {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Output file derived from the input name: `work-item.json` becomes
    /// `work-item.output.json`.
    pub fn beside(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let output = input.with_extension("output.json");
        Self { input, output }
    }

    pub fn output_path(&self) -> &std::path::Path {
        &self.output
    }
}

impl ParameterSource for JsonWorkItem {
    fn variables(&mut self) -> Result<Value> {
        let text = fs::read_to_string(&self.input)
            .with_context(|| format!("reading work item {}", self.input.display()))?;
        let variables: Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing work item {}", self.input.display()))?;
        Ok(variables)
    }

    fn publish_valid_categories(&mut self, valid: &[String]) -> Result<()> {
        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let payload = json!({ "valid_categories": valid });
        fs::write(&self.output, serde_json::to_vec_pretty(&payload)?)
            .with_context(|| format!("writing work item output {}", self.output.display()))?;
        info!(path = %self.output.display(), ?valid, "workitem.output_saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_variables_and_writes_valid_categories() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("work-item.json");
        fs::write(
            &input,
            r#"{"search_phrase": "bridge", "news_categories": ["Arts"], "number_of_months": 1}"#,
        )
        .unwrap();

        let mut item = JsonWorkItem::beside(&input);
        assert_eq!(item.output_path(), dir.path().join("work-item.output.json"));

        let vars = item.variables().unwrap();
        assert_eq!(vars["search_phrase"], "bridge");

        item.publish_valid_categories(&["Arts".to_string()]).unwrap();
        let written: Value =
            serde_json::from_str(&fs::read_to_string(item.output_path()).unwrap()).unwrap();
        assert_eq!(written, json!({"valid_categories": ["Arts"]}));
    }

    #[test]
    fn missing_or_malformed_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut missing = JsonWorkItem::beside(dir.path().join("absent.json"));
        assert!(missing.variables().is_err());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        assert!(JsonWorkItem::beside(&bad).variables().is_err());
    }
}
