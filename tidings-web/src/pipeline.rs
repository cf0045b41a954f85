//! End-to-end run: parameters in, export table out.

use std::path::PathBuf;

use serde::Serialize;
use tidings_common::{Result, TidingsError};
use tidings_config::{Selectors, Timeouts, TidingsConfig};
use tidings_core::dates::{Clock, DateNormalizer, SystemClock};
use tidings_core::filter::filter_by_window;
use tidings_core::params::SearchParameters;
use tidings_core::record::{ArticleRecordBuilder, RunContext};
use tidings_core::table::ExportTable;
use tidings_core::traits::{BrowserInterface, ExportSink, ImageFetch, ParameterSource};
use tidings_core::window::SearchWindow;
use tracing::info;

use crate::search::SearchResultsPage;

/// The slice of [`TidingsConfig`] a run needs.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub site_url: String,
    pub selectors: Selectors,
    pub timeouts: Timeouts,
    pub output_dir: PathBuf,
    pub export_path: PathBuf,
}

impl From<&TidingsConfig> for PipelineSettings {
    fn from(config: &TidingsConfig) -> Self {
        Self {
            site_url: config.site.url.clone(),
            selectors: config.selectors.clone(),
            timeouts: config.timeouts.clone(),
            output_dir: config.output.directory.clone(),
            export_path: config.output.export_path(),
        }
    }
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Listings read off the page.
    pub scanned: usize,
    /// Listings that passed the first window check.
    pub admitted: usize,
    /// Rows handed to the export sink.
    pub exported: usize,
    pub valid_categories: Vec<String>,
    pub export_path: PathBuf,
}

/// Wires the collaborators around the extraction core. Every collaborator
/// is injected; nothing here reaches for globals.
pub struct Pipeline<B, F, P, S, C = SystemClock> {
    browser: B,
    images: F,
    params: P,
    sink: S,
    clock: C,
    settings: PipelineSettings,
}

impl<B, F, P, S> Pipeline<B, F, P, S, SystemClock>
where
    B: BrowserInterface,
    F: ImageFetch,
    P: ParameterSource,
    S: ExportSink,
{
    pub fn new(browser: B, images: F, params: P, sink: S, settings: PipelineSettings) -> Self {
        Pipeline::with_clock(browser, images, params, sink, settings, SystemClock)
    }
}

impl<B, F, P, S, C> Pipeline<B, F, P, S, C>
where
    B: BrowserInterface,
    F: ImageFetch,
    P: ParameterSource,
    S: ExportSink,
    C: Clock + Clone,
{
    pub fn with_clock(
        browser: B,
        images: F,
        params: P,
        sink: S,
        settings: PipelineSettings,
        clock: C,
    ) -> Self {
        Self {
            browser,
            images,
            params,
            sink,
            clock,
            settings,
        }
    }

    /// Hand back the collaborators, e.g. to close the browser session.
    pub fn into_parts(self) -> (B, F, P, S) {
        (self.browser, self.images, self.params, self.sink)
    }

    /// Run the whole search once.
    ///
    /// Any collaborator failure aborts the run; records gathered up to that
    /// point are dropped.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let variables = self.params.variables().map_err(collaborator_error)?;
        let params = SearchParameters::from_value(&variables)?;
        let window = SearchWindow::months_back(params.number_of_months, self.clock.today())?;

        info!(
            phrase = %params.search_phrase,
            categories = ?params.news_categories,
            months = params.number_of_months,
            start = %window.start_text(),
            end = %window.end_text(),
            "pipeline.started"
        );

        let settings = &self.settings;
        let mut page =
            SearchResultsPage::new(&mut self.browser, &settings.selectors, &settings.timeouts);
        page.open(&settings.site_url).await?;
        let resolution = page
            .apply_filters(&params.search_phrase, &window, &params.news_categories)
            .await?;

        self.params
            .publish_valid_categories(&resolution.valid)
            .map_err(collaborator_error)?;

        page.load_all_results().await;
        let scanned = page.scan_articles().await?;
        let scanned_count = scanned.len();

        let builder = ArticleRecordBuilder::new(
            DateNormalizer::with_clock(self.clock.clone()),
            RunContext {
                term: params.search_phrase.clone(),
                window,
                output_dir: settings.output_dir.clone(),
            },
        );
        let mut records = Vec::with_capacity(scanned_count);
        for raw in scanned {
            if let Some(record) = builder.build(raw, &self.images).await {
                records.push(record);
            }
        }
        let admitted = records.len();

        let records = filter_by_window(records, &window);
        let table = ExportTable::from_records(&records);
        self.sink
            .persist(&table, &settings.export_path)
            .map_err(|err| TidingsError::Export(format!("{err:#}")))?;

        let summary = RunSummary {
            scanned: scanned_count,
            admitted,
            exported: table.len(),
            valid_categories: resolution.valid,
            export_path: settings.export_path.clone(),
        };
        info!(
            scanned = summary.scanned,
            admitted = summary.admitted,
            exported = summary.exported,
            path = %summary.export_path.display(),
            "pipeline.finished"
        );
        Ok(summary)
    }
}

/// Keep IO and JSON failures in their own variants; everything else is a
/// driver failure.
fn collaborator_error(err: anyhow::Error) -> TidingsError {
    let err = match err.downcast::<std::io::Error>() {
        Ok(io) => return TidingsError::Io(io),
        Err(err) => err,
    };
    match err.downcast::<serde_json::Error>() {
        Ok(json) => TidingsError::Serialization(json),
        Err(err) => TidingsError::Driver(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn collaborator_errors_keep_their_kind() {
        let io: std::io::Result<()> = Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = collaborator_error(io.context("reading work item").unwrap_err());
        assert!(matches!(err, TidingsError::Io(_)));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            collaborator_error(anyhow::Error::from(json)),
            TidingsError::Serialization(_)
        ));

        assert!(matches!(
            collaborator_error(anyhow::anyhow!("session lost")),
            TidingsError::Driver(_)
        ));
    }
}
