//! Collaborators around the extraction core and the runner that wires them.
//!
//! - Search results page object over any `BrowserInterface` (`search`)
//! - Thumbnail download into the output directory (`images`)
//! - JSON work item for run variables and the category audit (`workitem`)
//! - xlsx or CSV export of the final table (`export`)
//! - The end-to-end runner (`pipeline`)

pub mod export;
pub mod images;
pub mod pipeline;
pub mod search;
pub mod workitem;

pub use export::{CsvExportSink, FileExportSink, XlsxExportSink};
pub use images::HttpImageFetcher;
pub use pipeline::{Pipeline, PipelineSettings, RunSummary};
pub use search::SearchResultsPage;
pub use workitem::JsonWorkItem;
