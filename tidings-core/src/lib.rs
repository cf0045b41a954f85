//! Extraction and normalisation core.
//!
//! Everything in this crate is a pure transformation of data handed to it:
//!
//! - [`dates`]: raw listing date text → canonical `MM/DD/YYYY`
//! - [`window`]: month count → inclusive [`window::SearchWindow`]
//! - [`categories`]: requested vs. offered topic filters → activation plan
//! - [`record`]: scraped fields → [`record::ArticleRecord`] with derived flags
//! - [`filter`]: defensive second window pass over all records
//! - [`table`]: records → column-oriented [`table::ExportTable`]
//!
//! The browser, image download, work item and export sink are reached only
//! through the capability traits in [`traits`].
pub mod categories;
pub mod dates;
pub mod filter;
pub mod params;
pub mod record;
pub mod table;
pub mod traits;
pub mod window;

pub use categories::{resolve, CategoryResolution, CategorySelection};
pub use dates::{Clock, DateNormalizer, FixedClock, SystemClock};
pub use filter::filter_by_window;
pub use params::SearchParameters;
pub use record::{ArticleRecord, ArticleRecordBuilder, RawArticleFields, RunContext};
pub use table::{Cell, ExportTable, FIELDS};
pub use traits::{BrowserInterface, ExportSink, ImageFetch, Key, ParameterSource};
pub use window::SearchWindow;
