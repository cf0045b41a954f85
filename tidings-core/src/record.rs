//! Turning scraped listing fields into export records.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dates::{Clock, DateNormalizer, SystemClock};
use crate::traits::ImageFetch;
use crate::window::SearchWindow;

static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\$[\d,]+(\.\d{1,2})?)|(\d+\s(dollars|USD))").expect("valid regex")
});

/// Fields as read off one search result. Missing nodes are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawArticleFields {
    pub date_text: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

/// One exported listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    /// Canonical `MM/DD/YYYY` text.
    pub date: String,
    pub description: String,
    pub picture_filename: String,
    pub contains_money: bool,
    pub phrase_count: usize,
}

/// Per-run inputs shared by every record.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub term: String,
    pub window: SearchWindow,
    pub output_dir: PathBuf,
}

/// `true` when `text` mentions an amount like `$1,200.50` or `50 dollars`.
///
/// The worded form is case-sensitive: `50 Dollars` does not count.
pub fn mentions_money(text: &str) -> bool {
    MONEY.is_match(text)
}

/// Case-insensitive, non-overlapping occurrences of `term` in `text`.
/// An empty term never matches.
pub fn count_phrase(text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(&term.to_lowercase()).count()
}

/// Builds [`ArticleRecord`]s and applies the first window check.
pub struct ArticleRecordBuilder<C = SystemClock> {
    normalizer: DateNormalizer<C>,
    context: RunContext,
}

impl<C: Clock> ArticleRecordBuilder<C> {
    pub fn new(normalizer: DateNormalizer<C>, context: RunContext) -> Self {
        Self {
            normalizer,
            context,
        }
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Canonical date of `raw` when it lies inside the window.
    pub fn admit(&self, raw: &RawArticleFields) -> Option<String> {
        let date = self.normalizer.normalize(&raw.date_text);
        if self.context.window.contains_text(&date) {
            Some(date)
        } else {
            debug!(
                raw_date = %raw.date_text,
                normalized = %date,
                title = %raw.title,
                "article.outside_window"
            );
            None
        }
    }

    /// Build the record for `raw`, or `None` when it falls outside the window.
    ///
    /// Out-of-window listings are dropped before the image is requested. A
    /// failed download leaves `picture_filename` empty.
    pub async fn build<F>(&self, raw: RawArticleFields, images: &F) -> Option<ArticleRecord>
    where
        F: ImageFetch + ?Sized,
    {
        let date = self.admit(&raw)?;

        let RawArticleFields {
            title,
            description,
            image_url,
            ..
        } = raw;

        let picture_filename = if image_url.is_empty() {
            String::new()
        } else {
            match images.fetch(&image_url, &self.context.output_dir).await {
                Ok(name) => name,
                Err(err) => {
                    warn!(%image_url, error = %err, "article.image_fetch_failed");
                    String::new()
                }
            }
        };

        let contains_money = mentions_money(&title) || mentions_money(&description);
        let phrase_count =
            count_phrase(&title, &self.context.term) + count_phrase(&description, &self.context.term);

        debug!(%date, %title, contains_money, phrase_count, "article.built");

        Some(ArticleRecord {
            title,
            date,
            description,
            picture_filename,
            contains_money,
            phrase_count,
        })
    }
}
