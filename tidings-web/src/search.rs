//! Page object for the search results feed.
//!
//! Composes over any [`BrowserInterface`]; every selector comes from
//! [`tidings_config::Selectors`].

use anyhow::Result;
use tidings_config::{Selectors, Timeouts};
use tidings_core::categories::{resolve, CategoryResolution, CategorySelection};
use tidings_core::record::RawArticleFields;
use tidings_core::traits::{BrowserInterface, Key};
use tidings_core::window::SearchWindow;
use tracing::{debug, info, warn};

/// Drives one search results page.
pub struct SearchResultsPage<'a, B: BrowserInterface> {
    browser: &'a mut B,
    selectors: &'a Selectors,
    timeouts: &'a Timeouts,
}

impl<'a, B: BrowserInterface> SearchResultsPage<'a, B> {
    pub fn new(browser: &'a mut B, selectors: &'a Selectors, timeouts: &'a Timeouts) -> Self {
        Self {
            browser,
            selectors,
            timeouts,
        }
    }

    pub async fn open(&mut self, url: &str) -> Result<()> {
        info!(%url, "search.open");
        self.browser.open(url).await
    }

    /// Accept the terms-update and cookie banners when they show up.
    /// Neither is required; a banner that never appears is logged and skipped.
    pub async fn close_modals(&self) {
        let banners = [
            ("terms", &self.selectors.terms_acceptance, self.timeouts.terms_modal()),
            ("cookies", &self.selectors.cookies_acceptance, self.timeouts.cookies_modal()),
        ];
        for (banner, selector, timeout) in banners {
            match self.browser.click_when_clickable(selector, timeout).await {
                Ok(()) => debug!(banner, "search.modal_closed"),
                Err(err) => info!(banner, error = %err, "search.modal_not_closed"),
            }
        }
    }

    /// Run the search and narrow it to `window` and to whichever of
    /// `requested` the multiselect offers. Returns the resolution so the
    /// caller can publish the confirmed labels.
    pub async fn apply_filters(
        &self,
        phrase: &str,
        window: &SearchWindow,
        requested: &[String],
    ) -> Result<CategoryResolution> {
        let s = self.selectors;
        let click = self.timeouts.click();

        self.close_modals().await;

        self.browser.click_when_clickable(&s.magnifier_button, click).await?;
        self.browser.input_text(&s.search_input, phrase).await?;
        self.browser.click_when_clickable(&s.go_button, click).await?;

        self.browser.click_when_clickable(&s.date_range_button, click).await?;
        self.browser.click_when_clickable(&s.specific_dates_button, click).await?;
        self.browser
            .input_text(&s.start_date_input, &window.start_text())
            .await?;
        self.browser
            .input_text(&s.end_date_input, &window.end_text())
            .await?;
        self.browser.press_key(&s.end_date_input, Key::Enter).await?;

        self.browser.click_when_clickable(&s.multiselect_button, click).await?;
        let available = self.available_categories().await?;
        let resolution = resolve(requested, &available);
        self.activate(&resolution.selection).await?;
        self.browser.click_when_clickable(&s.multiselect_button, click).await?;

        info!(
            %phrase,
            start = %window.start_text(),
            end = %window.end_text(),
            categories = ?resolution.selection.labels(),
            "search.filters_applied"
        );
        Ok(resolution)
    }

    /// Labels of every category the multiselect offers, counters included.
    /// The multiselect must be open.
    pub async fn available_categories(&self) -> Result<Vec<String>> {
        let elements = self.browser.find_all(&self.selectors.categories).await?;
        let mut labels = Vec::with_capacity(elements.len());
        for element in &elements {
            labels.push(self.browser.read_text(element).await?);
        }
        debug!(count = labels.len(), "search.categories_listed");
        Ok(labels)
    }

    /// Tick `category` unless it already is.
    pub async fn activate_category(&self, category: &str) -> Result<()> {
        let selector = self.selectors.category_checkbox_for(category);
        let checked = match self.browser.find_one(&selector, None).await? {
            Some(checkbox) => self.browser.read_attribute(&checkbox, "checked").await?,
            None => None,
        };
        if checked.as_deref() == Some("true") {
            debug!(%category, "search.category_already_active");
            return Ok(());
        }
        self.browser
            .click_when_clickable(&selector, self.timeouts.click())
            .await?;
        debug!(%category, "search.category_activated");
        Ok(())
    }

    pub async fn activate(&self, selection: &CategorySelection) -> Result<()> {
        for category in selection.labels() {
            self.activate_category(category).await?;
        }
        Ok(())
    }

    /// Click "show more" until it stops responding. Returns the click count.
    pub async fn load_all_results(&self) -> usize {
        let mut clicks = 0usize;
        while self
            .browser
            .click_when_clickable(&self.selectors.show_more_button, self.timeouts.show_more())
            .await
            .is_ok()
        {
            clicks += 1;
        }
        info!(clicks, "search.results_loaded");
        clicks
    }

    /// Raw fields of every listed article, in page order.
    ///
    /// Only listing the article roots can fail. A field that cannot be read
    /// comes back as an empty string.
    pub async fn scan_articles(&self) -> Result<Vec<RawArticleFields>> {
        let s = self.selectors;
        let roots = self.browser.find_all(&s.article_root).await?;
        let mut articles = Vec::with_capacity(roots.len());

        for root in &roots {
            let date_text = self.text_under(root, &s.article_date).await;
            let title = self.text_under(root, &s.article_title).await;
            let description = self.text_under(root, &s.article_description).await;
            let image_url = self.image_under(root, &s.article_image).await;
            articles.push(RawArticleFields {
                date_text,
                title,
                description,
                image_url,
            });
        }

        info!(count = articles.len(), "search.articles_scanned");
        Ok(articles)
    }

    async fn text_under(&self, root: &B::Element, selector: &str) -> String {
        let read: Result<String> = match self.browser.find_one(selector, Some(root)).await {
            Ok(Some(node)) => self.browser.read_text(&node).await,
            Ok(None) => Ok(String::new()),
            Err(err) => Err(err),
        };
        read.unwrap_or_else(|err| {
            warn!(%selector, error = %err, "search.field_unreadable");
            String::new()
        })
    }

    async fn image_under(&self, root: &B::Element, selector: &str) -> String {
        let read: Result<Option<String>> = match self.browser.find_one(selector, Some(root)).await {
            Ok(Some(img)) => self.browser.read_attribute(&img, "src").await,
            Ok(None) => Ok(None),
            Err(err) => Err(err),
        };
        read.map(Option::unwrap_or_default).unwrap_or_else(|err| {
            warn!(%selector, error = %err, "search.field_unreadable");
            String::new()
        })
    }
}
