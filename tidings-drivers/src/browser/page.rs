use crate::browser::behavioral::BehavioralEngine;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use fantoccini::{elements::Element, key::Key as WdKey, Client, Locator};
use std::time::Duration;
use tidings_core::traits::{BrowserInterface, Key};
use tokio::time::{sleep, Instant};
use tracing::debug;

const CLICK_POLL: Duration = Duration::from_millis(250);
const INPUT_WAIT: Duration = Duration::from_secs(10);

/// Split an opaque selector into a WebDriver locator.
///
/// `css:` and `xpath:` prefixes pick the strategy explicitly; otherwise a
/// leading `/` or `(` means XPath and anything else is CSS.
pub fn locator(selector: &str) -> Locator<'_> {
    if let Some(css) = selector.strip_prefix("css:") {
        Locator::Css(css)
    } else if let Some(xpath) = selector.strip_prefix("xpath:") {
        Locator::XPath(xpath)
    } else if selector.starts_with('/') || selector.starts_with('(') {
        Locator::XPath(selector)
    } else {
        Locator::Css(selector)
    }
}

/// Page wrapper implementing [`BrowserInterface`] over a WebDriver session.
pub struct TidingsPage {
    pub(crate) client: Client,
    pub(crate) behavioral_engine: BehavioralEngine,
}

impl TidingsPage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(client: Client, behavioral_engine: BehavioralEngine) -> Self {
        Self {
            client,
            behavioral_engine,
        }
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<Element> {
        self.client
            .wait()
            .at_most(timeout)
            .every(CLICK_POLL)
            .for_element(locator(selector))
            .await
            .map_err(|e| anyhow!("`{selector}` did not appear within {timeout:?}: {e}"))
    }
}

#[derive(Clone)]
/// DOM element handle returned by [`TidingsPage`].
pub struct TidingsElement {
    pub element: Element,
}

#[async_trait]
impl BrowserInterface for TidingsPage {
    type Element = TidingsElement;

    async fn open(&mut self, url: &str) -> Result<()> {
        self.behavioral_engine.random_delay(300, 1200).await;
        self.client.goto(url).await?;
        debug!(target: "browser.page", %url, "page.opened");
        Ok(())
    }

    async fn find_one(
        &self,
        selector: &str,
        parent: Option<&TidingsElement>,
    ) -> Result<Option<TidingsElement>> {
        let found = match parent {
            Some(parent) => parent.element.find_all(locator(selector)).await?,
            None => self.client.find_all(locator(selector)).await?,
        };
        Ok(found
            .into_iter()
            .next()
            .map(|element| TidingsElement { element }))
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<TidingsElement>> {
        let elements = self.client.find_all(locator(selector)).await?;
        Ok(elements
            .into_iter()
            .map(|element| TidingsElement { element })
            .collect())
    }

    async fn click_when_clickable(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let element = self.wait_for(selector, remaining).await?;

            let clickable = element.is_displayed().await.unwrap_or(false)
                && element.is_enabled().await.unwrap_or(false);
            if clickable {
                match element.click().await {
                    Ok(()) => {
                        debug!(target: "browser.page", %selector, "element.clicked");
                        return Ok(());
                    }
                    Err(err) if Instant::now() < deadline => {
                        debug!(target: "browser.page", %selector, error = %err, "element.click_retry");
                    }
                    Err(err) => return Err(err.into()),
                }
            }

            if Instant::now() >= deadline {
                return Err(anyhow!("`{selector}` was not clickable within {timeout:?}"));
            }
            sleep(CLICK_POLL).await;
        }
    }

    async fn input_text(&self, selector: &str, text: &str) -> Result<()> {
        let element = self.wait_for(selector, INPUT_WAIT).await?;
        element.clear().await?;
        self.behavioral_engine
            .type_text_human_like(&element, text)
            .await
    }

    async fn read_attribute(&self, element: &TidingsElement, name: &str) -> Result<Option<String>> {
        element
            .element
            .attr(name)
            .await
            .map_err(anyhow::Error::from)
    }

    async fn read_text(&self, element: &TidingsElement) -> Result<String> {
        element.element.text().await.map_err(anyhow::Error::from)
    }

    async fn press_key(&self, selector: &str, key: Key) -> Result<()> {
        let element = self.wait_for(selector, INPUT_WAIT).await?;
        let code: char = match key {
            Key::Enter => WdKey::Enter,
            Key::Tab => WdKey::Tab,
        }
        .into();
        element.send_keys(&code.to_string()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_select_the_strategy() {
        assert!(matches!(locator("css:li.result"), Locator::Css("li.result")));
        assert!(matches!(
            locator("xpath://label[contains(., 'Arts')]"),
            Locator::XPath("//label[contains(., 'Arts')]")
        ));
    }

    #[test]
    fn unprefixed_selectors_are_sniffed() {
        assert!(matches!(locator("//div/h4"), Locator::XPath("//div/h4")));
        assert!(matches!(locator("(//li)[1]"), Locator::XPath("(//li)[1]")));
        assert!(matches!(locator("button.show-more"), Locator::Css("button.show-more")));
    }
}
