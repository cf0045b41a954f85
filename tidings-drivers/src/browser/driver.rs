use crate::browser::{behavioral::BehavioralEngine, page::TidingsPage};
use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use webdriver::capabilities::Capabilities;

const CHROME_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-dev-shm-usage",
    "--no-sandbox",
    "--disable-extensions",
    "--window-size=1440,900",
    "--lang=en-US",
];

/// Thin wrapper around a `fantoccini` WebDriver client.
pub struct TidingsDriver {
    pub client: Client,
    pub behavioral_engine: BehavioralEngine,
}

impl TidingsDriver {
    /// Connect to a running WebDriver service (e.g. Chromedriver on
    /// `http://localhost:9515`).
    pub async fn new(webdriver_url: &str, headless: bool) -> Result<Self> {
        let mut caps = Capabilities::new();
        let mut args: Vec<String> = CHROME_ARGS.iter().map(|arg| arg.to_string()).collect();
        if headless {
            args.push("--headless=new".to_string());
            args.push("--disable-gpu".to_string());
        }
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await
            .with_context(|| format!("failed to connect to WebDriver at {webdriver_url}"))?;

        tracing::info!(target: "browser.driver", %webdriver_url, headless, "webdriver.connected");

        Ok(Self {
            client,
            behavioral_engine: BehavioralEngine::new(),
        })
    }

    /// A page handle bound to this session. Navigation happens through
    /// [`tidings_core::BrowserInterface::open`].
    pub fn page(&self) -> TidingsPage {
        TidingsPage::new(self.client.clone(), self.behavioral_engine.clone())
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
