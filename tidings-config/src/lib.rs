//! Loader for workspace configuration with YAML + environment overlays.
//!
//! The configuration describes *where* things are: the search site, the
//! WebDriver endpoint, the opaque selectors handed to the browser layer, the
//! output directory and the logging setup. Precedence, lowest first: YAML
//! sources in the order they were added, then `TIDINGS_`-prefixed environment
//! variables (`__` separates nesting levels, e.g. `TIDINGS_OUTPUT__DIRECTORY`).
//! `${VAR}` placeholders in any string are expanded last.
use config::{Config, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tidings_common::TidingsError;
use tidings_common::observability::{LogConfig, LogFormat};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const CATEGORY_PLACEHOLDER: &str = "{category}";

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigLoadError> for TidingsError {
    fn from(err: ConfigLoadError) -> Self {
        TidingsError::Config(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TidingsConfig {
    pub version: Option<String>,
    pub site: SiteConfig,
    #[serde(default)]
    pub webdriver: WebDriverConfig,
    pub selectors: Selectors,
    #[serde(default)]
    pub timeouts: Timeouts,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebDriverConfig {
    #[serde(default = "default_webdriver_url")]
    pub url: String,
    #[serde(default = "default_true")]
    pub headless: bool,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_webdriver_url(),
            headless: true,
        }
    }
}

/// Opaque selectors for the search results page. A `css:` or `xpath:`
/// prefix picks the locator strategy; unprefixed values starting with `/`
/// or `(` are XPath, everything else CSS.
#[derive(Debug, Clone, Deserialize)]
pub struct Selectors {
    pub magnifier_button: String,
    pub search_input: String,
    pub go_button: String,
    pub multiselect_button: String,
    pub date_range_button: String,
    pub specific_dates_button: String,
    pub start_date_input: String,
    pub end_date_input: String,
    pub show_more_button: String,
    /// Every category label inside the open multiselect.
    pub categories: String,
    /// Checkbox for one category; `{category}` is replaced by its label.
    pub category_checkbox: String,
    pub cookies_acceptance: String,
    pub terms_acceptance: String,
    pub article_root: String,
    pub article_date: String,
    pub article_title: String,
    pub article_description: String,
    pub article_image: String,
}

impl Selectors {
    /// Checkbox selector for `category`.
    pub fn category_checkbox_for(&self, category: &str) -> String {
        self.category_checkbox.replace(CATEGORY_PLACEHOLDER, category)
    }
}

/// Click timeouts in milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct Timeouts {
    #[serde(default = "default_click_ms")]
    pub click_ms: u64,
    #[serde(default = "default_terms_ms")]
    pub terms_modal_ms: u64,
    #[serde(default = "default_cookies_ms")]
    pub cookies_modal_ms: u64,
    #[serde(default = "default_show_more_ms")]
    pub show_more_ms: u64,
}

impl Timeouts {
    pub fn click(&self) -> Duration {
        Duration::from_millis(self.click_ms)
    }
    pub fn terms_modal(&self) -> Duration {
        Duration::from_millis(self.terms_modal_ms)
    }
    pub fn cookies_modal(&self) -> Duration {
        Duration::from_millis(self.cookies_modal_ms)
    }
    pub fn show_more(&self) -> Duration {
        Duration::from_millis(self.show_more_ms)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            click_ms: default_click_ms(),
            terms_modal_ms: default_terms_ms(),
            cookies_modal_ms: default_cookies_ms(),
            show_more_ms: default_show_more_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    #[serde(default = "default_export_file")]
    pub export_file: String,
}

impl OutputConfig {
    pub fn export_path(&self) -> PathBuf {
        self.directory.join(&self.export_file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            export_file: default_export_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub stderr: bool,
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            directory: None,
            stderr: true,
            filter: default_filter(),
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            log_dir: self.directory.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
            ..LogConfig::default()
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}
fn default_true() -> bool {
    true
}
fn default_click_ms() -> u64 {
    10_000
}
fn default_terms_ms() -> u64 {
    15_000
}
fn default_cookies_ms() -> u64 {
    10_000
}
fn default_show_more_ms() -> u64 {
    2_000
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}
fn default_export_file() -> String {
    "articles.xlsx".into()
}
fn default_filter() -> String {
    "info".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn validate(config: &TidingsConfig) -> Result<(), ConfigLoadError> {
    if config.site.url.trim().is_empty() {
        return Err(ConfigLoadError::Invalid("site.url must not be empty".into()));
    }
    if !config.selectors.category_checkbox.contains(CATEGORY_PLACEHOLDER) {
        return Err(ConfigLoadError::Invalid(format!(
            "selectors.category_checkbox must contain {CATEGORY_PLACEHOLDER}"
        )));
    }
    if config.output.export_file.trim().is_empty() {
        return Err(ConfigLoadError::Invalid(
            "output.export_file must not be empty".into(),
        ));
    }
    Ok(())
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct TidingsConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for TidingsConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TidingsConfigLoader {
    /// Start with no file sources; `TIDINGS_` env overrides are applied on load.
    pub fn new() -> Self {
        Self::with_env_prefix("TIDINGS")
    }

    /// Use a different environment prefix (tests use this to stay isolated).
    pub fn with_env_prefix(prefix: &str) -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: prefix.to_string(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, for deployments driven by env vars.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use tidings_config::TidingsConfigLoader;
    ///
    /// let cfg = TidingsConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// site:
    ///   url: "https://news.example.com/"
    /// selectors:
    ///   magnifier_button: "css:button[data-testid=search-button]"
    ///   search_input: "css:input[data-testid=search-input]"
    ///   go_button: "css:button[data-testid=search-submit]"
    ///   multiselect_button: "css:div[data-testid=section] button"
    ///   date_range_button: "css:button[data-testid=search-date-dropdown-a]"
    ///   specific_dates_button: "css:button[value=Specific Dates]"
    ///   start_date_input: "css:#startDate"
    ///   end_date_input: "css:#endDate"
    ///   show_more_button: "css:button[data-testid=search-show-more-button]"
    ///   categories: "xpath://div[@data-testid='section']//label"
    ///   category_checkbox: "xpath://label[contains(., '{category}')]/input[@type='checkbox']"
    ///   cookies_acceptance: "css:button[data-testid=GDPR-accept]"
    ///   terms_acceptance: "css:button[data-testid=Accept all-btn]"
    ///   article_root: "css:li[data-testid=search-bodega-result]"
    ///   article_date: "css:span[data-testid=todays-date]"
    ///   article_title: "css:h4"
    ///   article_description: "css:p"
    ///   article_image: "css:img"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.site.url, "https://news.example.com/");
    /// assert_eq!(cfg.output.export_path(), std::path::Path::new("./output/articles.xlsx"));
    /// assert_eq!(cfg.timeouts.show_more().as_millis(), 2000);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    pub fn load(self) -> Result<TidingsConfig, ConfigLoadError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: TidingsConfig = serde_json::from_value(v)
            .map_err(|e| ConfigLoadError::Source(config::ConfigError::Message(e.to_string())))?;
        validate(&typed)?;

        Ok(typed)
    }
}
