use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use tidings_config::{ConfigLoadError, TidingsConfigLoader};

const SITE_YAML: &str = r#"
version: "1"
site:
  url: "${TIDINGS_TEST_SITE}"
webdriver:
  headless: false
selectors:
  magnifier_button: "css:button[data-testid=search-button]"
  search_input: "css:input[data-testid=search-input]"
  go_button: "css:button[data-testid=search-submit]"
  multiselect_button: "css:div[data-testid=section] button"
  date_range_button: "css:button[data-testid=search-date-dropdown-a]"
  specific_dates_button: "css:button[value='Specific Dates']"
  start_date_input: "css:#startDate"
  end_date_input: "css:#endDate"
  show_more_button: "css:button[data-testid=search-show-more-button]"
  categories: "xpath://div[@data-testid='section']//label"
  category_checkbox: "xpath://label[contains(., '{category}')]/input[@type='checkbox']"
  cookies_acceptance: "css:button[data-testid=GDPR-accept]"
  terms_acceptance: "css:button[data-testid=expanded-dock-btn-selector]"
  article_root: "css:li[data-testid=search-bodega-result]"
  article_date: "css:span[data-testid=todays-date]"
  article_title: "css:h4"
  article_description: "css:p"
  article_image: "css:img"
timeouts:
  click_ms: 5000
output:
  directory: "./out"
logging:
  format: json
  stderr: false
"#;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_file_with_defaults_and_expansion() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "tidings.yaml", SITE_YAML);

    temp_env::with_var("TIDINGS_TEST_SITE", Some("https://news.example.com/"), || {
        let config = TidingsConfigLoader::with_env_prefix("TIDINGSTEST")
            .with_file(&p)
            .load()
            .expect("load system config");

        assert_eq!(config.version.as_deref(), Some("1"));
        assert_eq!(config.site.url, "https://news.example.com/");
        assert!(!config.webdriver.headless);
        assert_eq!(config.webdriver.url, "http://localhost:9515");
        assert_eq!(config.timeouts.click().as_millis(), 5000);
        assert_eq!(config.timeouts.terms_modal().as_millis(), 15000);
        assert_eq!(config.output.export_path(), PathBuf::from("./out/articles.xlsx"));
        assert!(!config.logging.stderr);
        assert_eq!(
            config.selectors.category_checkbox_for("Arts"),
            "xpath://label[contains(., 'Arts')]/input[@type='checkbox']"
        );
    });
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "tidings.yaml", SITE_YAML);

    temp_env::with_vars(
        [
            ("TIDINGS_TEST_SITE", Some("https://news.example.com/")),
            ("TIDINGSTEST_OUTPUT__DIRECTORY", Some("/srv/tidings")),
            ("TIDINGSTEST_WEBDRIVER__HEADLESS", Some("true")),
        ],
        || {
            let config = TidingsConfigLoader::with_env_prefix("TIDINGSTEST")
                .with_file(&p)
                .load()
                .expect("load system config");

            assert_eq!(config.output.directory, PathBuf::from("/srv/tidings"));
            assert!(config.webdriver.headless);
        },
    );
}

#[test]
#[serial]
fn rejects_checkbox_template_without_placeholder() {
    let yaml = SITE_YAML.replace("'{category}'", "'Sports'");
    let err = TidingsConfigLoader::with_env_prefix("TIDINGSTEST")
        .with_yaml_str(&yaml.replace("${TIDINGS_TEST_SITE}", "https://x.example/"))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Invalid(_)));
}

#[test]
#[serial]
fn missing_optional_file_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let yaml = SITE_YAML.replace("${TIDINGS_TEST_SITE}", "https://x.example/");
    let config = TidingsConfigLoader::with_env_prefix("TIDINGSTEST")
        .with_optional_file(tmp.path().join("absent.yaml"))
        .with_yaml_str(&yaml)
        .load()
        .expect("optional file skipped");
    assert_eq!(config.site.url, "https://x.example/");
}
