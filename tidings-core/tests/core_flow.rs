use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use tidings_core::{
    filter_by_window, resolve, ArticleRecordBuilder, CategorySelection, Cell, DateNormalizer,
    ExportTable, FixedClock, ImageFetch, RawArticleFields, RunContext, SearchWindow, FIELDS,
};

struct NamedAfterUrl;

#[async_trait]
impl ImageFetch for NamedAfterUrl {
    async fn fetch(&self, url: &str, _dest_dir: &Path) -> Result<String> {
        Ok(url.rsplit('/').next().unwrap_or_default().to_string())
    }
}

fn raw(date: &str, title: &str, description: &str, image: &str) -> RawArticleFields {
    RawArticleFields {
        date_text: date.into(),
        title: title.into(),
        description: description.into(),
        image_url: image.into(),
    }
}

#[tokio::test]
async fn scanned_fields_become_an_aligned_export_table() {
    // Just after midnight: "2h ago" belongs to the previous day.
    let now = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 30, 0)
        .unwrap();
    let clock = FixedClock(now);
    let window = SearchWindow::months_back(2, now.date()).unwrap();
    assert_eq!(window.start_text(), "02/01/2024");

    let builder = ArticleRecordBuilder::new(
        DateNormalizer::with_clock(clock),
        RunContext {
            term: "Rates".into(),
            window,
            output_dir: PathBuf::from("out"),
        },
    );

    let scanned = vec![
        raw("2h ago", "Rates rise", "rates, RATES and more rates", "https://cdn/a.jpg"),
        raw("Jan. 31, 2024", "Before the window", "", "https://cdn/skip.jpg"),
        raw("Feb. 14, 2024", "Fund hits $3.5", "Investors paid 200 USD", ""),
        raw("sometime soon", "Undated", "", ""),
    ];

    let mut records = Vec::new();
    for fields in scanned {
        if let Some(record) = builder.build(fields, &NamedAfterUrl).await {
            records.push(record);
        }
    }
    assert_eq!(records.len(), 2);

    let records = filter_by_window(records, &window);
    let table = ExportTable::from_records(&records);

    assert_eq!(table.len(), 2);
    for (name, values) in table.columns() {
        assert!(FIELDS.contains(&name));
        assert_eq!(values.len(), 2, "{name}");
    }

    let first = table.row(0).unwrap();
    assert_eq!(first[0], &Cell::Text("Rates rise".into()));
    assert_eq!(first[1], &Cell::Text("02/29/2024".into()));
    assert_eq!(first[3], &Cell::Text("a.jpg".into()));
    assert_eq!(first[4], &Cell::Flag(false));
    assert_eq!(first[5], &Cell::Count(4));

    let second = table.row(1).unwrap();
    assert_eq!(second[1], &Cell::Text("02/14/2024".into()));
    assert_eq!(second[3], &Cell::Text(String::new()));
    assert_eq!(second[4], &Cell::Flag(true));
    assert_eq!(second[5], &Cell::Count(0));
}

#[test]
fn category_plan_never_mixes_any_with_labels() {
    let available: Vec<String> = ["Any", "Business12", "Opinion 3"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let with_any = resolve(&["Business".into(), "Any".into()], &available);
    assert_eq!(with_any.valid, vec!["Business", "Any"]);
    assert_eq!(with_any.selection, CategorySelection::Any);

    let labels = resolve(&["Opinion".into(), "Business".into()], &available);
    assert_eq!(
        labels.selection,
        CategorySelection::Labels(vec!["Opinion".into(), "Business".into()])
    );
}
