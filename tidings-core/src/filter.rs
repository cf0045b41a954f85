//! Final pass over the assembled records.
//!
//! The results page's own date filter is not reliable, so the complete record
//! set is checked again with the same predicate the builder uses.

use crate::record::ArticleRecord;
use crate::window::SearchWindow;

/// Keep the records dated inside `window`, preserving order.
pub fn filter_by_window(records: Vec<ArticleRecord>, window: &SearchWindow) -> Vec<ArticleRecord> {
    let before = records.len();
    let kept: Vec<ArticleRecord> = records
        .into_iter()
        .filter(|record| window.contains_text(&record.date))
        .collect();

    if kept.len() != before {
        tracing::info!(
            before,
            after = kept.len(),
            start = %window.start_text(),
            end = %window.end_text(),
            "records.range_filtered"
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: &str, title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            date: date.to_string(),
            description: String::new(),
            picture_filename: String::new(),
            contains_money: false,
            phrase_count: 0,
        }
    }

    fn window() -> SearchWindow {
        SearchWindow::months_back(1, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()).unwrap()
    }

    #[test]
    fn keeps_in_range_records_in_order() {
        let records = vec![
            record("05/09/2024", "a"),
            record("04/30/2024", "b"),
            record("05/01/2024", "c"),
            record("not a date", "d"),
            record("05/10/2024", "e"),
        ];
        let kept = filter_by_window(records, &window());
        let titles: Vec<_> = kept.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c", "e"]);
    }

    #[test]
    fn applying_twice_equals_applying_once() {
        let records = vec![
            record("05/03/2024", "a"),
            record("12/25/2023", "b"),
            record("05/10/2024", "c"),
        ];
        let once = filter_by_window(records, &window());
        let twice = filter_by_window(once.clone(), &window());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(filter_by_window(Vec::new(), &window()).is_empty());
    }
}
