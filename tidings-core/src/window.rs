//! The calendar window a listing's date must fall into.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use tidings_common::{Result, TidingsError};

use crate::dates::{parse_canonical, to_canonical};

/// Inclusive `[start_date, end_date]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl SearchWindow {
    /// Window covering `months_back` calendar months ending `today`.
    ///
    /// `0` and `1` both mean "the current month".
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tidings_core::window::SearchWindow;
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
    /// let window = SearchWindow::months_back(3, today).unwrap();
    /// assert_eq!(window.start_text(), "03/01/2024");
    /// assert_eq!(window.end_text(), "05/10/2024");
    /// ```
    pub fn months_back(months_back: u32, today: NaiveDate) -> Result<Self> {
        let first_of_month = today.with_day(1).ok_or_else(|| {
            TidingsError::Validation(format!("cannot take the first day of {today}"))
        })?;
        let offset = months_back.saturating_sub(1);
        let start_date = first_of_month
            .checked_sub_months(Months::new(offset))
            .ok_or_else(|| {
                TidingsError::Validation(format!(
                    "months_back={months_back} reaches before the supported calendar range"
                ))
            })?;

        Ok(Self {
            start_date,
            end_date: today,
        })
    }

    /// Like [`SearchWindow::months_back`], validating an untyped parameter first.
    pub fn from_value(months_back: &Value, today: NaiveDate) -> Result<Self> {
        Self::months_back(months_back_from_value(months_back)?, today)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn start_text(&self) -> String {
        to_canonical(self.start_date)
    }

    pub fn end_text(&self) -> String {
        to_canonical(self.end_date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Membership test on canonical date text. Anything that is not
    /// canonical `MM/DD/YYYY` text is outside every window.
    pub fn contains_text(&self, canonical: &str) -> bool {
        parse_canonical(canonical).is_some_and(|date| self.contains(date))
    }
}

/// Accept only non-negative JSON integers.
pub fn months_back_from_value(value: &Value) -> Result<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            TidingsError::Validation(format!(
                "number_of_months must be a non-negative integer, got {value}"
            ))
        })
}
