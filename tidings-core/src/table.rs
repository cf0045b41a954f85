//! Column-oriented view of the records, ready for a spreadsheet-like sink.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::record::ArticleRecord;

/// Export field names, in column order.
pub const FIELDS: [&str; 6] = [
    "title",
    "date",
    "description",
    "picture_filename",
    "contains_money_format_on_title_or_description",
    "count_search_phrases",
];

/// One cell of the export table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Flag(bool),
    Count(usize),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Flag(flag) => write!(f, "{flag}"),
            Cell::Count(count) => write!(f, "{count}"),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(text) => serializer.serialize_str(text),
            Cell::Flag(flag) => serializer.serialize_bool(*flag),
            Cell::Count(count) => serializer.serialize_u64(*count as u64),
        }
    }
}

/// Six parallel, index-aligned columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    columns: [Vec<Cell>; 6],
}

impl ExportTable {
    /// Transpose `records` into columns.
    ///
    /// ```
    /// use tidings_core::table::{ExportTable, FIELDS};
    ///
    /// let table = ExportTable::from_records(&[]);
    /// assert_eq!(table.len(), 0);
    /// assert!(FIELDS.iter().all(|name| table.column(name).is_some_and(|c| c.is_empty())));
    /// ```
    pub fn from_records(records: &[ArticleRecord]) -> Self {
        let mut columns: [Vec<Cell>; 6] = Default::default();
        for column in columns.iter_mut() {
            column.reserve(records.len());
        }
        for record in records {
            let [title, date, description, picture, money, count] = &mut columns;
            title.push(Cell::Text(record.title.clone()));
            date.push(Cell::Text(record.date.clone()));
            description.push(Cell::Text(record.description.clone()));
            picture.push(Cell::Text(record.picture_filename.clone()));
            money.push(Cell::Flag(record.contains_money));
            count.push(Cell::Count(record.phrase_count));
        }
        Self { columns }
    }

    /// Number of records (every column has this length).
    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        FIELDS
            .iter()
            .position(|field| *field == name)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// `(field, values)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, &[Cell])> {
        FIELDS
            .iter()
            .copied()
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Row `index` across all six columns.
    pub fn row(&self, index: usize) -> Option<[&Cell; 6]> {
        if index >= self.len() {
            return None;
        }
        Some(std::array::from_fn(|col| &self.columns[col][index]))
    }

    pub fn rows(&self) -> impl Iterator<Item = [&Cell; 6]> {
        (0..self.len()).filter_map(move |idx| self.row(idx))
    }
}

impl Serialize for ExportTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELDS.len()))?;
        for (name, values) in self.columns() {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> ArticleRecord {
        ArticleRecord {
            title: format!("title {n}"),
            date: format!("05/0{n}/2024"),
            description: format!("description {n}"),
            picture_filename: format!("{n}.jpg"),
            contains_money: n % 2 == 0,
            phrase_count: n,
        }
    }

    #[test]
    fn empty_input_keeps_all_six_fields() {
        let table = ExportTable::from_records(&[]);
        let names: Vec<_> = table.columns().map(|(name, _)| name).collect();
        assert_eq!(names, FIELDS);
        assert!(table.columns().all(|(_, values)| values.is_empty()));
        assert!(table.is_empty());
        assert_eq!(table.rows().count(), 0);
    }

    #[test]
    fn columns_are_index_aligned() {
        let records: Vec<_> = (1..=3).map(record).collect();
        let table = ExportTable::from_records(&records);

        assert_eq!(table.len(), 3);
        assert!(table.columns().all(|(_, values)| values.len() == 3));
        for (i, source) in records.iter().enumerate() {
            let row = table.row(i).unwrap();
            assert_eq!(row[0], &Cell::Text(source.title.clone()));
            assert_eq!(row[1], &Cell::Text(source.date.clone()));
            assert_eq!(row[3], &Cell::Text(source.picture_filename.clone()));
            assert_eq!(row[4], &Cell::Flag(source.contains_money));
            assert_eq!(row[5], &Cell::Count(source.phrase_count));
        }
        assert!(table.row(3).is_none());
    }

    #[test]
    fn serializes_as_field_keyed_map() {
        let table = ExportTable::from_records(&[record(2)]);
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["title"], serde_json::json!(["title 2"]));
        assert_eq!(
            value["contains_money_format_on_title_or_description"],
            serde_json::json!([true])
        );
        assert_eq!(value["count_search_phrases"], serde_json::json!([2]));
        assert_eq!(value.as_object().unwrap().len(), 6);
    }

    #[test]
    fn cells_render_as_plain_text() {
        assert_eq!(Cell::Flag(false).to_string(), "false");
        assert_eq!(Cell::Count(7).to_string(), "7");
        assert_eq!(Cell::Text("x".into()).to_string(), "x");
    }
}
