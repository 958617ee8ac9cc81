//! Spreadsheet-shaped input for the normalizer.

use crate::dataset::Amount;

use super::text::{clean_header, normalize_text};

/// A single non-empty spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

/// A row of cells; `None` marks an absent (blank) cell.
pub type Row = Vec<Option<Cell>>;

impl Cell {
    /// Normalized text of the cell, for use as a map key.
    pub fn to_key(&self) -> String {
        match self {
            Self::Text(text) => normalize_text(text),
            Self::Number(number) => render_number(*number),
        }
    }

    /// The cell as a header: level numbers canonicalized, other text normalized.
    pub fn to_header(&self) -> String {
        clean_header(&self.to_key())
    }

    /// The cell as a stored rate, keeping its source representation.
    pub fn to_amount(&self) -> Amount {
        match self {
            Self::Text(text) => Amount::Text(text.clone()),
            Self::Number(number) => Amount::from_f64(*number),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

fn render_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// Ordered rows of cells. For positional tables row 0 is the header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    rows: Vec<Row>,
}

impl RawTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row and data rows, or `None` when the table has no data rows.
    pub(crate) fn split_header(&self) -> Option<(&Row, &[Row])> {
        match self.rows.split_first() {
            Some((header, data)) if !data.is_empty() => Some((header, data)),
            _ => None,
        }
    }
}

impl<C: Into<Cell>> FromIterator<Vec<Option<C>>> for RawTable {
    fn from_iter<I: IntoIterator<Item = Vec<Option<C>>>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|row| row.into_iter().map(|cell| cell.map(Into::into)).collect())
                .collect(),
        )
    }
}

/// Normalized key at `column`, or `None` when the cell is absent or blank.
pub(crate) fn key_at(row: &Row, column: usize) -> Option<String> {
    row.get(column)?
        .as_ref()
        .map(Cell::to_key)
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_cells_render_as_keys() {
        assert_eq!(Cell::from(3.0).to_key(), "3");
        assert_eq!(Cell::from(2.5).to_key(), "2.5");
        assert_eq!(Cell::from(7_i64).to_header(), "سطح 7");
    }

    #[test]
    fn test_key_at_skips_blank() {
        let row: Row = vec![Some(Cell::from("   ")), None, Some(Cell::from(" علوم "))];
        assert_eq!(key_at(&row, 0), None);
        assert_eq!(key_at(&row, 1), None);
        assert_eq!(key_at(&row, 2), Some("علوم".to_string()));
        assert_eq!(key_at(&row, 9), None);
    }

    #[test]
    fn test_split_header_requires_data_rows() {
        let header_only: RawTable = vec![vec![Some("a"), Some("b")]].into_iter().collect();
        assert!(header_only.split_header().is_none());
        assert!(RawTable::default().split_header().is_none());
    }
}
