//! Table normalization
//!
//! Turns spreadsheet-shaped [`RawTable`]s into the nested maps of the
//! canonical dataset. Every function here is pure: same table in, same map
//! out.
//!
//! Shared rules:
//! - keys go through [`normalize_text`], level headers through [`clean_header`]
//! - a row whose key cell is absent or blank contributes nothing
//! - an absent cell is skipped; a present zero is kept

pub mod table;
pub mod text;

use tracing::debug;

use crate::dataset::{KeyedTable, LevelTable, ThreeLevelTable};

pub use table::{Cell, RawTable, Row};
pub use text::{clean_header, normalize_text, LEVEL_LABEL};

use table::key_at;

/// Output bucket fed by the in-capital price column.
pub const CAPITAL_BUCKET: &str = "تهران";
/// Output bucket fed by the outside-capital price column.
pub const OUTSIDE_CAPITAL_BUCKET: &str = "خارج از تهران";

const CAPITAL_MARKER: &str = "تهران";
const OUTSIDE_CAPITAL_MARKER: &str = "خارج از استان تهران";

/// Positional two-level table: column 0 is the primary key, every other
/// column is keyed by its cleaned header.
///
/// A repeated primary key replaces the earlier row.
pub fn normalize_keyed_table(raw: &RawTable) -> KeyedTable {
    let mut out = KeyedTable::new();
    let Some((header, rows)) = raw.split_header() else {
        return out;
    };

    let headers = clean_headers(header);
    for row in rows {
        let Some(primary) = key_at(row, 0) else {
            continue;
        };
        out.insert(primary, collect_columns(&headers, row, 1));
    }

    debug!(rows = rows.len(), keys = out.len(), "Normalized keyed table");
    out
}

/// Positional three-level table: column 0 is the field group, column 1 the
/// degree, the rest are levels. The result is keyed degree-first.
///
/// Rows sharing a (degree, field group) pair merge their levels.
pub fn normalize_three_level_table(raw: &RawTable) -> ThreeLevelTable {
    let mut out = ThreeLevelTable::new();
    let Some((header, rows)) = raw.split_header() else {
        return out;
    };

    let headers = clean_headers(header);
    for row in rows {
        let (Some(field_group), Some(degree)) = (key_at(row, 0), key_at(row, 1)) else {
            continue;
        };
        out.entry(degree)
            .or_default()
            .entry(field_group)
            .or_default()
            .extend(collect_columns(&headers, row, 2));
    }

    debug!(rows = rows.len(), degrees = out.len(), "Normalized three-level table");
    out
}

/// Location table keyed by column name.
///
/// Column 0 holds the degree. The in-capital column (header mentions the
/// capital but not the outside-province marker) feeds [`CAPITAL_BUCKET`]; the
/// outside-province column feeds [`OUTSIDE_CAPITAL_BUCKET`]. A bucket whose
/// column cannot be found is left out.
pub fn normalize_location_table(raw: &RawTable) -> KeyedTable {
    let mut out = KeyedTable::new();
    let Some((header, rows)) = raw.split_header() else {
        return out;
    };

    let names: Vec<Option<String>> = header
        .iter()
        .map(|cell| cell.as_ref().map(Cell::to_key))
        .collect();
    let find_column = |matches: &dyn Fn(&str) -> bool| {
        names
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, name)| name.as_deref().is_some_and(matches))
            .map(|(index, _)| index)
    };

    let outside = find_column(&|name| name.contains(OUTSIDE_CAPITAL_MARKER));
    let capital =
        find_column(&|name| name.contains(CAPITAL_MARKER) && !name.contains(OUTSIDE_CAPITAL_MARKER));

    let buckets: Vec<(&str, usize)> = [(CAPITAL_BUCKET, capital), (OUTSIDE_CAPITAL_BUCKET, outside)]
        .into_iter()
        .filter_map(|(bucket, column)| column.map(|c| (bucket, c)))
        .collect();

    for (bucket, _) in &buckets {
        out.entry(bucket.to_string()).or_default();
    }

    for row in rows {
        let Some(degree) = key_at(row, 0) else {
            continue;
        };
        for (bucket, column) in &buckets {
            if let Some(Some(cell)) = row.get(*column) {
                out.entry(bucket.to_string())
                    .or_default()
                    .insert(degree.clone(), cell.to_amount());
            }
        }
    }

    debug!(
        rows = rows.len(),
        capital_column = ?capital,
        outside_column = ?outside,
        "Normalized location table"
    );
    out
}

fn clean_headers(header: &Row) -> Vec<Option<String>> {
    header
        .iter()
        .map(|cell| {
            cell.as_ref()
                .map(Cell::to_header)
                .filter(|name| !name.is_empty())
        })
        .collect()
}

/// header → cell for columns `from..headers.len()`, skipping columns whose
/// header or cell is absent.
fn collect_columns(headers: &[Option<String>], row: &Row, from: usize) -> LevelTable {
    headers
        .iter()
        .enumerate()
        .skip(from)
        .filter_map(|(column, header)| {
            let header = header.as_ref()?;
            let cell = row.get(column)?.as_ref()?;
            Some((header.clone(), cell.to_amount()))
        })
        .collect()
}
