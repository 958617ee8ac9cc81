//! Spreadsheet ingest
//!
//! Reads the source workbooks named in [`DatasetConfig`] and assembles the
//! canonical dataset. Each section is optional: a missing workbook leaves its
//! section empty. A workbook that exists but cannot be read aborts the build.

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DatasetConfig;
use crate::dataset::CanonicalDataset;
use crate::normalize::{
    normalize_keyed_table, normalize_location_table, normalize_text, normalize_three_level_table,
    Cell, RawTable, Row,
};

/// Errors that can occur while reading source workbooks.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source directory not found or not a directory.
    #[error("source directory not found: {path}")]
    SourceDirNotFound { path: PathBuf },

    /// Workbook could not be opened or a sheet could not be read.
    #[error("failed to read workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// Workbook has no sheets.
    #[error("workbook has no sheets: {path}")]
    EmptyWorkbook { path: PathBuf },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Raw tables gathered from the sources, before normalization.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub base: Option<RawTable>,
    pub currency: Option<RawTable>,
    pub self_governing: Option<RawTable>,
    /// (degree, [(sheet name, table)])
    pub variable: Vec<(String, Vec<(String, RawTable)>)>,
}

/// Read every configured workbook under `config.source_dir` and normalize it.
pub fn build_dataset(config: &DatasetConfig) -> Result<CanonicalDataset> {
    let tables = read_sources(config)?;
    Ok(assemble_dataset(tables, &config.unit_sheet_prefix))
}

/// Collect raw tables for every configured workbook that exists.
pub fn read_sources(config: &DatasetConfig) -> Result<SourceTables> {
    if !config.source_dir.is_dir() {
        return Err(IngestError::SourceDirNotFound {
            path: config.source_dir.clone(),
        });
    }

    let mut tables = SourceTables {
        base: read_optional_first_sheet(&config.source_path(&config.base_file))?,
        currency: read_optional_first_sheet(&config.source_path(&config.currency_file))?,
        self_governing: read_optional_first_sheet(
            &config.source_path(&config.self_governing_file),
        )?,
        variable: Vec::new(),
    };

    for source in &config.variable {
        let path = config.source_path(&source.file);
        if !path.is_file() {
            warn!(degree = %source.degree, path = %path.display(), "Variable tuition workbook not found, skipping");
            continue;
        }
        tables.variable.push((source.degree.clone(), read_workbook(&path)?));
    }

    Ok(tables)
}

/// Normalize gathered tables into the four dataset sections.
pub fn assemble_dataset(tables: SourceTables, unit_sheet_prefix: &str) -> CanonicalDataset {
    let mut dataset = CanonicalDataset::default();

    if let Some(raw) = &tables.base {
        dataset.base = normalize_keyed_table(raw);
    }
    if let Some(raw) = &tables.currency {
        dataset.currency = normalize_three_level_table(raw);
    }
    if let Some(raw) = &tables.self_governing {
        dataset.self_governing = normalize_location_table(raw);
    }

    for (degree, sheets) in &tables.variable {
        let degree = normalize_text(degree);
        let unit_tables = dataset.variable.entry(degree.clone()).or_default();
        for (sheet_name, raw) in sheets {
            let unit_type = unit_type_name(sheet_name, unit_sheet_prefix);
            if unit_type.is_empty() {
                warn!(degree = %degree, sheet = %sheet_name, "Sheet name has no unit type, skipping");
                continue;
            }
            unit_tables.insert(unit_type, normalize_keyed_table(raw));
        }
    }

    let sizes = dataset.section_sizes();
    info!(
        base = sizes.base,
        variable = sizes.variable,
        currency = sizes.currency,
        self_governing = sizes.self_governing,
        "Assembled tuition dataset"
    );
    dataset
}

/// Unit type named by a variable-tuition sheet: the sheet name without the
/// configured prefix, normalized.
pub fn unit_type_name(sheet_name: &str, prefix: &str) -> String {
    let sheet_name = normalize_text(sheet_name);
    let prefix = normalize_text(prefix);
    let stripped = if prefix.is_empty() {
        sheet_name.as_str()
    } else {
        sheet_name.strip_prefix(&prefix).unwrap_or(&sheet_name)
    };
    normalize_text(stripped)
}

fn read_optional_first_sheet(path: &Path) -> Result<Option<RawTable>> {
    if !path.is_file() {
        warn!(path = %path.display(), "Source workbook not found, section left empty");
        return Ok(None);
    }
    read_first_sheet(path).map(Some)
}

/// First worksheet of a workbook as a raw table.
pub fn read_first_sheet(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).map_err(|source| IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(first) = workbook.sheet_names().first().cloned() else {
        return Err(IngestError::EmptyWorkbook {
            path: path.to_path_buf(),
        });
    };

    let range = workbook
        .worksheet_range(&first)
        .map_err(|source| IngestError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), sheet = %first, rows = range.height(), "Read worksheet");
    Ok(range_to_table(&range))
}

/// Every worksheet of a workbook, in workbook order.
pub fn read_workbook(path: &Path) -> Result<Vec<(String, RawTable)>> {
    let mut workbook = open_workbook_auto(path).map_err(|source| IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| IngestError::Workbook {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), sheet = %name, rows = range.height(), "Read worksheet");
        sheets.push((name, range_to_table(&range)));
    }
    Ok(sheets)
}

fn range_to_table(range: &Range<Data>) -> RawTable {
    RawTable::new(range.rows().map(row_cells).collect())
}

fn row_cells(row: &[Data]) -> Row {
    row.iter().map(data_to_cell).collect()
}

fn data_to_cell(data: &Data) -> Option<Cell> {
    match data {
        Data::Empty => None,
        Data::String(s) => Some(Cell::Text(s.clone())),
        Data::Float(f) => Some(Cell::Number(*f)),
        Data::Int(i) => Some(Cell::Number(*i as f64)),
        other => Some(Cell::Text(other.to_string())),
    }
}
