//! In-memory CSV table with alias-based column lookup.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use ct_core::Real;

use crate::error::{TablesError, TablesResult};

/// Index of a resolved column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column(usize);

#[derive(Debug, Clone)]
pub struct Table {
    path: PathBuf,
    index: HashMap<String, usize>,
    rows: Vec<csv::StringRecord>,
}

impl Table {
    pub fn from_path(path: &Path) -> TablesResult<Self> {
        if !path.exists() {
            return Err(TablesError::Missing {
                path: path.to_path_buf(),
            });
        }
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|source| TablesError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_csv(reader, path)
    }

    pub fn from_reader<R: io::Read>(reader: R, label: &Path) -> TablesResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        Self::from_csv(reader, label)
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>, path: &Path) -> TablesResult<Self> {
        let csv_err = |source| TablesError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut index = HashMap::new();
        for (i, name) in reader.headers().map_err(csv_err)?.iter().enumerate() {
            // A repeated header keeps its first column.
            index.entry(name.trim_start_matches('\u{feff}').to_string()).or_insert(i);
        }
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_err)?;
        Ok(Self {
            path: path.to_path_buf(),
            index,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// First alias present in the header.
    pub fn resolve(&self, aliases: &[&str]) -> Option<Column> {
        aliases
            .iter()
            .find_map(|name| self.index.get(*name).copied().map(Column))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|record| Row { record })
    }

    pub fn row(&self, i: usize) -> Option<Row<'_>> {
        self.rows.get(i).map(|record| Row { record })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    record: &'a csv::StringRecord,
}

impl<'a> Row<'a> {
    /// Non-empty cell text. Pandas-style `nan` cells count as empty.
    pub fn text(&self, column: Option<Column>) -> Option<&'a str> {
        let Column(i) = column?;
        self.record
            .get(i)
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("nan"))
    }

    /// Numeric cell; unparseable text reads as absent.
    pub fn number(&self, column: Option<Column>) -> Option<Real> {
        self.text(column)?
            .parse::<Real>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Boolean cell. Absent or unrecognised values read as `false`.
    pub fn flag(&self, column: Option<Column>) -> bool {
        let Some(v) = self.text(column) else {
            return false;
        };
        match v.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "x" => true,
            "false" | "f" | "no" | "n" => false,
            other => other.parse::<Real>().is_ok_and(|n| n != 0.0),
        }
    }
}
