use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::{Error, Result};

/// A table of named numeric rows under one header row, serialized as comma-separated text.
///
/// The first column of the header holds the header label and the first column of every other
/// row holds the row name. One row per line.
///
/// # Examples
///
/// ```
/// use threshold_bench::ResultTable;
///
/// let mut table = ResultTable::new("ThreadCount", 1..=3);
/// table.push_row("SlottedAvg", [10.5, 6.25, 5.0]);
///
/// assert_eq!(table.to_string(), "ThreadCount,1,2,3\nSlottedAvg,10.5,6.25,5\n");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ResultTable {
    header_label: String,
    columns: Vec<String>,
    rows: Vec<(String, Vec<f64>)>,
}

impl ResultTable {
    /// Creates a table with the given header label and column labels, and no rows.
    pub fn new<C: ToString>(
        header_label: impl Into<String>,
        columns: impl IntoIterator<Item = C>,
    ) -> Self {
        Self {
            header_label: header_label.into(),
            columns: columns.into_iter().map(|column| column.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a named row of values.
    pub fn push_row(&mut self, name: impl Into<String>, values: impl IntoIterator<Item = f64>) {
        self.rows.push((name.into(), values.into_iter().collect()));
    }

    /// The column labels, excluding the header label.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Looks up the values of the row with the given name.
    #[must_use]
    pub fn row(&self, name: &str) -> Option<&[f64]> {
        self.rows
            .iter()
            .find(|(row_name, _)| row_name == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterates over the rows as `(name, values)` pairs, in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.rows
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Writes the table as comma-separated text.
    ///
    /// # Errors
    ///
    /// Returns any error reported by `out`.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{self}")
    }

    /// Writes the table to the file at `path`, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be created or written.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut out = BufWriter::new(File::create(path).map_err(io_error)?);

        self.write_to(&mut out).map_err(io_error)?;
        out.flush().map_err(io_error)
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header_label)?;
        for column in &self.columns {
            write!(f, ",{column}")?;
        }
        writeln!(f)?;

        for (name, values) in &self.rows {
            f.write_str(name)?;
            for value in values {
                write!(f, ",{value}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
