use std::fmt;

use anyhow::{Result, bail};

// ---------------------------------------------------------------------------
// CellValue – a single cell of an uploaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a dataframe reader
/// infers from CSV text.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` feature. Strings and nulls have no
    /// numeric reading.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(_) | CellValue::Null => None,
        }
    }
}

// ---------------------------------------------------------------------------
// UploadedTable – the parsed CSV
// ---------------------------------------------------------------------------

/// The full parsed upload: ordered column names and equally wide rows.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedTable {
    /// Column names in file order, disambiguated when the header repeats.
    pub columns: Vec<String>,
    /// Rows in file order; every row has `columns.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl UploadedTable {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The first `n` rows, order preserved.
    pub fn head(&self, n: usize) -> UploadedTable {
        UploadedTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Project the table onto `indices`, in the order given.
    pub fn select(&self, indices: &[usize]) -> FeatureMatrix {
        FeatureMatrix {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// All columns in file order, used when the classifier is positional.
    pub fn positional(&self) -> FeatureMatrix {
        FeatureMatrix {
            columns: self.columns.clone(),
            rows: self.rows.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// FeatureMatrix – the reconciled classifier input
// ---------------------------------------------------------------------------

/// Classifier input after reconciliation. Column names are kept for
/// diagnostics only; classifiers consume the rows positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl FeatureMatrix {
    /// Number of feature columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Convert every cell to `f64`, failing on the first cell that has no
    /// numeric reading.
    pub fn to_f64_rows(&self) -> Result<Vec<Vec<f64>>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(row_no, row)| {
                row.iter()
                    .enumerate()
                    .map(|(col_no, cell)| match cell.as_f64() {
                        Some(v) => Ok(v),
                        None => {
                            let col = self.columns.get(col_no).map(String::as_str).unwrap_or("?");
                            bail!("could not convert value '{cell}' in column '{col}' (row {row_no}) to float")
                        }
                    })
                    .collect::<Result<Vec<f64>>>()
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// PredictionTable – per-class probabilities, one row per upload row
// ---------------------------------------------------------------------------

/// Output column names, in classifier class order.
pub const CLASS_COLUMNS: [&str; 3] = [
    "setosa_probability",
    "versicolor_probability",
    "virginica_probability",
];

/// One probability distribution per uploaded row.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionTable {
    pub rows: Vec<[f64; 3]>,
}

impl PredictionTable {
    /// Column names of the table.
    pub fn columns(&self) -> [&'static str; 3] {
        CLASS_COLUMNS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows, order preserved.
    pub fn head(&self, n: usize) -> PredictionTable {
        PredictionTable {
            rows: self.rows.iter().take(n).copied().collect(),
        }
    }
}
