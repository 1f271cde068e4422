use anyhow::{Context, Result};

use super::table::PredictionTable;

/// File name offered for the full prediction table.
pub const PREDICTION_FILE_NAME: &str = "prediction.csv";

/// Media type of the download payload.
pub const PREDICTION_MIME: &str = "text/csv";

/// A complete, ready-to-save encoding of a [`PredictionTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: &'static str,
    /// Media type of `bytes`. The desktop save dialog has no media types,
    /// so it maps to the `.csv` filter and is logged when the file is saved.
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn from_predictions(table: &PredictionTable) -> Result<Self> {
        Ok(Self {
            file_name: PREDICTION_FILE_NAME,
            mime: PREDICTION_MIME,
            bytes: to_csv_bytes(table)?,
        })
    }
}

/// Encode the whole table as header-having, comma-delimited UTF-8 CSV.
///
/// Values use the shortest decimal form that parses back to the same `f64`.
pub fn to_csv_bytes(table: &PredictionTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .context("writing CSV header")?;
    for (row_no, row) in table.rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(|&v| decimal(v)))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer.into_inner().context("flushing CSV output")
}

/// Decimal text for a probability; integral values keep a `.0` so they read
/// back as floats.
fn decimal(v: f64) -> String {
    let s = v.to_string();
    if v.is_finite() && !s.contains('.') {
        format!("{s}.0")
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::table::{CLASS_COLUMNS, CellValue};

    fn predictions() -> PredictionTable {
        PredictionTable {
            rows: vec![
                [0.9812, 0.0187, 0.0001],
                [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0],
                [2.5e-7, 0.1, 0.89999975],
            ],
        }
    }

    #[test]
    fn header_is_fixed() {
        let bytes = to_csv_bytes(&PredictionTable { rows: vec![] }).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "setosa_probability,versicolor_probability,virginica_probability\n"
        );
    }

    #[test]
    fn export_parses_back_to_the_same_table() {
        let table = predictions();
        let bytes = to_csv_bytes(&table).unwrap();
        let parsed = parse_csv(bytes.as_slice()).unwrap();

        assert_eq!(parsed.columns, CLASS_COLUMNS.to_vec());
        assert_eq!(parsed.len(), table.len());
        for (got, want) in parsed.rows.iter().zip(&table.rows) {
            for (cell, &v) in got.iter().zip(want) {
                match cell {
                    CellValue::Float(f) => assert_eq!(*f, v),
                    other => panic!("expected float, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn certain_rows_stay_decimal() {
        let table = PredictionTable {
            rows: vec![[1.0, 0.0, 0.0]],
        };
        let text = String::from_utf8(to_csv_bytes(&table).unwrap()).unwrap();
        assert!(text.ends_with("\n1.0,0.0,0.0\n"), "{text}");
    }

    #[test]
    fn download_carries_name_and_media_type() {
        let d = Download::from_predictions(&predictions()).unwrap();
        assert_eq!(d.file_name, "prediction.csv");
        assert_eq!(d.mime, "text/csv");
        assert_eq!(d.bytes.iter().filter(|&&b| b == b'\n').count(), 4);
    }
}
