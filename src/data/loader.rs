use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;

use super::table::{CellValue, UploadedTable};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an uploaded table from a file on disk.
pub fn load_file(path: &Path) -> Result<UploadedTable, ParseError> {
    let file = File::open(path)?;
    parse_csv(BufReader::new(file))
}

/// Whether an upload name carries the `.csv` extension (any case).
pub fn is_csv_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Parse a comma-delimited, UTF-8, header-having CSV stream.
///
/// The first record supplies the column names verbatim (repeated names get a
/// `.N` suffix). Every later record must have the same number of fields.
/// The stream is read once.
pub fn parse_csv<R: Read>(reader: R) -> Result<UploadedTable, ParseError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if raw_headers.is_empty() {
        return Err(ParseError::Empty);
    }
    let columns = dedupe_headers(raw_headers);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    log::debug!("parsed CSV: {} rows x {} columns", rows.len(), columns.len());
    Ok(UploadedTable { columns, rows })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Disambiguate repeated header names: `a, a, a` becomes `a, a.1, a.2`.
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for name in raw {
        let mut candidate = name.clone();
        let mut n = 0;
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{name}.{n}");
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Tokens a dataframe reader treats as missing.
const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

fn guess_cell_type(s: &str) -> CellValue {
    let t = s.trim();
    if NULL_TOKENS.contains(&t) {
        return CellValue::Null;
    }
    if let Ok(i) = t.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        return CellValue::Float(f);
    }
    match t {
        "True" | "true" => CellValue::Bool(true),
        "False" | "false" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}
