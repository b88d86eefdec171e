use std::fmt;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    CustomerDataset, CustomerRecord, AGE, BALANCE, CREDIT_SCORE, ESTIMATED_SALARY, EXITED,
    GENDER, GEOGRAPHY, IS_ACTIVE_MEMBER, NUM_OF_PRODUCTS, REQUIRED_COLUMNS, TENURE,
};
use crate::error::{DashboardError, Result};

/// Cell spellings treated as a missing value (the pandas defaults that occur in practice).
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a customer dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one customer per line (recommended)
/// * `.json`    – `[{ "Geography": "France", "Age": 42, ... }, ...]`
/// * `.parquet` – flat columns named like the CSV header
///
/// Rows holding a missing or infinite value in any column are dropped whole.
pub fn load_file(path: &Path) -> Result<CustomerDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DashboardError::unavailable(
            path,
            format!("unsupported file extension: .{other}"),
        )),
    }?;

    log::info!(
        "Loaded {} customers from {} ({} rows dropped)",
        dataset.len(),
        path.display(),
        dataset.dropped_rows
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row cleaning shared by every format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RejectKind {
    Missing,
    Infinite,
    Unparseable,
}

/// Why a row was dropped: the first offending column.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rejection {
    column: String,
    kind: RejectKind,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            RejectKind::Missing => "missing",
            RejectKind::Infinite => "infinite",
            RejectKind::Unparseable => "unparseable",
        };
        write!(f, "{what} value in '{}'", self.column)
    }
}

/// Maps required columns to their position in the source header and
/// turns raw cells into records.
struct RowCleaner {
    columns: Vec<String>,
    /// Position of each entry of `REQUIRED_COLUMNS`.
    positions: [usize; REQUIRED_COLUMNS.len()],
    records: Vec<CustomerRecord>,
    dropped: usize,
}

impl RowCleaner {
    fn new(path: &Path, columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(DashboardError::unavailable(path, "no header row"));
        }

        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            match columns.iter().position(|c| c == name) {
                Some(i) => *slot = i,
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(DashboardError::SchemaMismatch {
                path: path.to_path_buf(),
                missing,
            });
        }

        Ok(Self {
            columns,
            positions,
            records: Vec::new(),
            dropped: 0,
        })
    }

    /// Feed one row of cells, aligned with `columns`; `None` is a null cell.
    fn push<S: AsRef<str>>(&mut self, row_no: usize, cells: &[Option<S>]) {
        match self.parse(cells) {
            Ok(record) => self.records.push(record),
            Err(rejection) => {
                log::debug!("Dropping row {row_no}: {rejection}");
                self.dropped += 1;
            }
        }
    }

    fn finish(self) -> CustomerDataset {
        CustomerDataset::from_records(self.records, self.dropped)
    }

    fn parse<S: AsRef<str>>(&self, cells: &[Option<S>]) -> std::result::Result<CustomerRecord, Rejection> {
        // Any missing cell rejects the row, required or not.
        for (i, column) in self.columns.iter().enumerate() {
            let cell = cells.get(i).and_then(|c| c.as_ref()).map(|c| c.as_ref().trim());
            match cell {
                None => return Err(reject(column, RejectKind::Missing)),
                Some(s) if MISSING_TOKENS.contains(&s) => {
                    return Err(reject(column, RejectKind::Missing));
                }
                Some(s) if is_infinite(s) => {
                    return Err(reject(column, RejectKind::Infinite));
                }
                Some(_) => {}
            }
        }

        let [geography, age, credit_score, tenure, balance, products, salary, gender, active, exited] =
            self.positions.map(|i| {
                cells
                    .get(i)
                    .and_then(|c| c.as_ref())
                    .map(|c| c.as_ref().trim())
                    .unwrap_or("")
            });

        Ok(CustomerRecord {
            geography: geography.to_string(),
            gender: gender.to_string(),
            age: parse_int(AGE, age)?,
            credit_score: parse_int(CREDIT_SCORE, credit_score)?,
            tenure: parse_float(TENURE, tenure)?,
            balance: parse_float(BALANCE, balance)?,
            num_of_products: parse_int(NUM_OF_PRODUCTS, products)?,
            estimated_salary: parse_float(ESTIMATED_SALARY, salary)?,
            is_active_member: parse_flag(IS_ACTIVE_MEMBER, active)?,
            exited: parse_flag(EXITED, exited)?,
        })
    }
}

fn reject(column: &str, kind: RejectKind) -> Rejection {
    Rejection {
        column: column.to_string(),
        kind,
    }
}

/// Any spelling `f64` parses to an infinity, overflowing literals such as `1e999` included.
fn is_infinite(s: &str) -> bool {
    s.parse::<f64>().is_ok_and(f64::is_infinite)
}

fn parse_float(column: &str, s: &str) -> std::result::Result<f64, Rejection> {
    let v = s
        .parse::<f64>()
        .map_err(|_| reject(column, RejectKind::Unparseable))?;
    if v.is_nan() {
        return Err(reject(column, RejectKind::Missing));
    }
    if v.is_infinite() {
        return Err(reject(column, RejectKind::Infinite));
    }
    Ok(v)
}

/// Integers also arrive as integral floats (`42.0`) from pandas exports.
fn parse_int(column: &str, s: &str) -> std::result::Result<i64, Rejection> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    let v = parse_float(column, s)?;
    if v.fract() != 0.0 || v.abs() > i64::MAX as f64 {
        return Err(reject(column, RejectKind::Unparseable));
    }
    Ok(v as i64)
}

fn parse_flag(column: &str, s: &str) -> std::result::Result<bool, Rejection> {
    if s.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    match parse_int(column, s)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(reject(column, RejectKind::Unparseable)),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Short rows are padded with missing cells and dropped by the cleaner;
/// a row longer than the header is a structural error.
fn load_csv(path: &Path) -> Result<CustomerDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| DashboardError::unavailable(path, e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DashboardError::unavailable(path, format!("reading header: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let headers = if headers.iter().all(String::is_empty) {
        Vec::new()
    } else {
        headers
    };

    let width = headers.len();
    let mut cleaner = RowCleaner::new(path, headers)?;

    for (row_no, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| DashboardError::unavailable(path, format!("CSV row {row_no}: {e}")))?;
        if record.len() > width {
            return Err(DashboardError::unavailable(
                path,
                format!("CSV row {row_no}: {} fields, header has {width}", record.len()),
            ));
        }
        let cells: Vec<Option<&str>> = record.iter().map(Some).collect();
        cleaner.push(row_no, &cells);
    }

    Ok(cleaner.finish())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Geography": "France", "Age": 42, "CreditScore": 619, "Exited": 1, ... },
///   ...
/// ]
/// ```
///
/// The column set is the union of keys over all objects; a key absent
/// from one object is a missing cell for that row.
fn load_json(path: &Path) -> Result<CustomerDataset> {
    let text = std::fs::read_to_string(path).map_err(|e| DashboardError::unavailable(path, e))?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| DashboardError::unavailable(path, format!("parsing JSON: {e}")))?;

    let rows = root
        .as_array()
        .ok_or_else(|| DashboardError::unavailable(path, "expected top-level JSON array"))?;

    let mut objects = Vec::with_capacity(rows.len());
    let mut columns: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| {
            DashboardError::unavailable(path, format!("row {i} is not a JSON object"))
        })?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let mut cleaner = RowCleaner::new(path, columns.clone())?;
    for (row_no, obj) in objects.into_iter().enumerate() {
        let cells: Vec<Option<String>> = columns
            .iter()
            .map(|c| obj.get(c).and_then(json_to_cell))
            .collect();
        cleaner.push(row_no, &cells);
    }

    Ok(cleaner.finish())
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per CSV header entry.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); nulls and NaN are missing cells.
fn load_parquet(path: &Path) -> Result<CustomerDataset> {
    let file = std::fs::File::open(path).map_err(|e| DashboardError::unavailable(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DashboardError::unavailable(path, format!("reading parquet metadata: {e}")))?;

    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let mut cleaner = RowCleaner::new(path, columns)?;

    let reader = builder
        .build()
        .map_err(|e| DashboardError::unavailable(path, format!("building parquet reader: {e}")))?;

    let mut row_no = 0usize;
    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| DashboardError::unavailable(path, format!("reading record batch: {e}")))?;

        for row in 0..batch.num_rows() {
            let cells: Vec<Option<String>> = batch
                .columns()
                .iter()
                .map(|col| {
                    if col.is_null(row) {
                        None
                    } else {
                        array_value_to_string(col, row).ok()
                    }
                })
                .collect();
            cleaner.push(row_no, &cells);
            row_no += 1;
        }
    }

    Ok(cleaner.finish())
}
