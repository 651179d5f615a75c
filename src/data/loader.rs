use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::error::ArrowError;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use serde_json::Value as JsonValue;

use super::model::{AccidentDataset, AccidentRecord, AgeGroup, VehicleType};

pub const CITY_COLUMN: &str = "CITY";
pub const DEAD_COLUMN: &str = "DEAD";

/// Cell spellings read as a missing value: pandas' default `na_values`.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed parquet: {0}")]
    Parquet(#[from] ParquetError),
    #[error("reading arrow batch: {0}")]
    Arrow(#[from] ArrowError),
    #[error("{0}")]
    Malformed(String),
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}, column {column}: invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error("column {column} has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: DataType },
    #[error("dataset contains no records")]
    Empty,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the accident table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one accident per line
/// * `.json`    – `[{ "CITY": ..., "DEAD": ..., ... }, ...]`
/// * `.parquet` – flat columns of string / numeric / boolean type
pub fn load_file(path: &Path) -> Result<AccidentDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => read_csv(open(path)?)?,
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            read_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} accident records ({} cities) from {}",
        dataset.len(),
        dataset.city_totals().len(),
        path.display()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Every column a row must provide, in record order.
fn required_columns() -> impl Iterator<Item = &'static str> {
    [CITY_COLUMN, DEAD_COLUMN]
        .into_iter()
        .chain(VehicleType::ALL.into_iter().map(VehicleType::column))
        .chain(AgeGroup::ALL.into_iter().map(AgeGroup::column))
}

fn finish(records: Vec<AccidentRecord>) -> Result<AccidentDataset, LoadError> {
    if records.is_empty() {
        return Err(LoadError::Empty);
    }
    let cityless = records.iter().filter(|r| r.city.is_none()).count();
    if cityless > 0 {
        log::warn!("{cityless} records have no {CITY_COLUMN} and will not appear in the chart");
    }
    Ok(AccidentDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Cell conversion shared by all formats
// ---------------------------------------------------------------------------

/// `i64` range as floats; the upper bound (2^63) is exclusive.
const I64_LOWER: f64 = i64::MIN as f64;
const I64_UPPER: f64 = i64::MAX as f64;

/// A raw cell before it is interpreted for its column.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Missing,
}

impl Cell {
    fn number(n: f64) -> Self {
        if n.is_nan() {
            Cell::Missing
        } else {
            Cell::Number(n)
        }
    }

    fn into_city(self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Missing => None,
        }
    }

    /// Missing fatality counts become 0.
    fn into_fatality(self, row: usize, column: &str) -> Result<i64, LoadError> {
        match self {
            Cell::Missing => Ok(0),
            Cell::Number(n) if n.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(&n) => {
                Ok(n as i64)
            }
            other => Err(other.invalid(row, column)),
        }
    }

    fn into_indicator(self, row: usize, column: &str) -> Result<f64, LoadError> {
        match self {
            Cell::Missing => Ok(0.0),
            Cell::Number(n) => Ok(n),
            Cell::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
            other => Err(other.invalid(row, column)),
        }
    }

    fn invalid(&self, row: usize, column: &str) -> LoadError {
        LoadError::InvalidValue {
            row,
            column: column.to_string(),
            value: self.to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Missing => write!(f, "<missing>"),
        }
    }
}

/// Assemble a record by asking `cell` for each required column.
fn build_record(
    row: usize,
    mut cell: impl FnMut(&str) -> Cell,
) -> Result<AccidentRecord, LoadError> {
    let city = cell(CITY_COLUMN).into_city();
    let dead = cell(DEAD_COLUMN).into_fatality(row, DEAD_COLUMN)?;

    let mut record = AccidentRecord::new(city, dead);
    for vehicle in VehicleType::ALL {
        let count = cell(vehicle.column()).into_indicator(row, vehicle.column())?;
        record = record.with_vehicle(vehicle, count);
    }
    for group in AgeGroup::ALL {
        let count = cell(group.column()).into_indicator(row, group.column())?;
        record = record.with_injury(group, count);
    }
    Ok(record)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a CSV table with a header row. Extra columns are ignored.
pub fn read_csv<R: Read>(input: R) -> Result<AccidentDataset, LoadError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut columns: BTreeMap<&'static str, usize> = BTreeMap::new();
    for name in required_columns() {
        let idx = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
        columns.insert(name, idx);
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        let record = build_record(row_no, |name| {
            let raw = row.get(columns[name]).unwrap_or("");
            // City codes are labels; "007" must not become 7.
            if name == CITY_COLUMN {
                text_cell(raw)
            } else {
                guess_cell(raw)
            }
        })?;
        records.push(record);
    }

    finish(records)
}

fn is_na(s: &str) -> bool {
    NA_TOKENS.contains(&s.trim())
}

fn text_cell(s: &str) -> Cell {
    if is_na(s) {
        Cell::Missing
    } else {
        Cell::Text(s.to_string())
    }
}

fn guess_cell(s: &str) -> Cell {
    if is_na(s) {
        return Cell::Missing;
    }
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Cell::Number(i as f64);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Cell::number(f);
    }
    match trimmed {
        "true" | "True" | "TRUE" => Cell::Bool(true),
        "false" | "False" | "FALSE" => Cell::Bool(false),
        _ => Cell::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
/// A key absent from one object reads as a missing cell, but every required
/// key must appear somewhere in the file.
pub fn read_json(text: &str) -> Result<AccidentDataset, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected top-level JSON array".to_string()))?;
    if rows.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut objects = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;
        objects.push(obj);
    }

    let present: BTreeSet<&str> = objects
        .iter()
        .flat_map(|obj| obj.keys().map(String::as_str))
        .collect();
    if let Some(missing) = required_columns().find(|name| !present.contains(name)) {
        return Err(LoadError::MissingColumn(missing.to_string()));
    }

    let records = objects
        .iter()
        .enumerate()
        .map(|(row_no, obj)| {
            build_record(row_no, |name| obj.get(name).map_or(Cell::Missing, json_cell))
        })
        .collect::<Result<Vec<_>, _>>()?;

    finish(records)
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => n.as_f64().map_or(Cell::Text(n.to_string()), Cell::number),
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Missing,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Numeric columns of any width are widened to `Float64`; dictionary-encoded
/// strings (pandas categoricals) are decoded to `Utf8`.
fn load_parquet(path: &Path) -> Result<AccidentDataset, LoadError> {
    let file = open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let mut columns: BTreeMap<&'static str, ArrayRef> = BTreeMap::new();
        for name in required_columns() {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name.to_string()))?;
            columns.insert(name, normalize_column(name, batch.column(idx))?);
        }

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            records.push(build_record(row_no, |name| arrow_cell(&columns[name], row))?);
        }
    }

    finish(records)
}

/// Bring a column to one of the types [`arrow_cell`] reads: `Utf8`,
/// `LargeUtf8`, `Float64` or `Boolean`. Binary columns must hold valid UTF-8.
fn normalize_column(name: &str, col: &ArrayRef) -> Result<ArrayRef, LoadError> {
    let data_type = col.data_type();
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Float64 | DataType::Boolean => {
            Ok(col.clone())
        }
        t if t.is_numeric() => Ok(cast(col, &DataType::Float64)?),
        DataType::Dictionary(_, _) | DataType::Utf8View | DataType::Binary => {
            Ok(cast(col, &DataType::Utf8)?)
        }
        DataType::LargeBinary => Ok(cast(col, &DataType::LargeUtf8)?),
        DataType::BinaryView => {
            let text = cast(col, &DataType::Utf8View)?;
            Ok(cast(&text, &DataType::Utf8)?)
        }
        other => Err(LoadError::UnsupportedColumnType {
            column: name.to_string(),
            data_type: other.clone(),
        }),
    }
}

/// Extract a single cell from a normalized Arrow column.
fn arrow_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Missing;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Float64 => Cell::number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Bool(col.as_boolean().value(row)),
        // normalize_column rejects every other type before rows are read.
        _ => Cell::Missing,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{
        BinaryArray, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray,
        StringViewArray,
    };
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "CITY,DEAD,MOTORCYCLE,TRUCK,BICYCLE,PRIVATE,INJ0_19,INJ20_64,INJ65_";

    fn csv_of(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn reads_basic_csv() {
        let text = csv_of(&[
            "Haifa,0,1,0,0,0,1,0,0",
            "Haifa,2,0,1,0,1,0,1,0",
            "Eilat,1,0,0,1,0,0,0,1",
        ]);
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.fatality_bounds(), Some((0, 2)));
        let first = &ds.records()[0];
        assert_eq!(first.city.as_deref(), Some("Haifa"));
        assert_eq!(first.vehicle_count(VehicleType::Motorcycle), 1.0);
        assert_eq!(first.injury_count(AgeGroup::Age0To19), 1.0);
        assert_eq!(ds.max_city_count(), 2);
    }

    #[test]
    fn missing_fatality_becomes_zero() {
        let text = csv_of(&["Haifa,,1,0,0,0,1,0,0", "Haifa,NaN,1,0,0,0,1,0,0", "Eilat,3.0,1,0,0,0,1,0,0"]);
        let ds = read_csv(text.as_bytes()).unwrap();
        let dead: Vec<i64> = ds.records().iter().map(|r| r.dead).collect();
        assert_eq!(dead, vec![0, 0, 3]);
    }

    #[test]
    fn every_pandas_na_spelling_is_missing() {
        let rows: Vec<String> = NA_TOKENS
            .iter()
            .map(|token| format!("Haifa,{token},1,0,0,0,1,0,0"))
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let ds = read_csv(csv_of(&rows).as_bytes()).unwrap();
        assert_eq!(ds.len(), NA_TOKENS.len());
        assert!(ds.records().iter().all(|r| r.dead == 0));

        for token in ["n/a", "<NA>", "#NA", "#N/A N/A", "-1.#IND", "1.#QNAN", "-NaN", "NA "] {
            let text = csv_of(&[format!("Haifa,{token},1,0,0,0,1,0,0").as_str()]);
            let ds = read_csv(text.as_bytes()).unwrap();
            assert_eq!(ds.records()[0].dead, 0, "token {token:?}");
        }
    }

    #[test]
    fn fatality_outside_i64_is_invalid() {
        for value in ["1e30", "-1e30", "9223372036854775808.0"] {
            let text = csv_of(&[format!("Haifa,{value},1,0,0,0,1,0,0").as_str()]);
            let err = read_csv(text.as_bytes()).unwrap_err();
            assert!(
                matches!(err, LoadError::InvalidValue { ref column, .. } if column == "DEAD"),
                "{value}: {err}"
            );
        }
        let text = csv_of(&["Haifa,9007199254740992,1,0,0,0,1,0,0"]);
        assert_eq!(read_csv(text.as_bytes()).unwrap().records()[0].dead, 9_007_199_254_740_992);
    }

    #[test]
    fn extra_columns_and_order_are_ignored() {
        let text = "ID,INJ65_,INJ20_64,INJ0_19,PRIVATE,BICYCLE,TRUCK,MOTORCYCLE,DEAD,CITY\n\
                    17,0,0,1,0,0,0,1,4,Akko";
        let ds = read_csv(text.as_bytes()).unwrap();
        let rec = &ds.records()[0];
        assert_eq!(rec.city.as_deref(), Some("Akko"));
        assert_eq!(rec.dead, 4);
        assert_eq!(rec.vehicle_count(VehicleType::Motorcycle), 1.0);
        assert_eq!(rec.injury_count(AgeGroup::Age0To19), 1.0);
        assert_eq!(rec.injury_count(AgeGroup::Age65Plus), 0.0);
    }

    #[test]
    fn missing_column_is_reported() {
        let text = "CITY,DEAD,MOTORCYCLE,TRUCK,BICYCLE,INJ0_19,INJ20_64,INJ65_\nHaifa,0,1,0,0,1,0,0";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "PRIVATE"), "{err}");
    }

    #[test]
    fn fractional_fatality_is_invalid() {
        let text = csv_of(&["Haifa,0,1,0,0,0,1,0,0", "Haifa,1.5,1,0,0,0,1,0,0"]);
        match read_csv(text.as_bytes()).unwrap_err() {
            LoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "DEAD");
                assert_eq!(value, "1.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn text_indicator_is_invalid() {
        let text = csv_of(&["Haifa,0,yes,0,0,0,1,0,0"]);
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { ref column, .. } if column == "MOTORCYCLE"));
    }

    #[test]
    fn boolean_and_missing_indicators() {
        let text = csv_of(&["Haifa,0,True,,false,0,TRUE,NA,0"]);
        let ds = read_csv(text.as_bytes()).unwrap();
        let rec = &ds.records()[0];
        assert_eq!(rec.vehicle_count(VehicleType::Motorcycle), 1.0);
        assert_eq!(rec.vehicle_count(VehicleType::Truck), 0.0);
        assert_eq!(rec.vehicle_count(VehicleType::Bicycle), 0.0);
        assert_eq!(rec.injury_count(AgeGroup::Age0To19), 1.0);
        assert_eq!(rec.injury_count(AgeGroup::Age20To64), 0.0);
    }

    #[test]
    fn missing_and_numeric_city() {
        let text = csv_of(&[",0,1,0,0,0,1,0,0", "7100,0,1,0,0,0,1,0,0"]);
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].city, None);
        assert_eq!(ds.records()[1].city.as_deref(), Some("7100"));
        assert_eq!(ds.city_totals().len(), 1);
    }

    #[test]
    fn city_codes_keep_their_spelling() {
        let text = csv_of(&["Haifa,0,1,0,0,0,1,0,0", "007,0,1,0,0,0,1,0,0", "12.50,0,1,0,0,0,1,0,0"]);
        let ds = read_csv(text.as_bytes()).unwrap();
        let cities: Vec<&str> = ds.city_totals().keys().map(String::as_str).collect();
        assert_eq!(cities, vec!["007", "12.50", "Haifa"]);
    }

    #[test]
    fn header_only_csv_is_empty() {
        let err = read_csv(HEADER.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn ragged_csv_is_malformed() {
        let text = csv_of(&["Haifa,0,1,0"]);
        assert!(matches!(read_csv(text.as_bytes()).unwrap_err(), LoadError::Csv(_)));
    }

    #[test]
    fn reads_records_json() {
        let text = r#"[
            {"CITY": "Haifa", "DEAD": null, "MOTORCYCLE": 1, "TRUCK": 0, "BICYCLE": 0,
             "PRIVATE": 0, "INJ0_19": 1.0, "INJ20_64": 0, "INJ65_": 0},
            {"CITY": "Eilat", "DEAD": 2, "MOTORCYCLE": 0, "TRUCK": true,
             "PRIVATE": 0, "INJ0_19": 0, "INJ20_64": 1, "INJ65_": 0}
        ]"#;
        let ds = read_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].dead, 0);
        assert_eq!(ds.records()[1].vehicle_count(VehicleType::Truck), 1.0);
        assert_eq!(ds.records()[1].vehicle_count(VehicleType::Bicycle), 0.0);
    }

    #[test]
    fn json_must_be_array_of_objects() {
        assert!(matches!(read_json("{}").unwrap_err(), LoadError::Malformed(_)));
        assert!(matches!(read_json("[1]").unwrap_err(), LoadError::Malformed(_)));
        assert!(matches!(read_json("[]").unwrap_err(), LoadError::Empty));
        assert!(matches!(read_json("[").unwrap_err(), LoadError::Json(_)));
        let missing = r#"[{"CITY": "Haifa", "DEAD": 0}]"#;
        assert!(matches!(read_json(missing).unwrap_err(), LoadError::MissingColumn(_)));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accid_taz.CSV");
        let mut file = File::create(&path).unwrap();
        file.write_all(csv_of(&["Haifa,1,1,0,0,0,1,0,0"]).as_bytes())
            .unwrap();
        drop(file);
        assert_eq!(load_file(&path).unwrap().len(), 1);

        let other = dir.path().join("accid_taz.xlsx");
        File::create(&other).unwrap();
        assert!(matches!(
            load_file(&other).unwrap_err(),
            LoadError::UnsupportedFormat(ref e) if e == "xlsx"
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn reads_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("CITY", DataType::Utf8, true),
            Field::new("DEAD", DataType::Float64, true),
            Field::new("MOTORCYCLE", DataType::Int64, false),
            Field::new("TRUCK", DataType::Int64, false),
            Field::new("BICYCLE", DataType::Boolean, false),
            Field::new("PRIVATE", DataType::Int64, false),
            Field::new("INJ0_19", DataType::Float64, false),
            Field::new("INJ20_64", DataType::Float64, false),
            Field::new("INJ65_", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Haifa"), None, Some("Eilat")])),
                Arc::new(Float64Array::from(vec![Some(1.0), None, Some(0.0)])),
                Arc::new(Int64Array::from(vec![1, 0, 0])),
                Arc::new(Int64Array::from(vec![0, 2, 0])),
                Arc::new(BooleanArray::from(vec![false, false, true])),
                Arc::new(Int64Array::from(vec![0, 0, 0])),
                Arc::new(Float64Array::from(vec![1.0, 0.0, 0.0])),
                Arc::new(Float64Array::from(vec![0.0, 1.0, 0.0])),
                Arc::new(Float64Array::from(vec![0.0, 0.0, 1.0])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accid_taz.parquet");
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        let recs = ds.records();
        assert_eq!(recs[0].city.as_deref(), Some("Haifa"));
        assert_eq!(recs[0].dead, 1);
        assert_eq!(recs[1].city, None);
        assert_eq!(recs[1].dead, 0);
        assert_eq!(recs[1].vehicle_count(VehicleType::Truck), 2.0);
        assert_eq!(recs[2].vehicle_count(VehicleType::Bicycle), 1.0);
        assert_eq!(recs[2].injury_count(AgeGroup::Age65Plus), 1.0);
    }

    /// Two-row parquet file with the given CITY column and fixed indicators.
    fn parquet_with_city(dir: &Path, city: ArrayRef) -> PathBuf {
        let mut fields = vec![
            Field::new("CITY", city.data_type().clone(), true),
            Field::new("DEAD", DataType::Int64, true),
        ];
        let mut columns: Vec<ArrayRef> = vec![city, Arc::new(Int64Array::from(vec![0, 1]))];
        for name in ["MOTORCYCLE", "TRUCK", "BICYCLE", "PRIVATE", "INJ0_19", "INJ20_64", "INJ65_"] {
            fields.push(Field::new(name, DataType::Int64, false));
            columns.push(Arc::new(Int64Array::from(vec![1, 1])));
        }
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let path = dir.join("accid_taz.parquet");
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    fn city_names(path: &Path) -> Vec<String> {
        load_file(path).unwrap().city_totals().keys().cloned().collect()
    }

    #[test]
    fn parquet_view_and_binary_strings_are_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let expected = vec!["Eilat".to_string(), "Haifa".to_string()];

        let view = parquet_with_city(dir.path(), Arc::new(StringViewArray::from(vec!["Haifa", "Eilat"])));
        assert_eq!(city_names(&view), expected);

        let binary: Vec<&[u8]> = vec![b"Haifa", b"Eilat"];
        let path = parquet_with_city(dir.path(), Arc::new(BinaryArray::from(binary)));
        assert_eq!(city_names(&path), expected);
    }

    #[test]
    fn parquet_unreadable_column_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = parquet_with_city(dir.path(), Arc::new(Date32Array::from(vec![1, 2])));
        match load_file(&path).unwrap_err() {
            LoadError::UnsupportedColumnType { column, data_type } => {
                assert_eq!(column, "CITY");
                assert_eq!(data_type, DataType::Date32);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
