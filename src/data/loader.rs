use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use csv::StringRecord;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Column, CrimeDataset, RawTable, Record};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a crime dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the known column names; every column is kept
///               for the raw table
/// * `.parquet` – text columns as Utf8 or dictionaries, ages as integers or floats
pub fn load_file(path: &Path) -> Result<CrimeDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} records from {} with columns {:?}",
        dataset.len(),
        path.display(),
        dataset.schema
    );
    for column in dataset.missing_columns() {
        log::warn!("{} has no '{column}' column; its chart will be skipped", path.display());
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<CrimeDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV from any reader.  Rows with the wrong number of fields are a
/// hard error; empty or non-numeric ages are read as null.
pub fn read_csv<R: Read>(input: R) -> Result<CrimeDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let schema: BTreeSet<Column> = headers.iter().filter_map(Column::from_header).collect();

    if schema.is_empty() {
        bail!("CSV header contains none of the expected columns");
    }

    let mut records = Vec::new();
    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let line = row_no + 2;
        let row = result.with_context(|| format!("CSV line {line}"))?;
        let record: Record = row
            .deserialize(Some(&headers))
            .with_context(|| format!("CSV line {line}"))?;
        records.push(record);
        rows.push(row);
    }

    let raw = RawTable {
        headers: headers.iter().map(str::to_string).collect(),
        rows,
    };
    Ok(CrimeDataset::new(records, schema).with_raw(raw))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file.  Columns are matched by name; unknown columns only
/// appear in the raw table.  Works with files written by Pandas (including
/// `category` columns) and Polars (large and view strings).
fn load_parquet(path: &Path) -> Result<CrimeDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let file_schema = builder.schema().clone();
    let schema: BTreeSet<Column> = file_schema
        .fields()
        .iter()
        .filter_map(|f| Column::from_header(f.name()))
        .collect();
    if schema.is_empty() {
        bail!("Parquet schema contains none of the expected columns");
    }

    let reader = builder.build().context("building parquet reader")?;
    let mut records = Vec::new();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let batch_schema = batch.schema();

        let mut columns: Vec<(Column, ArrayRef)> = Vec::new();
        for (i, field) in batch_schema.fields().iter().enumerate() {
            if let Some(column) = Column::from_header(field.name()) {
                let array = normalize(batch.column(i))
                    .with_context(|| format!("reading column '{column}'"))?;
                columns.push((column, array));
            }
        }

        let options = FormatOptions::default();
        let formatters = batch
            .columns()
            .iter()
            .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("formatting parquet columns")?;

        for row in 0..batch.num_rows() {
            let mut record = Record::default();
            for (column, array) in &columns {
                if column.is_numeric() {
                    let value = extract_number(array, row)
                        .with_context(|| format!("Row {row}: failed to read '{column}'"))?;
                    record.set_number(*column, value);
                } else {
                    let value = extract_text(array, row)
                        .with_context(|| format!("Row {row}: failed to read '{column}'"))?;
                    record.set_text(*column, value);
                }
            }
            records.push(record);
            rows.push(raw_row(&formatters, row));
        }
    }

    let raw = RawTable {
        headers: file_schema.fields().iter().map(|f| f.name().clone()).collect(),
        rows,
    };
    Ok(CrimeDataset::new(records, schema).with_raw(raw))
}

// -- Arrow helpers --

/// Cast dictionary-encoded arrays and string views to their plain value
/// type so the extractors below only see Utf8, LargeUtf8 and primitives.
fn normalize(col: &ArrayRef) -> Result<ArrayRef> {
    let target = match col.data_type() {
        DataType::Dictionary(_, value) => value.as_ref().clone(),
        DataType::Utf8View => DataType::Utf8,
        _ => return Ok(col.clone()),
    };
    let plain = cast(col, &target)
        .with_context(|| format!("casting {:?} to {target:?}", col.data_type()))?;
    normalize(&plain)
}

/// Display text of every cell in a row; nulls are empty.
fn raw_row(formatters: &[ArrayFormatter<'_>], row: usize) -> StringRecord {
    formatters
        .iter()
        .map(|f| f.value(row).to_string())
        .collect()
}

fn extract_text(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        other => bail!("expected a string column, got {other:?}"),
    };
    Ok(Some(text))
}

/// Ages may arrive as integers, floats, or text.  Text that does not parse
/// is null, matching the CSV reader.
fn extract_number(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row) as f64,
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row),
        DataType::Utf8 => return Ok(col.as_string::<i32>().value(row).trim().parse().ok()),
        DataType::LargeUtf8 => return Ok(col.as_string::<i64>().value(row).trim().parse().ok()),
        other => bail!("expected a numeric column, got {other:?}"),
    };
    Ok(Some(value))
}
