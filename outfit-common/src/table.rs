//! Generic tabular I/O
//!
//! Every table is read into a [`Table`] (ordered headers + string cells) and
//! typed records are deserialized from it, so every encoding shares one
//! validation path. The on-disk format is chosen from the file extension:
//!
//! | Extension  | Format |
//! |------------|--------|
//! | `.csv`     | comma-separated, header row |
//! | `.json`    | array of record objects (a column-oriented object is also accepted on read) |
//! | `.parquet` | columnar; integer and float columns typed, everything else UTF-8 |
//!
//! Anything else fails with [`Error::UnknownFormat`].

use crate::{Error, Result};
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use csv::StringRecord;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Supported table encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
    Parquet,
}

impl TableFormat {
    /// Pick the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("json") => Ok(TableFormat::Json),
            Some("parquet") => Ok(TableFormat::Parquet),
            _ => Err(Error::UnknownFormat(path.to_path_buf())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Json => "json",
            TableFormat::Parquet => "parquet",
        }
    }
}

/// Typed table with a fixed set of required columns
pub trait Schema {
    /// Human-readable table name used in error messages
    const NAME: &'static str;
    /// Columns that must be present (extra columns are ignored)
    const COLUMNS: &'static [&'static str];
}

/// Record that can be written as one table row
pub trait ToRow {
    fn headers() -> Vec<String>;
    fn to_row(&self) -> Vec<String>;
}

/// In-memory table: ordered headers and rows of string cells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from typed records
    pub fn from_records<T: ToRow>(records: &[T]) -> Self {
        Self {
            headers: T::headers(),
            rows: records.iter().map(ToRow::to_row).collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row; its width must match the header
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(Error::InvalidInput(format!(
                "Row has {} cells, table has {} columns",
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Check that every named column exists, reporting all missing ones at once
    pub fn require_columns(&self, table: &str, columns: &[&str]) -> Result<()> {
        let missing: Vec<String> = columns
            .iter()
            .filter(|c| self.column_index(c).is_none())
            .map(|c| c.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingColumns {
                table: table.to_string(),
                columns: missing,
            })
        }
    }

    /// Rename a header in place. Returns false if the column does not exist.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.headers[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Rewrite every cell of a column, stopping at the first error
    pub fn map_column<F, E>(&mut self, name: &str, mut f: F) -> std::result::Result<(), E>
    where
        F: FnMut(&str) -> std::result::Result<String, E>,
        E: From<Error>,
    {
        let idx = self
            .column_index(name)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown column '{}'", name)))?;
        for row in &mut self.rows {
            row[idx] = f(&row[idx])?;
        }
        Ok(())
    }

    /// Deserialize rows into typed records after validating required columns
    pub fn deserialize<T>(&self) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Schema,
    {
        self.require_columns(T::NAME, T::COLUMNS)?;

        let headers = StringRecord::from(self.headers.clone());
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                StringRecord::from(row.clone())
                    .deserialize::<T>(Some(&headers))
                    .map_err(|e| {
                        Error::InvalidInput(format!("{} row {}: {}", T::NAME, i + 1, e))
                    })
            })
            .collect()
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Read a table, dispatching on the file extension
    pub fn read(path: &Path) -> Result<Self> {
        let format = TableFormat::from_path(path)?;
        let file = File::open(path)?;
        let table = match format {
            TableFormat::Csv => Self::read_csv(BufReader::new(file))?,
            TableFormat::Json => Self::read_json(BufReader::new(file))?,
            TableFormat::Parquet => Self::read_parquet(file)?,
        };
        debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "Table loaded"
        );
        Ok(table)
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut table = Self::new(headers);
        for record in rdr.records() {
            let record = record?;
            table.rows.push(record.iter().map(|c| c.to_string()).collect());
        }
        Ok(table)
    }

    /// Read JSON records (`[{..}, ..]`) or a column-oriented object
    /// (`{"col": {"0": v, ..}, ..}`)
    pub fn read_json<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        match value {
            Value::Array(records) => Self::from_json_records(records),
            Value::Object(columns) => Self::from_json_columns(columns),
            _ => Err(Error::InvalidInput(
                "JSON table must be an array of records or an object of columns".to_string(),
            )),
        }
    }

    fn from_json_records(records: Vec<Value>) -> Result<Self> {
        let mut headers: Vec<String> = Vec::new();
        let mut objects = Vec::with_capacity(records.len());
        for record in records {
            let Value::Object(obj) = record else {
                return Err(Error::InvalidInput(
                    "JSON table records must be objects".to_string(),
                ));
            };
            for key in obj.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
            objects.push(obj);
        }

        let rows = objects
            .iter()
            .map(|obj| {
                headers
                    .iter()
                    .map(|h| obj.get(h).map(json_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self { headers, rows })
    }

    fn from_json_columns(columns: Map<String, Value>) -> Result<Self> {
        let headers: Vec<String> = columns.keys().cloned().collect();

        // Row index keys in first-seen order across all columns
        let mut index: Vec<String> = Vec::new();
        for column in columns.values() {
            let Value::Object(cells) = column else {
                return Err(Error::InvalidInput(
                    "Column-oriented JSON must map each column to an object".to_string(),
                ));
            };
            for key in cells.keys() {
                if !index.contains(key) {
                    index.push(key.clone());
                }
            }
        }

        let rows = index
            .iter()
            .map(|key| {
                columns
                    .values()
                    .map(|column| column.get(key).map(json_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self { headers, rows })
    }

    /// Read every record batch of a Parquet file; nulls become empty cells
    pub fn read_parquet(file: File) -> Result<Self> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let headers = builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        let reader = builder.build()?;

        let options = FormatOptions::default();
        let mut table = Self::new(headers);
        for batch in reader {
            let batch = batch?;
            let formatters = batch
                .columns()
                .iter()
                .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            for row in 0..batch.num_rows() {
                table.push_row(formatters.iter().map(|f| f.value(row).to_string()).collect())?;
            }
        }
        Ok(table)
    }

    // ========================================================================
    // Writing
    // ========================================================================

    /// Write the table, dispatching on the file extension
    ///
    /// Fails with [`Error::OutputExists`] if the file exists and `overwrite`
    /// is false.
    pub fn write(&self, path: &Path, overwrite: bool) -> Result<()> {
        let format = TableFormat::from_path(path)?;
        if path.exists() && !overwrite {
            return Err(Error::OutputExists(path.to_path_buf()));
        }

        let mut writer = BufWriter::new(File::create(path)?);
        match format {
            TableFormat::Csv => self.write_csv(&mut writer)?,
            TableFormat::Json => self.write_json(&mut writer)?,
            TableFormat::Parquet => self.write_parquet(&mut writer)?,
        }
        writer.flush()?;

        debug!(path = %path.display(), rows = self.len(), "Table written");
        Ok(())
    }

    /// CSV with every non-numeric field quoted
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::NonNumeric)
            .from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// JSON array of records; numeric cells become numbers, empty cells null
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        let records: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .headers
                    .iter()
                    .zip(row)
                    .map(|(h, cell)| (h.clone(), cell_json(cell)))
                    .collect();
                Value::Object(obj)
            })
            .collect();
        serde_json::to_writer_pretty(writer, &records)?;
        Ok(())
    }

    /// Single-batch Parquet file, one nullable column per header
    pub fn write_parquet<W: Write + Send>(&self, writer: W) -> Result<()> {
        if self.headers.is_empty() {
            return Err(Error::InvalidInput(
                "Cannot write a Parquet table without columns".to_string(),
            ));
        }

        let columns: Vec<ArrayRef> = (0..self.headers.len())
            .map(|i| self.column_array(i))
            .collect();
        let fields: Vec<Field> = self
            .headers
            .iter()
            .zip(&columns)
            .map(|(name, column)| Field::new(name, column.data_type().clone(), true))
            .collect();
        let schema = Arc::new(ArrowSchema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns)?;

        let mut writer = ArrowWriter::try_new(writer, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }

    /// Typed Arrow column using the same cell typing as JSON output
    fn column_array(&self, index: usize) -> ArrayRef {
        let cells: Vec<&str> = self
            .rows
            .iter()
            .map(|row| row.get(index).map(String::as_str).unwrap_or_default())
            .collect();
        let values: Vec<Value> = cells.iter().map(|cell| cell_json(cell)).collect();
        let present = || values.iter().filter(|v| !v.is_null());

        if present().all(Value::is_i64) {
            Arc::new(values.iter().map(Value::as_i64).collect::<Int64Array>())
        } else if present().all(Value::is_number) {
            Arc::new(values.iter().map(Value::as_f64).collect::<Float64Array>())
        } else {
            Arc::new(
                cells
                    .iter()
                    .map(|cell| (!cell.is_empty()).then_some(*cell))
                    .collect::<StringArray>(),
            )
        }
    }
}

/// Read a typed table, validating its required columns
pub fn read_records<T>(path: &Path) -> Result<Vec<T>>
where
    T: DeserializeOwned + Schema,
{
    Table::read(path)?.deserialize()
}

/// Write typed records; refuses to overwrite unless `overwrite` is set
pub fn write_records<T: ToRow>(path: &Path, records: &[T], overwrite: bool) -> Result<()> {
    Table::from_records(records).write(path, overwrite)
}

/// Path with its extension swapped for the target format
pub fn with_format_extension(path: &Path, format: TableFormat) -> PathBuf {
    path.with_extension(format.extension())
}

fn json_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn cell_json(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    // Only canonical integers, so identifiers such as "007" stay strings
    if let Ok(i) = cell.parse::<i64>() {
        if i.to_string() == cell {
            return Value::Number(i.into());
        }
    }
    if cell.contains(['.', 'e', 'E']) && !cell.starts_with('0') || cell.starts_with("0.") {
        if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(cell.to_string())
}
