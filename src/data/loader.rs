use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{Dataset, Row, Table, Value};
use super::schema::{ColumnSpec, Datatype, Descriptor, TableSpec};

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

/// Everything that can go wrong while loading a dataset. Row indices are
/// zero-based data rows, the header line excluded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The descriptor or a referenced data file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor is malformed, internally inconsistent, or a data file's
    /// header does not match its declaration.
    #[error("schema error: {message}")]
    SchemaParse { message: String },

    /// A cell could not be coerced to its declared datatype, or a required
    /// cell was empty.
    #[error("table '{table}', row {row}, column '{column}': expected {expected}, got '{value}'")]
    TypeMismatch {
        table: String,
        row: usize,
        column: String,
        expected: Datatype,
        value: String,
    },

    /// A foreign-key value has no matching primary key in the referenced
    /// table.
    #[error("table '{table}', row {row}, column '{column}': '{value}' has no match in {target_table}.{target_column}")]
    ReferentialIntegrity {
        table: String,
        row: usize,
        column: String,
        value: String,
        target_table: String,
        target_column: String,
    },

    /// Two rows share a primary-key value.
    #[error("table '{table}', row {row}, column '{column}': duplicate key '{value}'")]
    DuplicateKey {
        table: String,
        row: usize,
        column: String,
        value: String,
    },
}

fn schema_error(message: impl Into<String>) -> LoadError {
    LoadError::SchemaParse {
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and validate the dataset described by the descriptor at `path`.
///
/// Data files are resolved relative to the descriptor's directory. The load
/// is one-shot and all-or-nothing: on the first violation an error is
/// returned and no partial dataset escapes.
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    let descriptor = read_descriptor(path)?;
    check_descriptor(&descriptor)?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tables = Vec::with_capacity(descriptor.tables.len());
    for spec in &descriptor.tables {
        tables.push(read_table(base, spec)?);
    }

    let dataset = Dataset::from_tables(descriptor, tables);
    check_references(&dataset)?;
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Descriptor parsing and consistency checks
// ---------------------------------------------------------------------------

fn read_descriptor(path: &Path) -> Result<Descriptor, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::MissingFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| schema_error(format!("{}: {e}", path.display())))
}

/// Descriptor-level invariants, checked before any data file is opened:
/// unique table and column names, primary keys that exist, foreign keys that
/// point at another table's primary key, usable delimiters and separators.
fn check_descriptor(descriptor: &Descriptor) -> Result<(), LoadError> {
    let mut table_names = BTreeSet::new();
    for spec in &descriptor.tables {
        if !table_names.insert(spec.name.as_str()) {
            return Err(schema_error(format!("duplicate table '{}'", spec.name)));
        }
        if spec.columns.is_empty() {
            return Err(schema_error(format!("table '{}' declares no columns", spec.name)));
        }
        if spec.delimiter_byte().is_none() {
            return Err(schema_error(format!(
                "table '{}': delimiter {:?} is not a single byte",
                spec.name, spec.delimiter
            )));
        }

        let mut column_names = BTreeSet::new();
        for col in &spec.columns {
            if !column_names.insert(col.name.as_str()) {
                return Err(schema_error(format!(
                    "table '{}': duplicate column '{}'",
                    spec.name, col.name
                )));
            }
            if col.separator.as_deref() == Some("") {
                return Err(schema_error(format!(
                    "table '{}', column '{}': empty separator",
                    spec.name, col.name
                )));
            }
            if col.separator.is_some() && col.references.is_some() {
                return Err(schema_error(format!(
                    "table '{}', column '{}': a foreign key cannot be list-valued",
                    spec.name, col.name
                )));
            }
        }

        if let Some(pk) = &spec.primary_key {
            if spec.column(pk).is_none() {
                return Err(schema_error(format!(
                    "table '{}': primary key '{pk}' is not a declared column",
                    spec.name
                )));
            }
        }
    }

    // Foreign keys must target another table's declared primary key.
    for spec in &descriptor.tables {
        for col in &spec.columns {
            let Some(fk) = &col.references else { continue };
            let Some(target) = descriptor.table(&fk.table) else {
                return Err(schema_error(format!(
                    "table '{}', column '{}': unknown referenced table '{}'",
                    spec.name, col.name, fk.table
                )));
            };
            if target.primary_key.as_deref() != Some(fk.column.as_str()) {
                return Err(schema_error(format!(
                    "table '{}', column '{}': '{}.{}' is not the primary key of '{}'",
                    spec.name, col.name, fk.table, fk.column, fk.table
                )));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Table reading
// ---------------------------------------------------------------------------

fn read_table(base: &Path, spec: &TableSpec) -> Result<Table, LoadError> {
    let path = base.join(&spec.file);
    let file = File::open(&path).map_err(|source| LoadError::MissingFile {
        path: path.clone(),
        source,
    })?;

    // delimiter validated in check_descriptor
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(spec.delimiter_byte().unwrap_or(b','))
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| schema_error(format!("table '{}': {e}", spec.name)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    // Header must carry exactly the declared columns, in any order.
    let mut indices = Vec::with_capacity(spec.columns.len());
    for col in &spec.columns {
        let idx = headers.iter().position(|h| h == &col.name).ok_or_else(|| {
            schema_error(format!(
                "table '{}': data file is missing declared column '{}'",
                spec.name, col.name
            ))
        })?;
        indices.push(idx);
    }
    for header in &headers {
        if spec.column(header).is_none() {
            return Err(schema_error(format!(
                "table '{}': data file has undeclared column '{header}'",
                spec.name
            )));
        }
    }

    let mut rows: Vec<Row> = Vec::new();
    let mut keys: BTreeSet<Value> = BTreeSet::new();

    for (row_no, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| schema_error(format!("table '{}', row {row_no}: {e}", spec.name)))?;

        let mut row = Row::new();
        for (col, &idx) in spec.columns.iter().zip(&indices) {
            let raw = record.get(idx).unwrap_or("");
            let value = coerce(spec, col, row_no, raw)?;
            row.insert(col.name.clone(), value);
        }

        if let Some(pk) = &spec.primary_key {
            // check_descriptor guarantees pk is a declared column
            let key = row.get(pk).cloned().unwrap_or(Value::Null);
            if !keys.insert(key.clone()) {
                return Err(LoadError::DuplicateKey {
                    table: spec.name.clone(),
                    row: row_no,
                    column: pk.clone(),
                    value: key.to_string(),
                });
            }
        }
        rows.push(row);
    }

    Ok(Table {
        name: spec.name.clone(),
        columns: spec.columns.iter().map(|c| c.name.clone()).collect(),
        rows,
        primary_key: spec.primary_key.clone(),
        keys,
    })
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Coerce one raw cell to its declared type. Empty cells load as `Null`
/// unless the column is required or is the table's primary key.
fn coerce(spec: &TableSpec, col: &ColumnSpec, row: usize, raw: &str) -> Result<Value, LoadError> {
    let value = if raw.is_empty() {
        Value::Null
    } else if let Some(sep) = &col.separator {
        let items = raw
            .split(sep.as_str())
            .map(|tok| coerce_scalar(col.datatype, tok))
            .collect::<Option<Vec<Value>>>()
            .ok_or_else(|| type_mismatch(spec, col, row, raw))?;
        Value::List(items)
    } else {
        coerce_scalar(col.datatype, raw).ok_or_else(|| type_mismatch(spec, col, row, raw))?
    };

    let must_fill = col.required || spec.primary_key.as_deref() == Some(col.name.as_str());
    if must_fill && value.is_null() {
        return Err(type_mismatch(spec, col, row, raw));
    }
    Ok(value)
}

fn type_mismatch(spec: &TableSpec, col: &ColumnSpec, row: usize, raw: &str) -> LoadError {
    LoadError::TypeMismatch {
        table: spec.name.clone(),
        row,
        column: col.name.clone(),
        expected: col.datatype,
        value: raw.to_string(),
    }
}

fn coerce_scalar(datatype: Datatype, raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return Some(Value::Null);
    }
    match datatype {
        Datatype::String => Some(Value::String(raw.to_string())),
        Datatype::Integer => raw.trim().parse::<i64>().ok().map(Value::Integer),
        Datatype::Float => raw.trim().parse::<f64>().ok().map(Value::Float),
        Datatype::Boolean => match raw.trim() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
    }
}

// ---------------------------------------------------------------------------
// Referential integrity
// ---------------------------------------------------------------------------

/// Every non-null foreign-key value must match a primary key in the
/// referenced table. Runs after all tables are in memory.
fn check_references(dataset: &Dataset) -> Result<(), LoadError> {
    for spec in &dataset.descriptor.tables {
        let table = match dataset.table(&spec.name) {
            Some(t) => t,
            None => continue,
        };
        for col in &spec.columns {
            let Some(fk) = &col.references else { continue };
            // check_descriptor guarantees the target table exists
            let target = match dataset.table(&fk.table) {
                Some(t) => t,
                None => continue,
            };
            for (row_no, row) in table.rows.iter().enumerate() {
                let value = match row.get(&col.name) {
                    Some(v) if !v.is_null() => v,
                    _ => continue,
                };
                if !target.contains_key(value) {
                    return Err(LoadError::ReferentialIntegrity {
                        table: spec.name.clone(),
                        row: row_no,
                        column: col.name.clone(),
                        value: value.to_string(),
                        target_table: fk.table.clone(),
                        target_column: fk.column.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}
