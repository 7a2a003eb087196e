use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// WriteError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("table '{table}': {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// The descriptor declares a table the dataset does not hold.
    #[error("no loaded table named '{0}'")]
    UnknownTable(String),
}

// ---------------------------------------------------------------------------
// Re-serialization
// ---------------------------------------------------------------------------

/// Write every table of `dataset` back to its declared file name under
/// `dir`, using the declared delimiters and separators. Together with a copy
/// of the descriptor this reloads to an identical dataset.
pub fn write_data(dataset: &Dataset, dir: &Path) -> Result<(), WriteError> {
    std::fs::create_dir_all(dir).map_err(|source| WriteError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for spec in &dataset.descriptor.tables {
        let table = dataset
            .table(&spec.name)
            .ok_or_else(|| WriteError::UnknownTable(spec.name.clone()))?;
        let path = dir.join(&spec.file);

        let mut writer = csv::WriterBuilder::new()
            .delimiter(spec.delimiter_byte().unwrap_or(b','))
            .from_path(&path)
            .map_err(|source| WriteError::Csv {
                table: spec.name.clone(),
                source,
            })?;

        let csv_err = |source| WriteError::Csv {
            table: spec.name.clone(),
            source,
        };

        writer.write_record(&table.columns).map_err(csv_err)?;
        for row in &table.rows {
            let record: Vec<String> = spec
                .columns
                .iter()
                .map(|col| field_text(row.get(&col.name), col.separator.as_deref()))
                .collect();
            writer.write_record(&record).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| WriteError::Io {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Render one cell back to its text form. `Display` on `Value` produces the
/// canonical scalar text; lists are joined with the column's separator.
fn field_text(value: Option<&Value>, separator: Option<&str>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::List(items)) => {
            let sep = separator.unwrap_or(" ");
            items
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(sep)
        }
        Some(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_text_forms() {
        assert_eq!(field_text(None, None), "");
        assert_eq!(field_text(Some(&Value::Null), None), "");
        assert_eq!(field_text(Some(&Value::Integer(12)), None), "12");
        assert_eq!(field_text(Some(&Value::Float(1.5)), None), "1.5");
        assert_eq!(field_text(Some(&Value::Bool(false)), None), "false");
        let list = Value::List(vec![
            Value::String("t".into()),
            Value::String("u".into()),
        ]);
        assert_eq!(field_text(Some(&list), Some(" ")), "t u");
    }
}
