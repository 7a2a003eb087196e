use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use lexitab::{load, LoadError, Value};

const DESCRIPTOR: &str = r#"{
    "name": "numerals",
    "tables": [
        {
            "name": "varieties",
            "file": "varieties.csv",
            "primary_key": "id",
            "columns": [
                { "name": "id", "datatype": "string" },
                { "name": "name", "datatype": "string" }
            ]
        },
        {
            "name": "lexemes",
            "file": "lexemes.csv",
            "primary_key": "id",
            "columns": [
                { "name": "id", "datatype": "string" },
                { "name": "variety_id", "datatype": "string",
                  "references": { "table": "varieties", "column": "id" } },
                { "name": "form", "datatype": "string", "required": true },
                { "name": "number_value", "datatype": "integer" }
            ]
        }
    ]
}"#;

const VARIETIES: &str = "id,name\neng,English\ndeu,German\n";
const LEXEMES: &str = "\
id,variety_id,form,number_value
l1,eng,one,1
l2,eng,two,2
l3,deu,eins,1
";

fn write_dataset(dir: &Path, descriptor: &str, files: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("descriptor.json");
    fs::write(&path, descriptor).unwrap();
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
    path
}

#[test]
fn loads_valid_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        dir.path(),
        DESCRIPTOR,
        &[("varieties.csv", VARIETIES), ("lexemes.csv", LEXEMES)],
    );

    let dataset = load(&path).unwrap();
    assert_eq!(dataset.len(), 2);

    let varieties = dataset.table("varieties").unwrap();
    assert_eq!(varieties.len(), 2);
    assert!(varieties.contains_key(&Value::String("deu".into())));

    let lexemes = dataset.table("lexemes").unwrap();
    assert_eq!(lexemes.len(), 3);
    assert_eq!(
        lexemes.rows[1].get("number_value"),
        Some(&Value::Integer(2))
    );
    assert_eq!(
        lexemes.rows[2].get("form"),
        Some(&Value::String("eins".into()))
    );
}

#[test]
fn foreign_key_violation_names_table_row_and_column() {
    let lexemes = "\
id,variety_id,form,number_value
l1,eng,one,1
l2,X9,uno,1
";
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        dir.path(),
        DESCRIPTOR,
        &[("varieties.csv", VARIETIES), ("lexemes.csv", lexemes)],
    );

    let err = load(&path).unwrap_err();
    match err {
        LoadError::ReferentialIntegrity {
            table,
            row,
            column,
            value,
            target_table,
            target_column,
        } => {
            assert_eq!(table, "lexemes");
            assert_eq!(row, 1);
            assert_eq!(column, "variety_id");
            assert_eq!(value, "X9");
            assert_eq!(target_table, "varieties");
            assert_eq!(target_column, "id");
        }
        other => panic!("expected ReferentialIntegrity, got {other:?}"),
    }
}

#[test]
fn empty_foreign_key_is_allowed() {
    let lexemes = "\
id,variety_id,form,number_value
l1,,one,1
";
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        dir.path(),
        DESCRIPTOR,
        &[("varieties.csv", VARIETIES), ("lexemes.csv", lexemes)],
    );

    let dataset = load(&path).unwrap();
    let lexemes = dataset.table("lexemes").unwrap();
    assert_eq!(lexemes.rows[0].get("variety_id"), Some(&Value::Null));
}

#[test]
fn duplicate_primary_key_is_rejected() {
    let varieties = "id,name\neng,English\neng,Also English\n";
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        dir.path(),
        DESCRIPTOR,
        &[("varieties.csv", varieties), ("lexemes.csv", LEXEMES)],
    );

    let err = load(&path).unwrap_err();
    match err {
        LoadError::DuplicateKey { table, row, column, value } => {
            assert_eq!(table, "varieties");
            assert_eq!(row, 1);
            assert_eq!(column, "id");
            assert_eq!(value, "eng");
        }
        other => panic!("expected DuplicateKey, got {other:?}"),
    }
}

#[test]
fn unparseable_integer_is_a_type_mismatch() {
    let lexemes = "\
id,variety_id,form,number_value
l1,eng,one,abc
";
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        dir.path(),
        DESCRIPTOR,
        &[("varieties.csv", VARIETIES), ("lexemes.csv", lexemes)],
    );

    let err = load(&path).unwrap_err();
    match err {
        LoadError::TypeMismatch { table, row, column, value, .. } => {
            assert_eq!(table, "lexemes");
            assert_eq!(row, 0);
            assert_eq!(column, "number_value");
            assert_eq!(value, "abc");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn empty_required_cell_is_a_type_mismatch() {
    let lexemes = "\
id,variety_id,form,number_value
l1,eng,,1
";
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        dir.path(),
        DESCRIPTOR,
        &[("varieties.csv", VARIETIES), ("lexemes.csv", lexemes)],
    );

    let err = load(&path).unwrap_err();
    assert!(matches!(
        err,
        LoadError::TypeMismatch { ref column, .. } if column == "form"
    ));
}

#[test]
fn missing_data_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(dir.path(), DESCRIPTOR, &[("varieties.csv", VARIETIES)]);

    let err = load(&path).unwrap_err();
    match err {
        LoadError::MissingFile { path, .. } => {
            assert!(path.ends_with("lexemes.csv"));
        }
        other => panic!("expected MissingFile, got {other:?}"),
    }
}

#[test]
fn missing_descriptor_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = load(&dir.path().join("nowhere.json")).unwrap_err();
    assert!(matches!(err, LoadError::MissingFile { .. }));
}

#[test]
fn malformed_descriptor_is_a_schema_error() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(dir.path(), "{ not json", &[]);

    let err = load(&path).unwrap_err();
    assert!(matches!(err, LoadError::SchemaParse { .. }));
}

#[test]
fn unknown_reference_target_is_a_schema_error() {
    let descriptor = r#"{
        "name": "broken",
        "tables": [{
            "name": "lexemes",
            "file": "lexemes.csv",
            "columns": [
                { "name": "variety_id", "datatype": "string",
                  "references": { "table": "varieties", "column": "id" } }
            ]
        }]
    }"#;
    let dir = TempDir::new().unwrap();
    let path = write_dataset(dir.path(), descriptor, &[("lexemes.csv", "variety_id\neng\n")]);

    let err = load(&path).unwrap_err();
    match err {
        LoadError::SchemaParse { message } => {
            assert!(message.contains("varieties"), "message: {message}");
        }
        other => panic!("expected SchemaParse, got {other:?}"),
    }
}

#[test]
fn reference_must_target_a_primary_key() {
    let descriptor = r#"{
        "name": "broken",
        "tables": [
            {
                "name": "varieties",
                "file": "varieties.csv",
                "columns": [
                    { "name": "id", "datatype": "string" },
                    { "name": "name", "datatype": "string" }
                ]
            },
            {
                "name": "lexemes",
                "file": "lexemes.csv",
                "columns": [
                    { "name": "variety_id", "datatype": "string",
                      "references": { "table": "varieties", "column": "name" } }
                ]
            }
        ]
    }"#;
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        dir.path(),
        descriptor,
        &[("varieties.csv", VARIETIES), ("lexemes.csv", "variety_id\neng\n")],
    );

    let err = load(&path).unwrap_err();
    assert!(matches!(err, LoadError::SchemaParse { .. }));
}

#[test]
fn undeclared_data_column_is_a_schema_error() {
    let varieties = "id,name,extra\neng,English,x\n";
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        dir.path(),
        DESCRIPTOR,
        &[("varieties.csv", varieties), ("lexemes.csv", LEXEMES)],
    );

    let err = load(&path).unwrap_err();
    match err {
        LoadError::SchemaParse { message } => {
            assert!(message.contains("extra"), "message: {message}");
        }
        other => panic!("expected SchemaParse, got {other:?}"),
    }
}

#[test]
fn missing_declared_column_is_a_schema_error() {
    let varieties = "id\neng\n";
    let dir = TempDir::new().unwrap();
    let path = write_dataset(
        dir.path(),
        DESCRIPTOR,
        &[("varieties.csv", varieties), ("lexemes.csv", LEXEMES)],
    );

    let err = load(&path).unwrap_err();
    match err {
        LoadError::SchemaParse { message } => {
            assert!(message.contains("name"), "message: {message}");
        }
        other => panic!("expected SchemaParse, got {other:?}"),
    }
}

#[test]
fn tab_delimited_tables_and_list_columns() {
    let descriptor = r#"{
        "name": "segmented",
        "tables": [{
            "name": "lexemes",
            "file": "lexemes.tsv",
            "primary_key": "id",
            "delimiter": "\t",
            "columns": [
                { "name": "id", "datatype": "string" },
                { "name": "form", "datatype": "string" },
                { "name": "segments", "datatype": "string", "separator": " " }
            ]
        }]
    }"#;
    let lexemes = "id\tform\tsegments\nl1\tzwei\tts v aɪ\n";
    let dir = TempDir::new().unwrap();
    let path = write_dataset(dir.path(), descriptor, &[("lexemes.tsv", lexemes)]);

    let dataset = load(&path).unwrap();
    let table = dataset.table("lexemes").unwrap();
    assert_eq!(
        table.rows[0].get("segments"),
        Some(&Value::List(vec![
            Value::String("ts".into()),
            Value::String("v".into()),
            Value::String("aɪ".into()),
        ]))
    );
}
