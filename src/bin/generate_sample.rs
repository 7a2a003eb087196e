use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

use lexitab::data::writer::write_data;
use lexitab::{ColumnSpec, Dataset, Datatype, Descriptor, ForeignKey, Row, Table, TableRole, TableSpec, Value};

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

fn segments(s: &str) -> Value {
    Value::List(s.split(' ').map(string).collect())
}

fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn table(name: &str, primary_key: &str, columns: &[&str], rows: Vec<Row>) -> Table {
    let keys: BTreeSet<Value> = rows
        .iter()
        .filter_map(|r| r.get(primary_key).cloned())
        .collect();
    Table {
        name: name.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows,
        primary_key: Some(primary_key.to_string()),
        keys,
    }
}

fn column(name: &str, datatype: Datatype) -> ColumnSpec {
    ColumnSpec {
        name: name.to_string(),
        datatype,
        required: false,
        separator: None,
        references: None,
    }
}

fn descriptor() -> Descriptor {
    let id = || ColumnSpec {
        required: true,
        ..column("id", Datatype::String)
    };
    let reference = |name: &str, table: &str| ColumnSpec {
        references: Some(ForeignKey {
            table: table.to_string(),
            column: "id".to_string(),
        }),
        ..column(name, Datatype::String)
    };

    Descriptor {
        name: "numerals-sample".to_string(),
        tables: vec![
            TableSpec {
                name: "varieties".to_string(),
                file: PathBuf::from("varieties.csv"),
                role: Some(TableRole::Varieties),
                primary_key: Some("id".to_string()),
                delimiter: ",".to_string(),
                columns: vec![
                    id(),
                    column("name", Datatype::String),
                    column("glottocode", Datatype::String),
                    column("latitude", Datatype::Float),
                    column("longitude", Datatype::Float),
                ],
            },
            TableSpec {
                name: "concepts".to_string(),
                file: PathBuf::from("concepts.csv"),
                role: Some(TableRole::Concepts),
                primary_key: Some("id".to_string()),
                delimiter: ",".to_string(),
                columns: vec![
                    id(),
                    column("gloss", Datatype::String),
                    column("number_value", Datatype::Integer),
                ],
            },
            TableSpec {
                name: "lexemes".to_string(),
                file: PathBuf::from("lexemes.csv"),
                role: Some(TableRole::Lexemes),
                primary_key: Some("id".to_string()),
                delimiter: ",".to_string(),
                columns: vec![
                    id(),
                    reference("variety_id", "varieties"),
                    reference("concept_id", "concepts"),
                    ColumnSpec {
                        required: true,
                        ..column("form", Datatype::String)
                    },
                    ColumnSpec {
                        separator: Some(" ".to_string()),
                        ..column("segments", Datatype::String)
                    },
                ],
            },
        ],
    }
}

fn sample_dataset() -> Dataset {
    let varieties = table(
        "varieties",
        "id",
        &["id", "name", "glottocode", "latitude", "longitude"],
        vec![
            row(&[
                ("id", string("eng")),
                ("name", string("English")),
                ("glottocode", string("stan1293")),
                ("latitude", Value::Float(52.0)),
                ("longitude", Value::Float(-1.0)),
            ]),
            row(&[
                ("id", string("deu")),
                ("name", string("German")),
                ("glottocode", string("stan1295")),
                ("latitude", Value::Float(48.65)),
                ("longitude", Value::Float(12.47)),
            ]),
            row(&[
                ("id", string("spa")),
                ("name", string("Spanish")),
                ("glottocode", string("stan1288")),
                ("latitude", Value::Float(40.44)),
                ("longitude", Value::Float(-1.12)),
            ]),
        ],
    );

    let glosses = ["ONE", "TWO", "THREE", "FOUR", "FIVE"];
    let concepts = table(
        "concepts",
        "id",
        &["id", "gloss", "number_value"],
        glosses
            .iter()
            .enumerate()
            .map(|(i, gloss)| {
                row(&[
                    ("id", string(&gloss.to_lowercase())),
                    ("gloss", string(gloss)),
                    ("number_value", Value::Integer(i as i64 + 1)),
                ])
            })
            .collect(),
    );

    let forms: [(&str, &str, &str, &str); 15] = [
        ("eng", "one", "one", "w ʌ n"),
        ("eng", "two", "two", "t uː"),
        ("eng", "three", "three", "θ r iː"),
        ("eng", "four", "four", "f ɔː"),
        ("eng", "five", "five", "f aɪ v"),
        ("deu", "one", "eins", "aɪ n s"),
        ("deu", "two", "zwei", "ts v aɪ"),
        ("deu", "three", "drei", "d r aɪ"),
        ("deu", "four", "vier", "f iː ɐ"),
        ("deu", "five", "fünf", "f ʏ n f"),
        ("spa", "one", "uno", "u n o"),
        ("spa", "two", "dos", "d o s"),
        ("spa", "three", "tres", "t r e s"),
        ("spa", "four", "cuatro", "k w a t r o"),
        ("spa", "five", "cinco", "s i n k o"),
    ];
    let lexemes = table(
        "lexemes",
        "id",
        &["id", "variety_id", "concept_id", "form", "segments"],
        forms
            .iter()
            .enumerate()
            .map(|(i, (variety, concept, form, segs))| {
                row(&[
                    ("id", string(&format!("lex-{}", i + 1))),
                    ("variety_id", string(variety)),
                    ("concept_id", string(concept)),
                    ("form", string(form)),
                    ("segments", segments(segs)),
                ])
            })
            .collect(),
    );

    Dataset::from_tables(descriptor(), vec![varieties, concepts, lexemes])
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));

    let dataset = sample_dataset();
    write_data(&dataset, &out_dir).context("writing sample data files")?;

    let descriptor_path = out_dir.join("descriptor.json");
    let json = serde_json::to_string_pretty(&dataset.descriptor)?;
    std::fs::write(&descriptor_path, json)
        .with_context(|| format!("writing {}", descriptor_path.display()))?;

    let rows: usize = dataset.tables.values().map(|t| t.len()).sum();
    println!(
        "Wrote {} tables ({rows} rows) to {}",
        dataset.len(),
        out_dir.display()
    );
    Ok(())
}
