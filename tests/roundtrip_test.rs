use std::fs;

use tempfile::TempDir;

use lexitab::{load, write_data};

const DESCRIPTOR: &str = r#"{
    "name": "numerals",
    "tables": [
        {
            "name": "varieties",
            "file": "varieties.csv",
            "primary_key": "id",
            "columns": [
                { "name": "id", "datatype": "string" },
                { "name": "name", "datatype": "string" },
                { "name": "latitude", "datatype": "float" },
                { "name": "attested", "datatype": "boolean" }
            ]
        },
        {
            "name": "lexemes",
            "file": "lexemes.tsv",
            "primary_key": "id",
            "delimiter": "\t",
            "columns": [
                { "name": "id", "datatype": "string" },
                { "name": "variety_id", "datatype": "string",
                  "references": { "table": "varieties", "column": "id" } },
                { "name": "form", "datatype": "string" },
                { "name": "number_value", "datatype": "integer" },
                { "name": "segments", "datatype": "string", "separator": " " }
            ]
        }
    ]
}"#;

const VARIETIES: &str = "\
id,name,latitude,attested
eng,English,52.5,true
deu,German,48.65,false
ltz,Luxembourgish,,true
";

const LEXEMES: &str = "\
id\tvariety_id\tform\tnumber_value\tsegments
l1\teng\tone\t1\tw ʌ n
l2\tdeu\tzwei\t2\tts v aɪ
l3\tltz\tdräi\t3\t
l4\t\tfünf\t5\tf ʏ n f
";

#[test]
fn reserialized_dataset_reloads_identically() {
    let src = TempDir::new().unwrap();
    let descriptor_path = src.path().join("descriptor.json");
    fs::write(&descriptor_path, DESCRIPTOR).unwrap();
    fs::write(src.path().join("varieties.csv"), VARIETIES).unwrap();
    fs::write(src.path().join("lexemes.tsv"), LEXEMES).unwrap();

    let first = load(&descriptor_path).unwrap();
    assert_eq!(first.table("varieties").unwrap().len(), 3);
    assert_eq!(first.table("lexemes").unwrap().len(), 4);

    let out = TempDir::new().unwrap();
    write_data(&first, out.path()).unwrap();
    let copy = out.path().join("descriptor.json");
    fs::write(&copy, DESCRIPTOR).unwrap();

    let second = load(&copy).unwrap();
    assert_eq!(first, second);
}

#[test]
fn roundtrip_preserves_row_order() {
    let src = TempDir::new().unwrap();
    let descriptor_path = src.path().join("descriptor.json");
    fs::write(&descriptor_path, DESCRIPTOR).unwrap();
    fs::write(src.path().join("varieties.csv"), VARIETIES).unwrap();
    fs::write(src.path().join("lexemes.tsv"), LEXEMES).unwrap();

    let first = load(&descriptor_path).unwrap();
    let out = TempDir::new().unwrap();
    write_data(&first, out.path()).unwrap();
    fs::write(out.path().join("descriptor.json"), DESCRIPTOR).unwrap();
    let second = load(&out.path().join("descriptor.json")).unwrap();

    let names = |ds: &lexitab::Dataset| -> Vec<String> {
        ds.table("varieties")
            .unwrap()
            .rows
            .iter()
            .map(|r| r.get("id").unwrap().to_string())
            .collect()
    };
    assert_eq!(names(&first), vec!["eng", "deu", "ltz"]);
    assert_eq!(names(&first), names(&second));
}
