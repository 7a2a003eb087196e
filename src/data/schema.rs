use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Descriptor – the dataset's schema declaration
// ---------------------------------------------------------------------------

/// Schema descriptor, parsed from the dataset's JSON metadata file.
/// Declares every table, the file holding its rows, its columns, and the
/// foreign-key links between tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Dataset name, used in log output.
    pub name: String,
    /// Declared tables, in declaration order.
    pub tables: Vec<TableSpec>,
}

impl Descriptor {
    /// Look up a table declaration by name.
    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// The table declaration carrying the given wordlist role, if any.
    pub fn table_with_role(&self, role: TableRole) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.role == Some(role))
    }
}

// ---------------------------------------------------------------------------
// TableSpec / ColumnSpec
// ---------------------------------------------------------------------------

/// One table declaration: where its rows live and what shape they have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    /// Data file path, relative to the descriptor's directory.
    pub file: PathBuf,
    /// Wordlist role of this table, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<TableRole>,
    /// Column whose values must be unique and non-null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    /// Field delimiter of the data file. Must be a single byte; tab-separated
    /// files declare "\t".
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    pub columns: Vec<ColumnSpec>,
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl TableSpec {
    /// Look up a column declaration by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The declared delimiter as a single byte, or `None` if it isn't one.
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [b] => Some(*b),
            _ => None,
        }
    }
}

/// One column declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub datatype: Datatype,
    /// Empty cells in a required column fail the load.
    #[serde(default)]
    pub required: bool,
    /// When set, cells are split on this separator into a list value before
    /// datatype coercion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    /// Foreign key: values must match a primary key in the referenced table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ForeignKey>,
}

/// Semantic type a cell is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    String,
    Integer,
    Float,
    Boolean,
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Datatype::String => "string",
            Datatype::Integer => "integer",
            Datatype::Float => "float",
            Datatype::Boolean => "boolean",
        };
        write!(f, "{s}")
    }
}

/// Link from a column to the primary-key column of another table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

/// Conventional wordlist roles, used to build the [`super::wordlist::Wordlist`]
/// view over a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableRole {
    Varieties,
    Concepts,
    Lexemes,
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TableRole::Varieties => "varieties",
            TableRole::Concepts => "concepts",
            TableRole::Lexemes => "lexemes",
        };
        write!(f, "{s}")
    }
}
