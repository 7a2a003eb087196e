use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::schema::Descriptor;

// ---------------------------------------------------------------------------
// Value – a single cell in a data table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, coerced from text by the loader according
/// to the column's declared datatype. Using `BTreeMap` / `BTreeSet` for key
/// indices downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Produced by columns declaring a `separator`.
    List(Vec<Value>),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                List(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (List(a), List(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::List(items) => {
                for item in items {
                    item.hash(state);
                }
            }
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Null => Ok(()),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Row / Table – one data file, fully typed
// ---------------------------------------------------------------------------

/// A single data row: column name → value.
pub type Row = BTreeMap<String, Value>;

/// One loaded table with its key index.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    /// Declared column names, in descriptor order.
    pub columns: Vec<String>,
    /// Rows in file order.
    pub rows: Vec<Row>,
    /// Primary-key column, when the descriptor declares one.
    pub primary_key: Option<String>,
    /// Set of primary-key values (empty when no key is declared).
    pub keys: BTreeSet<Value>,
}

impl Table {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `value` is one of this table's primary-key values.
    pub fn contains_key(&self, value: &Value) -> bool {
        self.keys.contains(value)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset: descriptor plus one table per declaration.
/// Built once by the loader and not mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub descriptor: Descriptor,
    /// Tables by name.
    pub tables: BTreeMap<String, Table>,
}

impl Dataset {
    /// Assemble a dataset from loaded tables.
    pub fn from_tables(descriptor: Descriptor, tables: Vec<Table>) -> Self {
        let tables = tables.into_iter().map(|t| (t.name.clone(), t)).collect();
        Dataset { descriptor, tables }
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the dataset has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
