pub mod data;

pub use data::loader::{load, LoadError};
pub use data::model::{Dataset, Row, Table, Value};
pub use data::schema::{ColumnSpec, Datatype, Descriptor, ForeignKey, TableRole, TableSpec};
pub use data::wordlist::{Wordlist, WordlistError};
pub use data::writer::{write_data, WriteError};
