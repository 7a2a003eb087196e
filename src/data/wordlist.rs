use std::collections::BTreeMap;

use thiserror::Error;

use super::model::{Dataset, Row, Table, Value};
use super::schema::TableRole;

// ---------------------------------------------------------------------------
// Wordlist – structural view over the role tables
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum WordlistError {
    #[error("no table declares role '{0}'")]
    MissingRole(TableRole),

    #[error("table '{table}' has no foreign key into '{target}'")]
    MissingLink { table: String, target: String },
}

/// Index over the conventional wordlist tables of a loaded dataset: which
/// lexemes belong to a variety, and which attest a concept in a variety.
/// Purely structural; built from the foreign keys the descriptor declares.
#[derive(Debug)]
pub struct Wordlist<'a> {
    pub varieties: &'a Table,
    pub concepts: &'a Table,
    pub lexemes: &'a Table,
    /// Lexeme column linking to the varieties table.
    pub variety_column: String,
    /// Lexeme column linking to the concepts table.
    pub concept_column: String,
    /// Lexeme row indices per variety key.
    by_variety: BTreeMap<Value, Vec<usize>>,
    /// Lexeme row indices per (variety key, concept key).
    by_slot: BTreeMap<(Value, Value), Vec<usize>>,
}

impl<'a> Wordlist<'a> {
    /// Resolve the role tables and build the lexeme indices.
    pub fn from_dataset(dataset: &'a Dataset) -> Result<Self, WordlistError> {
        let varieties = role_table(dataset, TableRole::Varieties)?;
        let concepts = role_table(dataset, TableRole::Concepts)?;
        let lexemes = role_table(dataset, TableRole::Lexemes)?;

        let variety_column = link_column(dataset, &lexemes.name, &varieties.name)?;
        let concept_column = link_column(dataset, &lexemes.name, &concepts.name)?;

        let mut by_variety: BTreeMap<Value, Vec<usize>> = BTreeMap::new();
        let mut by_slot: BTreeMap<(Value, Value), Vec<usize>> = BTreeMap::new();
        for (i, row) in lexemes.rows.iter().enumerate() {
            let variety = match row.get(&variety_column) {
                Some(v) if !v.is_null() => v,
                _ => continue,
            };
            by_variety.entry(variety.clone()).or_default().push(i);
            if let Some(concept) = row.get(&concept_column) {
                if !concept.is_null() {
                    by_slot
                        .entry((variety.clone(), concept.clone()))
                        .or_default()
                        .push(i);
                }
            }
        }

        Ok(Wordlist {
            varieties,
            concepts,
            lexemes,
            variety_column,
            concept_column,
            by_variety,
            by_slot,
        })
    }

    /// All lexeme rows of one variety, in file order.
    pub fn variety_lexemes(&self, variety: &Value) -> Vec<&Row> {
        self.rows(self.by_variety.get(variety))
    }

    /// The lexeme rows attesting `concept` in `variety`, in file order.
    pub fn slot_lexemes(&self, variety: &Value, concept: &Value) -> Vec<&Row> {
        self.rows(self.by_slot.get(&(variety.clone(), concept.clone())))
    }

    fn rows(&self, indices: Option<&Vec<usize>>) -> Vec<&Row> {
        indices
            .map(|idxs| idxs.iter().map(|&i| &self.lexemes.rows[i]).collect())
            .unwrap_or_default()
    }
}

/// The loaded table declaring `role`.
fn role_table(dataset: &Dataset, role: TableRole) -> Result<&Table, WordlistError> {
    let spec = dataset
        .descriptor
        .table_with_role(role)
        .ok_or(WordlistError::MissingRole(role))?;
    dataset
        .table(&spec.name)
        .ok_or(WordlistError::MissingRole(role))
}

/// The lexeme column whose foreign key points at `target`.
fn link_column(dataset: &Dataset, lexemes: &str, target: &str) -> Result<String, WordlistError> {
    let missing = || WordlistError::MissingLink {
        table: lexemes.to_string(),
        target: target.to_string(),
    };
    let spec = dataset.descriptor.table(lexemes).ok_or_else(missing)?;
    spec.columns
        .iter()
        .find(|c| c.references.as_ref().is_some_and(|fk| fk.table == target))
        .map(|c| c.name.clone())
        .ok_or_else(missing)
}
