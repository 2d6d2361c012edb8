use super::ident::{ConstraintName, IntoColumns, quote, quote_list, require_columns};
use crate::error::DbiResult;

/// A (possibly composite) unique constraint.
///
/// The default identifier is `uq_` followed by the column names joined with `_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueDefinition {
    columns: Vec<String>,
    name: ConstraintName,
}

impl UniqueDefinition {
    pub fn new(columns: impl IntoColumns) -> DbiResult<Self> {
        let columns = require_columns("UniqueDefinition", columns.into_columns())?;
        let name = ConstraintName::new(format!("uq_{}", columns.join("_")));
        Ok(Self { columns, name })
    }

    pub fn with_identifier(&mut self, name: impl Into<String>) -> &mut Self {
        self.name.set(name);
        self
    }

    pub fn identifier(&self) -> &str {
        self.name.as_str()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }

    pub fn to_sql(&self) -> String {
        format!(
            "CONSTRAINT {} UNIQUE ({})",
            quote(self.identifier()),
            quote_list(&self.columns)
        )
    }
}
