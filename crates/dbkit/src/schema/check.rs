use super::ident::{ConstraintName, quote, require};
use crate::error::DbiResult;

const DEFINITION: &str = "CheckDefinition";

/// A `CHECK` constraint.
///
/// `expression` is the full condition without surrounding parentheses, e.g.
/// ``"`age` >= 0 AND `age` <= 150"``. The column only names the constraint:
/// the default identifier is `chk_<column>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckDefinition {
    column: String,
    expression: String,
    name: ConstraintName,
}

impl CheckDefinition {
    pub fn new(column: impl Into<String>, expression: impl Into<String>) -> DbiResult<Self> {
        let column = require(DEFINITION, "column", column)?;
        let expression = require(DEFINITION, "expression", expression)?;
        let name = ConstraintName::new(Self::default_identifier(&column));
        Ok(Self {
            column,
            expression,
            name,
        })
    }

    /// The identifier a check on `column` gets unless overridden.
    pub fn default_identifier(column: &str) -> String {
        format!("chk_{column}")
    }

    pub fn with_identifier(&mut self, name: impl Into<String>) -> &mut Self {
        self.name.set(name);
        self
    }

    pub fn identifier(&self) -> &str {
        self.name.as_str()
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn to_sql(&self) -> String {
        format!(
            "CONSTRAINT {} CHECK ({})",
            quote(self.identifier()),
            self.expression
        )
    }
}
