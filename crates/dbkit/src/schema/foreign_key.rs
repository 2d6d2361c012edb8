use super::ident::{ConstraintName, quote, require};
use crate::error::DbiResult;

const DEFINITION: &str = "ForeignKeyDefinition";

/// A single-column foreign key constraint.
///
/// The default identifier is `fk_<table>_<column>_<foreign_table>_<foreign_column>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDefinition {
    table: String,
    column: String,
    foreign_table: String,
    foreign_column: String,
    on_delete: Option<String>,
    on_update: Option<String>,
    name: ConstraintName,
}

impl ForeignKeyDefinition {
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> DbiResult<Self> {
        let table = require(DEFINITION, "table", table)?;
        let column = require(DEFINITION, "column", column)?;
        let foreign_table = require(DEFINITION, "foreign table", foreign_table)?;
        let foreign_column = require(DEFINITION, "foreign column", foreign_column)?;
        let name = ConstraintName::new(default_identifier(
            &table,
            &column,
            &foreign_table,
            &foreign_column,
        ));
        Ok(Self {
            table,
            column,
            foreign_table,
            foreign_column,
            on_delete: None,
            on_update: None,
            name,
        })
    }

    /// Referential action for `ON DELETE`, e.g. `CASCADE` or `SET NULL`.
    pub fn on_delete(&mut self, action: impl Into<String>) -> &mut Self {
        self.on_delete = non_empty(action.into());
        self
    }

    /// Referential action for `ON UPDATE`.
    pub fn on_update(&mut self, action: impl Into<String>) -> &mut Self {
        self.on_update = non_empty(action.into());
        self
    }

    /// Override the constraint name.
    pub fn with_identifier(&mut self, name: impl Into<String>) -> &mut Self {
        self.name.set(name);
        self
    }

    pub fn identifier(&self) -> &str {
        self.name.as_str()
    }

    /// Move the key to another owning table. The derived identifier follows;
    /// an override is kept.
    pub(crate) fn retarget(&mut self, table: &str) {
        self.table = table.to_string();
        self.name.set_default(default_identifier(
            &self.table,
            &self.column,
            &self.foreign_table,
            &self.foreign_column,
        ));
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn foreign_table(&self) -> &str {
        &self.foreign_table
    }

    pub fn foreign_column(&self) -> &str {
        &self.foreign_column
    }

    pub fn on_delete_action(&self) -> Option<&str> {
        self.on_delete.as_deref()
    }

    pub fn on_update_action(&self) -> Option<&str> {
        self.on_update.as_deref()
    }

    pub fn to_sql(&self) -> String {
        let mut sql = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            quote(self.identifier()),
            quote(&self.column),
            quote(&self.foreign_table),
            quote(&self.foreign_column),
        );
        if let Some(action) = &self.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action);
        }
        if let Some(action) = &self.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action);
        }
        sql
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn default_identifier(
    table: &str,
    column: &str,
    foreign_table: &str,
    foreign_column: &str,
) -> String {
    format!("fk_{table}_{column}_{foreign_table}_{foreign_column}")
}
