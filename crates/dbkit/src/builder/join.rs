use std::str::FromStr;

use super::handler::{BuildHandler, SqlBuilder};
use crate::error::{DbiError, DbiResult};

/// Types of SQL joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl JoinType {
    /// Get the SQL keyword for this join type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
        }
    }
}

impl FromStr for JoinType {
    type Err = DbiError;

    /// Accepts `left`, `right` or `inner`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(JoinType::Left),
            "right" => Ok(JoinType::Right),
            "inner" => Ok(JoinType::Inner),
            other => Err(DbiError::UnknownJoinType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OnCondition {
    left: String,
    operator: String,
    right: String,
    prefix: bool,
}

/// Renders `<TYPE> JOIN `table` [AS `alias`] [ON a = b [AND c = d ...]]`.
///
/// ON sides are column references, never parameters. A side containing `.` is
/// split into `` `table`.`column` ``; a bare side is prefixed with the joined
/// table unless prefixing was turned off for that condition.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinBuilder {
    handler: BuildHandler,
    join_type: JoinType,
    alias: Option<String>,
    on: Vec<OnCondition>,
}

impl JoinBuilder {
    pub fn new(table: impl Into<String>, join_type: JoinType) -> Self {
        let mut handler = BuildHandler::new();
        handler.set_table(table);
        Self {
            handler,
            join_type,
            alias: None,
            on: Vec::new(),
        }
    }

    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.handler.set_table(table);
        self
    }

    /// Set the join type from its keyword (`left`, `right`, `inner`).
    pub fn set_type(&mut self, join_type: &str) -> DbiResult<&mut Self> {
        self.join_type = join_type.parse()?;
        Ok(self)
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    /// Add an ON condition; bare column names are prefixed with the joined table.
    pub fn on(&mut self, field: &str, operator: &str, value: &str) -> &mut Self {
        self.on_with(field, operator, value, true)
    }

    /// Add an ON condition, optionally leaving bare names unprefixed.
    pub fn on_with(&mut self, field: &str, operator: &str, value: &str, prefix: bool) -> &mut Self {
        self.on.push(OnCondition {
            left: field.to_string(),
            operator: operator.to_string(),
            right: value.to_string(),
            prefix,
        });
        self
    }

    /// Alias the joined table: `AS `alias``.
    pub fn alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.alias = Some(alias.into());
        self
    }

    fn side(&self, side: &str, prefix: bool) -> String {
        if prefix || side.contains('.') {
            self.handler.with_table_prefix(side)
        } else {
            BuildHandler::quote(side)
        }
    }
}

impl SqlBuilder for JoinBuilder {
    fn build(&mut self) -> DbiResult<()> {
        let mut sql = format!(
            "{} JOIN {}",
            self.join_type.as_str(),
            BuildHandler::quote(self.handler.table())
        );
        if let Some(alias) = &self.alias {
            sql.push_str(" AS ");
            sql.push_str(&BuildHandler::quote(alias));
        }

        if !self.on.is_empty() {
            let conditions: Vec<String> = self
                .on
                .iter()
                .map(|c| {
                    format!(
                        "{} {} {}",
                        self.side(&c.left, c.prefix),
                        c.operator,
                        self.side(&c.right, c.prefix)
                    )
                })
                .collect();
            sql.push_str(" ON ");
            sql.push_str(&conditions.join(" AND "));
        }

        self.handler.add_to_query(&sql);
        Ok(())
    }

    fn handler(&self) -> &BuildHandler {
        &self.handler
    }
}
