//! WHERE / HAVING condition lists.

use std::fmt;

use super::handler::BuildHandler;
use crate::statement::{Field, Operand, Statement};

/// How a condition joins the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `field operator value` triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: Statement,
    pub operator: String,
    pub value: Statement,
    pub connector: Connector,
}

impl Condition {
    fn render(&self, out: &mut BuildHandler) {
        out.push_statement(&self.field);
        out.add_to_query(" ");
        out.add_to_query(&self.operator);
        out.add_to_query(" ");
        out.push_statement(&self.value);
    }
}

/// A top-level entry: a flat condition or a parenthesized group.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionEntry {
    Single(Condition),
    Group {
        conditions: Vec<Condition>,
        connector: Connector,
    },
}

impl ConditionEntry {
    fn connector(&self) -> Connector {
        match self {
            ConditionEntry::Single(c) => c.connector,
            ConditionEntry::Group { connector, .. } => *connector,
        }
    }
}

/// Ordered WHERE or HAVING entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionList {
    entries: Vec<ConditionEntry>,
}

impl ConditionList {
    pub fn push(&mut self, condition: Condition) {
        self.entries.push(ConditionEntry::Single(condition));
    }

    pub fn push_group(&mut self, conditions: Vec<Condition>, connector: Connector) {
        self.entries.push(ConditionEntry::Group {
            conditions,
            connector,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ConditionEntry] {
        &self.entries
    }

    /// Render ` KEYWORD cond [CONN cond | CONN  ( cond CONN cond )]...`.
    ///
    /// The first top-level entry drops its connector; inside a group only the
    /// first condition drops it.
    pub(crate) fn render(&self, keyword: &str, out: &mut BuildHandler) {
        if self.entries.is_empty() {
            return;
        }
        out.add_to_query(" ");
        out.add_to_query(keyword);

        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.add_to_query(" ");
                out.add_to_query(entry.connector().as_str());
            }
            out.add_to_query(" ");

            match entry {
                ConditionEntry::Single(condition) => condition.render(out),
                ConditionEntry::Group { conditions, .. } => {
                    out.add_to_query(" ( ");
                    for (j, condition) in conditions.iter().enumerate() {
                        if j > 0 {
                            out.add_to_query(" ");
                            out.add_to_query(condition.connector.as_str());
                            out.add_to_query(" ");
                        }
                        condition.render(out);
                    }
                    out.add_to_query(" )");
                }
            }
        }
    }
}

/// Scoped collector handed to `where_group` / `having_group` callbacks.
///
/// Only flat conditions can be added, so groups nest exactly one level deep.
pub struct ConditionGroup<'a> {
    handler: &'a BuildHandler,
    conditions: Vec<Condition>,
}

impl<'a> ConditionGroup<'a> {
    pub(crate) fn new(handler: &'a BuildHandler) -> Self {
        Self {
            handler,
            conditions: Vec::new(),
        }
    }

    /// Add a condition joined with `AND`.
    pub fn and_where(
        &mut self,
        field: impl Into<Field>,
        operator: &str,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.push(field.into(), operator, value.into(), Connector::And)
    }

    /// Add a condition joined with `OR`.
    pub fn or_where(
        &mut self,
        field: impl Into<Field>,
        operator: &str,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.push(field.into(), operator, value.into(), Connector::Or)
    }

    /// Add a condition with an explicit connector.
    pub fn where_with(
        &mut self,
        field: impl Into<Field>,
        operator: &str,
        value: impl Into<Operand>,
        connector: Connector,
    ) -> &mut Self {
        self.push(field.into(), operator, value.into(), connector)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn push(
        &mut self,
        field: Field,
        operator: &str,
        value: Operand,
        connector: Connector,
    ) -> &mut Self {
        let condition = make_condition(self.handler, field, operator, value, connector);
        self.conditions.push(condition);
        self
    }

    pub(crate) fn into_conditions(self) -> Vec<Condition> {
        self.conditions
    }
}

pub(crate) fn make_condition(
    handler: &BuildHandler,
    field: Field,
    operator: &str,
    value: Operand,
    connector: Connector,
) -> Condition {
    Condition {
        field: handler.column_statement(field),
        operator: operator.to_string(),
        value: handler.value_statement(value),
        connector,
    }
}
