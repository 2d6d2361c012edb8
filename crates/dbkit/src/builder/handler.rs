use crate::error::DbiResult;
use crate::schema::ident;
use crate::statement::{Field, Operand, Statement};
use crate::value::Value;

/// Shared accumulator for every builder.
///
/// Holds the working table, an append-only SQL buffer and an append-only
/// parameter list. Text and parameters must be appended in lockstep: the Nth
/// `?` in [`query`](Self::query) binds to the Nth entry of
/// [`parameters`](Self::parameters).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildHandler {
    table: String,
    query: String,
    parameters: Vec<Value>,
}

impl BuildHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working table (also the prefix for bare column names).
    pub fn set_table(&mut self, table: impl Into<String>) {
        self.table = table.into();
    }

    /// The working table, empty until set.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn has_table(&self) -> bool {
        !self.table.is_empty()
    }

    /// Wrap a single token in backticks.
    pub fn quote(token: &str) -> String {
        ident::quote(token)
    }

    /// Quote `column` as `` `table`.`column` ``.
    ///
    /// Splits on the first `.`; without one, the working table is used.
    pub fn with_table_prefix(&self, column: &str) -> String {
        let (table, column) = column
            .split_once('.')
            .unwrap_or((self.table.as_str(), column));
        let mut out = ident::quote(table);
        out.push('.');
        out.push_str(&ident::quote(column));
        out
    }

    /// Turn a field into a fragment: raw passes through, names are prefixed.
    pub fn column_statement(&self, field: Field) -> Statement {
        match field {
            Field::Raw(raw) => Statement::Raw(raw),
            Field::Name(name) => Statement::Column(self.with_table_prefix(&name)),
        }
    }

    /// Turn an operand into a fragment: raw passes through, values are bound.
    pub fn value_statement(&self, operand: Operand) -> Statement {
        match operand {
            Operand::Raw(raw) => Statement::Raw(raw),
            Operand::Value(value) => Statement::Param(value),
        }
    }

    /// Append raw SQL text. Any `?` it contains needs a matching parameter.
    pub fn add_to_query(&mut self, sql: &str) {
        self.query.push_str(sql);
    }

    /// Append one bound parameter.
    pub fn add_parameter(&mut self, value: Value) {
        self.parameters.push(value);
    }

    pub fn add_parameters<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.parameters.extend(values);
    }

    /// Append a fragment's text and its bindings together.
    pub fn push_statement(&mut self, statement: &Statement) {
        self.query.push_str(statement.text());
        self.parameters.extend_from_slice(statement.bindings());
    }

    /// Merge another builder's output, prefixed with `separator`.
    pub fn merge(&mut self, separator: &str, other: &BuildHandler) {
        self.query.push_str(separator);
        self.query.push_str(&other.query);
        self.parameters.extend_from_slice(&other.parameters);
    }

    /// The SQL rendered so far.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Parameters appended so far, in placeholder order.
    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }
}

/// Base trait for builders that render into a [`BuildHandler`].
pub trait SqlBuilder {
    /// Render into the handler's buffer.
    ///
    /// Builders are single-use: a second call appends again.
    fn build(&mut self) -> DbiResult<()>;

    fn handler(&self) -> &BuildHandler;

    /// The rendered SQL.
    fn query(&self) -> &str {
        self.handler().query()
    }

    /// The bound parameters, in placeholder order.
    fn parameters(&self) -> &[Value] {
        self.handler().parameters()
    }

    /// The working table.
    fn table_name(&self) -> &str {
        self.handler().table()
    }
}
