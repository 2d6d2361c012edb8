use super::condition::{ConditionGroup, ConditionList, Connector, make_condition};
use super::handler::{BuildHandler, SqlBuilder};
use super::join::{JoinBuilder, JoinType};
use super::table::TableBuilder;
use crate::config::TableOptions;
use crate::error::{DbiError, DbiResult};
use crate::statement::{Field, Operand, Raw, Statement};

/// Which DDL statement a builder renders instead of a SELECT.
#[derive(Debug, Clone, PartialEq)]
enum Intent {
    Create(TableBuilder),
    Alter(TableBuilder),
    Drop,
    Rename(String),
}

impl Intent {
    fn name(&self) -> &'static str {
        match self {
            Intent::Create(_) => "create",
            Intent::Alter(_) => "alter",
            Intent::Drop => "drop",
            Intent::Rename(_) => "rename",
        }
    }
}

/// Fluent SQL builder for one statement.
///
/// Either a SELECT (any select column set) or exactly one of
/// create/alter/drop/rename. Requesting a second DDL intent, or mixing one with
/// a select list, fails with [`DbiError::ConflictingIntent`].
///
/// SELECT clauses always render in the order
/// `SELECT .. FROM .. JOIN .. WHERE .. GROUP BY .. HAVING .. ORDER BY .. LIMIT .. OFFSET ..`
/// regardless of call order.
///
/// # Example
/// ```
/// use dbkit::builder::{QueryBuilder, SqlBuilder};
///
/// let mut qb = QueryBuilder::new();
/// qb.table("users")
///     .select_all(None)
///     .and_where("status", "=", "active")
///     .order_by("name", "ASC")
///     .limit(10);
/// qb.build()?;
///
/// assert_eq!(
///     qb.query(),
///     "SELECT `users`.* FROM `users` WHERE `users`.`status` = ? ORDER BY `users`.`name` ASC LIMIT ?"
/// );
/// assert_eq!(qb.parameters().len(), 2);
/// # Ok::<(), dbkit::DbiError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    handler: BuildHandler,
    select: Vec<Statement>,
    joins: Vec<JoinBuilder>,
    wheres: ConditionList,
    group_by: Vec<Statement>,
    having: ConditionList,
    order_by: Vec<(Statement, String)>,
    limit: Option<Statement>,
    offset: Option<Statement>,
    intent: Option<Intent>,
    options: TableOptions,
    triggers: Vec<String>,
    built: bool,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working table.
    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.handler.set_table(table);
        self
    }

    /// Install `CREATE TABLE` options.
    pub fn table_options(&mut self, options: TableOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    // ==================== SELECT list ====================

    /// Add a column (prefixed with the working table) or a raw expression.
    pub fn select(&mut self, column: impl Into<Field>) -> &mut Self {
        let stmt = self.handler.column_statement(column.into());
        self.select.push(stmt);
        self
    }

    /// Add `` `table`.* ``, defaulting to the working table.
    pub fn select_all(&mut self, table: Option<&str>) -> &mut Self {
        let table = BuildHandler::quote(table.unwrap_or(self.handler.table()));
        self.select.push(Statement::Raw(Raw::new(format!("{table}.*"))));
        self
    }

    /// Add `<expr> AS alias`.
    pub fn select_as(&mut self, column: impl Into<Field>, alias: &str) -> &mut Self {
        let stmt = self.handler.column_statement(column.into());
        let raw = Raw::with_bindings(
            format!("{} AS {alias}", stmt.text()),
            stmt.bindings().iter().cloned(),
        );
        self.select.push(Statement::Raw(raw));
        self
    }

    // ==================== Joins ====================

    pub fn inner_join(&mut self, table: &str) -> &mut JoinBuilder {
        self.join(JoinType::Inner, table)
    }

    pub fn left_join(&mut self, table: &str) -> &mut JoinBuilder {
        self.join(JoinType::Left, table)
    }

    pub fn right_join(&mut self, table: &str) -> &mut JoinBuilder {
        self.join(JoinType::Right, table)
    }

    /// One join per table: a repeated request returns the existing builder.
    fn join(&mut self, join_type: JoinType, table: &str) -> &mut JoinBuilder {
        let index = match self.joins.iter().position(|j| j.table_name() == table) {
            Some(index) => index,
            None => {
                self.joins.push(JoinBuilder::new(table, join_type));
                self.joins.len() - 1
            }
        };
        &mut self.joins[index]
    }

    // ==================== WHERE ====================

    pub fn and_where(
        &mut self,
        field: impl Into<Field>,
        operator: &str,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.where_with(field, operator, value, Connector::And)
    }

    pub fn or_where(
        &mut self,
        field: impl Into<Field>,
        operator: &str,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.where_with(field, operator, value, Connector::Or)
    }

    pub fn where_with(
        &mut self,
        field: impl Into<Field>,
        operator: &str,
        value: impl Into<Operand>,
        connector: Connector,
    ) -> &mut Self {
        let condition = make_condition(
            &self.handler,
            field.into(),
            operator,
            value.into(),
            connector,
        );
        self.wheres.push(condition);
        self
    }

    /// Add a parenthesized group joined with `AND`.
    pub fn and_where_group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut ConditionGroup<'_>),
    {
        self.where_group(Connector::And, f)
    }

    /// Add a parenthesized group joined with `OR`.
    pub fn or_where_group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut ConditionGroup<'_>),
    {
        self.where_group(Connector::Or, f)
    }

    /// Add a parenthesized group of conditions collected by `f`.
    ///
    /// Empty groups are dropped.
    pub fn where_group<F>(&mut self, connector: Connector, f: F) -> &mut Self
    where
        F: FnOnce(&mut ConditionGroup<'_>),
    {
        let mut group = ConditionGroup::new(&self.handler);
        f(&mut group);
        let conditions = group.into_conditions();
        if !conditions.is_empty() {
            self.wheres.push_group(conditions, connector);
        }
        self
    }

    // ==================== GROUP BY / HAVING ====================

    pub fn group_by(&mut self, column: impl Into<Field>) -> &mut Self {
        let stmt = self.handler.column_statement(column.into());
        self.group_by.push(stmt);
        self
    }

    pub fn and_having(
        &mut self,
        field: impl Into<Field>,
        operator: &str,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.having_with(field, operator, value, Connector::And)
    }

    pub fn or_having(
        &mut self,
        field: impl Into<Field>,
        operator: &str,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.having_with(field, operator, value, Connector::Or)
    }

    pub fn having_with(
        &mut self,
        field: impl Into<Field>,
        operator: &str,
        value: impl Into<Operand>,
        connector: Connector,
    ) -> &mut Self {
        let condition = make_condition(
            &self.handler,
            field.into(),
            operator,
            value.into(),
            connector,
        );
        self.having.push(condition);
        self
    }

    pub fn and_having_group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut ConditionGroup<'_>),
    {
        self.having_group(Connector::And, f)
    }

    pub fn or_having_group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut ConditionGroup<'_>),
    {
        self.having_group(Connector::Or, f)
    }

    pub fn having_group<F>(&mut self, connector: Connector, f: F) -> &mut Self
    where
        F: FnOnce(&mut ConditionGroup<'_>),
    {
        let mut group = ConditionGroup::new(&self.handler);
        f(&mut group);
        let conditions = group.into_conditions();
        if !conditions.is_empty() {
            self.having.push_group(conditions, connector);
        }
        self
    }

    // ==================== ORDER BY / LIMIT ====================

    /// Order by a column. Ordering the same column again replaces the earlier
    /// entry (the new one moves to the end).
    pub fn order_by(&mut self, column: impl Into<Field>, direction: &str) -> &mut Self {
        let stmt = self.handler.column_statement(column.into());
        self.order_by.retain(|(existing, _)| existing.text() != stmt.text());
        self.order_by.push((stmt, direction.to_string()));
        self
    }

    pub fn limit(&mut self, limit: impl Into<Operand>) -> &mut Self {
        self.limit = Some(self.handler.value_statement(limit.into()));
        self
    }

    /// Only rendered together with a limit.
    pub fn offset(&mut self, offset: impl Into<Operand>) -> &mut Self {
        self.offset = Some(self.handler.value_statement(offset.into()));
        self
    }

    // ==================== DDL ====================

    /// Render `CREATE TABLE` with the fragments configured by `f`.
    ///
    /// The working table must be set first; `f` runs immediately.
    pub fn create<F>(&mut self, f: F) -> DbiResult<&mut Self>
    where
        F: FnOnce(&mut TableBuilder) -> DbiResult<()>,
    {
        self.claim_intent("create")?;
        let table = self.table_builder(false, f)?;
        self.intent = Some(Intent::Create(table));
        Ok(self)
    }

    /// Render `ALTER TABLE` with the fragments configured by `f`.
    pub fn alter<F>(&mut self, f: F) -> DbiResult<&mut Self>
    where
        F: FnOnce(&mut TableBuilder) -> DbiResult<()>,
    {
        self.claim_intent("alter")?;
        let table = self.table_builder(true, f)?;
        self.intent = Some(Intent::Alter(table));
        Ok(self)
    }

    /// Render `DROP TABLE`.
    pub fn drop_table(&mut self) -> DbiResult<&mut Self> {
        self.claim_intent("drop")?;
        self.intent = Some(Intent::Drop);
        Ok(self)
    }

    /// Render `RENAME TABLE .. TO ..`.
    pub fn rename(&mut self, new_name: &str) -> DbiResult<&mut Self> {
        if new_name.is_empty() {
            return Err(DbiError::missing_field("RenameTable", "new name"));
        }
        self.claim_intent("rename")?;
        self.intent = Some(Intent::Rename(new_name.to_string()));
        Ok(self)
    }

    fn claim_intent(&self, requested: &'static str) -> DbiResult<()> {
        if !self.handler.has_table() {
            return Err(DbiError::MissingTable);
        }
        if let Some(existing) = &self.intent {
            return Err(DbiError::ConflictingIntent {
                existing: existing.name(),
                requested,
            });
        }
        if !self.select.is_empty() {
            return Err(DbiError::ConflictingIntent {
                existing: "select",
                requested,
            });
        }
        Ok(())
    }

    fn table_builder<F>(&self, is_alter: bool, f: F) -> DbiResult<TableBuilder>
    where
        F: FnOnce(&mut TableBuilder) -> DbiResult<()>,
    {
        let mut table = TableBuilder::new(is_alter);
        table.table(self.handler.table());
        table.inherit_timestamp_format(self.options.timestamp_format);
        f(&mut table)?;
        Ok(table)
    }

    // ==================== Output ====================

    /// Every statement to execute, in order: the main query followed by any
    /// trigger statements. Empty until something has been built.
    pub fn statements(&self) -> Vec<String> {
        if self.handler.query().is_empty() {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(1 + self.triggers.len());
        out.push(self.handler.query().to_string());
        out.extend(self.triggers.iter().cloned());
        out
    }

    /// Trigger statements produced by a create/alter build.
    pub fn trigger_statements(&self) -> &[String] {
        &self.triggers
    }

    /// `select`, `create`, `alter`, `drop` or `rename`.
    pub fn intent_name(&self) -> &'static str {
        match &self.intent {
            Some(intent) => intent.name(),
            None => "select",
        }
    }

    fn build_select(&mut self) -> DbiResult<()> {
        let h = &mut self.handler;

        h.add_to_query("SELECT ");
        for (i, stmt) in self.select.iter().enumerate() {
            if i > 0 {
                h.add_to_query(", ");
            }
            h.push_statement(stmt);
        }
        let from = format!(" FROM {}", BuildHandler::quote(h.table()));
        h.add_to_query(&from);

        for join in &mut self.joins {
            join.build()?;
            h.merge(" ", join.handler());
        }

        self.wheres.render("WHERE", h);

        if !self.group_by.is_empty() {
            h.add_to_query(" GROUP BY ");
            for (i, stmt) in self.group_by.iter().enumerate() {
                if i > 0 {
                    h.add_to_query(", ");
                }
                h.push_statement(stmt);
            }
        }

        self.having.render("HAVING", h);

        if !self.order_by.is_empty() {
            h.add_to_query(" ORDER BY ");
            for (i, (stmt, direction)) in self.order_by.iter().enumerate() {
                if i > 0 {
                    h.add_to_query(", ");
                }
                h.push_statement(stmt);
                h.add_to_query(" ");
                h.add_to_query(direction);
            }
        }

        if let Some(limit) = &self.limit {
            h.add_to_query(" LIMIT ");
            h.push_statement(limit);
            if let Some(offset) = &self.offset {
                h.add_to_query(" OFFSET ");
                h.push_statement(offset);
            }
        }

        Ok(())
    }

    fn build_ddl(&mut self) -> DbiResult<()> {
        let table = BuildHandler::quote(self.handler.table());
        let Some(intent) = self.intent.as_mut() else {
            return Err(DbiError::EmptyBuild);
        };

        // `table()` / `table_options()` may have changed since the intent was claimed.
        if let Intent::Create(builder) | Intent::Alter(builder) = intent {
            builder.table(self.handler.table());
            builder.inherit_timestamp_format(self.options.timestamp_format);
        }

        match intent {
            Intent::Create(builder) => {
                builder.build()?;
                let sql = format!(
                    "CREATE TABLE {table} ({}){}",
                    builder.query(),
                    self.options.render_suffix()
                );
                self.handler.add_to_query(&sql);
                self.handler.add_parameters(builder.parameters().iter().cloned());
                self.triggers = builder.trigger_statements().to_vec();
            }
            Intent::Alter(builder) => {
                builder.build()?;
                let sql = format!("ALTER TABLE {table} {}", builder.query());
                self.handler.add_to_query(&sql);
                self.handler.add_parameters(builder.parameters().iter().cloned());
                self.triggers = builder.trigger_statements().to_vec();
            }
            Intent::Drop => {
                self.handler.add_to_query(&format!("DROP TABLE {table}"));
            }
            Intent::Rename(new_name) => {
                let sql = format!("RENAME TABLE {table} TO {}", BuildHandler::quote(new_name));
                self.handler.add_to_query(&sql);
            }
        }
        Ok(())
    }
}

impl SqlBuilder for QueryBuilder {
    fn build(&mut self) -> DbiResult<()> {
        if self.built {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "dbkit.sql",
                table = %self.handler.table(),
                "build() called again; output is appended to the previous render"
            );
        }
        self.built = true;

        if !self.handler.has_table() {
            return Err(DbiError::MissingTable);
        }

        match (self.select.is_empty(), &self.intent) {
            (false, Some(intent)) => {
                return Err(DbiError::ConflictingIntent {
                    existing: intent.name(),
                    requested: "select",
                });
            }
            (false, None) => self.build_select()?,
            (true, Some(_)) => self.build_ddl()?,
            (true, None) => return Err(DbiError::EmptyBuild),
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "dbkit.sql",
            intent = self.intent_name(),
            param_count = self.handler.parameters().len(),
            triggers = self.triggers.len(),
            sql = %self.handler.query(),
        );

        Ok(())
    }

    fn handler(&self) -> &BuildHandler {
        &self.handler
    }
}
