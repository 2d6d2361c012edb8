use super::handler::{BuildHandler, SqlBuilder};
use crate::config::TimestampFormat;
use crate::error::{DbiError, DbiResult};
use crate::schema::ident::IntoColumns;
use crate::schema::{
    CheckDefinition, ColumnDefinition, ForeignKeyDefinition, IndexDefinition, UniqueDefinition,
    validate_identifier,
};

pub const DEFAULT_CREATED_COLUMN: &str = "created";
pub const DEFAULT_UPDATED_COLUMN: &str = "updated";

/// Generated timestamp columns and how they are maintained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampColumns {
    pub created: String,
    pub updated: String,
    pub format: TimestampFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ForeignKeyDrop {
    /// Identifier derived from the owning table, so it follows retargeting.
    Derived(ForeignKeyDefinition),
    Named(String),
}

impl ForeignKeyDrop {
    fn identifier(&self) -> &str {
        match self {
            ForeignKeyDrop::Derived(fk) => fk.identifier(),
            ForeignKeyDrop::Named(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TriggerDrop {
    /// Both `<table>_created_trigger` and `<table>_updated_trigger`.
    Generated,
    Named(String),
}

/// Column and constraint fragments for one `CREATE TABLE` or `ALTER TABLE`.
///
/// `build()` renders the comma-separated fragment list into the buffer (the
/// caller wraps it in `CREATE TABLE`/`ALTER TABLE`). Trigger maintenance for
/// [`timestamps`](Self::timestamps) is rendered separately into
/// [`trigger_statements`](Self::trigger_statements), since trigger DDL must run
/// as independent statements.
///
/// Fragment order:
///
/// 1. added columns, then generated timestamp columns
/// 2. alter mode only: `CHANGE`, foreign key drops (`DROP INDEX` and
///    `DROP FOREIGN KEY`), unique drops, index drops, check drops, column drops
/// 3. foreign keys, uniques, indexes, checks
///
/// In alter mode every added fragment is prefixed with `ADD `.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBuilder {
    handler: BuildHandler,
    is_alter: bool,
    add_columns: Vec<ColumnDefinition>,
    change_columns: Vec<ColumnDefinition>,
    drop_columns: Vec<String>,
    add_foreign_keys: Vec<ForeignKeyDefinition>,
    drop_foreign_keys: Vec<ForeignKeyDrop>,
    add_uniques: Vec<UniqueDefinition>,
    drop_uniques: Vec<String>,
    add_indexes: Vec<IndexDefinition>,
    drop_indexes: Vec<String>,
    add_checks: Vec<CheckDefinition>,
    drop_checks: Vec<String>,
    timestamps: Option<TimestampColumns>,
    timestamp_format: TimestampFormat,
    /// `timestamps()` was used, so the columns follow `timestamp_format`.
    timestamps_inherit: bool,
    /// `set_timestamp_format` was called; inherited formats no longer apply.
    format_pinned: bool,
    drop_triggers: Vec<TriggerDrop>,
    triggers: Vec<String>,
}

impl TableBuilder {
    pub fn new(is_alter: bool) -> Self {
        Self {
            handler: BuildHandler::new(),
            is_alter,
            add_columns: Vec::new(),
            change_columns: Vec::new(),
            drop_columns: Vec::new(),
            add_foreign_keys: Vec::new(),
            drop_foreign_keys: Vec::new(),
            add_uniques: Vec::new(),
            drop_uniques: Vec::new(),
            add_indexes: Vec::new(),
            drop_indexes: Vec::new(),
            add_checks: Vec::new(),
            drop_checks: Vec::new(),
            timestamps: None,
            timestamp_format: TimestampFormat::default(),
            timestamps_inherit: false,
            format_pinned: false,
            drop_triggers: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Builder for `CREATE TABLE` fragments.
    pub fn create() -> Self {
        Self::new(false)
    }

    /// Builder for `ALTER TABLE` fragments.
    pub fn alter() -> Self {
        Self::new(true)
    }

    /// Set the owning table. Foreign keys with derived identifiers follow it.
    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.handler.set_table(table);
        let table = self.handler.table();
        for fk in &mut self.add_foreign_keys {
            fk.retarget(table);
        }
        for drop in &mut self.drop_foreign_keys {
            if let ForeignKeyDrop::Derived(fk) = drop {
                fk.retarget(table);
            }
        }
        self
    }

    pub fn is_alter(&self) -> bool {
        self.is_alter
    }

    /// Format used by [`timestamps`](Self::timestamps).
    pub fn set_timestamp_format(&mut self, format: TimestampFormat) -> &mut Self {
        self.format_pinned = true;
        self.apply_timestamp_format(format);
        self
    }

    /// Format handed down from table options; ignored once pinned with
    /// [`set_timestamp_format`](Self::set_timestamp_format).
    pub(crate) fn inherit_timestamp_format(&mut self, format: TimestampFormat) {
        if !self.format_pinned {
            self.apply_timestamp_format(format);
        }
    }

    fn apply_timestamp_format(&mut self, format: TimestampFormat) {
        self.timestamp_format = format;
        if self.timestamps_inherit
            && let Some(ts) = &mut self.timestamps
        {
            ts.format = format;
        }
    }

    // ==================== Columns ====================

    /// Add a column of the given type.
    pub fn add_column(&mut self, name: &str, column_type: &str) -> DbiResult<&mut ColumnDefinition> {
        let mut column = ColumnDefinition::new(name)?;
        column.column_type(column_type)?;
        Ok(push_last(&mut self.add_columns, column))
    }

    /// Change an existing column (alter mode). Renders as `CHANGE `name` `name` ...`.
    pub fn change_column(&mut self, name: &str) -> DbiResult<&mut ColumnDefinition> {
        let column = ColumnDefinition::alter(name)?;
        Ok(push_last(&mut self.change_columns, column))
    }

    /// Drop a column (alter mode).
    pub fn drop_column(&mut self, name: &str) -> DbiResult<&mut Self> {
        let name = validate_identifier(name)?;
        self.drop_columns.push(name.to_string());
        Ok(self)
    }

    /// `` `id` INT(11) NOT NULL AUTO_INCREMENT PRIMARY KEY ``.
    pub fn id(&mut self) -> DbiResult<&mut ColumnDefinition> {
        self.id_with("id", "int", 11, true)
    }

    /// Primary key column with explicit name, type, length and auto-increment.
    pub fn id_with(
        &mut self,
        name: &str,
        column_type: &str,
        length: u32,
        auto_increment: bool,
    ) -> DbiResult<&mut ColumnDefinition> {
        let column = self.add_column(name, column_type)?;
        column.length(length).primary_key(auto_increment);
        Ok(column)
    }

    // ==================== Foreign keys ====================

    /// Add a foreign key from `column` to `foreign_table`.`foreign_column`.
    ///
    /// Set referential actions with `on_delete`/`on_update` on the returned
    /// definition. The working table must already be set since it is part of
    /// the default identifier.
    pub fn add_foreign_key(
        &mut self,
        column: &str,
        foreign_table: &str,
        foreign_column: &str,
    ) -> DbiResult<&mut ForeignKeyDefinition> {
        let fk = self.foreign_key(column, foreign_table, foreign_column)?;
        Ok(push_last(&mut self.add_foreign_keys, fk))
    }

    /// Drop the foreign key `add_foreign_key` would have created.
    pub fn drop_foreign_key(
        &mut self,
        column: &str,
        foreign_table: &str,
        foreign_column: &str,
    ) -> DbiResult<&mut Self> {
        let fk = self.foreign_key(column, foreign_table, foreign_column)?;
        self.drop_foreign_keys.push(ForeignKeyDrop::Derived(fk));
        Ok(self)
    }

    pub fn drop_foreign_key_by_identifier(&mut self, identifier: &str) -> DbiResult<&mut Self> {
        let identifier = validate_identifier(identifier)?;
        self.drop_foreign_keys
            .push(ForeignKeyDrop::Named(identifier.to_string()));
        Ok(self)
    }

    fn foreign_key(
        &self,
        column: &str,
        foreign_table: &str,
        foreign_column: &str,
    ) -> DbiResult<ForeignKeyDefinition> {
        if !self.handler.has_table() {
            return Err(DbiError::MissingTable);
        }
        ForeignKeyDefinition::new(self.handler.table(), column, foreign_table, foreign_column)
    }

    // ==================== Unique / index / check ====================

    pub fn add_unique(&mut self, columns: impl IntoColumns) -> DbiResult<&mut UniqueDefinition> {
        let unique = UniqueDefinition::new(columns)?;
        Ok(push_last(&mut self.add_uniques, unique))
    }

    /// Drop the unique constraint with the default identifier for `columns`.
    pub fn drop_unique(&mut self, columns: impl IntoColumns) -> DbiResult<&mut Self> {
        let unique = UniqueDefinition::new(columns)?;
        self.drop_uniques.push(unique.identifier().to_string());
        Ok(self)
    }

    pub fn drop_unique_by_identifier(&mut self, identifier: &str) -> DbiResult<&mut Self> {
        let identifier = validate_identifier(identifier)?;
        self.drop_uniques.push(identifier.to_string());
        Ok(self)
    }

    pub fn add_index(&mut self, columns: impl IntoColumns) -> DbiResult<&mut IndexDefinition> {
        let index = IndexDefinition::new(columns)?;
        Ok(push_last(&mut self.add_indexes, index))
    }

    /// Drop the index with the default identifier for `columns`.
    pub fn drop_index(&mut self, columns: impl IntoColumns) -> DbiResult<&mut Self> {
        let index = IndexDefinition::new(columns)?;
        self.drop_indexes.push(index.identifier().to_string());
        Ok(self)
    }

    pub fn drop_index_by_identifier(&mut self, identifier: &str) -> DbiResult<&mut Self> {
        let identifier = validate_identifier(identifier)?;
        self.drop_indexes.push(identifier.to_string());
        Ok(self)
    }

    /// Add a `CHECK` constraint named after `column`.
    pub fn add_check(&mut self, column: &str, expression: &str) -> DbiResult<&mut CheckDefinition> {
        let check = CheckDefinition::new(column, expression)?;
        Ok(push_last(&mut self.add_checks, check))
    }

    /// Drop the check with the default identifier for `column`.
    pub fn drop_check(&mut self, column: &str) -> DbiResult<&mut Self> {
        if column.is_empty() {
            return Err(DbiError::missing_field("CheckDefinition", "column"));
        }
        self.drop_checks
            .push(CheckDefinition::default_identifier(column));
        Ok(self)
    }

    pub fn drop_check_by_identifier(&mut self, identifier: &str) -> DbiResult<&mut Self> {
        let identifier = validate_identifier(identifier)?;
        self.drop_checks.push(identifier.to_string());
        Ok(self)
    }

    // ==================== Timestamps ====================

    /// Add `created`/`updated` columns maintained by triggers, using the
    /// builder's timestamp format (including later changes to it).
    pub fn timestamps(&mut self) -> &mut Self {
        self.timestamps = Some(TimestampColumns {
            created: DEFAULT_CREATED_COLUMN.to_string(),
            updated: DEFAULT_UPDATED_COLUMN.to_string(),
            format: self.timestamp_format,
        });
        self.timestamps_inherit = true;
        self
    }

    /// Add timestamp columns with explicit names and format.
    pub fn timestamps_with(
        &mut self,
        created: &str,
        updated: &str,
        format: TimestampFormat,
    ) -> DbiResult<&mut Self> {
        let created = validate_identifier(created)?.to_string();
        let updated = validate_identifier(updated)?.to_string();
        self.timestamps = Some(TimestampColumns {
            created,
            updated,
            format,
        });
        self.timestamps_inherit = false;
        Ok(self)
    }

    pub fn timestamp_columns(&self) -> Option<&TimestampColumns> {
        self.timestamps.as_ref()
    }

    /// Schedule `DROP TRIGGER IF EXISTS` for both generated trigger names.
    pub fn drop_timestamp_triggers(&mut self) -> &mut Self {
        self.drop_triggers.push(TriggerDrop::Generated);
        self
    }

    /// Schedule `DROP TRIGGER IF EXISTS` for a named trigger.
    pub fn drop_timestamp_trigger(&mut self, name: &str) -> DbiResult<&mut Self> {
        let name = validate_identifier(name)?;
        self.drop_triggers.push(TriggerDrop::Named(name.to_string()));
        Ok(self)
    }

    /// `[<table>_created_trigger, <table>_updated_trigger]`.
    pub fn generated_trigger_names(&self) -> [String; 2] {
        let table = self.handler.table();
        [
            format!("{table}_created_trigger"),
            format!("{table}_updated_trigger"),
        ]
    }

    /// Trigger statements produced by the last `build()`, in execution order.
    pub fn trigger_statements(&self) -> &[String] {
        &self.triggers
    }

    // ==================== Rendering ====================

    fn added(&self, fragment: String) -> String {
        if self.is_alter {
            format!("ADD {fragment}")
        } else {
            fragment
        }
    }

    fn fragments(&self) -> Vec<String> {
        let mut out = Vec::new();

        for column in &self.add_columns {
            out.push(self.added(column.to_sql()));
        }

        if let Some(ts) = &self.timestamps {
            let ty = ts.format.column_type();
            for name in [&ts.created, &ts.updated] {
                out.push(self.added(format!("{} {ty}", BuildHandler::quote(name))));
            }
        }

        if self.is_alter {
            for column in &self.change_columns {
                out.push(format!("CHANGE {}", column.to_sql()));
            }
            for fk in &self.drop_foreign_keys {
                let name = BuildHandler::quote(fk.identifier());
                out.push(format!("DROP INDEX {name}"));
                out.push(format!("DROP FOREIGN KEY {name}"));
            }
            for name in self.drop_uniques.iter().chain(&self.drop_indexes) {
                out.push(format!("DROP INDEX {}", BuildHandler::quote(name)));
            }
            for name in &self.drop_checks {
                out.push(format!("DROP CHECK {}", BuildHandler::quote(name)));
            }
            for name in &self.drop_columns {
                out.push(format!("DROP COLUMN {}", BuildHandler::quote(name)));
            }
        }

        for fk in &self.add_foreign_keys {
            out.push(self.added(fk.to_sql()));
        }
        for unique in &self.add_uniques {
            out.push(self.added(unique.to_sql()));
        }
        for index in &self.add_indexes {
            out.push(self.added(index.to_sql()));
        }
        for check in &self.add_checks {
            out.push(self.added(check.to_sql()));
        }

        out
    }

    fn render_triggers(&self) -> Vec<String> {
        let table = BuildHandler::quote(self.handler.table());
        let [created_trigger, updated_trigger] = self.generated_trigger_names();
        let mut out = Vec::new();

        for drop in &self.drop_triggers {
            match drop {
                TriggerDrop::Generated => {
                    out.push(drop_trigger(&created_trigger));
                    out.push(drop_trigger(&updated_trigger));
                }
                TriggerDrop::Named(name) => out.push(drop_trigger(name)),
            }
        }

        if let Some(ts) = &self.timestamps {
            let now = ts.format.now_expression();
            let created = BuildHandler::quote(&ts.created);
            let updated = BuildHandler::quote(&ts.updated);

            out.push(drop_trigger(&created_trigger));
            out.push(format!(
                "CREATE TRIGGER {} BEFORE INSERT ON {table} FOR EACH ROW BEGIN SET NEW.{created} = {now}; SET NEW.{updated} = {now}; END",
                BuildHandler::quote(&created_trigger),
            ));
            out.push(drop_trigger(&updated_trigger));
            out.push(format!(
                "CREATE TRIGGER {} BEFORE UPDATE ON {table} FOR EACH ROW SET NEW.{updated} = {now}",
                BuildHandler::quote(&updated_trigger),
            ));
        }

        out
    }
}

impl SqlBuilder for TableBuilder {
    fn build(&mut self) -> DbiResult<()> {
        let needs_table = self.timestamps.is_some()
            || self.drop_triggers.contains(&TriggerDrop::Generated);
        if needs_table && !self.handler.has_table() {
            return Err(DbiError::MissingTable);
        }

        let fragments = self.fragments().join(", ");
        self.handler.add_to_query(&fragments);
        self.triggers = self.render_triggers();

        #[cfg(feature = "tracing")]
        log_trigger_batch(self.handler.table(), &self.triggers);

        Ok(())
    }

    fn handler(&self) -> &BuildHandler {
        &self.handler
    }
}

#[cfg(feature = "tracing")]
fn log_trigger_batch(table: &str, triggers: &[String]) {
    if triggers.is_empty() {
        return;
    }
    tracing::debug!(
        target: "dbkit.sql",
        table = %table,
        statements = triggers.len(),
        "rendered trigger statements"
    );
}

fn drop_trigger(name: &str) -> String {
    format!("DROP TRIGGER IF EXISTS {}", BuildHandler::quote(name))
}

fn push_last<T>(items: &mut Vec<T>, item: T) -> &mut T {
    let index = items.len();
    items.push(item);
    &mut items[index]
}
