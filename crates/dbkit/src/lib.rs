//! # dbkit
//!
//! A MySQL statement builder.
//!
//! ## Features
//!
//! - **Parameterized SELECT**: columns are quoted and table-prefixed, values are
//!   bound to `?` placeholders in left-to-right order
//! - **Grouped conditions**: one level of parenthesized `AND`/`OR` groups for
//!   `WHERE` and `HAVING`
//! - **Table DDL**: create/alter/drop/rename with columns, foreign keys,
//!   uniques, indexes and checks, all with deterministic constraint names
//! - **Timestamps**: generated `created`/`updated` columns plus their
//!   maintenance triggers, returned as separate statements
//! - **Criteria & repositories**: reusable predicates applied to a builder and
//!   handed to a [`Model`] for execution
//!
//! ## Query Builder
//!
//! ```ignore
//! use dbkit::prelude::*;
//!
//! let mut qb = QueryBuilder::new();
//! qb.table("users")
//!     .select("name")
//!     .and_where("status", "=", "active")
//!     .and_where_group(|g| {
//!         g.and_where("role", "=", "admin");
//!         g.or_where("role", "=", "moderator");
//!     })
//!     .order_by("name", "ASC")
//!     .limit(10);
//! qb.build()?;
//!
//! // SELECT `users`.`name` FROM `users` WHERE `users`.`status` = ?
//! //   AND  ( `users`.`role` = ? OR `users`.`role` = ? )
//! //   ORDER BY `users`.`name` ASC LIMIT ?
//! let (sql, params) = (qb.query(), qb.parameters());
//! ```
//!
//! ## Table DDL
//!
//! ```ignore
//! let mut qb = QueryBuilder::new();
//! qb.table("posts").create(|t| {
//!     t.id()?;
//!     t.add_column("title", "varchar")?.length(255);
//!     t.add_column("user_id", "int")?.length(11);
//!     t.add_foreign_key("user_id", "users", "id")?.on_delete("CASCADE");
//!     t.timestamps();
//!     Ok(())
//! })?;
//! qb.build()?;
//!
//! for statement in qb.statements() {
//!     // CREATE TABLE ..., then DROP TRIGGER / CREATE TRIGGER pairs
//! }
//! ```

pub mod builder;
pub mod config;
pub mod criteria;
pub mod error;
pub mod prelude;
pub mod repository;
pub mod schema;
pub mod statement;
pub mod value;

pub use builder::{
    BuildHandler, Condition, ConditionEntry, ConditionGroup, ConditionList, Connector,
    JoinBuilder, JoinType, QueryBuilder, SqlBuilder, TableBuilder, TimestampColumns,
};
pub use config::{DEFAULT_COLLATION, TableOptions, TimestampFormat};
pub use criteria::{Criteria, CriteriaCollection};
pub use error::{DbiError, DbiResult};
pub use repository::{Model, Repository};
pub use schema::{
    CheckDefinition, ColumnDefault, ColumnDefinition, ConstraintName, ForeignKeyDefinition,
    IndexDefinition, IntoColumns, UniqueDefinition,
};
pub use statement::{Field, Operand, Raw, Statement};
pub use value::Value;
