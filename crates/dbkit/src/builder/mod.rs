//! Structured SQL builders.
//!
//! Every builder wraps a [`BuildHandler`]: a working table, an append-only SQL
//! buffer and an append-only parameter list.
//!
//! ## Design
//!
//! - MySQL dialect: backtick identifiers, `?` placeholders.
//! - Column references are quoted and table-prefixed, never parameterized.
//!   Values are always bound. [`Raw`](crate::Raw) bypasses both.
//! - Placeholders and parameters are appended in the same left-to-right order.
//! - DDL trigger statements are returned as a separate list, never joined into
//!   the main statement.

pub mod condition;
pub mod handler;
pub mod join;
pub mod query;
pub mod table;

pub use condition::{Condition, ConditionEntry, ConditionGroup, ConditionList, Connector};
pub use handler::{BuildHandler, SqlBuilder};
pub use join::{JoinBuilder, JoinType};
pub use query::QueryBuilder;
pub use table::{TableBuilder, TimestampColumns};

#[cfg(test)]
mod tests;
