//! Schema definition value objects.
//!
//! Each definition renders one DDL fragment and carries a deterministic
//! identifier (`chk_`, `fk_`, `idx_`, `uq_` + column names) that can be
//! overridden with `with_identifier`. Because the default only depends on the
//! inputs, dropping by default identifier undoes adding with one.

pub mod check;
pub mod column;
pub mod foreign_key;
pub mod ident;
pub mod index;
pub mod unique;

pub use check::CheckDefinition;
pub use column::{ColumnDefault, ColumnDefinition};
pub use foreign_key::ForeignKeyDefinition;
pub use ident::{ConstraintName, IntoColumns, is_valid_identifier, quote, validate_identifier};
pub use index::IndexDefinition;
pub use unique::UniqueDefinition;
