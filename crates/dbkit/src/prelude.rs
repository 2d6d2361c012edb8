//! Convenient imports for typical `dbkit` usage.
//!
//! ```ignore
//! use dbkit::prelude::*;
//! ```

pub use crate::{
    Connector, Criteria, CriteriaCollection, DbiError, DbiResult, JoinType, Model, QueryBuilder,
    Raw, Repository, SqlBuilder, TableBuilder, TableOptions, TimestampFormat, Value,
};

pub use crate::criteria::{
    Equals, GreaterThan, GreaterThanOrEqual, GroupBy, In, IsFalse, IsNull, IsTrue, LessThan,
    LessThanOrEqual, LimitOffset, NotEquals, NotNull, OrEquals, OrderBy,
};
