//! Reusable query criteria.
//!
//! A [`Criteria`] applies itself to a [`QueryBuilder`] through the builder's
//! public clause methods. Repositories collect criteria in a
//! [`CriteriaCollection`] and apply them in insertion order.
//!
//! ```ignore
//! use dbkit::criteria::{CriteriaCollection, Equals, OrderBy};
//!
//! let mut collection = CriteriaCollection::new();
//! collection.add_criteria(Equals::new("status", "active"));
//! collection.add_criteria(OrderBy::desc("created"));
//! ```

use std::fmt;

use crate::builder::QueryBuilder;
use crate::statement::Raw;
use crate::value::Value;

/// A predicate or modifier that knows how to apply itself to a query.
pub trait Criteria: Send + Sync {
    fn apply(&self, qb: &mut QueryBuilder);
}

/// Ordered list of criteria.
#[derive(Default)]
pub struct CriteriaCollection {
    criteria: Vec<Box<dyn Criteria>>,
}

impl CriteriaCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_criteria(&mut self, criteria: impl Criteria + 'static) -> &mut Self {
        self.criteria.push(Box::new(criteria));
        self
    }

    pub fn criteria(&self) -> &[Box<dyn Criteria>] {
        &self.criteria
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Apply every criterion in insertion order.
    pub fn apply(&self, qb: &mut QueryBuilder) {
        for criterion in &self.criteria {
            criterion.apply(qb);
        }
    }
}

impl fmt::Debug for CriteriaCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CriteriaCollection")
            .field("len", &self.criteria.len())
            .finish()
    }
}

// ==================== Comparisons ====================

macro_rules! comparison_criteria {
    ($($(#[$doc:meta])* $name:ident => $op:literal;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, PartialEq)]
            pub struct $name {
                column: String,
                value: Value,
            }

            impl $name {
                pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
                    Self {
                        column: column.into(),
                        value: value.into(),
                    }
                }
            }

            impl Criteria for $name {
                fn apply(&self, qb: &mut QueryBuilder) {
                    qb.and_where(self.column.as_str(), $op, &self.value);
                }
            }
        )*
    };
}

comparison_criteria! {
    /// `column = ?`
    Equals => "=";
    /// `column != ?`
    NotEquals => "!=";
    /// `column > ?`
    GreaterThan => ">";
    /// `column >= ?`
    GreaterThanOrEqual => ">=";
    /// `column < ?`
    LessThan => "<";
    /// `column <= ?`
    LessThanOrEqual => "<=";
}

/// `column IN (a,b,c)`.
///
/// The values are rendered inline with [`Value::to_literal`], not bound.
/// Strings are single-quoted without escaping, so only pass trusted values.
#[derive(Debug, Clone, PartialEq)]
pub struct In {
    column: String,
    values: Vec<Value>,
}

impl In {
    pub fn new<V>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<Value>,
    {
        Self {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn list(&self) -> String {
        let items: Vec<String> = self.values.iter().map(Value::to_literal).collect();
        format!("({})", items.join(","))
    }
}

impl Criteria for In {
    fn apply(&self, qb: &mut QueryBuilder) {
        qb.and_where(self.column.as_str(), "IN", Raw::new(self.list()));
    }
}

macro_rules! keyword_criteria {
    ($($(#[$doc:meta])* $name:ident => $op:literal, $keyword:literal;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, PartialEq, Eq)]
            pub struct $name {
                column: String,
            }

            impl $name {
                pub fn new(column: impl Into<String>) -> Self {
                    Self {
                        column: column.into(),
                    }
                }
            }

            impl Criteria for $name {
                fn apply(&self, qb: &mut QueryBuilder) {
                    qb.and_where(self.column.as_str(), $op, Raw::new($keyword));
                }
            }
        )*
    };
}

keyword_criteria! {
    /// `column IS NULL`
    IsNull => "IS", "NULL";
    /// `column IS NOT NULL`
    NotNull => "IS NOT", "NULL";
    /// `column IS TRUE`
    IsTrue => "IS", "TRUE";
    /// `column IS FALSE`
    IsFalse => "IS", "FALSE";
}

/// A parenthesized group of equality checks joined with `OR`.
///
/// The group itself is joined to the rest of the WHERE clause with `AND`:
/// `... AND ( a = ? OR b = ? )`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrEquals {
    pairs: Vec<(String, Value)>,
}

impl OrEquals {
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        }
    }
}

impl Criteria for OrEquals {
    fn apply(&self, qb: &mut QueryBuilder) {
        qb.and_where_group(|group| {
            for (column, value) in &self.pairs {
                group.or_where(column.as_str(), "=", value);
            }
        });
    }
}

// ==================== Modifiers ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    column: String,
    direction: String,
}

impl OrderBy {
    /// Ascending order.
    pub fn new(column: impl Into<String>) -> Self {
        Self::with_direction(column, "ASC")
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::with_direction(column, "DESC")
    }

    pub fn with_direction(column: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: direction.into(),
        }
    }
}

impl Criteria for OrderBy {
    fn apply(&self, qb: &mut QueryBuilder) {
        qb.order_by(self.column.as_str(), &self.direction);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBy {
    column: String,
}

impl GroupBy {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Criteria for GroupBy {
    fn apply(&self, qb: &mut QueryBuilder) {
        qb.group_by(self.column.as_str());
    }
}

/// `LIMIT ? [OFFSET ?]`. A zero offset is not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    limit: u64,
    offset: u64,
}

impl LimitOffset {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    pub fn limit(limit: u64) -> Self {
        Self::new(limit, 0)
    }
}

impl Criteria for LimitOffset {
    fn apply(&self, qb: &mut QueryBuilder) {
        qb.limit(self.limit);
        if self.offset != 0 {
            qb.offset(self.offset);
        }
    }
}
