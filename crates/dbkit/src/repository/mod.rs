//! Repository layer on top of [`QueryBuilder`].
//!
//! A [`Repository`] owns a [`Model`] (the executor), a [`CriteriaCollection`]
//! and a list of direct query-builder uses. Every fetch builds a fresh
//! `SELECT` on [`Model::TABLE`], applies the criteria and then the uses in
//! registration order, and hands `(sql, params)` to the model.
//!
//! ```ignore
//! let mut users = Repository::new(UserModel::new(pool));
//! users
//!     .add_criteria(Equals::new("status", "active"))
//!     .amount(30, 0);
//! let rows = users.get().await?;
//! ```

use std::fmt;
use std::future::Future;

use crate::builder::{QueryBuilder, SqlBuilder};
use crate::criteria::{Criteria, CriteriaCollection, LimitOffset};
use crate::error::DbiResult;
use crate::value::Value;

/// Executes SQL produced by the builders.
///
/// Implementations own the connection and any retry policy. Errors are
/// reported as [`DbiError::Execution`](crate::DbiError::Execution).
pub trait Model: Send + Sync {
    /// Table the repository selects from.
    const TABLE: &'static str;

    type Row: Send;

    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbiResult<Vec<Self::Row>>> + Send;

    /// Execute a query and return the first row, if any.
    fn query_row(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbiResult<Option<Self::Row>>> + Send;
}

type QueryBuilderUse = Box<dyn Fn(&mut QueryBuilder) + Send + Sync>;

pub struct Repository<M: Model> {
    model: M,
    criteria: CriteriaCollection,
    uses: Vec<QueryBuilderUse>,
}

impl<M: Model> Repository<M> {
    pub fn new(model: M) -> Self {
        Self::with_criteria(model, CriteriaCollection::new())
    }

    pub fn with_criteria(model: M, criteria: CriteriaCollection) -> Self {
        Self {
            model,
            criteria,
            uses: Vec::new(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn criteria(&self) -> &CriteriaCollection {
        &self.criteria
    }

    pub fn add_criteria(&mut self, criteria: impl Criteria + 'static) -> &mut Self {
        self.criteria.add_criteria(criteria);
        self
    }

    /// Register a direct use of the query builder, applied after all criteria.
    pub fn use_query_builder<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut QueryBuilder) + Send + Sync + 'static,
    {
        self.uses.push(Box::new(f));
        self
    }

    /// Limit the result set. A zero `offset` is not rendered.
    pub fn amount(&mut self, amount: u64, offset: u64) -> &mut Self {
        self.add_criteria(LimitOffset::new(amount, offset))
    }

    /// A builder on the model's table with criteria and uses applied.
    pub fn query_builder(&self) -> QueryBuilder {
        let mut qb = QueryBuilder::new();
        qb.table(M::TABLE);
        self.criteria.apply(&mut qb);
        for apply in &self.uses {
            apply(&mut qb);
        }
        qb
    }

    /// Build the `SELECT` used by [`get`](Self::get).
    pub fn get_query(&self) -> DbiResult<(String, Vec<Value>)> {
        let mut qb = self.query_builder();
        qb.select_all(None);
        render(qb)
    }

    /// Build the `SELECT ... LIMIT ?` used by [`first`](Self::first).
    pub fn first_query(&self) -> DbiResult<(String, Vec<Value>)> {
        let mut qb = self.query_builder();
        qb.select_all(None).limit(1u64);
        render(qb)
    }

    /// Fetch all matching rows.
    pub async fn get(&self) -> DbiResult<Vec<M::Row>> {
        let (sql, params) = self.get_query()?;
        self.model.query(&sql, &params).await
    }

    /// Fetch the first matching row.
    pub async fn first(&self) -> DbiResult<Option<M::Row>> {
        let (sql, params) = self.first_query()?;
        self.model.query_row(&sql, &params).await
    }
}

impl<M: Model + fmt::Debug> fmt::Debug for Repository<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("model", &self.model)
            .field("criteria", &self.criteria)
            .field("uses", &self.uses.len())
            .finish()
    }
}

fn render(mut qb: QueryBuilder) -> DbiResult<(String, Vec<Value>)> {
    qb.build()?;
    Ok((qb.query().to_string(), qb.parameters().to_vec()))
}
