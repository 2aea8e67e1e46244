//! Warehouse connection seam.
//!
//! The warehouse connection and cursor are external collaborators; this
//! trait is the narrow surface the pipeline drives. A concrete
//! implementation wraps an actual Redshift/PostgreSQL driver outside this
//! crate, and tests substitute a recording fake.

use async_trait::async_trait;

use crate::core::Frame;
use crate::error::Result;

/// Driver-agnostic warehouse connection.
///
/// Statements are plain SQL text; identifiers are never parameterized.
/// One statement executes at a time, each followed by an explicit
/// [`commit`](Warehouse::commit) or [`rollback`](Warehouse::rollback).
/// Implementations are not required to be safe for concurrent statements;
/// callers serialize access.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Execute a statement without fetching results.
    ///
    /// Driver failures surface as [`LoadError::Execution`](crate::LoadError::Execution).
    async fn execute(&self, statement: &str) -> Result<()>;

    /// Commit the current transaction.
    async fn commit(&self) -> Result<()>;

    /// Roll back the current transaction.
    async fn rollback(&self) -> Result<()>;

    /// Run an ad hoc query and return the result as a frame
    /// (column names, declared types and row values).
    async fn query(&self, sql: &str) -> Result<Frame>;

    /// Close the cursor, commit, and close the connection.
    async fn close(&self) -> Result<()>;
}
