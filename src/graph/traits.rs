//! Core trait for graph database access.

use async_trait::async_trait;

use crate::error::AppError;
use crate::graph::row::{Params, RowStream};

/// Executes Cypher queries against a graph store.
///
/// All values except sanitized structural labels bind as `$param`s; the
/// executor never interpolates parameter values into query text.
/// Implementations must be safe for concurrent sessions: multiple
/// ingestion pipelines and retrieval queries share one executor.
#[async_trait]
pub trait CypherExecutor: Send + Sync {
    /// Executes a Cypher query and returns a stream of result rows.
    ///
    /// Use this for queries that return data (MATCH, RETURN, CALL ... YIELD).
    async fn execute_cypher(&self, cypher: &str, params: Params)
        -> Result<RowStream<'_>, AppError>;

    /// Executes a Cypher query without returning results.
    ///
    /// Use this for mutations (CREATE, MERGE, DELETE, SET).
    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError>;
}
