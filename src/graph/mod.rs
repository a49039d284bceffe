//! Graph abstraction layer for backend-agnostic store access.
//!
//! Built on a small surface:
//!
//! - [`CypherExecutor`] - executes Cypher queries (the only required trait)
//! - [`Query`] - fluent builder binding `$param`s before execution
//! - [`Row`]/[`RowStream`] - JSON-typed result rows
//! - [`Graph`] - a cheaply clonable handle owning the executor
//!
//! Each statement the pipeline issues is atomic on the store side: a chunk is
//! created and linked to its document in one statement, and a relation edge is
//! merged with both endpoints matched in one statement. Readers therefore
//! never observe a chunk without its document link or a dangling edge, without
//! any client-side transaction machinery.
//!
//! ```ignore
//! use noesis::graph::{Graph, QueryExt};
//!
//! let graph = Graph::new(client);
//!
//! let rows = graph.query("MATCH (c:Chunk {id: $id}) RETURN c.text AS text")
//!     .param("id", chunk_id)
//!     .fetch_all()
//!     .await?;
//!
//! graph.query("MERGE (d:Document {id: $id})")
//!     .param("id", doc_id)
//!     .run()
//!     .await?;
//! ```

mod macros;
mod query;
mod row;
mod traits;

pub mod backends;

// Re-export core types
pub use query::{Query, QueryExt};
pub use row::{Params, Row, RowStream};
pub use traits::CypherExecutor;

// Re-export macro (defined at crate root via #[macro_export])
#[doc(inline)]
pub use crate::cypher;

// --- Graph handle ---

use std::sync::Arc;

use crate::error::AppError;

/// Clonable handle over a shared [`CypherExecutor`].
///
/// Owns the backend behind an `Arc`, so cloning is cheap and every component
/// receiving a `Graph` shares one connection pool. The handle is constructed
/// once at startup and injected into repositories; there is no global
/// connection state.
#[derive(Clone)]
pub struct Graph {
    client: Arc<dyn CypherExecutor>,
}

impl Graph {
    /// Wraps a backend client.
    pub fn new(client: impl CypherExecutor + 'static) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Wraps an already shared backend client.
    pub fn from_arc(client: Arc<dyn CypherExecutor>) -> Self {
        Self { client }
    }

    /// Creates a query builder for a direct (auto-commit) query.
    pub fn query(&self, cypher: &str) -> Query<'_, dyn CypherExecutor> {
        Query::new(self.client.as_ref(), cypher)
    }
}

#[async_trait::async_trait]
impl CypherExecutor for Graph {
    async fn execute_cypher(
        &self,
        cypher: &str,
        params: Params,
    ) -> Result<RowStream<'_>, AppError> {
        self.client.execute_cypher(cypher, params).await
    }

    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
        self.client.run_cypher(cypher, params).await
    }
}
