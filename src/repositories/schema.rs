//! Schema management: vector index and lookup indexes.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::context::Context;
use crate::di::FromContext;
use crate::error::AppError;
use crate::graph::Graph;

/// Name of the similarity index over chunk embeddings.
pub const CHUNK_VECTOR_INDEX: &str = "chunk_vector_index";

/// Repository for index creation and store resets.
#[derive(FromContext, Clone)]
pub struct SchemaRepository {
    graph: Graph,
    config: Arc<Config>,
}

impl SchemaRepository {
    pub fn new(graph: Graph, config: Arc<Config>) -> Self {
        Self { graph, config }
    }

    /// Ensures the vector index and lookup indexes exist.
    ///
    /// The vector index is required: without it every query fails, so a
    /// creation error other than "already exists" is fatal. Lookup indexes
    /// only speed up merges and are created best-effort.
    pub async fn ensure(&self) -> Result<(), AppError> {
        self.ensure_vector_index().await?;

        for label in ["Document", "Chunk", "Entity"] {
            let cypher = format!("CREATE INDEX ON :{}(id)", label);
            if let Err(e) = self.graph.query(&cypher).run().await {
                warn!(label, error = %e, "lookup index creation failed, continuing");
            }
        }

        Ok(())
    }

    async fn ensure_vector_index(&self) -> Result<(), AppError> {
        let cypher = format!(
            "CREATE VECTOR INDEX {} ON :Chunk(embedding) \
             WITH CONFIG {{\"dimension\": {}, \"metric\": \"cos\", \"capacity\": 10000}}",
            CHUNK_VECTOR_INDEX, self.config.gemini.dimensions
        );

        match self.graph.query(&cypher).run().await {
            Ok(()) => {
                info!(
                    index = CHUNK_VECTOR_INDEX,
                    dimension = self.config.gemini.dimensions,
                    "created vector index"
                );
                Ok(())
            }
            // Index creation is not idempotent on the server side.
            Err(e) if e.to_string().contains("already exists") => {
                info!(index = CHUNK_VECTOR_INDEX, "vector index already exists");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes all nodes and edges and drops the vector index.
    ///
    /// The drop may fail when the index was never created; that is fine,
    /// `ensure` recreates it either way.
    pub async fn reset(&self) -> Result<(), AppError> {
        self.graph.query("MATCH (n) DETACH DELETE n").run().await?;

        let drop = format!("DROP VECTOR INDEX {}", CHUNK_VECTOR_INDEX);
        if let Err(e) = self.graph.query(&drop).run().await {
            warn!(index = CHUNK_VECTOR_INDEX, error = %e, "vector index drop failed, continuing");
        }

        info!("store reset complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ChunkingConfig, ConverterConfig, GeminiConfig, MemgraphConfig, RetrievalConfig,
    };
    use crate::graph::{CypherExecutor, Params, RowStream};
    use std::sync::Mutex;

    /// Fails statements whose text contains a configured needle.
    struct FailingExecutor {
        fail_on: &'static str,
        error: &'static str,
        statements: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl CypherExecutor for FailingExecutor {
        async fn execute_cypher(
            &self,
            cypher: &str,
            _params: Params,
        ) -> Result<RowStream<'_>, AppError> {
            self.statements.lock().unwrap().push(cypher.to_string());
            if cypher.contains(self.fail_on) {
                return Err(AppError::Query {
                    message: self.error.to_string(),
                    query: cypher.to_string(),
                });
            }
            Ok(Box::pin(futures::stream::empty()))
        }

        async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
            self.execute_cypher(cypher, params).await.map(|_| ())
        }
    }

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            memgraph: MemgraphConfig::default(),
            gemini: GeminiConfig {
                api_key: "test".to_string(),
                extraction_model: "m".to_string(),
                qa_model: "m".to_string(),
                embedding_model: "m".to_string(),
                dimensions: 768,
                timeout_secs: 5,
            },
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            converter: ConverterConfig::default(),
        })
    }

    fn repo(fail_on: &'static str, error: &'static str) -> (Arc<FailingExecutor>, SchemaRepository) {
        let executor = Arc::new(FailingExecutor {
            fail_on,
            error,
            statements: Mutex::new(Vec::new()),
        });
        let repo = SchemaRepository {
            graph: Graph::from_arc(executor.clone()),
            config: test_config(),
        };
        (executor, repo)
    }

    #[tokio::test]
    async fn ensure_creates_vector_and_lookup_indexes() {
        let (executor, repo) = repo("<never>", "");
        repo.ensure().await.unwrap();

        let statements = executor.statements.lock().unwrap();
        assert_eq!(statements.len(), 4);
        assert!(statements[0].contains("CREATE VECTOR INDEX chunk_vector_index"));
        assert!(statements[0].contains("\"dimension\": 768"));
        assert!(statements[0].contains("\"metric\": \"cos\""));
        assert!(statements.iter().any(|s| s == "CREATE INDEX ON :Entity(id)"));
    }

    #[tokio::test]
    async fn ensure_tolerates_preexisting_vector_index() {
        let (_, repo) = repo("CREATE VECTOR INDEX", "index already exists");
        repo.ensure().await.unwrap();
    }

    #[tokio::test]
    async fn ensure_surfaces_other_vector_index_errors() {
        let (_, repo) = repo("CREATE VECTOR INDEX", "out of memory");
        assert!(repo.ensure().await.is_err());
    }

    #[tokio::test]
    async fn reset_tolerates_missing_vector_index() {
        let (executor, repo) = repo("DROP VECTOR INDEX", "no such index");
        repo.reset().await.unwrap();

        let statements = executor.statements.lock().unwrap();
        assert_eq!(statements[0], "MATCH (n) DETACH DELETE n");
    }
}
