//! Graph writer: merges documents, chunks, concepts and relation edges.
//!
//! Every operation is a single parameterized Cypher statement, so each is
//! atomic on the store side: a chunk is created together with its document
//! link, and a relation edge is merged in the same statement that matches
//! both endpoints. Merge semantics make re-ingestion idempotent for
//! documents, concepts and relations; chunks deliberately get fresh
//! identities each run.

use std::sync::Arc;

use tracing::warn;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromContext;
use crate::error::AppError;
use crate::graph::{cypher, Graph};
use crate::models::{
    generate_chunk_id, sanitize_concept_type, sanitize_relation_type, Chunk, ChunkExtraction,
    Concept, Document, Relation,
};

/// Repository for all ingestion-side writes.
#[derive(FromContext, Clone)]
pub struct IngestRepository {
    pub(crate) graph: Graph,
    pub(crate) config: Arc<Config>,
}

impl IngestRepository {
    pub fn new(graph: Graph, config: Arc<Config>) -> Self {
        Self { graph, config }
    }

    /// Merge-creates the document node. No-op if it already exists.
    pub async fn merge_document(&self, doc: &Document) -> Result<(), AppError> {
        cypher!(self.graph, "MERGE (d:Document {id: $doc_id})", doc_id = &doc.id)
            .run()
            .await
    }

    /// Writes one chunk and folds its extraction payload into the graph.
    ///
    /// Returns the generated chunk id. An empty embedding stores the chunk
    /// without a vector (unsearchable but present); a non-empty embedding
    /// of the wrong length is a hard error, since writing it would corrupt the
    /// similarity index.
    pub async fn write_chunk(
        &self,
        doc_id: &str,
        chunk: &Chunk,
        embedding: &[f32],
        extraction: &ChunkExtraction,
    ) -> Result<String, AppError> {
        let expected = self.config.gemini.dimensions;
        if !embedding.is_empty() && embedding.len() != expected {
            return Err(AppError::Dimension {
                expected,
                actual: embedding.len(),
            });
        }

        let chunk_id = generate_chunk_id();
        self.create_chunk(doc_id, &chunk_id, chunk, embedding)
            .await?;

        for concept in &extraction.entities {
            self.merge_concept(&chunk_id, concept).await?;
        }
        for relation in &extraction.relations {
            self.merge_relation(relation).await?;
        }

        Ok(chunk_id)
    }

    /// Creates the chunk node and its document link in one statement.
    async fn create_chunk(
        &self,
        doc_id: &str,
        chunk_id: &str,
        chunk: &Chunk,
        embedding: &[f32],
    ) -> Result<(), AppError> {
        // The embedding SET is omitted for unsearchable chunks so the
        // vector index never sees a malformed property.
        let cypher = if embedding.is_empty() {
            "MATCH (d:Document {id: $doc_id})
             MERGE (c:Chunk {id: $chunk_id})
             SET c.index = $index
             SET c.text = $text
             MERGE (d)-[:HAS_CHUNK]->(c)"
        } else {
            "MATCH (d:Document {id: $doc_id})
             MERGE (c:Chunk {id: $chunk_id})
             SET c.index = $index
             SET c.text = $text
             SET c.embedding = $embedding
             MERGE (d)-[:HAS_CHUNK]->(c)"
        };

        let mut query = self
            .graph
            .query(cypher)
            .param("doc_id", doc_id)
            .param("chunk_id", chunk_id)
            .param("index", chunk.index as i64)
            .param("text", &chunk.text);
        if !embedding.is_empty() {
            query = query.param("embedding", embedding);
        }
        query.run().await
    }

    /// Merge-creates a concept and links the chunk to it.
    ///
    /// The concept `type` is set only on creation: the first document to
    /// name a concept wins, and later mentions never overwrite it. Concepts
    /// with an empty id are skipped silently.
    async fn merge_concept(&self, chunk_id: &str, concept: &Concept) -> Result<(), AppError> {
        let id = concept.id.trim();
        if id.is_empty() {
            return Ok(());
        }
        let concept_type = sanitize_concept_type(&concept.concept_type);

        self.graph
            .query(
                "MATCH (c:Chunk {id: $chunk_id})
                 MERGE (e:Entity {id: $id})
                 ON CREATE SET e.type = $type
                 MERGE (c)-[:MENTIONS]->(e)",
            )
            .param("chunk_id", chunk_id)
            .param("id", id)
            .param("type", concept_type)
            .run()
            .await
    }

    /// Merge-creates a typed edge between two existing concepts.
    ///
    /// Endpoints are matched, never merged: a relation naming a concept the
    /// entity step did not create is dropped silently by the MATCH. The
    /// sanitized relation type is interpolated as the edge label (labels
    /// cannot be bound as parameters), which is why sanitization is total.
    async fn merge_relation(&self, relation: &Relation) -> Result<(), AppError> {
        let source = relation.source.trim();
        let target = relation.target.trim();
        if source.is_empty() || target.is_empty() {
            warn!("skipping relation with empty endpoint");
            return Ok(());
        }

        let label = sanitize_relation_type(&relation.relation_type);
        let cypher = format!(
            "MATCH (a:Entity {{id: $source}}), (b:Entity {{id: $target}})
             MERGE (a)-[:{}]->(b)",
            label
        );

        self.graph
            .query(&cypher)
            .param("source", source)
            .param("target", target)
            .run()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChunkingConfig, ConverterConfig, GeminiConfig, MemgraphConfig, RetrievalConfig};
    use crate::graph::{CypherExecutor, Params, RowStream};
    use std::sync::Mutex;

    /// Records every statement the repository issues.
    #[derive(Default)]
    struct RecordingExecutor {
        statements: Mutex<Vec<(String, Params)>>,
    }

    #[async_trait::async_trait]
    impl CypherExecutor for RecordingExecutor {
        async fn execute_cypher(
            &self,
            cypher: &str,
            params: Params,
        ) -> Result<RowStream<'_>, AppError> {
            self.statements
                .lock()
                .unwrap()
                .push((cypher.to_string(), params));
            Ok(Box::pin(futures::stream::empty()))
        }

        async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
            self.statements
                .lock()
                .unwrap()
                .push((cypher.to_string(), params));
            Ok(())
        }
    }

    fn test_config(dimensions: usize) -> Arc<Config> {
        Arc::new(Config {
            memgraph: MemgraphConfig::default(),
            gemini: GeminiConfig {
                api_key: "test".to_string(),
                extraction_model: "m".to_string(),
                qa_model: "m".to_string(),
                embedding_model: "m".to_string(),
                dimensions,
                timeout_secs: 5,
            },
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            converter: ConverterConfig::default(),
        })
    }

    fn repo(dimensions: usize) -> (Arc<RecordingExecutor>, IngestRepository) {
        let executor = Arc::new(RecordingExecutor::default());
        let repo = IngestRepository {
            graph: Graph::from_arc(executor.clone()),
            config: test_config(dimensions),
        };
        (executor, repo)
    }

    fn chunk(index: usize, text: &str) -> Chunk {
        Chunk {
            index,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn dimension_mismatch_fails_the_write() {
        let (executor, repo) = repo(4);
        let err = repo
            .write_chunk("doc", &chunk(0, "text"), &[0.1, 0.2], &ChunkExtraction::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Dimension { expected: 4, actual: 2 }));
        assert!(executor.statements.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_embedding_writes_an_unsearchable_chunk() {
        let (executor, repo) = repo(4);
        repo.write_chunk("doc", &chunk(0, "text"), &[], &ChunkExtraction::default())
            .await
            .unwrap();

        let statements = executor.statements.lock().unwrap();
        assert_eq!(statements.len(), 1);
        assert!(!statements[0].0.contains("c.embedding"));
        assert!(statements[0].0.contains("MERGE (d)-[:HAS_CHUNK]->(c)"));
    }

    #[tokio::test]
    async fn relation_label_is_sanitized_before_interpolation() {
        let (executor, repo) = repo(4);
        let extraction = ChunkExtraction {
            entities: vec![],
            relations: vec![Relation {
                source: "Memgraph".to_string(),
                target: "Gemini AI".to_string(),
                relation_type: "supported by".to_string(),
            }],
        };
        repo.write_chunk("doc", &chunk(0, "text"), &[0.0; 4], &extraction)
            .await
            .unwrap();

        let statements = executor.statements.lock().unwrap();
        let relation_stmt = &statements.last().unwrap().0;
        assert!(relation_stmt.contains("[:SUPPORTED_BY]"));
        // Endpoints are matched, never merged
        assert!(relation_stmt.contains("MATCH (a:Entity"));
        assert!(!relation_stmt.contains("MERGE (a:Entity"));
    }

    #[tokio::test]
    async fn concept_type_is_set_only_on_create() {
        let (executor, repo) = repo(4);
        let extraction = ChunkExtraction {
            entities: vec![Concept {
                id: "  Memgraph  ".to_string(),
                concept_type: "Graph DB!".to_string(),
            }],
            relations: vec![],
        };
        repo.write_chunk("doc", &chunk(0, "text"), &[0.0; 4], &extraction)
            .await
            .unwrap();

        let statements = executor.statements.lock().unwrap();
        let (concept_stmt, params) = statements.last().unwrap();
        assert!(concept_stmt.contains("ON CREATE SET e.type"));
        assert_eq!(params["id"], serde_json::json!("Memgraph"));
        assert_eq!(params["type"], serde_json::json!("GraphDB"));
    }

    #[tokio::test]
    async fn empty_concept_ids_and_endpoints_are_skipped() {
        let (executor, repo) = repo(4);
        let extraction = ChunkExtraction {
            entities: vec![Concept {
                id: "   ".to_string(),
                concept_type: "Thing".to_string(),
            }],
            relations: vec![Relation {
                source: "".to_string(),
                target: "Memgraph".to_string(),
                relation_type: "RELATED".to_string(),
            }],
        };
        repo.write_chunk("doc", &chunk(0, "text"), &[0.0; 4], &extraction)
            .await
            .unwrap();

        // Only the chunk statement itself
        assert_eq!(executor.statements.lock().unwrap().len(), 1);
    }
}
