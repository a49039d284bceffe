//! Read side: similarity search over chunks and graph snapshots.

use crate::context::Context;
use crate::di::FromContext;
use crate::error::AppError;
use crate::graph::Graph;
use crate::models::{GraphSnapshot, SnapshotEdge, SnapshotNode, SourceHit};
use crate::repositories::CHUNK_VECTOR_INDEX;

/// Repository for retrieval-time reads.
#[derive(FromContext, Clone)]
pub struct SearchRepository {
    pub(crate) graph: Graph,
}

impl SearchRepository {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    /// Returns the `k` chunks nearest to `vector`, each with the concepts
    /// it mentions, ordered by descending similarity.
    ///
    /// Fewer than `k` hits (including zero, on an empty index) is a normal
    /// result, not an error.
    pub async fn nearest_chunks(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<SourceHit>, AppError> {
        // The search procedure takes its limit as a literal, not a parameter.
        let cypher = format!(
            "CALL vector_search.search('{}', {}, $vector) YIELD node, score
             OPTIONAL MATCH (node)-[:MENTIONS]->(e:Entity)
             RETURN node.text AS text, score AS score, collect(e.id) AS entities",
            CHUNK_VECTOR_INDEX, k
        );

        let rows = self
            .graph
            .query(&cypher)
            .param("vector", vector)
            .fetch_all()
            .await?;

        let mut hits = Vec::with_capacity(rows.len());
        for row in rows {
            // collect() yields [null] when the OPTIONAL MATCH found nothing
            let entities: Vec<Option<String>> = row.get("entities")?;
            hits.push(SourceHit {
                text: row.get("text")?,
                score: row.get("score")?,
                entities: entities.into_iter().flatten().collect(),
            });
        }
        Ok(hits)
    }

    /// Returns a bounded view of the concept graph: up to `limit` concept
    /// nodes and up to `limit` concept-to-concept edges.
    ///
    /// Documents and chunks are plumbing and stay out of the snapshot. The
    /// two limits are independent, so edges may reference nodes outside the
    /// node sample.
    pub async fn snapshot(&self, limit: usize) -> Result<GraphSnapshot, AppError> {
        let node_rows = self
            .graph
            .query(&format!(
                "MATCH (e:Entity) RETURN e.id AS id, e.type AS type LIMIT {}",
                limit
            ))
            .fetch_all()
            .await?;

        let mut nodes = Vec::with_capacity(node_rows.len());
        for row in node_rows {
            nodes.push(SnapshotNode {
                id: row.get("id")?,
                node_type: row.get_opt("type")?,
            });
        }

        let edge_rows = self
            .graph
            .query(&format!(
                "MATCH (a:Entity)-[r]->(b:Entity)
                 RETURN a.id AS source, b.id AS target, type(r) AS type LIMIT {}",
                limit
            ))
            .fetch_all()
            .await?;

        let mut edges = Vec::with_capacity(edge_rows.len());
        for row in edge_rows {
            edges.push(SnapshotEdge {
                source: row.get("source")?,
                target: row.get("target")?,
                edge_type: row.get("type")?,
            });
        }

        Ok(GraphSnapshot { nodes, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CypherExecutor, Params, Row, RowStream};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Replays canned rows for each statement, in call order.
    struct CannedExecutor {
        responses: Mutex<Vec<Vec<Row>>>,
        statements: Mutex<Vec<(String, Params)>>,
    }

    impl CannedExecutor {
        fn new(responses: Vec<Vec<Row>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                statements: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl CypherExecutor for CannedExecutor {
        async fn execute_cypher(
            &self,
            cypher: &str,
            params: Params,
        ) -> Result<RowStream<'_>, AppError> {
            self.statements
                .lock()
                .unwrap()
                .push((cypher.to_string(), params));
            let rows = self.responses.lock().unwrap().pop().unwrap_or_default();
            Ok(Box::pin(futures::stream::iter(rows.into_iter().map(Ok))))
        }

        async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
            self.execute_cypher(cypher, params).await.map(|_| ())
        }
    }

    fn row(values: serde_json::Value) -> Row {
        Row::new(serde_json::from_value(values).unwrap())
    }

    fn repo(responses: Vec<Vec<Row>>) -> (Arc<CannedExecutor>, SearchRepository) {
        let executor = Arc::new(CannedExecutor::new(responses));
        let repo = SearchRepository {
            graph: Graph::from_arc(executor.clone()),
        };
        (executor, repo)
    }

    #[tokio::test]
    async fn nearest_chunks_maps_rows_to_hits() {
        let (executor, repo) = repo(vec![vec![
            row(json!({"text": "Memgraph supports vectors.", "score": 0.91,
                       "entities": ["Memgraph", "Vector Search"]})),
            row(json!({"text": "Unrelated chunk.", "score": 0.42, "entities": [null]})),
        ]]);

        let hits = repo.nearest_chunks(&[0.1, 0.2], 3).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entities, vec!["Memgraph", "Vector Search"]);
        // A null from the unmatched OPTIONAL MATCH is dropped
        assert!(hits[1].entities.is_empty());

        let statements = executor.statements.lock().unwrap();
        assert!(statements[0]
            .0
            .contains("CALL vector_search.search('chunk_vector_index', 3, $vector)"));
        assert_eq!(statements[0].1["vector"], json!([0.1, 0.2]));
    }

    #[tokio::test]
    async fn nearest_chunks_on_empty_index_returns_no_hits() {
        let (_, repo) = repo(vec![vec![]]);
        let hits = repo.nearest_chunks(&[0.1], 3).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn snapshot_collects_nodes_and_edges() {
        let (executor, repo) = repo(vec![
            vec![
                row(json!({"id": "Memgraph", "type": "Technology"})),
                row(json!({"id": "Orphan", "type": null})),
            ],
            vec![row(json!({"source": "Memgraph", "target": "Gemini AI",
                            "type": "SUPPORTED_BY"}))],
        ]);

        let snapshot = repo.snapshot(100).await.unwrap();
        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.nodes[1].node_type, None);
        assert_eq!(snapshot.edges[0].edge_type, "SUPPORTED_BY");

        let statements = executor.statements.lock().unwrap();
        assert!(statements[0].0.contains("LIMIT 100"));
        assert!(statements[1].0.contains("type(r) AS type"));
    }
}
