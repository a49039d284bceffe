//! Memgraph backend over the Bolt protocol.
//!
//! Uses the `neo4rs` driver (Memgraph speaks Bolt) with its internal
//! connection pool. Parameters cross the wire as typed Bolt values via the
//! extended protocol and are never interpolated into query text, so
//! injection through parameter values is structurally impossible. Structural
//! labels (relation types) are the one exception and are sanitized upstream
//! before query construction.
//!
//! ```ignore
//! use noesis::graph::backends::memgraph::MemgraphClient;
//! use noesis::graph::{Graph, QueryExt};
//!
//! let client = MemgraphClient::connect("bolt://localhost:7687", "", "").await?;
//! let graph = Graph::new(client);
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use neo4rs::{
    BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltMap, BoltNull, BoltString, BoltType,
};
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::graph::row::{Params, Row, RowStream};
use crate::graph::traits::CypherExecutor;

/// Memgraph graph client.
///
/// Cheap to clone: the underlying `neo4rs::Graph` is pool-backed and
/// `Arc`-based internally.
#[derive(Clone)]
pub struct MemgraphClient {
    graph: neo4rs::Graph,
}

impl MemgraphClient {
    /// Connects to Memgraph over Bolt.
    ///
    /// Memgraph commonly runs without authentication; pass empty strings
    /// for `user` and `password` in that case.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self, AppError> {
        let graph = neo4rs::Graph::new(uri, user, password).await?;
        Ok(Self { graph })
    }

    fn build_query(cypher: &str, params: Params) -> neo4rs::Query {
        let mut query = neo4rs::query(cypher);
        for (name, value) in params {
            query = query.param(&name, json_to_bolt(value));
        }
        query
    }
}

#[async_trait]
impl CypherExecutor for MemgraphClient {
    async fn execute_cypher(
        &self,
        cypher: &str,
        params: Params,
    ) -> Result<RowStream<'_>, AppError> {
        let query_text = cypher.to_string();
        let mut stream = self
            .graph
            .execute(Self::build_query(cypher, params))
            .await
            .map_err(|e| AppError::Query {
                message: e.to_string(),
                query: query_text.clone(),
            })?;

        // Result sets here are small (top-K hits, bounded snapshots), so
        // rows are drained eagerly and replayed as a stream.
        let mut rows = Vec::new();
        loop {
            match stream.next().await {
                Ok(Some(row)) => rows.push(convert_row(row, &query_text)),
                Ok(None) => break,
                Err(e) => {
                    return Err(AppError::Query {
                        message: e.to_string(),
                        query: query_text,
                    })
                }
            }
        }
        Ok(Box::pin(futures::stream::iter(rows)))
    }

    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
        let query_text = cypher.to_string();
        self.graph
            .run(Self::build_query(cypher, params))
            .await
            .map_err(|e| AppError::Query {
                message: e.to_string(),
                query: query_text,
            })
    }
}

fn convert_row(row: neo4rs::Row, query_text: &str) -> Result<Row, AppError> {
    let data: HashMap<String, JsonValue> = row.to().map_err(|e| AppError::Query {
        message: format!("failed to decode row: {}", e),
        query: query_text.to_string(),
    })?;
    Ok(Row::new(data))
}

/// Converts a JSON parameter value to its Bolt wire representation.
fn json_to_bolt(value: JsonValue) -> BoltType {
    match value {
        JsonValue::Null => BoltType::Null(BoltNull),
        JsonValue::Bool(b) => BoltType::Boolean(BoltBoolean::new(b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                BoltType::Integer(BoltInteger::new(i))
            } else {
                BoltType::Float(BoltFloat::new(n.as_f64().unwrap_or(0.0)))
            }
        }
        JsonValue::String(s) => BoltType::String(BoltString::new(&s)),
        JsonValue::Array(items) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(json_to_bolt(item));
            }
            BoltType::List(list)
        }
        JsonValue::Object(entries) => {
            let mut map = BoltMap::new();
            for (key, item) in entries {
                map.put(BoltString::new(&key), json_to_bolt(item));
            }
            BoltType::Map(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_convert_to_bolt() {
        assert!(matches!(json_to_bolt(json!(null)), BoltType::Null(_)));
        assert!(matches!(json_to_bolt(json!(true)), BoltType::Boolean(_)));
        assert!(matches!(json_to_bolt(json!(42)), BoltType::Integer(_)));
        assert!(matches!(json_to_bolt(json!(0.5)), BoltType::Float(_)));
        assert!(matches!(json_to_bolt(json!("chunk")), BoltType::String(_)));
    }

    #[test]
    fn embedding_arrays_convert_to_bolt_lists() {
        let bolt = json_to_bolt(json!([0.1, 0.2, 0.3]));
        match bolt {
            BoltType::List(list) => assert_eq!(list.value.len(), 3),
            other => panic!("expected list, got {:?}", other),
        }
    }
}
