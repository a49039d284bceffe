//! Backend implementations for the graph abstraction.
//!
//! A backend implements [`CypherExecutor`](crate::graph::CypherExecutor)
//! over a concrete store driver. The only backend today is Memgraph over
//! the Bolt protocol, which also provides the `vector_search` procedures
//! the retrieval path depends on.

pub mod memgraph;
