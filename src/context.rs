//! Application context providing the dependency injection root.

use std::sync::Arc;

use crate::config::Config;
use crate::convert::{DisabledConverter, DoclingConverter, DocumentConverter};
use crate::di::{Context as ContextDerive, FromRef};
use crate::error::AppError;
use crate::graph::backends::memgraph::MemgraphClient;
use crate::graph::Graph;
use crate::llm::{GeminiClient, LanguageModel, TextEmbedder};
use crate::services::Chunker;

/// Shared text-generation capability.
pub type AppLlm = Arc<dyn LanguageModel>;
/// Shared embedding capability.
pub type AppEmbedder = Arc<dyn TextEmbedder>;
/// Shared document conversion capability.
pub type AppConverter = Arc<dyn DocumentConverter>;

/// Root application context for dependency injection.
///
/// Holds all shared dependencies; `#[derive(Context)]` generates a
/// `FromRef` implementation for each field, enabling compile-time
/// dependency resolution. Cloning is cheap and the clone is safe to use
/// from concurrent tasks.
#[derive(ContextDerive, Clone)]
pub struct Context {
    /// Graph store handle (Bolt connection pool).
    pub graph: Graph,
    /// Text generation (extraction and answer synthesis).
    pub llm: AppLlm,
    /// Text embedding.
    pub embedder: AppEmbedder,
    /// PDF-to-markdown conversion.
    pub converter: AppConverter,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl Context {
    /// Connects to the graph store and builds the model clients.
    pub async fn init(config: Config) -> Result<Self, AppError> {
        let client = MemgraphClient::connect(
            &config.memgraph.uri,
            &config.memgraph.user,
            &config.memgraph.password,
        )
        .await?;

        let gemini = Arc::new(GeminiClient::new(&config.gemini)?);

        let converter: AppConverter = match &config.converter.endpoint {
            Some(endpoint) => Arc::new(DoclingConverter::new(
                endpoint,
                config.converter.timeout_secs,
            )?),
            None => Arc::new(DisabledConverter),
        };

        Ok(Self {
            graph: Graph::new(client),
            llm: gemini.clone(),
            embedder: gemini,
            converter,
            config: Arc::new(config),
        })
    }
}

// Built from configuration on demand rather than stored on the context.
impl FromRef<Context> for Chunker {
    fn from_ref(ctx: &Context) -> Self {
        Chunker::new(ctx.config.chunking.window_size, ctx.config.chunking.overlap)
    }
}
