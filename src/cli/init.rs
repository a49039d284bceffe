//! Init command handler.

use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromRef;
use crate::repositories::SchemaRepository;

use super::App;

impl App {
    /// Run the init command to create the vector and lookup indexes.
    pub async fn run_init(&self, reset: bool) -> Result<()> {
        let config = Config::load()?;
        tracing::info!("Connecting to Memgraph at {}", config.memgraph.uri);
        let ctx = Context::init(config).await?;

        let schema = SchemaRepository::from_ref(&ctx);

        if reset {
            tracing::info!("Resetting store (all data and the vector index)...");
            schema.reset().await?;
        }

        schema.ensure().await?;
        tracing::info!("Indexes ready");

        Ok(())
    }
}
