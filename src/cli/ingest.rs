//! Ingest command handler.

use std::path::Path;
use std::pin::pin;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use futures::StreamExt;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromRef;
use crate::services::PipelineService;

use super::App;

impl App {
    /// Run the ingest command: process one file, printing status events.
    pub async fn run_ingest(&self, path: &Path) -> Result<()> {
        let config = Config::load()?;
        let ctx = Context::init(config).await?;

        let pipeline = PipelineService::from_ref(&ctx);
        let mut stream = pin!(pipeline.process(path.to_path_buf()));

        let mut failed = false;
        while let Some(status) = stream.next().await {
            failed = status.starts_with("Error processing");
            println!("{}", status);
        }

        if failed {
            return Err(eyre!("ingestion failed for {}", path.display()));
        }
        Ok(())
    }
}
