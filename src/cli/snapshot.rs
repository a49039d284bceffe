//! Snapshot command handler.

use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromRef;
use crate::repositories::SearchRepository;

use super::App;

impl App {
    /// Run the snapshot command: print a bounded concept-graph view as JSON.
    pub async fn run_snapshot(&self, limit: usize) -> Result<()> {
        let config = Config::load()?;
        let ctx = Context::init(config).await?;

        let search = SearchRepository::from_ref(&ctx);
        let snapshot = search.snapshot(limit).await?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);

        Ok(())
    }
}
