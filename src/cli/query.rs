//! Query command handler.

use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromRef;
use crate::services::RetrievalService;

use super::App;

impl App {
    /// Run the query command: answer a question and print the response
    /// (answer plus sources) as JSON.
    ///
    /// Retrieval errors print as an `{"error": ...}` document rather than
    /// aborting, matching the response shape consumers parse.
    pub async fn run_query(&self, question: &str) -> Result<()> {
        let config = Config::load()?;
        let ctx = Context::init(config).await?;

        let retrieval = RetrievalService::from_ref(&ctx);
        match retrieval.search(question).await {
            Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
            Err(e) => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "error": e.to_string() }))?
            ),
        }

        Ok(())
    }
}
