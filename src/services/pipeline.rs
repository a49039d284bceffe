//! Ingestion pipeline orchestrator.
//!
//! Drives one file through read → chunk → extract → embed → write, emitting
//! human-readable status events as a finite stream. Chunks are processed
//! strictly sequentially in index order.

use std::path::PathBuf;

use async_stream::stream;
use futures::Stream;
use tracing::{info, warn};

use crate::context::{AppEmbedder, Context};
use crate::di::FromContext;
use crate::llm::EmbeddingMode;
use crate::models::{normalize_document_id, Document};
use crate::repositories::IngestRepository;
use crate::services::{Chunker, ContentReader, ExtractionService};

/// Orchestrates single-file ingestion.
#[derive(FromContext, Clone)]
pub struct PipelineService {
    pub(crate) reader: ContentReader,
    pub(crate) chunker: Chunker,
    pub(crate) extraction: ExtractionService,
    pub(crate) embedder: AppEmbedder,
    pub(crate) ingest: IngestRepository,
}

impl PipelineService {
    /// Processes one file, yielding status events until done or failed.
    ///
    /// Read, conversion, and graph-write failures terminate the stream with
    /// an error event. Extraction and embedding failures degrade the
    /// affected chunk and processing continues.
    pub fn process(&self, path: PathBuf) -> impl Stream<Item = String> + Send {
        let this = self.clone();
        stream! {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| path.display().to_string());

            yield format!("Reading file: {}", name);

            let text = match this.reader.read(&path).await {
                Ok(text) => text,
                Err(e) => {
                    yield format!("Error processing {}: {}", name, e);
                    return;
                }
            };

            let chunks = this.chunker.chunk(&text);
            if chunks.is_empty() {
                yield "File is empty.".to_string();
                return;
            }
            yield format!("Created {} chunks.", chunks.len());

            let doc = Document {
                id: normalize_document_id(&name),
            };
            if let Err(e) = this.ingest.merge_document(&doc).await {
                yield format!("Error processing {}: {}", name, e);
                return;
            }

            let total = chunks.len();
            for chunk in &chunks {
                yield format!("Processing chunk {}/{}", chunk.index + 1, total);

                let outcome = this.extraction.extract(&chunk.text).await;
                if let Some(cause) = &outcome.degraded {
                    warn!(chunk = chunk.index, cause, "chunk stored without graph data");
                }

                let embedding = match this
                    .embedder
                    .embed(&chunk.text, EmbeddingMode::Document)
                    .await
                {
                    Ok(vector) => vector,
                    Err(e) => {
                        warn!(chunk = chunk.index, error = %e, "chunk stored without embedding");
                        Vec::new()
                    }
                };

                if let Err(e) = this
                    .ingest
                    .write_chunk(&doc.id, chunk, &embedding, &outcome.payload)
                    .await
                {
                    yield format!("Error processing {}: {}", name, e);
                    return;
                }
            }

            info!(document = %doc.id, chunks = total, "ingestion complete");
            yield format!("Successfully processed {}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ChunkingConfig, Config, ConverterConfig, GeminiConfig, MemgraphConfig, RetrievalConfig,
    };
    use crate::convert::DisabledConverter;
    use crate::error::AppError;
    use crate::graph::{CypherExecutor, Graph, Params, RowStream};
    use crate::llm::{GenerateRequest, LanguageModel, TextEmbedder};
    use futures::StreamExt;
    use std::io::Write as _;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingExecutor {
        statements: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl CypherExecutor for RecordingExecutor {
        async fn execute_cypher(
            &self,
            cypher: &str,
            _params: Params,
        ) -> Result<RowStream<'_>, AppError> {
            self.statements.lock().unwrap().push(cypher.to_string());
            Ok(Box::pin(futures::stream::empty()))
        }

        async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
            self.execute_cypher(cypher, params).await.map(|_| ())
        }
    }

    struct FixedModel(Result<&'static str, &'static str>);

    #[async_trait::async_trait]
    impl LanguageModel for FixedModel {
        async fn generate(&self, _request: GenerateRequest<'_>) -> Result<String, AppError> {
            self.0
                .map(str::to_string)
                .map_err(|e| AppError::Extraction(e.to_string()))
        }
    }

    struct FixedEmbedder(Result<Vec<f32>, &'static str>);

    #[async_trait::async_trait]
    impl TextEmbedder for FixedEmbedder {
        async fn embed(&self, _text: &str, _mode: EmbeddingMode) -> Result<Vec<f32>, AppError> {
            self.0
                .clone()
                .map_err(|e| AppError::Embedding(e.to_string()))
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
                dimensions: 3,
                timeout_secs: 5,
            },
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            converter: ConverterConfig::default(),
        })
    }

    fn pipeline(
        extraction: Result<&'static str, &'static str>,
        embedding: Result<Vec<f32>, &'static str>,
    ) -> (Arc<RecordingExecutor>, PipelineService) {
        let executor = Arc::new(RecordingExecutor::default());
        let service = PipelineService {
            reader: ContentReader {
                converter: Arc::new(DisabledConverter),
            },
            chunker: Chunker::new(512, 50),
            extraction: ExtractionService {
                llm: Arc::new(FixedModel(extraction)),
            },
            embedder: Arc::new(FixedEmbedder(embedding)),
            ingest: IngestRepository {
                graph: Graph::from_arc(executor.clone()),
                config: test_config(),
            },
        };
        (executor, service)
    }

    fn temp_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::with_suffix(".txt").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    async fn collect(service: &PipelineService, path: PathBuf) -> Vec<String> {
        service.process(path).collect().await
    }

    #[tokio::test]
    async fn successful_run_emits_the_full_status_sequence() {
        let file = temp_file("Memgraph is a graph database.");
        let (executor, service) = pipeline(
            Ok(r#"{"entities": [{"id": "Memgraph", "type": "Technology"}], "relations": []}"#),
            Ok(vec![0.1, 0.2, 0.3]),
        );

        let events = collect(&service, file.path().to_path_buf()).await;
        let name = file.path().file_name().unwrap().to_str().unwrap().to_string();

        assert_eq!(events[0], format!("Reading file: {}", name));
        assert_eq!(events[1], "Created 1 chunks.");
        assert_eq!(events[2], "Processing chunk 1/1");
        assert_eq!(events[3], format!("Successfully processed {}", name));

        let statements = executor.statements.lock().unwrap();
        assert!(statements[0].contains("MERGE (d:Document"));
        assert!(statements[1].contains("SET c.embedding"));
        assert!(statements.iter().any(|s| s.contains("MERGE (c)-[:MENTIONS]->(e)")));
    }

    #[tokio::test]
    async fn empty_file_is_done_with_zero_work() {
        let file = temp_file("   \n  ");
        let (executor, service) = pipeline(Ok("{}"), Ok(vec![0.0; 3]));

        let events = collect(&service, file.path().to_path_buf()).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], "File is empty.");
        assert!(executor.statements.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_terminates_with_an_error_event() {
        let (executor, service) = pipeline(Ok("{}"), Ok(vec![0.0; 3]));
        let events = collect(&service, PathBuf::from("/no/such/notes.txt")).await;

        assert_eq!(events.len(), 2);
        assert!(events[1].starts_with("Error processing notes.txt:"));
        assert!(executor.statements.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn degraded_extraction_and_embedding_still_store_the_chunk() {
        let file = temp_file("some text");
        let (executor, service) = pipeline(Err("HTTP 503"), Err("quota exhausted"));

        let events = collect(&service, file.path().to_path_buf()).await;
        assert!(events.last().unwrap().starts_with("Successfully processed"));

        let statements = executor.statements.lock().unwrap();
        // Document merge plus the vectorless chunk write, nothing else
        assert_eq!(statements.len(), 2);
        assert!(!statements[1].contains("c.embedding"));
    }
}
