//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/noesis/config.toml` (XDG) or platform config dir
//! 2. Project config: `.noesis.toml`
//! 3. Environment variables: `NOESIS_*` (double underscore separates sections,
//!    e.g. `NOESIS_GEMINI__API_KEY`)
//!
//! # Intended Usage
//!
//! ```toml
//! [memgraph]
//! uri = "bolt://localhost:7687"
//!
//! [gemini]
//! api_key = "..."
//! extraction_model = "gemini-2.5-flash"
//! qa_model = "gemini-2.5-flash"
//! embedding_model = "text-embedding-004"
//! dimensions = 768
//!
//! [chunking]
//! window_size = 512
//! overlap = 50
//!
//! [retrieval]
//! top_k = 3
//!
//! [converter]
//! endpoint = "http://localhost:5001"
//! ```
//!
//! Only `gemini.api_key` has no default. The `converter` endpoint is optional;
//! without it, PDF ingestion reports a conversion error instead of degrading
//! silently.

use std::ops::Deref;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub memgraph: MemgraphConfig,
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
}

/// Memgraph connection configuration (Bolt protocol).
#[derive(Debug, Clone, Deserialize)]
pub struct MemgraphConfig {
    /// Bolt URI, e.g. `bolt://localhost:7687`.
    #[serde(default = "default_memgraph_uri")]
    pub uri: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl Default for MemgraphConfig {
    fn default() -> Self {
        Self {
            uri: default_memgraph_uri(),
            user: String::new(),
            password: String::new(),
        }
    }
}

fn default_memgraph_uri() -> String {
    "bolt://localhost:7687".to_string()
}

/// Gemini API configuration for extraction, synthesis and embeddings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// API key (required).
    pub api_key: String,
    /// Model used for per-chunk entity/relation extraction.
    #[serde(default = "default_extraction_model")]
    pub extraction_model: String,
    /// Model used for answer synthesis.
    #[serde(default = "default_qa_model")]
    pub qa_model: String,
    /// Embedding model identifier.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Embedding vector dimensions. Must match the vector index.
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// Per-call HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_extraction_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_qa_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_dimensions() -> usize {
    768
}

fn default_timeout_secs() -> u64 {
    60
}

/// Token-window chunking configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingConfig {
    /// Tokens per chunk window.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Tokens shared between consecutive windows.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            overlap: default_overlap(),
        }
    }
}

fn default_window_size() -> usize {
    512
}

fn default_overlap() -> usize {
    50
}

/// Retrieval configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Number of nearest chunks fetched per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    3
}

/// Document conversion service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConverterConfig {
    /// Base URL of the conversion service. PDF ingestion fails with a
    /// conversion error when unset.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Per-call HTTP timeout in seconds. Conversion of large PDFs is slow.
    #[serde(default = "default_converter_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_converter_timeout_secs(),
        }
    }
}

fn default_converter_timeout_secs() -> u64 {
    120
}

impl Config {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        let user_config = Self::user_config_path();

        Figment::new()
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(user_config))
            // Layer 2: Project config
            .merge(Toml::file(".noesis.toml"))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("NOESIS_").split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// User config path: ~/.config/noesis/config.toml (XDG) or platform config dir.
    fn user_config_path() -> std::path::PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("noesis").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("noesis").join("config.toml"))
            .unwrap_or_default()
    }
}
