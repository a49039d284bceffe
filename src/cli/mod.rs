//! CLI module for Noesis.
//!
//! Subcommands:
//! - `init`: Create the vector and lookup indexes (optionally reset first)
//! - `ingest`: Run a document through the ingestion pipeline
//! - `query`: Answer a question grounded in ingested documents
//! - `snapshot`: Print a bounded JSON view of the concept graph

mod ingest;
mod init;
mod query;
mod snapshot;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Noesis - GraphRAG knowledge pipeline
#[derive(Parser)]
#[command(name = "noesis")]
#[command(about = "GraphRAG pipeline - document ingestion and grounded question answering")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the vector index and lookup indexes
    Init {
        /// Delete all data and drop the vector index first
        #[arg(long)]
        reset: bool,
    },

    /// Ingest a document into the knowledge graph
    Ingest {
        /// Path to a text or PDF file
        path: PathBuf,
    },

    /// Answer a question from the ingested documents
    Query {
        /// The question to answer
        question: String,
    },

    /// Print a bounded JSON snapshot of the concept graph
    Snapshot {
        /// Maximum number of nodes and of edges
        #[arg(long, default_value = "100")]
        limit: usize,
    },
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Init { reset } => self.run_init(reset).await,
            Command::Ingest { ref path } => self.run_ingest(path).await,
            Command::Query { ref question } => self.run_query(question).await,
            Command::Snapshot { limit } => self.run_snapshot(limit).await,
        }
    }
}
