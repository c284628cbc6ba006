/// CLI argument types and command dispatch.
///
/// Builds a lookup source from the configuration (optionally overridden by
/// flags) and runs one query against it. Results are printed as JSON on
/// stdout; diagnostics go to stderr via tracing.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use crate::aggregate::avg_vector;
use crate::config::{Config, ModelKind, RemoteConfig};
use crate::vectors::WordVectors;
use crate::vectors::local::{KeyedVectors, Metric};
use crate::vectors::restful::RestfulKeyedVectors;
use crate::vectors::word2vec::{load_fasttext_model, load_poincare_model, load_word2vec_model};

#[derive(Parser)]
#[command(name = "shortvec", version, about = "Word-embedding lookup and short-text vectorization")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.json")]
    pub config: String,

    /// Path to a local model file (overrides config)
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Format of the local model file
    #[arg(long, value_enum)]
    pub kind: Option<ModelKind>,

    /// Treat the local model file as binary word2vec format
    #[arg(long)]
    pub binary: bool,

    /// Base URL of a remote embedding service (overrides config)
    #[arg(long, conflicts_with = "model")]
    pub remote_url: Option<String>,

    /// Port of the remote embedding service
    #[arg(long)]
    pub remote_port: Option<u16>,

    /// Vector dimensionality of the remote service
    #[arg(long)]
    pub dimensions: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Aggregate a short text into a single normalized vector
    Vectorize { text: String },

    /// Print the embedding vector of a single token
    GetVector { token: String },

    /// Print the distance between two tokens
    Distance { entity1: String, entity2: String },

    /// Print the distances from a token to each candidate, in order
    Distances { token: String, others: Vec<String> },

    /// Print the tokens closer to the first entity than the second is
    CloserThan { entity1: String, entity2: String },

    /// Print a description of the configured lookup source
    Info,
}

/// A built lookup source, kept as an enum so `info` can report
/// variant-specific details.
pub enum Source {
    Local(KeyedVectors),
    Remote(RestfulKeyedVectors),
}

impl Source {
    #[must_use]
    pub fn as_word_vectors(&self) -> &dyn WordVectors {
        match self {
            Source::Local(kv) => kv,
            Source::Remote(remote) => remote,
        }
    }

    #[must_use]
    pub fn info(&self) -> serde_json::Value {
        match self {
            Source::Local(kv) => json!({
                "source": "local",
                "dimensions": kv.dimensions(),
                "vocabulary_size": kv.len(),
                "metric": match kv.metric() {
                    Metric::Cosine => "cosine",
                    Metric::Poincare => "poincare",
                },
            }),
            Source::Remote(remote) => json!({
                "source": "remote",
                "endpoint": remote.endpoint().as_str(),
                "dimensions": remote.dimensions(),
            }),
        }
    }
}

/// Fold command-line overrides into the loaded configuration.
fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(path) = &cli.model {
        config.model.path = path.display().to_string();
        config.remote = None;
    }
    if let Some(kind) = cli.kind {
        config.model.kind = kind;
    }
    if cli.binary {
        config.model.binary = true;
    }
    if let Some(url) = &cli.remote_url {
        let remote = config.remote.get_or_insert_with(RemoteConfig::default);
        remote.url = url.clone();
    }
    if let Some(remote) = &mut config.remote {
        if let Some(port) = cli.remote_port {
            remote.port = port;
        }
        if let Some(dimensions) = cli.dimensions {
            remote.dimensions = dimensions;
        }
    }
}

/// Build the lookup source the configuration declares.
pub fn build_source(config: &Config) -> Result<Source> {
    if let Some(remote) = &config.remote {
        let source = RestfulKeyedVectors::new(&remote.url, remote.port, remote.dimensions)
            .with_context(|| format!("invalid remote endpoint {}", remote.url))?;
        return Ok(Source::Remote(source));
    }

    let path = Path::new(&config.model.path);
    let kv = match config.model.kind {
        ModelKind::Word2vec => load_word2vec_model(path, config.model.binary),
        ModelKind::Fasttext => load_fasttext_model(path),
        ModelKind::Poincare => load_poincare_model(path, config.model.binary),
    }
    .with_context(|| format!("failed to load model from {}", path.display()))?;
    Ok(Source::Local(kv))
}

/// Run one command against the configured lookup source.
pub fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(&cli.config)?;
    apply_overrides(&cli, &mut config);
    config.validate()?;

    let source = build_source(&config)?;
    let model = source.as_word_vectors();

    match &cli.command {
        Command::Vectorize { text } => {
            let vector = avg_vector(text, model)?;
            println!("{}", serde_json::to_string(&vector)?);
        }
        Command::GetVector { token } => {
            let vector = model.get_vector(token)?;
            println!("{}", serde_json::to_string(&vector)?);
        }
        Command::Distance { entity1, entity2 } => {
            println!("{}", model.distance(entity1, entity2)?);
        }
        Command::Distances { token, others } => {
            let refs: Vec<&str> = others.iter().map(String::as_str).collect();
            let distances = model.distances(token, &refs)?;
            println!("{}", serde_json::to_string(&distances)?);
        }
        Command::CloserThan { entity1, entity2 } => {
            let tokens = model.closer_than(entity1, entity2)?;
            println!("{}", serde_json::to_string(&tokens)?);
        }
        Command::Info => {
            println!("{}", serde_json::to_string_pretty(&source.info())?);
        }
    }

    Ok(())
}
