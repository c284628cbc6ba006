/// Word-vector lookup capability and its two implementations.
///
/// The [`WordVectors`] trait is the contract every embedding source must
/// satisfy: resolve a token to its vector, answer distance queries between
/// tokens. Local in-memory stores ([`local::KeyedVectors`]) and the remote
/// proxy ([`restful::RestfulKeyedVectors`]) are drop-in substitutable
/// behind it.
pub mod local;
pub mod restful;
pub mod word2vec;

use thiserror::Error;

/// Errors that can occur while querying an embedding source.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("token not found in vocabulary: {token}")]
    TokenNotFound { token: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Errors that can occur while loading a model file into a local store.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("io error reading model: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error at entry {entry}: {message}")]
    Parse { entry: usize, message: String },

    #[error("dimension mismatch for token {token:?}: expected {expected}, got {actual}")]
    DimensionMismatch {
        token: String,
        expected: usize,
        actual: usize,
    },
}

/// Trait for embedding lookup sources.
///
/// All implementations must be `Send + Sync` so independent threads can
/// query a shared source concurrently. Calls are synchronous and blocking;
/// no retries or caching happen at this layer.
pub trait WordVectors: Send + Sync {
    /// Return the dimensionality of the vectors served by this source.
    fn dimensions(&self) -> usize;

    /// Return whether `token` is in this source's vocabulary.
    ///
    /// The default implementation probes via [`get_vector`](Self::get_vector);
    /// a missing token maps to `false` while transport and protocol failures
    /// stay errors.
    fn contains(&self, token: &str) -> Result<bool, LookupError> {
        match self.get_vector(token) {
            Ok(_) => Ok(true),
            Err(LookupError::TokenNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Return the embedding vector for `token`.
    ///
    /// Fails with [`LookupError::TokenNotFound`] when the token is absent
    /// from the vocabulary.
    fn get_vector(&self, token: &str) -> Result<Vec<f32>, LookupError>;

    /// Return the scalar distance between two tokens.
    ///
    /// The metric is owned by the source (cosine, Poincaré-ball, or
    /// whatever the remote service computes); callers treat it opaquely.
    fn distance(&self, entity1: &str, entity2: &str) -> Result<f32, LookupError>;

    /// Return the distance from `entity1` to each of `others`, one scalar
    /// per candidate, in the same order as `others`.
    fn distances(&self, entity1: &str, others: &[&str]) -> Result<Vec<f32>, LookupError>;

    /// Return every vocabulary token strictly closer to `entity1` than
    /// `entity2` is, excluding `entity1` itself.
    fn closer_than(&self, entity1: &str, entity2: &str) -> Result<Vec<String>, LookupError>;
}
