//! # shortvec — word-embedding lookup and short-text vectorization
//!
//! A thin access layer over pre-trained word embeddings: in-memory stores
//! loaded from word2vec-format files (Word2Vec, fastText `.vec`, Poincaré)
//! and a RESTful remote proxy, both behind one lookup trait, plus an
//! aggregator that turns a short span of text into a single L2-normalized
//! vector by summing token embeddings.
//!
//! ## Architecture
//!
//! - **[`vectors`]** — `WordVectors` lookup trait, in-memory `KeyedVectors`,
//!   RESTful remote proxy, word2vec-format loaders
//! - **[`aggregate`]** — short text → vector (sum in-vocabulary embeddings,
//!   L2-normalize)
//! - **[`tokenize`]** — whitespace tokenizer feeding the aggregator
//! - **[`config`]** — JSON configuration loading, validation, and defaults
//! - **[`cli`]** — clap argument types and command dispatch

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod tokenize;
pub mod vectors;
