/// In-memory keyed-vector store.
///
/// Loaders build the table once; it is read-only afterwards, so concurrent
/// readers need no locking. Tokens keep their insertion order, which makes
/// whole-vocabulary scans (`closer_than`) deterministic.
use std::collections::HashMap;

use super::{LoadError, LookupError, WordVectors};

/// Distance metric a local store answers queries under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Cosine distance `1 − cos(u, v)`, used for word2vec and fastText
    /// vectors. Range [0, 2].
    Cosine,
    /// Poincaré-ball distance, used for hyperbolic embeddings. Range [0, ∞);
    /// vectors are assumed to lie inside the unit ball.
    Poincare,
}

/// An in-memory token → vector table implementing [`WordVectors`].
#[derive(Debug)]
pub struct KeyedVectors {
    tokens: Vec<String>,
    /// Flat row-major storage, `tokens.len() * dimensions` values.
    vectors: Vec<f32>,
    index: HashMap<String, usize>,
    dimensions: usize,
    metric: Metric,
}

impl KeyedVectors {
    /// Create an empty store for vectors of the given dimensionality.
    #[must_use]
    pub fn new(dimensions: usize, metric: Metric) -> Self {
        Self {
            tokens: Vec::new(),
            vectors: Vec::new(),
            index: HashMap::new(),
            dimensions,
            metric,
        }
    }

    /// Append a token with its vector.
    ///
    /// Returns `Ok(false)` without modifying the store when the token is
    /// already present (first occurrence wins). Fails when the vector's
    /// length does not match the store's dimensionality.
    pub fn push(&mut self, token: &str, values: Vec<f32>) -> Result<bool, LoadError> {
        if values.len() != self.dimensions {
            return Err(LoadError::DimensionMismatch {
                token: token.to_string(),
                expected: self.dimensions,
                actual: values.len(),
            });
        }
        if self.index.contains_key(token) {
            return Ok(false);
        }
        self.index.insert(token.to_string(), self.tokens.len());
        self.tokens.push(token.to_string());
        self.vectors.extend(values);
        Ok(true)
    }

    /// Number of tokens in the vocabulary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Vocabulary tokens in insertion order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn row(&self, token: &str) -> Result<&[f32], LookupError> {
        let &i = self
            .index
            .get(token)
            .ok_or_else(|| LookupError::TokenNotFound {
                token: token.to_string(),
            })?;
        Ok(&self.vectors[i * self.dimensions..(i + 1) * self.dimensions])
    }

    fn metric_distance(&self, u: &[f32], v: &[f32]) -> f32 {
        match self.metric {
            Metric::Cosine => cosine_distance(u, v),
            Metric::Poincare => poincare_distance(u, v),
        }
    }
}

impl WordVectors for KeyedVectors {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn contains(&self, token: &str) -> Result<bool, LookupError> {
        Ok(self.index.contains_key(token))
    }

    fn get_vector(&self, token: &str) -> Result<Vec<f32>, LookupError> {
        Ok(self.row(token)?.to_vec())
    }

    fn distance(&self, entity1: &str, entity2: &str) -> Result<f32, LookupError> {
        Ok(self.metric_distance(self.row(entity1)?, self.row(entity2)?))
    }

    fn distances(&self, entity1: &str, others: &[&str]) -> Result<Vec<f32>, LookupError> {
        let u = self.row(entity1)?;
        others
            .iter()
            .map(|other| Ok(self.metric_distance(u, self.row(other)?)))
            .collect()
    }

    fn closer_than(&self, entity1: &str, entity2: &str) -> Result<Vec<String>, LookupError> {
        let u = self.row(entity1)?;
        let cutoff = self.metric_distance(u, self.row(entity2)?);

        let mut result = Vec::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if token == entity1 {
                continue;
            }
            let row = &self.vectors[i * self.dimensions..(i + 1) * self.dimensions];
            if self.metric_distance(u, row) < cutoff {
                result.push(token.clone());
            }
        }
        Ok(result)
    }
}

/// Cosine distance `1 − (u·v)/(‖u‖‖v‖)`.
///
/// A zero vector has no direction; its similarity to anything is taken as
/// 0, giving a distance of 1.
#[must_use]
pub fn cosine_distance(u: &[f32], v: &[f32]) -> f32 {
    let dot: f32 = u.iter().zip(v).map(|(a, b)| a * b).sum();
    let u_norm: f32 = u.iter().map(|a| a * a).sum::<f32>().sqrt();
    let v_norm: f32 = v.iter().map(|a| a * a).sum::<f32>().sqrt();
    if u_norm == 0.0 || v_norm == 0.0 {
        return 1.0;
    }
    1.0 - dot / (u_norm * v_norm)
}

/// Poincaré-ball distance
/// `arcosh(1 + 2‖u−v‖² / ((1−‖u‖²)(1−‖v‖²)))`.
#[must_use]
pub fn poincare_distance(u: &[f32], v: &[f32]) -> f32 {
    let diff_sq: f32 = u.iter().zip(v).map(|(a, b)| (a - b) * (a - b)).sum();
    let u_sq: f32 = u.iter().map(|a| a * a).sum();
    let v_sq: f32 = v.iter().map(|a| a * a).sum();
    let denom = ((1.0 - u_sq) * (1.0 - v_sq)).max(f32::EPSILON);
    let arg = 1.0 + 2.0 * diff_sq / denom;
    arg.max(1.0).acosh()
}
