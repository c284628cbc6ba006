/// Short-text vector aggregation.
///
/// Derives a single fixed-length vector for a short span of text by
/// summing the embeddings of all in-vocabulary tokens and L2-normalizing
/// the sum. Out-of-vocabulary tokens are skipped; a text with no
/// vocabulary hits yields the zero vector.
use crate::tokenize::tokenize;
use crate::vectors::{LookupError, WordVectors};

/// Convert `text` into an averaged embedded vector representation.
///
/// Tokenizes the text, sums the embeddings of every token found in the
/// model (each occurrence contributes its full vector again), and
/// L2-normalizes the sum. Returns the zero vector of the model's
/// dimensionality when nothing matches or the sum cancels to zero.
///
/// Absence of a token is expected and skipped; any other lookup failure
/// (transport or protocol errors from a remote source) propagates
/// immediately.
pub fn avg_vector(text: &str, model: &dyn WordVectors) -> Result<Vec<f32>, LookupError> {
    let mut sum = vec![0.0f32; model.dimensions()];
    for token in tokenize(text) {
        match model.get_vector(token) {
            Ok(vector) => {
                for (s, v) in sum.iter_mut().zip(&vector) {
                    *s += v;
                }
            }
            Err(LookupError::TokenNotFound { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(l2_normalize(&sum))
}

/// Convert `text` into an averaged embedded vector representation.
#[deprecated(note = "use `avg_vector` instead")]
pub fn avg_embed_vector(text: &str, model: &dyn WordVectors) -> Result<Vec<f32>, LookupError> {
    avg_vector(text, model)
}

/// L2-normalize a vector, returning the normalized copy.
///
/// A zero vector has no direction and is returned unchanged rather than
/// dividing by zero.
#[must_use]
pub fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm_sq: f32 = vec.iter().map(|v| v * v).sum();
    if norm_sq == 0.0 {
        return vec.to_vec();
    }

    let inv_norm = 1.0 / norm_sq.sqrt();
    vec.iter().map(|v| v * inv_norm).collect()
}
