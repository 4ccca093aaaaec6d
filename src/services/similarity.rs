use std::sync::Arc;

use serde::Deserialize;

/// Pairwise similarity between two rating vectors
///
/// Both vectors must be laid out over the same location universe. Implementations
/// return `0.0` when either vector has zero magnitude.
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// Divides a vector by its largest absolute component, `None` for a zero vector
///
/// Keeps squares and products within `f64` range for very large ratings.
fn rescale(v: &[f64]) -> Option<Vec<f64>> {
    let max = v.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if max == 0.0 {
        return None;
    }
    Some(v.iter().map(|x| x / max).collect())
}

/// Cosine similarity: `dot(a, b) / (|a| * |b|)`
///
/// Returns `0.0` if either vector has zero magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (Some(a), Some(b)) = (rescale(a), rescale(b)) else {
        return 0.0;
    };

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (x, y) in a.iter().zip(&b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

fn l2_normalize(v: &[f64]) -> Vec<f64> {
    let Some(v) = rescale(v) else {
        return vec![0.0; v.len()];
    };
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    v.iter().map(|x| x / norm).collect()
}

/// Direct dot-product / norm computation
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl Similarity for Cosine {
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        cosine_similarity(a, b)
    }

    fn name(&self) -> &'static str {
        "cosine"
    }
}

/// Row-normalized kernel: scale both rows to unit length, then take the dot product
///
/// Mathematically equivalent to [`Cosine`]; zero rows stay zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedDot;

impl Similarity for NormalizedDot {
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        if a.len() != b.len() {
            return 0.0;
        }
        let a = l2_normalize(a);
        let b = l2_normalize(b);
        a.iter()
            .zip(&b)
            .map(|(x, y)| x * y)
            .sum::<f64>()
            .clamp(-1.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "normalized_dot"
    }
}

/// Configurable choice of similarity strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKind {
    #[default]
    Cosine,
    NormalizedDot,
}

impl SimilarityKind {
    pub fn into_strategy(self) -> Arc<dyn Similarity> {
        match self {
            SimilarityKind::Cosine => Arc::new(Cosine),
            SimilarityKind::NormalizedDot => Arc::new(NormalizedDot),
        }
    }
}
