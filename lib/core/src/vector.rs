use serde::{Deserialize, Serialize};

/// A dense vector of floating point numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self { data: vec![0.0; dim] }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        dot_product(&self.data, &self.data).sqrt() as f32
    }

    /// Compute cosine similarity with another vector.
    ///
    /// Returns 0.0 when the dimensions differ, either vector has zero norm,
    /// or the result is not finite. Always within [-1, 1].
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }

        let norm_a = dot_product(&self.data, &self.data).sqrt();
        let norm_b = dot_product(&other.data, &other.data).sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        let similarity = dot_product(&self.data, &other.data) / (norm_a * norm_b);
        if !similarity.is_finite() {
            return 0.0;
        }
        similarity.clamp(-1.0, 1.0) as f32
    }

    /// Cosine distance, `1 - cosine_similarity`, in [0, 2]
    #[inline]
    pub fn cosine_distance(&self, other: &Vector) -> f32 {
        1.0 - self.cosine_similarity(other)
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

/// Dot product with two accumulators for better pipelining.
///
/// Accumulates in f64 so components near `f32::MAX` do not overflow.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut sum0 = 0.0f64;
    let mut sum1 = 0.0f64;
    let chunks = a.len() / 2;

    for i in 0..chunks {
        let idx = i * 2;
        sum0 += f64::from(a[idx]) * f64::from(b[idx]);
        sum1 += f64::from(a[idx + 1]) * f64::from(b[idx + 1]);
    }

    if a.len() % 2 == 1 {
        let last = a.len() - 1;
        sum0 += f64::from(a[last]) * f64::from(b[last]);
    }

    sum0 + sum1
}
