/// Similarity between two aligned weight vectors
pub trait SimilarityMetric: Send + Sync {
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Cosine of the angle between two vectors.
///
/// `dot(a, b) / (|a| * |b|)`, or exactly `0.0` when either vector has zero magnitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl SimilarityMetric for Cosine {
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let magnitude_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
        let magnitude_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
        let magnitude = magnitude_a * magnitude_b;

        if magnitude > 0.0 {
            dot / magnitude
        } else {
            0.0
        }
    }
}
