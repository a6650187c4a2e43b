//! Top-k ranking of a digit distribution.

use crate::domain::ProbabilityVector;
use serde::{Deserialize, Serialize};

/// One entry of a ranking: a digit and its probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedDigit {
    pub digit: u8,
    pub probability: f32,
}

impl std::fmt::Display for RankedDigit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:.2}%", self.digit, self.probability * 100.0)
    }
}

/// Returns the `k` most probable digits, highest first.
///
/// Equal probabilities keep ascending digit order. `k` larger than ten is
/// clamped, and `k == 0` yields an empty ranking.
///
/// ```rust
/// use digit_recognizer::domain::ProbabilityVector;
/// use digit_recognizer::processors::top_k;
///
/// let distribution =
///     ProbabilityVector::new([0.0, 0.2, 0.0, 0.5, 0.0, 0.0, 0.0, 0.3, 0.0, 0.0]).unwrap();
/// let ranked = top_k(&distribution, 2);
/// assert_eq!(ranked[0].digit, 3);
/// assert_eq!(ranked[1].digit, 7);
/// ```
pub fn top_k(distribution: &ProbabilityVector, k: usize) -> Vec<RankedDigit> {
    let mut indexed_scores: Vec<(usize, f32)> = distribution.iter().enumerate().collect();

    // Stable sort, so ties stay in ascending digit order.
    indexed_scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    indexed_scores
        .into_iter()
        .take(k)
        .map(|(idx, probability)| RankedDigit {
            digit: idx as u8,
            probability,
        })
        .collect()
}
