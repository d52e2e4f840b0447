//! Diversity re-ordering
//!
//! Greedy selection over candidates already sorted by final score. Each pick
//! maximises `quality * (1 - d) + diversity * d`, where diversity is the
//! product of `1 - cos` against every vector selected so far. The greedy
//! choice is not globally optimal and is not meant to be.

use crate::math::cosine_similarity;

/// Re-order `order` (indices into `scores` and `vectors`)
///
/// With `d == 0` the input order is returned untouched. Ties go to the
/// candidate that comes first in `order`.
pub fn diversify(order: &[usize], scores: &[f64], vectors: &[[f64; 5]], d: f64) -> Vec<usize> {
    if d <= 0.0 || order.len() < 2 {
        return order.to_vec();
    }
    let d = d.min(1.0);

    let mut remaining: Vec<usize> = order.to_vec();
    let mut selected: Vec<usize> = Vec::with_capacity(order.len());

    while !remaining.is_empty() {
        let mut best_pos = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (pos, &candidate) in remaining.iter().enumerate() {
            let diversity: f64 = selected
                .iter()
                .map(|&s| (1.0 - cosine_similarity(&vectors[candidate], &vectors[s])).clamp(0.0, 1.0))
                .product();
            let value = scores[candidate] * (1.0 - d) + diversity * d;
            if value > best_value {
                best_value = value;
                best_pos = pos;
            }
        }
        selected.push(remaining.remove(best_pos));
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_target_is_identity() {
        let order = vec![2, 0, 1];
        let scores = [0.5, 0.4, 0.9];
        let vectors = [[0.5; 5], [0.5; 5], [0.5; 5]];
        assert_eq!(diversify(&order, &scores, &vectors, 0.0), order);
    }

    #[test]
    fn test_identical_vectors_keep_score_order() {
        let order = vec![0, 1, 2, 3, 4];
        let scores = [0.9; 5];
        let vectors = [[0.9; 5]; 5];
        assert_eq!(diversify(&order, &scores, &vectors, 0.8), order);
    }

    #[test]
    fn test_full_target_separates_near_duplicates() {
        // 0 and 1 are near-duplicates, 2 points elsewhere
        let order = vec![0, 1, 2];
        let scores = [0.9, 0.89, 0.6];
        let vectors = [
            [0.9, 0.9, 0.1, 0.1, 0.5],
            [0.89, 0.9, 0.1, 0.1, 0.5],
            [0.1, 0.1, 0.9, 0.9, 0.5],
        ];
        assert_eq!(diversify(&order, &scores, &vectors, 1.0), vec![0, 2, 1]);
    }
}
