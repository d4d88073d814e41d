// Utility functions for hotel-recommendation-service

use std::cmp::Ordering;

/// Order item indices by descending score.
///
/// The sort is stable: equal scores keep ascending index order. Missing and
/// NaN scores rank after every real score.
pub fn rank_descending_by<F>(len: usize, score: F) -> Vec<usize>
where
    F: Fn(usize) -> Option<f64>,
{
    let keys: Vec<Option<f64>> = (0..len)
        .map(|idx| score(idx).filter(|value| !value.is_nan()))
        .collect();

    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&a, &b| compare_descending(keys[a], keys[b]));
    order
}

/// Convenience wrapper over [`rank_descending_by`] for dense score slices
pub fn rank_descending(scores: &[f64]) -> Vec<usize> {
    rank_descending_by(scores.len(), |idx| Some(scores[idx]))
}

fn compare_descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
