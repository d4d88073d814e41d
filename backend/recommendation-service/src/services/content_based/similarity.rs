//! Similarity Engine
//!
//! Dense pairwise cosine similarity over the feature matrix. O(n² · d), which
//! is fine at catalog scale.

use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Cosine similarity of two vectors.
///
/// Formula: cos(a, b) = (a · b) / (||a|| × ||b||)
///
/// A zero vector on either side yields 0.0, never NaN.
pub fn cosine_similarity(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (a.dot(&b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

/// Symmetric similarity matrix for every pair of feature rows.
///
/// The diagonal is exactly 1.0, except for all-zero rows whose whole row and
/// column (diagonal included) are 0.0.
pub fn similarity_matrix(features: &Array2<f64>) -> Array2<f64> {
    let n = features.nrows();
    let norms: Array1<f64> = features
        .axis_iter(Axis(0))
        .map(|row| row.dot(&row).sqrt())
        .collect();

    let mut similarity = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        if norms[i] == 0.0 {
            continue;
        }
        similarity[[i, i]] = 1.0;

        let row_i = features.row(i);
        for j in (i + 1)..n {
            if norms[j] == 0.0 {
                continue;
            }
            let value = (row_i.dot(&features.row(j)) / (norms[i] * norms[j])).clamp(-1.0, 1.0);
            similarity[[i, j]] = value;
            similarity[[j, i]] = value;
        }
    }

    similarity
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_cosine_similarity_identical() {
        let a = array![1.0, 2.0, 3.0];
        assert!((cosine_similarity(a.view(), a.view()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = array![1.0, 0.0];
        let b = array![0.0, 1.0];
        assert_eq!(cosine_similarity(a.view(), b.view()), 0.0);
    }

    #[test]
    fn test_cosine_similarity_zero_vectors() {
        let zero: Array1<f64> = Array1::zeros(3);
        let a = array![1.0, 1.0, 0.0];

        let both_zero = cosine_similarity(zero.view(), zero.view());
        assert_eq!(both_zero, 0.0);
        assert!(!both_zero.is_nan());
        assert_eq!(cosine_similarity(zero.view(), a.view()), 0.0);
    }

    #[test]
    fn test_similarity_matrix_symmetric_with_unit_diagonal() {
        let features = array![
            [1.0, 1.0, 0.0, 4.0],
            [0.0, 1.0, 0.0, 3.5],
            [0.0, 0.0, 1.0, 120.0],
        ];
        let sim = similarity_matrix(&features);

        for i in 0..3 {
            assert_eq!(sim[[i, i]], 1.0);
            for j in 0..3 {
                assert_eq!(sim[[i, j]], sim[[j, i]]);
                assert!(sim[[i, j]] >= 0.0 && sim[[i, j]] <= 1.0);
            }
        }
    }

    #[test]
    fn test_similarity_matrix_zero_row() {
        let features = array![[1.0, 0.0], [0.0, 0.0], [1.0, 1.0]];
        let sim = similarity_matrix(&features);

        for j in 0..3 {
            assert_eq!(sim[[1, j]], 0.0);
            assert_eq!(sim[[j, 1]], 0.0);
        }
        assert_eq!(sim[[0, 0]], 1.0);
        assert!(sim.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_similarity_matrix_matches_pairwise_cosine() {
        let features = array![[1.0, 2.0, 0.0], [2.0, 1.0, 1.0]];
        let sim = similarity_matrix(&features);
        let expected = cosine_similarity(features.row(0), features.row(1));
        assert!((sim[[0, 1]] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_matrix_empty() {
        let features = Array2::<f64>::zeros((0, 4));
        assert_eq!(similarity_matrix(&features).dim(), (0, 0));
    }
}
