//! Dense linear algebra helpers for the factor engine.
//!
//! Factor rows are `ndarray` views; normal-equation systems are k x k
//! `Array2<f64>` solved by Cholesky decomposition.

use ndarray::{Array1, Array2, ArrayView1, s};

/// Euclidean norm
pub fn norm(a: ArrayView1<f32>) -> f32 {
    a.dot(&a).sqrt()
}

/// Cosine similarity; 0 when either vector is all-zero
pub fn cosine(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    let denom = norm(a) * norm(b);
    if denom == 0.0 { 0.0 } else { a.dot(&b) / denom }
}

/// Solve `A x = b` for symmetric positive definite `A`.
///
/// Only the lower triangle of `a` is read. Returns `None` when `A` is not
/// positive definite.
pub fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    debug_assert_eq!(a.ncols(), n);
    debug_assert_eq!(b.len(), n);

    // A = L * L^T
    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let sum = a[[i, j]] - l.row(i).slice(s![..j]).dot(&l.row(j).slice(s![..j]));
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[[i, i]] = sum.sqrt();
            } else {
                l[[i, j]] = sum / l[[j, j]];
            }
        }
    }

    // Forward substitution: L * y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum = l.row(i).slice(s![..i]).dot(&y.slice(s![..i]));
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum = l.column(i).slice(s![i + 1..]).dot(&x.slice(s![i + 1..]));
        x[i] = (y[i] - sum) / l[[i, i]];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine(array![0.0, 0.0].view(), array![1.0, 2.0].view()), 0.0);
        assert!((cosine(array![1.0, 0.0].view(), array![2.0, 0.0].view()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cholesky_solve() {
        // [[4, 2], [2, 3]] x = [2, 5]  =>  x = [-0.5, 2]
        let a = array![[4.0, 2.0], [2.0, 3.0]];
        let b = array![2.0, 5.0];
        let x = cholesky_solve(&a, &b).unwrap();
        assert!((x[0] + 0.5).abs() < 1e-9);
        assert!((x[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_cholesky_reads_lower_triangle_only() {
        let a = array![[4.0, f64::NAN], [2.0, 3.0]];
        let x = cholesky_solve(&a, &array![2.0, 5.0]).unwrap();
        assert!((x[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let a = array![[0.0, 0.0], [0.0, 1.0]];
        assert!(cholesky_solve(&a, &array![1.0, 1.0]).is_none());
    }
}
