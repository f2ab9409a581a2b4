//! Linear algebra operations for vector autoregression estimation.
//!
//! This module provides the numerical routines behind the causality pipeline:
//! Householder-QR least squares for the per-equation OLS fits, Gauss-Jordan
//! inversion for the coefficient covariance and the restricted Wald sub-block,
//! and residual computation. Rank deficiency is surfaced as an error rather
//! than silently regularized, because a non-unique least-squares solution
//! invalidates the downstream Wald statistic.

use crate::errors::{CausalityError, GrangerResult};

/// Relative tolerance factor for rank and pivot checks.
///
/// Scaled by machine epsilon, matrix dimension, and the Frobenius norm so the
/// threshold adapts to the magnitude of the input data.
const RANK_TOLERANCE_FACTOR: f64 = 100.0;

fn frobenius_norm(a: &[Vec<f64>]) -> f64 {
    a.iter()
        .flat_map(|row| row.iter())
        .map(|&v| v * v)
        .sum::<f64>()
        .sqrt()
}

fn rank_tolerance(a: &[Vec<f64>]) -> f64 {
    let m = a.len();
    let n = a.first().map(|r| r.len()).unwrap_or(0);
    RANK_TOLERANCE_FACTOR * f64::EPSILON * (m.max(n) as f64) * frobenius_norm(a).max(1.0)
}

fn singular_error(operation: &str) -> CausalityError {
    CausalityError::NumericalError {
        reason: "Singular or rank-deficient matrix (collinear regressors)".to_string(),
        operation: Some(operation.to_string()),
    }
}

/// Solve the overdetermined least-squares problem `min ||Xb - y||²` via
/// Householder QR without forming Q explicitly.
///
/// # Arguments
/// * `x` - Design matrix (m rows × n columns), row-major format: `x[row][col]`
/// * `y` - Response vector (m observations)
///
/// # Returns
/// Coefficient vector of length n.
///
/// # Errors
/// * `InsufficientData` for underdetermined systems (m < n)
/// * `NumericalError` for dimension mismatches or a rank-deficient design
pub fn least_squares_solve(x: &[Vec<f64>], y: &[f64]) -> GrangerResult<Vec<f64>> {
    let m = x.len();
    let n = x.first().map(|r| r.len()).unwrap_or(0);

    if m == 0 || n == 0 {
        return Err(CausalityError::NumericalError {
            reason: "Empty design matrix".to_string(),
            operation: Some("least_squares_solve".to_string()),
        });
    }
    if x.iter().any(|row| row.len() != n) {
        return Err(CausalityError::NumericalError {
            reason: "Ragged design matrix (inconsistent row lengths)".to_string(),
            operation: Some("least_squares_solve".to_string()),
        });
    }
    if y.len() != m {
        return Err(CausalityError::NumericalError {
            reason: format!("Design has {} rows but response has {} entries", m, y.len()),
            operation: Some("least_squares_solve".to_string()),
        });
    }
    if m < n {
        return Err(CausalityError::InsufficientData {
            required: n,
            actual: m,
        });
    }

    let tol = rank_tolerance(x);
    let mut r = x.to_vec();
    let mut qty = y.to_vec();

    // Triangularize R and accumulate Q'y by applying each reflector to both.
    for k in 0..n {
        let mut v: Vec<f64> = (k..m).map(|i| r[i][k]).collect();
        let norm_v = v.iter().map(|&vi| vi * vi).sum::<f64>().sqrt();

        if norm_v < tol {
            return Err(singular_error("least_squares_solve"));
        }

        let sign = if v[0] >= 0.0 { 1.0 } else { -1.0 };
        v[0] += sign * norm_v;
        let scale = v.iter().map(|&vi| vi * vi).sum::<f64>().sqrt();
        for vi in &mut v {
            *vi /= scale;
        }

        for j in k..n {
            let dot: f64 = (k..m).map(|i| v[i - k] * r[i][j]).sum();
            for i in k..m {
                r[i][j] -= 2.0 * v[i - k] * dot;
            }
        }

        let dot: f64 = (k..m).map(|i| v[i - k] * qty[i]).sum();
        for i in k..m {
            qty[i] -= 2.0 * v[i - k] * dot;
        }
    }

    // Back-substitution on the upper-triangular factor.
    let mut beta = vec![0.0; n];
    for i in (0..n).rev() {
        if r[i][i].abs() < tol {
            return Err(singular_error("least_squares_solve"));
        }
        let mut sum = qty[i];
        for j in i + 1..n {
            sum -= r[i][j] * beta[j];
        }
        beta[i] = sum / r[i][i];
    }

    Ok(beta)
}

/// Compute the Gram matrix `XᵗX` of a row-major design matrix.
///
/// The result is symmetric n×n; only the upper triangle is computed and
/// mirrored.
pub fn gram_matrix(x: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let m = x.len();
    let n = x.first().map(|r| r.len()).unwrap_or(0);
    let mut g = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let mut sum = 0.0;
            for row in x.iter().take(m) {
                sum += row[i] * row[j];
            }
            g[i][j] = sum;
            g[j][i] = sum;
        }
    }
    g
}

/// Invert a square matrix via Gauss-Jordan elimination with partial pivoting.
///
/// Used for `(XᵗX)⁻¹` in the coefficient covariance and for the restricted
/// covariance sub-block in the Wald test. Sized for the small matrices this
/// crate produces (at most `2·max_lag + 2` rows).
///
/// # Errors
/// `NumericalError` when the matrix is singular to working precision.
pub fn invert_matrix(a: &[Vec<f64>]) -> GrangerResult<Vec<Vec<f64>>> {
    let n = a.len();
    if n == 0 || a.iter().any(|row| row.len() != n) {
        return Err(CausalityError::NumericalError {
            reason: "Matrix inversion requires a non-empty square matrix".to_string(),
            operation: Some("invert_matrix".to_string()),
        });
    }

    let tol = rank_tolerance(a);
    let mut work = a.to_vec();
    let mut inv = vec![vec![0.0; n]; n];
    for (i, row) in inv.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for col in 0..n {
        // Partial pivoting: bring the largest remaining entry to the diagonal.
        let pivot_row = (col..n)
            .max_by(|&a_row, &b_row| {
                work[a_row][col]
                    .abs()
                    .total_cmp(&work[b_row][col].abs())
            })
            .unwrap_or(col);

        if work[pivot_row][col].abs() < tol {
            return Err(singular_error("invert_matrix"));
        }

        work.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = work[col][col];
        for j in 0..n {
            work[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for i in 0..n {
            if i == col {
                continue;
            }
            let factor = work[i][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                work[i][j] -= factor * work[col][j];
                inv[i][j] -= factor * inv[col][j];
            }
        }
    }

    Ok(inv)
}

/// Compute residuals `y - Xb` for a row-major design matrix.
pub fn compute_residuals(x: &[Vec<f64>], y: &[f64], coeffs: &[f64]) -> Vec<f64> {
    debug_assert_eq!(x.len(), y.len(), "design rows must match response length");
    x.iter()
        .zip(y)
        .map(|(row, &yi)| {
            let fitted: f64 = row.iter().zip(coeffs).map(|(&xij, &bj)| xij * bj).sum();
            yi - fitted
        })
        .collect()
}
