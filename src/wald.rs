//! Wald tests on linear zero restrictions of VAR coefficients.
//!
//! The Toda-Yamamoto procedure estimates an augmented VAR(p + d) but tests
//! only the first p lags of the candidate cause variable. The restriction set
//! is therefore a strict subset of one equation's coefficients; the augmented
//! lags absorb nonstationarity and stay untested.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::errors::{CausalityError, GrangerResult};
use crate::linear_algebra::invert_matrix;

/// Outcome of a Wald test of zero restrictions.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaldTestResult {
    /// Wald chi-square statistic `cᵗ V⁻¹ c`
    pub statistic: f64,
    /// Degrees of freedom (number of restrictions)
    pub df: usize,
    /// Upper-tail chi-square p-value
    pub p_value: f64,
}

/// Positions of one variable's first `tested_lags` coefficients inside an
/// interleaved lag design of the bivariate system.
///
/// `variable` is the within-pair index: 0 for the effect series, 1 for the
/// cause series. Lag j of variable v sits at column `2 * (j - 1) + v`.
pub fn restricted_indices(variable: usize, tested_lags: usize) -> Vec<usize> {
    (1..=tested_lags).map(|j| 2 * (j - 1) + variable).collect()
}

/// Wald test that the coefficients at the given positions are jointly zero.
///
/// Extracts the restricted subvector `c` and the matching submatrix `Vᵣ` of
/// the coefficient covariance, then evaluates `cᵗ Vᵣ⁻¹ c` against a
/// chi-square distribution with one degree of freedom per restriction.
///
/// # Arguments
/// * `coefficients` - Full coefficient vector of one equation
/// * `covariance` - Coefficient covariance matrix of the same equation
/// * `restricted` - Positions of the coefficients restricted to zero
///
/// # Errors
/// * `InvalidParameter` when `restricted` is empty or indexes out of range
/// * `NumericalError` when the restricted covariance block is singular or
///   the statistic comes out non-finite or negative
pub fn wald_test(
    coefficients: &[f64],
    covariance: &[Vec<f64>],
    restricted: &[usize],
) -> GrangerResult<WaldTestResult> {
    if restricted.is_empty() {
        return Err(CausalityError::InvalidParameter {
            parameter: "restricted".to_string(),
            value: 0.0,
            constraint: "at least one restriction".to_string(),
        });
    }
    if let Some(&bad) = restricted.iter().find(|&&i| i >= coefficients.len()) {
        return Err(CausalityError::InvalidParameter {
            parameter: "restricted index".to_string(),
            value: bad as f64,
            constraint: format!("must be < {}", coefficients.len()),
        });
    }

    let df = restricted.len();
    let c: Vec<f64> = restricted.iter().map(|&i| coefficients[i]).collect();
    let v_r: Vec<Vec<f64>> = restricted
        .iter()
        .map(|&i| restricted.iter().map(|&j| covariance[i][j]).collect())
        .collect();

    let v_r_inv = invert_matrix(&v_r).map_err(|_| CausalityError::NumericalError {
        reason: "restricted coefficient covariance is singular".to_string(),
        operation: Some("wald_test".to_string()),
    })?;

    let mut statistic = 0.0;
    for i in 0..df {
        for j in 0..df {
            statistic += c[i] * v_r_inv[i][j] * c[j];
        }
    }

    if !statistic.is_finite() || statistic < 0.0 {
        return Err(CausalityError::NumericalError {
            reason: format!("Wald statistic is not a valid chi-square value: {}", statistic),
            operation: Some("wald_test".to_string()),
        });
    }

    let chi_squared =
        ChiSquared::new(df as f64).map_err(|e| CausalityError::NumericalError {
            reason: format!("failed to construct chi-square distribution: {}", e),
            operation: Some("wald_test".to_string()),
        })?;
    let p_value = 1.0 - chi_squared.cdf(statistic);

    Ok(WaldTestResult {
        statistic,
        df,
        p_value,
    })
}
