//! Bivariate vector autoregression estimation via ordinary least squares.
//!
//! A VAR(L) on the pair (effect, cause) regresses each variable's current
//! value on both variables' values at lags 1..L, with no intercept. Both
//! equations share one design matrix, whose columns are interleaved by lag:
//!
//! ```text
//! col 0: effect lag 1   col 1: cause lag 1
//! col 2: effect lag 2   col 3: cause lag 2
//! ...
//! col 2(L-1): effect lag L   col 2L-1: cause lag L
//! ```
//!
//! This column order is a correctness contract: the Wald test selects
//! restricted coefficients by position, and an off-by-one here silently
//! produces wrong causality conclusions.

use crate::dataset::CandidatePair;
use crate::errors::{CausalityError, GrangerResult};
use crate::linear_algebra::{compute_residuals, gram_matrix, invert_matrix, least_squares_solve};

/// Number of variables in the bivariate system.
pub const K: usize = 2;

/// Equation index of the effect variable within a [`VarModel`].
pub const EFFECT_EQUATION: usize = 0;
/// Equation index of the cause variable within a [`VarModel`].
pub const CAUSE_EQUATION: usize = 1;

/// A fitted bivariate VAR(L) without intercept.
#[derive(Debug, Clone)]
pub struct VarModel {
    order: usize,
    t_eff: usize,
    /// Per-equation OLS coefficient vectors, each of length `2 * order`.
    /// Index 0 is the effect equation, index 1 the cause equation.
    coefficients: [Vec<f64>; 2],
    /// Maximum-likelihood residual covariance `Σ̂ = EᵗE / t_eff`.
    residual_covariance: [[f64; 2]; 2],
    /// Inverse Gram matrix `(XᵗX)⁻¹` of the shared design.
    xtx_inverse: Vec<Vec<f64>>,
}

impl VarModel {
    /// Lag order L of the fitted model.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Effective sample size `T - L`.
    pub fn t_eff(&self) -> usize {
        self.t_eff
    }

    /// OLS coefficients of one equation (0 = effect, 1 = cause).
    pub fn coefficients(&self, equation: usize) -> &[f64] {
        &self.coefficients[equation]
    }

    /// ML residual covariance matrix `Σ̂`.
    pub fn residual_covariance(&self) -> &[[f64; 2]; 2] {
        &self.residual_covariance
    }

    /// Determinant of `Σ̂`.
    pub fn residual_covariance_det(&self) -> f64 {
        let s = &self.residual_covariance;
        s[0][0] * s[1][1] - s[0][1] * s[1][0]
    }

    /// OLS coefficient covariance of one equation: `Σ̂[eq][eq] · (XᵗX)⁻¹`.
    ///
    /// This is the per-equation covariance the Wald test operates on, not the
    /// cross-equation residual covariance.
    pub fn coefficient_covariance(&self, equation: usize) -> Vec<Vec<f64>> {
        let sigma_sq = self.residual_covariance[equation][equation];
        self.xtx_inverse
            .iter()
            .map(|row| row.iter().map(|&v| sigma_sq * v).collect())
            .collect()
    }
}

/// Estimate a bivariate VAR of the given order on a candidate pair.
///
/// Builds the shared lagged design matrix over the `T - order` aligned
/// observations and fits each equation by ordinary least squares.
///
/// # Arguments
/// * `pair` - The (effect, cause) series, equal length `T`
/// * `order` - Lag order L >= 1
///
/// # Errors
/// * `InvalidParameter` when `order == 0`
/// * `InsufficientData` when fewer than `2 * order` aligned observations
///   remain (OLS would be underdetermined)
/// * `NumericalError` when the design matrix is rank-deficient, e.g. a
///   constant series makes lagged regressors collinear
pub fn fit_bivariate_var(pair: &CandidatePair<'_>, order: usize) -> GrangerResult<VarModel> {
    if order == 0 {
        return Err(CausalityError::InvalidParameter {
            parameter: "order".to_string(),
            value: 0.0,
            constraint: "must be >= 1".to_string(),
        });
    }

    let t = pair.len();
    let n_regressors = K * order;
    // t_eff rows, each with 2*order regressors; uniqueness needs t_eff >= 2*order.
    if t < order + n_regressors {
        return Err(CausalityError::InsufficientData {
            required: order + n_regressors,
            actual: t,
        });
    }
    let t_eff = t - order;

    let mut design = Vec::with_capacity(t_eff);
    let mut target_effect = Vec::with_capacity(t_eff);
    let mut target_cause = Vec::with_capacity(t_eff);
    for row_t in order..t {
        let mut row = Vec::with_capacity(n_regressors);
        for lag in 1..=order {
            row.push(pair.effect[row_t - lag]);
            row.push(pair.cause[row_t - lag]);
        }
        design.push(row);
        target_effect.push(pair.effect[row_t]);
        target_cause.push(pair.cause[row_t]);
    }

    let beta_effect = least_squares_solve(&design, &target_effect)?;
    let beta_cause = least_squares_solve(&design, &target_cause)?;

    let residuals_effect = compute_residuals(&design, &target_effect, &beta_effect);
    let residuals_cause = compute_residuals(&design, &target_cause, &beta_cause);

    let scale = t_eff as f64;
    let dot = |a: &[f64], b: &[f64]| a.iter().zip(b).map(|(&x, &y)| x * y).sum::<f64>();
    let s00 = dot(&residuals_effect, &residuals_effect) / scale;
    let s01 = dot(&residuals_effect, &residuals_cause) / scale;
    let s11 = dot(&residuals_cause, &residuals_cause) / scale;

    let xtx_inverse = invert_matrix(&gram_matrix(&design))?;

    Ok(VarModel {
        order,
        t_eff,
        coefficients: [beta_effect, beta_cause],
        residual_covariance: [[s00, s01], [s01, s11]],
        xtx_inverse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TimeSeriesDataset;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use rand_distr::{Distribution, StandardNormal};

    fn pair_from(effect: Vec<f64>, cause: Vec<f64>) -> TimeSeriesDataset {
        let mut dataset = TimeSeriesDataset::new();
        dataset.add_column("effect", effect).unwrap();
        dataset.add_column("cause", cause).unwrap();
        dataset
    }

    /// Deterministic irregular driver series; avoids collinear lag columns
    /// without pulling in an RNG.
    fn wobble(n: usize) -> Vec<f64> {
        (0..n)
            .map(|t| (1.3 * t as f64).sin() + 0.37 * (0.7 * t as f64).cos())
            .collect()
    }

    #[test]
    fn test_var1_recovers_noiseless_coefficients() {
        // effect[t] = 0.5*effect[t-1] + 0.2*cause[t-1], cause exogenous.
        let n = 60;
        let cause = wobble(n);
        let mut effect = vec![0.3];
        for t in 1..n {
            effect.push(0.5 * effect[t - 1] + 0.2 * cause[t - 1]);
        }

        let dataset = pair_from(effect, cause);
        let pair = dataset.candidate_pair(1).unwrap();
        let model = fit_bivariate_var(&pair, 1).unwrap();

        assert_eq!(model.order(), 1);
        assert_eq!(model.t_eff(), n - 1);

        let beta = model.coefficients(EFFECT_EQUATION);
        assert_eq!(beta.len(), 2);
        assert!((beta[0] - 0.5).abs() < 1e-8, "own-lag coefficient: {}", beta[0]);
        assert!((beta[1] - 0.2).abs() < 1e-8, "cross-lag coefficient: {}", beta[1]);

        // Noiseless relation: the effect equation's residual variance vanishes.
        assert!(model.residual_covariance()[0][0].abs() < 1e-12);
    }

    #[test]
    fn test_design_column_order_interleaves_lags() {
        // effect[t] = 0.7*cause[t-2] exactly; in the interleaved layout that
        // coefficient sits at position 2*(2-1) + 1 = 3.
        let n = 50;
        let cause = wobble(n);
        let mut effect = vec![0.1, -0.2];
        for t in 2..n {
            effect.push(0.7 * cause[t - 2]);
        }

        let dataset = pair_from(effect, cause);
        let pair = dataset.candidate_pair(1).unwrap();
        let model = fit_bivariate_var(&pair, 2).unwrap();

        let beta = model.coefficients(EFFECT_EQUATION);
        assert_eq!(beta.len(), 4);
        assert!(beta[0].abs() < 1e-7, "effect lag-1 should be zero: {}", beta[0]);
        assert!(beta[1].abs() < 1e-7, "cause lag-1 should be zero: {}", beta[1]);
        assert!(beta[2].abs() < 1e-7, "effect lag-2 should be zero: {}", beta[2]);
        assert!((beta[3] - 0.7).abs() < 1e-7, "cause lag-2: {}", beta[3]);
    }

    /// Seeded AR(1) pair with genuine innovations.
    fn noisy_series(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut draw = || -> f64 { StandardNormal.sample(&mut rng) };
        let mut effect = vec![0.0];
        let mut cause = vec![0.0];
        for t in 1..n {
            effect.push(0.6 * effect[t - 1] + draw());
            cause.push(0.3 * cause[t - 1] + draw());
        }
        (effect, cause)
    }

    #[test]
    fn test_residual_covariance_symmetric_and_psd() {
        let (effect, cause) = noisy_series(80, 5);
        let dataset = pair_from(effect, cause);
        let pair = dataset.candidate_pair(1).unwrap();
        let model = fit_bivariate_var(&pair, 3).unwrap();

        let s = model.residual_covariance();
        assert!((s[0][1] - s[1][0]).abs() < 1e-14);
        assert!(s[0][0] >= 0.0);
        assert!(s[1][1] >= 0.0);
        assert!(model.residual_covariance_det() >= -1e-12);
    }

    #[test]
    fn test_zero_order_rejected() {
        let dataset = pair_from(wobble(20), wobble(20));
        let pair = dataset.candidate_pair(1).unwrap();
        assert!(matches!(
            fit_bivariate_var(&pair, 0),
            Err(CausalityError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_insufficient_observations_rejected() {
        // order 4 needs at least 4 + 8 = 12 observations.
        let dataset = pair_from(wobble(11), wobble(11));
        let pair = dataset.candidate_pair(1).unwrap();
        match fit_bivariate_var(&pair, 4) {
            Err(CausalityError::InsufficientData { required, actual }) => {
                assert_eq!(required, 12);
                assert_eq!(actual, 11);
            }
            other => panic!("Expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_constant_cause_is_singular() {
        let n = 40;
        let dataset = pair_from(wobble(n), vec![2.5; n]);
        let pair = dataset.candidate_pair(1).unwrap();
        match fit_bivariate_var(&pair, 2) {
            Err(CausalityError::NumericalError { .. }) => {}
            other => panic!("Expected NumericalError for constant cause, got {:?}", other),
        }
    }

    #[test]
    fn test_coefficient_covariance_scales_inverse_gram() {
        let (effect, cause) = noisy_series(70, 8);
        let dataset = pair_from(effect, cause);
        let pair = dataset.candidate_pair(1).unwrap();
        let model = fit_bivariate_var(&pair, 2).unwrap();

        let cov_effect = model.coefficient_covariance(EFFECT_EQUATION);
        let cov_cause = model.coefficient_covariance(CAUSE_EQUATION);
        assert_eq!(cov_effect.len(), 4);

        // Both equations share (X'X)^{-1}; covariances differ only by the
        // per-equation residual variance ratio.
        let s = model.residual_covariance();
        assert!(s[0][0] > 0.0);
        assert!(s[1][1] > 0.0);
        let ratio = s[0][0] / s[1][1];
        for i in 0..4 {
            for j in 0..4 {
                if cov_cause[i][j].abs() > 1e-12 {
                    assert!(
                        (cov_effect[i][j] / cov_cause[i][j] - ratio).abs() < 1e-6,
                        "covariance scaling mismatch at [{}][{}]",
                        i,
                        j
                    );
                }
            }
        }

        // Diagonal entries are variances.
        for i in 0..4 {
            assert!(cov_effect[i][i] > 0.0);
        }
    }
}
