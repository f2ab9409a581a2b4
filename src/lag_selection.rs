//! Lag order selection for the bivariate VAR via information criteria.
//!
//! For each candidate order p = 1..=max_lag a VAR(p) is fitted and four
//! criteria are evaluated from its residual covariance. Candidates that
//! cannot be scored (estimation failure, degenerate covariance) are kept in
//! the table as NaN rows and skipped during selection, so a single bad lag
//! never aborts the search.

use std::fmt;
use std::str::FromStr;

use crate::dataset::CandidatePair;
use crate::errors::{CausalityError, GrangerResult};
use crate::var_estimation::{fit_bivariate_var, K};

/// Information criterion used to pick the VAR lag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Criterion {
    /// Akaike information criterion
    Aic,
    /// Schwarz / Bayesian information criterion
    Bic,
    /// Hannan-Quinn criterion
    Hq,
    /// Akaike's final prediction error
    Fpe,
}

impl Criterion {
    /// All supported criteria, in table column order.
    pub const ALL: [Criterion; 4] = [Criterion::Aic, Criterion::Bic, Criterion::Hq, Criterion::Fpe];
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Criterion::Aic => "AIC",
            Criterion::Bic => "BIC",
            Criterion::Hq => "HQ",
            Criterion::Fpe => "FPE",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Criterion {
    type Err = CausalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AIC" => Ok(Criterion::Aic),
            "BIC" | "SC" => Ok(Criterion::Bic),
            "HQ" | "HQC" => Ok(Criterion::Hq),
            "FPE" => Ok(Criterion::Fpe),
            _ => Err(CausalityError::InvalidParameter {
                parameter: format!("criterion '{}'", s),
                value: 0.0,
                constraint: "one of AIC, BIC, HQ, FPE".to_string(),
            }),
        }
    }
}

/// Criterion values for one candidate lag order. NaN marks a candidate that
/// could not be scored at this lag.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LagCriteria {
    /// Candidate lag order p
    pub lag: usize,
    /// Akaike information criterion
    pub aic: f64,
    /// Bayesian information criterion
    pub bic: f64,
    /// Hannan-Quinn criterion
    pub hq: f64,
    /// Final prediction error
    pub fpe: f64,
}

impl LagCriteria {
    fn unscored(lag: usize) -> Self {
        Self {
            lag,
            aic: f64::NAN,
            bic: f64::NAN,
            hq: f64::NAN,
            fpe: f64::NAN,
        }
    }

    /// Value of one criterion.
    pub fn value(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Aic => self.aic,
            Criterion::Bic => self.bic,
            Criterion::Hq => self.hq,
            Criterion::Fpe => self.fpe,
        }
    }
}

/// Outcome of a lag order search: the full criterion table plus the order
/// selected under the requested criterion.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LagSelectionResult {
    /// One row per candidate lag, 1..=max_lag, in order
    pub criteria: Vec<LagCriteria>,
    /// Lag order minimizing the requested criterion
    pub selected_lag: usize,
}

/// Select the VAR lag order for a candidate pair by minimizing an
/// information criterion over p = 1..=max_lag.
///
/// Each candidate order is fitted on its own aligned sample of
/// `t_eff = T - p` observations, matching how the criteria are usually
/// tabulated for a sweep of orders. Ties resolve to the smallest order.
///
/// # Errors
/// * `InvalidParameter` when `max_lag == 0`
/// * `InsufficientData` when `max_lag >= T` (no candidate can be fitted)
/// * `NumericalError` when no candidate produced a finite criterion value
pub fn select_lag_order(
    pair: &CandidatePair<'_>,
    max_lag: usize,
    criterion: Criterion,
) -> GrangerResult<LagSelectionResult> {
    if max_lag == 0 {
        return Err(CausalityError::InvalidParameter {
            parameter: "max_lag".to_string(),
            value: 0.0,
            constraint: "must be >= 1".to_string(),
        });
    }
    let t = pair.len();
    if max_lag >= t {
        return Err(CausalityError::InsufficientData {
            required: max_lag + 1,
            actual: t,
        });
    }

    let mut criteria = Vec::with_capacity(max_lag);
    for lag in 1..=max_lag {
        criteria.push(score_candidate(pair, lag));
    }

    let mut selected: Option<(usize, f64)> = None;
    for row in &criteria {
        let value = row.value(criterion);
        if !value.is_finite() {
            continue;
        }
        // Strict comparison keeps the smallest lag on ties.
        if selected.map_or(true, |(_, best)| value < best) {
            selected = Some((row.lag, value));
        }
    }

    match selected {
        Some((selected_lag, _)) => Ok(LagSelectionResult {
            criteria,
            selected_lag,
        }),
        None => Err(CausalityError::NumericalError {
            reason: format!(
                "no candidate lag in 1..={} produced a finite {} value",
                max_lag, criterion
            ),
            operation: Some("select_lag_order".to_string()),
        }),
    }
}

/// Score one candidate order, folding any estimation failure into NaN.
fn score_candidate(pair: &CandidatePair<'_>, lag: usize) -> LagCriteria {
    let model = match fit_bivariate_var(pair, lag) {
        Ok(model) => model,
        Err(_) => return LagCriteria::unscored(lag),
    };

    let det = model.residual_covariance_det();
    if det <= 0.0 || !det.is_finite() {
        return LagCriteria::unscored(lag);
    }

    let t_eff = model.t_eff() as f64;
    let p = lag as f64;
    let n_params = p * (K * K) as f64;
    let log_det = det.ln();

    let aic = log_det + (2.0 / t_eff) * n_params;
    let bic = log_det + (t_eff.ln() / t_eff) * n_params;
    let hq = log_det + (2.0 * t_eff.ln().ln() / t_eff) * n_params;

    // FPE blows up as t_eff approaches the parameter count.
    let fpe_denom = t_eff - 2.0 * p - 1.0;
    let fpe = if fpe_denom > 0.0 {
        let ratio = (t_eff + 2.0 * p + 1.0) / fpe_denom;
        ratio * ratio * det
    } else {
        f64::NAN
    };

    LagCriteria {
        lag,
        aic,
        bic,
        hq,
        fpe,
    }
}
