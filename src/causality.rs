//! Toda-Yamamoto causality testing and multi-dataset orchestration.
//!
//! The per-pair procedure: pick a lag order p by information criterion, fit
//! an augmented VAR(p + extra_lag), then Wald-test only the first p lags of
//! the candidate cause in each direction. The augmentation keeps the test
//! asymptotically chi-square even when the series are integrated, so no
//! pre-testing for unit roots or cointegration is needed.
//!
//! [`GrangerCausalityAnalyzer`] runs the procedure over named datasets,
//! testing column 0 of each against every other column in both directions.

use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;

use crate::config::CausalityConfig;
use crate::dataset::{CandidatePair, TimeSeriesDataset};
use crate::errors::{CausalityError, GrangerResult};
use crate::lag_selection::select_lag_order;
use crate::var_estimation::{fit_bivariate_var, VarModel, CAUSE_EQUATION, EFFECT_EQUATION};
use crate::wald::{restricted_indices, wald_test};

/// One directed causality test result.
///
/// `chi_square` and `p_value` are rounded to 3 decimals for stable reporting;
/// compare against conventional significance levels, not machine epsilon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CausalityResult {
    /// Name of the candidate cause series
    pub cause: String,
    /// Name of the effect series
    pub effect: String,
    /// Wald chi-square statistic, rounded to 3 decimals
    pub chi_square: f64,
    /// Upper-tail p-value, rounded to 3 decimals
    pub p_value: f64,
}

impl CausalityResult {
    fn new(cause: &str, effect: &str, statistic: f64, p_value: f64) -> Self {
        Self {
            cause: cause.to_string(),
            effect: effect.to_string(),
            chi_square: round3(statistic),
            p_value: round3(p_value),
        }
    }

    /// Whether the null of no causality is rejected at the given level.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Outcome of testing one (effect, cause) pair in both directions.
///
/// A failed pair carries its error instead of being silently dropped, so a
/// caller can always account for every candidate column.
#[derive(Debug, Clone)]
pub enum PairOutcome {
    /// Both directional tests completed.
    Completed {
        /// Lag order p selected by the information criterion (before
        /// augmentation)
        selected_lag: usize,
        /// Test of cause -> effect
        forward: CausalityResult,
        /// Test of effect -> cause
        reverse: CausalityResult,
    },
    /// The pair could not be tested.
    Failed {
        /// Name of the candidate cause series
        cause: String,
        /// Name of the effect series
        effect: String,
        /// The error that stopped the pair
        error: CausalityError,
    },
}

impl PairOutcome {
    /// True for a completed pair.
    pub fn is_completed(&self) -> bool {
        matches!(self, PairOutcome::Completed { .. })
    }

    /// Name of the candidate cause series.
    pub fn cause_name(&self) -> &str {
        match self {
            PairOutcome::Completed { forward, .. } => &forward.cause,
            PairOutcome::Failed { cause, .. } => cause,
        }
    }
}

/// Run the Toda-Yamamoto test for every candidate pair of one dataset.
///
/// Column 0 is the effect variable; each later column is tested against it
/// in both directions. Returns one [`PairOutcome`] per candidate column, in
/// column order. Configuration and dataset-shape problems fail the whole
/// call; per-pair numerical problems are folded into `PairOutcome::Failed`.
///
/// # Errors
/// * `InvalidParameter` for an invalid config or a dataset with fewer than
///   two columns
pub fn granger_causality_test(
    dataset: &TimeSeriesDataset,
    config: &CausalityConfig,
) -> GrangerResult<Vec<PairOutcome>> {
    config.validate()?;
    validate_dataset_shape(dataset)?;

    Ok(dataset
        .candidate_pairs()
        .map(|pair| test_pair(&pair, config))
        .collect())
}

fn validate_dataset_shape(dataset: &TimeSeriesDataset) -> GrangerResult<()> {
    if dataset.n_columns() < 2 {
        return Err(CausalityError::InvalidParameter {
            parameter: "dataset columns".to_string(),
            value: dataset.n_columns() as f64,
            constraint: "need an effect column and at least one candidate cause".to_string(),
        });
    }
    Ok(())
}

/// Test one pair in both directions, recovering per-pair errors as a
/// `Failed` outcome.
fn test_pair(pair: &CandidatePair<'_>, config: &CausalityConfig) -> PairOutcome {
    match run_pair(pair, config) {
        Ok(outcome) => outcome,
        Err(error) => {
            warn!(
                "causality test failed for pair ({} -> {}): {}",
                pair.cause_name, pair.effect_name, error
            );
            PairOutcome::Failed {
                cause: pair.cause_name.to_string(),
                effect: pair.effect_name.to_string(),
                error,
            }
        }
    }
}

fn run_pair(pair: &CandidatePair<'_>, config: &CausalityConfig) -> GrangerResult<PairOutcome> {
    let selection = select_lag_order(pair, config.max_lag, config.criterion)?;
    let p = selection.selected_lag;

    let model = fit_bivariate_var(pair, p + config.extra_lag)?;

    // Only the first p lags of the candidate cause are restricted; the
    // augmentation lags are estimated but never tested.
    let forward = directed_test(&model, pair, Direction::CauseToEffect, p)?;
    let reverse = directed_test(&model, pair, Direction::EffectToCause, p)?;

    Ok(PairOutcome::Completed {
        selected_lag: p,
        forward,
        reverse,
    })
}

#[derive(Clone, Copy)]
enum Direction {
    CauseToEffect,
    EffectToCause,
}

fn directed_test(
    model: &VarModel,
    pair: &CandidatePair<'_>,
    direction: Direction,
    tested_lags: usize,
) -> GrangerResult<CausalityResult> {
    // The tested variable's coefficients live in the *other* variable's
    // equation: cause -> effect restricts cause lags in the effect equation.
    let (equation, tested_variable, cause_name, effect_name) = match direction {
        Direction::CauseToEffect => (EFFECT_EQUATION, 1, pair.cause_name, pair.effect_name),
        Direction::EffectToCause => (CAUSE_EQUATION, 0, pair.effect_name, pair.cause_name),
    };

    let covariance = model.coefficient_covariance(equation);
    let restricted = restricted_indices(tested_variable, tested_lags);
    let wald = wald_test(model.coefficients(equation), &covariance, &restricted)?;

    Ok(CausalityResult::new(
        cause_name,
        effect_name,
        wald.statistic,
        wald.p_value,
    ))
}

/// Multi-dataset causality analyzer.
///
/// Datasets are registered under a name and analyzed in insertion order;
/// per-dataset outcomes are retrievable afterwards. A typical session:
///
/// ```
/// use granger_causality::{
///     causal_chain, CausalityConfig, GeneratorConfig, GrangerCausalityAnalyzer,
///     TimeSeriesDataset,
/// };
///
/// let chain = causal_chain(
///     &GeneratorConfig { length: 200, seed: Some(1), noise_std: 1.0 },
///     0.8,
/// ).unwrap();
/// let mut dataset = TimeSeriesDataset::new();
/// dataset.add_column("y", chain.y).unwrap();
/// dataset.add_column("x", chain.x).unwrap();
///
/// let mut analyzer = GrangerCausalityAnalyzer::new(CausalityConfig::default().with_max_lag(4));
/// analyzer.add_dataset("demo", dataset).unwrap();
/// analyzer.analyze_all_datasets().unwrap();
/// let outcomes = analyzer.get_results("demo").unwrap();
/// assert_eq!(outcomes.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct GrangerCausalityAnalyzer {
    config: CausalityConfig,
    datasets: Vec<(String, TimeSeriesDataset)>,
    results: Vec<(String, Vec<PairOutcome>)>,
}

impl GrangerCausalityAnalyzer {
    /// Create an analyzer with the given configuration.
    pub fn new(config: CausalityConfig) -> Self {
        Self {
            config,
            datasets: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &CausalityConfig {
        &self.config
    }

    /// Register a dataset for analysis.
    ///
    /// Shape problems surface here rather than at analysis time, so a bad
    /// dataset never invalidates a whole batch later.
    ///
    /// # Errors
    /// `InvalidParameter` for a duplicate name or fewer than two columns.
    pub fn add_dataset(
        &mut self,
        name: impl Into<String>,
        dataset: TimeSeriesDataset,
    ) -> GrangerResult<()> {
        let name = name.into();
        if self.datasets.iter().any(|(existing, _)| *existing == name) {
            return Err(CausalityError::InvalidParameter {
                parameter: format!("dataset '{}'", name),
                value: 0.0,
                constraint: "dataset names must be unique".to_string(),
            });
        }
        validate_dataset_shape(&dataset)?;
        self.datasets.push((name, dataset));
        Ok(())
    }

    /// Analyze every registered dataset, replacing any previous results.
    pub fn analyze_all_datasets(&mut self) -> GrangerResult<()> {
        self.analyze_with_cancellation(None)
    }

    /// Analyze with an optional cooperative cancellation flag.
    ///
    /// The flag is polled between pairs. On cancellation the outcomes
    /// computed so far stay retrievable and `Cancelled` is returned.
    pub fn analyze_with_cancellation(
        &mut self,
        cancel: Option<&AtomicBool>,
    ) -> GrangerResult<()> {
        self.config.validate()?;
        self.results.clear();

        for (name, dataset) in &self.datasets {
            let mut outcomes = Vec::with_capacity(dataset.n_columns().saturating_sub(1));
            for pair in dataset.candidate_pairs() {
                if let Some(flag) = cancel {
                    if flag.load(Ordering::Relaxed) {
                        self.results.push((name.clone(), outcomes));
                        return Err(CausalityError::Cancelled);
                    }
                }
                outcomes.push(test_pair(&pair, &self.config));
            }
            self.results.push((name.clone(), outcomes));
        }
        Ok(())
    }

    /// Outcomes for one dataset, in candidate-column order.
    ///
    /// # Errors
    /// `DatasetNotFound` when no results exist under this name.
    pub fn get_results(&self, name: &str) -> GrangerResult<&[PairOutcome]> {
        self.results
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, outcomes)| outcomes.as_slice())
            .ok_or_else(|| CausalityError::DatasetNotFound {
                name: name.to_string(),
            })
    }

    /// All results in dataset insertion order.
    pub fn all_results(&self) -> impl Iterator<Item = (&str, &[PairOutcome])> {
        self.results
            .iter()
            .map(|(name, outcomes)| (name.as_str(), outcomes.as_slice()))
    }

    /// Flat table of directed results for one dataset: two rows per
    /// completed pair, forward then reverse. Failed pairs contribute none.
    ///
    /// # Errors
    /// `DatasetNotFound` when no results exist under this name.
    pub fn result_rows(&self, name: &str) -> GrangerResult<Vec<&CausalityResult>> {
        let outcomes = self.get_results(name)?;
        let mut rows = Vec::new();
        for outcome in outcomes {
            if let PairOutcome::Completed {
                forward, reverse, ..
            } = outcome
            {
                rows.push(forward);
                rows.push(reverse);
            }
        }
        Ok(rows)
    }
}
