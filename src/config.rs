//! Configuration for causality analysis runs.

use crate::errors::{CausalityError, GrangerResult};
use crate::lag_selection::Criterion;

/// Configuration for Toda-Yamamoto causality testing.
///
/// The defaults follow common applied practice: AIC lag selection over up to
/// 15 candidate lags, with one augmentation lag to cover I(1) series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CausalityConfig {
    /// Information criterion used for lag order selection
    pub criterion: Criterion,
    /// Largest candidate lag order considered during selection
    pub max_lag: usize,
    /// Augmentation lags added on top of the selected order; matches the
    /// maximum suspected integration order of the series
    pub extra_lag: usize,
}

impl Default for CausalityConfig {
    fn default() -> Self {
        Self {
            criterion: Criterion::Aic,
            max_lag: 15,
            extra_lag: 1,
        }
    }
}

impl CausalityConfig {
    /// Default configuration with a specific selection criterion.
    pub fn new(criterion: Criterion) -> Self {
        Self {
            criterion,
            ..Self::default()
        }
    }

    /// Set the maximum candidate lag order.
    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = max_lag;
        self
    }

    /// Set the number of augmentation lags.
    pub fn with_extra_lag(mut self, extra_lag: usize) -> Self {
        self.extra_lag = extra_lag;
        self
    }

    /// Validate parameter ranges.
    ///
    /// # Errors
    /// `InvalidParameter` when `max_lag` is zero. `extra_lag` may be zero,
    /// which degrades the procedure to a plain Granger test on stationary
    /// data.
    pub fn validate(&self) -> GrangerResult<()> {
        if self.max_lag == 0 {
            return Err(CausalityError::InvalidParameter {
                parameter: "max_lag".to_string(),
                value: 0.0,
                constraint: "must be >= 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CausalityConfig::default();
        assert_eq!(config.criterion, Criterion::Aic);
        assert_eq!(config.max_lag, 15);
        assert_eq!(config.extra_lag, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_style_overrides() {
        let config = CausalityConfig::new(Criterion::Bic)
            .with_max_lag(8)
            .with_extra_lag(2);
        assert_eq!(config.criterion, Criterion::Bic);
        assert_eq!(config.max_lag, 8);
        assert_eq!(config.extra_lag, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_lag_invalid() {
        let config = CausalityConfig::default().with_max_lag(0);
        assert!(matches!(
            config.validate(),
            Err(CausalityError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_zero_extra_lag_allowed() {
        let config = CausalityConfig::default().with_extra_lag(0);
        assert!(config.validate().is_ok());
    }
}
