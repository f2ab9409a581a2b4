//! Time series dataset containers for causality testing.
//!
//! A [`TimeSeriesDataset`] is an insertion-ordered mapping from column name to
//! an equal-length numeric series. Column 0 is the designated "effect"
//! variable; every later column is a candidate "cause". Pairs are projected
//! out as borrowed [`CandidatePair`] views, so no data is copied per test.

use crate::errors::{validate_all_finite, CausalityError, GrangerResult};

/// An ordered collection of equal-length named time series.
///
/// The first column added is the effect variable; columns 1..n-1 are the
/// candidate cause variables tested against it. Insertion order is preserved
/// and determines the order of results.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesDataset {
    columns: Vec<(String, Vec<f64>)>,
}

impl TimeSeriesDataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Append a named column.
    ///
    /// The first column fixes the series length `T`; later columns must match
    /// it. All values must be finite and column names must be unique.
    ///
    /// # Errors
    /// * `InvalidParameter` for a length mismatch or duplicate name
    /// * `NumericalError` for non-finite observations
    pub fn add_column(&mut self, name: impl Into<String>, data: Vec<f64>) -> GrangerResult<()> {
        let name = name.into();

        if self.columns.iter().any(|(existing, _)| *existing == name) {
            return Err(CausalityError::InvalidParameter {
                parameter: format!("column '{}'", name),
                value: 0.0,
                constraint: "column names must be unique".to_string(),
            });
        }

        if let Some((_, first)) = self.columns.first() {
            if data.len() != first.len() {
                return Err(CausalityError::InvalidParameter {
                    parameter: format!("column '{}' length", name),
                    value: data.len() as f64,
                    constraint: format!("all columns must have length {}", first.len()),
                });
            }
        }

        validate_all_finite(&data, &name)?;
        self.columns.push((name, data));
        Ok(())
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Series length `T` (0 for an empty dataset).
    pub fn series_length(&self) -> usize {
        self.columns.first().map(|(_, data)| data.len()).unwrap_or(0)
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Project the (effect, cause_j) pair for candidate column `j`.
    ///
    /// `j` counts from 1; column 0 is always the effect side.
    ///
    /// # Errors
    /// `InvalidParameter` when `j` is 0 or out of range.
    pub fn candidate_pair(&self, j: usize) -> GrangerResult<CandidatePair<'_>> {
        if j == 0 || j >= self.columns.len() {
            return Err(CausalityError::InvalidParameter {
                parameter: "candidate column index".to_string(),
                value: j as f64,
                constraint: format!("must be in [1, {}]", self.columns.len().saturating_sub(1)),
            });
        }
        let (effect_name, effect) = &self.columns[0];
        let (cause_name, cause) = &self.columns[j];
        Ok(CandidatePair {
            effect_name,
            cause_name,
            effect,
            cause,
        })
    }

    /// Iterate over all candidate pairs in column order.
    pub fn candidate_pairs(&self) -> impl Iterator<Item = CandidatePair<'_>> {
        let (effect_name, effect) = self
            .columns
            .first()
            .map(|(name, data)| (name.as_str(), data.as_slice()))
            .unwrap_or(("", &[]));
        self.columns.iter().skip(1).map(move |(name, data)| CandidatePair {
            effect_name,
            cause_name: name,
            effect,
            cause: data,
        })
    }
}

/// A borrowed bivariate projection of a dataset: the effect series and one
/// candidate cause series. The rest of the dataset is inert context.
#[derive(Debug, Clone, Copy)]
pub struct CandidatePair<'a> {
    /// Name of the effect column
    pub effect_name: &'a str,
    /// Name of the candidate cause column
    pub cause_name: &'a str,
    /// Effect series
    pub effect: &'a [f64],
    /// Candidate cause series
    pub cause: &'a [f64],
}

impl CandidatePair<'_> {
    /// Shared series length `T`.
    pub fn len(&self) -> usize {
        self.effect.len()
    }

    /// True when the pair carries no observations.
    pub fn is_empty(&self) -> bool {
        self.effect.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_column_dataset() -> TimeSeriesDataset {
        let mut dataset = TimeSeriesDataset::new();
        dataset.add_column("Y", vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        dataset.add_column("X1", vec![0.5, 1.5, 2.5, 3.5]).unwrap();
        dataset.add_column("X2", vec![4.0, 3.0, 2.0, 1.0]).unwrap();
        dataset
    }

    #[test]
    fn test_add_column_preserves_insertion_order() {
        let dataset = three_column_dataset();
        let names: Vec<&str> = dataset.column_names().collect();
        assert_eq!(names, vec!["Y", "X1", "X2"]);
        assert_eq!(dataset.n_columns(), 3);
        assert_eq!(dataset.series_length(), 4);
    }

    #[test]
    fn test_add_column_rejects_length_mismatch() {
        let mut dataset = TimeSeriesDataset::new();
        dataset.add_column("Y", vec![1.0, 2.0, 3.0]).unwrap();
        let result = dataset.add_column("X", vec![1.0, 2.0]);
        assert!(matches!(
            result,
            Err(CausalityError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_add_column_rejects_duplicate_name() {
        let mut dataset = TimeSeriesDataset::new();
        dataset.add_column("Y", vec![1.0, 2.0]).unwrap();
        let result = dataset.add_column("Y", vec![3.0, 4.0]);
        assert!(matches!(
            result,
            Err(CausalityError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_add_column_rejects_non_finite() {
        let mut dataset = TimeSeriesDataset::new();
        let result = dataset.add_column("Y", vec![1.0, f64::NAN]);
        assert!(matches!(result, Err(CausalityError::NumericalError { .. })));
    }

    #[test]
    fn test_candidate_pair_projection() {
        let dataset = three_column_dataset();

        let pair = dataset.candidate_pair(2).unwrap();
        assert_eq!(pair.effect_name, "Y");
        assert_eq!(pair.cause_name, "X2");
        assert_eq!(pair.effect, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(pair.cause, &[4.0, 3.0, 2.0, 1.0]);
        assert_eq!(pair.len(), 4);
    }

    #[test]
    fn test_candidate_pair_rejects_effect_index() {
        let dataset = three_column_dataset();
        assert!(dataset.candidate_pair(0).is_err());
        assert!(dataset.candidate_pair(3).is_err());
    }

    #[test]
    fn test_candidate_pairs_iterates_in_column_order() {
        let dataset = three_column_dataset();
        let causes: Vec<&str> = dataset.candidate_pairs().map(|p| p.cause_name).collect();
        assert_eq!(causes, vec!["X1", "X2"]);
    }
}
