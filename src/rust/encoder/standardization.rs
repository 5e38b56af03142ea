use std::collections::HashMap;

use crate::ClassifierError;

/// `(value - mean) / std`. No clamping: values outside the training range extrapolate linearly.
#[inline]
pub fn standardize(value: f64, mean: f64, std: f64) -> f64 {
    (value - mean) / std
}

/// Training-set mean and standard deviation of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    pub std: f64,
}

/// Per-field standardization statistics. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct StandardizationConstants {
    stats: HashMap<&'static str, ColumnStats>,
}

impl StandardizationConstants {
    /// Builds the table, rejecting zero or non-finite deviations
    pub fn new(entries: &[(&'static str, f64, f64)]) -> Result<Self, ClassifierError> {
        let mut stats = HashMap::with_capacity(entries.len());
        for &(field, mean, std) in entries {
            if !mean.is_finite() || !std.is_finite() || std == 0.0 {
                return Err(ClassifierError::ValidationError(format!(
                    "Invalid standardization constants for '{}': mean={}, std={}",
                    field, mean, std
                )));
            }
            stats.insert(field, ColumnStats { mean, std });
        }
        Ok(Self { stats })
    }

    /// Constants computed from the training set of the one-hot model
    pub fn training_defaults() -> Self {
        let stats = [
            ("Age", 23.144453, 4.102400),
            ("Height", 1.715131, 0.087400),
            ("Weight", 92.504880, 27.473986),
            ("FCVC", 2.456863, 0.546924),
            ("CH2O", 2.060705, 0.601654),
            ("FAF", 1.031469, 0.855703),
            ("TUE", 0.693352, 0.586877),
            ("NCP", 2.759646, 0.753488),
            ("BMI", 31.389988, 7.123892),
        ]
        .into_iter()
        .map(|(field, mean, std)| (field, ColumnStats { mean, std }))
        .collect();
        Self { stats }
    }

    pub fn get(&self, field: &str) -> Option<ColumnStats> {
        self.stats.get(field).copied()
    }

    pub fn standardize(&self, field: &str, value: f64) -> Result<f64, ClassifierError> {
        let stats = self.get(field).ok_or_else(|| {
            ClassifierError::ValidationError(format!("No standardization constants for field '{}'", field))
        })?;
        Ok(standardize(value, stats.mean, stats.std))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize_formula() {
        let constants = StandardizationConstants::training_defaults();
        for (field, value) in [("Age", 14.0), ("Age", 61.0), ("Height", 1.8), ("Weight", 85.0), ("BMI", 26.23)] {
            let stats = constants.get(field).unwrap();
            let expected = (value - stats.mean) / stats.std;
            let actual = constants.standardize(field, value).unwrap();
            assert!((actual - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_mean_maps_to_zero() {
        let constants = StandardizationConstants::training_defaults();
        assert_eq!(constants.standardize("Age", 23.144453).unwrap(), 0.0);
        assert_eq!(constants.len(), 9);
    }

    #[test]
    fn test_no_clamping() {
        let constants = StandardizationConstants::training_defaults();
        let far = constants.standardize("Age", 100.0).unwrap();
        assert!((far - (100.0 - 23.144453) / 4.102400).abs() < 1e-9);
        assert!(far > 18.0);
    }

    #[test]
    fn test_unknown_field() {
        let constants = StandardizationConstants::training_defaults();
        assert!(matches!(
            constants.standardize("Shoe size", 42.0),
            Err(ClassifierError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_zero_std() {
        assert!(StandardizationConstants::new(&[("Age", 20.0, 0.0)]).is_err());
        assert!(StandardizationConstants::new(&[("Age", f64::NAN, 1.0)]).is_err());
        assert!(StandardizationConstants::new(&[("Age", 20.0, 2.0)]).is_ok());
    }
}
