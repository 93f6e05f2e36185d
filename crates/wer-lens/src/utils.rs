//! Shared utilities for dataset loading and series inspection.

use crate::error::{AnalysisError, Result, ResultExt};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::Path;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

// =============================================================================
// Dataset Loading
// =============================================================================

/// Load a delimited dataset from disk.
///
/// An absent file is a fatal [`AnalysisError::InputNotFound`]; nothing is
/// partially read.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(AnalysisError::InputNotFound(path.to_path_buf()));
    }

    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Failed to read {}", path.display()))?
        .finish()
        .context(format!("Failed to parse {}", path.display()))?;

    Ok(df)
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Compute a quantile of a numeric series by sorting and indexing.
///
/// Returns None for an empty (or all-null) series.
pub fn sorted_quantile(series: &Series, q: f64) -> Result<Option<f64>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(None);
    }

    let float_series = non_null.cast(&DataType::Float64)?;
    let sorted = float_series.sort(SortOptions::default())?;
    let n = sorted.len();
    let idx = ((n as f64 * q) as usize).min(n - 1);

    let value = sorted.get(idx)?.try_extract::<f64>()?;
    Ok(Some(value))
}

/// Mean of a numeric series, ignoring nulls. None when no values remain.
pub fn series_mean(series: &Series) -> Result<Option<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series.f64()?.mean())
}

/// Fraction of non-null values at or above a threshold.
///
/// Returns 0.0 for an empty series.
pub fn fraction_at_or_above(series: &Series, threshold: f64) -> Result<f64> {
    let float_series = series.cast(&DataType::Float64)?;
    let ca = float_series.f64()?;

    let mut total = 0usize;
    let mut above = 0usize;
    for value in ca.into_iter().flatten() {
        total += 1;
        if value >= threshold {
            above += 1;
        }
    }

    if total == 0 {
        Ok(0.0)
    } else {
        Ok(above as f64 / total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_is_integer_dtype() {
        assert!(is_integer_dtype(&DataType::Int32));
        assert!(!is_integer_dtype(&DataType::Float64));
        assert!(!is_integer_dtype(&DataType::String));
    }

    #[test]
    fn test_sorted_quantile() {
        let series = Series::new("wer".into(), &[0.1, 0.2, 0.3, 0.4, 0.5]);
        let median = sorted_quantile(&series, 0.5).unwrap().unwrap();
        assert_eq!(median, 0.3);

        let empty = Series::new("wer".into(), Vec::<f64>::new());
        assert_eq!(sorted_quantile(&empty, 0.5).unwrap(), None);
    }

    #[test]
    fn test_sorted_quantile_ignores_nulls() {
        let series = Series::new("wer".into(), &[Some(0.1), None, Some(0.3)]);
        let median = sorted_quantile(&series, 0.5).unwrap().unwrap();
        assert_eq!(median, 0.3);
    }

    #[test]
    fn test_series_mean() {
        let series = Series::new("wer".into(), &[1.0, 2.0, 3.0]);
        assert_eq!(series_mean(&series).unwrap(), Some(2.0));
    }

    #[test]
    fn test_fraction_at_or_above() {
        let series = Series::new("wer".into(), &[0.1, 0.5, 0.9, 0.4]);
        let rate = fraction_at_or_above(&series, 0.5).unwrap();
        assert_eq!(rate, 0.5);

        let empty = Series::new("wer".into(), Vec::<f64>::new());
        assert_eq!(fraction_at_or_above(&empty, 0.5).unwrap(), 0.0);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = load_csv(Path::new("definitely_missing_file.csv")).unwrap_err();
        assert!(matches!(err, AnalysisError::InputNotFound(_)));
    }

    #[test]
    fn test_load_csv_unreadable_path_carries_context() {
        // A directory exists but cannot be opened as a CSV file.
        let dir = std::env::temp_dir();
        let err = load_csv(&dir).unwrap_err();
        // Whether opening or parsing trips first, the context names the path.
        assert!(err.to_string().contains("Failed to"));
        assert!(err.to_string().contains(&dir.display().to_string()));
    }
}
