//! Column-major reshaping of WER datasets for the dashboard front end.
//!
//! The dashboard consumes one JSON object whose keys are column names and
//! whose values are per-column arrays in row order. Only the known column
//! set is emitted; anything else in the input is ignored. Nulls become `0`
//! for numeric columns and `""` for text columns.

use crate::error::Result;
use crate::utils::{
    fraction_at_or_above, is_integer_dtype, is_numeric_dtype, series_mean, sorted_quantile,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fs::{self, File};
use std::io::Write as _;
use std::path::Path;
use tracing::{info, warn};

/// The closed set of columns the dashboard understands.
pub const DASHBOARD_COLUMNS: [&str; 13] = [
    "wer",
    "duration_sec",
    "word_count",
    "char_count",
    "avg_word_len",
    "speaking_rate",
    "energy",
    "zcr",
    "spectral_centroid",
    "silence_ratio",
    "snr",
    "pred_text",
    "gt_text",
];

/// Restructure a row-oriented dataset into the dashboard's column-major
/// JSON object.
///
/// Missing required columns are a schema mismatch, not a failure: each one
/// is logged as a warning and omitted from the output. Column order follows
/// the DataFrame's column order filtered to the known set.
pub fn reshape_for_dashboard(df: &DataFrame) -> Result<Map<String, Value>> {
    for required in DASHBOARD_COLUMNS {
        if df.column(required).is_err() {
            warn!("Missing column '{}'; omitting from dashboard data", required);
        }
    }

    let mut data = Map::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if !DASHBOARD_COLUMNS.contains(&name) {
            continue;
        }
        let values = column_values(column.as_materialized_series())?;
        data.insert(name.to_string(), Value::Array(values));
    }

    Ok(data)
}

/// Reshape and write the dashboard JSON file.
///
/// Parent directories are created as needed; a failed write aborts the run
/// with no partial output left behind a successful exit.
pub fn write_dashboard_json(df: &DataFrame, output: &Path) -> Result<()> {
    let data = reshape_for_dashboard(df)?;
    let serialized = serde_json::to_string_pretty(&Value::Object(data))?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output)?;
    file.write_all(serialized.as_bytes())?;

    info!("Dashboard data saved: {} ({} rows)", output.display(), df.height());

    Ok(())
}

fn column_values(series: &Series) -> Result<Vec<Value>> {
    let dtype = series.dtype();

    if dtype == &DataType::String {
        let ca = series.str()?;
        return Ok(ca
            .into_iter()
            .map(|v| Value::String(v.unwrap_or("").to_string()))
            .collect());
    }

    if is_integer_dtype(dtype) {
        let cast = series.cast(&DataType::Int64)?;
        let ca = cast.i64()?;
        return Ok(ca
            .into_iter()
            .map(|v| Value::from(v.unwrap_or(0)))
            .collect());
    }

    if is_numeric_dtype(dtype) {
        let cast = series.cast(&DataType::Float64)?;
        let ca = cast.f64()?;
        return Ok(ca
            .into_iter()
            .map(|v| {
                // Non-finite values have no JSON representation; fold them
                // into the null default.
                Number::from_f64(v.unwrap_or(0.0))
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::from(0))
            })
            .collect());
    }

    // Anything else (booleans, dates) renders through its string form.
    let cast = series.cast(&DataType::String)?;
    let ca = cast.str()?;
    Ok(ca
        .into_iter()
        .map(|v| Value::String(v.unwrap_or("").to_string()))
        .collect())
}

// =============================================================================
// Corpus WER statistics
// =============================================================================

/// Headline WER statistics for a converted corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WerStats {
    pub mean: f64,
    pub median: f64,
    pub p90: f64,
    /// Fraction of rows with WER >= 0.5.
    pub high_wer_rate: f64,
}

/// Compute headline WER statistics for logging after conversion.
///
/// Returns None when the `wer` column is absent or holds no values.
pub fn wer_stats(df: &DataFrame) -> Result<Option<WerStats>> {
    let Ok(column) = df.column("wer") else {
        return Ok(None);
    };
    let series = column.as_materialized_series();

    let (Some(mean), Some(median), Some(p90)) = (
        series_mean(series)?,
        sorted_quantile(series, 0.5)?,
        sorted_quantile(series, 0.9)?,
    ) else {
        return Ok(None);
    };

    Ok(Some(WerStats {
        mean,
        median,
        p90,
        high_wer_rate: fraction_at_or_above(series, 0.5)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reshape_basic() {
        let df = df!(
            "wer" => [0.1, 0.5],
            "word_count" => [10i64, 20],
            "pred_text" => ["hello", "world"],
            "extra_column" => ["dropped", "dropped"],
        )
        .unwrap();

        let data = reshape_for_dashboard(&df).unwrap();
        assert_eq!(data.len(), 3);
        assert!(!data.contains_key("extra_column"));
        assert_eq!(data["wer"], serde_json::json!([0.1, 0.5]));
        assert_eq!(data["word_count"], serde_json::json!([10, 20]));
        assert_eq!(data["pred_text"], serde_json::json!(["hello", "world"]));
    }

    #[test]
    fn test_reshape_null_handling() {
        let df = df!(
            "wer" => [Some(0.2), None, None],
            "pred_text" => [None, Some("spoken"), None],
        )
        .unwrap();

        let data = reshape_for_dashboard(&df).unwrap();
        assert_eq!(data["wer"], serde_json::json!([0.2, 0.0, 0.0]));
        assert_eq!(data["pred_text"], serde_json::json!(["", "spoken", ""]));
    }

    #[test]
    fn test_reshape_all_null_columns_preserve_length() {
        let df = df!(
            "wer" => [None::<f64>, None, None],
            "gt_text" => [None::<&str>, None, None],
        )
        .unwrap();

        let data = reshape_for_dashboard(&df).unwrap();
        assert_eq!(data["wer"], serde_json::json!([0.0, 0.0, 0.0]));
        assert_eq!(data["gt_text"], serde_json::json!(["", "", ""]));
    }

    #[test]
    fn test_reshape_missing_columns_omitted() {
        let df = df!("wer" => [0.1]).unwrap();
        let data = reshape_for_dashboard(&df).unwrap();
        assert_eq!(data.len(), 1);
        assert!(!data.contains_key("pred_text"));
    }

    #[test]
    fn test_wer_stats() {
        let df = df!(
            "wer" => [0.0, 0.2, 0.4, 0.6, 0.8],
        )
        .unwrap();

        let stats = wer_stats(&df).unwrap().unwrap();
        assert_eq!(stats.mean, 0.4);
        assert_eq!(stats.median, 0.4);
        assert_eq!(stats.high_wer_rate, 0.4);
    }

    #[test]
    fn test_wer_stats_missing_column() {
        let df = df!("pred_text" => ["a"]).unwrap();
        assert_eq!(wer_stats(&df).unwrap(), None);
    }
}
