//! Data Processor Module
//! Derived deviation columns, spot-window filtering, time slicing and
//! option-id pairing on loaded solver tables.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("no time values found in column {0}")]
    EmptyTimeAxis(String),
    #[error("column {0} has no rows")]
    EmptyColumn(String),
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Suffix of derived deviation columns.
pub const DIFF_SUFFIX: &str = "_diff";

/// Stateless transformations over loaded tables.
pub struct DataProcessor;

impl DataProcessor {
    /// Numeric scheme columns of a table: everything except the index
    /// column, the analytic reference and already-derived diff columns.
    pub fn scheme_columns(df: &DataFrame, index_col: &str, reference: &str) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|column| is_numeric(column.dtype()))
            .map(|column| column.name().to_string())
            .filter(|name| {
                name != index_col && name != reference && !name.ends_with(DIFF_SUFFIX)
            })
            .collect()
    }

    /// Append `|column - reference|` as `<column>_diff` for every scheme
    /// column. Computed once; existing diff columns are never re-derived.
    pub fn append_abs_diff(
        df: &DataFrame,
        index_col: &str,
        reference: &str,
    ) -> Result<DataFrame, ProcessorError> {
        let exprs: Vec<Expr> = Self::scheme_columns(df, index_col, reference)
            .into_iter()
            .map(|name| {
                (col(name.as_str()) - col(reference))
                    .abs()
                    .alias(format!("{name}{DIFF_SUFFIX}"))
            })
            .collect();

        let derived = df.clone().lazy().with_columns(exprs).collect()?;
        Ok(derived)
    }

    /// Names of derived deviation columns, in frame order.
    pub fn diff_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| name.ends_with(DIFF_SUFFIX))
            .collect()
    }

    /// Partition identifiers into consecutive pairs. An odd trailing
    /// identifier cannot be paired and is dropped with a warning.
    pub fn pair_options(ids: &[String]) -> Vec<(String, String)> {
        if ids.len() % 2 != 0 {
            if let Some(last) = ids.last() {
                log::warn!(
                    "odd number of option identifiers ({}); {last} is left unpaired",
                    ids.len()
                );
            }
        }
        ids.chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect()
    }

    /// Replace a column with its element-wise exponential.
    pub fn exp_column(df: &DataFrame, name: &str) -> Result<DataFrame, ProcessorError> {
        let cast = df.column(name)?.cast(&DataType::Float64)?;
        let ca = cast.f64()?;
        let exponentiated: Vec<Option<f64>> =
            (0..df.height()).map(|i| ca.get(i).map(f64::exp)).collect();

        let mut out = df.clone();
        out.with_column(Column::new(name.into(), exponentiated))?;
        Ok(out)
    }

    /// Keep rows with `lower < value < upper`, both bounds strict.
    pub fn strict_window(
        df: &DataFrame,
        name: &str,
        lower: f64,
        upper: f64,
    ) -> Result<DataFrame, ProcessorError> {
        let filtered = df
            .clone()
            .lazy()
            .filter(col(name).gt(lit(lower)).and(col(name).lt(lit(upper))))
            .collect()?;
        Ok(filtered)
    }

    /// Exponentiate the spot column, then keep the strict `(lower, upper)`
    /// spot window.
    pub fn spot_window(
        df: &DataFrame,
        spot_col: &str,
        lower: f64,
        upper: f64,
    ) -> Result<DataFrame, ProcessorError> {
        let exponentiated = Self::exp_column(df, spot_col)?;
        Self::strict_window(&exponentiated, spot_col, lower, upper)
    }

    /// Rows at one time value.
    pub fn time_slice(
        df: &DataFrame,
        time_col: &str,
        t: f64,
    ) -> Result<DataFrame, ProcessorError> {
        let sliced = df
            .clone()
            .lazy()
            .filter(col(time_col).eq(lit(t)))
            .collect()?;
        Ok(sliced)
    }

    /// Sorted distinct values of a time column. An empty axis is fatal; the
    /// first and last elements select the reference curves.
    pub fn sorted_times(df: &DataFrame, time_col: &str) -> Result<Vec<f64>, ProcessorError> {
        let cast = df.column(time_col)?.cast(&DataType::Float64)?;
        let ca = cast.f64()?;
        let mut times: Vec<f64> = (0..df.height()).filter_map(|i| ca.get(i)).collect();
        times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        times.dedup();

        if times.is_empty() {
            return Err(ProcessorError::EmptyTimeAxis(time_col.to_string()));
        }
        Ok(times)
    }

    /// Maximum of a numeric column over the whole table.
    pub fn column_max(df: &DataFrame, name: &str) -> Result<f64, ProcessorError> {
        let cast = df.column(name)?.cast(&DataType::Float64)?;
        let ca = cast.f64()?;
        ca.max().ok_or_else(|| ProcessorError::EmptyColumn(name.to_string()))
    }

    /// Paired (x, y) values of two columns; rows with a null on either side
    /// are skipped.
    pub fn series_xy(
        df: &DataFrame,
        x_col: &str,
        y_col: &str,
    ) -> Result<Vec<(f64, f64)>, ProcessorError> {
        let x_cast = df.column(x_col)?.cast(&DataType::Float64)?;
        let y_cast = df.column(y_col)?.cast(&DataType::Float64)?;
        let x_ca = x_cast.f64()?;
        let y_ca = y_cast.f64()?;

        Ok((0..df.height())
            .filter_map(|i| match (x_ca.get(i), y_ca.get(i)) {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convergence_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("NS".into(), vec![1i64, 2, 3]),
            Column::new("Analytic".into(), vec![1.0f64, 1.0, 1.0]),
            Column::new("SchemeA".into(), vec![0.9f64, 0.95, 0.99]),
        ])
        .unwrap()
    }

    fn surface_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("S".into(), vec![0.9f64, 1.0, 1.1, 0.9, 1.0, 1.1]),
            Column::new("T".into(), vec![0.0f64, 0.0, 0.0, 0.5, 0.5, 0.5]),
            Column::new("f".into(), vec![0.1f64, 0.4, 0.2, 0.3, 0.9, 0.5]),
        ])
        .unwrap()
    }

    #[test]
    fn abs_diff_matches_reference_deviation() {
        let derived =
            DataProcessor::append_abs_diff(&convergence_frame(), "NS", "Analytic").unwrap();

        let diffs: Vec<f64> = {
            let cast = derived
                .column("SchemeA_diff")
                .unwrap()
                .cast(&DataType::Float64)
                .unwrap();
            let ca = cast.f64().unwrap();
            (0..derived.height()).filter_map(|i| ca.get(i)).collect()
        };

        let expected = [0.1, 0.05, 0.01];
        assert_eq!(diffs.len(), expected.len());
        for (got, want) in diffs.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12, "got {got}, want {want}");
        }
    }

    #[test]
    fn scheme_columns_skip_index_reference_and_derived() {
        let with_labels = DataFrame::new(vec![
            Column::new("NS".into(), vec![1i64, 2]),
            Column::new("Analytic".into(), vec![1.0f64, 1.0]),
            Column::new("SchemeA".into(), vec![0.9f64, 0.95]),
            Column::new("SchemeA_diff".into(), vec![0.1f64, 0.05]),
            Column::new("Label".into(), vec!["a", "b"]),
        ])
        .unwrap();

        assert_eq!(
            DataProcessor::scheme_columns(&with_labels, "NS", "Analytic"),
            vec!["SchemeA"]
        );
    }

    #[test]
    fn diff_columns_skip_index_and_reference() {
        let derived =
            DataProcessor::append_abs_diff(&convergence_frame(), "NS", "Analytic").unwrap();
        assert_eq!(DataProcessor::diff_columns(&derived), vec!["SchemeA_diff"]);
        assert!(derived.column("NS_diff").is_err());
        assert!(derived.column("Analytic_diff").is_err());
    }

    #[test]
    fn derivation_is_idempotent_on_diff_columns() {
        let once = DataProcessor::append_abs_diff(&convergence_frame(), "NS", "Analytic").unwrap();
        let twice = DataProcessor::append_abs_diff(&once, "NS", "Analytic").unwrap();
        assert_eq!(DataProcessor::diff_columns(&twice), vec!["SchemeA_diff"]);
    }

    #[test]
    fn even_id_list_pairs_completely() {
        let ids: Vec<String> = ["E1", "E2", "E3", "E4"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let pairs = DataProcessor::pair_options(&ids);
        assert_eq!(
            pairs,
            vec![
                ("E1".to_string(), "E2".to_string()),
                ("E3".to_string(), "E4".to_string()),
            ]
        );
    }

    #[test]
    fn odd_id_list_drops_trailing_identifier() {
        let ids: Vec<String> = ["E1", "E2", "E3"].iter().map(|s| s.to_string()).collect();
        let pairs = DataProcessor::pair_options(&ids);
        assert_eq!(pairs, vec![("E1".to_string(), "E2".to_string())]);
    }

    #[test]
    fn strict_window_excludes_exact_bounds() {
        let df = DataFrame::new(vec![Column::new(
            "S".into(),
            vec![0.5f64, 0.500001, 1.0, 1.999999, 2.0, 2.5],
        )])
        .unwrap();

        let windowed = DataProcessor::strict_window(&df, "S", 0.5, 2.0).unwrap();
        let cast = windowed.column("S").unwrap().cast(&DataType::Float64).unwrap();
        let ca = cast.f64().unwrap();
        let kept: Vec<f64> = (0..windowed.height()).filter_map(|i| ca.get(i)).collect();
        assert_eq!(kept, vec![0.500001, 1.0, 1.999999]);
    }

    #[test]
    fn spot_window_exponentiates_before_filtering() {
        // exp(0) = 1 stays inside (0.5, 2.0); exp(1) and exp(-1) fall outside.
        let df = DataFrame::new(vec![Column::new("S".into(), vec![0.0f64, 1.0, -1.0])]).unwrap();
        let windowed = DataProcessor::spot_window(&df, "S", 0.5, 2.0).unwrap();
        assert_eq!(windowed.height(), 1);
    }

    #[test]
    fn sorted_times_are_distinct_and_ascending() {
        let times = DataProcessor::sorted_times(&surface_frame(), "T").unwrap();
        assert_eq!(times, vec![0.0, 0.5]);
    }

    #[test]
    fn empty_time_axis_is_an_error() {
        let df = DataFrame::new(vec![Column::new("T".into(), Vec::<f64>::new())]).unwrap();
        assert!(matches!(
            DataProcessor::sorted_times(&df, "T"),
            Err(ProcessorError::EmptyTimeAxis(_))
        ));
    }

    #[test]
    fn column_max_spans_the_whole_table() {
        let max = DataProcessor::column_max(&surface_frame(), "f").unwrap();
        assert!((max - 0.9).abs() < 1e-12);
    }

    #[test]
    fn time_slice_selects_one_time_value() {
        let df = surface_frame();
        let slice = DataProcessor::time_slice(&df, "T", 0.5).unwrap();
        assert_eq!(slice.height(), 3);
        let xy = DataProcessor::series_xy(&slice, "S", "f").unwrap();
        assert_eq!(xy, vec![(0.9, 0.3), (1.0, 0.9), (1.1, 0.5)]);
    }
}
