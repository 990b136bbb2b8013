//! ## Transformers for indicating and imputing missing values
//!
//! This module provides transformers for dealing with missing values.
//!
//! Currently, the following transformers are implemented:
//!
//! - **MissingIndicator**: Adds a binary `<feature>_na` column per target feature flagging missing values.
//! - **CategoricalImputer**: Fills missing values in categorical columns with the constant label `"Missing"`.
//! - **NumericalImputer**: Fills missing values in numeric columns with the mode learned during `fit`.
//!
//! Each transformer returns a new DataFrame with the applied strategy; the input DataFrame is never
//! mutated. Errors are returned as `TabPrepError` and results are wrapped in `TabPrepResult`.

use crate::exceptions::{TabPrepError, TabPrepResult};
use crate::impl_transformer;
use datafusion::functions_aggregate::expr_fn::count;
use datafusion::logical_expr::{col, lit, not, Case as DFCase, Expr};
use datafusion::prelude::*;
use datafusion::scalar::ScalarValue;
use std::collections::HashMap;

/// Validates that every column in `target_cols` exists in the DataFrame.
/// Returns an error if any target column is missing.
pub(crate) fn validate_columns(df: &DataFrame, target_cols: &[String]) -> TabPrepResult<()> {
    let schema = df.schema();
    for col_name in target_cols {
        if schema.field_with_name(None, col_name).is_err() {
            return Err(TabPrepError::MissingColumn(format!(
                "Column '{}' not found in DataFrame",
                col_name
            )));
        }
    }
    Ok(())
}

/// Constructs an expression equivalent to SQL COALESCE(col, fallback).
/// This is implemented as a CASE expression: if `col` is not null then return it, otherwise return `fallback`.
fn coalesce_expr_for(name: &str, fallback: Expr) -> Expr {
    Expr::Case(DFCase {
        expr: None,
        when_then_expr: vec![(Box::new(not(col(name).is_null())), Box::new(col(name)))],
        else_expr: Some(Box::new(fallback)),
    })
}

/// Generic helper function to apply a fill-in mapping to a set of target columns.
/// For each field in the DataFrame, if its name is in `target_cols` and a fallback is available via `get_fallback`,
/// then the column is replaced by a CASE–WHEN expression; otherwise, the original column is retained.
fn apply_imputation<F>(
    df: DataFrame,
    target_cols: &[String],
    get_fallback: F,
) -> TabPrepResult<DataFrame>
where
    F: Fn(&str) -> Option<Expr>,
{
    let exprs: Vec<Expr> = df
        .schema()
        .fields()
        .iter()
        .map(|field| {
            let name = field.name();
            if target_cols.contains(name) {
                if let Some(fallback_expr) = get_fallback(name) {
                    coalesce_expr_for(name, fallback_expr).alias(name)
                } else {
                    col(name)
                }
            } else {
                col(name)
            }
        })
        .collect();
    df.select(exprs).map_err(TabPrepError::from)
}

/// Adds a binary indicator column `<feature>_na` for each target column,
/// set to 1 where the original value is missing and 0 otherwise.
pub struct MissingIndicator {
    pub columns: Vec<String>,
}

impl MissingIndicator {
    /// Create a new missing indicator transformer for the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// This transformer is stateless, so fit only validates that the target columns exist.
    pub async fn fit(&mut self, df: &DataFrame) -> TabPrepResult<()> {
        validate_columns(df, &self.columns)?;
        Ok(())
    }

    /// Returns a new DataFrame with an additional `<feature>_na` column per target column.
    /// Original columns pass through unchanged.
    pub fn transform(&self, df: DataFrame) -> TabPrepResult<DataFrame> {
        validate_columns(&df, &self.columns)?;
        let mut exprs = vec![];
        for field in df.schema().fields() {
            let name = field.name();
            exprs.push(col(name));
            if self.columns.contains(name) {
                let indicator = Expr::Case(DFCase {
                    expr: None,
                    when_then_expr: vec![(Box::new(col(name).is_null()), Box::new(lit(1_i32)))],
                    else_expr: Some(Box::new(lit(0_i32))),
                })
                .alias(format!("{}_na", name));
                exprs.push(indicator);
            }
        }
        df.select(exprs).map_err(TabPrepError::from)
    }

    fn inherent_is_stateful(&self) -> bool {
        false
    }
}

/// Replaces missing values in categorical columns with the constant label `"Missing"`.
pub struct CategoricalImputer {
    pub columns: Vec<String>,
}

impl CategoricalImputer {
    /// Create a new categorical imputer for the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// This transformer is stateless, so fit only validates that the target columns exist.
    pub async fn fit(&mut self, df: &DataFrame) -> TabPrepResult<()> {
        validate_columns(df, &self.columns)?;
        Ok(())
    }

    /// Returns a new DataFrame where, for each target column, missing values are replaced
    /// with the label `"Missing"`. Non-missing values pass through unchanged.
    pub fn transform(&self, df: DataFrame) -> TabPrepResult<DataFrame> {
        validate_columns(&df, &self.columns)?;
        apply_imputation(df, &self.columns, |_| Some(lit("Missing")))
    }

    fn inherent_is_stateful(&self) -> bool {
        false
    }
}

/// Replaces missing values in numeric columns with the mode learned during `fit`.
pub struct NumericalImputer {
    pub columns: Vec<String>,
    /// Mapping from column name to the learned mode. `None` until `fit` is called.
    pub impute_values: Option<HashMap<String, f64>>,
}

impl NumericalImputer {
    /// Create a new numerical imputer for the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            impute_values: None,
        }
    }

    /// For each target column, compute the mode of the non-null values via grouping and counting.
    ///
    /// Ties are broken deterministically: the highest count wins and, among equally
    /// frequent values, the smallest value is chosen.
    pub async fn fit(&mut self, df: &DataFrame) -> TabPrepResult<()> {
        validate_columns(df, &self.columns)?;
        let mut impute_values = HashMap::new();
        for col_name in &self.columns {
            let field = df.schema().field_with_name(None, col_name).map_err(|_| {
                TabPrepError::MissingColumn(format!(
                    "Column '{}' not found in DataFrame",
                    col_name
                ))
            })?;
            if field.data_type() != &datafusion::arrow::datatypes::DataType::Float64 {
                return Err(TabPrepError::InvalidParameter(format!(
                    "NumericalImputer requires column '{}' to be Float64",
                    col_name
                )));
            }
            let grouped = df
                .clone()
                .filter(col(col_name).is_not_null())
                .map_err(TabPrepError::from)?
                .aggregate(vec![col(col_name)], vec![count(col(col_name)).alias("cnt")])
                .map_err(TabPrepError::from)?
                .sort(vec![
                    col("cnt").sort(false, false),
                    col(col_name).sort(true, false),
                ])
                .map_err(TabPrepError::from)?
                .limit(0, Some(1))
                .map_err(TabPrepError::from)?;
            let batches = grouped.collect().await.map_err(TabPrepError::from)?;
            let mut mode_val = None;
            if let Some(batch) = batches.first() {
                if batch.num_rows() > 0 {
                    let array = batch.column(0);
                    let scalar =
                        ScalarValue::try_from_array(array, 0).map_err(TabPrepError::from)?;
                    if let ScalarValue::Float64(Some(val)) = scalar {
                        mode_val = Some(val);
                    }
                }
            }
            match mode_val {
                Some(val) => {
                    impute_values.insert(col_name.clone(), val);
                }
                None => {
                    return Err(TabPrepError::InvalidParameter(format!(
                        "Cannot compute mode for column '{}' without non-null values",
                        col_name
                    )));
                }
            }
        }
        self.impute_values = Some(impute_values);
        Ok(())
    }

    /// Returns a new DataFrame where, for each target column, missing values are replaced
    /// with the learned mode. Fails if `fit` has not been called or if a target column has
    /// no learned value.
    pub fn transform(&self, df: DataFrame) -> TabPrepResult<DataFrame> {
        let impute_values = self
            .impute_values
            .as_ref()
            .ok_or(TabPrepError::FitNotCalled)?;
        validate_columns(&df, &self.columns)?;
        for col_name in &self.columns {
            if !impute_values.contains_key(col_name) {
                return Err(TabPrepError::InvalidParameter(format!(
                    "No imputation value learned for column '{}'",
                    col_name
                )));
            }
        }
        apply_imputation(df, &self.columns, |name| {
            impute_values.get(name).map(|&v| lit(v))
        })
    }

    fn inherent_is_stateful(&self) -> bool {
        true
    }
}

impl_transformer!(MissingIndicator);
impl_transformer!(CategoricalImputer);
impl_transformer!(NumericalImputer);
