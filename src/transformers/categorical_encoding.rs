//! ## Transformers for encoding categorical features
//!
//! This module provides transformers for turning categorical columns into
//! model-ready representations.
//!
//! Currently, the following transformers are implemented:
//!
//! - **RareLabelCategoricalEncoder**: Groups infrequent labels into a single `"Rare"` label
//!   based on a frequency tolerance learned during `fit`.
//! - **CategoricalEncoder**: One-hot encodes categorical columns into binary `<feature>_<level>`
//!   columns, dropping the first level per feature.
//!
//! Each transformer returns a new DataFrame with the applied strategy; the input DataFrame is never
//! mutated. Errors are returned as `TabPrepError` and results are wrapped in `TabPrepResult`.

use crate::exceptions::{TabPrepError, TabPrepResult};
use crate::impl_transformer;
use crate::transformers::imputation::validate_columns;
use datafusion::arrow::array::{Array, Int64Array, StringArray};
use datafusion::functions_aggregate::expr_fn::count;
use datafusion::logical_expr::{col, lit, Case as DFCase, Expr};
use datafusion::prelude::*;
use std::collections::HashMap;
use tracing::warn;

/// Collects the distinct non-null string values of a column by executing a
/// DISTINCT projection on the DataFrame.
async fn extract_distinct_values(df: &DataFrame, col_name: &str) -> TabPrepResult<Vec<String>> {
    let distinct = df
        .clone()
        .select(vec![col(col_name)])
        .map_err(TabPrepError::from)?
        .distinct()
        .map_err(TabPrepError::from)?;
    let batches = distinct.collect().await.map_err(TabPrepError::from)?;
    let mut values = Vec::new();
    for batch in batches {
        let array = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| {
                TabPrepError::InvalidParameter(format!(
                    "Column '{}' must be Utf8 for categorical encoding",
                    col_name
                ))
            })?;
        for i in 0..array.len() {
            if !array.is_null(i) {
                values.push(array.value(i).to_string());
            }
        }
    }
    Ok(values)
}

/// Groups infrequent labels of categorical columns into a single `"Rare"` label.
///
/// During `fit`, the labels whose relative frequency exceeds the tolerance are
/// recorded per column. During `transform`, every value outside that frequent
/// set, including nulls, is replaced with `"Rare"`.
pub struct RareLabelCategoricalEncoder {
    pub columns: Vec<String>,
    /// Minimum relative frequency a label must exceed to be kept as-is.
    pub tol: f64,
    /// Mapping from column name to its frequent labels. `None` until `fit` is called.
    pub frequent_labels: Option<HashMap<String, Vec<String>>>,
}

impl RareLabelCategoricalEncoder {
    /// Create a new rare-label encoder with the default tolerance of 0.05.
    pub fn new(columns: Vec<String>) -> Self {
        Self::with_tolerance(columns, 0.05)
    }

    /// Create a new rare-label encoder with an explicit tolerance.
    pub fn with_tolerance(columns: Vec<String>, tol: f64) -> Self {
        Self {
            columns,
            tol,
            frequent_labels: None,
        }
    }

    /// Learns the frequent labels per target column.
    ///
    /// A label is frequent when its count divided by the total row count (nulls included)
    /// strictly exceeds the tolerance. The learned labels are sorted so the fitted state
    /// is deterministic regardless of partitioning.
    pub async fn fit(&mut self, df: &DataFrame) -> TabPrepResult<()> {
        validate_columns(df, &self.columns)?;
        if !(0.0..=1.0).contains(&self.tol) {
            return Err(TabPrepError::InvalidParameter(format!(
                "Tolerance must be between 0 and 1, got {}",
                self.tol
            )));
        }
        let total_rows = df.clone().count().await.map_err(TabPrepError::from)?;
        if total_rows == 0 {
            return Err(TabPrepError::InvalidParameter(
                "Cannot learn frequent labels from an empty DataFrame".to_string(),
            ));
        }
        let mut frequent_labels = HashMap::new();
        for col_name in &self.columns {
            let grouped = df
                .clone()
                .filter(col(col_name).is_not_null())
                .map_err(TabPrepError::from)?
                .aggregate(vec![col(col_name)], vec![count(col(col_name)).alias("cnt")])
                .map_err(TabPrepError::from)?;
            let batches = grouped.collect().await.map_err(TabPrepError::from)?;
            let mut labels = Vec::new();
            for batch in batches {
                let label_array = batch
                    .column(0)
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .ok_or_else(|| {
                        TabPrepError::InvalidParameter(format!(
                            "Column '{}' must be Utf8 for categorical encoding",
                            col_name
                        ))
                    })?;
                let count_array = batch
                    .column(1)
                    .as_any()
                    .downcast_ref::<Int64Array>()
                    .ok_or_else(|| {
                        TabPrepError::InvalidParameter(format!(
                            "Unexpected count type for column '{}'",
                            col_name
                        ))
                    })?;
                for i in 0..label_array.len() {
                    if label_array.is_null(i) {
                        continue;
                    }
                    let frequency = count_array.value(i) as f64 / total_rows as f64;
                    if frequency > self.tol {
                        labels.push(label_array.value(i).to_string());
                    }
                }
            }
            labels.sort();
            frequent_labels.insert(col_name.clone(), labels);
        }
        self.frequent_labels = Some(frequent_labels);
        Ok(())
    }

    /// Returns a new DataFrame where, for each target column, values outside the learned
    /// frequent set are replaced with `"Rare"`. Nulls are also mapped to `"Rare"`.
    /// Fails if `fit` has not been called.
    pub fn transform(&self, df: DataFrame) -> TabPrepResult<DataFrame> {
        let frequent_labels = self
            .frequent_labels
            .as_ref()
            .ok_or(TabPrepError::FitNotCalled)?;
        validate_columns(&df, &self.columns)?;
        let mut exprs = Vec::new();
        for field in df.schema().fields() {
            let name = field.name();
            if self.columns.contains(name) {
                let labels = frequent_labels.get(name).ok_or_else(|| {
                    TabPrepError::InvalidParameter(format!(
                        "No frequent labels learned for column '{}'",
                        name
                    ))
                })?;
                if labels.is_empty() {
                    exprs.push(lit("Rare").alias(name));
                } else {
                    let when_then_expr = labels
                        .iter()
                        .map(|label| {
                            (
                                Box::new(col(name).eq(lit(label.clone()))),
                                Box::new(col(name)),
                            )
                        })
                        .collect();
                    exprs.push(
                        Expr::Case(DFCase {
                            expr: None,
                            when_then_expr,
                            else_expr: Some(Box::new(lit("Rare"))),
                        })
                        .alias(name),
                    );
                }
            } else {
                exprs.push(col(name));
            }
        }
        df.select(exprs).map_err(TabPrepError::from)
    }

    fn inherent_is_stateful(&self) -> bool {
        true
    }
}

/// One-hot encodes categorical columns into binary `<feature>_<level>` columns.
///
/// The first level of each feature (in sorted order) is dropped to avoid a
/// redundant column. During `transform`, the dummy columns are derived from the
/// incoming data; dummy columns learned during `fit` but absent from the incoming
/// data are backfilled with zeros, and dummy columns produced for levels unseen
/// during `fit` are kept with a warning.
pub struct CategoricalEncoder {
    pub columns: Vec<String>,
    /// Ordered dummy column names learned during `fit`. `None` until `fit` is called.
    pub dummies: Option<Vec<String>>,
}

impl CategoricalEncoder {
    /// Create a new one-hot encoder for the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            dummies: None,
        }
    }

    /// Learns the dummy column vocabulary from the distinct levels of each target column.
    /// Levels are sorted per column and the first level is dropped.
    pub async fn fit(&mut self, df: &DataFrame) -> TabPrepResult<()> {
        validate_columns(df, &self.columns)?;
        let mut dummies = Vec::new();
        for col_name in &self.columns {
            let mut levels = extract_distinct_values(df, col_name).await?;
            levels.sort();
            for level in levels.into_iter().skip(1) {
                dummies.push(format!("{}_{}", col_name, level));
            }
        }
        self.dummies = Some(dummies);
        Ok(())
    }

    /// Returns a new DataFrame where each target column is replaced by binary dummy columns
    /// derived from the incoming data, aligned with the vocabulary learned during `fit`.
    /// Fails if `fit` has not been called.
    ///
    /// Deriving the dummy columns requires knowing the distinct levels of the incoming
    /// data, so this transformer executes a DISTINCT query per target column instead of
    /// only extending the logical plan.
    pub fn transform(&self, df: DataFrame) -> TabPrepResult<DataFrame> {
        let learned = self.dummies.as_ref().ok_or(TabPrepError::FitNotCalled)?;
        validate_columns(&df, &self.columns)?;
        let mut exprs = Vec::new();
        let mut produced = Vec::new();
        for field in df.schema().fields() {
            let name = field.name().clone();
            if !self.columns.contains(&name) {
                exprs.push(col(&name));
                continue;
            }
            let mut levels = futures::executor::block_on(extract_distinct_values(&df, &name))?;
            levels.sort();
            for level in levels.into_iter().skip(1) {
                let dummy_name = format!("{}_{}", name, level);
                exprs.push(
                    Expr::Case(DFCase {
                        expr: None,
                        when_then_expr: vec![(
                            Box::new(col(&name).eq(lit(level))),
                            Box::new(lit(1_i32)),
                        )],
                        else_expr: Some(Box::new(lit(0_i32))),
                    })
                    .alias(&dummy_name),
                );
                produced.push(dummy_name);
            }
        }
        for dummy_name in learned {
            if !produced.contains(dummy_name) {
                exprs.push(lit(0_i32).alias(dummy_name));
            }
        }
        for dummy_name in &produced {
            if !learned.contains(dummy_name) {
                warn!(
                    "Dummy column '{}' was not seen during fit and is kept as-is",
                    dummy_name
                );
            }
        }
        df.select(exprs).map_err(TabPrepError::from)
    }

    fn inherent_is_stateful(&self) -> bool {
        true
    }
}

impl_transformer!(RareLabelCategoricalEncoder);
impl_transformer!(CategoricalEncoder);
