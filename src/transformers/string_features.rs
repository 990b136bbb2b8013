//! ## Transformers for deriving features from string columns
//!
//! This module provides transformers that derive new features from textual columns.
//!
//! Currently, the following transformers are implemented:
//!
//! - **ExtractFirstLetter**: Replaces each target string column with its first character.
//!
//! Each transformer returns a new DataFrame with the applied strategy; the input DataFrame is never
//! mutated. Errors are returned as `TabPrepError` and results are wrapped in `TabPrepResult`.

use crate::exceptions::{TabPrepError, TabPrepResult};
use crate::impl_transformer;
use crate::transformers::imputation::validate_columns;
use datafusion::logical_expr::{col, lit, Case as DFCase, Expr};
use datafusion::prelude::*;
use datafusion::scalar::ScalarValue;

/// Replaces each target string column with its first character.
///
/// Null values stay null, and empty strings are mapped to null as well, so a
/// downstream imputation step can treat both cases uniformly.
pub struct ExtractFirstLetter {
    pub columns: Vec<String>,
}

impl ExtractFirstLetter {
    /// Create a new first-letter extractor for the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// This transformer is stateless, so fit only validates that the target columns exist
    /// and are of type Utf8.
    pub async fn fit(&mut self, df: &DataFrame) -> TabPrepResult<()> {
        self.validate(df)
    }

    fn validate(&self, df: &DataFrame) -> TabPrepResult<()> {
        validate_columns(df, &self.columns)?;
        let schema = df.schema();
        for col_name in &self.columns {
            let field = schema.field_with_name(None, col_name).map_err(|_| {
                TabPrepError::MissingColumn(format!(
                    "Column '{}' not found in DataFrame",
                    col_name
                ))
            })?;
            if field.data_type() != &datafusion::arrow::datatypes::DataType::Utf8 {
                return Err(TabPrepError::InvalidParameter(format!(
                    "ExtractFirstLetter requires column '{}' to be Utf8",
                    col_name
                )));
            }
        }
        Ok(())
    }

    /// Returns a new DataFrame where each target column holds the first character of its
    /// original value. Non-target columns pass through unchanged.
    pub fn transform(&self, df: DataFrame) -> TabPrepResult<DataFrame> {
        self.validate(&df)?;
        let exprs: Vec<Expr> = df
            .schema()
            .fields()
            .iter()
            .map(|field| {
                let name = field.name();
                if self.columns.contains(name) {
                    first_letter_expr(name).alias(name)
                } else {
                    col(name)
                }
            })
            .collect();
        df.select(exprs).map_err(TabPrepError::from)
    }

    fn inherent_is_stateful(&self) -> bool {
        false
    }
}

/// Builds an expression that yields the first character of `name`, with empty strings
/// mapped to null. Nulls propagate through `substr` and remain null.
fn first_letter_expr(name: &str) -> Expr {
    let substr = datafusion_functions::unicode::substr()
        .call(vec![col(name), lit(1_i64), lit(1_i64)]);
    let length = datafusion_functions::unicode::character_length().call(vec![col(name)]);
    Expr::Case(DFCase {
        expr: None,
        when_then_expr: vec![(
            Box::new(length.eq(lit(0_i32))),
            Box::new(lit(ScalarValue::Utf8(None))),
        )],
        else_expr: Some(Box::new(substr)),
    })
}

impl_transformer!(ExtractFirstLetter);
