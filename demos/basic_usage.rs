// Run `cargo run --example basic_usage` to execute this example

use std::error::Error;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use datafusion::datasource::memory::MemTable;
use datafusion::prelude::*;

use tabprep::make_pipeline;
use tabprep::transformers::categorical_encoding::{
    CategoricalEncoder, RareLabelCategoricalEncoder,
};
use tabprep::transformers::imputation::{
    CategoricalImputer, MissingIndicator, NumericalImputer,
};
use tabprep::transformers::string_features::ExtractFirstLetter;

/// Builds a small in-memory passenger dataset with missing values.
async fn load_data() -> Result<DataFrame, Box<dyn Error>> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("age", DataType::Float64, true),
        Field::new("cabin", DataType::Utf8, true),
        Field::new("embarked", DataType::Utf8, true),
    ]));

    let age: ArrayRef = Arc::new(Float64Array::from(vec![
        Some(22.0),
        Some(38.0),
        None,
        Some(35.0),
        Some(22.0),
        None,
        Some(54.0),
        Some(2.0),
    ]));
    let cabin: ArrayRef = Arc::new(StringArray::from(vec![
        None,
        Some("C85"),
        None,
        Some("C123"),
        None,
        None,
        Some("E46"),
        None,
    ]));
    let embarked: ArrayRef = Arc::new(StringArray::from(vec![
        Some("S"),
        Some("C"),
        Some("S"),
        Some("S"),
        Some("S"),
        Some("Q"),
        Some("S"),
        Some("S"),
    ]));

    let batch = RecordBatch::try_new(schema.clone(), vec![age, cabin, embarked])?;
    let mem_table = MemTable::try_new(schema, vec![vec![batch]])?;
    let ctx = SessionContext::new();
    ctx.register_table("passengers", Arc::new(mem_table))?;
    Ok(ctx.table("passengers").await?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let input_df = load_data().await?;

    // Show the raw data first
    input_df.clone().show().await?;

    // Chain the preprocessing steps into a single pipeline
    let mut pipeline = make_pipeline!(
        true,
        ("extract_cabin", ExtractFirstLetter::new(vec!["cabin".to_string()])),
        ("impute_cabin", CategoricalImputer::new(vec!["cabin".to_string()])),
        ("flag_age", MissingIndicator::new(vec!["age".to_string()])),
        ("impute_age", NumericalImputer::new(vec!["age".to_string()])),
        (
            "group_rare_cabins",
            RareLabelCategoricalEncoder::with_tolerance(vec!["cabin".to_string()], 0.1)
        ),
        (
            "encode_embarked",
            CategoricalEncoder::new(vec!["embarked".to_string()])
        ),
    );

    let output_df = pipeline.fit_transform(&input_df).await?;
    output_df.show().await?;

    Ok(())
}
