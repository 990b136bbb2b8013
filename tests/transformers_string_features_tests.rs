use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use datafusion::datasource::memory::MemTable;
use datafusion::prelude::*;

use tabprep::exceptions::{TabPrepError, TabPrepResult};
use tabprep::transformers::string_features::ExtractFirstLetter;

/// Creates an in-memory DataFrame with two columns:
///   - "cabin": Utf8 with a null and an empty string.
///   - "fare": Float64, untouched by the transformer.
async fn create_dataframe() -> DataFrame {
    let schema = Arc::new(Schema::new(vec![
        Field::new("cabin", DataType::Utf8, true),
        Field::new("fare", DataType::Float64, true),
    ]));

    let cabin_array: ArrayRef = Arc::new(StringArray::from(vec![
        Some("C85"),
        None,
        Some("E46"),
        Some(""),
    ]));
    let fare_array: ArrayRef = Arc::new(Float64Array::from(vec![
        Some(71.28),
        Some(8.05),
        Some(53.1),
        Some(8.46),
    ]));

    let batch = RecordBatch::try_new(schema.clone(), vec![cabin_array, fare_array]).unwrap();

    let mem_table = MemTable::try_new(schema, vec![vec![batch]]).unwrap();
    let ctx = SessionContext::new();
    ctx.register_table("t", Arc::new(mem_table)).unwrap();
    ctx.table("t").await.unwrap()
}

#[tokio::test]
async fn test_extract_first_letter() -> TabPrepResult<()> {
    let df = create_dataframe().await;

    let mut extractor = ExtractFirstLetter::new(vec!["cabin".to_string()]);
    extractor.fit(&df).await?;
    let transformed = extractor.transform(df)?;
    let batches = transformed.collect().await.map_err(TabPrepError::from)?;
    let batch = batches.first().expect("Expected at least one batch");

    let cabin_array = batch
        .column(batch.schema().index_of("cabin").unwrap())
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("Expected StringArray");

    // Nulls stay null and the empty string becomes null as well.
    let expected = [Some("C"), None, Some("E"), None];
    for (i, exp) in expected.iter().enumerate() {
        let value = if cabin_array.is_null(i) {
            None
        } else {
            Some(cabin_array.value(i))
        };
        assert_eq!(value, *exp, "row {}: expected {:?}, got {:?}", i, exp, value);
    }
    Ok(())
}

#[tokio::test]
async fn test_non_target_columns_pass_through() -> TabPrepResult<()> {
    let df = create_dataframe().await;

    let extractor = ExtractFirstLetter::new(vec!["cabin".to_string()]);
    let transformed = extractor.transform(df)?;
    let batches = transformed.collect().await?;
    let batch = batches.first().expect("Expected at least one batch");

    let fare_array = batch
        .column(batch.schema().index_of("fare").unwrap())
        .as_any()
        .downcast_ref::<Float64Array>()
        .expect("Expected Float64Array");

    let expected = [71.28, 8.05, 53.1, 8.46];
    for (i, exp) in expected.iter().enumerate() {
        assert!(
            (fare_array.value(i) - exp).abs() < 1e-6,
            "row {}: expected {}, got {}",
            i,
            exp,
            fare_array.value(i)
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_rejects_unknown_column() {
    let df = create_dataframe().await;
    let mut extractor = ExtractFirstLetter::new(vec!["deck".to_string()]);
    let err = extractor.fit(&df).await.unwrap_err();
    assert!(matches!(err, TabPrepError::MissingColumn(_)));
}

#[tokio::test]
async fn test_rejects_non_utf8_column() {
    let df = create_dataframe().await;
    let mut extractor = ExtractFirstLetter::new(vec!["fare".to_string()]);
    let err = extractor.fit(&df).await.unwrap_err();
    assert!(matches!(err, TabPrepError::InvalidParameter(_)));
}
