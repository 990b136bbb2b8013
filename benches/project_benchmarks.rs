use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use criterion::{criterion_group, criterion_main, Criterion};
use datafusion::datasource::memory::MemTable;
use datafusion::prelude::*;
use tokio::runtime::Runtime;

use tabprep::make_pipeline;
use tabprep::transformers::imputation::{CategoricalImputer, NumericalImputer};
use tabprep::transformers::string_features::ExtractFirstLetter;

const ROWS: usize = 10_000;

async fn create_dataframe() -> DataFrame {
    let schema = Arc::new(Schema::new(vec![
        Field::new("age", DataType::Float64, true),
        Field::new("cabin", DataType::Utf8, true),
    ]));

    let age: ArrayRef = Arc::new(Float64Array::from(
        (0..ROWS)
            .map(|i| {
                if i % 7 == 0 {
                    None
                } else {
                    Some((i % 80) as f64)
                }
            })
            .collect::<Vec<_>>(),
    ));
    let cabin: ArrayRef = Arc::new(StringArray::from(
        (0..ROWS)
            .map(|i| {
                if i % 3 == 0 {
                    None
                } else {
                    Some(format!("C{}", i % 50))
                }
            })
            .collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(schema.clone(), vec![age, cabin]).unwrap();
    let mem_table = MemTable::try_new(schema, vec![vec![batch]]).unwrap();
    let ctx = SessionContext::new();
    ctx.register_table("passengers", Arc::new(mem_table)).unwrap();
    ctx.table("passengers").await.unwrap()
}

fn bench_pipeline_fit_transform(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let df = rt.block_on(create_dataframe());

    c.bench_function("pipeline_fit_transform_10k_rows", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut pipeline = make_pipeline!(
                    false,
                    ("extract_cabin", ExtractFirstLetter::new(vec!["cabin".to_string()])),
                    ("impute_cabin", CategoricalImputer::new(vec!["cabin".to_string()])),
                    ("impute_age", NumericalImputer::new(vec!["age".to_string()])),
                );
                let transformed = pipeline.fit_transform(&df).await.unwrap();
                transformed.collect().await.unwrap()
            })
        })
    });
}

criterion_group!(benches, bench_pipeline_fit_transform);
criterion_main!(benches);
