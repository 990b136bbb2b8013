//! # Tabprep
//!
//! Tabprep is a small library of composable fit/transform preprocessing steps for
//! tabular data, built on top of Apache DataFusion DataFrames.
//!
//! Every transformer follows the same two-phase lifecycle: an asynchronous `fit`
//! that learns per-feature parameters from a reference DataFrame, and a lazy
//! `transform` that applies the learned parameters to any DataFrame without
//! mutating it. Transformers are chained into a [`pipeline::Pipeline`] that fits
//! and applies the steps in a fixed order, so the same sequence can be run on
//! training data and on later inference data.
//!
//! ## Modules
//!
//! - [`exceptions`]: custom error types and the [`exceptions::TabPrepResult`] alias.
//! - [`logging`]: environment-gated logging setup (see `DEBUG_TABPREP`).
//! - [`pipeline`]: the [`pipeline::Transformer`] trait, the [`pipeline::Pipeline`]
//!   struct, and the [`impl_transformer`] and [`make_pipeline`] macros.
//! - [`transformers`]: the transformer implementations, grouped by task
//!   (imputation, string features, categorical encoding).

pub mod exceptions;
pub mod logging;
pub mod pipeline;
pub mod transformers;
