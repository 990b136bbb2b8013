//! # Transformer Implementations
//!
//! The submodules contain the transformer implementations for different preprocessing tasks.

pub mod categorical_encoding;
pub mod imputation;
pub mod string_features;
