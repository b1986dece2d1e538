// stockroom/src/models/mod.rs

//! Data structures representing database entities and their inputs.

pub mod product;

pub use product::{Product, ProductInput, SequenceStatus};
