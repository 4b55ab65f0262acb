//! Data types for the tokenization library.

pub mod category;
pub mod mapping;
