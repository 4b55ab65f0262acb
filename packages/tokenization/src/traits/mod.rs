//! Core trait abstractions.

pub mod store;
