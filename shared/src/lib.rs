//! Shared types and models for the spraying advisory platform
//!
//! This crate contains the domain types and the spraying rule evaluator
//! shared between the backend, the browser (via WASM), and tests.

pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
