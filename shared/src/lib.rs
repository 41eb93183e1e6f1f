//! Shared types and logic for the Wheat Receiving Tracker
//!
//! This crate holds the domain model and the pure computations (normalization,
//! metrics, timeline construction, aggregated views) used by the backend
//! server and the WASM calculators.

pub mod aggregation;
pub mod error;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod timeline;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
