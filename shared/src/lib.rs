//! Shared types and models for the Crop Advisory Platform
//!
//! This crate contains the weather-driven disease-risk engine and the
//! identification parser. It performs no I/O and is used by the backend
//! server and by the browser frontend (via WASM).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
