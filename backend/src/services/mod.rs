//! Business logic services for the Crop Advisory Platform

pub mod advisory;
pub mod lookup;

pub use advisory::AdvisoryService;
pub use lookup::{PgReferenceSource, ReferenceSource};
