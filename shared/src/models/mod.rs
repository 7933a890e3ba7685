//! Domain models for the Crop Advisory Platform

mod advisory;
mod disease;
mod identification;
mod risk;
mod weather;

pub use advisory::*;
pub use disease::*;
pub use identification::*;
pub use risk::*;
pub use weather::*;
