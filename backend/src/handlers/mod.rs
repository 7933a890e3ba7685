//! HTTP handlers for the Crop Advisory Platform

pub mod analysis;
pub mod chatbot;
pub mod databases;
pub mod health;
pub mod weather;

pub use analysis::analyze_plant;
pub use chatbot::chatbot;
pub use databases::database_status;
pub use health::health_check;
pub use weather::weather_advisory;
