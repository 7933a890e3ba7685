//! External API integrations

pub mod identifier;
pub mod weather;

pub use identifier::{GeminiClient, Identifier};
pub use weather::{WeatherClient, WeatherSource};
