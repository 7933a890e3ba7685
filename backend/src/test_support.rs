//! State builders for handler and service tests

use std::{sync::Arc, time::Duration};

use shared::RuleTable;

use crate::config::AdvisoryConfig;
use crate::services::advisory::fakes::{FixtureWeather, ScriptedIdentifier};
use crate::services::lookup::memory::MemoryReferenceSource;
use crate::AppState;

/// Application state backed by in-memory collaborators
pub fn state_with(
    identifier: ScriptedIdentifier,
    weather: FixtureWeather,
    plant_source: MemoryReferenceSource,
    solution_source: MemoryReferenceSource,
) -> AppState {
    AppState {
        rules: Arc::new(RuleTable::standard()),
        identifier: Arc::new(identifier),
        weather: Arc::new(weather),
        plant_source: Arc::new(plant_source),
        solution_source: Arc::new(solution_source),
        defaults: Arc::new(AdvisoryConfig {
            default_location: "Bangalore".to_string(),
            default_crop: "Unknown".to_string(),
        }),
        query_timeout: Duration::from_secs(2),
    }
}
