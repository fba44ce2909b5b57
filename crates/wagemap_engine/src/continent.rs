use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContinentError {
    #[error("unknown country: {0}")]
    UnknownCountry(String),
}

/// Maps a country name to its continent/region string.
///
/// Kept behind a trait so the pipeline can run against a fake in tests.
pub trait ContinentResolver: Send + Sync {
    fn resolve(&self, country: &str) -> Result<String, ContinentError>;
}

/// Offline country → region dataset, keyed case-insensitively by the
/// English short name the salary site uses.
pub struct EmbeddedContinentDb {
    regions: HashMap<String, String>,
}

const CONTINENT_DATA: &str = include_str!("../data/continents.json");

impl EmbeddedContinentDb {
    pub fn new() -> Self {
        let raw: HashMap<String, String> =
            serde_json::from_str(CONTINENT_DATA).expect("embedded continent dataset");
        let regions = raw
            .into_iter()
            .map(|(name, region)| (name.to_ascii_lowercase(), region))
            .collect();
        Self { regions }
    }
}

impl Default for EmbeddedContinentDb {
    fn default() -> Self {
        Self::new()
    }
}

impl ContinentResolver for EmbeddedContinentDb {
    fn resolve(&self, country: &str) -> Result<String, ContinentError> {
        self.regions
            .get(&country.trim().to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| ContinentError::UnknownCountry(country.to_string()))
    }
}
