use crate::error::{IngestError, Result};

pub const DEFAULT_EVENTS_CONFIG: &str = "config/events.toml";

/// One event to collect, as configured by the operator. The configured id and
/// name override whatever the match pages report, so every row of an event
/// carries the same tag.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EventEntry {
    pub event_id: String,
    pub event_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EventsConfig {
    #[serde(default)]
    pub events: Vec<EventEntry>,
}

pub fn load_events(path: &std::path::Path) -> Result<Vec<EventEntry>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| IngestError::Config(format!("reading {}: {}", path.display(), e)))?;

    let config: EventsConfig = toml::from_str(&content)
        .map_err(|e| IngestError::Config(format!("parsing {}: {}", path.display(), e)))?;

    Ok(config.events)
}
