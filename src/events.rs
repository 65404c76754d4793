// Outbound events raised by presets and monitors

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// Names of the events the robot can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    Closing,
    Score,
    Taking,
}

impl EventName {
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::Closing => "Closing",
            EventName::Score => "Score",
            EventName::Taking => "Taking",
        }
    }
}

/// Event with a JSON object payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: EventName,
    pub payload: Map<String, Value>,
}

impl Event {
    pub fn new(name: EventName) -> Self {
        Self {
            name,
            payload: Map::new(),
        }
    }

    /// An obstacle is within range while scoring
    pub fn closing(distance: f32) -> Self {
        let mut event = Self::new(EventName::Closing);
        event.payload.insert("distance".into(), json!(distance));
        event
    }

    pub fn score() -> Self {
        Self::new(EventName::Score)
    }

    pub fn taking() -> Self {
        Self::new(EventName::Taking)
    }
}

/// Somewhere to deliver events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

impl EventSink for UnboundedSender<Event> {
    fn emit(&self, event: Event) {
        if let Err(e) = self.send(event) {
            warn!("Dropping {:?} event, no receiver", e.0.name);
        }
    }
}
