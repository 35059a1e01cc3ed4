//! Observability collaborator
//!
//! Decision points in the aggregator and the engine commands report through an
//! injected [`Observer`] instead of free logging calls, so tests can assert on
//! exactly which degradations happened.

use parking_lot::Mutex;
use std::collections::BTreeMap;

use lander_core_types::schema::{
    EVENT_SYNC_APPLIED, FIELD_ERROR, FIELD_REASON, FIELD_REQUEST_ID, FIELD_VARIANT_ID,
    FIELD_VARIANT_SLUG,
};

/// Keys emitted as their own tracing fields; anything else goes into `fields`
const STRUCTURED_KEYS: [&str; 5] = [
    FIELD_REASON,
    FIELD_VARIANT_SLUG,
    FIELD_ERROR,
    FIELD_REQUEST_ID,
    FIELD_VARIANT_ID,
];

/// Receives named events with flat string fields
pub trait Observer: Send + Sync {
    fn event(&self, name: &str, fields: &[(&str, String)]);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn event(&self, name: &str, fields: &[(&str, String)]) {
        let lookup = |key: &str| {
            fields
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };
        let reason = lookup(FIELD_REASON);
        let slug = lookup(FIELD_VARIANT_SLUG);
        let error = lookup(FIELD_ERROR);
        let request_id = lookup(FIELD_REQUEST_ID);
        let variant_id = lookup(FIELD_VARIANT_ID);

        let extras = fields
            .iter()
            .filter(|(k, _)| !STRUCTURED_KEYS.contains(k))
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        let extras = (!extras.is_empty()).then_some(extras);

        if name == EVENT_SYNC_APPLIED {
            tracing::info!(
                target: "lander::observer",
                event = name,
                request_id,
                fields = extras.as_deref(),
            );
        } else {
            tracing::warn!(
                target: "lander::observer",
                event = name,
                reason,
                slug,
                error,
                request_id,
                variant_id,
                fields = extras.as_deref(),
            );
        }
    }
}

/// An event captured by [`RecordingObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedEvent {
    pub name: String,
    pub fields: BTreeMap<String, String>,
}

impl ObservedEvent {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().clone()
    }

    pub fn events_named(&self, name: &str) -> Vec<ObservedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Observer for RecordingObserver {
    fn event(&self, name: &str, fields: &[(&str, String)]) {
        self.events.lock().push(ObservedEvent {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
    }
}
