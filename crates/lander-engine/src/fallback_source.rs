//! Fallback payload source
//!
//! Loaded once during initialization and read-only afterwards. The aggregator
//! only sees the [`FallbackProvider`] trait, so tests can substitute their own
//! payload.

#![allow(clippy::result_large_err)]

use lander_core::errors::Result;
use lander_core::model::LandingConfigResponse;
use lander_core::observability::Observer;
use lander_core::FallbackPayload;
use lander_core_types::schema::{EVENT_FALLBACK_FILE_REJECTED, FIELD_ERROR};
use std::path::Path;

pub trait FallbackProvider: Send + Sync {
    /// A fresh deep copy flagged `fallback = true`
    fn payload(&self) -> LandingConfigResponse;
}

/// Immutable fallback payload
#[derive(Debug, Clone)]
pub struct StaticFallback {
    payload: FallbackPayload,
}

impl StaticFallback {
    pub fn new(payload: FallbackPayload) -> Self {
        Self { payload }
    }

    /// Use the compiled-in document
    ///
    /// # Errors
    /// `Internal` if the embedded document does not parse.
    pub fn compiled_default() -> Result<Self> {
        FallbackPayload::compiled_default().map(Self::new)
    }

    /// Load from `path`, dropping to the compiled-in document on any failure
    ///
    /// A missing or invalid file is reported through `observer` and is not an
    /// error. Only a broken compiled-in document fails.
    ///
    /// # Errors
    /// `Internal` if the compiled-in document does not parse.
    pub fn load(path: Option<&Path>, observer: &dyn Observer) -> Result<Self> {
        let Some(path) = path else {
            return Self::compiled_default();
        };

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| FallbackPayload::parse(&raw).map_err(|e| e.to_string()));

        match parsed {
            Ok(payload) => {
                tracing::debug!(path = %path.display(), slug = payload.slug(), "fallback payload loaded");
                Ok(Self::new(payload))
            }
            Err(error) => {
                observer.event(
                    EVENT_FALLBACK_FILE_REJECTED,
                    &[("path", path.display().to_string()), (FIELD_ERROR, error)],
                );
                Self::compiled_default()
            }
        }
    }

    pub fn slug(&self) -> &str {
        self.payload.slug()
    }
}

impl FallbackProvider for StaticFallback {
    fn payload(&self) -> LandingConfigResponse {
        self.payload.to_response()
    }
}
