//! Core types shared across Lander facilities
//!
//! This crate provides foundational types used by the error, logging and
//! observability facilities:
//!
//! - **Correlation types**: RequestId
//! - **Schema constants**: Canonical field keys, event names and fallback reason codes

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
