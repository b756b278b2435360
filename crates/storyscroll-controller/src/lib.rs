//! Storyscroll: progression controller composition root.
//!
//! Wires the Narrative Progression, Celebration Effects and Audio Session
//! contexts to a host: listener registration and teardown, the event
//! journal, configuration loading and tracing setup.

pub mod config;
pub mod controller;
pub mod error;
pub mod journal;
pub mod telemetry;

pub use config::StoryConfig;
pub use controller::{Frame, Lifecycle, ScrollDirective, ScrollUpdate, StoryController};
pub use error::ConfigError;
pub use journal::StoryEvent;
