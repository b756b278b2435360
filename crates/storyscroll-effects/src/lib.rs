//! Storyscroll: Celebration Effects bounded context.
//!
//! Responsible for edge-triggered dispatch of celebratory effects and the
//! emission profile each variant renders with.

pub mod application;
pub mod domain;
