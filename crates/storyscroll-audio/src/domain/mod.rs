//! Domain layer for the Audio Session context.

pub mod events;
pub mod persisted;
pub mod session;
