//! Application layer for the Narrative Progression context.

pub mod query_handlers;
pub mod tick_handlers;
