//! Application layer for the Audio Session context.

pub mod command_handlers;
