//! Storyscroll: Audio Session bounded context.
//!
//! Responsible for the ambient soundtrack's play/pause intent, its persisted
//! resume position, and recovering from autoplay rejection on the next user
//! interaction.

pub mod application;
pub mod domain;
