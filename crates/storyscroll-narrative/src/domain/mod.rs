//! Domain layer for the Narrative Progression context.

pub mod aggregates;
pub mod catalog;
pub mod completion;
pub mod events;
pub mod gate;
pub mod goals;
pub mod progression;
