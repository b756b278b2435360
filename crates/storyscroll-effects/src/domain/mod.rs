//! Domain layer for the Celebration Effects context.

pub mod dispatcher;
pub mod edge;
pub mod events;
pub mod profiles;
