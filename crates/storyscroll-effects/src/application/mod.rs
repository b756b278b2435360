//! Application layer for the Celebration Effects context.

pub mod renderer;
