//! Storyscroll Core: shared abstractions.
//!
//! This crate defines the traits and small state types that every
//! progression context depends on: time, randomness, key-value persistence,
//! viewport geometry, host listeners, audio playback, observable values and
//! one-way latches.
//! It contains no host integration code.

pub mod audio;
pub mod clock;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod latch;
pub mod observable;
pub mod rng;
pub mod storage;
