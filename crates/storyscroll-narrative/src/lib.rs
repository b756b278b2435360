//! Storyscroll: Narrative Progression bounded context.
//!
//! Responsible for the ordered section catalog, section completion, mapping
//! scroll progress to the avatar's journey, and holding the reader at the
//! first unmet interactive section.

pub mod application;
pub mod domain;
