//! Editor for Topic → SubTopic → Scene learning material.
//!
//! The core is [`domain::Material::apply`], a pure reducer over the three-level
//! tree, plus [`domain::serializer`] for the external JSON shape.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
