//! Domain layer: the material tree, its reducer and its JSON contract
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod collection;
pub mod entities;
pub mod error;
pub mod serializer;
pub mod tree;

pub use collection::Direction;
pub use entities::*;
pub use error::DomainError;
pub use tree::{Edit, Fresh, Operation};
