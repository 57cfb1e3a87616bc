//! Domain layer: entities and tree structure
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;

pub use arena::{ProcessTree, TreeIterator, TreeNode};
pub use entities::*;
pub use error::DomainError;
