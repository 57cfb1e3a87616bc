//! Application services

pub mod builder;
pub mod printer;

pub use builder::{BuiltTree, TreeBuilder};
pub use printer::{print_tree, TreePrinter};
