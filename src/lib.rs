//! ptree: print the process tree rooted at a pid
//!
//! # Architecture
//!
//! - `domain`: process nodes, the arena tree, degradation records
//! - `application`: tree builder and printer services
//! - `infrastructure`: procfs source and dependency wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
