//! Test utilities

pub mod testing;
