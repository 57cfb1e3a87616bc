//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination, also for trees built with losses
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Tree was built with losses and `--strict` was given
pub const DATAERR: i32 = 65;

/// Seed pid is not an executing process, no tree
pub const NOINPUT: i32 = 66;

/// Internal software error (lookup path could not be formed)
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
