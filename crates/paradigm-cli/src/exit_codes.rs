//! Process exit codes shared by both clients.
//!
//! Argument errors also exit with `FAILURE`.

pub use paradigm_client::error::{EXIT_FAILURE as FAILURE, EXIT_INTERRUPTED as INTERRUPTED};

pub const SUCCESS: i32 = 0;
