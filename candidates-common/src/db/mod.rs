//! Database initialization and candidate persistence

pub mod candidates;
pub mod init;

pub use init::*;
