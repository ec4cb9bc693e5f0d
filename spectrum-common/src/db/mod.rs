//! Database initialization and queries

pub mod init;
pub mod scores;

pub use init::*;
pub use scores::*;
