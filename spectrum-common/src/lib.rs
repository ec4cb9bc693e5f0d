//! # Spectrum Common Library
//!
//! Shared code for the spectrum reputation services including:
//! - Identity and score vector domain types
//! - Database initialization and score queries
//! - Configuration loading
//! - Timestamp utilities

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod score;
pub mod time;

pub use error::{Error, Result};
pub use identity::{IdentityId, Member};
pub use score::{ScoreField, ScoreVector};
