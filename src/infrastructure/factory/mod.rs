//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured components
//! from application configuration.
//!
//! # Submodules
//!
//! - [`feed`] - Odds feed client construction
//! - [`persistence`] - Database pool and store construction

pub mod feed;
pub mod persistence;
