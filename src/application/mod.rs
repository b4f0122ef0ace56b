//! Application services (use cases).
//!
//! These services orchestrate the pure detectors in [`crate::domain`] and
//! coordinate the feed and store ports to implement the tool's use cases.

pub mod alert;
pub mod ingest;
pub mod scheduler;
