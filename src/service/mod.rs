//! Brokkr's service layer.
//!
//! Services compose the repositories in [`crate::data`] and the ESI client
//! into the operations the rest of the application calls: owner
//! registration, token resolution, permission-aware listings, request
//! lifecycle transitions, and the sync cycles the worker runs. Each service
//! borrows the database connection and client rather than owning them, so
//! they are cheap to construct wherever needed.

pub mod access;
pub mod location;
pub mod owner;
pub mod registry;
pub mod request;
pub mod retry;
pub mod sync;
pub mod token;
