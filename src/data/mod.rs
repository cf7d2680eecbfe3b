//! Database repositories.
//!
//! Repositories wrap sea-orm queries for one entity each and are the only
//! layer that touches the database directly. Services own all business
//! rules; nothing in here calls ESI or makes policy decisions.

pub mod blueprint;
pub mod eve;
pub mod industry_job;
pub mod location;
pub mod owner;
pub mod request;
pub mod token;
pub mod user;
