//! Shared data structures passed between Brokkr's layers.
//!
//! These models sit between the persistence entities and the service APIs:
//! normalized ESI rows ready for upsert, summaries assembled for listing
//! endpoints, and the worker job definitions the queue carries.

pub mod blueprint;
pub mod industry_job;
pub mod owner;
pub mod permission;
pub mod request;
pub mod token;
pub mod worker;
