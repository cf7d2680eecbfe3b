//! Utility functions and helpers for Brokkr's sync pipeline.
//!
//! This module provides reusable utility functions for common tasks, including
//! EVE Online-specific operations (location ID classification, ESI scope sets)
//! and time/date calculations (cache staleness determination). These utilities
//! are used across services, workers, and schedulers.

pub mod eve;
pub mod time;

#[cfg(test)]
pub mod test;
