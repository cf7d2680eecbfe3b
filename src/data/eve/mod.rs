//! Repositories for EVE entity reference data: corporations, characters,
//! solar systems, and item types mirrored from ESI.

pub mod character;
pub mod corporation;
pub mod eve_type;
pub mod solar_system;
