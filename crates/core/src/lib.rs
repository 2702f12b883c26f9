//! Narra Home Core - Shared types library.
//!
//! This crate provides common types used across all Narra Home components:
//! - `inventory` - Warehouse stock engine (aggregation, resolution, mutation)
//! - `cli` - Command-line tools for catalog management and stock operations
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no file access, no logging.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and the warehouse site enum

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
