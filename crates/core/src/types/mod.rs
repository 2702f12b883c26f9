//! Core types for Narra Home.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod warehouse;

pub use id::*;
pub use warehouse::{UnknownWarehouse, Warehouse};
