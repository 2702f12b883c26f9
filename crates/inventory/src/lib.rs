//! Narra Home Inventory - warehouse stock engine.
//!
//! This crate owns everything stock-related for the two Narra Home sites
//! (Lorenzo and Oroquieta): the product catalog model, availability
//! aggregation across the three stock shapes a product can carry, the batch
//! ledger with FIFO review, and the mutation API that is the sole writer of
//! stock state.
//!
//! # Modules
//!
//! - [`models`] - Products, variants, size options, warehouse stock, batches
//! - [`catalog`] - The loaded working set plus the batch ID sequence
//! - [`resolver`] - Read-side availability resolution across stock shapes
//! - [`fifo`] - Oldest-first ledger review and the "last updated" stamp
//! - [`mutation`] - `StockService`, the only code allowed to write stock
//! - [`store`] - `CatalogStore` trait and the JSON file implementation
//! - [`audit`] - `AuditSink` trait; callers pair mutations with audit entries
//! - [`error`] - The `StockError` taxonomy shared by all operations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod audit;
pub mod catalog;
pub mod error;
pub mod fifo;
pub mod models;
pub mod mutation;
pub mod resolver;
pub mod store;

pub use error::StockError;
