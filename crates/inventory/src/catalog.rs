//! The loaded catalog: every product plus the batch ID sequence.

use narra_home_core::{BatchId, ProductId};
use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::resolver;

/// The working set every stock operation runs on.
///
/// The catalog also owns the monotonic sequence batch IDs are assigned
/// from, so IDs stay unique across every product and warehouse in the
/// file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// All products, in catalog order.
    pub products: Vec<Product>,

    /// Next value of the batch ID sequence.
    #[serde(default = "first_seq")]
    next_batch_seq: u64,
}

const fn first_seq() -> u64 {
    1
}

impl Catalog {
    /// Create a catalog over the given products.
    ///
    /// The batch sequence starts right after the highest catalog-format
    /// batch ID the products already carry.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut catalog = Self {
            products,
            next_batch_seq: first_seq(),
        };
        catalog.sync_sequence();
        catalog
    }

    /// Look up a product.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Look up a product for mutation.
    #[must_use]
    pub fn product_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|product| product.id == id)
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Peek at the next sequence value without consuming it.
    #[must_use]
    pub const fn next_batch_seq(&self) -> u64 {
        self.next_batch_seq
    }

    /// Take the next batch ID off the sequence.
    pub(crate) fn next_batch_id(&mut self) -> BatchId {
        let id = BatchId::from_seq(self.next_batch_seq);
        self.next_batch_seq += 1;
        id
    }

    /// Push the sequence past every catalog-format batch ID already
    /// present.
    ///
    /// Keeps IDs unique when loading files edited by hand or written by
    /// builds that did not persist the sequence. Imported IDs in foreign
    /// formats are ignored.
    pub fn sync_sequence(&mut self) {
        let max_seq = self
            .products
            .iter()
            .flat_map(resolver::unit_stocks)
            .flat_map(|unit| unit.stocks)
            .flat_map(|ws| &ws.batches)
            .filter_map(|batch| batch.id.sequence())
            .max();
        if let Some(max_seq) = max_seq {
            self.next_batch_seq = self.next_batch_seq.max(max_seq + 1);
        }
    }
}
