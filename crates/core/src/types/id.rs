//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
///
/// # Example
///
/// ```rust
/// # use narra_home_core::define_id;
/// define_id!(SupplierId);
/// define_id!(PurchaseOrderId);
///
/// let supplier_id = SupplierId::new(1);
/// let order_id = PurchaseOrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: SupplierId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);

/// Identifier of a product variant, e.g. `"NSB-WAL-Q"`.
///
/// Variant IDs are assigned when a variant is created in the catalog and are
/// unique within their product. They are opaque strings; no format is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(String);

impl VariantId {
    /// Create a new variant ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the underlying `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VariantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for VariantId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for VariantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a stock batch in the warehouse ledger.
///
/// Catalog-assigned IDs come from a monotonic sequence and look like
/// `B-000001`, `B-000002`, and so on. Records imported from older systems may
/// carry IDs in other formats; those are preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    /// Create a batch ID from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a batch ID from a sequence number (`7` becomes `B-000007`).
    #[must_use]
    pub fn from_seq(seq: u64) -> Self {
        Self(format!("B-{seq:06}"))
    }

    /// Parse the sequence number out of a catalog-assigned ID.
    ///
    /// Returns `None` for imported IDs that do not follow the `B-NNNNNN`
    /// format.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix("B-")?.parse().ok()
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the underlying `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BatchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BatchId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for BatchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_id_from_seq_is_zero_padded() {
        assert_eq!(BatchId::from_seq(1).as_str(), "B-000001");
        assert_eq!(BatchId::from_seq(42).as_str(), "B-000042");
        assert_eq!(BatchId::from_seq(1_000_000).as_str(), "B-1000000");
    }

    #[test]
    fn test_batch_id_sequence_round_trip() {
        assert_eq!(BatchId::from_seq(7).sequence(), Some(7));
        assert_eq!(BatchId::from_seq(999_999).sequence(), Some(999_999));
    }

    #[test]
    fn test_batch_id_sequence_rejects_foreign_formats() {
        assert_eq!(BatchId::new("LOT-2023-11").sequence(), None);
        assert_eq!(BatchId::new("B-").sequence(), None);
        assert_eq!(BatchId::new("B-12x4").sequence(), None);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let product = ProductId::new(7);
        assert_eq!(serde_json::to_string(&product).unwrap(), "7");

        let variant = VariantId::new("NSB-WAL-Q");
        assert_eq!(serde_json::to_string(&variant).unwrap(), "\"NSB-WAL-Q\"");

        let batch: BatchId = serde_json::from_str("\"B-000003\"").unwrap();
        assert_eq!(batch, BatchId::from_seq(3));
    }
}
