//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `TaxId` where a `DocumentId` is expected.
//! Every ID is derived from a stable name (UUID v5), so recomputing from the
//! same input always yields the same ID.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a deterministic ID from a stable name (UUID v5).
            ///
            /// The same name always yields the same ID.
            #[must_use]
            pub fn from_name(name: &str) -> Self {
                Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id!(TaxId, "Unique identifier for a configured tax.");
typed_id!(DocumentId, "Unique identifier for a business document (quote, invoice, payslip).");
typed_id!(LedgerEntryId, "Unique identifier for a ledger entry.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
