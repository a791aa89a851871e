//! Read-only catalog of configured taxes.

pub mod catalog;

pub use catalog::{ApplicableTaxes, Tax, TaxCatalog, TaxKind};
