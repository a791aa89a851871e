//! Core computation engine for Gescom.
//!
//! This crate contains pure business logic with ZERO I/O, web or database
//! dependencies. Every operation is a synchronous function over immutable
//! inputs and is safe to call concurrently.
//!
//! # Modules
//!
//! - `money` - Decimal rounding, percentages and amount comparison
//! - `tax` - Tenant tax catalog
//! - `totals` - Document totals (HT, discount, taxes, TTC)
//! - `payroll` - Payslip calculation and progressive income tax
//! - `ledger` - Double-entry posting of business events
//! - `words` - Amounts in words
//! - `settings` - Validated tenant configuration

pub mod error;
pub mod ledger;
pub mod money;
pub mod payroll;
pub mod settings;
pub mod tax;
pub mod totals;
pub mod words;

pub use error::{
    ConfigurationError, EngineError, EngineResult, ErrorKind, InputValidationError,
    InvariantViolation,
};
pub use settings::TenantSettings;
