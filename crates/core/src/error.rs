//! Engine error types.
//!
//! Three families, each with a different owner:
//! - [`ConfigurationError`]: tenant setup is wrong; raised while loading
//!   configuration, before any computation.
//! - [`InputValidationError`]: the caller passed something the engine
//!   refuses to compute with.
//! - [`InvariantViolation`]: a computed result failed its own consistency
//!   check. This is a defect signal; the result is never returned.

use rust_decimal::Decimal;
use thiserror::Error;

use gescom_shared::AppError;
use gescom_shared::types::TaxId;

/// Tenant configuration is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    // ========== Bracket Table ==========
    /// The bracket table has no brackets.
    #[error("Tax bracket table is empty")]
    EmptyBracketTable,

    /// The first bracket does not start at zero.
    #[error("Tax bracket table must start at 0, first bracket starts at {0}")]
    BracketTableMustStartAtZero(Decimal),

    /// Two consecutive brackets leave a gap.
    #[error("Gap in tax bracket table between {previous_max} and {next_min}")]
    BracketGap {
        /// Upper bound of the earlier bracket.
        previous_max: Decimal,
        /// Lower bound of the following bracket.
        next_min: Decimal,
    },

    /// Two consecutive brackets overlap.
    #[error("Overlap in tax bracket table between {previous_max} and {next_min}")]
    BracketOverlap {
        /// Upper bound of the earlier bracket.
        previous_max: Decimal,
        /// Lower bound of the following bracket.
        next_min: Decimal,
    },

    /// An unbounded bracket is followed by another bracket.
    #[error("Only the last tax bracket may be unbounded (bracket {0})")]
    UnboundedBracketNotLast(u32),

    /// The last bracket has an upper bound, leaving incomes above it untaxed.
    #[error("Last tax bracket must be unbounded, it stops at {0}")]
    LastBracketBounded(Decimal),

    /// A bracket's upper bound is not above its lower bound.
    #[error("Tax bracket {ordre} has invalid bounds [{min}, {max})")]
    InvalidBracketBounds {
        /// Bracket position.
        ordre: u32,
        /// Lower bound.
        min: Decimal,
        /// Upper bound.
        max: Decimal,
    },

    /// Two brackets share the same position.
    #[error("Duplicate tax bracket order {0}")]
    DuplicateBracketOrder(u32),

    // ========== Rates ==========
    /// A rate lies outside [0, 100].
    #[error("Rate for {name} must be between 0 and 100, got {value}")]
    InvalidRate {
        /// What the rate is for.
        name: String,
        /// The offending value.
        value: Decimal,
    },

    /// Contribution rates sum above 100% of gross salary.
    #[error("Contribution rates sum to {0}%, above 100%")]
    ContributionRatesExceedGross(Decimal),

    // ========== Taxes ==========
    /// Two catalog entries share an id.
    #[error("Duplicate tax id {0}")]
    DuplicateTaxId(TaxId),

    /// A tax value is negative.
    #[error("Tax {code} has negative value {value}")]
    InvalidTaxValue {
        /// Tax code.
        code: String,
        /// The offending value.
        value: Decimal,
    },

    // ========== Accounts ==========
    /// A required chart-of-accounts entry is missing or blank.
    #[error("Missing account mapping entry: {0}")]
    MissingAccount(&'static str),

    // ========== Vocabulary ==========
    /// Amount-in-words precision is unsupported.
    #[error("Unsupported number of decimal places for amounts in words: {0}")]
    InvalidDecimalPlaces(u32),
}

/// Caller input refused by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputValidationError {
    /// Discount value is negative.
    #[error("Discount cannot be negative, got {0}")]
    NegativeDiscount(Decimal),

    /// Percentage discount above 100.
    #[error("Discount percentage must be between 0 and 100, got {0}")]
    DiscountPercentageOutOfRange(Decimal),

    /// A selected tax is not in the catalog.
    #[error("Unknown tax id: {0}")]
    UnknownTax(TaxId),

    /// A posted amount is negative.
    #[error("Amount {field} cannot be negative, got {value}")]
    NegativeAmount {
        /// Which amount.
        field: &'static str,
        /// The offending value.
        value: Decimal,
    },

    /// An amount to post is zero, leaving nothing to record.
    #[error("Nothing to post: {0} is zero")]
    ZeroAmount(&'static str),

    /// Gross salary is negative.
    #[error("Gross salary cannot be negative, got {0}")]
    NegativeSalary(Decimal),

    /// TTC is lower than HT + TVA.
    #[error("TTC {ttc} is lower than HT {ht} plus TVA {tva}")]
    InconsistentDocumentAmounts {
        /// Amount before tax.
        ht: Decimal,
        /// VAT amount.
        tva: Decimal,
        /// Amount including tax.
        ttc: Decimal,
    },

    /// Net pay does not follow from the other payroll amounts.
    #[error("Payroll net {net} does not match gross plus bonuses less deductions ({expected})")]
    InconsistentPayrollAmounts {
        /// Gross + avantages - cotisations - irpp - autres retenues.
        expected: Decimal,
        /// Net as supplied.
        net: Decimal,
    },

    /// The event has already been posted.
    #[error("Event already posted: {0}")]
    DuplicatePosting(String),
}

/// A computed result failed its consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Debits and credits differ.
    #[error("Ledger entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit.
        debit: Decimal,
        /// Total credit.
        credit: Decimal,
    },

    /// A ledger line is on both sides, or on neither.
    #[error("Ledger line on account {0} must carry exactly one of debit or credit")]
    LineBothSides(String),

    /// A ledger line carries a negative amount.
    #[error("Ledger line on account {0} carries a negative amount")]
    NegativeLine(String),

    /// A ledger entry has no lines.
    #[error("Ledger entry has no lines")]
    EmptyEntry,

    /// Totals do not reconcile.
    #[error("Totals do not reconcile. Expected TTC: {expected}, computed: {actual}")]
    TotalsMismatch {
        /// HT after discount plus all taxes.
        expected: Decimal,
        /// Reported TTC.
        actual: Decimal,
    },

    /// Net pay does not reconcile with its components.
    #[error("Payroll does not reconcile. Expected net: {expected}, computed: {actual}")]
    PayrollMismatch {
        /// Gross minus deductions plus bonuses.
        expected: Decimal,
        /// Reported net.
        actual: Decimal,
    },
}

/// Which bucket of the error taxonomy a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Setup problem, fatal until the configuration is fixed.
    Configuration,
    /// Input refused; the caller keeps the form open.
    InputValidation,
    /// Defect in the engine.
    InvariantViolation,
}

/// Any failure from the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// See [`ConfigurationError`].
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// See [`InputValidationError`].
    #[error(transparent)]
    InputValidation(#[from] InputValidationError),

    /// See [`InvariantViolation`].
    #[error(transparent)]
    InvariantViolation(#[from] InvariantViolation),
}

/// Result type alias using `EngineError`.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Returns the taxonomy bucket.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InputValidation(_) => ErrorKind::InputValidation,
            Self::InvariantViolation(_) => ErrorKind::InvariantViolation,
        }
    }

    /// Returns the error code for machine-readable output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(err) => match err {
                ConfigurationError::EmptyBracketTable => "EMPTY_BRACKET_TABLE",
                ConfigurationError::BracketTableMustStartAtZero(_) => "BRACKET_TABLE_NOT_FROM_ZERO",
                ConfigurationError::BracketGap { .. } => "BRACKET_GAP",
                ConfigurationError::BracketOverlap { .. } => "BRACKET_OVERLAP",
                ConfigurationError::UnboundedBracketNotLast(_) => "UNBOUNDED_BRACKET_NOT_LAST",
                ConfigurationError::LastBracketBounded(_) => "LAST_BRACKET_BOUNDED",
                ConfigurationError::InvalidBracketBounds { .. } => "INVALID_BRACKET_BOUNDS",
                ConfigurationError::DuplicateBracketOrder(_) => "DUPLICATE_BRACKET_ORDER",
                ConfigurationError::InvalidRate { .. } => "INVALID_RATE",
                ConfigurationError::ContributionRatesExceedGross(_) => {
                    "CONTRIBUTION_RATES_EXCEED_GROSS"
                }
                ConfigurationError::DuplicateTaxId(_) => "DUPLICATE_TAX_ID",
                ConfigurationError::InvalidTaxValue { .. } => "INVALID_TAX_VALUE",
                ConfigurationError::MissingAccount(_) => "MISSING_ACCOUNT",
                ConfigurationError::InvalidDecimalPlaces(_) => "INVALID_DECIMAL_PLACES",
            },
            Self::InputValidation(err) => match err {
                InputValidationError::NegativeDiscount(_) => "NEGATIVE_DISCOUNT",
                InputValidationError::DiscountPercentageOutOfRange(_) => {
                    "DISCOUNT_PERCENTAGE_OUT_OF_RANGE"
                }
                InputValidationError::UnknownTax(_) => "UNKNOWN_TAX",
                InputValidationError::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
                InputValidationError::ZeroAmount(_) => "ZERO_AMOUNT",
                InputValidationError::NegativeSalary(_) => "NEGATIVE_SALARY",
                InputValidationError::InconsistentDocumentAmounts { .. } => {
                    "INCONSISTENT_DOCUMENT_AMOUNTS"
                }
                InputValidationError::InconsistentPayrollAmounts { .. } => {
                    "INCONSISTENT_PAYROLL_AMOUNTS"
                }
                InputValidationError::DuplicatePosting(_) => "DUPLICATE_POSTING",
            },
            Self::InvariantViolation(err) => match err {
                InvariantViolation::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
                InvariantViolation::LineBothSides(_) => "LINE_BOTH_SIDES",
                InvariantViolation::NegativeLine(_) => "NEGATIVE_LINE",
                InvariantViolation::EmptyEntry => "EMPTY_ENTRY",
                InvariantViolation::TotalsMismatch { .. } => "TOTALS_MISMATCH",
                InvariantViolation::PayrollMismatch { .. } => "PAYROLL_MISMATCH",
            },
        }
    }

    /// Always false: the engine is pure, retrying cannot change the outcome.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err.kind() {
            ErrorKind::Configuration => Self::Configuration(err.to_string()),
            ErrorKind::InputValidation => Self::Validation(err.to_string()),
            ErrorKind::InvariantViolation => Self::Invariant(err.to_string()),
        }
    }
}

impl From<ConfigurationError> for AppError {
    fn from(err: ConfigurationError) -> Self {
        EngineError::from(err).into()
    }
}
