//! Business events that produce ledger entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::OriginRef;
use crate::error::InputValidationError;
use crate::money::amounts_match;
use crate::payroll::PayrollResult;
use crate::totals::Totals;

/// How a payment is settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Bank transfer, cheque or card.
    #[default]
    Banque,
    /// Cash.
    Caisse,
}

/// The five kinds of postable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A sale invoice was issued.
    SaleInvoiceIssued,
    /// A customer paid.
    SalePaymentReceived,
    /// A supplier invoice was received.
    PurchaseInvoiceReceived,
    /// A supplier was paid.
    PurchasePaymentMade,
    /// A payroll run was validated.
    PayrollValidated,
}

impl EventKind {
    /// Stable name used in idempotency keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SaleInvoiceIssued => "sale_invoice_issued",
            Self::SalePaymentReceived => "sale_payment_received",
            Self::PurchaseInvoiceReceived => "purchase_invoice_received",
            Self::PurchasePaymentMade => "purchase_payment_made",
            Self::PayrollValidated => "payroll_validated",
        }
    }

    /// Builds the idempotency key for an event of this kind on `origin`.
    #[must_use]
    pub fn idempotency_key(self, origin: &OriginRef) -> String {
        format!("{}:{}", self.as_str(), origin.document_id)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeader {
    /// Originating document (invoice, payment receipt, payroll run).
    pub origin: OriginRef,
    /// Pre-assigned entry number.
    pub entry_number: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Customer, supplier or period name appended to labels.
    #[serde(default)]
    pub counterparty: Option<String>,
}

/// The persisted HT/TVA/TTC amounts of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAmounts {
    /// Amount before tax, after discount.
    pub ht: Decimal,
    /// Percentage taxes (VAT).
    pub tva: Decimal,
    /// Amount including all taxes.
    pub ttc: Decimal,
}

impl DocumentAmounts {
    /// Reads the amounts from computed totals.
    #[must_use]
    pub fn from_totals(totals: &Totals) -> Self {
        Self {
            ht: totals.net_ht_after_discount,
            tva: totals.percentage_tax_total,
            ttc: totals.total_ttc,
        }
    }

    /// Returns the part of TTC not explained by HT + TVA (fixed taxes).
    #[must_use]
    pub fn other_taxes(&self) -> Decimal {
        self.ttc - self.ht - self.tva
    }

    /// Checks the amounts can be posted.
    ///
    /// # Errors
    ///
    /// - `NegativeAmount` if any amount is negative
    /// - `ZeroAmount` if TTC is zero
    /// - `InconsistentDocumentAmounts` if TTC is below HT + TVA
    pub fn validate(&self) -> Result<(), InputValidationError> {
        for (field, value) in [("ht", self.ht), ("tva", self.tva), ("ttc", self.ttc)] {
            if value < Decimal::ZERO {
                return Err(InputValidationError::NegativeAmount { field, value });
            }
        }
        if self.ttc.is_zero() {
            return Err(InputValidationError::ZeroAmount("ttc"));
        }
        if self.other_taxes() < Decimal::ZERO {
            return Err(InputValidationError::InconsistentDocumentAmounts {
                ht: self.ht,
                tva: self.tva,
                ttc: self.ttc,
            });
        }
        Ok(())
    }
}

/// Payroll amounts to post, for one payslip or a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPosting {
    /// Gross salaries.
    pub gross: Decimal,
    /// Bonuses and indemnities.
    #[serde(default)]
    pub avantages: Decimal,
    /// Social contributions withheld.
    pub cotisations: Decimal,
    /// Income tax withheld.
    pub irpp: Decimal,
    /// Other deductions withheld.
    #[serde(default)]
    pub autres_retenues: Decimal,
    /// Net paid to employees.
    pub net: Decimal,
}

impl PayrollPosting {
    /// Sums a run of payslips.
    #[must_use]
    pub fn aggregate<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a PayrollResult>,
    {
        results
            .into_iter()
            .fold(Self::default(), |acc, r| acc.add(&Self::from(r)))
    }

    fn add(self, other: &Self) -> Self {
        Self {
            gross: self.gross + other.gross,
            avantages: self.avantages + other.avantages,
            cotisations: self.cotisations + other.cotisations,
            irpp: self.irpp + other.irpp,
            autres_retenues: self.autres_retenues + other.autres_retenues,
            net: self.net + other.net,
        }
    }

    /// Net pay implied by the other amounts.
    #[must_use]
    pub fn expected_net(&self) -> Decimal {
        self.gross + self.avantages - self.cotisations - self.irpp - self.autres_retenues
    }

    /// Checks the amounts can be posted.
    ///
    /// # Errors
    ///
    /// - `NegativeAmount` if any amount is negative
    /// - `ZeroAmount` if there is nothing to expense
    /// - `InconsistentPayrollAmounts` if net does not follow from the rest
    pub fn validate(&self) -> Result<(), InputValidationError> {
        for (field, value) in [
            ("gross", self.gross),
            ("avantages", self.avantages),
            ("cotisations", self.cotisations),
            ("irpp", self.irpp),
            ("autres_retenues", self.autres_retenues),
            ("net", self.net),
        ] {
            if value < Decimal::ZERO {
                return Err(InputValidationError::NegativeAmount { field, value });
            }
        }
        if (self.gross + self.avantages).is_zero() {
            return Err(InputValidationError::ZeroAmount("gross"));
        }
        if !amounts_match(self.net, self.expected_net()) {
            return Err(InputValidationError::InconsistentPayrollAmounts {
                expected: self.expected_net(),
                net: self.net,
            });
        }
        Ok(())
    }
}

impl From<&PayrollResult> for PayrollPosting {
    fn from(result: &PayrollResult) -> Self {
        Self {
            gross: result.salary_brut,
            avantages: result.avantages,
            cotisations: result.cotisations.total(),
            irpp: result.retenues.irpp,
            autres_retenues: result.retenues.autres,
            net: result.net_a_payer,
        }
    }
}

/// A business event to post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BusinessEvent {
    /// Sale invoice issued to a customer.
    SaleInvoiceIssued {
        /// Common fields.
        header: EventHeader,
        /// Invoice amounts.
        amounts: DocumentAmounts,
    },
    /// Payment received from a customer.
    SalePaymentReceived {
        /// Common fields.
        header: EventHeader,
        /// Amount received.
        amount: Decimal,
        /// Settlement channel.
        #[serde(default)]
        method: PaymentMethod,
    },
    /// Supplier invoice received.
    PurchaseInvoiceReceived {
        /// Common fields.
        header: EventHeader,
        /// Invoice amounts.
        amounts: DocumentAmounts,
    },
    /// Payment made to a supplier.
    PurchasePaymentMade {
        /// Common fields.
        header: EventHeader,
        /// Amount paid.
        amount: Decimal,
        /// Settlement channel.
        #[serde(default)]
        method: PaymentMethod,
    },
    /// Payroll run validated.
    PayrollValidated {
        /// Common fields.
        header: EventHeader,
        /// Run amounts.
        payroll: PayrollPosting,
        /// How net pay is disbursed.
        #[serde(default)]
        method: PaymentMethod,
    },
}

impl BusinessEvent {
    /// Returns the event kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::SaleInvoiceIssued { .. } => EventKind::SaleInvoiceIssued,
            Self::SalePaymentReceived { .. } => EventKind::SalePaymentReceived,
            Self::PurchaseInvoiceReceived { .. } => EventKind::PurchaseInvoiceReceived,
            Self::PurchasePaymentMade { .. } => EventKind::PurchasePaymentMade,
            Self::PayrollValidated { .. } => EventKind::PayrollValidated,
        }
    }

    /// Returns the common fields.
    #[must_use]
    pub const fn header(&self) -> &EventHeader {
        match self {
            Self::SaleInvoiceIssued { header, .. }
            | Self::SalePaymentReceived { header, .. }
            | Self::PurchaseInvoiceReceived { header, .. }
            | Self::PurchasePaymentMade { header, .. }
            | Self::PayrollValidated { header, .. } => header,
        }
    }

    /// Returns the key under which this event is posted at most once.
    #[must_use]
    pub fn idempotency_key(&self) -> String {
        self.kind().idempotency_key(&self.header().origin)
    }
}
