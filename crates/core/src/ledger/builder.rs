//! Turns business events into balanced ledger entries.
//!
//! Each event kind has a fixed template of 2 to 5 lines keyed off the
//! tenant's [`ChartOfAccountsMapping`]. Zero-amount lines are left out.
//! Debit and credit totals are always recomputed from the built lines, and
//! an entry that fails to balance is returned as an [`InvariantViolation`].
//!
//! The builder does not deduplicate. Callers must not post the same event
//! twice; [`ensure_not_posted`] and [`LedgerEntry::idempotency_key`] give
//! them the means to enforce that.
//!
//! [`InvariantViolation`]: crate::error::InvariantViolation

use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use gescom_shared::types::LedgerEntryId;

use super::entry::{JournalCode, LedgerEntry, LedgerLine};
use super::events::{BusinessEvent, DocumentAmounts, EventHeader, EventKind, PaymentMethod, PayrollPosting};
use super::mapping::{AccountRef, ChartOfAccountsMapping};
use super::validation::validate_lines;
use crate::error::{EngineError, EngineResult, InputValidationError};

/// Builds ledger entries against one tenant's chart of accounts.
#[derive(Debug, Clone, Copy)]
pub struct LedgerEntryBuilder<'a> {
    mapping: &'a ChartOfAccountsMapping,
}

impl<'a> LedgerEntryBuilder<'a> {
    /// Creates a builder over a resolved mapping.
    #[must_use]
    pub const fn new(mapping: &'a ChartOfAccountsMapping) -> Self {
        Self { mapping }
    }

    /// Builds the entry for any event kind.
    ///
    /// # Errors
    ///
    /// - `InputValidation` for negative or zero amounts, or a TTC below
    ///   HT + TVA
    /// - `Configuration` if the event needs an optional account the tenant
    ///   has not mapped
    /// - `InvariantViolation` if the built entry does not balance
    pub fn build_from_event(&self, event: &BusinessEvent) -> EngineResult<LedgerEntry> {
        match event {
            BusinessEvent::SaleInvoiceIssued { header, amounts } => {
                self.sale_invoice_issued(header, amounts)
            }
            BusinessEvent::SalePaymentReceived {
                header,
                amount,
                method,
            } => self.sale_payment_received(header, *amount, *method),
            BusinessEvent::PurchaseInvoiceReceived { header, amounts } => {
                self.purchase_invoice_received(header, amounts)
            }
            BusinessEvent::PurchasePaymentMade {
                header,
                amount,
                method,
            } => self.purchase_payment_made(header, *amount, *method),
            BusinessEvent::PayrollValidated {
                header,
                payroll,
                method,
            } => self.payroll_validated(header, payroll, *method),
        }
    }

    /// Sale invoice: debit Clients for TTC, credit Ventes for HT, credit
    /// TVA collectée for VAT, credit Autres taxes for fixed taxes.
    ///
    /// # Errors
    ///
    /// See [`Self::build_from_event`].
    pub fn sale_invoice_issued(
        &self,
        header: &EventHeader,
        amounts: &DocumentAmounts,
    ) -> EngineResult<LedgerEntry> {
        let kind = EventKind::SaleInvoiceIssued;
        reject(kind, amounts.validate())?;

        let m = self.mapping;
        let label = entry_label("Facture de vente", header);
        let other_taxes = amounts.other_taxes();

        let mut lines = Vec::with_capacity(4);
        push_debit(&mut lines, &m.clients, &label, amounts.ttc);
        push_credit(&mut lines, &m.ventes, &label, amounts.ht);
        push_credit(&mut lines, &m.tva_collectee, &label, amounts.tva);
        if other_taxes > Decimal::ZERO {
            push_credit(&mut lines, m.autres_taxes()?, &label, other_taxes);
        }

        finish(kind, header, JournalCode::Ventes, label, lines)
    }

    /// Customer payment: debit the treasury account, credit Clients.
    ///
    /// # Errors
    ///
    /// See [`Self::build_from_event`].
    pub fn sale_payment_received(
        &self,
        header: &EventHeader,
        amount: Decimal,
        method: PaymentMethod,
    ) -> EngineResult<LedgerEntry> {
        let kind = EventKind::SalePaymentReceived;
        reject(kind, validate_payment(amount))?;

        let m = self.mapping;
        let label = entry_label("Règlement client", header);

        let mut lines = Vec::with_capacity(2);
        push_debit(&mut lines, m.treasury(method), &label, amount);
        push_credit(&mut lines, &m.clients, &label, amount);

        finish(kind, header, treasury_journal(method), label, lines)
    }

    /// Supplier invoice: debit Achats for HT plus any fixed taxes, debit
    /// TVA déductible for VAT, credit Fournisseurs for TTC.
    ///
    /// # Errors
    ///
    /// See [`Self::build_from_event`].
    pub fn purchase_invoice_received(
        &self,
        header: &EventHeader,
        amounts: &DocumentAmounts,
    ) -> EngineResult<LedgerEntry> {
        let kind = EventKind::PurchaseInvoiceReceived;
        reject(kind, amounts.validate())?;

        let m = self.mapping;
        let label = entry_label("Facture fournisseur", header);

        // Fixed taxes on purchases are not recoverable.
        let expense = amounts.ht + amounts.other_taxes();

        let mut lines = Vec::with_capacity(3);
        push_debit(&mut lines, &m.achats, &label, expense);
        push_debit(&mut lines, &m.tva_deductible, &label, amounts.tva);
        push_credit(&mut lines, &m.fournisseurs, &label, amounts.ttc);

        finish(kind, header, JournalCode::Achats, label, lines)
    }

    /// Supplier payment: debit Fournisseurs, credit the treasury account.
    ///
    /// # Errors
    ///
    /// See [`Self::build_from_event`].
    pub fn purchase_payment_made(
        &self,
        header: &EventHeader,
        amount: Decimal,
        method: PaymentMethod,
    ) -> EngineResult<LedgerEntry> {
        let kind = EventKind::PurchasePaymentMade;
        reject(kind, validate_payment(amount))?;

        let m = self.mapping;
        let label = entry_label("Règlement fournisseur", header);

        let mut lines = Vec::with_capacity(2);
        push_debit(&mut lines, &m.fournisseurs, &label, amount);
        push_credit(&mut lines, m.treasury(method), &label, amount);

        finish(kind, header, treasury_journal(method), label, lines)
    }

    /// Payroll run: debit Salaires for gross plus bonuses, credit
    /// Organismes sociaux, IRPP and Autres retenues for what was withheld,
    /// credit the treasury account for net pay.
    ///
    /// # Errors
    ///
    /// See [`Self::build_from_event`].
    pub fn payroll_validated(
        &self,
        header: &EventHeader,
        payroll: &PayrollPosting,
        method: PaymentMethod,
    ) -> EngineResult<LedgerEntry> {
        let kind = EventKind::PayrollValidated;
        reject(kind, payroll.validate())?;

        let m = self.mapping;
        let label = entry_label("Paie", header);

        let mut lines = Vec::with_capacity(5);
        push_debit(&mut lines, &m.salaires, &label, payroll.gross + payroll.avantages);
        push_credit(&mut lines, &m.organismes_sociaux, &label, payroll.cotisations);
        push_credit(&mut lines, &m.irpp, &label, payroll.irpp);
        if payroll.autres_retenues > Decimal::ZERO {
            push_credit(&mut lines, m.autres_retenues()?, &label, payroll.autres_retenues);
        }
        push_credit(&mut lines, m.treasury(method), &label, payroll.net);

        finish(kind, header, JournalCode::Paie, label, lines)
    }
}

/// Refuses to post an event whose key the caller has already recorded.
///
/// # Errors
///
/// Returns `DuplicatePosting` if `already_posted` reports the key as taken.
pub fn ensure_not_posted<F>(key: &str, already_posted: F) -> Result<(), InputValidationError>
where
    F: FnOnce(&str) -> bool,
{
    if already_posted(key) {
        warn!(idempotency_key = %key, "Event already posted");
        return Err(InputValidationError::DuplicatePosting(key.to_string()));
    }
    Ok(())
}

const fn treasury_journal(method: PaymentMethod) -> JournalCode {
    match method {
        PaymentMethod::Banque => JournalCode::Banque,
        PaymentMethod::Caisse => JournalCode::Caisse,
    }
}

fn validate_payment(amount: Decimal) -> Result<(), InputValidationError> {
    if amount < Decimal::ZERO {
        return Err(InputValidationError::NegativeAmount {
            field: "amount",
            value: amount,
        });
    }
    if amount.is_zero() {
        return Err(InputValidationError::ZeroAmount("amount"));
    }
    Ok(())
}

fn reject(kind: EventKind, result: Result<(), InputValidationError>) -> EngineResult<()> {
    result.map_err(|err| {
        warn!(event = %kind, error = %err, "Event rejected");
        EngineError::from(err)
    })
}

fn entry_label(prefix: &str, header: &EventHeader) -> String {
    match header.counterparty.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => {
            format!("{prefix} {} - {name}", header.origin.document_number)
        }
        _ => format!("{prefix} {}", header.origin.document_number),
    }
}

fn push_debit(lines: &mut Vec<LedgerLine>, account: &AccountRef, label: &str, amount: Decimal) {
    if !amount.is_zero() {
        lines.push(LedgerLine::debit(account, label, amount));
    }
}

fn push_credit(lines: &mut Vec<LedgerLine>, account: &AccountRef, label: &str, amount: Decimal) {
    if !amount.is_zero() {
        lines.push(LedgerLine::credit(account, label, amount));
    }
}

fn finish(
    kind: EventKind,
    header: &EventHeader,
    journal_code: JournalCode,
    label: String,
    lines: Vec<LedgerLine>,
) -> EngineResult<LedgerEntry> {
    let totals = validate_lines(&lines).map_err(|err| {
        error!(
            event = %kind,
            entry_number = %header.entry_number,
            error = %err,
            "Built ledger entry failed validation"
        );
        EngineError::from(err)
    })?;

    let idempotency_key = kind.idempotency_key(&header.origin);
    let entry = LedgerEntry {
        id: LedgerEntryId::from_name(&idempotency_key),
        number: header.entry_number.clone(),
        date: header.date,
        journal_code,
        label,
        lines,
        origin_document_ref: header.origin.clone(),
        idempotency_key,
    };

    debug!(
        event = %kind,
        entry_number = %entry.number,
        journal = %entry.journal_code,
        line_count = entry.lines.len(),
        total_debit = %totals.total_debit,
        "Built ledger entry"
    );

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::ledger::entry::OriginRef;
    use crate::ledger::mapping::tests::full_config;
    use chrono::NaiveDate;
    use gescom_shared::types::DocumentId;
    use rust_decimal_macros::dec;

    fn mapping() -> ChartOfAccountsMapping {
        ChartOfAccountsMapping::from_config(&full_config()).unwrap()
    }

    fn header(number: &str) -> EventHeader {
        EventHeader {
            origin: OriginRef {
                document_id: DocumentId::from_name(number),
                document_number: number.to_string(),
            },
            entry_number: format!("E-{number}"),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            counterparty: Some("SARL Atlas".to_string()),
        }
    }

    fn amounts(ht: Decimal, tva: Decimal, ttc: Decimal) -> DocumentAmounts {
        DocumentAmounts { ht, tva, ttc }
    }

    fn sides(entry: &LedgerEntry) -> Vec<(&str, Decimal, Decimal)> {
        entry
            .lines
            .iter()
            .map(|l| (l.account_number.as_str(), l.debit, l.credit))
            .collect()
    }

    #[test]
    fn test_sale_invoice_template() {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);

        let entry = builder
            .sale_invoice_issued(&header("FA-0012"), &amounts(dec!(900), dec!(171), dec!(1071)))
            .unwrap();

        assert_eq!(entry.journal_code, JournalCode::Ventes);
        assert_eq!(entry.label, "Facture de vente FA-0012 - SARL Atlas");
        assert_eq!(
            sides(&entry),
            vec![
                ("411000", dec!(1071), Decimal::ZERO),
                ("707000", Decimal::ZERO, dec!(900)),
                ("445710", Decimal::ZERO, dec!(171)),
            ]
        );
        let totals = entry.totals();
        assert!(totals.equilibre);
        assert_eq!(totals.total_debit, dec!(1071));
    }

    #[test]
    fn test_sale_invoice_fixed_tax_goes_to_other_taxes() {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);

        let entry = builder
            .sale_invoice_issued(&header("FA-0013"), &amounts(dec!(900), dec!(171), dec!(1076)))
            .unwrap();

        assert_eq!(entry.lines.len(), 4);
        assert_eq!(entry.lines[3].account_number, "447000");
        assert_eq!(entry.lines[3].credit, dec!(5));
        assert!(entry.is_balanced());
    }

    #[test]
    fn test_sale_invoice_fixed_tax_without_account() {
        let mut config = full_config();
        config.autres_taxes = None;
        let mapping = ChartOfAccountsMapping::from_config(&config).unwrap();
        let builder = LedgerEntryBuilder::new(&mapping);

        let result =
            builder.sale_invoice_issued(&header("FA-0014"), &amounts(dec!(900), dec!(171), dec!(1076)));
        assert_eq!(
            result,
            Err(EngineError::Configuration(ConfigurationError::MissingAccount(
                "autres_taxes"
            )))
        );
    }

    #[test]
    fn test_sale_invoice_without_vat_omits_zero_line() {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);

        let entry = builder
            .sale_invoice_issued(&header("FA-0015"), &amounts(dec!(500), Decimal::ZERO, dec!(500)))
            .unwrap();
        assert_eq!(entry.lines.len(), 2);
        assert!(entry.is_balanced());
    }

    #[test]
    fn test_purchase_invoice_template() {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);

        let entry = builder
            .purchase_invoice_received(&header("FF-0003"), &amounts(dec!(1000), dec!(190), dec!(1192)))
            .unwrap();

        assert_eq!(entry.journal_code, JournalCode::Achats);
        assert_eq!(
            sides(&entry),
            vec![
                ("607000", dec!(1002), Decimal::ZERO),
                ("445660", dec!(190), Decimal::ZERO),
                ("401000", Decimal::ZERO, dec!(1192)),
            ]
        );
        assert!(entry.is_balanced());
    }

    #[test]
    fn test_payments_follow_method() {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);

        let received = builder
            .sale_payment_received(&header("RC-0001"), dec!(119), PaymentMethod::Caisse)
            .unwrap();
        assert_eq!(received.journal_code, JournalCode::Caisse);
        assert_eq!(
            sides(&received),
            vec![
                ("531000", dec!(119), Decimal::ZERO),
                ("411000", Decimal::ZERO, dec!(119)),
            ]
        );

        let paid = builder
            .purchase_payment_made(&header("RF-0001"), dec!(1192), PaymentMethod::Banque)
            .unwrap();
        assert_eq!(paid.journal_code, JournalCode::Banque);
        assert_eq!(
            sides(&paid),
            vec![
                ("401000", dec!(1192), Decimal::ZERO),
                ("512000", Decimal::ZERO, dec!(1192)),
            ]
        );
    }

    #[test]
    fn test_payroll_template() {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);

        let posting = PayrollPosting {
            gross: dec!(5000),
            avantages: dec!(200),
            cotisations: dec!(500),
            irpp: dec!(550),
            autres_retenues: dec!(100),
            net: dec!(4050),
        };
        let entry = builder
            .payroll_validated(&header("PAIE-2024-03"), &posting, PaymentMethod::Banque)
            .unwrap();

        assert_eq!(entry.journal_code, JournalCode::Paie);
        assert_eq!(
            sides(&entry),
            vec![
                ("641000", dec!(5200), Decimal::ZERO),
                ("431000", Decimal::ZERO, dec!(500)),
                ("442000", Decimal::ZERO, dec!(550)),
                ("427000", Decimal::ZERO, dec!(100)),
                ("512000", Decimal::ZERO, dec!(4050)),
            ]
        );
        assert!(entry.is_balanced());
    }

    #[test]
    fn test_inconsistent_payroll_is_rejected_as_input() {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);

        let posting = PayrollPosting {
            gross: dec!(5000),
            cotisations: dec!(500),
            irpp: dec!(550),
            net: dec!(4000),
            ..PayrollPosting::default()
        };
        // 5000 - 500 - 550 leaves 3950, not 4000.
        let err = builder
            .payroll_validated(&header("PAIE-X"), &posting, PaymentMethod::Banque)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InputValidation(InputValidationError::InconsistentPayrollAmounts {
                expected: dec!(3950),
                net: dec!(4000),
            })
        );
        assert_eq!(err.error_code(), "INCONSISTENT_PAYROLL_AMOUNTS");
    }

    #[test]
    fn test_rejects_bad_amounts() {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);

        assert!(matches!(
            builder.sale_payment_received(&header("RC-1"), Decimal::ZERO, PaymentMethod::Banque),
            Err(EngineError::InputValidation(InputValidationError::ZeroAmount("amount")))
        ));
        assert!(matches!(
            builder.purchase_payment_made(&header("RF-1"), dec!(-5), PaymentMethod::Banque),
            Err(EngineError::InputValidation(InputValidationError::NegativeAmount { .. }))
        ));
        assert!(matches!(
            builder.purchase_invoice_received(&header("FF-1"), &amounts(dec!(100), dec!(19), dec!(110))),
            Err(EngineError::InputValidation(
                InputValidationError::InconsistentDocumentAmounts { .. }
            ))
        ));
    }

    #[test]
    fn test_rebuilding_same_event_yields_same_id() {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);
        let event = BusinessEvent::SaleInvoiceIssued {
            header: header("FA-0020"),
            amounts: amounts(dec!(100), dec!(19), dec!(119)),
        };

        let first = builder.build_from_event(&event).unwrap();
        let second = builder.build_from_event(&event).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.idempotency_key, event.idempotency_key());
        assert_eq!(first.id, LedgerEntryId::from_name(&first.idempotency_key));
    }

    #[test]
    fn test_ensure_not_posted() {
        let posted = ["sale_invoice_issued:abc".to_string()];

        assert!(ensure_not_posted("sale_invoice_issued:def", |k| posted.iter().any(|p| p == k)).is_ok());
        assert_eq!(
            ensure_not_posted("sale_invoice_issued:abc", |k| posted.iter().any(|p| p == k)),
            Err(InputValidationError::DuplicatePosting(
                "sale_invoice_issued:abc".to_string()
            ))
        );
    }
}
