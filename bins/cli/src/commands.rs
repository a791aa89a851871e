//! Subcommand handlers.
//!
//! Each handler takes a parsed request and returns the JSON value to print.
//! Engine failures are converted to [`AppError`] so `main` can pick the exit
//! code.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use gescom_core::ledger::{
    AccountBalance, BusinessEvent, EntryTotals, LedgerEntry, PayrollPosting, TrialBalance,
    ensure_not_posted,
};
use gescom_core::payroll::{PayrollInput, PayrollResult};
use gescom_core::totals::{DocumentInput, LineView, Totals};
use gescom_core::{EngineError, TenantSettings, words};
use gescom_shared::AppError;
use gescom_shared::types::TaxId;

/// Reads and decodes a JSON request file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// A document to total. Taxes may be selected by id or by catalog code.
#[derive(Debug, Deserialize)]
pub struct TotalsRequest {
    /// Lines, discount and selected tax ids.
    #[serde(flatten)]
    pub document: DocumentInput,
    /// Selected taxes by code.
    #[serde(default)]
    pub selected_tax_codes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TotalsResponse {
    totals: Totals,
    lines: Vec<LineView>,
    total_in_words: String,
}

/// One payslip or a whole run.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PayrollRequest {
    /// Several employees.
    Run(Vec<PayrollInput>),
    /// A single employee.
    Single(PayrollInput),
}

#[derive(Debug, Serialize)]
struct PayrollResponse {
    payslips: Vec<PayrollResult>,
    run: PayrollPosting,
    net_in_words: String,
}

/// One event or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PostRequest {
    /// Several events, posted in order.
    Batch(Vec<BusinessEvent>),
    /// A single event.
    Single(Box<BusinessEvent>),
}

#[derive(Debug, Serialize)]
struct PostedEntry {
    #[serde(flatten)]
    entry: LedgerEntry,
    #[serde(flatten)]
    totals: EntryTotals,
}

#[derive(Debug, Serialize)]
struct PostResponse {
    entries: Vec<PostedEntry>,
    balances: Vec<AccountBalance>,
    trial_balance: TrialBalance,
}

/// `gescom totals`
pub fn totals(settings: &TenantSettings, request: &TotalsRequest) -> anyhow::Result<Value> {
    let mut selected = request.document.selected_tax_ids.clone();
    selected.extend(request.selected_tax_codes.iter().map(|c| TaxId::from_name(c)));

    let calculator = settings.totals_calculator();
    let totals = calculator
        .compute_totals(&request.document.lines, &request.document.discount, &selected)
        .map_err(engine_error)?;

    info!(
        subtotal_ht = %totals.subtotal_ht,
        total_ttc = %totals.total_ttc,
        "Document totals computed"
    );

    let response = TotalsResponse {
        lines: calculator.line_breakdown(&request.document.lines),
        total_in_words: words::to_words(totals.total_ttc, &settings.vocabulary),
        totals,
    };
    Ok(serde_json::to_value(response)?)
}

/// `gescom payroll`
pub fn payroll(settings: &TenantSettings, request: &PayrollRequest) -> anyhow::Result<Value> {
    let inputs = match request {
        PayrollRequest::Run(inputs) => inputs.as_slice(),
        PayrollRequest::Single(input) => std::slice::from_ref(input),
    };

    let calculator = settings.payroll_calculator();
    let payslips = inputs
        .iter()
        .map(|input| calculator.calculate(input))
        .collect::<Result<Vec<_>, _>>()
        .map_err(engine_error)?;

    let run = PayrollPosting::aggregate(&payslips);
    info!(payslips = payslips.len(), net = %run.net, "Payroll computed");

    let response = PayrollResponse {
        net_in_words: words::to_words(run.net, &settings.vocabulary),
        payslips,
        run,
    };
    Ok(serde_json::to_value(response)?)
}

/// `gescom post`
///
/// Events in a batch are checked against each other's idempotency keys; the
/// same event listed twice is rejected.
pub fn post(settings: &TenantSettings, request: &PostRequest) -> anyhow::Result<Value> {
    let events: Vec<&BusinessEvent> = match request {
        PostRequest::Batch(events) => events.iter().collect(),
        PostRequest::Single(event) => vec![event.as_ref()],
    };

    let builder = settings.ledger_builder();
    let mut posted: HashSet<String> = HashSet::new();
    let mut entries = Vec::with_capacity(events.len());

    for event in events {
        let key = event.idempotency_key();
        ensure_not_posted(&key, |k| posted.contains(k))
            .map_err(|err| engine_error(err.into()))?;

        let entry = builder.build_from_event(event).map_err(engine_error)?;
        posted.insert(key);
        entries.push(entry);
    }

    let balances = AccountBalance::from_entries(&entries);
    let trial_balance = TrialBalance::from_balances(&balances);
    info!(entries = entries.len(), "Ledger entries built");

    let response = PostResponse {
        entries: entries
            .into_iter()
            .map(|entry| PostedEntry {
                totals: entry.totals(),
                entry,
            })
            .collect(),
        balances,
        trial_balance,
    };
    Ok(serde_json::to_value(response)?)
}

/// `gescom words`
pub fn words(settings: &TenantSettings, amount: Decimal) -> Value {
    json!({
        "amount": amount,
        "words": words::to_words(amount, &settings.vocabulary),
    })
}

fn engine_error(err: EngineError) -> anyhow::Error {
    AppError::from(err).into()
}
