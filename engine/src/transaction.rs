//! Payout logs and wallet-matched receipt aggregation.

#![allow(clippy::arithmetic_side_effects)]

use {
    crate::{
        config::DEFAULT_DISPLAY_OFFSET_HOURS,
        datetime::{self, LastPayout},
        error::EngineError,
        snapshot::{self, SourceStatus},
    },
    chrono::{DateTime, FixedOffset, Utc},
    log::*,
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
    std::collections::HashMap,
};

/// One on-chain bonus transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    pub from: String,
    pub to: String,
    /// Always finite and non-negative.
    pub value_out_pol: f64,
    /// `None` when the source date could not be parsed; the row still counts
    /// toward sums.
    pub timestamp: Option<DateTime<Utc>>,
}

impl PayoutTransaction {
    pub fn new(to: impl Into<String>, value_out_pol: f64, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            hash: None,
            from: String::new(),
            to: to.into(),
            value_out_pol: sanitize_amount(value_out_pol),
            timestamp,
        }
    }

    pub fn is_to(&self, wallet: &str) -> bool {
        wallet_eq(&self.to, wallet)
    }
}

/// Case-insensitive wallet comparison. No trimming or checksum validation.
pub fn wallet_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

fn wallet_key(wallet: &str) -> String {
    wallet.to_lowercase()
}

/// Polygonscan CSV-to-JSON export row.
#[derive(Debug, Deserialize)]
struct PolygonscanRow {
    #[serde(rename = "Transaction Hash", default)]
    hash: Option<String>,
    #[serde(rename = "DateTime (UTC)", default)]
    date_time: Option<String>,
    #[serde(rename = "From", default)]
    from: Option<String>,
    #[serde(rename = "To", default)]
    to: Option<String>,
    #[serde(rename = "Value_OUT(POL)", default)]
    value_out: Option<Value>,
}

/// Row of the PR Bonus send report.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendReportRow {
    #[serde(default)]
    wallet_address: Option<String>,
    #[serde(default)]
    sent_amount: Option<Value>,
    #[serde(default)]
    sent_date: Option<String>,
}

/// Read an amount that may be a JSON number or a numeric string with
/// thousands separators. Anything unusable is 0.
pub fn parse_amount(raw: Option<&Value>) -> f64 {
    let parsed = match raw {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
        _ => {
            if let Some(value) = raw {
                debug!("unusable payout amount {value}, counting as 0");
            }
            0.0
        }
    }
}

fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount >= 0.0 {
        amount
    } else {
        0.0
    }
}

fn required_wallet(index: usize, field: &str, wallet: Option<String>) -> Result<String, EngineError> {
    match wallet {
        Some(wallet) if !wallet.trim().is_empty() => Ok(wallet),
        _ => Err(EngineError::MalformedRecord {
            index,
            reason: format!("missing recipient `{field}`"),
        }),
    }
}

fn transaction_from_row(
    index: usize,
    row: Value,
    report_offset: FixedOffset,
) -> Result<PayoutTransaction, EngineError> {
    let malformed = |reason: String| EngineError::MalformedRecord { index, reason };
    let fields = match row {
        Value::Object(fields) => fields,
        other => {
            return Err(malformed(format!(
                "expected an object, found {}",
                snapshot::value_kind(&other)
            )))
        }
    };

    if fields.contains_key("To") {
        polygonscan_transaction(index, fields)
    } else if fields.contains_key("walletAddress") {
        send_report_transaction(index, fields, report_offset)
    } else {
        Err(malformed("neither `To` nor `walletAddress` present".to_string()))
    }
}

fn polygonscan_transaction(
    index: usize,
    fields: Map<String, Value>,
) -> Result<PayoutTransaction, EngineError> {
    let row: PolygonscanRow = serde_json::from_value(Value::Object(fields)).map_err(|err| {
        EngineError::MalformedRecord {
            index,
            reason: err.to_string(),
        }
    })?;
    let to = required_wallet(index, "To", row.to)?;
    let timestamp = row.date_time.as_deref().and_then(datetime::parse_utc_timestamp);
    if timestamp.is_none() {
        debug!("row {index}: unparseable `DateTime (UTC)` {:?}", row.date_time);
    }
    Ok(PayoutTransaction {
        hash: row.hash.filter(|hash| !hash.is_empty()),
        from: row.from.unwrap_or_default(),
        to,
        value_out_pol: parse_amount(row.value_out.as_ref()),
        timestamp,
    })
}

fn send_report_transaction(
    index: usize,
    fields: Map<String, Value>,
    offset: FixedOffset,
) -> Result<PayoutTransaction, EngineError> {
    let row: SendReportRow = serde_json::from_value(Value::Object(fields)).map_err(|err| {
        EngineError::MalformedRecord {
            index,
            reason: err.to_string(),
        }
    })?;
    let to = required_wallet(index, "walletAddress", row.wallet_address)?;
    let timestamp = row
        .sent_date
        .as_deref()
        .and_then(|raw| datetime::parse_report_timestamp(raw, offset));
    if timestamp.is_none() {
        debug!("row {index}: unparseable `sentDate` {:?}", row.sent_date);
    }
    Ok(PayoutTransaction {
        hash: None,
        from: String::new(),
        to,
        value_out_pol: parse_amount(row.sent_amount.as_ref()),
        timestamp,
    })
}

/// Everything a log says about payouts to one wallet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipts {
    pub total: f64,
    pub matched: usize,
    pub last_payout: LastPayout,
}

/// A flat payout log, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionLog {
    transactions: Vec<PayoutTransaction>,
    malformed: usize,
    status: SourceStatus,
}

impl TransactionLog {
    pub fn new(transactions: Vec<PayoutTransaction>) -> Self {
        Self {
            transactions,
            malformed: 0,
            status: SourceStatus::Loaded,
        }
    }

    /// Empty log standing in for a source that could not be fetched.
    pub fn unavailable() -> Self {
        Self {
            status: SourceStatus::Unavailable,
            ..Self::default()
        }
    }

    /// Parse a log in either row format, reading send-report dates at the
    /// default display offset.
    pub fn parse(json: &str) -> Result<Self, EngineError> {
        let offset = datetime::display_offset(DEFAULT_DISPLAY_OFFSET_HOURS)
            .unwrap_or_else(datetime::utc_offset);
        Self::parse_with_offset(json, offset)
    }

    pub fn parse_with_offset(json: &str, report_offset: FixedOffset) -> Result<Self, EngineError> {
        let rows = snapshot::parse_rows(json)?;
        Ok(Self::from_rows(rows, report_offset))
    }

    pub fn from_rows(rows: Vec<Value>, report_offset: FixedOffset) -> Self {
        let (transactions, malformed) = snapshot::ingest_rows("payout log", rows, |index, row| {
            transaction_from_row(index, row, report_offset)
        });
        Self {
            transactions,
            malformed,
            status: SourceStatus::Loaded,
        }
    }

    pub fn transactions(&self) -> &[PayoutTransaction] {
        &self.transactions
    }

    pub fn malformed(&self) -> usize {
        self.malformed
    }

    pub fn status(&self) -> SourceStatus {
        self.status
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum, count and latest timestamp of every payout to `wallet`.
    pub fn receipts_for(&self, wallet: &str) -> Receipts {
        self.transactions
            .iter()
            .filter(|tx| tx.is_to(wallet))
            .fold(Receipts::default(), |acc, tx| Receipts {
                total: acc.total + tx.value_out_pol,
                matched: acc.matched.saturating_add(1),
                last_payout: acc.last_payout.observe(tx.timestamp),
            })
    }

    /// Received totals keyed by lowercased recipient.
    pub fn totals_by_recipient(&self) -> HashMap<String, f64> {
        let mut totals: HashMap<String, f64> = HashMap::new();
        for tx in &self.transactions {
            let total = totals.entry(wallet_key(&tx.to)).or_insert(0.0);
            *total += tx.value_out_pol;
        }
        totals
    }
}
