use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Current time as an ISO-8601 string with millisecond precision, the format
/// every persisted timestamp uses. Fixed-width, so lexicographic order is
/// chronological order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Per-user running profit balance. At most one record per user; updates
/// replace the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitRecord {
    pub user_id: String,
    pub profits: f64,
}

/// Ledger entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Profit,
    WithdrawalRequest,
    Deposit,
}

/// Append-only ledger entry, one per mutating operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub user_id: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    pub timestamp: String,
}

/// Pending withdrawal request. The `status` field is written as "pending" and
/// never advanced here; settlement happens outside this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRecord {
    pub user_id: String,
    pub amount: f64,
    pub address: String,
    pub status: String,
    pub timestamp: String,
}

/// Admin-entered deposit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    pub user_id: String,
    pub amount: f64,
    pub currency: String,
    /// "N/A" when the admin did not supply one
    pub tx_id: String,
    pub timestamp: String,
}
