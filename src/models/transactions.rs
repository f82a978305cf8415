use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::utils::dates::{serialize_date_or_empty, serialize_object_id};

/// Events hidden from the webapp ledger.
pub const EXCLUDED_EVENTS: [&str; 5] = [
    "RedeemRequestAlter",
    "RedeemRequestProcessed",
    "SettlementRedeemStableToken",
    "TransferFromMoC",
    "QueueDOC",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenName {
    #[serde(rename = "STABLE")]
    Stable,
    #[serde(rename = "RISKPRO")]
    RiskPro,
    #[serde(rename = "RISKPROX")]
    RiskProx,
}

impl TokenName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenName::Stable => "STABLE",
            TokenName::RiskPro => "RISKPRO",
            TokenName::RiskProx => "RISKPROX",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDocument {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub address: Option<String>,
    pub transaction_hash: Option<String>,
    pub block_number: Option<i64>,
    pub event: Option<String>,
    pub gas: Option<i64>,
    pub gas_price: Option<String>,
    pub gas_used: Option<i64>,
    #[serde(rename = "gasFeeRBTC")]
    pub gas_fee_rbtc: Option<String>,
    #[serde(rename = "RBTCAmount")]
    pub rbtc_amount: Option<String>,
    #[serde(rename = "RBTCTotal")]
    pub rbtc_total: Option<String>,
    #[serde(rename = "USDAmount")]
    pub usd_amount: Option<String>,
    #[serde(rename = "USDCommission")]
    pub usd_commission: Option<String>,
    #[serde(rename = "USDInterests")]
    pub usd_interests: Option<String>,
    #[serde(rename = "USDTotal")]
    pub usd_total: Option<String>,
    pub amount: Option<String>,
    #[serde(default, serialize_with = "serialize_date_or_empty")]
    pub confirmation_time: Option<DateTime>,
    #[serde(default, serialize_with = "serialize_date_or_empty")]
    pub created_at: Option<DateTime>,
    pub is_positive: Option<bool>,
    #[serde(default, serialize_with = "serialize_date_or_empty")]
    pub last_updated_at: Option<DateTime>,
    pub moc_commission_value: Option<String>,
    pub moc_price: Option<String>,
    pub process_logs: Option<bool>,
    pub rbtc_commission: Option<String>,
    pub rbtc_interests: Option<String>,
    pub reserve_price: Option<String>,
    pub status: Option<String>,
    pub token_involved: Option<String>,
    pub user_amount: Option<String>,
    pub confirming_percent: Option<i64>,
    pub other_address: Option<String>,
}

impl TransactionDocument {
    /// Redeems and outbound transfers reduce the holder's balance.
    pub fn is_outgoing(&self) -> bool {
        match self.event.as_deref() {
            Some(event) if event.contains("Redeem") => true,
            Some("Transfer") => self.is_positive == Some(false),
            _ => false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionsList {
    pub transactions: Vec<TransactionDocument>,
    pub count: usize,
    pub total: u64,
}
