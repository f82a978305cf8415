use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::utils::dates::{serialize_date, serialize_object_id, serialize_optional_date};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastBtcBridgeDocument {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub transfer_id: String,
    pub amount_satoshi: String,
    pub block_number: i64,
    pub btc_address: String,
    pub fee_satoshi: String,
    pub nonce: i64,
    pub process_logs: bool,
    pub rsk_address: String,
    pub status: i64,
    #[serde(serialize_with = "serialize_date")]
    pub timestamp: DateTime,
    pub transaction_hash: String,
    pub transaction_hash_last_updated: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, serialize_with = "serialize_optional_date")]
    pub updated: Option<DateTime>,
}

#[derive(Debug, Serialize)]
pub struct PegOutList {
    pub pegout_requests: Vec<FastBtcBridgeDocument>,
    pub count: usize,
    pub total: u64,
}
