//! Typed response bodies for the node's REST API.
//!
//! The node encodes 64-bit integers as JSON strings; [`U64`] decodes those.
//! Transaction payloads vary by type, so [`Transaction`] types the fields
//! every variant shares and keeps the rest as JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::AccountAddress;

// ==============================================================================
// String-Encoded u64
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct U64(pub u64);

impl From<u64> for U64 {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl From<U64> for u64 {
    fn from(n: U64) -> Self {
        n.0
    }
}

impl std::ops::Deref for U64 {
    type Target = u64;
    fn deref(&self) -> &u64 {
        &self.0
    }
}

impl fmt::Display for U64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for U64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for U64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        u64::from_str(&s)
            .map(Self)
            .map_err(|e| serde::de::Error::custom(format!("invalid u64 string `{s}`: {e}")))
    }
}

// ==============================================================================
// Ledger
// ==============================================================================

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerInfo {
    pub chain_id: u8,
    pub epoch: U64,
    pub ledger_version: U64,
    pub oldest_ledger_version: U64,
    pub ledger_timestamp: U64,
    pub node_role: String,
    pub oldest_block_height: U64,
    pub block_height: U64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasEstimation {
    pub gas_estimate: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprioritized_gas_estimate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prioritized_gas_estimate: Option<u64>,
}

// ==============================================================================
// Accounts
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    pub sequence_number: U64,
    pub authentication_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveModuleBytecode {
    pub bytecode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<serde_json::Value>,
}

// ==============================================================================
// Blocks and Transactions
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub block_height: U64,
    pub block_hash: String,
    pub block_timestamp: U64,
    pub first_version: U64,
    pub last_version: U64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
}

/// Any committed or pending transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: String,
    /// Absent while the transaction is pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<U64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<AccountAddress>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Transaction {
    pub fn is_pending(&self) -> bool {
        self.kind == "pending_transaction"
    }
}

// ==============================================================================
// Request Bodies
// ==============================================================================

/// Body of `POST /view`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<serde_json::Value>,
}

/// Body of `POST /tables/{handle}/item`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableItemRequest {
    pub key_type: String,
    pub value_type: String,
    pub key: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u64_decodes_from_string_only() {
        let n: U64 = serde_json::from_str(r#""18446744073709551615""#).expect("max u64");
        assert_eq!(*n, u64::MAX);
        assert!(serde_json::from_str::<U64>("12").is_err());
        assert!(serde_json::from_str::<U64>(r#""-1""#).is_err());
        assert_eq!(serde_json::to_string(&U64(7)).expect("serialize"), r#""7""#);
    }

    #[test]
    fn ledger_info_decodes_node_payload() {
        let info: LedgerInfo = serde_json::from_value(serde_json::json!({
            "chain_id": 4,
            "epoch": "2",
            "ledger_version": "1500",
            "oldest_ledger_version": "0",
            "ledger_timestamp": "1700000000000000",
            "node_role": "full_node",
            "oldest_block_height": "0",
            "block_height": "700",
            "git_hash": "abc123"
        }))
        .expect("valid ledger info");
        assert_eq!(info.chain_id, 4);
        assert_eq!(*info.ledger_version, 1500);
    }

    #[test]
    fn transaction_keeps_variant_fields() {
        let tx: Transaction = serde_json::from_value(serde_json::json!({
            "type": "user_transaction",
            "hash": "0xabc",
            "version": "10",
            "success": true,
            "vm_status": "Executed successfully",
            "sender": "0x1",
            "sequence_number": "3",
            "payload": { "function": "0x1::coin::transfer" }
        }))
        .expect("valid transaction");

        assert_eq!(tx.version, Some(U64(10)));
        assert!(!tx.is_pending());
        assert_eq!(tx.sender.map(|a| a.short_form()).as_deref(), Some("0x1"));
        assert_eq!(tx.details["sequence_number"], "3");
        assert!(tx.details.contains_key("payload"));
    }

    #[test]
    fn pending_transaction_has_no_version() {
        let tx: Transaction = serde_json::from_value(serde_json::json!({
            "type": "pending_transaction",
            "hash": "0xdef"
        }))
        .expect("valid pending transaction");
        assert!(tx.is_pending());
        assert_eq!(tx.version, None);
    }
}
