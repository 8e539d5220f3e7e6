//! Shared test helpers for `ledger-client-core` unit tests.
//!
//! Builders for dummy addresses, node payloads and clients wired to a
//! [`MockTransport`], so tests across modules share one source of truth.

use std::sync::Arc;

use crate::address::{AccountAddress, ADDRESS_LENGTH};
use crate::client::LedgerClient;
use crate::config::ClientConfig;
use crate::transport::mock::MockTransport;

pub const TEST_NODE_URL: &str = "https://node.example/v1";

// ==============================================================================
// Address Helpers
// ==============================================================================

/// Create a deterministic address whose last byte is `b`, so its short form
/// is `0x{b:x}`.
pub fn address_from_byte(b: u8) -> AccountAddress {
    let mut bytes = [0u8; ADDRESS_LENGTH];
    bytes[ADDRESS_LENGTH - 1] = b;
    AccountAddress::new(bytes)
}

// ==============================================================================
// Client Builders
// ==============================================================================

pub fn test_config() -> ClientConfig {
    ClientConfig::new(TEST_NODE_URL).expect("test node url is valid")
}

pub fn mock_client(transport: Arc<MockTransport>) -> LedgerClient {
    LedgerClient::with_transport(test_config(), transport)
}

// ==============================================================================
// Payload Builders
// ==============================================================================

pub fn ledger_info_json(chain_id: u8) -> serde_json::Value {
    serde_json::json!({
        "chain_id": chain_id,
        "epoch": "1",
        "ledger_version": "1000",
        "oldest_ledger_version": "0",
        "ledger_timestamp": "1700000000000000",
        "node_role": "full_node",
        "oldest_block_height": "0",
        "block_height": "400"
    })
}

pub fn block_json(height: u64) -> serde_json::Value {
    serde_json::json!({
        "block_height": height.to_string(),
        "block_hash": format!("0x{height:064x}"),
        "block_timestamp": "1700000000000000",
        "first_version": (height * 10).to_string(),
        "last_version": (height * 10 + 9).to_string()
    })
}
