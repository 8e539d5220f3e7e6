//! Ledger, block, transaction and view queries.

use reqwest::Method;

use crate::address::HexString;
use crate::client::LedgerClient;
use crate::error::ClientError;
use crate::request::{
    CallOverrides, RangeOptions, PARAM_LEDGER_VERSION, PARAM_LIMIT, PARAM_START,
    PARAM_WITH_TRANSACTIONS,
};
use crate::types::{
    Block, GasEstimation, LedgerInfo, TableItemRequest, Transaction, ViewRequest,
};

impl LedgerClient {
    pub async fn get_ledger_info(
        &self,
        overrides: Option<&CallOverrides>,
    ) -> Result<LedgerInfo, ClientError> {
        let request = self
            .request(Method::GET, "")
            .overrides(self.call_overrides(overrides))
            .build();
        self.send(&request).await
    }

    /// Chain id of the node, fetched on first success and reused for the
    /// lifetime of this client.
    pub async fn get_chain_id(&self) -> Result<u8, ClientError> {
        self.chain_id
            .get_or_try_init(|| async {
                let info = self.get_ledger_info(None).await?;
                Ok(info.chain_id)
            })
            .await
    }

    pub async fn get_block_by_height(
        &self,
        height: u64,
        with_transactions: bool,
        overrides: Option<&CallOverrides>,
    ) -> Result<Block, ClientError> {
        let request = self
            .request(Method::GET, format!("blocks/by_height/{height}"))
            .param(PARAM_WITH_TRANSACTIONS, Some(with_transactions))
            .overrides(self.call_overrides(overrides))
            .build();
        self.send(&request).await
    }

    pub async fn get_block_by_version(
        &self,
        version: u64,
        with_transactions: bool,
        overrides: Option<&CallOverrides>,
    ) -> Result<Block, ClientError> {
        let request = self
            .request(Method::GET, format!("blocks/by_version/{version}"))
            .param(PARAM_WITH_TRANSACTIONS, Some(with_transactions))
            .overrides(self.call_overrides(overrides))
            .build();
        self.send(&request).await
    }

    pub async fn get_transaction_by_hash(
        &self,
        hash: &str,
        overrides: Option<&CallOverrides>,
    ) -> Result<Transaction, ClientError> {
        let hash = HexString::ensure(hash)?;
        let request = self
            .request(Method::GET, format!("transactions/by_hash/{hash}"))
            .overrides(self.call_overrides(overrides))
            .build();
        self.send(&request).await
    }

    pub async fn get_transaction_by_version(
        &self,
        version: u64,
        overrides: Option<&CallOverrides>,
    ) -> Result<Transaction, ClientError> {
        let request = self
            .request(Method::GET, format!("transactions/by_version/{version}"))
            .overrides(self.call_overrides(overrides))
            .build();
        self.send(&request).await
    }

    /// One page of committed transactions starting at ledger version `start`.
    pub async fn get_transactions(
        &self,
        range: &RangeOptions,
    ) -> Result<Vec<Transaction>, ClientError> {
        let request = self
            .request(Method::GET, "transactions")
            .param(PARAM_START, range.start)
            .param(PARAM_LIMIT, range.limit)
            .overrides(self.call_overrides(range.overrides.as_ref()))
            .build();
        self.send(&request).await
    }

    pub async fn estimate_gas_price(
        &self,
        overrides: Option<&CallOverrides>,
    ) -> Result<GasEstimation, ClientError> {
        let request = self
            .request(Method::GET, "estimate_gas_price")
            .overrides(self.call_overrides(overrides))
            .build();
        self.send(&request).await
    }

    /// Run a Move view function and return its return values.
    pub async fn view(
        &self,
        view: &ViewRequest,
        ledger_version: Option<u64>,
        overrides: Option<&CallOverrides>,
    ) -> Result<Vec<serde_json::Value>, ClientError> {
        let request = self
            .request(Method::POST, "view")
            .param(PARAM_LEDGER_VERSION, ledger_version)
            .json_body(serde_json::json!({
                "function": view.function,
                "type_arguments": view.type_arguments,
                "arguments": view.arguments,
            }))
            .overrides(self.call_overrides(overrides))
            .build();
        self.send(&request).await
    }

    pub async fn get_table_item(
        &self,
        handle: &str,
        item: &TableItemRequest,
        ledger_version: Option<u64>,
        overrides: Option<&CallOverrides>,
    ) -> Result<serde_json::Value, ClientError> {
        let handle = HexString::ensure(handle)?;
        let request = self
            .request(Method::POST, format!("tables/{handle}/item"))
            .param(PARAM_LEDGER_VERSION, ledger_version)
            .json_body(serde_json::json!({
                "key_type": item.key_type,
                "value_type": item.value_type,
                "key": item.key,
            }))
            .overrides(self.call_overrides(overrides))
            .build();
        self.send(&request).await
    }
}
