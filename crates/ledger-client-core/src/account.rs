//! Account queries: account data, resources, modules and transactions.

use reqwest::Method;

use crate::address::AccountAddress;
use crate::client::LedgerClient;
use crate::error::ClientError;
use crate::request::{
    QueryOptions, RangeOptions, PARAM_LEDGER_VERSION, PARAM_LIMIT, PARAM_START,
};
use crate::types::{AccountData, MoveModuleBytecode, MoveResource, Transaction};

impl LedgerClient {
    pub async fn get_account(
        &self,
        address: &AccountAddress,
        options: &QueryOptions,
    ) -> Result<AccountData, ClientError> {
        let request = self
            .request(Method::GET, format!("accounts/{address}"))
            .param(PARAM_LEDGER_VERSION, options.ledger_version)
            .overrides(self.call_overrides(options.overrides.as_ref()))
            .build();
        self.send(&request).await
    }

    /// Every resource under `address`, following the cursor across pages.
    pub async fn get_account_resources(
        &self,
        address: &AccountAddress,
        options: &QueryOptions,
    ) -> Result<Vec<MoveResource>, ClientError> {
        let request = self
            .request(Method::GET, format!("accounts/{address}/resources"))
            .param(PARAM_LEDGER_VERSION, options.ledger_version)
            .param(PARAM_LIMIT, options.limit)
            .overrides(self.call_overrides(options.overrides.as_ref()))
            .build();
        self.send_paginated(request).await
    }

    /// One resource by its Move type tag, e.g. `0x1::account::Account`.
    pub async fn get_account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
        options: &QueryOptions,
    ) -> Result<MoveResource, ClientError> {
        let request = self
            .request(
                Method::GET,
                format!("accounts/{address}/resource/{resource_type}"),
            )
            .param(PARAM_LEDGER_VERSION, options.ledger_version)
            .overrides(self.call_overrides(options.overrides.as_ref()))
            .build();
        self.send(&request).await
    }

    /// Every module published under `address`, following the cursor.
    pub async fn get_account_modules(
        &self,
        address: &AccountAddress,
        options: &QueryOptions,
    ) -> Result<Vec<MoveModuleBytecode>, ClientError> {
        let request = self
            .request(Method::GET, format!("accounts/{address}/modules"))
            .param(PARAM_LEDGER_VERSION, options.ledger_version)
            .param(PARAM_LIMIT, options.limit)
            .overrides(self.call_overrides(options.overrides.as_ref()))
            .build();
        self.send_paginated(request).await
    }

    pub async fn get_account_module(
        &self,
        address: &AccountAddress,
        module_name: &str,
        options: &QueryOptions,
    ) -> Result<MoveModuleBytecode, ClientError> {
        let request = self
            .request(
                Method::GET,
                format!("accounts/{address}/module/{module_name}"),
            )
            .param(PARAM_LEDGER_VERSION, options.ledger_version)
            .overrides(self.call_overrides(options.overrides.as_ref()))
            .build();
        self.send(&request).await
    }

    /// Transactions sent by `address`, one page by sequence number offset.
    pub async fn get_account_transactions(
        &self,
        address: &AccountAddress,
        range: &RangeOptions,
    ) -> Result<Vec<Transaction>, ClientError> {
        let request = self
            .request(Method::GET, format!("accounts/{address}/transactions"))
            .param(PARAM_START, range.start)
            .param(PARAM_LIMIT, range.limit)
            .overrides(self.call_overrides(range.overrides.as_ref()))
            .build();
        self.send(&request).await
    }
}
