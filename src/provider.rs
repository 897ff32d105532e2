//! Wallet bridge client.
//!
//! The frame host exposes the user's wallet over an EIP-1193-style JSON-RPC
//! endpoint. `WalletProvider` is the raw client; `ChainSession` wraps it in a
//! shared handle and implements the collaborator traits the donation
//! controller is built against.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{hex, Address, U256};
use alloy_sol_types::SolCall;
use serde_json::{json, Value};
use thiserror::Error;

use crate::donation::{
    ChainSwitcher, ReceiptStatus, ReceiptWatcher, TransferSubmitter, WalletConnector,
};
use crate::erc20::ERC20;

/// EIP-1193: the user rejected the request.
const USER_REJECTED_CODE: i64 = 4001;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum ChainError {
    /// The signer explicitly declined in the wallet prompt.
    #[error("rejected by user")]
    UserRejected,
    /// Any other wallet RPC error; carries the server's message verbatim.
    #[error("{0}")]
    Rpc(String),
    #[error("network error: {0}")]
    Http(String),
    #[error("JSON parse error: {0}")]
    Json(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("wallet not connected")]
    NotConnected,
}

// ---------------------------------------------------------------------------
// WalletProvider
// ---------------------------------------------------------------------------

pub struct WalletProvider {
    http: reqwest::blocking::Client,
    url: String,
    account: Option<Address>,
    chain_id: Option<u64>,
}

impl WalletProvider {
    pub fn new(url: &str) -> Result<Self, ChainError> {
        // Connect and send prompts block on the user, so the timeout is long.
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ChainError::Http(e.to_string()))?;
        Ok(Self {
            http,
            url: url.to_string(),
            account: None,
            chain_id: None,
        })
    }

    fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        tracing::debug!(method, "wallet rpc");
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| ChainError::Http(e.to_string()))?;
        let v: Value = resp.json().map_err(|e| ChainError::Json(e.to_string()))?;
        rpc_result(v)
    }

    /// Prompt the wallet for account access and cache the active account
    /// and chain id.
    pub fn connect(&mut self) -> Result<Address, ChainError> {
        let result = self.call("eth_requestAccounts", json!([]))?;
        let addr_str = result
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| ChainError::InvalidResponse("no accounts returned".into()))?;
        let addr: Address = addr_str
            .parse()
            .map_err(|_| ChainError::InvalidResponse(format!("bad account address: {addr_str}")))?;
        self.account = Some(addr);

        let chain = self.call("eth_chainId", json!([]))?;
        let chain_hex = chain
            .as_str()
            .ok_or_else(|| ChainError::InvalidResponse("missing chain id".into()))?;
        self.chain_id = Some(parse_hex_u64(chain_hex)?);

        tracing::info!(account = %addr, chain_id = ?self.chain_id, "wallet connected");
        Ok(addr)
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn switch_chain(&mut self, chain_id: u64) -> Result<(), ChainError> {
        self.call(
            "wallet_switchEthereumChain",
            json!([{ "chainId": format!("{chain_id:#x}") }]),
        )?;
        self.chain_id = Some(chain_id);
        Ok(())
    }

    /// Submit an ERC20 transfer through the wallet. Returns the transaction
    /// hash once the user has signed and the wallet has broadcast it.
    pub fn send_transfer(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<String, ChainError> {
        let from = self.account.ok_or(ChainError::NotConnected)?;
        let data = ERC20::transferCall {
            recipient: to,
            amount,
        }
        .abi_encode();

        let tx = json!({
            "from": from.to_string(),
            "to": token.to_string(),
            "data": hex::encode_prefixed(&data),
        });
        let result = self.call("eth_sendTransaction", json!([tx]))?;
        result
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| ChainError::InvalidResponse("missing transaction hash".into()))
    }

    pub fn transaction_receipt(&self, tx_hash: &str) -> Result<ReceiptStatus, ChainError> {
        let result = self.call("eth_getTransactionReceipt", json!([tx_hash]))?;
        receipt_status(&result)
    }
}

// ---------------------------------------------------------------------------
// ChainSession — shared handle implementing the collaborator traits
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct ChainSession {
    rpc_url: String,
    provider: Arc<Mutex<Option<WalletProvider>>>,
}

impl ChainSession {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            provider: Arc::new(Mutex::new(None)),
        }
    }

    fn with_provider<T>(
        &self,
        f: impl FnOnce(&mut WalletProvider) -> Result<T, ChainError>,
    ) -> Result<T, ChainError> {
        let mut guard = self.provider.lock().unwrap();
        if guard.is_none() {
            *guard = Some(WalletProvider::new(&self.rpc_url)?);
        }
        f(guard.as_mut().unwrap())
    }

    /// Connect and return the active account, for the connection indicator.
    pub fn connect(&self) -> Result<Address, ChainError> {
        self.with_provider(|p| p.connect())
    }

    pub fn account(&self) -> Option<Address> {
        self.provider.lock().unwrap().as_ref().and_then(|p| p.account())
    }

    pub fn active_chain_id(&self) -> Option<u64> {
        self.provider.lock().unwrap().as_ref().and_then(|p| p.chain_id())
    }
}

impl WalletConnector for ChainSession {
    fn is_connected(&self) -> bool {
        self.provider
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|p| p.account().is_some())
    }

    fn chain_id(&self) -> Option<u64> {
        self.provider.lock().unwrap().as_ref().and_then(|p| p.chain_id())
    }

    fn request_connection(&self) -> Result<(), ChainError> {
        self.connect().map(|_| ())
    }
}

impl ChainSwitcher for ChainSession {
    fn switch_chain(&self, chain_id: u64) -> Result<(), ChainError> {
        self.with_provider(|p| p.switch_chain(chain_id))
    }
}

impl TransferSubmitter for ChainSession {
    fn submit_transfer(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<String, ChainError> {
        self.with_provider(|p| p.send_transfer(token, to, amount))
    }
}

impl ReceiptWatcher for ChainSession {
    fn receipt_status(&self, tx_hash: &str) -> Result<ReceiptStatus, ChainError> {
        self.with_provider(|p| p.transaction_receipt(tx_hash))
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn rpc_result(v: Value) -> Result<Value, ChainError> {
    if let Some(err) = v.get("error") {
        let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown RPC error");
        if code == USER_REJECTED_CODE {
            return Err(ChainError::UserRejected);
        }
        return Err(ChainError::Rpc(message.to_string()));
    }
    v.get("result")
        .cloned()
        .ok_or_else(|| ChainError::InvalidResponse("missing result".into()))
}

fn receipt_status(result: &Value) -> Result<ReceiptStatus, ChainError> {
    // A null receipt means the transaction is not yet mined.
    if result.is_null() {
        return Ok(ReceiptStatus::Pending);
    }
    match result.get("status").and_then(Value::as_str) {
        Some("0x1") => Ok(ReceiptStatus::Confirmed),
        Some("0x0") => Ok(ReceiptStatus::Reverted),
        _ => Err(ChainError::InvalidResponse("missing receipt status".into())),
    }
}

fn parse_hex_u64(s: &str) -> Result<u64, ChainError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16)
        .map_err(|_| ChainError::InvalidResponse(format!("bad hex quantity: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_rejection_code_maps_to_user_rejected() {
        let v = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": 4001, "message": "User rejected the request." }
        });
        assert!(matches!(rpc_result(v), Err(ChainError::UserRejected)));
    }

    #[test]
    fn other_rpc_errors_keep_server_message() {
        let v = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "insufficient funds" }
        });
        match rpc_result(v) {
            Err(ChainError::Rpc(msg)) => assert_eq!(msg, "insufficient funds"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rpc_error_renders_raw_message() {
        let err = ChainError::Rpc("execution reverted".into());
        assert_eq!(err.to_string(), "execution reverted");
    }

    #[test]
    fn null_receipt_is_pending() {
        assert!(matches!(
            receipt_status(&Value::Null),
            Ok(ReceiptStatus::Pending)
        ));
    }

    #[test]
    fn receipt_status_field_decides_outcome() {
        let confirmed = json!({ "status": "0x1", "blockNumber": "0x10" });
        assert!(matches!(
            receipt_status(&confirmed),
            Ok(ReceiptStatus::Confirmed)
        ));

        let reverted = json!({ "status": "0x0", "blockNumber": "0x10" });
        assert!(matches!(
            receipt_status(&reverted),
            Ok(ReceiptStatus::Reverted)
        ));
    }

    #[test]
    fn chain_id_hex_decoding() {
        assert_eq!(parse_hex_u64("0x2105").unwrap(), 8453);
        assert_eq!(parse_hex_u64("0x1").unwrap(), 1);
        assert!(parse_hex_u64("eth").is_err());
    }
}
