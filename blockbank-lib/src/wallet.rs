//! Injected wallet abstraction.
//!
//! A [`WalletProvider`] is whatever the host page exposes for signing native
//! asset transfers (an EIP-1193 provider in the browser, a mock in tests).

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use rand::RngCore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BlockbankError, Result};

/// EIP-1193 "user rejected request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// Number of decimals of the native asset.
pub const NATIVE_DECIMALS: u32 = 18;

/// Errors reported by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("Web3 not initialized. Please install MetaMask.")]
    NotInstalled,

    #[error("Transaction rejected by user")]
    UserRejected,

    #[error("No accounts available. Please connect your wallet.")]
    NoAccounts,

    #[error("Transaction failed: {0}")]
    Network(String),
}

impl WalletError {
    /// Map a JSON-RPC error code to a wallet error.
    pub fn from_rpc_code(code: i64, message: impl Into<String>) -> Self {
        match code {
            USER_REJECTED_CODE => Self::UserRejected,
            _ => Self::Network(message.into()),
        }
    }
}

/// A `0x`-prefixed 20-byte account address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let hex_part = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .ok_or_else(|| BlockbankError::invalid_data("address", "missing 0x prefix"))?;
        if hex_part.len() != 40 {
            return Err(BlockbankError::invalid_data(
                "address",
                format!("expected 40 hex digits, got {}", hex_part.len()),
            ));
        }
        hex::decode(hex_part)
            .map_err(|e| BlockbankError::invalid_data("address", e.to_string()))?;
        Ok(Self(format!("0x{}", hex_part)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form, e.g. `0x1234...abcd`.
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[38..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = BlockbankError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = BlockbankError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// A transaction hash as returned by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// A random `0x` + 64 hex digit hash, used by the simulated payment path.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A native asset transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub from: Address,
    pub to: Address,
    pub value_wei: u128,
    pub gas: u64,
}

/// Wallet injected by the host environment.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait WalletProvider {
    /// Ask the user for account access. May be rejected.
    async fn request_accounts(&self) -> std::result::Result<Vec<Address>, WalletError>;

    /// Sign and broadcast a transfer, returning its hash.
    async fn send_transfer(
        &self,
        request: TransferRequest,
    ) -> std::result::Result<TxHash, WalletError>;
}

/// Convert a decimal amount of the native asset to wei.
///
/// ```
/// use blockbank_lib::wallet::to_wei;
/// assert_eq!(to_wei("1").unwrap(), 1_000_000_000_000_000_000);
/// assert_eq!(to_wei("0.5").unwrap(), 500_000_000_000_000_000);
/// assert!(to_wei("0").is_err());
/// ```
pub fn to_wei(amount: &str) -> Result<u128> {
    let value = Decimal::from_str(amount.trim())
        .map_err(|e| BlockbankError::invalid_data("amount", e.to_string()))?
        .normalize();
    if value <= Decimal::ZERO {
        return Err(BlockbankError::invalid_data("amount", "must be positive"));
    }
    let scale = value.scale();
    if scale > NATIVE_DECIMALS {
        return Err(BlockbankError::invalid_data(
            "amount",
            format!("more than {} decimal places", NATIVE_DECIMALS),
        ));
    }
    let mantissa = u128::try_from(value.mantissa())
        .map_err(|_| BlockbankError::invalid_data("amount", "out of range"))?;
    mantissa
        .checked_mul(10u128.pow(NATIVE_DECIMALS - scale))
        .ok_or_else(|| BlockbankError::invalid_data("amount", "out of range"))
}
