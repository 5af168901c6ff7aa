use std::sync::Mutex;

use async_trait::async_trait;

use crate::wallet::{Address, TransferRequest, TxHash, WalletError, WalletProvider};

/// Scriptable [`WalletProvider`] that records every transfer it is asked for.
pub struct MockWallet {
    accounts: Vec<Address>,
    failure: Mutex<Option<WalletError>>,
    sent: Mutex<Vec<TransferRequest>>,
}

impl MockWallet {
    pub fn new(account: Address) -> Self {
        Self::with_accounts(vec![account])
    }

    pub fn with_accounts(accounts: Vec<Address>) -> Self {
        Self {
            accounts,
            failure: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Every later request fails with `error`.
    pub fn fail_with(&self, error: WalletError) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    /// The user clicks "reject" in the wallet popup.
    pub fn rejecting(self) -> Self {
        self.fail_with(WalletError::UserRejected);
        self
    }

    pub fn sent(&self) -> Vec<TransferRequest> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn check(&self) -> Result<(), WalletError> {
        match self.failure.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.check()?;
        Ok(self.accounts.clone())
    }

    async fn send_transfer(&self, request: TransferRequest) -> Result<TxHash, WalletError> {
        self.check()?;
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        Ok(TxHash::random())
    }
}
