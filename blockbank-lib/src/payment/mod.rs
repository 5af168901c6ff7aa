//! The payment form.
//!
//! Two ways to pay: a simulated settlement that waits, rolls an
//! [`OutcomeDecider`] and records the result, or a real native-asset transfer
//! through an injected [`WalletProvider`].

mod outcome;

pub use outcome::{FixedOutcome, OutcomeDecider, RandomOutcome};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::delay::Delay;
use crate::notify::{BusyFlag, Notification};
use crate::session::{normalize_email, SessionHandle, User};
use crate::storage::RecordStore;
use crate::wallet::{to_wei, Address, TransferRequest, TxHash, WalletError, WalletProvider};
use crate::{BlockbankError, Result, SiteConfig};

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to send payments";
pub const RECIPIENT_NOT_FOUND_MESSAGE: &str =
    "Recipient not found. Please check the email address.";
pub const NETWORK_FAILURE_MESSAGE: &str = "Transaction failed due to network issues";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eth,
    Usdt,
    Usdc,
    Btc,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Self::Eth, Self::Usdt, Self::Usdc, Self::Btc];

    pub fn code(self) -> &'static str {
        match self {
            Self::Eth => "ETH",
            Self::Usdt => "USDT",
            Self::Usdc => "USDC",
            Self::Btc => "BTC",
        }
    }

    /// Name as shown in the currency picker.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Eth => "Ethereum (ETH)",
            Self::Usdt => "Tether (USDT)",
            Self::Usdc => "USD Coin (USDC)",
            Self::Btc => "Bitcoin (BTC)",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = BlockbankError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.code() == upper)
            .ok_or_else(|| BlockbankError::invalid_data("currency", s))
    }
}

/// The payment form as filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentForm {
    pub receiver_email: String,
    pub amount: String,
    pub currency: Option<Currency>,
}

impl Default for PaymentForm {
    fn default() -> Self {
        Self {
            receiver_email: String::new(),
            amount: String::new(),
            currency: Some(Currency::Eth),
        }
    }
}

impl PaymentForm {
    pub fn new(
        receiver_email: impl Into<String>,
        amount: impl Into<String>,
        currency: Currency,
    ) -> Self {
        Self {
            receiver_email: receiver_email.into(),
            amount: amount.into(),
            currency: Some(currency),
        }
    }

    /// Check the form, returning the parsed amount and currency.
    pub fn validate(&self) -> Result<(Decimal, Currency)> {
        if self.receiver_email.trim().is_empty() {
            return Err(BlockbankError::validation("Please enter recipient email"));
        }
        let amount = Decimal::from_str(self.amount.trim())
            .ok()
            .filter(|a| *a > Decimal::ZERO)
            .ok_or_else(|| BlockbankError::validation("Please enter a valid amount"))?;
        let currency = self
            .currency
            .ok_or_else(|| BlockbankError::validation("Please select a currency"))?;
        Ok((amount, currency))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

/// A row of `transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub status: TransactionStatus,
    #[serde(default)]
    pub transaction_hash: Option<TxHash>,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl TransactionRecord {
    pub fn new(sender_id: &str, receiver_id: &str, amount: Decimal, currency: Currency) -> Self {
        Self {
            id: crate::new_id(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            amount,
            currency,
            status: TransactionStatus::Pending,
            transaction_hash: None,
            created_at: crate::current_timestamp(),
            updated_at: None,
        }
    }

    /// A record created with a hash is already completed.
    pub fn with_hash(mut self, hash: TxHash) -> Self {
        self.transaction_hash = Some(hash);
        self.status = TransactionStatus::Completed;
        self
    }

    pub fn set_status(&mut self, status: TransactionStatus, hash: Option<TxHash>) {
        self.status = status;
        self.transaction_hash = hash;
        self.updated_at = Some(crate::current_timestamp());
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    pub fn direction_for(&self, user_id: &str) -> Direction {
        if self.sender_id == user_id {
            Direction::Sent
        } else {
            Direction::Received
        }
    }

    /// e.g. "Sent 1.5 ETH".
    pub fn summary_for(&self, user_id: &str) -> String {
        let verb = match self.direction_for(user_id) {
            Direction::Sent => "Sent",
            Direction::Received => "Received",
        };
        format!("{} {} {}", verb, self.amount, self.currency)
    }
}

/// Transactions involving `user_id`, newest first, at most `limit`.
///
/// Records with the same timestamp are ordered by position, later first.
pub fn select_recent(
    records: &[TransactionRecord],
    user_id: &str,
    limit: usize,
) -> Vec<TransactionRecord> {
    let mut matching: Vec<_> = records
        .iter()
        .rev()
        .filter(|r| r.involves(user_id))
        .cloned()
        .collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matching.truncate(limit);
    matching
}

/// A row of `crypto_wallets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoWallet {
    pub id: String,
    pub user_id: String,
    pub wallet_address: String,
    pub currency: Currency,
    #[serde(default)]
    pub balance: Option<Decimal>,
}

impl CryptoWallet {
    pub fn new(user_id: &str, wallet_address: impl Into<String>, currency: Currency) -> Self {
        Self {
            id: crate::new_id(),
            user_id: user_id.to_string(),
            wallet_address: wallet_address.into(),
            currency,
            balance: None,
        }
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = Some(balance);
        self
    }

    /// e.g. `0x742d35...38f44e`.
    pub fn short_address(&self) -> String {
        let addr = &self.wallet_address;
        if addr.len() <= 14 {
            return addr.clone();
        }
        match (addr.get(..8), addr.get(addr.len() - 6..)) {
            (Some(head), Some(tail)) => format!("{}...{}", head, tail),
            _ => addr.clone(),
        }
    }
}

fn payment_failed(transaction_id: Option<&str>, reason: &str) -> BlockbankError {
    BlockbankError::Payment {
        transaction_id: transaction_id.map(str::to_string),
        reason: reason.to_string(),
    }
}

/// The payment form component.
pub struct PaymentService<R, D> {
    records: Arc<R>,
    delay: D,
    outcome: Box<dyn OutcomeDecider>,
    config: SiteConfig,
    loading: BusyFlag,
}

impl<R, D> PaymentService<R, D>
where
    R: RecordStore + Send + Sync,
    D: Delay + Send + Sync,
{
    /// Service with a [`RandomOutcome`] at the configured success rate.
    pub fn new(records: Arc<R>, delay: D, config: SiteConfig) -> Self {
        let outcome = RandomOutcome::new(config.success_rate);
        Self::with_outcome(records, delay, Box::new(outcome), config)
    }

    pub fn with_outcome(
        records: Arc<R>,
        delay: D,
        outcome: Box<dyn OutcomeDecider>,
        config: SiteConfig,
    ) -> Self {
        Self {
            records,
            delay,
            outcome,
            config,
            loading: BusyFlag::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_busy()
    }

    /// Simulated payment.
    pub async fn send(&self, session: &SessionHandle, form: &PaymentForm) -> Notification {
        let Some(user) = session.current_user() else {
            return Notification::error(LOGIN_REQUIRED_MESSAGE);
        };
        let Some(_loading) = self.loading.try_acquire() else {
            return Notification::info("Payment already in progress");
        };

        match self.send_for(&user, form).await {
            Ok(record) => {
                info!(id = %record.id, "payment completed");
                Notification::success(format!(
                    "Payment of {} {} sent successfully!",
                    form.amount.trim(),
                    record.currency
                ))
            }
            Err(e) => {
                warn!(user_id = %user.id, "payment failed: {}", e);
                Notification::from(&e)
            }
        }
    }

    /// Run the simulated payment for `user` and return the final record.
    pub async fn send_for(&self, user: &User, form: &PaymentForm) -> Result<TransactionRecord> {
        let (amount, currency) = form.validate()?;
        let receiver = self.find_receiver(&form.receiver_email).await?;

        let record = TransactionRecord::new(&user.id, &receiver, amount, currency);
        let mut record = self.records.insert_transaction(record).await?;
        debug!(id = %record.id, "pending transaction recorded");

        match self.settle(&record.id).await {
            Ok(hash) => {
                record.set_status(TransactionStatus::Completed, Some(hash));
                Ok(record)
            }
            Err(e) => {
                if let Err(update) = self
                    .records
                    .update_transaction_status(&record.id, TransactionStatus::Failed, None)
                    .await
                {
                    warn!(id = %record.id, "could not mark transaction failed: {}", update);
                }
                Err(e)
            }
        }
    }

    async fn settle(&self, id: &str) -> Result<TxHash> {
        self.delay.sleep(self.config.payment_delay()).await;
        if !self.outcome.succeeds() {
            debug!(%id, "simulated settlement failed");
            return Err(payment_failed(Some(id), NETWORK_FAILURE_MESSAGE));
        }
        let hash = TxHash::random();
        self.records
            .update_transaction_status(id, TransactionStatus::Completed, Some(hash.clone()))
            .await?;
        Ok(hash)
    }

    /// Native-asset transfer through the injected wallet.
    pub async fn send_with_wallet<W>(
        &self,
        session: &SessionHandle,
        form: &PaymentForm,
        wallet: &W,
        receiver_address: &str,
    ) -> Notification
    where
        W: WalletProvider,
    {
        let Some(user) = session.current_user() else {
            return Notification::error(LOGIN_REQUIRED_MESSAGE);
        };
        let Some(_loading) = self.loading.try_acquire() else {
            return Notification::info("Payment already in progress");
        };

        match self
            .send_with_wallet_for(&user, form, wallet, receiver_address)
            .await
        {
            Ok(record) => {
                info!(id = %record.id, "wallet transfer recorded");
                Notification::success(format!(
                    "Payment of {} {} sent successfully!",
                    form.amount.trim(),
                    record.currency
                ))
            }
            Err(e) => {
                warn!(user_id = %user.id, "wallet transfer failed: {}", e);
                Notification::from(&e)
            }
        }
    }

    pub async fn send_with_wallet_for<W>(
        &self,
        user: &User,
        form: &PaymentForm,
        wallet: &W,
        receiver_address: &str,
    ) -> Result<TransactionRecord>
    where
        W: WalletProvider,
    {
        let (amount, currency) = form.validate()?;
        if currency != Currency::Eth {
            return Err(BlockbankError::validation(
                "Wallet transfers are only available for ETH",
            ));
        }
        let to = Address::parse(receiver_address)
            .map_err(|_| BlockbankError::validation("Please enter a valid wallet address"))?;
        let receiver = self.find_receiver(&form.receiver_email).await?;
        let value_wei = to_wei(&amount.to_string())?;

        let accounts = wallet.request_accounts().await?;
        let from = accounts.into_iter().next().ok_or(WalletError::NoAccounts)?;
        debug!(%from, %to, value_wei, "sending transfer");

        let hash = wallet
            .send_transfer(TransferRequest {
                from,
                to,
                value_wei,
                gas: self.config.transfer_gas,
            })
            .await?;

        let record = TransactionRecord::new(&user.id, &receiver, amount, currency).with_hash(hash);
        self.records.insert_transaction(record).await
    }

    /// "Connect Wallet" button. `None` when no wallet is injected.
    pub async fn connect_wallet<W>(&self, wallet: Option<&W>) -> Notification
    where
        W: WalletProvider,
    {
        let Some(wallet) = wallet else {
            return Notification::error("Please install MetaMask to connect your wallet");
        };
        match wallet.request_accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(account) => {
                    Notification::success(format!("Connected to wallet: {}", account.short()))
                }
                None => Notification::error("Failed to connect wallet"),
            },
            Err(e) => {
                warn!("wallet connection failed: {}", e);
                Notification::error("Failed to connect wallet")
            }
        }
    }

    /// Latest transactions for the signed-in user. Empty on error.
    pub async fn recent_transactions(&self, session: &SessionHandle) -> Vec<TransactionRecord> {
        let Some(user) = session.current_user() else {
            return Vec::new();
        };
        self.records
            .recent_transactions(&user.id, self.config.recent_transaction_limit)
            .await
            .unwrap_or_else(|e| {
                warn!("could not load transactions: {}", e);
                Vec::new()
            })
    }

    /// Wallets of the signed-in user.
    pub async fn wallets(
        &self,
        session: &SessionHandle,
    ) -> std::result::Result<Vec<CryptoWallet>, Notification> {
        let Some(user) = session.current_user() else {
            return Ok(Vec::new());
        };
        self.records.wallets_for(&user.id).await.map_err(|e| {
            warn!("could not load wallets: {}", e);
            Notification::error("Failed to load wallets")
        })
    }

    /// Register a wallet address for the signed-in user.
    pub async fn add_wallet(
        &self,
        session: &SessionHandle,
        wallet_address: &str,
        currency: Currency,
        balance: Option<Decimal>,
    ) -> Notification {
        let user = match session.require_user() {
            Ok(user) => user,
            Err(e) => return Notification::from(&e),
        };
        let mut wallet = CryptoWallet::new(&user.id, wallet_address.trim(), currency);
        wallet.balance = balance;
        match self.records.insert_wallet(wallet).await {
            Ok(wallet) => Notification::success(format!(
                "Added {} wallet {}",
                wallet.currency,
                wallet.short_address()
            )),
            Err(e) => {
                warn!("could not add wallet: {}", e);
                Notification::from(&e)
            }
        }
    }

    async fn find_receiver(&self, email: &str) -> Result<String> {
        let email = normalize_email(email);
        match self.records.find_profile_by_email(&email).await {
            Ok(Some(profile)) => Ok(profile.id),
            Ok(None) => Err(payment_failed(None, RECIPIENT_NOT_FOUND_MESSAGE)),
            Err(e) => {
                debug!("profile lookup failed: {}", e);
                Err(payment_failed(None, RECIPIENT_NOT_FOUND_MESSAGE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(sender: &str, receiver: &str, created_at: i64) -> TransactionRecord {
        let mut r = TransactionRecord::new(sender, receiver, dec!(1), Currency::Eth);
        r.created_at = created_at;
        r
    }

    #[test]
    fn test_form_validation_messages() {
        let mut form = PaymentForm::new("", "1", Currency::Eth);
        assert_eq!(
            form.validate().unwrap_err().user_message(),
            "Please enter recipient email"
        );

        form.receiver_email = "bob@example.com".into();
        for bad in ["", "0", "-3", "abc"] {
            form.amount = bad.into();
            assert_eq!(
                form.validate().unwrap_err().user_message(),
                "Please enter a valid amount"
            );
        }

        form.amount = "0.25".into();
        form.currency = None;
        assert_eq!(
            form.validate().unwrap_err().user_message(),
            "Please select a currency"
        );

        form.currency = Some(Currency::Usdc);
        assert_eq!(form.validate().unwrap(), (dec!(0.25), Currency::Usdc));
    }

    #[test]
    fn test_currency_names() {
        assert_eq!(Currency::Usdt.display_name(), "Tether (USDT)");
        assert_eq!("btc".parse::<Currency>().unwrap(), Currency::Btc);
        assert_eq!(serde_json::to_string(&Currency::Usdc).unwrap(), "\"USDC\"");
    }

    #[test]
    fn test_select_recent_orders_and_limits() {
        let records = vec![
            record("alice", "bob", 10),
            record("carol", "dave", 20),
            record("bob", "alice", 30),
            record("alice", "carol", 30),
            record("alice", "bob", 5),
        ];
        let recent = select_recent(&records, "alice", 3);
        let times: Vec<_> = recent.iter().map(|r| r.created_at).collect();
        assert_eq!(times, vec![30, 30, 10]);
        // Same timestamp: the later insert comes first.
        assert_eq!(recent[0].receiver_id, "carol");
        assert_eq!(recent[1].summary_for("alice"), "Received 1 ETH");
    }

    #[test]
    fn test_short_wallet_address() {
        let wallet = CryptoWallet::new(
            "u1",
            "0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
            Currency::Eth,
        );
        assert_eq!(wallet.short_address(), "0x742d35...38f44e");
        assert_eq!(CryptoWallet::new("u1", "short", Currency::Btc).short_address(), "short");
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(TransactionStatus::Failed.label(), "Failed");
    }
}
