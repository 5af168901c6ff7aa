//! Document and record storage interfaces.
//!
//! [`ObjectStore`] holds uploaded files in buckets; [`RecordStore`] holds the
//! structured rows behind the KYC and payment forms. Both are async so a
//! backend can do real I/O.

mod memory;

pub use memory::InMemoryStore;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::kyc::KycSubmission;
use crate::payment::{CryptoWallet, TransactionRecord, TransactionStatus};
use crate::wallet::TxHash;
use crate::Result;

/// Location of an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredPath {
    pub bucket: String,
    pub path: String,
}

impl StoredPath {
    pub fn new(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for StoredPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.path)
    }
}

/// A user profile, used to resolve payment recipients by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub created_at: i64,
}

impl Profile {
    pub fn new(id: impl Into<String>, email: &str) -> Self {
        Self {
            id: id.into(),
            email: crate::session::normalize_email(email),
            full_name: None,
            created_at: crate::current_timestamp(),
        }
    }

    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }
}

/// Bucketed file storage without upsert.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ObjectStore {
    /// Store `bytes` at `bucket/path`. Fails with
    /// [`crate::BlockbankError::Duplicate`] if something is already there.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredPath>;

    async fn download(&self, location: &StoredPath) -> Result<Vec<u8>>;

    /// Delete the object at `location`. Removing a missing object succeeds.
    async fn remove(&self, location: &StoredPath) -> Result<()>;
}

/// Structured records.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait RecordStore {
    async fn insert_profile(&self, profile: Profile) -> Result<Profile>;

    /// Look up a profile by normalized email.
    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>>;

    async fn insert_kyc(&self, submission: KycSubmission) -> Result<KycSubmission>;

    async fn kyc_for(&self, user_id: &str) -> Result<Vec<KycSubmission>>;

    async fn insert_transaction(&self, record: TransactionRecord) -> Result<TransactionRecord>;

    async fn update_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
        transaction_hash: Option<TxHash>,
    ) -> Result<()>;

    /// Transactions the user sent or received, newest first.
    async fn recent_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>>;

    async fn insert_wallet(&self, wallet: CryptoWallet) -> Result<CryptoWallet>;

    async fn wallets_for(&self, user_id: &str) -> Result<Vec<CryptoWallet>>;
}
