//! In-memory storage backend.
//!
//! Used by the browser build and by tests. Failures can be switched on to
//! exercise the error paths of the forms.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{ObjectStore, Profile, RecordStore, StoredPath};
use crate::kyc::KycSubmission;
use crate::payment::{select_recent, CryptoWallet, TransactionRecord, TransactionStatus};
use crate::session::normalize_email;
use crate::wallet::TxHash;
use crate::{BlockbankError, Result};

#[derive(Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    kyc: Vec<KycSubmission>,
    transactions: Vec<TransactionRecord>,
    wallets: Vec<CryptoWallet>,
}

/// Object and record store kept in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    objects: RwLock<HashMap<StoredPath, StoredObject>>,
    tables: RwLock<Tables>,
    fail_uploads: AtomicBool,
    fail_records: AtomicBool,
}

fn lock_error(context: &str) -> BlockbankError {
    BlockbankError::Internal(format!("InMemoryStore: lock poisoned during {}", context))
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upload fail with a storage error.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every record write fail with a storage error.
    pub fn set_fail_records(&self, fail: bool) {
        self.fail_records.store(fail, Ordering::SeqCst);
    }

    pub fn object_count(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn content_type(&self, location: &StoredPath) -> Option<String> {
        self.objects
            .read()
            .ok()?
            .get(location)
            .map(|o| o.content_type.clone())
    }

    /// Snapshot of one transaction, for assertions.
    pub fn transaction(&self, id: &str) -> Option<TransactionRecord> {
        self.tables
            .read()
            .ok()?
            .transactions
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub fn transactions(&self) -> Vec<TransactionRecord> {
        self.tables
            .read()
            .map(|t| t.transactions.clone())
            .unwrap_or_default()
    }

    fn check_records(&self) -> Result<()> {
        if self.fail_records.load(Ordering::SeqCst) {
            return Err(BlockbankError::Storage("record store unavailable".into()));
        }
        Ok(())
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ObjectStore for InMemoryStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredPath> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(BlockbankError::Storage("object store unavailable".into()));
        }
        let location = StoredPath::new(bucket, path);
        let mut objects = self.objects.write().map_err(|_| lock_error("upload"))?;
        if objects.contains_key(&location) {
            return Err(BlockbankError::Duplicate {
                bucket: bucket.to_string(),
                path: path.to_string(),
            });
        }
        objects.insert(
            location.clone(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(location)
    }

    async fn download(&self, location: &StoredPath) -> Result<Vec<u8>> {
        let objects = self.objects.read().map_err(|_| lock_error("download"))?;
        objects
            .get(location)
            .map(|o| o.bytes.clone())
            .ok_or_else(|| BlockbankError::not_found("object", location.to_string()))
    }

    async fn remove(&self, location: &StoredPath) -> Result<()> {
        let mut objects = self.objects.write().map_err(|_| lock_error("remove"))?;
        objects.remove(location);
        Ok(())
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl RecordStore for InMemoryStore {
    async fn insert_profile(&self, profile: Profile) -> Result<Profile> {
        self.check_records()?;
        let mut tables = self.tables.write().map_err(|_| lock_error("insert_profile"))?;
        if tables.profiles.iter().any(|p| p.email == profile.email) {
            return Err(BlockbankError::Duplicate {
                bucket: "profiles".into(),
                path: profile.email,
            });
        }
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let email = normalize_email(email);
        let tables = self.tables.read().map_err(|_| lock_error("find_profile"))?;
        Ok(tables.profiles.iter().find(|p| p.email == email).cloned())
    }

    async fn insert_kyc(&self, submission: KycSubmission) -> Result<KycSubmission> {
        self.check_records()?;
        let mut tables = self.tables.write().map_err(|_| lock_error("insert_kyc"))?;
        tables.kyc.push(submission.clone());
        Ok(submission)
    }

    async fn kyc_for(&self, user_id: &str) -> Result<Vec<KycSubmission>> {
        let tables = self.tables.read().map_err(|_| lock_error("kyc_for"))?;
        Ok(tables
            .kyc
            .iter()
            .filter(|k| k.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_transaction(&self, record: TransactionRecord) -> Result<TransactionRecord> {
        self.check_records()?;
        let mut tables = self
            .tables
            .write()
            .map_err(|_| lock_error("insert_transaction"))?;
        tables.transactions.push(record.clone());
        Ok(record)
    }

    async fn update_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
        transaction_hash: Option<TxHash>,
    ) -> Result<()> {
        self.check_records()?;
        let mut tables = self
            .tables
            .write()
            .map_err(|_| lock_error("update_transaction_status"))?;
        let record = tables
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| BlockbankError::not_found("transaction", id))?;
        record.set_status(status, transaction_hash);
        Ok(())
    }

    async fn recent_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| lock_error("recent_transactions"))?;
        Ok(select_recent(&tables.transactions, user_id, limit))
    }

    async fn insert_wallet(&self, wallet: CryptoWallet) -> Result<CryptoWallet> {
        self.check_records()?;
        let mut tables = self.tables.write().map_err(|_| lock_error("insert_wallet"))?;
        tables.wallets.push(wallet.clone());
        Ok(wallet)
    }

    async fn wallets_for(&self, user_id: &str) -> Result<Vec<CryptoWallet>> {
        let tables = self.tables.read().map_err(|_| lock_error("wallets_for"))?;
        Ok(tables
            .wallets
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect())
    }
}
