//! File-based storage for demo data (profiles, KYC rows, transactions, wallets)
//! and uploaded documents.
//!
//! Records live in a single `data.json`; uploaded objects are plain files
//! under `objects/<bucket>/<path>`. Every read-modify-write holds an
//! exclusive `fs2` lock on `.lock`, so two CLI invocations cannot interleave.
//!
//! # Security Warning
//!
//! This storage is **NOT suitable for production use**: nothing is encrypted
//! at rest and uploaded identity documents are stored as-is.
//!
//! # Examples
//!
//! ```no_run
//! use blockbank_demo_core::DemoStorage;
//! use blockbank_lib::storage::Profile;
//!
//! # fn example() -> anyhow::Result<()> {
//! let storage = DemoStorage::new("./data");
//! storage.init()?;
//! storage.save_profile(Profile::new("bob", "bob@example.com"))?;
//! println!("{} profiles", storage.list_profiles()?.len());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use blockbank_lib::kyc::KycSubmission;
use blockbank_lib::payment::{select_recent, CryptoWallet, TransactionRecord, TransactionStatus};
use blockbank_lib::session::normalize_email;
use blockbank_lib::storage::{ObjectStore, Profile, RecordStore, StoredPath};
use blockbank_lib::wallet::TxHash;
use blockbank_lib::BlockbankError;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Simple file-based storage for demo applications
pub struct DemoStorage {
    storage_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObjectMeta {
    content_type: String,
    size: usize,
    uploaded_at: i64,
}

#[derive(Serialize, Deserialize, Default)]
struct StorageData {
    #[serde(default)]
    profiles: Vec<Profile>,
    #[serde(default)]
    kyc_verifications: Vec<KycSubmission>,
    #[serde(default)]
    transactions: Vec<TransactionRecord>,
    #[serde(default)]
    crypto_wallets: Vec<CryptoWallet>,
    /// Keyed by `bucket/path`.
    #[serde(default)]
    objects: HashMap<String, ObjectMeta>,
}

/// Releases the lock when dropped.
struct LockGuard(File);

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.0.unlock();
    }
}

fn storage_error(err: anyhow::Error) -> BlockbankError {
    BlockbankError::Storage(format!("{:#}", err))
}

/// Reject paths that would escape the objects directory.
fn check_relative(part: &str) -> Result<()> {
    let path = Path::new(part);
    if part.is_empty() || path.is_absolute() {
        bail!("invalid object path '{}'", part);
    }
    for component in path.components() {
        if !matches!(component, Component::Normal(_)) {
            bail!("invalid object path '{}'", part);
        }
    }
    Ok(())
}

impl DemoStorage {
    /// Create a new storage instance
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: storage_dir.as_ref().to_path_buf(),
        }
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Initialize storage directory
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.storage_dir).context("Failed to create storage directory")?;
        Ok(())
    }

    /// Add a profile; emails are unique.
    pub fn save_profile(&self, profile: Profile) -> Result<Profile> {
        self.update(|data| {
            if data.profiles.iter().any(|p| p.email == profile.email) {
                bail!("a profile for {} already exists", profile.email);
            }
            data.profiles.push(profile.clone());
            Ok(profile)
        })
    }

    pub fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let email = normalize_email(email);
        let data = self.read()?;
        Ok(data.profiles.into_iter().find(|p| p.email == email))
    }

    /// List all profiles, sorted by email
    pub fn list_profiles(&self) -> Result<Vec<Profile>> {
        let mut profiles = self.read()?.profiles;
        profiles.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(profiles)
    }

    pub fn save_kyc(&self, submission: KycSubmission) -> Result<KycSubmission> {
        self.update(|data| {
            data.kyc_verifications.push(submission.clone());
            Ok(submission)
        })
    }

    pub fn list_kyc(&self, user_id: &str) -> Result<Vec<KycSubmission>> {
        Ok(self
            .read()?
            .kyc_verifications
            .into_iter()
            .filter(|k| k.user_id == user_id)
            .collect())
    }

    pub fn save_transaction(&self, record: TransactionRecord) -> Result<TransactionRecord> {
        self.update(|data| {
            data.transactions.push(record.clone());
            Ok(record)
        })
    }

    pub fn set_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
        hash: Option<TxHash>,
    ) -> Result<()> {
        self.update(|data| {
            let record = data
                .transactions
                .iter_mut()
                .find(|t| t.id == id)
                .with_context(|| format!("transaction {} not found", id))?;
            record.set_status(status, hash);
            Ok(())
        })
    }

    pub fn list_recent_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>> {
        let data = self.read()?;
        Ok(select_recent(&data.transactions, user_id, limit))
    }

    pub fn save_wallet(&self, wallet: CryptoWallet) -> Result<CryptoWallet> {
        self.update(|data| {
            data.crypto_wallets.push(wallet.clone());
            Ok(wallet)
        })
    }

    pub fn list_wallets(&self, user_id: &str) -> Result<Vec<CryptoWallet>> {
        Ok(self
            .read()?
            .crypto_wallets
            .into_iter()
            .filter(|w| w.user_id == user_id)
            .collect())
    }

    /// Write an object file. Fails if one already exists at that path.
    pub fn put_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredPath> {
        check_relative(bucket)?;
        check_relative(path)?;
        let location = StoredPath::new(bucket, path);
        let file_path = self.object_path(&location);

        self.update(|data| {
            let key = location.to_string();
            if data.objects.contains_key(&key) || file_path.exists() {
                bail!("{} already exists", key);
            }
            if let Some(parent) = file_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
            std::fs::write(&file_path, bytes)
                .with_context(|| format!("Failed to write {:?}", file_path))?;
            data.objects.insert(
                key,
                ObjectMeta {
                    content_type: content_type.to_string(),
                    size: bytes.len(),
                    uploaded_at: chrono::Utc::now().timestamp(),
                },
            );
            Ok(())
        })?;

        debug!(%location, size = bytes.len(), "object stored");
        Ok(location)
    }

    pub fn get_object(&self, location: &StoredPath) -> Result<Vec<u8>> {
        check_relative(&location.bucket)?;
        check_relative(&location.path)?;
        let file_path = self.object_path(location);
        std::fs::read(&file_path).with_context(|| format!("Failed to read {:?}", file_path))
    }

    /// Delete an object file and its metadata. Missing objects are ignored.
    pub fn delete_object(&self, location: &StoredPath) -> Result<()> {
        check_relative(&location.bucket)?;
        check_relative(&location.path)?;
        let file_path = self.object_path(location);

        self.update(|data| {
            data.objects.remove(&location.to_string());
            match std::fs::remove_file(&file_path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e).with_context(|| format!("Failed to remove {:?}", file_path)),
            }
        })?;

        debug!(%location, "object removed");
        Ok(())
    }

    pub fn object_content_type(&self, location: &StoredPath) -> Result<Option<String>> {
        let data = self.read()?;
        Ok(data
            .objects
            .get(&location.to_string())
            .map(|m| m.content_type.clone()))
    }

    fn object_path(&self, location: &StoredPath) -> PathBuf {
        self.storage_dir
            .join("objects")
            .join(&location.bucket)
            .join(&location.path)
    }

    fn data_path(&self) -> PathBuf {
        self.storage_dir.join("data.json")
    }

    fn lock(&self, exclusive: bool) -> Result<LockGuard> {
        self.init()?;
        let path = self.storage_dir.join(".lock");
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file {:?}", path))?;
        if exclusive {
            file.lock_exclusive()?;
        } else {
            file.lock_shared()?;
        }
        Ok(LockGuard(file))
    }

    fn read(&self) -> Result<StorageData> {
        let _lock = self.lock(false)?;
        self.load_data()
    }

    fn update<T>(&self, f: impl FnOnce(&mut StorageData) -> Result<T>) -> Result<T> {
        let _lock = self.lock(true)?;
        let mut data = self.load_data()?;
        let out = f(&mut data)?;
        self.save_data(&data)?;
        Ok(out)
    }

    fn load_data(&self) -> Result<StorageData> {
        let path = self.data_path();
        if !path.exists() {
            return Ok(StorageData::default());
        }

        let json = std::fs::read_to_string(&path)?;
        let data = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt data file {:?}", path))?;
        Ok(data)
    }

    fn save_data(&self, data: &StorageData) -> Result<()> {
        let path = self.data_path();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for DemoStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> blockbank_lib::Result<StoredPath> {
        let key = format!("{}/{}", bucket, path);
        if self
            .read()
            .map(|d| d.objects.contains_key(&key))
            .map_err(storage_error)?
        {
            return Err(BlockbankError::Duplicate {
                bucket: bucket.to_string(),
                path: path.to_string(),
            });
        }
        self.put_object(bucket, path, bytes, content_type)
            .map_err(storage_error)
    }

    async fn download(&self, location: &StoredPath) -> blockbank_lib::Result<Vec<u8>> {
        self.get_object(location).map_err(storage_error)
    }

    async fn remove(&self, location: &StoredPath) -> blockbank_lib::Result<()> {
        self.delete_object(location).map_err(storage_error)
    }
}

#[async_trait]
impl RecordStore for DemoStorage {
    async fn insert_profile(&self, profile: Profile) -> blockbank_lib::Result<Profile> {
        if self
            .get_profile_by_email(&profile.email)
            .map_err(storage_error)?
            .is_some()
        {
            return Err(BlockbankError::Duplicate {
                bucket: "profiles".into(),
                path: profile.email,
            });
        }
        self.save_profile(profile).map_err(storage_error)
    }

    async fn find_profile_by_email(&self, email: &str) -> blockbank_lib::Result<Option<Profile>> {
        self.get_profile_by_email(email).map_err(storage_error)
    }

    async fn insert_kyc(&self, submission: KycSubmission) -> blockbank_lib::Result<KycSubmission> {
        self.save_kyc(submission).map_err(storage_error)
    }

    async fn kyc_for(&self, user_id: &str) -> blockbank_lib::Result<Vec<KycSubmission>> {
        self.list_kyc(user_id).map_err(storage_error)
    }

    async fn insert_transaction(
        &self,
        record: TransactionRecord,
    ) -> blockbank_lib::Result<TransactionRecord> {
        self.save_transaction(record).map_err(storage_error)
    }

    async fn update_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
        transaction_hash: Option<TxHash>,
    ) -> blockbank_lib::Result<()> {
        self.set_transaction_status(id, status, transaction_hash)
            .map_err(storage_error)
    }

    async fn recent_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> blockbank_lib::Result<Vec<TransactionRecord>> {
        self.list_recent_transactions(user_id, limit)
            .map_err(storage_error)
    }

    async fn insert_wallet(&self, wallet: CryptoWallet) -> blockbank_lib::Result<CryptoWallet> {
        self.save_wallet(wallet).map_err(storage_error)
    }

    async fn wallets_for(&self, user_id: &str) -> blockbank_lib::Result<Vec<CryptoWallet>> {
        self.list_wallets(user_id).map_err(storage_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockbank_lib::payment::Currency;

    #[test]
    fn test_profile_storage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = DemoStorage::new(temp_dir.path());

        storage
            .save_profile(Profile::new("bob", "Bob@Example.com"))
            .unwrap();
        let loaded = storage.get_profile_by_email("bob@example.com").unwrap();
        assert_eq!(loaded.unwrap().id, "bob");
        assert!(storage
            .save_profile(Profile::new("bob2", "bob@example.com"))
            .is_err());

        // A fresh handle on the same directory sees the data.
        let reopened = DemoStorage::new(temp_dir.path());
        assert_eq!(reopened.list_profiles().unwrap().len(), 1);
    }

    #[test]
    fn test_objects_are_write_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = DemoStorage::new(temp_dir.path());

        let location = storage
            .put_object("kyc-documents", "u1/front", b"img", "image/png")
            .unwrap();
        assert_eq!(storage.get_object(&location).unwrap(), b"img");
        assert_eq!(
            storage.object_content_type(&location).unwrap().as_deref(),
            Some("image/png")
        );
        assert!(storage
            .put_object("kyc-documents", "u1/front", b"other", "image/png")
            .is_err());
        assert!(temp_dir.path().join("objects/kyc-documents/u1/front").exists());
    }

    #[test]
    fn test_deleted_object_can_be_uploaded_again() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = DemoStorage::new(temp_dir.path());

        let location = storage
            .put_object("kyc-documents", "u1/front", b"img", "image/png")
            .unwrap();
        storage.delete_object(&location).unwrap();
        assert!(!temp_dir.path().join("objects/kyc-documents/u1/front").exists());
        assert_eq!(storage.object_content_type(&location).unwrap(), None);
        // Deleting twice is fine.
        storage.delete_object(&location).unwrap();

        storage
            .put_object("kyc-documents", "u1/front", b"new", "image/png")
            .unwrap();
        assert_eq!(storage.get_object(&location).unwrap(), b"new");
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = DemoStorage::new(temp_dir.path());
        assert!(storage.put_object("b", "../evil", b"x", "image/png").is_err());
        assert!(storage.put_object("b", "/abs", b"x", "image/png").is_err());
        assert!(storage.put_object("..", "x", b"x", "image/png").is_err());
    }

    #[test]
    fn test_transaction_status_update() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = DemoStorage::new(temp_dir.path());
        let record = storage
            .save_transaction(TransactionRecord::new(
                "alice",
                "bob",
                "1".parse().unwrap(),
                Currency::Eth,
            ))
            .unwrap();
        storage
            .set_transaction_status(&record.id, TransactionStatus::Failed, None)
            .unwrap();
        let recent = storage.list_recent_transactions("bob", 5).unwrap();
        assert_eq!(recent[0].status, TransactionStatus::Failed);
        assert!(recent[0].updated_at.is_some());
        assert!(storage
            .set_transaction_status("missing", TransactionStatus::Failed, None)
            .is_err());
    }
}
