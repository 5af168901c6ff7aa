//! Local accounts for BlockBank demos
//!
//! Email/password accounts with Argon2-derived password hashes, plus
//! social sign-in that simply creates (or reuses) a provider-tagged account.
//! The signed-in user is remembered in `.current_user` so consecutive CLI
//! invocations share a session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use argon2::Argon2;
use async_trait::async_trait;
use blockbank_lib::session::{AuthMethod, Credentials, IdentityProvider, SocialProvider, User};
use blockbank_lib::BlockbankError;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::{debug, info};
use zeroize::Zeroizing;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// A stored account.
#[derive(Clone, Serialize, Deserialize)]
struct StoredAccount {
    user: User,
    /// Hex Argon2 output; absent for social accounts.
    password_hash_hex: Option<String>,
    salt_hex: Option<String>,
}

#[derive(Serialize, Deserialize, Default)]
struct AccountsFile {
    accounts: Vec<StoredAccount>,
}

fn derive_hash(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; HASH_LEN]>> {
    let mut hash = Zeroizing::new([0u8; HASH_LEN]);
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, hash.as_mut_slice())
        .map_err(|e| anyhow::anyhow!("Key derivation failed: {}", e))?;
    Ok(hash)
}

fn auth_error(err: anyhow::Error) -> BlockbankError {
    BlockbankError::Storage(format!("{:#}", err))
}

/// File-backed [`IdentityProvider`].
pub struct LocalIdentityProvider {
    storage_dir: PathBuf,
    social_email: Option<String>,
}

impl LocalIdentityProvider {
    /// Create a new provider storing accounts in the given directory
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: storage_dir.as_ref().to_path_buf(),
            social_email: None,
        }
    }

    /// Email to attach to social sign-ins instead of a generated one.
    pub fn with_social_email(mut self, email: impl Into<String>) -> Self {
        self.social_email = Some(blockbank_lib::session::normalize_email(&email.into()));
        self
    }

    /// Signed-in user, if any.
    pub fn current_user(&self) -> Result<Option<User>> {
        let path = self.current_user_path();
        if !path.exists() {
            return Ok(None);
        }
        let id = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        let id = id.trim();
        Ok(self
            .load()?
            .accounts
            .into_iter()
            .find(|a| a.user.id == id)
            .map(|a| a.user))
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.load()?.accounts.into_iter().map(|a| a.user).collect())
    }

    fn create_password_account(&self, credentials: &Credentials) -> Result<Option<User>> {
        let mut file = self.load()?;
        if file.accounts.iter().any(|a| a.user.email == credentials.email) {
            return Ok(None);
        }

        let mut salt = [0u8; SALT_LEN];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        let hash = derive_hash(&credentials.password, &salt)?;

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: credentials.email.clone(),
            display_name: None,
            provider: AuthMethod::Password,
            created_at: chrono::Utc::now().timestamp(),
        };
        file.accounts.push(StoredAccount {
            user: user.clone(),
            password_hash_hex: Some(hex::encode(hash.as_slice())),
            salt_hex: Some(hex::encode(salt)),
        });
        self.save(&file)?;
        Ok(Some(user))
    }

    fn verify_password(&self, credentials: &Credentials) -> Result<Option<User>> {
        let file = self.load()?;
        let Some(account) = file
            .accounts
            .into_iter()
            .find(|a| a.user.email == credentials.email)
        else {
            return Ok(None);
        };
        let (Some(hash_hex), Some(salt_hex)) = (&account.password_hash_hex, &account.salt_hex)
        else {
            // Social account: no password to check against.
            return Ok(None);
        };

        let expected = hex::decode(hash_hex).context("Invalid stored hash")?;
        let salt = hex::decode(salt_hex).context("Invalid stored salt")?;
        let actual = derive_hash(&credentials.password, &salt)?;
        if bool::from(actual.as_slice().ct_eq(expected.as_slice())) {
            Ok(Some(account.user))
        } else {
            Ok(None)
        }
    }

    /// `None` when the email already belongs to an account of another kind.
    fn social_account(&self, provider: SocialProvider) -> Result<Option<User>> {
        let email = self.social_email.clone().unwrap_or_else(|| {
            format!("{}-user@blockbank.local", provider.name().to_lowercase())
        });
        let method = AuthMethod::Social(provider);

        let mut file = self.load()?;
        if let Some(existing) = file.accounts.iter().find(|a| a.user.email == email) {
            if existing.user.provider != method {
                return Ok(None);
            }
            return Ok(Some(existing.user.clone()));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            display_name: Some(format!("{} user", provider.name())),
            provider: method,
            created_at: chrono::Utc::now().timestamp(),
        };
        file.accounts.push(StoredAccount {
            user: user.clone(),
            password_hash_hex: None,
            salt_hex: None,
        });
        self.save(&file)?;
        Ok(Some(user))
    }

    fn remember(&self, user: &User) -> Result<()> {
        std::fs::create_dir_all(&self.storage_dir).context("Failed to create storage directory")?;
        std::fs::write(self.current_user_path(), &user.id).context("Failed to save session")?;
        Ok(())
    }

    fn forget(&self) -> Result<()> {
        let path = self.current_user_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to clear session")?;
        }
        Ok(())
    }

    fn accounts_path(&self) -> PathBuf {
        self.storage_dir.join("accounts.json")
    }

    fn current_user_path(&self) -> PathBuf {
        self.storage_dir.join(".current_user")
    }

    fn load(&self) -> Result<AccountsFile> {
        let path = self.accounts_path();
        if !path.exists() {
            return Ok(AccountsFile::default());
        }
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read accounts from {:?}", path))?;
        serde_json::from_str(&json).context("Corrupt accounts file")
    }

    fn save(&self, file: &AccountsFile) -> Result<()> {
        std::fs::create_dir_all(&self.storage_dir).context("Failed to create storage directory")?;
        let json = serde_json::to_string_pretty(file)?;
        std::fs::write(self.accounts_path(), json).context("Failed to write accounts")?;
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(&self, credentials: &Credentials) -> blockbank_lib::Result<User> {
        let user = self
            .create_password_account(credentials)
            .map_err(auth_error)?
            .ok_or_else(|| {
                BlockbankError::Auth("An account with this email already exists".into())
            })?;
        self.remember(&user).map_err(auth_error)?;
        info!(user_id = %user.id, "account created");
        Ok(user)
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> blockbank_lib::Result<User> {
        let user = self
            .verify_password(credentials)
            .map_err(auth_error)?
            .ok_or_else(|| BlockbankError::InvalidCredentials("Invalid email or password".into()))?;
        self.remember(&user).map_err(auth_error)?;
        Ok(user)
    }

    async fn sign_in_with_provider(&self, provider: SocialProvider) -> blockbank_lib::Result<User> {
        let user = self
            .social_account(provider)
            .map_err(auth_error)?
            .ok_or_else(|| {
                BlockbankError::Auth(
                    "An account with this email already exists. Sign in with its original method."
                        .into(),
                )
            })?;
        self.remember(&user).map_err(auth_error)?;
        debug!(provider = provider.name(), "social sign-in");
        Ok(user)
    }

    async fn sign_out(&self) -> blockbank_lib::Result<()> {
        self.forget().map_err(auth_error)
    }

    async fn restore(&self) -> blockbank_lib::Result<Option<User>> {
        self.current_user().map_err(auth_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_and_sign_in() {
        let temp_dir = tempfile::tempdir().unwrap();
        let provider = LocalIdentityProvider::new(temp_dir.path());
        let creds = Credentials::new("grace@example.com", "correct horse");

        let user = provider.sign_up(&creds).await.unwrap();
        assert_eq!(provider.current_user().unwrap().unwrap().id, user.id);

        let err = provider.sign_up(&creds).await.unwrap_err();
        assert!(matches!(err, BlockbankError::Auth(_)));

        provider.sign_out().await.unwrap();
        assert!(provider.current_user().unwrap().is_none());

        let again = provider.sign_in_with_password(&creds).await.unwrap();
        assert_eq!(again.id, user.id);

        let wrong = Credentials::new("grace@example.com", "wrong horse");
        let err = provider.sign_in_with_password(&wrong).await.unwrap_err();
        assert!(matches!(err, BlockbankError::InvalidCredentials(_)));
    }

    #[tokio::test]
    async fn test_password_is_not_stored() {
        let temp_dir = tempfile::tempdir().unwrap();
        let provider = LocalIdentityProvider::new(temp_dir.path());
        provider
            .sign_up(&Credentials::new("heidi@example.com", "plaintext-secret"))
            .await
            .unwrap();
        let raw = std::fs::read_to_string(temp_dir.path().join("accounts.json")).unwrap();
        assert!(!raw.contains("plaintext-secret"));
        assert!(raw.contains("salt_hex"));
    }

    #[tokio::test]
    async fn test_social_sign_in_reuses_account() {
        let temp_dir = tempfile::tempdir().unwrap();
        let provider =
            LocalIdentityProvider::new(temp_dir.path()).with_social_email("Ivan@Example.com");

        let first = provider
            .sign_in_with_provider(SocialProvider::Google)
            .await
            .unwrap();
        let second = provider
            .sign_in_with_provider(SocialProvider::Google)
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.email, "ivan@example.com");

        // A social account cannot be used with a password.
        let creds = Credentials::new("ivan@example.com", "anything");
        assert!(provider.sign_in_with_password(&creds).await.is_err());
    }

    #[tokio::test]
    async fn test_social_sign_in_does_not_shadow_other_accounts() {
        let temp_dir = tempfile::tempdir().unwrap();
        let provider =
            LocalIdentityProvider::new(temp_dir.path()).with_social_email("judy@example.com");
        let creds = Credentials::new("judy@example.com", "correct horse");
        let owner = provider.sign_up(&creds).await.unwrap();

        let err = provider
            .sign_in_with_provider(SocialProvider::Github)
            .await
            .unwrap_err();
        assert!(matches!(err, BlockbankError::Auth(_)));
        assert_eq!(provider.list_users().unwrap().len(), 1);
        // The failed attempt leaves the previous session in place.
        assert_eq!(provider.current_user().unwrap().unwrap().id, owner.id);

        // A second provider cannot claim the same email either.
        let google = LocalIdentityProvider::new(temp_dir.path())
            .with_social_email("kim@example.com");
        google.sign_in_with_provider(SocialProvider::Google).await.unwrap();
        assert!(google
            .sign_in_with_provider(SocialProvider::Github)
            .await
            .is_err());

        let again = provider.sign_in_with_password(&creds).await.unwrap();
        assert_eq!(again.id, owner.id);
    }
}
