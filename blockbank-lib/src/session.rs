//! Signed-in state.
//!
//! There is no global "current user". Whoever owns the page creates a
//! [`SessionHandle`] and passes clones of it to the components that need it.
//! Only [`AuthService`] changes it, in response to sign-in and sign-out.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::notify::Notification;
use crate::{BlockbankError, Result};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Google,
    Github,
}

impl SocialProvider {
    pub fn name(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Github => "GitHub",
        }
    }
}

impl FromStr for SocialProvider {
    type Err = BlockbankError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::Github),
            other => Err(BlockbankError::invalid_data(
                "provider",
                format!("unknown provider '{}'", other),
            )),
        }
    }
}

/// How an account signs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "provider", rename_all = "lowercase")]
pub enum AuthMethod {
    Password,
    Social(SocialProvider),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub provider: AuthMethod,
    pub created_at: i64,
}

impl User {
    /// Display name, falling back to the email address.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Normalize an email address for lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Email and password as entered in the sign-in modal.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: Zeroizing<String>,
}

impl Credentials {
    pub fn new(email: &str, password: impl Into<String>) -> Self {
        Self {
            email: normalize_email(email),
            password: Zeroizing::new(password.into()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty() || !self.email.contains('@') {
            return Err(BlockbankError::validation("Please enter a valid email"));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(BlockbankError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity backend.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait IdentityProvider {
    async fn sign_up(&self, credentials: &Credentials) -> Result<User>;

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<User>;

    async fn sign_in_with_provider(&self, provider: SocialProvider) -> Result<User>;

    async fn sign_out(&self) -> Result<()>;

    /// The user remembered from an earlier visit, if any.
    async fn restore(&self) -> Result<Option<User>>;
}

/// Shared, observable signed-in state.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    user: Arc<watch::Sender<Option<User>>>,
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::signed_out()
    }
}

impl SessionHandle {
    pub fn signed_out() -> Self {
        let (tx, _) = watch::channel(None);
        Self { user: Arc::new(tx) }
    }

    pub fn signed_in(user: User) -> Self {
        let (tx, _) = watch::channel(Some(user));
        Self { user: Arc::new(tx) }
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.borrow().is_some()
    }

    /// Observe sign-in and sign-out.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    /// The signed-in user, or [`BlockbankError::NotSignedIn`].
    pub fn require_user(&self) -> Result<User> {
        self.current_user().ok_or(BlockbankError::NotSignedIn)
    }

    pub(crate) fn set(&self, user: Option<User>) {
        self.user.send_replace(user);
    }
}

/// Sign-in modal and header sign-out button.
pub struct AuthService<P> {
    provider: P,
    session: SessionHandle,
}

impl<P: IdentityProvider> AuthService<P> {
    pub fn new(provider: P, session: SessionHandle) -> Self {
        Self { provider, session }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Pick up a remembered user. Errors leave the session signed out.
    pub async fn restore(&self) -> Option<User> {
        match self.provider.restore().await {
            Ok(user) => {
                self.session.set(user.clone());
                user
            }
            Err(e) => {
                warn!("could not restore session: {}", e);
                None
            }
        }
    }

    pub async fn sign_up(&self, credentials: &Credentials) -> Notification {
        if let Err(e) = credentials.validate() {
            return Notification::from(&e);
        }
        match self.provider.sign_up(credentials).await {
            Ok(user) => {
                info!(user_id = %user.id, "account created");
                let message = format!("Account created for {}", user.email);
                self.session.set(Some(user));
                Notification::success(message)
            }
            Err(e) => {
                warn!("sign-up failed: {}", e);
                Notification::from(&e)
            }
        }
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Notification {
        if let Err(e) = credentials.validate() {
            return Notification::from(&e);
        }
        let result = self.provider.sign_in_with_password(credentials).await;
        self.finish_sign_in(result)
    }

    pub async fn sign_in_with(&self, provider: SocialProvider) -> Notification {
        let result = self.provider.sign_in_with_provider(provider).await;
        self.finish_sign_in(result)
    }

    pub async fn sign_out(&self) -> Notification {
        match self.provider.sign_out().await {
            Ok(()) => {
                self.session.set(None);
                Notification::info("Signed out")
            }
            Err(e) => {
                warn!("sign-out failed: {}", e);
                Notification::from(&e)
            }
        }
    }

    fn finish_sign_in(&self, result: Result<User>) -> Notification {
        match result {
            Ok(user) => {
                info!(user_id = %user.id, "signed in");
                let message = format!("Signed in as {}", user.label());
                self.session.set(Some(user));
                Notification::success(message)
            }
            Err(e) => {
                warn!("sign-in failed: {}", e);
                Notification::from(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockIdentityProvider;

    #[test]
    fn test_credentials_normalize_and_validate() {
        let creds = Credentials::new("  Alice@Example.COM ", "secret1");
        assert_eq!(creds.email, "alice@example.com");
        assert!(creds.validate().is_ok());

        let err = Credentials::new("alice", "secret1").validate().unwrap_err();
        assert_eq!(err.user_message(), "Please enter a valid email");
        assert!(Credentials::new("a@b.c", "123").validate().is_err());
        assert!(!format!("{:?}", creds).contains("secret1"));
    }

    #[test]
    fn test_session_handle_is_shared() {
        let session = SessionHandle::signed_out();
        let clone = session.clone();
        let mut rx = clone.subscribe();
        assert!(session.require_user().is_err());

        session.set(Some(MockIdentityProvider::user("bob@example.com")));
        assert!(clone.is_signed_in());
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().email, "bob@example.com");
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let provider = MockIdentityProvider::new();
        provider.add_account("carol@example.com", "hunter22");
        let auth = AuthService::new(provider, SessionHandle::signed_out());

        let note = auth
            .sign_in(&Credentials::new("carol@example.com", "wrong-password"))
            .await;
        assert!(note.is_error());
        assert!(!auth.session().is_signed_in());

        let note = auth
            .sign_in(&Credentials::new("carol@example.com", "hunter22"))
            .await;
        assert_eq!(note.message, "Signed in as carol@example.com");
        assert!(auth.session().is_signed_in());

        auth.sign_out().await;
        assert!(!auth.session().is_signed_in());
    }

    #[tokio::test]
    async fn test_social_sign_in() {
        let auth = AuthService::new(MockIdentityProvider::new(), SessionHandle::signed_out());
        let note = auth.sign_in_with(SocialProvider::Github).await;
        assert!(!note.is_error());
        let user = auth.session().current_user().unwrap();
        assert_eq!(user.provider, AuthMethod::Social(SocialProvider::Github));
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("GitHub".parse::<SocialProvider>().unwrap(), SocialProvider::Github);
        assert!("twitter".parse::<SocialProvider>().is_err());
    }
}
