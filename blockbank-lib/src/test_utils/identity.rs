use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::session::{AuthMethod, Credentials, IdentityProvider, SocialProvider, User};
use crate::{BlockbankError, Result};

/// In-memory [`IdentityProvider`] with plaintext passwords.
#[derive(Default)]
pub struct MockIdentityProvider {
    accounts: Mutex<HashMap<String, (String, User)>>,
    current: Mutex<Option<User>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A password user with a deterministic id.
    pub fn user(email: &str) -> User {
        User {
            id: format!("user-{}", email),
            email: email.to_string(),
            display_name: None,
            provider: AuthMethod::Password,
            created_at: 0,
        }
    }

    pub fn add_account(&self, email: &str, password: &str) -> User {
        let user = Self::user(email);
        self.accounts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    fn remember(&self, user: &User) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some(user.clone());
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_up(&self, credentials: &Credentials) -> Result<User> {
        let user = {
            let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
            if accounts.contains_key(&credentials.email) {
                return Err(BlockbankError::Auth("Email already registered".into()));
            }
            let user = Self::user(&credentials.email);
            accounts.insert(
                credentials.email.clone(),
                (credentials.password.to_string(), user.clone()),
            );
            user
        };
        self.remember(&user);
        Ok(user)
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<User> {
        let user = {
            let accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
            match accounts.get(&credentials.email) {
                Some((password, user)) if *password == *credentials.password => user.clone(),
                _ => {
                    return Err(BlockbankError::InvalidCredentials(
                        "Invalid email or password".into(),
                    ))
                }
            }
        };
        self.remember(&user);
        Ok(user)
    }

    async fn sign_in_with_provider(&self, provider: SocialProvider) -> Result<User> {
        let email = format!("{}-user@example.com", provider.name().to_lowercase());
        let user = User {
            provider: AuthMethod::Social(provider),
            display_name: Some(format!("{} User", provider.name())),
            ..Self::user(&email)
        };
        self.remember(&user);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    async fn restore(&self) -> Result<Option<User>> {
        Ok(self.current.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }
}
