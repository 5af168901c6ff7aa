//! CLI command implementations

pub mod account;
pub mod demo;
pub mod kyc;
pub mod pay;
pub mod profiles;
pub mod site;
pub mod transactions;
pub mod wallets;
pub mod whoami;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use blockbank_demo_core::{DemoStorage, LocalIdentityProvider};
use blockbank_lib::delay::TokioDelay;
use blockbank_lib::payment::PaymentService;
use blockbank_lib::session::{AuthService, User};
use blockbank_lib::{SessionHandle, SiteConfig};

use crate::ui;

/// Load the site configuration, falling back to the defaults
pub fn load_config(path: Option<&str>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path)),
        None => Ok(SiteConfig::default()),
    }
}

/// Open the record/document store under the storage directory
pub fn open_storage(storage_dir: &Path) -> Result<Arc<DemoStorage>> {
    let storage = DemoStorage::new(storage_dir.join("data"));
    storage.init()?;
    Ok(Arc::new(storage))
}

/// Auth service over the local accounts, with no user signed in yet
pub fn auth_service(storage_dir: &Path) -> AuthService<LocalIdentityProvider> {
    AuthService::new(
        LocalIdentityProvider::new(storage_dir),
        SessionHandle::signed_out(),
    )
}

/// Restore the session left by a previous `login`
pub async fn restore_session(storage_dir: &Path) -> SessionHandle {
    let auth = auth_service(storage_dir);
    auth.restore().await;
    auth.session().clone()
}

/// The signed-in user, or a hint on how to sign in
pub async fn require_user(storage_dir: &Path) -> Option<(SessionHandle, User)> {
    let session = restore_session(storage_dir).await;
    match session.current_user() {
        Some(user) => Some((session, user)),
        None => {
            ui::error("Please log in to continue");
            ui::info("Run 'blockbank login' or 'blockbank signup' first");
            None
        }
    }
}

pub fn payment_service(
    storage: Arc<DemoStorage>,
    config: &SiteConfig,
) -> PaymentService<DemoStorage, TokioDelay> {
    PaymentService::new(storage, TokioDelay, config.clone())
}
