//! Account commands - sign up, sign in, sign out

use anyhow::Result;
use blockbank_demo_core::LocalIdentityProvider;
use blockbank_lib::session::{AuthService, Credentials, SocialProvider, User};
use blockbank_lib::storage::{Profile, RecordStore};
use blockbank_lib::SessionHandle;
use std::path::Path;

use crate::ui;

fn prompt_credentials(email: Option<String>, confirm: bool) -> Result<Option<Credentials>> {
    let email = match email {
        Some(email) => email,
        None => ui::input("Email")?,
    };
    let password = ui::password("Password")?;
    if confirm && ui::password("Confirm password")? != password {
        ui::error("Passwords do not match");
        return Ok(None);
    }
    Ok(Some(Credentials::new(&email, password)))
}

pub async fn signup(storage_dir: &Path, email: Option<String>, verbose: bool) -> Result<()> {
    ui::header("Create Account");

    let Some(credentials) = prompt_credentials(email, true)? else {
        return Ok(());
    };
    let auth = super::auth_service(storage_dir);
    let note = auth.sign_up(&credentials).await;
    ui::notify(&note);
    if note.is_error() {
        return Ok(());
    }

    if let Some(user) = auth.session().current_user() {
        ensure_profile(storage_dir, &user, verbose).await?;
    }
    Ok(())
}

/// Make a signed-in account reachable as a payment recipient.
async fn ensure_profile(storage_dir: &Path, user: &User, verbose: bool) -> Result<()> {
    let storage = super::open_storage(storage_dir)?;
    if storage.find_profile_by_email(&user.email).await?.is_some() {
        return Ok(());
    }
    match storage.insert_profile(Profile::new(&user.id, &user.email)).await {
        Ok(_) => {
            if verbose {
                ui::info(&format!("Profile created for {}", user.email));
            }
        }
        Err(e) => ui::warning(&format!("Could not create profile: {}", e)),
    }
    Ok(())
}

pub async fn login(
    storage_dir: &Path,
    provider: Option<&str>,
    email: Option<String>,
    verbose: bool,
) -> Result<()> {
    ui::header("Sign In");

    let note = match provider {
        Some(name) => {
            let provider: SocialProvider = name.parse()?;
            let mut identity = LocalIdentityProvider::new(storage_dir);
            if let Some(email) = email {
                identity = identity.with_social_email(email);
            }
            if verbose {
                ui::info(&format!("Signing in with {}", provider.name()));
            }
            let auth = AuthService::new(identity, SessionHandle::signed_out());
            let note = auth.sign_in_with(provider).await;
            if let Some(user) = auth.session().current_user() {
                ensure_profile(storage_dir, &user, verbose).await?;
            }
            note
        }
        None => {
            let Some(credentials) = prompt_credentials(email, false)? else {
                return Ok(());
            };
            super::auth_service(storage_dir).sign_in(&credentials).await
        }
    };
    ui::notify(&note);
    Ok(())
}

pub async fn logout(storage_dir: &Path, _verbose: bool) -> Result<()> {
    let auth = super::auth_service(storage_dir);
    if auth.restore().await.is_none() {
        ui::info("Not signed in");
        return Ok(());
    }
    let note = auth.sign_out().await;
    ui::notify(&note);
    Ok(())
}
