//! Whoami command - show the signed-in user

use anyhow::Result;
use blockbank_lib::session::AuthMethod;
use std::path::Path;

use crate::ui;

pub async fn run(storage_dir: &Path, _verbose: bool) -> Result<()> {
    let session = super::restore_session(storage_dir).await;
    match session.current_user() {
        Some(user) => {
            ui::header("Current User");
            ui::key_value("Email", &user.email);
            if let Some(name) = &user.display_name {
                ui::key_value("Name", name);
            }
            let method = match user.provider {
                AuthMethod::Password => "Email".to_string(),
                AuthMethod::Social(provider) => provider.name().to_string(),
            };
            ui::key_value("Signed in with", &method);
            ui::key_value("User ID", &user.id);
            ui::key_value(
                "Member since",
                &chrono::DateTime::from_timestamp(user.created_at, 0)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
            );
        }
        None => {
            ui::error("Not signed in");
            ui::info("Run 'blockbank login' to sign in");
        }
    }

    Ok(())
}
