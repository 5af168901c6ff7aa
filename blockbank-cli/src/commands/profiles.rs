//! Profiles command - seed payment recipients

use anyhow::Result;
use blockbank_lib::storage::Profile;
use std::path::Path;

use crate::ui;

pub async fn add(storage_dir: &Path, email: &str, name: Option<&str>, verbose: bool) -> Result<()> {
    let storage = super::open_storage(storage_dir)?;
    let mut profile = Profile::new(uuid::Uuid::new_v4().to_string(), email);
    if let Some(name) = name {
        profile = profile.with_full_name(name);
    }
    if verbose {
        ui::info(&format!("Profile id: {}", profile.id));
    }

    match storage.save_profile(profile) {
        Ok(profile) => ui::success(&format!("Profile '{}' added", profile.email)),
        Err(e) => ui::error(&format!("{:#}", e)),
    }
    Ok(())
}

pub async fn list(storage_dir: &Path, _verbose: bool) -> Result<()> {
    ui::header("Profiles");

    let storage = super::open_storage(storage_dir)?;
    let profiles = storage.list_profiles()?;
    if profiles.is_empty() {
        ui::info("No profiles found");
        ui::info("Use 'blockbank profiles add <email>' to add one");
        return Ok(());
    }
    for profile in profiles {
        ui::key_value(&profile.email, profile.full_name.as_deref().unwrap_or("-"));
    }
    Ok(())
}
