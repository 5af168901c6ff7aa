//! Wallets command - register and list crypto wallets

use anyhow::{Context, Result};
use blockbank_lib::payment::Currency;
use blockbank_lib::SiteConfig;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::ui;

pub async fn add(
    storage_dir: &Path,
    config: &SiteConfig,
    address: &str,
    currency: &str,
    balance: Option<&str>,
    _verbose: bool,
) -> Result<()> {
    let Some((session, _)) = super::require_user(storage_dir).await else {
        return Ok(());
    };
    let currency: Currency = currency.parse()?;
    let balance = balance
        .map(|b| Decimal::from_str(b.trim()).context("Invalid balance"))
        .transpose()?;

    let storage = super::open_storage(storage_dir)?;
    let service = super::payment_service(storage, config);
    let note = service.add_wallet(&session, address, currency, balance).await;
    ui::notify(&note);
    Ok(())
}

pub async fn list(storage_dir: &Path, config: &SiteConfig, _verbose: bool) -> Result<()> {
    let Some((session, _)) = super::require_user(storage_dir).await else {
        return Ok(());
    };
    ui::header("Crypto Wallets");

    let storage = super::open_storage(storage_dir)?;
    let service = super::payment_service(storage, config);
    let wallets = match service.wallets(&session).await {
        Ok(wallets) => wallets,
        Err(note) => {
            ui::notify(&note);
            return Ok(());
        }
    };

    if wallets.is_empty() {
        ui::info("No wallets registered");
        ui::info("Use 'blockbank wallets add <address>' to add one");
        return Ok(());
    }
    for wallet in wallets {
        let balance = wallet
            .balance
            .map(|b| format!("{} {}", b, wallet.currency.code()))
            .unwrap_or_else(|| "-".to_string());
        ui::key_value(&wallet.short_address(), &balance);
    }
    Ok(())
}
