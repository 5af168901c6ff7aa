//! Transactions command - show recent activity

use anyhow::Result;
use blockbank_lib::payment::TransactionStatus;
use blockbank_lib::SiteConfig;
use colored::Colorize;
use std::path::Path;

use crate::ui;

pub async fn run(storage_dir: &Path, config: &SiteConfig, json: bool, _verbose: bool) -> Result<()> {
    let Some((session, user)) = super::require_user(storage_dir).await else {
        return Ok(());
    };
    let storage = super::open_storage(storage_dir)?;
    let service = super::payment_service(storage, config);
    let records = service.recent_transactions(&session).await;

    if json {
        ui::json(&serde_json::to_value(&records)?);
        return Ok(());
    }

    ui::header("Recent Transactions");
    if records.is_empty() {
        ui::info("No transactions yet");
        ui::info("Use 'blockbank pay <email> <amount>' to send one");
        return Ok(());
    }

    for record in records {
        let status = match record.status {
            TransactionStatus::Completed => record.status.label().green(),
            TransactionStatus::Pending => record.status.label().yellow(),
            TransactionStatus::Failed => record.status.label().red(),
        };
        let when = chrono::DateTime::from_timestamp(record.created_at, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        println!("\n{}  {}", record.summary_for(&user.id).bold(), status);
        ui::key_value("Date", &when);
        if let Some(hash) = &record.transaction_hash {
            ui::key_value("Hash", hash.as_str());
        }
    }

    Ok(())
}
