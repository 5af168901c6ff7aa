//! Pay command - send a payment to another account

use anyhow::Result;
use blockbank_lib::payment::{Currency, PaymentForm};
use blockbank_lib::SiteConfig;
use std::path::Path;

use crate::ui;

pub async fn run(
    storage_dir: &Path,
    config: &SiteConfig,
    email: &str,
    amount: &str,
    currency: &str,
    verbose: bool,
) -> Result<()> {
    ui::header("Send Payment");

    let Some((session, user)) = super::require_user(storage_dir).await else {
        return Ok(());
    };
    let currency: Currency = currency.parse()?;

    ui::key_value("From", &user.email);
    ui::key_value("To", email);
    ui::key_value("Amount", &format!("{} {}", amount, currency.code()));
    if verbose {
        ui::info(&format!(
            "Simulated settlement: {} ms, success rate {:.0}%",
            config.payment_delay_ms,
            config.success_rate * 100.0
        ));
    }

    let storage = super::open_storage(storage_dir)?;
    let service = super::payment_service(storage, config);
    let form = PaymentForm::new(email, amount, currency);

    let spinner = ui::spinner("Sending payment...");
    let note = service.send(&session, &form).await;
    spinner.finish_and_clear();
    ui::notify(&note);

    Ok(())
}
