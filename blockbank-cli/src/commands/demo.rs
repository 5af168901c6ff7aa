//! Demo command - interactive transaction walkthrough

use anyhow::Result;
use blockbank_lib::demo::{
    Control, DemoDriver, DemoView, ProgressIndicator, SlotStatus, StepContent, SECTION_SUBTITLE,
    SECTION_TITLE, STEP_COUNT,
};
use blockbank_lib::SiteConfig;
use colored::Colorize;

use crate::ui;

pub async fn run(config: &SiteConfig, auto: bool, verbose: bool) -> Result<()> {
    ui::header(SECTION_TITLE);
    println!("{}", SECTION_SUBTITLE);

    let driver = DemoDriver::from_config(config);

    loop {
        let view = driver.view().await;
        if !auto {
            ui::clear();
            ui::header(SECTION_TITLE);
        }
        render(&view);

        if let DemoView::Processing { .. } = view {
            let spinner = ui::spinner("Waiting for network confirmation...");
            driver.wait_until_complete().await;
            spinner.finish_and_clear();
            continue;
        }

        let controls = view.controls();
        let control = if auto {
            if let DemoView::Complete { .. } = view {
                break;
            }
            match controls.iter().copied().find(|c| *c != Control::Back) {
                Some(control) => control,
                None => break,
            }
        } else {
            let mut labels: Vec<&str> = controls.iter().map(|c| c.label()).collect();
            labels.push("Exit");
            let default = controls
                .iter()
                .position(|c| *c != Control::Back)
                .unwrap_or(0);
            let picked = ui::select("Next", &labels, default)?;
            match controls.get(picked) {
                Some(control) => *control,
                None => break,
            }
        };

        let transition = driver.press(control).await;
        if verbose {
            ui::info(&format!("{} -> {:?}", control.label(), transition));
        }
        tracing::debug!(?transition, "demo control pressed");
    }

    Ok(())
}

fn render_progress(progress: &ProgressIndicator) {
    let slots: Vec<String> = progress
        .slots
        .iter()
        .map(|slot| match slot.status {
            SlotStatus::Done => format!("✓ {}", slot.label).green().to_string(),
            SlotStatus::Active => format!("● {}", slot.label).blue().bold().to_string(),
            SlotStatus::Pending => format!("○ {}", slot.label).dimmed().to_string(),
        })
        .collect();
    println!("{}", slots.join("  "));
}

fn render(view: &DemoView) {
    match view {
        DemoView::Step {
            step,
            title,
            progress,
            content,
            ..
        } => {
            println!(
                "\n{} {}",
                format!("Step {} of {}:", step.number(), STEP_COUNT).dimmed(),
                title.bold()
            );
            render_progress(progress);
            render_content(content);
        }
        DemoView::Processing {
            progress,
            title,
            message,
            explainer,
        } => {
            render_progress(progress);
            println!("\n{}", title.bold());
            println!("{}", message);
            println!("{}", explainer.dimmed());
        }
        DemoView::Complete {
            title,
            message,
            transaction_hash,
            ..
        } => {
            println!();
            ui::success(title);
            println!("{}", message);
            ui::key_value("Transaction Hash", transaction_hash);
        }
    }
}

fn render_content(content: &StepContent) {
    match content {
        StepContent::TransactionType { options, selected } => {
            for (i, option) in options.iter().enumerate() {
                let marker = if i == *selected { "(•)" } else { "( )" };
                println!("  {} {}", marker, option);
            }
        }
        StepContent::Details { fields } => {
            for field in fields {
                let value = match field.prefix {
                    Some(prefix) => format!("{} {}", prefix, field.value),
                    None => field.value.to_string(),
                };
                ui::key_value(field.label, &value);
            }
        }
        StepContent::Network {
            networks,
            speeds,
            selected_speed,
            fees,
        } => {
            ui::key_value("Network", &networks.join(" / "));
            for (i, speed) in speeds.iter().enumerate() {
                let marker = if i == *selected_speed { "(•)" } else { "( )" };
                println!("  {} {} {}", marker, speed.name, speed.eta.dimmed());
            }
            for fee in fees {
                ui::key_value(fee.label, fee.value);
            }
        }
        StepContent::Review { rows, total } => {
            for row in rows {
                ui::key_value(row.label, row.value);
            }
            ui::key_value(total.label, &total.value.bold().to_string());
        }
    }
}
