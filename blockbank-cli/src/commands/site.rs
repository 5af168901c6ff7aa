//! Site command - print the marketing page

use anyhow::Result;
use blockbank_lib::content::{
    self, BRAND, CUSTOMERS_HEADING, CUSTOMER_BENEFITS, CUSTOMER_CTA, ENTERPRISE_BENEFITS,
    ENTERPRISE_CTA, ENTERPRISE_HEADING, ENTERPRISE_METRICS, FOOTER, HEADER_CTA, HERO,
    SOLUTIONS, SOLUTIONS_HEADING,
};
use blockbank_lib::demo;
use blockbank_lib::shell::{PageShell, Section};
use chrono::Datelike;
use colored::Colorize;
use std::path::Path;

use crate::ui;

pub async fn run(storage_dir: &Path, section: Option<&str>, verbose: bool) -> Result<()> {
    let shell = PageShell::new(super::restore_session(storage_dir).await);

    let sections = match section {
        Some(name) => {
            let wanted: Section = name.parse()?;
            if !shell.is_mounted(wanted) {
                ui::warning(&format!("The {} section requires a signed-in user", wanted));
                return Ok(());
            }
            vec![wanted]
        }
        None => shell.sections(),
    };

    if verbose {
        let names: Vec<_> = sections.iter().map(|s| s.name()).collect();
        ui::info(&format!("Sections: {}", names.join(", ")));
    }

    for section in sections {
        print_section(section);
    }
    Ok(())
}

fn print_section(section: Section) {
    match section {
        Section::Header => header(),
        Section::Hero => hero(),
        Section::Solutions => solutions(),
        Section::Enterprise => enterprise(),
        Section::Customers => customers(),
        Section::Demo => {
            ui::header(demo::SECTION_TITLE);
            ui::badge(demo::SECTION_BADGE);
            println!("{}", demo::SECTION_SUBTITLE);
            ui::info("Run 'blockbank demo' to try it");
        }
        Section::Kyc => {
            ui::header("KYC Verification");
            ui::info("Run 'blockbank kyc' to verify your identity");
        }
        Section::Payments => {
            ui::header("Send Payment");
            ui::info("Run 'blockbank pay <email> <amount>' to send a payment");
            ui::info("Run 'blockbank transactions' to see recent activity");
        }
        Section::Footer => footer(),
    }
}

fn header() {
    let links: Vec<String> = content::header_nav()
        .iter()
        .map(|item| format!("{} ({})", item.label, item.href()))
        .collect();
    println!("{}  {}  [{}]", BRAND.bold(), links.join("  "), HEADER_CTA);
    ui::separator();
}

fn hero() {
    ui::badge(HERO.badge);
    println!(
        "{}{}{}",
        HERO.headline_before.bold(),
        HERO.highlight.bold().blue(),
        HERO.headline_after.bold()
    );
    println!("{}", HERO.subtitle);
    println!("[{}]  [{}]", HERO.primary_cta, HERO.secondary_cta);
    for stat in &HERO.stats {
        ui::key_value(stat.value, stat.text);
    }
}

fn solutions() {
    ui::header(SOLUTIONS_HEADING.title);
    ui::badge(SOLUTIONS_HEADING.badge);
    println!("{}", SOLUTIONS_HEADING.subtitle);
    for solution in &SOLUTIONS {
        println!("\n{} {}", solution.title.bold(), format!("({})", solution.accent.name()).dimmed());
        println!("  {}", solution.description);
        for benefit in solution.benefits {
            ui::bullet(benefit);
        }
    }
}

fn enterprise() {
    ui::header(ENTERPRISE_HEADING.title);
    ui::badge(ENTERPRISE_HEADING.badge);
    println!("{}", ENTERPRISE_HEADING.subtitle);
    for benefit in &ENTERPRISE_BENEFITS {
        println!("\n{}", benefit.title.bold());
        println!("  {}", benefit.description);
        ui::key_value(benefit.stat, benefit.stat_text);
    }
    println!();
    for metric in &ENTERPRISE_METRICS {
        ui::key_value(metric.label, metric.value);
    }
    println!("[{}]", ENTERPRISE_CTA);
}

fn customers() {
    ui::header(CUSTOMERS_HEADING.title);
    ui::badge(CUSTOMERS_HEADING.badge);
    println!("{}", CUSTOMERS_HEADING.subtitle);
    for benefit in &CUSTOMER_BENEFITS {
        println!("\n{}", benefit.title.bold());
        println!("  {}", benefit.description);
    }
    println!("\n{}", CUSTOMER_CTA.title.bold());
    println!("{}", CUSTOMER_CTA.text);
    println!("[{}]", CUSTOMER_CTA.button);
}

fn footer() {
    ui::separator();
    println!("{}", BRAND.bold());
    println!("{}", FOOTER.tagline);
    let links: Vec<&str> = content::footer_links().iter().map(|l| l.label).collect();
    ui::key_value("Quick Links", &links.join(" | "));
    ui::key_value("Address", &FOOTER.address.join(", "));
    ui::key_value("Contact", &FOOTER.contact.join(", "));
    ui::key_value("Legal", &FOOTER.legal_links.join(" | "));
    println!("{}", FOOTER.copyright(chrono::Utc::now().year()).dimmed());
}
