//! Terminal UI utilities

use blockbank_lib::{Notification, NotificationLevel};
use colored::Colorize;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print a service notification with the matching style
pub fn notify(notification: &Notification) {
    match notification.level {
        NotificationLevel::Success => success(&notification.message),
        NotificationLevel::Error => error(&notification.message),
        NotificationLevel::Info => info(&notification.message),
    }
}

/// Print a section header
pub fn header(text: &str) {
    println!("\n{}", text.bold().underline());
}

/// Print a small badge line above a heading
pub fn badge(text: &str) {
    println!("{}", format!("[ {} ]", text).cyan());
}

/// Print a key-value pair
pub fn key_value(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

/// Print a bullet item
pub fn bullet(text: &str) {
    println!("  {} {}", "•".dimmed(), text);
}

/// Create a spinner progress indicator
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prompt for text input
pub fn input(prompt: &str) -> anyhow::Result<String> {
    use dialoguer::Input;
    Ok(Input::new().with_prompt(prompt).interact_text()?)
}

/// Pick one of `items`; returns its index
pub fn select<T: ToString>(prompt: &str, items: &[T], default: usize) -> anyhow::Result<usize> {
    use dialoguer::Select;
    Ok(Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()?)
}

/// Prompt for a password without echo
pub fn password(prompt: &str) -> anyhow::Result<String> {
    use anyhow::Context;
    rpassword::prompt_password(format!("{}: ", prompt)).context("Failed to read password")
}

/// Clear the terminal
pub fn clear() {
    let term = Term::stdout();
    let _ = term.clear_screen();
}

/// Print a separator line
pub fn separator() {
    println!("{}", "─".repeat(60).dimmed());
}

/// Print JSON prettily
pub fn json(value: &serde_json::Value) {
    if let Ok(pretty) = serde_json::to_string_pretty(value) {
        println!("{}", pretty);
    }
}
