//! Sign in, seed a recipient, pay and list the result through the binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn blockbank(storage_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blockbank"))
        .args(args)
        .env("BLOCKBANK_DEMO_DIR", storage_dir)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_social_login_pay_and_list() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let config = dir.join("site.json");
    std::fs::write(&config, r#"{ "payment_delay_ms": 0, "success_rate": 1.0 }"#).unwrap();
    let config = config.to_str().unwrap();

    let output = blockbank(
        dir,
        &["login", "--provider", "github", "--email", "alice@example.com"],
    );
    assert!(stdout(&output).contains("Signed in as"));

    let output = blockbank(dir, &["whoami"]);
    let text = stdout(&output);
    assert!(text.contains("alice@example.com"));
    assert!(text.contains("GitHub"));

    // Account sections appear once signed in.
    let output = blockbank(dir, &["site", "--section", "payments"]);
    assert!(stdout(&output).contains("Send Payment"));

    let output = blockbank(dir, &["profiles", "add", "bob@example.com", "--name", "Bob"]);
    assert!(stdout(&output).contains("Profile 'bob@example.com' added"));

    let output = blockbank(
        dir,
        &["pay", "bob@example.com", "1.5", "--config", config],
    );
    assert!(stdout(&output).contains("Payment of 1.5 ETH sent successfully!"));

    let output = blockbank(dir, &["pay", "nobody@example.com", "1", "--config", config]);
    let text = format!("{}{}", stdout(&output), String::from_utf8_lossy(&output.stderr));
    assert!(text.contains("Recipient not found"));

    let output = blockbank(dir, &["transactions", "--config", config]);
    let text = stdout(&output);
    assert!(text.contains("Sent 1.5 ETH"));
    assert!(text.contains("Completed"));

    let output = blockbank(dir, &["logout"]);
    assert!(stdout(&output).contains("Signed out"));
    let output = blockbank(dir, &["whoami"]);
    assert!(!stdout(&output).contains("alice@example.com"));
}

#[test]
fn test_social_login_creates_recipient_profile() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    for _ in 0..2 {
        let output = blockbank(
            dir,
            &["login", "--provider", "google", "--email", "carol@example.com"],
        );
        assert!(output.status.success());
    }

    let output = blockbank(dir, &["profiles", "list"]);
    let text = stdout(&output);
    assert_eq!(text.matches("carol@example.com").count(), 1);
}

#[test]
fn test_wallets_add_and_list() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    blockbank(dir, &["login", "--provider", "google"]);

    let output = blockbank(
        dir,
        &[
            "wallets",
            "add",
            "0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
            "--balance",
            "2.5",
        ],
    );
    assert!(stdout(&output).contains("Added ETH wallet 0x742d35...38f44e"));

    let output = blockbank(dir, &["wallets", "list"]);
    let text = stdout(&output);
    assert!(text.contains("0x742d35...38f44e"));
    assert!(text.contains("2.5 ETH"));
}
