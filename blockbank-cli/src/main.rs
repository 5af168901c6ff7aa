//! BlockBank Demo CLI
//!
//! Terminal front end for the BlockBank site: prints the marketing sections,
//! runs the interactive transaction demo and drives the account services
//! (sign-in, KYC, payments) against local file storage.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "blockbank")]
#[command(about = "BlockBank Demo CLI - Explore blockchain banking from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Custom storage directory (can also be set via BLOCKBANK_DEMO_DIR env var)
    #[arg(long, global = true)]
    storage_dir: Option<String>,

    /// Site configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the marketing site
    Site {
        /// Only print one section (hero, solutions, enterprise, customers, demo, footer)
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Walk through the interactive transaction demo
    Demo {
        /// Run every step without prompting
        #[arg(long)]
        auto: bool,
    },

    /// Create an account
    Signup {
        /// Account email
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Sign in with email/password or a social provider
    Login {
        /// Social provider (google, github)
        #[arg(short, long)]
        provider: Option<String>,

        /// Account email
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Submit identity verification
    Kyc {
        /// Full legal name
        #[arg(long)]
        full_name: Option<String>,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        date_of_birth: Option<String>,

        /// Residential address
        #[arg(long)]
        address: Option<String>,

        /// Document type (passport, national_id, drivers_license)
        #[arg(long)]
        document_type: Option<String>,

        /// Document number
        #[arg(long)]
        document_number: Option<String>,

        /// Image of the document front
        #[arg(long)]
        front: Option<PathBuf>,

        /// Image of the document back
        #[arg(long)]
        back: Option<PathBuf>,
    },

    /// Send a payment to another account
    Pay {
        /// Recipient email
        email: String,

        /// Amount
        amount: String,

        /// Currency (ETH, USDT, USDC, BTC)
        #[arg(short, long, default_value = "ETH")]
        currency: String,
    },

    /// Show recent transactions
    Transactions {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage crypto wallets
    Wallets {
        #[command(subcommand)]
        action: WalletAction,
    },

    /// Manage recipient profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum WalletAction {
    /// Register a wallet address
    Add {
        /// Wallet address
        address: String,

        /// Currency (ETH, USDT, USDC, BTC)
        #[arg(short, long, default_value = "ETH")]
        currency: String,

        /// Known balance
        #[arg(short, long)]
        balance: Option<String>,
    },

    /// List registered wallets
    List,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Add a profile that payments can be sent to
    Add {
        /// Profile email
        email: String,

        /// Full name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List profiles
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("blockbank_cli=debug,blockbank_lib=debug,blockbank_demo_core=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("blockbank_cli=info,blockbank_lib=warn,blockbank_demo_core=warn")
            .init();
    }

    let storage_dir = if let Some(dir) = cli.storage_dir {
        PathBuf::from(dir)
    } else if let Ok(dir) = std::env::var("BLOCKBANK_DEMO_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blockbank-demo")
    };
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Site { section } => {
            commands::site::run(&storage_dir, section.as_deref(), cli.verbose).await?;
        }
        Commands::Demo { auto } => {
            commands::demo::run(&config, auto, cli.verbose).await?;
        }
        Commands::Signup { email } => {
            commands::account::signup(&storage_dir, email, cli.verbose).await?;
        }
        Commands::Login { provider, email } => {
            commands::account::login(&storage_dir, provider.as_deref(), email, cli.verbose)
                .await?;
        }
        Commands::Logout => {
            commands::account::logout(&storage_dir, cli.verbose).await?;
        }
        Commands::Whoami => {
            commands::whoami::run(&storage_dir, cli.verbose).await?;
        }
        Commands::Kyc {
            full_name,
            date_of_birth,
            address,
            document_type,
            document_number,
            front,
            back,
        } => {
            let args = commands::kyc::KycArgs {
                full_name,
                date_of_birth,
                address,
                document_type,
                document_number,
                front,
                back,
            };
            commands::kyc::run(&storage_dir, &config, args, cli.verbose).await?;
        }
        Commands::Pay {
            email,
            amount,
            currency,
        } => {
            commands::pay::run(&storage_dir, &config, &email, &amount, &currency, cli.verbose)
                .await?;
        }
        Commands::Transactions { json } => {
            commands::transactions::run(&storage_dir, &config, json, cli.verbose).await?;
        }
        Commands::Wallets { action } => match action {
            WalletAction::Add {
                address,
                currency,
                balance,
            } => {
                commands::wallets::add(
                    &storage_dir,
                    &config,
                    &address,
                    &currency,
                    balance.as_deref(),
                    cli.verbose,
                )
                .await?;
            }
            WalletAction::List => {
                commands::wallets::list(&storage_dir, &config, cli.verbose).await?;
            }
        },
        Commands::Profiles { action } => match action {
            ProfileAction::Add { email, name } => {
                commands::profiles::add(&storage_dir, &email, name.as_deref(), cli.verbose)
                    .await?;
            }
            ProfileAction::List => {
                commands::profiles::list(&storage_dir, cli.verbose).await?;
            }
        },
    }

    Ok(())
}
