//! KYC command - submit identity verification

use anyhow::{Context, Result};
use blockbank_lib::kyc::{Document, DocumentType, KycForm, KycService};
use blockbank_lib::SiteConfig;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::ui;

/// Form fields given on the command line; missing ones are prompted for.
pub struct KycArgs {
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub front: Option<PathBuf>,
    pub back: Option<PathBuf>,
}

fn or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => ui::input(prompt),
    }
}

fn read_document(path: Option<PathBuf>, prompt: &str) -> Result<Document> {
    let path = match path {
        Some(path) => path,
        None => PathBuf::from(ui::input(prompt)?),
    };
    let bytes =
        std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Document::from_file_name(file_name, bytes))
}

pub async fn run(storage_dir: &Path, config: &SiteConfig, args: KycArgs, verbose: bool) -> Result<()> {
    ui::header("KYC Verification");

    let Some((session, user)) = super::require_user(storage_dir).await else {
        return Ok(());
    };
    if verbose {
        ui::info(&format!("Verifying {}", user.email));
    }

    let full_name = or_prompt(args.full_name, "Full name")?;
    let date_of_birth = or_prompt(args.date_of_birth, "Date of birth (YYYY-MM-DD)")?;
    let date_of_birth = NaiveDate::parse_from_str(date_of_birth.trim(), "%Y-%m-%d").ok();
    let address = or_prompt(args.address, "Address")?;
    let document_type = match args.document_type {
        Some(name) => name.parse()?,
        None => {
            let labels: Vec<&str> = DocumentType::ALL.iter().map(|t| t.label()).collect();
            DocumentType::ALL[ui::select("Document type", &labels, 0)?]
        }
    };
    let document_number = or_prompt(args.document_number, "Document number")?;
    let document_front = read_document(args.front, "Path to document front")?;
    let document_back = read_document(args.back, "Path to document back")?;

    let form = KycForm {
        full_name,
        date_of_birth,
        address,
        document_type,
        document_number,
        document_front: Some(document_front),
        document_back: Some(document_back),
    };

    let storage = super::open_storage(storage_dir)?;
    let service = KycService::new(storage.clone(), storage, config);
    let spinner = ui::spinner("Uploading documents...");
    let note = service.submit(&session, &form).await;
    spinner.finish_and_clear();
    ui::notify(&note);

    Ok(())
}
