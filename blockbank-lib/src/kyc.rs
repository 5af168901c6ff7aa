//! KYC document submission.
//!
//! Uploads the front and back of an identity document and records a
//! pending verification that references them.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::notify::{BusyFlag, Notification};
use crate::session::{SessionHandle, User};
use crate::storage::{ObjectStore, RecordStore, StoredPath};
use crate::{BlockbankError, Result, SiteConfig};

pub const SUBMITTED_MESSAGE: &str = "KYC verification submitted successfully";
pub const FAILED_MESSAGE: &str = "Failed to submit KYC verification";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    Passport,
    NationalId,
    DriversLicense,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [Self::Passport, Self::NationalId, Self::DriversLicense];

    pub fn label(self) -> &'static str {
        match self {
            Self::Passport => "Passport",
            Self::NationalId => "National ID",
            Self::DriversLicense => "Driver's License",
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Passport => "passport",
            Self::NationalId => "national_id",
            Self::DriversLicense => "drivers_license",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = BlockbankError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.wire_name() == s)
            .ok_or_else(|| BlockbankError::invalid_data("document_type", s))
    }
}

/// An uploaded image file.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Build a document, taking the content type from the file extension.
    pub fn from_file_name(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = image_content_type(&file_name)
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Hex SHA-256 of the contents.
    pub fn sha256(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn image_content_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

/// The KYC form as filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycForm {
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub document_front: Option<Document>,
    pub document_back: Option<Document>,
}

impl Default for KycForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            date_of_birth: None,
            address: String::new(),
            document_type: DocumentType::Passport,
            document_number: String::new(),
            document_front: None,
            document_back: None,
        }
    }
}

fn required(value: &str, label: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BlockbankError::validation(format!("Please enter your {}", label)));
    }
    Ok(())
}

fn required_image<'a>(doc: &'a Option<Document>, side: &str) -> Result<&'a Document> {
    let doc = doc.as_ref().ok_or_else(|| {
        BlockbankError::validation(format!("Please upload the {} of your document", side))
    })?;
    if !doc.is_image() {
        return Err(BlockbankError::validation(format!(
            "The {} of your document must be an image",
            side
        )));
    }
    Ok(doc)
}

impl KycForm {
    /// Check the form as of `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        required(&self.full_name, "full name")?;
        let dob = self
            .date_of_birth
            .ok_or_else(|| BlockbankError::validation("Please enter your date of birth"))?;
        if dob > today {
            return Err(BlockbankError::validation(
                "Date of birth cannot be in the future",
            ));
        }
        required(&self.address, "address")?;
        required(&self.document_number, "document number")?;
        required_image(&self.document_front, "front")?;
        required_image(&self.document_back, "back")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A row of `kyc_verifications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycSubmission {
    pub id: String,
    pub user_id: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub document_front: StoredPath,
    pub document_back: StoredPath,
    pub document_front_sha256: String,
    pub document_back_sha256: String,
    #[serde(default)]
    pub status: KycStatus,
    pub created_at: i64,
}

/// The KYC form component.
pub struct KycService<O, R> {
    objects: Arc<O>,
    records: Arc<R>,
    bucket: String,
    loading: BusyFlag,
}

impl<O, R> KycService<O, R>
where
    O: ObjectStore + Send + Sync,
    R: RecordStore + Send + Sync,
{
    pub fn new(objects: Arc<O>, records: Arc<R>, config: &SiteConfig) -> Self {
        Self {
            objects,
            records,
            bucket: config.kyc_bucket.clone(),
            loading: BusyFlag::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_busy()
    }

    /// Submit the form for the signed-in user.
    pub async fn submit(&self, session: &SessionHandle, form: &KycForm) -> Notification {
        let user = match session.require_user() {
            Ok(user) => user,
            Err(e) => return Notification::from(&e),
        };
        if let Err(e) = form.validate(chrono::Utc::now().date_naive()) {
            return Notification::from(&e);
        }
        let Some(_loading) = self.loading.try_acquire() else {
            return Notification::info("Submission already in progress");
        };

        match self.submit_for(&user, form).await {
            Ok(submission) => {
                info!(user_id = %user.id, id = %submission.id, "KYC submitted");
                Notification::success(SUBMITTED_MESSAGE)
            }
            Err(e) => {
                warn!(user_id = %user.id, "KYC submission failed: {}", e);
                Notification::error(FAILED_MESSAGE)
            }
        }
    }

    /// Upload both document sides and insert the verification row.
    pub async fn submit_for(&self, user: &User, form: &KycForm) -> Result<KycSubmission> {
        let today = chrono::Utc::now().date_naive();
        form.validate(today)?;
        let front = required_image(&form.document_front, "front")?;
        let back = required_image(&form.document_back, "back")?;
        let date_of_birth = form
            .date_of_birth
            .ok_or_else(|| BlockbankError::validation("Please enter your date of birth"))?;

        let front_path = self.upload(user, "front", front).await?;
        let back_path = match self.upload(user, "back", back).await {
            Ok(path) => path,
            Err(e) => {
                self.discard(&[&front_path]).await;
                return Err(e);
            }
        };

        let submission = KycSubmission {
            id: crate::new_id(),
            user_id: user.id.clone(),
            full_name: form.full_name.trim().to_string(),
            date_of_birth,
            address: form.address.trim().to_string(),
            document_type: form.document_type,
            document_number: form.document_number.trim().to_string(),
            document_front: front_path.clone(),
            document_back: back_path.clone(),
            document_front_sha256: front.sha256(),
            document_back_sha256: back.sha256(),
            status: KycStatus::Pending,
            created_at: crate::current_timestamp(),
        };
        match self.records.insert_kyc(submission).await {
            Ok(submission) => Ok(submission),
            Err(e) => {
                self.discard(&[&front_path, &back_path]).await;
                Err(e)
            }
        }
    }

    /// Remove documents uploaded by a submission that did not go through,
    /// so the user can submit again.
    async fn discard(&self, uploaded: &[&StoredPath]) {
        for location in uploaded {
            if let Err(e) = self.objects.remove(location).await {
                warn!(%location, "could not remove uploaded document: {}", e);
            }
        }
    }

    async fn upload(&self, user: &User, side: &str, doc: &Document) -> Result<StoredPath> {
        let path = format!("{}/{}", user.id, side);
        debug!(bucket = %self.bucket, %path, bytes = doc.bytes.len(), "uploading document");
        self.objects
            .upload(&self.bucket, &path, &doc.bytes, &doc.content_type)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> KycForm {
        KycForm {
            full_name: "Erin Example".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 1),
            address: "1 Main St".into(),
            document_type: DocumentType::NationalId,
            document_number: "X1234567".into(),
            document_front: Some(Document::from_file_name("front.png", vec![1, 2, 3])),
            document_back: Some(Document::from_file_name("back.JPG", vec![4, 5, 6])),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn test_validate_ok() {
        assert!(filled_form().validate(today()).is_ok());
    }

    #[test]
    fn test_validate_missing_fields() {
        let mut form = filled_form();
        form.full_name = "  ".into();
        assert_eq!(
            form.validate(today()).unwrap_err().user_message(),
            "Please enter your full name"
        );

        let mut form = filled_form();
        form.document_back = None;
        assert_eq!(
            form.validate(today()).unwrap_err().user_message(),
            "Please upload the back of your document"
        );

        let mut form = filled_form();
        form.document_front = Some(Document::from_file_name("scan.pdf", vec![0]));
        assert!(form.validate(today()).is_err());
    }

    #[test]
    fn test_future_birth_date_rejected() {
        let mut form = filled_form();
        form.date_of_birth = NaiveDate::from_ymd_opt(2030, 1, 1);
        assert!(form.validate(today()).is_err());
    }

    #[test]
    fn test_document_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&DocumentType::DriversLicense).unwrap(),
            "\"drivers_license\""
        );
        assert_eq!(
            "national_id".parse::<DocumentType>().unwrap(),
            DocumentType::NationalId
        );
    }

    #[test]
    fn test_document_digest() {
        let doc = Document::new("a.png", "image/png", b"abc".to_vec());
        assert_eq!(
            doc.sha256(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(format!("{:?}", doc).contains("len: 3"));
    }
}
