//! Error types for BlockBank operations.
//!
//! Library operations return [`BlockbankError`]. Services at the edge of a
//! page component convert these into [`crate::Notification`]s with
//! [`BlockbankError::user_message`] instead of propagating them.

use crate::wallet::WalletError;

/// Error codes for the browser bindings and structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum BlockbankErrorCode {
    /// Authentication/authorization error
    Auth = 3000,
    /// Invalid credentials
    InvalidCredentials = 3002,
    /// Operation requires a signed-in user
    NotSignedIn = 3003,
    /// Record or profile not found
    NotFound = 4000,
    /// Invalid request/data
    InvalidData = 5000,
    /// Form validation failed
    ValidationFailed = 5001,
    /// Serialization error
    Serialization = 5002,
    /// Payment-specific errors
    Payment = 6000,
    /// Wallet provider errors
    Wallet = 6100,
    /// Storage error
    Storage = 7000,
    /// Object or record already exists
    Duplicate = 7002,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Comprehensive error type for BlockBank operations.
#[derive(Debug, thiserror::Error)]
pub enum BlockbankError {
    /// Authentication or authorization failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Invalid credentials provided.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// Resource not found (profile, transaction, etc.).
    #[error("{resource_type} not found: {identifier}")]
    NotFound {
        /// Type of resource (e.g., "profile", "transaction")
        resource_type: String,
        /// Resource identifier
        identifier: String,
    },

    /// Invalid data provided.
    #[error("invalid {field}: {reason}")]
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A form failed validation; the message is meant for the user.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Payment operation failed.
    #[error("payment failed: {reason}")]
    Payment {
        /// Transaction record ID if one was created
        transaction_id: Option<String>,
        /// Failure reason
        reason: String,
    },

    /// The wallet provider refused or failed the request.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// An object already exists at the target path.
    #[error("{bucket}/{path} already exists")]
    Duplicate {
        /// Bucket name
        bucket: String,
        /// Path inside the bucket
        path: String,
    },

    /// Internal/unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BlockbankError {
    /// Get the numeric error code.
    pub fn code(&self) -> BlockbankErrorCode {
        match self {
            Self::Auth(_) => BlockbankErrorCode::Auth,
            Self::InvalidCredentials(_) => BlockbankErrorCode::InvalidCredentials,
            Self::NotSignedIn => BlockbankErrorCode::NotSignedIn,
            Self::NotFound { .. } => BlockbankErrorCode::NotFound,
            Self::InvalidData { .. } => BlockbankErrorCode::InvalidData,
            Self::ValidationFailed(_) => BlockbankErrorCode::ValidationFailed,
            Self::Serialization(_) => BlockbankErrorCode::Serialization,
            Self::Payment { .. } => BlockbankErrorCode::Payment,
            Self::Wallet(_) => BlockbankErrorCode::Wallet,
            Self::Storage(_) => BlockbankErrorCode::Storage,
            Self::Duplicate { .. } => BlockbankErrorCode::Duplicate,
            Self::Internal(_) => BlockbankErrorCode::Internal,
        }
    }

    /// Message suitable for a transient notification.
    ///
    /// Auth, validation, payment and wallet errors already carry user-facing
    /// text; everything else falls back to the display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(msg) | Self::InvalidCredentials(msg) | Self::ValidationFailed(msg) => {
                msg.clone()
            }
            Self::Payment { reason, .. } => reason.clone(),
            Self::Wallet(err) => err.to_string(),
            Self::NotSignedIn => "Please log in to continue".to_string(),
            other => other.to_string(),
        }
    }

    /// Returns true if retrying the same call might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Wallet(WalletError::Network(_))
        )
    }

    /// Create a not found error.
    pub fn not_found(resource_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a validation error carrying a user-facing message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }
}

impl From<serde_json::Error> for BlockbankError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = BlockbankError::Storage("bucket offline".into());
        assert_eq!(err.code(), BlockbankErrorCode::Storage);
        assert!(err.is_retryable());

        let err = BlockbankError::Wallet(WalletError::UserRejected);
        assert_eq!(err.code(), BlockbankErrorCode::Wallet);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_user_message_unwraps_validation_text() {
        let err = BlockbankError::validation("Please enter recipient email");
        assert_eq!(err.user_message(), "Please enter recipient email");
        assert!(err.to_string().starts_with("validation failed"));
    }

    #[test]
    fn test_helper_constructors() {
        let err = BlockbankError::not_found("profile", "bob@example.com");
        assert_eq!(err.code(), BlockbankErrorCode::NotFound);
        assert!(err.to_string().contains("bob@example.com"));

        let err = BlockbankError::invalid_data("amount", "must be positive");
        assert_eq!(err.code(), BlockbankErrorCode::InvalidData);
    }
}
