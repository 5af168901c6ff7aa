//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use blockbank_lib::prelude::*;
//! ```

// Configuration and errors
pub use crate::config::SiteConfig;
pub use crate::errors::{BlockbankError, BlockbankErrorCode};
pub use crate::Result;

// Demo wizard
pub use crate::demo::{Control, DemoFlow, DemoPhase, DemoStep, DemoView, Transition, WizardState};

#[cfg(not(target_arch = "wasm32"))]
pub use crate::demo::DemoDriver;

// Account services
pub use crate::kyc::{Document, DocumentType, KycForm, KycService};
pub use crate::notify::{Notification, NotificationCenter, NotificationLevel, Notifier};
pub use crate::payment::{
    Currency, OutcomeDecider, PaymentForm, PaymentService, RandomOutcome, TransactionRecord,
    TransactionStatus,
};
pub use crate::session::{AuthService, Credentials, IdentityProvider, SessionHandle, User};

// Collaborators
pub use crate::delay::{Delay, NoDelay};
pub use crate::storage::{InMemoryStore, ObjectStore, RecordStore};
pub use crate::wallet::{Address, TxHash, WalletError, WalletProvider};

// Page
pub use crate::shell::{PageShell, Section};
