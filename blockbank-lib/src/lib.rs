//! BlockBank library.
//!
//! Everything the BlockBank marketing site needs that is not pixels: the
//! interactive transaction demo, the static marketing copy, and the account
//! features (sign-in, KYC submission, payments) expressed against
//! collaborator traits so that each frontend injects its own identity
//! provider, storage backend and wallet.
//!
//! # Features
//!
//! - **Demo flow**: a four-step wizard with a timed processing phase ([`demo`])
//! - **Content**: hero, solutions, enterprise and customer sections ([`content`])
//! - **Account services**: [`session::AuthService`], [`kyc::KycService`],
//!   [`payment::PaymentService`]
//!
//! # Example
//!
//! ```
//! use blockbank_lib::demo::{DemoFlow, DemoPhase, DemoStep, Transition};
//!
//! let mut flow = DemoFlow::new();
//! flow.advance();
//! flow.advance();
//! flow.advance();
//! assert_eq!(flow.phase(), DemoPhase::Step(DemoStep::Review));
//!
//! let Transition::ProcessingStarted(ticket) = flow.advance() else {
//!     panic!("review step starts processing");
//! };
//! assert!(flow.complete(ticket));
//! assert!(!flow.complete(ticket));
//! ```

pub mod config;
pub mod content;
pub mod delay;
pub mod demo;
pub mod errors;
pub mod kyc;
pub mod notify;
pub mod payment;
pub mod prelude;
pub mod session;
pub mod shell;
pub mod storage;
pub mod wallet;

/// Test doubles for the collaborator traits.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::SiteConfig;
pub use errors::{BlockbankError, BlockbankErrorCode};
pub use notify::{Notification, NotificationLevel};
pub use session::{SessionHandle, User};

/// Common result alias for BlockBank operations.
pub type Result<T> = std::result::Result<T, BlockbankError>;

/// Current unix timestamp in seconds.
pub(crate) fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Generate a new record identifier.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
