//! Test doubles for the collaborator traits.
//!
//! ```rust,ignore
//! use blockbank_lib::test_utils::{MockIdentityProvider, MockWallet};
//!
//! let wallet = MockWallet::new(test_address(1));
//! let identity = MockIdentityProvider::new();
//! identity.add_account("alice@example.com", "password1");
//! ```

mod identity;
mod wallet;

pub use identity::MockIdentityProvider;
pub use wallet::MockWallet;

use crate::wallet::Address;

/// A valid, distinct address per seed.
pub fn test_address(seed: u8) -> Address {
    let hex = format!("{:02x}", seed).repeat(20);
    Address::parse(&format!("0x{}", hex)).expect("40 hex digits")
}
