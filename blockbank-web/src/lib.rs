//! BlockBank Web - WebAssembly bindings
//!
//! Browser bindings for the BlockBank site: the demo wizard driven by
//! `setTimeout`, the injected EIP-1193 wallet, and the account sections.
//! HTML rendering lives in [`render`] and also builds natively.

pub mod render;

#[cfg(target_arch = "wasm32")]
mod bank;
#[cfg(target_arch = "wasm32")]
mod delay;
#[cfg(target_arch = "wasm32")]
mod utils;
#[cfg(target_arch = "wasm32")]
mod wallet;
#[cfg(target_arch = "wasm32")]
mod wizard;

#[cfg(target_arch = "wasm32")]
pub use bank::{is_scrolled, BrowserBank};
#[cfg(target_arch = "wasm32")]
pub use delay::TimeoutDelay;
#[cfg(target_arch = "wasm32")]
pub use wallet::InjectedWallet;
#[cfg(target_arch = "wasm32")]
pub use wizard::DemoWizard;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Initialize the WASM module
///
/// Runs once when the module is loaded and routes panics to the console.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
    utils::log("BlockBank WASM module initialized");
}

/// Get the version of the BlockBank WASM module
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
