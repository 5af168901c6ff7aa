//! EIP-1193 wallet injected by a browser extension (`window.ethereum`).

use async_trait::async_trait;
use blockbank_lib::wallet::{Address, TransferRequest, TxHash, WalletError, WalletProvider};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::utils;

/// [`WalletProvider`] over `window.ethereum.request`.
pub struct InjectedWallet {
    ethereum: JsValue,
}

impl InjectedWallet {
    /// The injected provider, if the page has one.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = js_sys::Reflect::get(&window, &"ethereum".into()).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self { ethereum })
    }

    async fn request(&self, method: &str, params: js_sys::Array) -> Result<JsValue, WalletError> {
        let args = js_sys::Object::new();
        set(&args, "method", &method.into())?;
        set(&args, "params", &params)?;

        let request: js_sys::Function = js_sys::Reflect::get(&self.ethereum, &"request".into())
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or(WalletError::NotInstalled)?;
        let promise: js_sys::Promise = request
            .call1(&self.ethereum, &args)
            .map_err(rpc_error)?
            .dyn_into()
            .map_err(|_| WalletError::Network("provider did not return a promise".into()))?;
        JsFuture::from(promise).await.map_err(rpc_error)
    }
}

fn set(target: &js_sys::Object, key: &str, value: &JsValue) -> Result<(), WalletError> {
    js_sys::Reflect::set(target, &key.into(), value)
        .map(|_| ())
        .map_err(|_| WalletError::Network(format!("could not set {}", key)))
}

/// Map a provider error (`{ code, message }`) to a [`WalletError`].
fn rpc_error(err: JsValue) -> WalletError {
    let field = |name: &str| js_sys::Reflect::get(&err, &name.into()).ok();
    let code = field("code").and_then(|c| c.as_f64()).unwrap_or(-1.0) as i64;
    let message = field("message")
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    WalletError::from_rpc_code(code, message)
}

#[async_trait(?Send)]
impl WalletProvider for InjectedWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        let result = self
            .request("eth_requestAccounts", js_sys::Array::new())
            .await?;
        let accounts = js_sys::Array::from(&result);
        let mut out = Vec::with_capacity(accounts.length() as usize);
        for account in accounts.iter() {
            let Some(raw) = account.as_string() else {
                continue;
            };
            match Address::parse(&raw) {
                Ok(address) => out.push(address),
                Err(e) => utils::warn(&format!("ignoring account {}: {}", raw, e)),
            }
        }
        Ok(out)
    }

    async fn send_transfer(&self, transfer: TransferRequest) -> Result<TxHash, WalletError> {
        let tx = js_sys::Object::new();
        set(&tx, "from", &transfer.from.as_str().into())?;
        set(&tx, "to", &transfer.to.as_str().into())?;
        set(&tx, "value", &format!("0x{:x}", transfer.value_wei).into())?;
        set(&tx, "gas", &format!("0x{:x}", transfer.gas).into())?;

        let result = self
            .request("eth_sendTransaction", js_sys::Array::of1(&tx))
            .await?;
        result
            .as_string()
            .map(TxHash::new)
            .ok_or_else(|| WalletError::Network("provider returned no transaction hash".into()))
    }
}
