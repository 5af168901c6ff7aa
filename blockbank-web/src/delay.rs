//! `setTimeout`-backed sleeping for the account services.

use std::time::Duration;

use async_trait::async_trait;
use blockbank_lib::delay::Delay;
use wasm_bindgen_futures::JsFuture;

use crate::utils;

/// [`Delay`] that resolves a promise from `window.setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeoutDelay;

#[async_trait(?Send)]
impl Delay for TimeoutDelay {
    async fn sleep(&self, duration: Duration) {
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = utils::window().and_then(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            });
            if scheduled.is_err() {
                // No timer available: resolve immediately.
                let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
            }
        });
        let _ = JsFuture::from(promise).await;
    }
}
