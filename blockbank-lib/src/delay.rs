//! Pluggable sleeping.
//!
//! Services that simulate latency await a [`Delay`] instead of calling a
//! runtime directly, so the browser build can back it with `setTimeout`
//! and tests can skip it.

use std::time::Duration;

use async_trait::async_trait;

/// Something that can wait for a duration.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}

/// [`Delay`] backed by the tokio timer.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioDelay;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// [`Delay`] that returns immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDelay;

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Delay for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}
