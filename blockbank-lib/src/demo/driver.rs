//! Tokio-backed owner of a [`DemoFlow`].
//!
//! The driver turns [`Transition::ProcessingStarted`] into a one-shot timer
//! task. The task only holds a `Weak` reference to the flow and is aborted
//! when the driver is dropped, so a wizard that is torn down mid-processing
//! is never touched afterwards.

use std::sync::{Arc, Mutex as StdMutex, Weak};
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::AbortHandle;
use tracing::{debug, info};

use super::{Control, DemoFlow, DemoView, ProcessingTicket, Transition, WizardState};
use crate::SiteConfig;

struct Shared {
    flow: Mutex<DemoFlow>,
    state_tx: watch::Sender<WizardState>,
}

impl Shared {
    fn publish(&self, flow: &DemoFlow) {
        self.state_tx.send_replace(flow.state());
    }
}

/// A running demo wizard.
///
/// Must be used from within a tokio runtime.
///
/// # Example
///
/// ```
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() {
/// use std::time::Duration;
/// use blockbank_lib::demo::DemoDriver;
///
/// let driver = DemoDriver::new(Duration::from_secs(3));
/// for _ in 0..4 {
///     driver.advance().await;
/// }
/// assert!(driver.state().is_processing);
///
/// driver.wait_until_complete().await;
/// assert!(driver.state().is_complete);
/// # }
/// ```
pub struct DemoDriver {
    shared: Arc<Shared>,
    processing_delay: Duration,
    timer: StdMutex<Option<AbortHandle>>,
}

impl DemoDriver {
    pub fn new(processing_delay: Duration) -> Self {
        let flow = DemoFlow::new();
        let (state_tx, _) = watch::channel(flow.state());
        Self {
            shared: Arc::new(Shared {
                flow: Mutex::new(flow),
                state_tx,
            }),
            processing_delay,
            timer: StdMutex::new(None),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.processing_delay())
    }

    /// Current snapshot.
    pub fn state(&self) -> WizardState {
        *self.shared.state_tx.borrow()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<WizardState> {
        self.shared.state_tx.subscribe()
    }

    pub async fn view(&self) -> DemoView {
        self.shared.flow.lock().await.view()
    }

    pub async fn advance(&self) -> Transition {
        self.apply(DemoFlow::advance).await
    }

    pub async fn back(&self) -> Transition {
        self.apply(DemoFlow::back).await
    }

    pub async fn reset(&self) -> Transition {
        self.apply(DemoFlow::reset).await
    }

    pub async fn press(&self, control: Control) -> Transition {
        self.apply(|flow| flow.press(control)).await
    }

    /// Wait until the wizard reaches the completion screen.
    pub async fn wait_until_complete(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this only ends on completion.
        let _ = rx.wait_for(|state| state.is_complete).await;
    }

    async fn apply(&self, action: impl FnOnce(&mut DemoFlow) -> Transition) -> Transition {
        let transition = {
            let mut flow = self.shared.flow.lock().await;
            let transition = action(&mut *flow);
            if !transition.is_ignored() {
                self.shared.publish(&flow);
            }
            transition
        };

        if let Transition::ProcessingStarted(ticket) = transition {
            self.schedule_completion(ticket);
        }
        transition
    }

    fn schedule_completion(&self, ticket: ProcessingTicket) {
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        let delay = self.processing_delay;

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(shared) = shared.upgrade() else {
                debug!("demo dropped before processing finished");
                return;
            };
            let mut flow = shared.flow.lock().await;
            if flow.complete(ticket) {
                shared.publish(&flow);
                info!("demo transaction complete");
            }
        });

        let mut timer = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = timer.replace(task.abort_handle()) {
            // A finished timer from an earlier round; aborting is a no-op.
            previous.abort();
        }
    }
}

impl Drop for DemoDriver {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(3000);

    async fn driver_at_processing() -> DemoDriver {
        let driver = DemoDriver::new(DELAY);
        for _ in 0..4 {
            driver.advance().await;
        }
        driver
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_after_delay() {
        let driver = driver_at_processing().await;
        assert!(driver.state().is_processing);

        tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
        assert!(driver.state().is_processing);

        tokio::time::sleep(Duration::from_millis(2)).await;
        let state = driver.state();
        assert!(state.is_complete);
        assert!(!state.is_processing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_advance_does_not_reschedule() {
        let driver = driver_at_processing().await;
        let mut rx = driver.subscribe();
        rx.mark_unchanged();

        assert_eq!(driver.advance().await, Transition::Ignored);

        driver.wait_until_complete().await;
        let mut changes = 0;
        while rx.has_changed().unwrap() {
            rx.mark_unchanged();
            changes += 1;
        }
        assert_eq!(changes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_stray_completion_after_reset() {
        let driver = driver_at_processing().await;
        driver.wait_until_complete().await;
        assert_eq!(driver.reset().await, Transition::Reset);

        tokio::time::sleep(DELAY * 3).await;
        assert_eq!(driver.state(), WizardState::INITIAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_mid_timer_leaves_state_untouched() {
        let driver = driver_at_processing().await;
        let rx = driver.subscribe();
        drop(driver);

        tokio::time::sleep(DELAY * 2).await;
        let last = *rx.borrow();
        assert!(last.is_processing);
        assert!(!last.is_complete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_press_routes_controls() {
        let driver = DemoDriver::new(DELAY);
        assert_eq!(driver.press(Control::Back).await, Transition::Ignored);
        driver.press(Control::Continue).await;
        driver.press(Control::Back).await;
        assert_eq!(driver.state(), WizardState::INITIAL);
    }
}
