//! The demo wizard bound to the browser event loop.
//!
//! The processing phase is finished by a `window.setTimeout` callback. The
//! callback only holds a weak reference to the wizard and the ticket of the
//! processing run it was scheduled for, and the timeout is cleared when the
//! wizard is freed.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use blockbank_lib::demo::{DemoFlow, DemoView, ProcessingTicket, Transition};
use blockbank_lib::SiteConfig;
use wasm_bindgen::prelude::*;

use crate::{render, utils};

struct Timer {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

#[derive(Default)]
struct Inner {
    flow: DemoFlow,
    timer: Option<Timer>,
    on_change: Option<js_sys::Function>,
}

/// Interactive transaction demo
#[wasm_bindgen]
pub struct DemoWizard {
    inner: Rc<RefCell<Inner>>,
    delay_ms: i32,
}

impl Default for DemoWizard {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl DemoWizard {
    /// Create a wizard with the stock processing delay
    #[wasm_bindgen(constructor)]
    pub fn new() -> DemoWizard {
        let delay = SiteConfig::default().processing_delay_ms;
        Self::with_delay(u32::try_from(delay).unwrap_or(u32::MAX))
    }

    /// Create a wizard with a custom processing delay in milliseconds
    #[wasm_bindgen(js_name = withDelay)]
    pub fn with_delay(delay_ms: u32) -> DemoWizard {
        DemoWizard {
            inner: Rc::new(RefCell::new(Inner::default())),
            delay_ms: i32::try_from(delay_ms).unwrap_or(i32::MAX),
        }
    }

    pub fn advance(&self) -> Result<(), JsValue> {
        self.apply(DemoFlow::advance)
    }

    pub fn back(&self) -> Result<(), JsValue> {
        self.apply(DemoFlow::back)
    }

    pub fn reset(&self) -> Result<(), JsValue> {
        self.apply(DemoFlow::reset)
    }

    /// Handle a click on a `data-control` button
    pub fn press(&self, control: &str) -> Result<(), JsValue> {
        let control = render::parse_control(control)
            .ok_or_else(|| utils::js_error(&format!("Unknown control: {}", control)))?;
        self.apply(|flow| flow.press(control))
    }

    /// `{ currentStep, isProcessing, isComplete }`
    pub fn state(&self) -> Result<JsValue, JsValue> {
        utils::to_js(&self.inner.borrow().flow.state())
    }

    /// The view model as a JS object
    pub fn view(&self) -> Result<JsValue, JsValue> {
        utils::to_js(&self.inner.borrow().flow.view())
    }

    #[wasm_bindgen(js_name = renderHtml)]
    pub fn render_html(&self) -> String {
        render::wizard(&self.inner.borrow().flow.view())
    }

    /// Register a callback invoked with the new state after every change
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_change = Some(callback);
    }
}

impl DemoWizard {
    pub(crate) fn current_view(&self) -> DemoView {
        self.inner.borrow().flow.view()
    }

    fn apply(&self, action: impl FnOnce(&mut DemoFlow) -> Transition) -> Result<(), JsValue> {
        let transition = action(&mut self.inner.borrow_mut().flow);
        if let Transition::ProcessingStarted(ticket) = transition {
            self.schedule_completion(ticket)?;
        }
        if !transition.is_ignored() {
            emit(&self.inner);
        }
        Ok(())
    }

    fn schedule_completion(&self, ticket: ProcessingTicket) -> Result<(), JsValue> {
        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
        let callback = Closure::once(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let completed = inner.borrow_mut().flow.complete(ticket);
            if completed {
                emit(&inner);
            }
        });

        let handle = utils::window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            self.delay_ms,
        )?;
        // Any previous timer has already fired: processing only restarts
        // after completion.
        self.inner.borrow_mut().timer = Some(Timer {
            handle,
            _callback: callback,
        });
        Ok(())
    }
}

impl Drop for DemoWizard {
    fn drop(&mut self) {
        if let Some(timer) = self.inner.borrow_mut().timer.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(timer.handle);
            }
        }
    }
}

fn emit(inner: &Rc<RefCell<Inner>>) {
    let (callback, state) = {
        let inner = inner.borrow();
        (inner.on_change.clone(), inner.flow.state())
    };
    let Some(callback) = callback else {
        return;
    };
    match utils::to_js(&state) {
        Ok(state) => {
            if let Err(e) = callback.call1(&JsValue::NULL, &state) {
                utils::warn(&format!("onChange callback failed: {:?}", e));
            }
        }
        Err(e) => utils::warn(&format!("could not serialize wizard state: {:?}", e)),
    }
}
