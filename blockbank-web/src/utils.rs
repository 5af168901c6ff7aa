//! Utility functions for WASM

use wasm_bindgen::prelude::*;

/// Route Rust panics to `console.error`
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Log a message to the browser console
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    pub fn warn(s: &str);
}

/// Convert a message into a JS `Error`
pub fn js_error(msg: &str) -> JsValue {
    js_sys::Error::new(msg).into()
}

/// Current year from the browser clock, for the footer.
pub fn current_year() -> i32 {
    js_sys::Date::new_0().get_full_year() as i32
}

pub fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| js_error("No window object"))
}

/// Serialize a value into a plain JS object.
pub fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_error(&e.to_string()))
}
