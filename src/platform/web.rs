//! `setInterval`-backed tick source

use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::animation::IntervalHandle;

/// A registered browser interval. The callback lives as long as the handle.
pub struct BrowserInterval {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl BrowserInterval {
    /// Register `callback` to run every `period`
    pub fn start(period: Duration, callback: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = Closure::<dyn FnMut()>::new(callback);
        let timeout = i32::try_from(period.as_millis()).unwrap_or(i32::MAX);
        let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            timeout,
        )?;
        Ok(Self {
            id,
            _callback: callback,
        })
    }
}

impl IntervalHandle for BrowserInterval {
    fn cancel(self) {
        // Single-threaded page: once cleared, the callback cannot run again
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}
