//! Browser bridge, compiled for `wasm32` only.
//!
//! [`ScriptBootstrap`] loads the player's bootstrap script with a `<script>`
//! tag and calls the factory it defines; [`JsInstance`] adapts the object the
//! factory resolves with; [`WebPlayer`] exports the lifecycle to JavaScript.

mod bootstrap;
mod instance;
mod player;

pub use bootstrap::{DEFAULT_FACTORY, ScriptBootstrap};
pub use instance::JsInstance;
pub use player::{WebPlayer, is_surface_bound};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::error::{Error, Result};
use crate::protocol::MessageParam;

#[cfg(test)]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

/// Install `wasm_logger` as the default diagnostics channel. Call once at
/// startup; later calls are reported by the logger and otherwise ignored.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    let level = level
        .and_then(|l| l.parse().ok())
        .unwrap_or(log::Level::Info);
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("player bridge initializing");
}

/// Narrow a JS value to a message parameter. Objects, arrays, functions and
/// the like are rejected rather than coerced.
pub fn message_param_from_js(value: &JsValue) -> Result<MessageParam> {
    if value.is_undefined() || value.is_null() {
        Ok(MessageParam::None)
    } else if let Some(s) = value.as_string() {
        Ok(MessageParam::Str(s))
    } else if let Some(n) = value.as_f64() {
        Ok(MessageParam::Num(n))
    } else if let Some(b) = value.as_bool() {
        Ok(MessageParam::Bool(b))
    } else {
        Err(Error::InvalidMessage(format!(
            "parameter must be a string, number or boolean, got {}",
            value.js_typeof().as_string().unwrap_or_default()
        )))
    }
}

pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        s
    } else if let Some(e) = value.dyn_ref::<js_sys::Error>() {
        String::from(e.message())
    } else {
        format!("{value:?}")
    }
}
