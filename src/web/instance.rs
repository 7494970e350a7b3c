use futures::future::{FutureExt, LocalBoxFuture};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlCanvasElement;

use super::describe;
use crate::protocol::{Message, MessageParam};
use crate::runtime::RuntimeInstance;

#[wasm_bindgen]
extern "C" {
    /// Whatever the factory promise resolved with.
    type RawInstance;

    #[wasm_bindgen(method, catch, js_name = SendMessage)]
    fn send_message(this: &RawInstance, object: &str, method: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = SendMessage)]
    fn send_message_with(
        this: &RawInstance,
        object: &str,
        method: &str,
        param: &JsValue,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = SetFullscreen)]
    fn set_fullscreen(this: &RawInstance, flag: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = Quit)]
    fn quit(this: &RawInstance) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, getter, js_name = Module)]
    fn module(this: &RawInstance) -> JsValue;
}

/// A runtime instance living on the JS side.
pub struct JsInstance {
    raw: RawInstance,
}

impl JsInstance {
    pub fn new(raw: JsValue) -> Self {
        Self {
            raw: raw.unchecked_into(),
        }
    }
}

impl RuntimeInstance for JsInstance {
    type Surface = HtmlCanvasElement;

    fn send_message(&self, message: &Message) {
        let (object, method) = (message.object(), message.method());
        let sent = match message.param() {
            MessageParam::None => self.raw.send_message(object, method),
            MessageParam::Str(s) => {
                self.raw
                    .send_message_with(object, method, &JsValue::from_str(s))
            }
            MessageParam::Num(n) => {
                self.raw
                    .send_message_with(object, method, &JsValue::from_f64(*n))
            }
            MessageParam::Bool(b) => {
                self.raw
                    .send_message_with(object, method, &JsValue::from_bool(*b))
            }
        };
        // No acknowledgement channel exists; a throw is all we can report.
        if let Err(e) = sent {
            log::warn!("{message} threw: {}", describe(&e));
        }
    }

    fn set_fullscreen(&self, enabled: bool) {
        if let Err(e) = self.raw.set_fullscreen(u32::from(enabled)) {
            log::warn!("SetFullscreen threw: {}", describe(&e));
        }
    }

    fn quit(&self) -> LocalBoxFuture<'static, Result<(), String>> {
        let pending = self.raw.quit();
        async move {
            let pending = pending.map_err(|e| describe(&e))?;
            JsFuture::from(js_sys::Promise::resolve(&pending))
                .await
                .map(drop)
                .map_err(|e| describe(&e))
        }
        .boxed_local()
    }

    fn surface(&self) -> Option<HtmlCanvasElement> {
        js_sys::Reflect::get(&self.raw.module(), &JsValue::from_str("canvas"))
            .ok()?
            .dyn_into()
            .ok()
    }
}
