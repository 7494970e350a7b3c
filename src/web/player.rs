use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlCanvasElement;

use super::bootstrap::ScriptBootstrap;
use super::instance::JsInstance;
use super::{describe, message_param_from_js};
use crate::config::PlayerConfig;
use crate::error::Error;
use crate::lifecycle::{Player, State, SurfaceRegistry};
use crate::runtime::SurfaceTarget;

thread_local! {
    /// Canvases bound to live players, page-wide.
    static SURFACES: SurfaceRegistry<HtmlCanvasElement> = SurfaceRegistry::new();
}

fn surfaces() -> SurfaceRegistry<HtmlCanvasElement> {
    SURFACES.with(SurfaceRegistry::clone)
}

/// Whether some player on this page currently holds `canvas`.
#[wasm_bindgen(js_name = isSurfaceBound)]
pub fn is_surface_bound(canvas: &HtmlCanvasElement) -> bool {
    surfaces().is_bound(canvas)
}

fn forward(sink: &js_sys::Function, message: &str) {
    if let Err(e) = sink.call1(&JsValue::NULL, &JsValue::from_str(message)) {
        log::warn!("diagnostics sink threw: {}", describe(&e));
    }
}

#[wasm_bindgen]
pub struct WebPlayer {
    player: Player<JsInstance>,
    config: PlayerConfig,
    bootstrap: ScriptBootstrap,
}

#[wasm_bindgen]
impl WebPlayer {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WebPlayer, JsError> {
        let config = PlayerConfig::from_json(config_json)?;
        Ok(WebPlayer {
            player: Player::new(surfaces()),
            config,
            bootstrap: ScriptBootstrap::default(),
        })
    }

    #[wasm_bindgen(js_name = setPrint)]
    pub fn set_print(&mut self, sink: js_sys::Function) -> Result<(), JsError> {
        self.ensure_idle("configure")?;
        let config = std::mem::take(&mut self.config);
        self.config = config.with_print(move |m| forward(&sink, m));
        Ok(())
    }

    #[wasm_bindgen(js_name = setPrintErr)]
    pub fn set_print_err(&mut self, sink: js_sys::Function) -> Result<(), JsError> {
        self.ensure_idle("configure")?;
        let config = std::mem::take(&mut self.config);
        self.config = config.with_print_err(move |m| forward(&sink, m));
        Ok(())
    }

    /// Name of the global factory the bootstrap script defines.
    #[wasm_bindgen(js_name = setFactory)]
    pub fn set_factory(&mut self, name: String) -> Result<(), JsError> {
        self.ensure_idle("configure")?;
        self.bootstrap = ScriptBootstrap::new(name);
        Ok(())
    }

    /// `target` is a canvas element or a selector for one. Throws on invalid
    /// configuration or an already bound canvas; otherwise resolves once the
    /// player is running and rejects if the bootstrap fails.
    pub fn create(&self, target: JsValue) -> Result<js_sys::Promise, JsError> {
        let target = match target.as_string() {
            Some(selector) => SurfaceTarget::Locator(selector),
            None => SurfaceTarget::Handle(target.dyn_into::<HtmlCanvasElement>().map_err(
                |_| Error::SurfaceNotFound("expected a canvas element or a selector".into()),
            )?),
        };
        let creation = self
            .player
            .create(self.config.clone(), target, &self.bootstrap)?;
        Ok(future_to_promise(async move {
            creation
                .await
                .map(|()| JsValue::UNDEFINED)
                .map_err(|e| JsValue::from(JsError::from(e)))
        }))
    }

    #[wasm_bindgen(js_name = sendMessage)]
    pub fn send_message(&self, object: &str, method: &str, param: JsValue) -> Result<(), JsError> {
        let param = message_param_from_js(&param)?;
        self.player.send_message(object, method, param)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setFullscreen)]
    pub fn set_fullscreen(&self, enabled: bool) -> Result<(), JsError> {
        self.player.set_fullscreen(enabled)?;
        Ok(())
    }

    pub fn quit(&self) -> js_sys::Promise {
        let teardown = self.player.quit();
        future_to_promise(async move {
            teardown
                .await
                .map(|()| JsValue::UNDEFINED)
                .map_err(|e| JsValue::from(JsError::from(e)))
        })
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.player.state().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f64 {
        self.player.progress()
    }

    #[wasm_bindgen(getter)]
    pub fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.player
            .instance_surface()
            .or_else(|| self.player.surface())
    }
}

impl WebPlayer {
    fn ensure_idle(&self, operation: &'static str) -> Result<(), Error> {
        match self.player.state() {
            State::Idle => Ok(()),
            state => Err(Error::InvalidTransition { operation, state }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn throwing_sink_does_not_escape() {
        let sink = js_sys::Function::new_with_args("m", "throw new Error('sink: ' + m)");
        forward(&sink, "hello");

        let config = PlayerConfig::default().with_print(move |m| forward(&sink, m));
        config.diagnostics().info("still relayed");
    }
}
