use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlCanvasElement, HtmlScriptElement};

use super::describe;
use super::instance::JsInstance;
use crate::config::PlayerConfig;
use crate::diagnostics::Relay;
use crate::error::{Error, Result};
use crate::runtime::Bootstrap;

/// Global the stock loader script defines.
pub const DEFAULT_FACTORY: &str = "createUnityInstance";

/// Marks the `<script>` elements this module inserts.
const LOADER_ATTRIBUTE: &str = "data-player-loader";

thread_local! {
    /// Loader URLs already evaluated in this page.
    static LOADED: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Loads the bootstrap script into the page and calls the factory it
/// defines: `factory(canvas, config, onProgress) -> Promise<instance>`.
pub struct ScriptBootstrap {
    factory: String,
}

impl Default for ScriptBootstrap {
    fn default() -> Self {
        Self::new(DEFAULT_FACTORY)
    }
}

impl ScriptBootstrap {
    pub fn new(factory: impl Into<String>) -> Self {
        Self {
            factory: factory.into(),
        }
    }

    pub fn factory(&self) -> &str {
        &self.factory
    }
}

impl Bootstrap for ScriptBootstrap {
    type Instance = JsInstance;

    fn resolve_surface(&self, locator: &str) -> Result<HtmlCanvasElement> {
        let document = document().map_err(Error::SurfaceNotFound)?;
        document
            .query_selector(locator)
            .map_err(|e| Error::SurfaceNotFound(format!("{locator}: {}", describe(&e))))?
            .ok_or_else(|| Error::SurfaceNotFound(locator.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| Error::SurfaceNotFound(format!("{locator} is not a canvas")))
    }

    fn launch(
        &self,
        config: Rc<PlayerConfig>,
        canvas: HtmlCanvasElement,
        relay: Relay,
    ) -> LocalBoxFuture<'static, std::result::Result<JsInstance, String>> {
        let factory = self.factory.clone();
        async move {
            load_script(&config.loader_url).await?;
            let create = factory_function(&factory)?;
            let args = runtime_config(&config, &relay)?;
            let on_progress = {
                let relay = relay.clone();
                Closure::<dyn Fn(f64)>::new(move |p: f64| relay.progress(p)).into_js_value()
            };
            let pending = create
                .call3(&JsValue::NULL, &canvas, &args, &on_progress)
                .map_err(|e| describe(&e))?;
            let raw = JsFuture::from(js_sys::Promise::resolve(&pending))
                .await
                .map_err(|e| describe(&e))?;
            log::info!("{} ready", config.product_name.as_deref().unwrap_or("player"));
            Ok(JsInstance::new(raw))
        }
        .boxed_local()
    }
}

fn document() -> std::result::Result<Document, String> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "no document available".to_string())
}

/// Insert a `<script>` for `url` and wait for it to run. A URL that already
/// loaded is not inserted again; a script that fails to load is removed.
async fn load_script(url: &str) -> std::result::Result<(), String> {
    if LOADED.with(|loaded| loaded.borrow().contains(url)) {
        log::debug!("bootstrap script {url} already loaded");
        return Ok(());
    }

    let document = document()?;
    let script = document
        .create_element("script")
        .map_err(|e| describe(&e))?
        .dyn_into::<HtmlScriptElement>()
        .map_err(|_| "could not create a script element")?;
    script.set_src(url);
    script
        .set_attribute(LOADER_ATTRIBUTE, url)
        .map_err(|e| describe(&e))?;

    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });
    document
        .body()
        .ok_or("document has no body")?
        .append_child(&script)
        .map_err(|e| describe(&e))?;

    log::debug!("loading bootstrap script {url}");
    if JsFuture::from(loaded).await.is_err() {
        script.remove();
        return Err(format!("failed to load bootstrap script {url}"));
    }
    LOADED.with(|loaded| loaded.borrow_mut().insert(url.to_string()));
    Ok(())
}

fn factory_function(name: &str) -> std::result::Result<js_sys::Function, String> {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .map_err(|e| describe(&e))?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| format!("bootstrap script did not define `{name}`"))
}

/// The config object plus `print`/`printErr` hooks that feed the relay.
fn runtime_config(config: &PlayerConfig, relay: &Relay) -> std::result::Result<JsValue, String> {
    let json = config.to_runtime_json().map_err(|e| e.to_string())?;
    let object = js_sys::JSON::parse(&json.to_string()).map_err(|e| describe(&e))?;

    let print = {
        let relay = relay.clone();
        Closure::<dyn Fn(String)>::new(move |m: String| relay.info(&m)).into_js_value()
    };
    let print_err = {
        let relay = relay.clone();
        Closure::<dyn Fn(String)>::new(move |m: String| relay.error(&m)).into_js_value()
    };
    for (key, hook) in [("print", print), ("printErr", print_err)] {
        js_sys::Reflect::set(&object, &JsValue::from_str(key), &hook).map_err(|e| describe(&e))?;
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    async fn failed_script_load_removes_its_element() {
        let err = load_script("missing/nowhere.loader.js").await.unwrap_err();
        assert!(err.contains("missing/nowhere.loader.js"));

        let document = document().unwrap();
        let leftover = document
            .query_selector(&format!("script[{LOADER_ATTRIBUTE}]"))
            .unwrap();
        assert!(leftover.is_none());
        assert!(!LOADED.with(|loaded| loaded.borrow().contains("missing/nowhere.loader.js")));
    }
}
