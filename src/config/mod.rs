//! Player configuration.
//!
//! Supplied once per instance. [`crate::lifecycle::Player::create`] takes it
//! by value and keeps it behind an `Rc`, so nothing can change it once
//! loading has started.

mod context;

pub use context::{ContextAttributes, PowerPreference, ResolvedContextAttributes};

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Bootstrap script.
    #[serde(skip_serializing)]
    pub loader_url: String,
    pub data_url: String,
    pub framework_url: String,
    pub code_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming_assets_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_pixel_ratio: Option<f64>,
    #[serde(
        rename = "matchWebGLToCanvasSize",
        skip_serializing_if = "Option::is_none"
    )]
    pub match_webgl_to_canvas_size: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webgl_context_attributes: Option<ContextAttributes>,

    #[serde(skip)]
    diagnostics: Diagnostics,
}

impl PlayerConfig {
    pub fn new(
        loader_url: impl Into<String>,
        data_url: impl Into<String>,
        framework_url: impl Into<String>,
        code_url: impl Into<String>,
    ) -> Self {
        Self {
            loader_url: loader_url.into(),
            data_url: data_url.into(),
            framework_url: framework_url.into(),
            code_url: code_url.into(),
            ..Default::default()
        }
    }

    /// Decode the JSON shape the page hands over. Missing locators decode as
    /// empty strings and are caught by [`PlayerConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config("<json>", e.to_string()))
    }

    /// The object passed to the runtime's factory. The loader locator and
    /// the sinks are ours, not the runtime's, and are left out.
    pub fn to_runtime_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| Error::config("<config>", e.to_string()))
    }

    pub fn with_streaming_assets_url(mut self, url: impl Into<String>) -> Self {
        self.streaming_assets_url = Some(url.into());
        self
    }

    pub fn with_product(
        mut self,
        company: impl Into<String>,
        product: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.company_name = Some(company.into());
        self.product_name = Some(product.into());
        self.product_version = Some(version.into());
        self
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = Some(ratio);
        self
    }

    pub fn with_context_attributes(mut self, attributes: ContextAttributes) -> Self {
        self.webgl_context_attributes = Some(attributes);
        self
    }

    pub fn with_print(mut self, sink: impl Fn(&str) + 'static) -> Self {
        self.diagnostics.set_print(Rc::new(sink));
        self
    }

    pub fn with_print_err(mut self, sink: impl Fn(&str) + 'static) -> Self {
        self.diagnostics.set_print_err(Rc::new(sink));
        self
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn context_attributes(&self) -> ResolvedContextAttributes {
        self.webgl_context_attributes
            .as_ref()
            .map(ContextAttributes::resolved)
            .unwrap_or_default()
    }

    /// Reports the first offending field, in declaration order.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("loaderUrl", self.loader_url.as_str()),
            ("dataUrl", self.data_url.as_str()),
            ("frameworkUrl", self.framework_url.as_str()),
            ("codeUrl", self.code_url.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::config(field, "is required and must not be empty"));
            }
        }

        let optional = [
            ("streamingAssetsUrl", self.streaming_assets_url.as_deref()),
            ("memoryUrl", self.memory_url.as_deref()),
            ("symbolsUrl", self.symbols_url.as_deref()),
        ];
        for (field, value) in optional {
            if value.is_some_and(|v| v.trim().is_empty()) {
                return Err(Error::config(field, "must not be empty when set"));
            }
        }

        if let Some(ratio) = self.device_pixel_ratio
            && !(ratio.is_finite() && ratio > 0.0)
        {
            return Err(Error::config(
                "devicePixelRatio",
                format!("must be a positive number, got {ratio}"),
            ));
        }
        Ok(())
    }
}
