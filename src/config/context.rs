use serde::{Deserialize, Serialize};

/// GPU selection hint forwarded to context creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    #[default]
    Default,
    LowPower,
    HighPerformance,
}

/// Rendering-context creation hints.
///
/// Handed to the runtime untouched. Unset fields are omitted from the
/// serialized object so the runtime applies its own defaults, which are the
/// ones [`ContextAttributes::resolved`] reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContextAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub antialias: Option<bool>,
    /// Request a depth buffer of at least 16 bits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stencil: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_preference: Option<PowerPreference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premultiplied_alpha: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_drawing_buffer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desynchronized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xr_compatible: Option<bool>,
}

/// [`ContextAttributes`] with every default filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedContextAttributes {
    pub alpha: bool,
    pub antialias: bool,
    pub depth: bool,
    pub stencil: bool,
    pub power_preference: PowerPreference,
    pub premultiplied_alpha: bool,
    pub preserve_drawing_buffer: bool,
    pub desynchronized: bool,
    pub xr_compatible: bool,
}

impl Default for ResolvedContextAttributes {
    fn default() -> Self {
        Self {
            alpha: true,
            antialias: true,
            depth: true,
            stencil: false,
            power_preference: PowerPreference::Default,
            premultiplied_alpha: true,
            preserve_drawing_buffer: false,
            desynchronized: false,
            xr_compatible: false,
        }
    }
}

impl ContextAttributes {
    pub fn resolved(&self) -> ResolvedContextAttributes {
        let d = ResolvedContextAttributes::default();
        ResolvedContextAttributes {
            alpha: self.alpha.unwrap_or(d.alpha),
            antialias: self.antialias.unwrap_or(d.antialias),
            depth: self.depth.unwrap_or(d.depth),
            stencil: self.stencil.unwrap_or(d.stencil),
            power_preference: self.power_preference.unwrap_or(d.power_preference),
            premultiplied_alpha: self.premultiplied_alpha.unwrap_or(d.premultiplied_alpha),
            preserve_drawing_buffer: self
                .preserve_drawing_buffer
                .unwrap_or(d.preserve_drawing_buffer),
            desynchronized: self.desynchronized.unwrap_or(d.desynchronized),
            xr_compatible: self.xr_compatible.unwrap_or(d.xr_compatible),
        }
    }
}
