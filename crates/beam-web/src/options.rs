use beam_core::BeamConfig;
use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Options object accepted by `new LightBeam(element, options)` and `setOptions`.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MountOptions {
    #[serde(flatten)]
    pub beam: BeamConfig,
    pub class_name: Option<String>,
    pub id: Option<String>,
    pub disable_default_styles: bool,
    /// Track `prefers-color-scheme` and switch colors automatically.
    pub follow_color_scheme: bool,
    #[serde(skip)]
    pub scroll_element: Option<web::Element>,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            beam: BeamConfig::default(),
            class_name: None,
            id: None,
            disable_default_styles: false,
            follow_color_scheme: true,
            scroll_element: None,
        }
    }
}

impl MountOptions {
    pub fn from_js(value: &JsValue) -> anyhow::Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        #[allow(deprecated)]
        let mut options: Self = value
            .into_serde()
            .map_err(|e| anyhow::anyhow!("invalid options: {e}"))?;
        options.scroll_element = js_sys::Reflect::get(value, &JsValue::from_str("scrollElement"))
            .ok()
            .and_then(|v| v.dyn_into::<web::Element>().ok());
        Ok(options)
    }

    /// Engine config with invalid fields logged and repaired.
    pub fn beam_config(&self) -> BeamConfig {
        if let Err(e) = self.beam.validate() {
            log::warn!("[config] {e}; using repaired values");
        }
        self.beam.sanitized()
    }
}
