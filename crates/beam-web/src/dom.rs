use beam_core::{DEFAULT_ELEMENT_STYLES, MINIMAL_ELEMENT_STYLES};
use wasm_bindgen::JsCast;
use web_sys as web;

pub const BEAM_CLASS: &str = "react-light-beam";

const LAYER_CSS: &str =
    "position:absolute;top:0;left:0;width:100%;height:100%;overflow:hidden;pointer-events:none";

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// `window.innerHeight`, or 0 when unavailable.
#[inline]
pub fn window_height() -> f64 {
    web::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

#[inline]
pub fn set_style(el: &web::HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        log::warn!("[dom] set {property} failed: {:?}", e);
    }
}

/// Class, id and the inline defaults every mounted beam gets.
pub fn prepare_beam_element(
    el: &web::HtmlElement,
    class_name: Option<&str>,
    id: Option<&str>,
    disable_default_styles: bool,
) {
    let classes = el.class_list();
    let _ = classes.add_1(BEAM_CLASS);
    for extra in class_name.unwrap_or_default().split_whitespace() {
        let _ = classes.add_1(extra);
    }
    if let Some(id) = id {
        el.set_id(id);
    }
    let styles = if disable_default_styles {
        MINIMAL_ELEMENT_STYLES
    } else {
        DEFAULT_ELEMENT_STYLES
    };
    let style = el.style();
    for (property, value) in styles {
        // Page-provided inline styles win over the defaults.
        let existing = style.get_property_value(property).unwrap_or_default();
        if existing.is_empty() {
            set_style(el, property, value);
        }
    }
}

/// Effect elements are tagged with `data-effect` rather than an id so several
/// beams can share a page.
pub fn create_div(document: &web::Document, tag: &str, css: &str) -> anyhow::Result<web::HtmlElement> {
    let el = document
        .create_element("div")
        .map_err(|e| anyhow::anyhow!("create_element: {:?}", e))?
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    el.set_attribute("data-effect", tag)
        .map_err(|e| anyhow::anyhow!("set data-effect: {:?}", e))?;
    el.set_attribute("style", css)
        .map_err(|e| anyhow::anyhow!("set style: {:?}", e))?;
    el.set_attribute("aria-hidden", "true")
        .map_err(|e| anyhow::anyhow!("set aria-hidden: {:?}", e))?;
    Ok(el)
}

/// Full-size overlay inside the beam that hosts particle and mist elements.
pub fn create_layer(parent: &web::HtmlElement, tag: &str) -> anyhow::Result<web::HtmlElement> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let layer = create_div(&document, tag, LAYER_CSS)?;
    parent
        .append_child(&layer)
        .map_err(|e| anyhow::anyhow!("append layer: {:?}", e))?;
    Ok(layer)
}
