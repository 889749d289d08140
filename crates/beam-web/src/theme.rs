use crate::host::{Dispatch, Signal};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// Follows the OS color scheme; the listener is removed on drop.
pub struct ColorSchemeWatcher {
    query: web::MediaQueryList,
    on_change: Closure<dyn FnMut()>,
}

impl ColorSchemeWatcher {
    pub fn new(dispatch: &Dispatch) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let query = window
            .match_media(DARK_QUERY)
            .map_err(|e| anyhow::anyhow!("matchMedia: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("matchMedia unsupported"))?;
        let on_change = {
            let query = query.clone();
            let dispatch = dispatch.clone();
            Closure::wrap(Box::new(move || {
                let dark = query.matches();
                log::debug!("[theme] dark mode match: {dark}");
                dispatch(Signal::ColorScheme(dark));
            }) as Box<dyn FnMut()>)
        };
        query
            .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("listen {DARK_QUERY}: {:?}", e))?;
        Ok(Self { query, on_change })
    }

    pub fn matches(&self) -> bool {
        self.query.matches()
    }
}

impl Drop for ColorSchemeWatcher {
    fn drop(&mut self) {
        let _ = self
            .query
            .remove_event_listener_with_callback("change", self.on_change.as_ref().unchecked_ref());
    }
}
