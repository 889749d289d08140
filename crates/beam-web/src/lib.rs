#![cfg(target_arch = "wasm32")]
//! Browser binding for the light beam engine.
//!
//! ```js
//! const beam = new LightBeam(div, { fullWidth: 0.8, dust: { enabled: true } });
//! beam.setOptions({ invert: true });
//! beam.unmount();
//! ```

mod ambient;
mod dom;
mod host;
mod options;
mod theme;

use ambient::AmbientRunner;
use beam_core::{BeamConfig, ConfigChange, ScrollSource, UpdateScheduler};
use host::{Dispatch, ScrollListener, Signal, WebHost};
use options::MountOptions;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use theme::ColorSchemeWatcher;
use wasm_bindgen::prelude::*;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("beam-web starting");
    Ok(())
}

fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

struct BeamInner {
    config: BeamConfig,
    source: ScrollSource,
    dark: bool,
    scheduler: UpdateScheduler<ScrollListener>,
    host: WebHost,
    ambient: AmbientRunner,
    theme: Option<ColorSchemeWatcher>,
    dispatch: Dispatch,
    mounted: bool,
}

impl BeamInner {
    fn new(element: web::HtmlElement, dispatch: Dispatch) -> Self {
        let scheduler = UpdateScheduler::new();
        let ambient = AmbientRunner::new(
            element.clone(),
            scheduler.base_opacity(),
            scheduler.pulse_multiplier(),
            &dispatch,
        );
        Self {
            config: BeamConfig::default(),
            source: ScrollSource::Viewport,
            dark: false,
            host: WebHost::new(element, dispatch.clone()),
            scheduler,
            ambient,
            theme: None,
            dispatch,
            mounted: true,
        }
    }

    fn handle(&mut self, signal: Signal) {
        if !self.mounted {
            return;
        }
        match signal {
            Signal::Scroll => self.scheduler.on_scroll(&mut self.host),
            Signal::Resize => self.scheduler.on_resize(&mut self.host),
            Signal::Frame => {
                self.host.frame_fired();
                self.scheduler.on_frame(&mut self.host);
            }
            Signal::Settle => {
                self.host.settle_fired();
                self.scheduler.on_settle(&mut self.host);
            }
            Signal::AmbientFrame => self.ambient.on_tick(),
            Signal::ColorScheme(dark) => self.set_dark_mode(dark),
        }
    }

    fn apply_options(&mut self, options: MountOptions) {
        if !self.mounted {
            log::warn!("[mount] options ignored after unmount");
            return;
        }
        dom::prepare_beam_element(
            self.host.element(),
            options.class_name.as_deref(),
            options.id.as_deref(),
            options.disable_default_styles,
        );
        self.follow_color_scheme(options.follow_color_scheme);
        self.source = self.host.set_scroll_container(options.scroll_element.clone());
        let mut config = options.beam_config();
        config.source = self.source;
        self.reconfigure(config);
    }

    fn reconfigure(&mut self, config: BeamConfig) {
        match self.scheduler.reconfigure(&mut self.host, &config, self.dark) {
            ConfigChange::Skipped => {
                log::debug!("[mount] scroll source unavailable; retried on next setOptions")
            }
            change => log::debug!("[mount] config {:?}", change),
        }
        self.ambient.sync(&config, self.dark);
        self.config = config;
    }

    fn follow_color_scheme(&mut self, enabled: bool) {
        match (enabled, self.theme.is_some()) {
            (true, false) => match ColorSchemeWatcher::new(&self.dispatch) {
                Ok(watcher) => {
                    let dark = watcher.matches();
                    self.theme = Some(watcher);
                    self.set_dark_mode(dark);
                }
                Err(e) => log::warn!("[theme] {e:#}"),
            },
            (false, true) => self.theme = None,
            _ => {}
        }
    }

    fn set_dark_mode(&mut self, dark: bool) {
        if self.dark == dark {
            return;
        }
        self.dark = dark;
        self.scheduler.set_dark_mode(&mut self.host, dark);
        self.ambient.sync(&self.config, dark);
    }

    fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.theme = None;
        self.scheduler.unbind(&mut self.host);
        self.ambient.stop();
        log::info!("[mount] beam unmounted");
    }
}

fn dispatcher(weak: Weak<RefCell<BeamInner>>) -> Dispatch {
    Rc::new(move |signal: Signal| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        match inner.try_borrow_mut() {
            Ok(mut inner) => inner.handle(signal),
            Err(_) => log::debug!("[signal] {:?} dropped while busy", signal),
        };
    })
}

/// Handle to a beam bound to one element.
#[wasm_bindgen]
pub struct LightBeam {
    inner: Rc<RefCell<BeamInner>>,
}

#[wasm_bindgen]
impl LightBeam {
    /// Style `element` as a beam and start following scroll.
    ///
    /// `on_loaded` is invoked once after the initial state has been written.
    #[wasm_bindgen(constructor)]
    pub fn mount(
        element: web::HtmlElement,
        options: JsValue,
        on_loaded: Option<js_sys::Function>,
    ) -> Result<LightBeam, JsValue> {
        let options = MountOptions::from_js(&options).map_err(to_js)?;
        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<BeamInner>>| {
            RefCell::new(BeamInner::new(element, dispatcher(weak.clone())))
        });
        inner.borrow_mut().apply_options(options);
        log::info!("[mount] beam mounted");
        if let Some(on_loaded) = on_loaded {
            if let Err(e) = on_loaded.call0(&JsValue::NULL) {
                log::warn!("[mount] onLoaded threw: {:?}", e);
            }
        }
        Ok(Self { inner })
    }

    /// Replace every option; only geometry changes reattach the scroll listener.
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&self, options: JsValue) -> Result<(), JsValue> {
        let options = MountOptions::from_js(&options).map_err(to_js)?;
        self.inner.borrow_mut().apply_options(options);
        Ok(())
    }

    /// Force light or dark colors. A running color-scheme watcher may switch back later.
    #[wasm_bindgen(js_name = setDarkMode)]
    pub fn set_dark_mode(&self, dark: bool) {
        self.inner.borrow_mut().set_dark_mode(dark);
    }

    #[wasm_bindgen(js_name = watchColorScheme)]
    pub fn watch_color_scheme(&self, enabled: bool) {
        self.inner.borrow_mut().follow_color_scheme(enabled);
    }

    /// Progress last written to the element, if any.
    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> Option<f64> {
        self.inner
            .borrow()
            .scheduler
            .current()
            .map(|visual| visual.progress)
    }

    /// Detach listeners, cancel pending callbacks and remove effect elements.
    pub fn unmount(&self) {
        self.inner.borrow_mut().unmount();
    }
}

impl Drop for LightBeam {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.unmount();
        }
    }
}
