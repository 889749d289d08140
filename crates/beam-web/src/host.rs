use crate::dom;
use beam_core::{BeamHost, BeamStyle, BindingKey, ScrollSample, ScrollSource, TriggerGeometry};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Browser callbacks routed back into the mounted beam.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Scroll,
    Resize,
    Frame,
    Settle,
    AmbientFrame,
    ColorScheme(bool),
}

pub type Dispatch = Rc<dyn Fn(Signal)>;

pub fn callback(dispatch: &Dispatch, signal: Signal) -> Closure<dyn FnMut()> {
    let dispatch = dispatch.clone();
    Closure::wrap(Box::new(move || dispatch(signal)) as Box<dyn FnMut()>)
}

/// Scroll listener on the scroll source plus a resize listener on the window.
pub struct ScrollListener {
    target: web::EventTarget,
    on_scroll: Closure<dyn FnMut()>,
    on_resize: Closure<dyn FnMut()>,
}

impl ScrollListener {
    fn attach(target: web::EventTarget, dispatch: &Dispatch) -> Option<Self> {
        let window = web::window()?;
        let on_scroll = callback(dispatch, Signal::Scroll);
        let on_resize = callback(dispatch, Signal::Resize);
        if let Err(e) =
            target.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())
        {
            log::warn!("[bind] scroll listener failed: {:?}", e);
            return None;
        }
        if let Err(e) =
            window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        {
            log::warn!("[bind] resize listener failed: {:?}", e);
            let _ = target
                .remove_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref());
            return None;
        }
        Some(Self {
            target,
            on_scroll,
            on_resize,
        })
    }

    fn detach(self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("scroll", self.on_scroll.as_ref().unchecked_ref());
        if let Some(window) = web::window() {
            let _ = window.remove_event_listener_with_callback(
                "resize",
                self.on_resize.as_ref().unchecked_ref(),
            );
        }
    }
}

pub struct WebHost {
    element: web::HtmlElement,
    container: Option<(u32, web::Element)>,
    next_container_id: u32,
    dispatch: Dispatch,
    frame_callback: Closure<dyn FnMut()>,
    settle_callback: Closure<dyn FnMut()>,
    frame_handle: Option<i32>,
    settle_handle: Option<i32>,
    viewport_height: f64,
}

impl WebHost {
    pub fn new(element: web::HtmlElement, dispatch: Dispatch) -> Self {
        Self {
            element,
            container: None,
            next_container_id: 0,
            frame_callback: callback(&dispatch, Signal::Frame),
            settle_callback: callback(&dispatch, Signal::Settle),
            dispatch,
            frame_handle: None,
            settle_handle: None,
            viewport_height: 0.0,
        }
    }

    pub fn element(&self) -> &web::HtmlElement {
        &self.element
    }

    /// Register the element whose scrolling drives the beam.
    ///
    /// The same element keeps its id, so re-passing it does not rebind.
    pub fn set_scroll_container(&mut self, element: Option<web::Element>) -> ScrollSource {
        let Some(element) = element else {
            self.container = None;
            return ScrollSource::Viewport;
        };
        if let Some((id, current)) = &self.container {
            if current.is_same_node(Some(element.as_ref())) {
                return ScrollSource::Container(*id);
            }
        }
        self.next_container_id += 1;
        let id = self.next_container_id;
        self.container = Some((id, element));
        ScrollSource::Container(id)
    }

    fn container(&self, id: u32) -> Option<&web::Element> {
        self.container
            .as_ref()
            .filter(|(current, _)| *current == id)
            .map(|(_, element)| element)
    }

    pub fn frame_fired(&mut self) {
        self.frame_handle = None;
    }

    pub fn settle_fired(&mut self) {
        self.settle_handle = None;
    }
}

impl BeamHost for WebHost {
    type Listener = ScrollListener;

    fn environment_ready(&self) -> bool {
        dom::window_document().is_some()
    }

    fn attach(&mut self, key: &BindingKey) -> Option<ScrollListener> {
        if !self.element.is_connected() {
            return None;
        }
        let target: web::EventTarget = match key.source {
            ScrollSource::Viewport => web::window()?.into(),
            ScrollSource::Container(id) => self.container(id)?.clone().into(),
        };
        ScrollListener::attach(target, &self.dispatch)
    }

    fn detach(&mut self, listener: ScrollListener) {
        listener.detach();
    }

    fn refresh_geometry(&mut self, key: &BindingKey) {
        self.viewport_height = match key.source {
            ScrollSource::Viewport => dom::window_height(),
            ScrollSource::Container(id) => self
                .container(id)
                .map(|c| c.client_height() as f64)
                .unwrap_or(0.0),
        };
    }

    fn measure(&mut self, key: &BindingKey) -> Option<ScrollSample> {
        if !self.element.is_connected() {
            return None;
        }
        let offset = match key.source {
            ScrollSource::Viewport => 0.0,
            ScrollSource::Container(id) => self.container(id)?.get_bounding_client_rect().top(),
        };
        let rect = self.element.get_bounding_client_rect();
        Some(ScrollSample::Element(TriggerGeometry {
            top: rect.top() - offset,
            height: rect.height(),
            viewport_height: self.viewport_height,
        }))
    }

    fn request_frame(&mut self) -> bool {
        let Some(window) = web::window() else {
            return false;
        };
        match window.request_animation_frame(self.frame_callback.as_ref().unchecked_ref()) {
            Ok(handle) => {
                self.frame_handle = Some(handle);
                true
            }
            Err(e) => {
                log::warn!("[frame] requestAnimationFrame failed: {:?}", e);
                false
            }
        }
    }

    fn cancel_frame(&mut self) {
        if let (Some(handle), Some(window)) = (self.frame_handle.take(), web::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
    }

    fn schedule_settle(&mut self, delay: Duration) -> bool {
        let Some(window) = web::window() else {
            return false;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            self.settle_callback.as_ref().unchecked_ref(),
            delay.as_millis() as i32,
        ) {
            Ok(handle) => {
                self.settle_handle = Some(handle);
                true
            }
            Err(e) => {
                log::warn!("[bind] settle timer failed: {:?}", e);
                false
            }
        }
    }

    fn cancel_settle(&mut self) {
        if let (Some(handle), Some(window)) = (self.settle_handle.take(), web::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }

    fn apply(&mut self, style: &BeamStyle) -> bool {
        if !self.element.is_connected() {
            return false;
        }
        let el = &self.element;
        dom::set_style(el, "background", &style.background);
        dom::set_style(el, "opacity", &style.opacity.to_string());
        dom::set_style(el, "mask-image", &style.mask_image);
        dom::set_style(el, "-webkit-mask-image", &style.mask_image);
        for (property, value) in &style.custom_properties {
            dom::set_style(el, property, value);
        }
        true
    }
}

impl Drop for WebHost {
    // Pending callbacks must not fire into dropped closures.
    fn drop(&mut self) {
        self.cancel_frame();
        self.cancel_settle();
    }
}
