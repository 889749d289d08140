use crate::dom;
use crate::host::{callback, Dispatch, Signal};
use beam_core::{
    mist_background, mist_css, mist_transform, particle_css, particle_transform, with_alpha,
    AmbientEffects, BaseOpacity, BeamConfig, EffectChange, PulseMultiplier,
    PULSE_MULTIPLIER_PROPERTY,
};
use fnv::FnvHashMap;
use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const LAYER_TAG: &str = "beam-ambient";

/// DOM side of the dust, mist and pulse loops, ticked on requestAnimationFrame.
pub struct AmbientRunner {
    beam: web::HtmlElement,
    effects: AmbientEffects,
    base_opacity: BaseOpacity,
    clock: Instant,
    layer: Option<web::HtmlElement>,
    dust: FnvHashMap<String, web::HtmlElement>,
    mist: FnvHashMap<String, web::HtmlElement>,
    dust_color: String,
    mist_color: String,
    ticker: Closure<dyn FnMut()>,
    tick_handle: Option<i32>,
}

impl AmbientRunner {
    pub fn new(
        beam: web::HtmlElement,
        base_opacity: BaseOpacity,
        pulse_multiplier: PulseMultiplier,
        dispatch: &Dispatch,
    ) -> Self {
        Self {
            beam,
            effects: AmbientEffects::new(base_opacity.clone(), pulse_multiplier),
            base_opacity,
            clock: Instant::now(),
            layer: None,
            dust: FnvHashMap::default(),
            mist: FnvHashMap::default(),
            dust_color: String::new(),
            mist_color: String::new(),
            ticker: callback(dispatch, Signal::AmbientFrame),
            tick_handle: None,
        }
    }

    fn now_sec(&self) -> f64 {
        self.clock.elapsed().as_secs_f64()
    }

    /// Bring effect elements in line with `config` and the current color scheme.
    pub fn sync(&mut self, config: &BeamConfig, dark: bool) {
        let change = self.effects.sync(config, self.now_sec());
        let beam_color = config.chosen_color(dark);

        let dust_color = config
            .dust
            .color
            .clone()
            .unwrap_or_else(|| beam_color.to_string());
        match change.dust {
            EffectChange::Restarted => {
                if let Err(e) = self.rebuild_dust(&dust_color) {
                    log::warn!("[dust] {e:#}");
                }
            }
            EffectChange::Stopped => clear(&mut self.dust),
            EffectChange::Unchanged if dust_color != self.dust_color => {
                for el in self.dust.values() {
                    dom::set_style(el, "background-color", &dust_color);
                }
            }
            EffectChange::Unchanged => {}
        }
        self.dust_color = dust_color;

        let mist_color = self
            .effects
            .mist()
            .intensity()
            .map(|intensity| with_alpha(beam_color, intensity))
            .unwrap_or_default();
        match change.mist {
            EffectChange::Restarted => {
                if let Err(e) = self.rebuild_mist(&mist_color) {
                    log::warn!("[mist] {e:#}");
                }
            }
            EffectChange::Stopped => clear(&mut self.mist),
            EffectChange::Unchanged if mist_color != self.mist_color => {
                let background = mist_background(&mist_color);
                for el in self.mist.values() {
                    dom::set_style(el, "background", &background);
                }
            }
            EffectChange::Unchanged => {}
        }
        self.mist_color = mist_color;

        if change.pulse == EffectChange::Stopped {
            self.restore_base_opacity();
        }
        if self.dust.is_empty() && self.mist.is_empty() {
            if let Some(layer) = self.layer.take() {
                layer.remove();
            }
        }
        if self.effects.is_running() {
            self.request_tick();
        } else {
            self.cancel_tick();
        }
    }

    fn ensure_layer(&mut self) -> anyhow::Result<web::HtmlElement> {
        if let Some(layer) = &self.layer {
            return Ok(layer.clone());
        }
        let layer = dom::create_layer(&self.beam, LAYER_TAG)?;
        self.layer = Some(layer.clone());
        Ok(layer)
    }

    fn rebuild_dust(&mut self, color: &str) -> anyhow::Result<()> {
        clear(&mut self.dust);
        let layer = self.ensure_layer()?;
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        for particle in self.effects.dust().particles() {
            let el = dom::create_div(&document, &particle.id, &particle_css(particle, color))?;
            layer
                .append_child(&el)
                .map_err(|e| anyhow::anyhow!("append particle: {:?}", e))?;
            self.dust.insert(particle.id.clone(), el);
        }
        Ok(())
    }

    fn rebuild_mist(&mut self, color: &str) -> anyhow::Result<()> {
        clear(&mut self.mist);
        let layer = self.ensure_layer()?;
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        for mist in self.effects.mist().layers() {
            let el = dom::create_div(&document, &mist.id, &mist_css(mist, color))?;
            // Mist sits behind the particles.
            layer
                .insert_before(&el, layer.first_child().as_ref())
                .map_err(|e| anyhow::anyhow!("insert mist: {:?}", e))?;
            self.mist.insert(mist.id.clone(), el);
        }
        Ok(())
    }

    fn restore_base_opacity(&self) {
        dom::set_style(&self.beam, "opacity", &self.base_opacity.get().to_string());
        let _ = self.beam.style().remove_property(PULSE_MULTIPLIER_PROPERTY);
    }

    fn request_tick(&mut self) {
        if self.tick_handle.is_some() {
            return;
        }
        let Some(window) = web::window() else {
            return;
        };
        match window.request_animation_frame(self.ticker.as_ref().unchecked_ref()) {
            Ok(handle) => self.tick_handle = Some(handle),
            Err(e) => log::warn!("[ambient] requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel_tick(&mut self) {
        if let (Some(handle), Some(window)) = (self.tick_handle.take(), web::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
    }

    pub fn on_tick(&mut self) {
        self.tick_handle = None;
        let frame = self.effects.tick(self.now_sec());
        for (particle, f) in self.effects.dust().particles().iter().zip(&frame.dust) {
            if let Some(el) = self.dust.get(&particle.id) {
                dom::set_style(el, "transform", &particle_transform(f));
                dom::set_style(el, "opacity", &f.opacity.to_string());
            }
        }
        for (layer, f) in self.effects.mist().layers().iter().zip(&frame.mist) {
            if let Some(el) = self.mist.get(&layer.id) {
                dom::set_style(el, "transform", &mist_transform(layer, f));
                dom::set_style(el, "opacity", &f.opacity.to_string());
            }
        }
        if let Some(pulse) = frame.pulse {
            dom::set_style(&self.beam, "opacity", &pulse.opacity.to_string());
            dom::set_style(
                &self.beam,
                PULSE_MULTIPLIER_PROPERTY,
                &pulse.multiplier.to_string(),
            );
        }
        if self.effects.is_running() {
            self.request_tick();
        }
    }

    /// Cancel every loop and remove the effect elements.
    pub fn stop(&mut self) {
        let change = self.effects.stop_all();
        self.cancel_tick();
        clear(&mut self.dust);
        clear(&mut self.mist);
        if let Some(layer) = self.layer.take() {
            layer.remove();
        }
        if change.pulse == EffectChange::Stopped {
            self.restore_base_opacity();
        }
    }
}

impl Drop for AmbientRunner {
    fn drop(&mut self) {
        self.cancel_tick();
    }
}

fn clear(elements: &mut FnvHashMap<String, web::HtmlElement>) {
    for (_, el) in elements.drain() {
        el.remove();
    }
}
