//! Binds the progress mapper to a scroll/resize signal source.
//!
//! The scheduler is a small state machine, `Unbound` or `Bound(key)`, driven
//! by the host through plain method calls. All side effects (listeners, frame
//! requests, the one-shot layout timer, style writes) go through the
//! [`BeamHost`] trait so the same logic runs against a browser or a test double.
//!
//! Only geometry-affecting fields (scroll source, anchors, width ratio) form the
//! [`BindingKey`]; color and flag changes land in a shared [`Appearance`] cell
//! that the write path reads, so toggling them never tears the listener down.

use crate::ambient::pulse::pulsed_opacity;
use crate::config::{BeamConfig, ScrollSource};
use crate::constants::{LAYOUT_SETTLE_DELAY_MS, PROGRESS_EPSILON};
use crate::progress::normalize;
use crate::range::{ScrollRange, ScrollSample};
use crate::style::{beam_style, BeamStyle};
use crate::visual::{map_to_visual, VisualState};
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Fields that identify a listener attachment.
#[derive(Clone, Debug, PartialEq)]
pub struct BindingKey {
    pub source: ScrollSource,
    pub range: ScrollRange,
    pub full_width: f64,
}

/// Non-geometric settings read at write time.
#[derive(Clone, Debug, PartialEq)]
pub struct Appearance {
    pub color_light: String,
    pub color_dark: String,
    pub dark: bool,
    pub invert: bool,
    pub mask_by_progress: bool,
}

impl Appearance {
    pub fn color(&self) -> &str {
        if self.dark {
            &self.color_dark
        } else {
            &self.color_light
        }
    }
}

impl Default for Appearance {
    fn default() -> Self {
        BeamConfig::default().appearance(false)
    }
}

/// Single-writer cell holding the latest [`Appearance`].
#[derive(Clone, Debug, Default)]
pub struct AppearanceCell(Rc<RefCell<Appearance>>);

impl AppearanceCell {
    pub fn get(&self) -> Ref<'_, Appearance> {
        self.0.borrow()
    }

    fn set(&self, appearance: Appearance) {
        *self.0.borrow_mut() = appearance;
    }

    fn set_dark(&self, dark: bool) {
        self.0.borrow_mut().dark = dark;
    }
}

/// Base opacity last written by the scheduler, shared with the pulse modulator.
#[derive(Clone, Debug)]
pub struct BaseOpacity(Rc<Cell<f64>>);

impl Default for BaseOpacity {
    fn default() -> Self {
        Self(Rc::new(Cell::new(1.0)))
    }
}

impl BaseOpacity {
    pub fn get(&self) -> f64 {
        self.0.get()
    }

    fn set(&self, value: f64) {
        self.0.set(value);
    }
}

/// Pulse multiplier last sampled by the ambient loop; 1 while pulse is off.
///
/// Every opacity write, scroll-driven or pulse-driven, goes through
/// `base × multiplier`, so whichever lands last in a frame is correct.
#[derive(Clone, Debug)]
pub struct PulseMultiplier(Rc<Cell<f64>>);

impl Default for PulseMultiplier {
    fn default() -> Self {
        Self(Rc::new(Cell::new(1.0)))
    }
}

impl PulseMultiplier {
    pub fn get(&self) -> f64 {
        self.0.get()
    }

    pub(crate) fn set(&self, value: f64) {
        self.0.set(value);
    }
}

/// Side effects the scheduler needs from its environment.
pub trait BeamHost {
    /// Handle that keeps a scroll/resize subscription alive.
    type Listener;

    /// False before a viewport/document exists (e.g. pre-hydration).
    fn environment_ready(&self) -> bool;
    /// Subscribe to scroll and resize signals for `key`; `None` if the target is absent.
    fn attach(&mut self, key: &BindingKey) -> Option<Self::Listener>;
    fn detach(&mut self, listener: Self::Listener);
    /// Re-read cached viewport/trigger geometry.
    fn refresh_geometry(&mut self, key: &BindingKey);
    fn measure(&mut self, key: &BindingKey) -> Option<ScrollSample>;
    /// Ask for one frame-aligned callback; false if none will arrive.
    fn request_frame(&mut self) -> bool;
    fn cancel_frame(&mut self);
    /// Arm the one-shot layout settle timer; false if it could not be armed.
    fn schedule_settle(&mut self, delay: Duration) -> bool;
    fn cancel_settle(&mut self);
    /// Write `style` to the beam element; false when the element is absent.
    fn apply(&mut self, style: &BeamStyle) -> bool;
}

#[derive(Debug)]
pub enum Binding<L> {
    Unbound,
    Bound { key: BindingKey, listener: L },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindOutcome {
    Bound,
    /// Environment or target element missing; nothing attached.
    Skipped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigChange {
    /// Binding key unchanged; new appearance applied through the cell.
    Absorbed,
    Rebound,
    Skipped,
}

pub struct UpdateScheduler<L> {
    binding: Binding<L>,
    appearance: AppearanceCell,
    base_opacity: BaseOpacity,
    pulse: PulseMultiplier,
    last_applied: Option<f64>,
    current: Option<VisualState>,
    frame_pending: bool,
    force_next: bool,
    /// A scroll arrived since the last frame.
    scrolled: bool,
    /// A sub-epsilon move was skipped and has not been written yet.
    tail_pending: bool,
    settle_pending: bool,
}

impl<L> Default for UpdateScheduler<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> UpdateScheduler<L> {
    pub fn new() -> Self {
        Self {
            binding: Binding::Unbound,
            appearance: AppearanceCell::default(),
            base_opacity: BaseOpacity::default(),
            pulse: PulseMultiplier::default(),
            last_applied: None,
            current: None,
            frame_pending: false,
            force_next: false,
            scrolled: false,
            tail_pending: false,
            settle_pending: false,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::Bound { .. })
    }

    pub fn listener(&self) -> Option<&L> {
        match &self.binding {
            Binding::Bound { listener, .. } => Some(listener),
            Binding::Unbound => None,
        }
    }

    pub fn binding_key(&self) -> Option<&BindingKey> {
        match &self.binding {
            Binding::Bound { key, .. } => Some(key),
            Binding::Unbound => None,
        }
    }

    pub fn appearance(&self) -> &AppearanceCell {
        &self.appearance
    }

    pub fn base_opacity(&self) -> BaseOpacity {
        self.base_opacity.clone()
    }

    pub fn pulse_multiplier(&self) -> PulseMultiplier {
        self.pulse.clone()
    }

    /// Last visual state actually written to the element.
    pub fn current(&self) -> Option<&VisualState> {
        self.current.as_ref()
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn settle_pending(&self) -> bool {
        self.settle_pending
    }

    /// Attach to the scroll source and write the initial state synchronously.
    pub fn bind<H>(&mut self, host: &mut H, config: &BeamConfig, dark: bool) -> BindOutcome
    where
        H: BeamHost<Listener = L>,
    {
        self.appearance.set(config.appearance(dark));
        if self.is_bound() {
            self.unbind(host);
        }
        if !host.environment_ready() {
            log::debug!("[bind] environment not ready; skipping");
            return BindOutcome::Skipped;
        }
        let key = config.binding_key();
        let Some(listener) = host.attach(&key) else {
            log::debug!("[bind] scroll source unavailable; skipping");
            return BindOutcome::Skipped;
        };
        log::debug!(
            "[bind] source={:?} range=({}) -> ({}) fullWidth={}",
            key.source,
            key.range.start,
            key.range.end,
            key.full_width
        );
        host.refresh_geometry(&key);
        self.binding = Binding::Bound { key, listener };
        self.last_applied = None;
        self.recompute(host, true);
        self.settle_pending = host.schedule_settle(Duration::from_millis(LAYOUT_SETTLE_DELAY_MS));
        BindOutcome::Bound
    }

    /// Replace the configuration, rebinding only when the binding key changed.
    pub fn reconfigure<H>(&mut self, host: &mut H, config: &BeamConfig, dark: bool) -> ConfigChange
    where
        H: BeamHost<Listener = L>,
    {
        let same_key = self.binding_key() == Some(&config.binding_key());
        if !same_key {
            return match self.bind(host, config, dark) {
                BindOutcome::Bound => ConfigChange::Rebound,
                BindOutcome::Skipped => ConfigChange::Skipped,
            };
        }
        self.appearance.set(config.appearance(dark));
        self.invalidate(host);
        ConfigChange::Absorbed
    }

    /// Switch between the light and dark colors without touching the binding.
    pub fn set_dark_mode<H>(&mut self, host: &mut H, dark: bool)
    where
        H: BeamHost<Listener = L>,
    {
        if self.appearance.get().dark == dark {
            return;
        }
        self.appearance.set_dark(dark);
        self.invalidate(host);
    }

    pub fn on_scroll<H>(&mut self, host: &mut H)
    where
        H: BeamHost<Listener = L>,
    {
        if self.is_bound() {
            self.scrolled = true;
            self.request_frame(host);
        }
    }

    /// Resize always produces exactly one forced recompute on the next frame.
    pub fn on_resize<H>(&mut self, host: &mut H)
    where
        H: BeamHost<Listener = L>,
    {
        if let Some(key) = self.binding_key().cloned() {
            host.refresh_geometry(&key);
            self.invalidate(host);
        }
    }

    /// One-shot correction for layout that settled after bind.
    pub fn on_settle<H>(&mut self, host: &mut H)
    where
        H: BeamHost<Listener = L>,
    {
        self.settle_pending = false;
        self.on_resize(host);
    }

    /// Frame callback; returns the state written, if any.
    pub fn on_frame<H>(&mut self, host: &mut H) -> Option<VisualState>
    where
        H: BeamHost<Listener = L>,
    {
        self.frame_pending = false;
        let scrolled = std::mem::take(&mut self.scrolled);
        // A skipped tail is written on the first frame without new scroll input.
        let force = std::mem::take(&mut self.force_next) || (self.tail_pending && !scrolled);
        self.recompute(host, force)
    }

    /// Detach listeners and cancel pending callbacks. Safe to call repeatedly.
    pub fn unbind<H>(&mut self, host: &mut H)
    where
        H: BeamHost<Listener = L>,
    {
        if self.frame_pending {
            host.cancel_frame();
            self.frame_pending = false;
        }
        if self.settle_pending {
            host.cancel_settle();
            self.settle_pending = false;
        }
        self.force_next = false;
        self.scrolled = false;
        self.tail_pending = false;
        if let Binding::Bound { listener, .. } =
            std::mem::replace(&mut self.binding, Binding::Unbound)
        {
            host.detach(listener);
            log::debug!("[bind] detached");
        }
    }

    fn invalidate<H>(&mut self, host: &mut H)
    where
        H: BeamHost<Listener = L>,
    {
        if self.is_bound() {
            self.force_next = true;
            self.request_frame(host);
        }
    }

    fn request_frame<H>(&mut self, host: &mut H)
    where
        H: BeamHost<Listener = L>,
    {
        if !self.frame_pending {
            self.frame_pending = host.request_frame();
        }
    }

    fn recompute<H>(&mut self, host: &mut H, force: bool) -> Option<VisualState>
    where
        H: BeamHost<Listener = L>,
    {
        let Binding::Bound { key, .. } = &self.binding else {
            return None;
        };
        let sample = host.measure(key)?;
        let raw = sample.oriented_fraction(&key.range)?;
        let appearance = self.appearance.get().clone();
        let progress = normalize(raw, key.full_width, appearance.invert);
        if !force && !should_write(self.last_applied, progress) {
            if self.last_applied != Some(progress) {
                self.tail_pending = true;
                self.request_frame(host);
            }
            return None;
        }
        let visual = map_to_visual(progress, appearance.mask_by_progress);
        let mut style = beam_style(&visual, appearance.color());
        style.opacity = pulsed_opacity(visual.base_opacity, self.pulse.get());
        if !host.apply(&style) {
            return None;
        }
        self.tail_pending = false;
        self.last_applied = Some(progress);
        self.base_opacity.set(visual.base_opacity);
        self.current = Some(visual);
        Some(visual)
    }
}

/// Skip writes that would not visibly move the beam, but always land exactly
/// on either end of the range.
fn should_write(last: Option<f64>, progress: f64) -> bool {
    match last {
        None => true,
        Some(last) if last == progress => false,
        Some(_) if progress == 0.0 || progress == 1.0 => true,
        Some(last) => (progress - last).abs() >= PROGRESS_EPSILON,
    }
}

#[cfg(test)]
mod tests {
    use super::should_write;

    #[test]
    fn small_moves_are_suppressed_but_bounds_are_reached() {
        assert!(should_write(None, 0.5));
        assert!(!should_write(Some(0.5), 0.5004));
        assert!(should_write(Some(0.5), 0.502));
        assert!(should_write(Some(0.0004), 0.0));
        assert!(!should_write(Some(1.0), 1.0));
    }
}
