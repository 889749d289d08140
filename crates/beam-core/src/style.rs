//! CSS value construction for the beam and its ambient layers.
//!
//! Hosts apply these strings verbatim; nothing here touches a DOM.

use crate::ambient::dust::{Particle, ParticleFrame};
use crate::ambient::mist::{MistFrame, MistLayer};
use crate::constants::{FIXED_MASK_OPAQUE_PCT, FIXED_MASK_TRANSPARENT_PCT};
use crate::visual::VisualState;
use smallvec::{smallvec, SmallVec};

pub const BASE_OPACITY_PROPERTY: &str = "--base-opacity";
pub const PULSE_MULTIPLIER_PROPERTY: &str = "--pulse-multiplier";

/// Inline declarations applied to the beam element unless the page opts out.
pub const DEFAULT_ELEMENT_STYLES: &[(&str, &str)] = &[
    ("height", "var(--react-light-beam-height, 500px)"),
    ("width", "var(--react-light-beam-width, 100vw)"),
    ("transition", "var(--react-light-beam-transition, all 0.25s ease)"),
    ("will-change", "background, opacity"),
    ("user-select", "none"),
    ("pointer-events", "none"),
    ("contain", "layout style paint"),
    ("-webkit-transition", "var(--react-light-beam-transition, all 0.25s ease)"),
    ("-webkit-user-select", "none"),
    ("-moz-user-select", "none"),
];

/// Declarations kept even when default styles are disabled.
pub const MINIMAL_ELEMENT_STYLES: &[(&str, &str)] = &[
    ("will-change", "background, opacity"),
    ("contain", "layout style paint"),
];

/// Property bag written to the beam element on every scheduler update.
#[derive(Clone, Debug, PartialEq)]
pub struct BeamStyle {
    pub background: String,
    /// Displayed opacity; the scheduler scales it by the live pulse multiplier.
    pub opacity: f64,
    pub mask_image: String,
    pub custom_properties: SmallVec<[(&'static str, String); 2]>,
}

pub fn beam_style(state: &VisualState, color: &str) -> BeamStyle {
    BeamStyle {
        background: background_gradient(state, color),
        opacity: state.base_opacity,
        mask_image: mask_gradient(state, color),
        custom_properties: smallvec![(BASE_OPACITY_PROPERTY, state.base_opacity.to_string())],
    }
}

/// Two conic gradients anchored at the top edge, one per half of the element.
pub fn background_gradient(state: &VisualState, color: &str) -> String {
    format!(
        "conic-gradient(from 90deg at {left}% 0%, {color}, transparent 180deg) 0% 0% / 50% {size}% no-repeat, \
         conic-gradient(from 270deg at {right}% 0%, transparent 180deg, {color}) 100% 0% / 50% 100% no-repeat",
        left = state.left_anchor_pct,
        right = state.right_anchor_pct,
        size = state.left_size_pct,
    )
}

pub fn mask_gradient(state: &VisualState, color: &str) -> String {
    match state.mask_stop_pct {
        Some(stop) => format!("linear-gradient(to bottom, {color} 0%, transparent {stop}%)"),
        None => format!(
            "linear-gradient(to bottom, {color} {FIXED_MASK_OPAQUE_PCT}%, transparent {FIXED_MASK_TRANSPARENT_PCT}%)"
        ),
    }
}

/// Replace the alpha channel of an `rgb[a]()`/`hsl[a]()` color.
///
/// Colors in other notations (hex, named, space-separated) are returned unchanged.
pub fn with_alpha(color: &str, alpha: f64) -> String {
    let trimmed = color.trim();
    let (Some(open), true) = (trimmed.find('('), trimmed.ends_with(')')) else {
        return color.to_string();
    };
    let name = trimmed[..open].trim().to_ascii_lowercase();
    let parts: SmallVec<[&str; 4]> = trimmed[open + 1..trimmed.len() - 1]
        .split(',')
        .map(str::trim)
        .collect();
    match (name.as_str(), parts.as_slice()) {
        ("rgba" | "hsla", [a, b, c, _]) | ("rgb" | "hsl", [a, b, c]) => {
            let base = name.trim_end_matches('a');
            format!("{base}a({a}, {b}, {c}, {alpha})")
        }
        _ => color.to_string(),
    }
}

pub fn particle_css(particle: &Particle, color: &str) -> String {
    format!(
        "position:absolute;left:{x}%;top:{y}%;width:{s}px;height:{s}px;border-radius:50%;\
         background-color:{color};opacity:{o};pointer-events:none;will-change:transform, opacity",
        x = particle.x_pct,
        y = particle.y_pct,
        s = particle.size_px,
        o = particle.opacity,
    )
}

pub fn particle_transform(frame: &ParticleFrame) -> String {
    format!("translate({}px, {}px)", frame.dx_px, frame.dy_px)
}

pub fn mist_background(mist_color: &str) -> String {
    format!("radial-gradient(ellipse 120% 80% at 50% 20%, {mist_color}, transparent 70%)")
}

pub fn mist_css(layer: &MistLayer, mist_color: &str) -> String {
    format!(
        "position:absolute;top:0;left:0;width:100%;height:100%;background:{bg};opacity:0;\
         pointer-events:none;will-change:transform, opacity;transform:scale({s});filter:blur(40px)",
        bg = mist_background(mist_color),
        s = layer.scale,
    )
}

pub fn mist_transform(layer: &MistLayer, frame: &MistFrame) -> String {
    format!("translateX({}%) scale({})", frame.x_pct, layer.scale)
}
