//! Trigger region geometry.
//!
//! A trigger region is described by two anchors, each pairing an edge of the
//! beam element with an edge of the scrolling viewport (`"top bottom"` means
//! "the element's top meets the viewport's bottom"). Progress through the
//! region is the fraction of scroll travelled from the start anchor to the
//! end anchor.

use crate::config::ConfigError;
use std::fmt;
use std::str::FromStr;

/// One `"<element-edge> <viewport-edge>"` pair, stored as fractions of the
/// element height and the viewport height respectively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub element: f64,
    pub viewport: f64,
}

impl Anchor {
    pub const TOP_BOTTOM: Anchor = Anchor {
        element: 0.0,
        viewport: 1.0,
    };
    pub const TOP_TOP: Anchor = Anchor {
        element: 0.0,
        viewport: 0.0,
    };

    /// Element top offset (relative to the viewport) at which this anchor is met.
    #[inline]
    fn element_top_at(&self, element_height: f64, viewport_height: f64) -> f64 {
        self.viewport * viewport_height - self.element * element_height
    }
}

fn parse_edge(token: &str) -> Option<f64> {
    match token {
        "top" => Some(0.0),
        "center" => Some(0.5),
        "bottom" => Some(1.0),
        _ => {
            let pct = token.strip_suffix('%')?.trim().parse::<f64>().ok()?;
            pct.is_finite().then_some(pct / 100.0)
        }
    }
}

impl FromStr for Anchor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(el), Some(vp), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ConfigError::InvalidAnchor(s.to_string()));
        };
        match (parse_edge(el), parse_edge(vp)) {
            (Some(element), Some(viewport)) => Ok(Anchor { element, viewport }),
            _ => Err(ConfigError::InvalidAnchor(s.to_string())),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% {}%", self.element * 100.0, self.viewport * 100.0)
    }
}

/// Measured layout of the beam element relative to its scroll viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerGeometry {
    pub top: f64,
    pub height: f64,
    pub viewport_height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRange {
    pub start: Anchor,
    pub end: Anchor,
}

impl Default for ScrollRange {
    fn default() -> Self {
        Self {
            start: Anchor::TOP_BOTTOM,
            end: Anchor::TOP_TOP,
        }
    }
}

impl ScrollRange {
    pub fn parse(start: &str, end: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }

    /// Fraction of the region scrolled through; unclamped, larger means further.
    pub fn fraction(&self, geometry: &TriggerGeometry) -> f64 {
        let start = self
            .start
            .element_top_at(geometry.height, geometry.viewport_height);
        let end = self
            .end
            .element_top_at(geometry.height, geometry.viewport_height);
        let span = start - end;
        if span.abs() < f64::EPSILON {
            // Zero-length region: a step at the anchor.
            return if geometry.top <= end { 1.0 } else { 0.0 };
        }
        (start - geometry.top) / span
    }
}

/// Raw input from a scroll driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollSample {
    /// Trigger fraction, 0 when the element is about to enter and 1 once fully progressed.
    Fraction(f64),
    /// Element top offset in px relative to a viewport of the given height.
    Viewport { top: f64, viewport_height: f64 },
    /// Element rect against the configured trigger anchors.
    Element(TriggerGeometry),
}

impl ScrollSample {
    /// Build a sample from a driver that reports 1 at the start and 0 at the end.
    pub fn from_reversed_fraction(fraction: f64) -> Self {
        ScrollSample::Fraction(1.0 - fraction)
    }

    /// Fraction in the canonical orientation, or `None` when there is no usable viewport.
    pub fn oriented_fraction(&self, range: &ScrollRange) -> Option<f64> {
        let fraction = match *self {
            ScrollSample::Fraction(f) => f,
            ScrollSample::Viewport {
                top,
                viewport_height,
            } => {
                if viewport_height <= 0.0 {
                    return None;
                }
                1.0 - top / viewport_height
            }
            ScrollSample::Element(geometry) => {
                if geometry.viewport_height <= 0.0 {
                    return None;
                }
                range.fraction(&geometry)
            }
        };
        fraction.is_finite().then_some(fraction)
    }
}
