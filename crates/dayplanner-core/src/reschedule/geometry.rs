//! Pointer position to hour-slot mapping.
//!
//! The presentation layer owns the real layout; the core only sees it through
//! [`LayoutProbe`] (hit-testing) or, more directly, through any
//! [`HourLocator`]. "No target" is an ordinary `None`, never an error.

/// Last hour slot of the day view.
pub const LAST_HOUR: u8 = 23;

/// A rendered element under the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutElement {
    /// Hour the element is tagged with, if it is an hour slot (or inside one).
    pub hour: Option<u8>,
}

impl LayoutElement {
    pub fn hour_slot(hour: u8) -> Self {
        Self { hour: Some(hour) }
    }

    pub fn untagged() -> Self {
        Self { hour: None }
    }
}

/// Hit-testing capability of the rendered schedule.
pub trait LayoutProbe {
    /// Elements at `(x, y)`, front-most first.
    fn elements_at(&self, x: f64, y: f64) -> Vec<LayoutElement>;
}

/// Resolves a vertical pointer coordinate to an hour slot (0-23).
pub trait HourLocator {
    fn hour_at(&self, y: f64) -> Option<u8>;
}

impl<F> HourLocator for F
where
    F: Fn(f64) -> Option<u8>,
{
    fn hour_at(&self, y: f64) -> Option<u8> {
        self(y)
    }
}

/// Probes the layout at a fixed horizontal reference and picks the first
/// hour-tagged element front-to-back.
#[derive(Debug, Clone)]
pub struct ScheduleGeometryMapper<P> {
    probe: P,
    reference_x: f64,
}

impl<P: LayoutProbe> ScheduleGeometryMapper<P> {
    pub fn new(probe: P, reference_x: f64) -> Self {
        Self { probe, reference_x }
    }

    pub fn reference_x(&self) -> f64 {
        self.reference_x
    }
}

impl<P: LayoutProbe> HourLocator for ScheduleGeometryMapper<P> {
    fn hour_at(&self, y: f64) -> Option<u8> {
        if !y.is_finite() {
            return None;
        }
        self.probe
            .elements_at(self.reference_x, y)
            .into_iter()
            .find_map(|el| el.hour)
            .filter(|h| *h <= LAST_HOUR)
    }
}

/// Uniform day grid: 24 stacked rows of equal height starting at `top`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourRows {
    pub top: f64,
    pub row_height: f64,
}

impl HourRows {
    pub fn new(top: f64, row_height: f64) -> Self {
        Self { top, row_height }
    }
}

impl LayoutProbe for HourRows {
    fn elements_at(&self, _x: f64, y: f64) -> Vec<LayoutElement> {
        if self.row_height <= 0.0 || y < self.top {
            return Vec::new();
        }
        let row = ((y - self.top) / self.row_height).floor();
        if row > f64::from(LAST_HOUR) {
            return Vec::new();
        }
        vec![LayoutElement::hour_slot(row as u8)]
    }
}
