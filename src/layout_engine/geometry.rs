//! Pixel geometry shared by the layout systems.

use serde::{Deserialize, Serialize};

/// On-screen rectangle of one window, in CSS pixels from the viewport's
/// top-left corner.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct WindowPosition {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl WindowPosition {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self { top, left, width, height }
    }

    pub fn right(&self) -> f64 { self.left + self.width }

    pub fn bottom(&self) -> f64 { self.top + self.height }

    /// Same origin, size floored at zero.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(0.0),
            height: self.height.max(0.0),
            ..self
        }
    }

    pub fn contains_rect(&self, other: &Self) -> bool {
        const EPS: f64 = 1e-6;
        other.left + EPS >= self.left
            && other.top + EPS >= self.top
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

/// Size of the host viewport.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self { Self { width, height } }
}

impl Default for Viewport {
    /// Used when the host reports no size.
    fn default() -> Self { Self::new(1200.0, 800.0) }
}

pub trait IsWithin {
    fn is_within(&self, how_much: f64, other: Self) -> bool;
}

impl IsWithin for f64 {
    fn is_within(&self, how_much: f64, other: Self) -> bool { (self - other).abs() < how_much }
}

impl IsWithin for WindowPosition {
    fn is_within(&self, how_much: f64, other: Self) -> bool {
        self.top.is_within(how_much, other.top)
            && self.left.is_within(how_much, other.left)
            && self.width.is_within(how_much, other.width)
            && self.height.is_within(how_much, other.height)
    }
}

pub trait SameAs: IsWithin + Sized {
    fn same_as(&self, other: Self) -> bool { self.is_within(0.1, other) }
}

impl SameAs for WindowPosition {}
