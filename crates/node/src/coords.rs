//! Typed coordinate spaces for the mind-map canvas.
//!
//! Distinct types for the two spaces keep world and screen values from
//! being mixed at compile time.
//!
//! # Coordinate Spaces
//!
//! - **Canvas space**: where nodes live. Shared with the backend, no unit conversion.
//! - **Screen space**: pixels relative to the canvas container, after pan/zoom.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position in canvas space (where nodes live).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPoint(pub Vec2);

/// Position in screen space (pixels relative to the canvas container).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint(pub Vec2);

/// Movement/offset in canvas space (not a position).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasDelta(pub Vec2);

/// Movement/offset in screen space, e.g. the travel of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenDelta(pub Vec2);

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

// === CanvasPoint ===

impl CanvasPoint {
    pub const ORIGIN: CanvasPoint = CanvasPoint(Vec2::ZERO);

    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    /// Replace each non-finite component with zero.
    pub fn finite_or_zero(self) -> Self {
        Self::new(finite_or_zero(self.0.x), finite_or_zero(self.0.y))
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    pub fn distance(&self, other: CanvasPoint) -> f32 {
        self.0.distance(other.0)
    }
}

impl From<Vec2> for CanvasPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<CanvasPoint> for Vec2 {
    fn from(p: CanvasPoint) -> Self {
        p.0
    }
}

impl Add<CanvasDelta> for CanvasPoint {
    type Output = CanvasPoint;

    fn add(self, delta: CanvasDelta) -> Self::Output {
        CanvasPoint(self.0 + delta.0)
    }
}

impl Sub for CanvasPoint {
    type Output = CanvasDelta;

    /// Subtracting two points gives a delta.
    fn sub(self, other: CanvasPoint) -> Self::Output {
        CanvasDelta(self.0 - other.0)
    }
}

// === ScreenPoint ===

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for ScreenPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<ScreenPoint> for Vec2 {
    fn from(p: ScreenPoint) -> Self {
        p.0
    }
}

impl Sub for ScreenPoint {
    type Output = ScreenDelta;

    fn sub(self, other: ScreenPoint) -> Self::Output {
        ScreenDelta(self.0 - other.0)
    }
}

// === CanvasDelta ===

impl CanvasDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self(Vec2::new(dx, dy))
    }

    pub fn dx(&self) -> f32 {
        self.0.x
    }

    pub fn dy(&self) -> f32 {
        self.0.y
    }

    /// Angle of the delta in radians, screen convention (y grows downward).
    pub fn angle(&self) -> f32 {
        self.0.y.atan2(self.0.x)
    }
}

impl From<Vec2> for CanvasDelta {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

// === ScreenDelta ===

impl ScreenDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self(Vec2::new(dx, dy))
    }

    pub fn dx(&self) -> f32 {
        self.0.x
    }

    pub fn dy(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for ScreenDelta {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_point_add_delta() {
        let point = CanvasPoint::new(10.0, 20.0);
        let delta = CanvasDelta::new(5.0, -3.0);
        let result = point + delta;
        assert_eq!(result.x(), 15.0);
        assert_eq!(result.y(), 17.0);
    }

    #[test]
    fn canvas_point_sub_gives_delta() {
        let p1 = CanvasPoint::new(10.0, 20.0);
        let p2 = CanvasPoint::new(3.0, 5.0);
        let delta = p1 - p2;
        assert_eq!(delta.dx(), 7.0);
        assert_eq!(delta.dy(), 15.0);
    }

    #[test]
    fn non_finite_components_become_zero() {
        let p = CanvasPoint::new(f32::NAN, 12.0).finite_or_zero();
        assert_eq!(p, CanvasPoint::new(0.0, 12.0));

        let p = CanvasPoint::new(f32::INFINITY, f32::NEG_INFINITY).finite_or_zero();
        assert_eq!(p, CanvasPoint::ORIGIN);
    }

    #[test]
    fn screen_points_subtract_to_screen_delta() {
        let delta = ScreenPoint::new(30.0, 40.0) - ScreenPoint::new(10.0, 50.0);
        assert_eq!(delta, ScreenDelta::new(20.0, -10.0));
    }

    #[test]
    fn canvas_point_serializes_as_array() {
        let json = serde_json::to_value(CanvasPoint::new(1.5, -2.0)).unwrap();
        assert_eq!(json, serde_json::json!([1.5, -2.0]));
    }
}
