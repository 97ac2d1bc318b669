use glam::Vec2;
use node::{CanvasPoint, ScreenPoint};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;

/// Pan/zoom applied to the rendering group: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    /// Zoom scale, always within `[MIN_ZOOM, MAX_ZOOM]`.
    pub k: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    pub fn new(x: f32, y: f32, k: f32) -> Self {
        Self { x, y, k: clamp_zoom(k) }
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Same zoom, new pan offset.
    pub fn with_offset(&self, offset: Vec2) -> Self {
        Self::new(offset.x, offset.y, self.k)
    }

    pub fn world_to_screen(&self, point: CanvasPoint) -> ScreenPoint {
        ScreenPoint(point.0 * self.k + self.offset())
    }

    pub fn screen_to_world(&self, point: ScreenPoint) -> CanvasPoint {
        CanvasPoint((point.0 - self.offset()) / self.k)
    }

    /// World-space size that renders at `screen_size` pixels regardless of zoom.
    pub fn screen_constant(&self, screen_size: f32) -> f32 {
        screen_size / self.k
    }

    /// Transform that puts `point` at the middle of a container of `container` pixels.
    pub fn centered_on(point: CanvasPoint, container: Vec2, k: f32) -> Self {
        let k = clamp_zoom(k);
        let point = point.finite_or_zero();
        Self::new(container.x / 2.0 - point.x() * k, container.y / 2.0 - point.y() * k, k)
    }

    /// Zoom by `factor`, keeping the world point under `screen` fixed.
    pub fn zoom_at(&self, screen: ScreenPoint, factor: f32) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        let anchor = self.screen_to_world(screen);
        let k = clamp_zoom(self.k * factor);
        let offset = screen.0 - anchor.0 * k;
        Self::new(offset.x, offset.y, k)
    }
}

fn clamp_zoom(k: f32) -> f32 {
    if k.is_finite() && k > 0.0 {
        k.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}
