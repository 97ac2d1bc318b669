use crate::CanvasPoint;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;
use strum::{AsRefStr, Display, EnumIter};

/// Coarse bearing of a node relative to its parent.
///
/// Screen convention: y grows downward, so "top" means a negative y delta.
/// Used to fan a node's own children outward, away from its parent.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Direction {
    TopRight,
    BottomRight,
    BottomLeft,
    TopLeft,
}

impl Direction {
    /// Classify `child` by quadrant around `parent`.
    ///
    /// Points on an axis fall to the right/bottom side.
    pub fn classify(parent: CanvasPoint, child: CanvasPoint) -> Self {
        let delta = child.finite_or_zero() - parent.finite_or_zero();
        match (delta.dx() >= 0.0, delta.dy() >= 0.0) {
            (true, false) => Direction::TopRight,
            (true, true) => Direction::BottomRight,
            (false, true) => Direction::BottomLeft,
            (false, false) => Direction::TopLeft,
        }
    }

    /// Canonical angle (radians) at the middle of the quadrant.
    pub fn bearing(self) -> f32 {
        match self {
            Direction::TopRight => -FRAC_PI_4,
            Direction::BottomRight => FRAC_PI_4,
            Direction::BottomLeft => 3.0 * FRAC_PI_4,
            Direction::TopLeft => -3.0 * FRAC_PI_4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn classifies_each_quadrant() {
        let parent = CanvasPoint::new(100.0, 100.0);
        assert_eq!(Direction::classify(parent, CanvasPoint::new(150.0, 50.0)), Direction::TopRight);
        assert_eq!(Direction::classify(parent, CanvasPoint::new(150.0, 150.0)), Direction::BottomRight);
        assert_eq!(Direction::classify(parent, CanvasPoint::new(50.0, 150.0)), Direction::BottomLeft);
        assert_eq!(Direction::classify(parent, CanvasPoint::new(50.0, 50.0)), Direction::TopLeft);
    }

    #[test]
    fn bearing_lands_back_in_its_own_quadrant() {
        let origin = CanvasPoint::ORIGIN;
        for direction in Direction::iter() {
            let angle = direction.bearing();
            let sample = CanvasPoint::new(angle.cos() * 10.0, angle.sin() * 10.0);
            assert_eq!(Direction::classify(origin, sample), direction);
        }
    }

    #[test]
    fn displays_as_kebab_case() {
        assert_eq!(Direction::TopRight.to_string(), "top-right");
        assert_eq!(Direction::BottomLeft.as_ref(), "bottom-left");
    }
}
