use crate::{LayoutConfig, ParentContext};
use node::{CanvasPoint, Direction};
use std::f32::consts::{PI, TAU};

/// Where a new child goes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: CanvasPoint,
    /// Polar angle (radians) around the parent.
    pub angle: f32,
    /// Distance from the parent after gap enforcement.
    pub radius: f32,
    /// Depth of the new child (root children are depth 1).
    pub depth: usize,
    /// Quadrant of the child around its parent, recorded for its own children.
    pub direction: Direction,
}

/// The resolved circle of slots around one parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
    pub origin: CanvasPoint,
    pub depth: usize,
    pub radius: f32,
    pub center_angle: f32,
    pub arc: f32,
    pub slots: usize,
}

impl Ring {
    /// Resolve the ring for a parent that already has `existing_children`.
    ///
    /// A missing parent is treated like a root at the origin.
    pub fn resolve(config: &LayoutConfig, parent: Option<&ParentContext>, existing_children: usize) -> Self {
        let config = config.sanitized();
        let (origin, depth, bearing) = match parent {
            Some(p) => (
                p.position.finite_or_zero(),
                p.depth + 1,
                p.bearing.filter(|b| b.is_finite()),
            ),
            None => (CanvasPoint::ORIGIN, 1, None),
        };

        let slots = existing_children + 1;
        let mut radius = config.level_distance * depth as f32;
        let (center_angle, mut arc) = match bearing {
            Some(bearing) => (bearing, config.branch_arc),
            None => (0.0, TAU),
        };

        if slots >= 2 && config.min_sibling_gap > 0.0 {
            let gap = config.min_sibling_gap;

            // A full circle is already as wide as it gets; branches may widen first.
            if bearing.is_some() {
                let needed = required_step(radius, gap) * slots as f32;
                if needed > arc {
                    arc = arc.max(needed.min(config.max_branch_arc));
                }
            }

            let half_step = arc / slots as f32 / 2.0;
            let sin = half_step.sin();
            if sin > f32::EPSILON && 2.0 * radius * sin < gap {
                radius = gap / (2.0 * sin);
            }
        }

        Self {
            origin,
            depth,
            radius,
            center_angle,
            arc,
            slots,
        }
    }

    pub fn step(&self) -> f32 {
        self.arc / self.slots as f32
    }

    /// Angle of slot `index`, measured from `center - arc/2`.
    pub fn slot_angle(&self, index: usize) -> f32 {
        let start = self.center_angle - self.arc / 2.0;
        start + self.step() * (index as f32 + 0.5)
    }

    pub fn slot_position(&self, index: usize) -> CanvasPoint {
        let angle = self.slot_angle(index);
        CanvasPoint::new(
            self.origin.x() + self.radius * angle.cos(),
            self.origin.y() + self.radius * angle.sin(),
        )
        .finite_or_zero()
    }
}

/// Angular step whose chord at `radius` equals `gap`.
fn required_step(radius: f32, gap: f32) -> f32 {
    if radius <= 0.0 || gap >= 2.0 * radius {
        PI
    } else {
        2.0 * (gap / (2.0 * radius)).asin()
    }
}

/// Compute the position of one new child of `parent`.
///
/// Total: never panics, and non-finite inputs are treated as zero.
pub fn place_child(
    config: &LayoutConfig,
    parent: Option<&ParentContext>,
    existing_children: usize,
) -> Placement {
    let ring = Ring::resolve(config, parent, existing_children);
    let position = ring.slot_position(existing_children);
    Placement {
        position,
        angle: ring.slot_angle(existing_children),
        radius: ring.radius,
        depth: ring.depth,
        direction: Direction::classify(ring.origin, position),
    }
}

/// Every slot angle of the ring the next child would be placed on.
pub fn slot_angles(config: &LayoutConfig, parent: Option<&ParentContext>, existing_children: usize) -> Vec<f32> {
    let ring = Ring::resolve(config, parent, existing_children);
    (0..ring.slots).map(|i| ring.slot_angle(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn chord(radius: f32, a: f32, b: f32) -> f32 {
        2.0 * radius * ((a - b).abs() / 2.0).sin().abs()
    }

    #[test]
    fn first_root_child_sits_at_level_distance_angle_zero() {
        let config = LayoutConfig::default();
        let root = ParentContext::root(CanvasPoint::new(400.0, 300.0));
        let placement = place_child(&config, Some(&root), 0);

        assert!(placement.angle.abs() < EPS);
        assert!((placement.position.x() - (400.0 + config.level_distance)).abs() < EPS);
        assert!((placement.position.y() - 300.0).abs() < EPS);
        assert_eq!(placement.radius, config.level_distance);
        assert_eq!(placement.depth, 1);
    }

    #[test]
    fn lone_branch_child_sits_on_the_bearing() {
        let config = LayoutConfig::default();
        let parent = ParentContext {
            position: CanvasPoint::new(100.0, 100.0),
            depth: 1,
            bearing: Some(PI / 2.0),
        };
        let placement = place_child(&config, Some(&parent), 0);
        assert!((placement.angle - PI / 2.0).abs() < EPS);
        assert!((placement.radius - config.level_distance * 2.0).abs() < EPS);
        assert!(placement.position.y() > 100.0);
    }

    #[test]
    fn root_children_fill_the_full_circle() {
        let config = LayoutConfig::default();
        let root = ParentContext::root(CanvasPoint::ORIGIN);
        let ring = Ring::resolve(&config, Some(&root), 3);
        assert_eq!(ring.arc, TAU);
        assert_eq!(ring.slots, 4);
        assert!((ring.step() - TAU / 4.0).abs() < EPS);
    }

    #[test]
    fn branch_children_stay_inside_the_branch_arc() {
        let config = LayoutConfig::default();
        let bearing = 0.3;
        let parent = ParentContext {
            position: CanvasPoint::ORIGIN,
            depth: 1,
            bearing: Some(bearing),
        };
        let ring = Ring::resolve(&config, Some(&parent), 1);
        assert!(ring.arc < TAU);
        for angle in slot_angles(&config, Some(&parent), 1) {
            assert!((angle - bearing).abs() <= ring.arc / 2.0 + EPS);
        }
    }

    #[test]
    fn slots_are_distinct_and_respect_the_gap() {
        let config = LayoutConfig::default();
        let cases = [
            ParentContext::root(CanvasPoint::new(10.0, 10.0)),
            ParentContext {
                position: CanvasPoint::new(-50.0, 80.0),
                depth: 1,
                bearing: Some(-2.0),
            },
            ParentContext {
                position: CanvasPoint::ORIGIN,
                depth: 3,
                bearing: Some(1.0),
            },
        ];

        for parent in &cases {
            for existing in 0..24 {
                let ring = Ring::resolve(&config, Some(parent), existing);
                let angles = slot_angles(&config, Some(parent), existing);
                assert_eq!(angles.len(), existing + 1);
                for i in 0..angles.len() {
                    for j in (i + 1)..angles.len() {
                        let c = chord(ring.radius, angles[i], angles[j]);
                        assert!(c + 0.01 >= config.min_sibling_gap, "slots {i}/{j} of {existing}: chord {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn crowded_branch_widens_arc_before_growing_radius() {
        let config = LayoutConfig::default();
        let parent = ParentContext {
            position: CanvasPoint::ORIGIN,
            depth: 0,
            bearing: Some(0.0),
        };
        // depth 1 ring, radius 160: four slots need ~2.28 rad, more than 2π/3.
        let ring = Ring::resolve(&config, Some(&parent), 3);
        assert!(ring.arc > config.branch_arc);
        assert!(ring.arc <= config.max_branch_arc + EPS);
        assert!((ring.radius - config.level_distance).abs() < 0.01);

        // Many slots exhaust the arc cap, so the radius grows instead.
        let ring = Ring::resolve(&config, Some(&parent), 10);
        assert!((ring.arc - config.max_branch_arc).abs() < EPS);
        assert!(ring.radius > config.level_distance);
    }

    #[test]
    fn crowded_root_grows_radius() {
        let config = LayoutConfig::default();
        let root = ParentContext::root(CanvasPoint::ORIGIN);
        let ring = Ring::resolve(&config, Some(&root), 20);
        assert_eq!(ring.arc, TAU);
        assert!(ring.radius > config.level_distance);
    }

    #[test]
    fn missing_parent_is_laid_out_like_a_root_at_origin() {
        let config = LayoutConfig::default();
        let placement = place_child(&config, None, 0);
        assert!((placement.position.x() - config.level_distance).abs() < EPS);
        assert!(placement.position.y().abs() < EPS);
    }

    #[test]
    fn non_finite_parent_is_treated_as_origin() {
        let config = LayoutConfig::default();
        let parent = ParentContext {
            position: CanvasPoint::new(f32::NAN, f32::INFINITY),
            depth: 0,
            bearing: Some(f32::NAN),
        };
        let placement = place_child(&config, Some(&parent), 2);
        assert!(placement.position.is_finite());
        let ring = Ring::resolve(&config, Some(&parent), 2);
        assert_eq!(ring.origin, CanvasPoint::ORIGIN);
        assert_eq!(ring.arc, TAU);
    }

    #[test]
    fn direction_matches_the_resulting_quadrant() {
        let config = LayoutConfig::default();
        let parent = ParentContext {
            position: CanvasPoint::new(0.0, 0.0),
            depth: 1,
            bearing: Some(Direction::BottomLeft.bearing()),
        };
        let placement = place_child(&config, Some(&parent), 0);
        assert_eq!(placement.direction, Direction::BottomLeft);
    }
}
