use crate::Transform;
use glam::Vec2;
use node::{CanvasPoint, Node, NodeId, ScreenPoint};

/// Identifies one pointer (mouse or a single touch point).
pub type PointerId = u64;

/// What a pointer-down landed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas background.
    Canvas,
    /// A node body.
    Node(NodeId),
    /// A node's toolbox (add-child, delete, ...). Never starts a pan.
    Toolbox(NodeId),
}

/// Active pan: where it started and the offset at that moment.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PanGesture {
    pointer: PointerId,
    start_screen: ScreenPoint,
    start_offset: Vec2,
}

/// Camera state for the canvas: transform, container size and pan gesture.
#[derive(Clone, Debug, Default)]
pub struct Viewport {
    transform: Transform,
    container: Option<Vec2>,
    centered: bool,
    pan: Option<PanGesture>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) -> Transform {
        self.transform = Transform::new(transform.x, transform.y, transform.k);
        self.transform
    }

    pub fn container_size(&self) -> Option<Vec2> {
        self.container
    }

    /// Record the container's pixel size. Zero or non-finite sizes count as unknown.
    pub fn set_container_size(&mut self, size: Vec2) {
        self.container = (size.is_finite() && size.x > 0.0 && size.y > 0.0).then_some(size);
    }

    pub fn is_centered(&self) -> bool {
        self.centered
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Start a pan if the press landed on empty canvas and no pan is active.
    pub fn pointer_down(&mut self, pointer: PointerId, screen: ScreenPoint, target: &PointerTarget) -> bool {
        if self.pan.is_some() || *target != PointerTarget::Canvas {
            return false;
        }
        self.pan = Some(PanGesture {
            pointer,
            start_screen: screen,
            start_offset: self.transform.offset(),
        });
        true
    }

    /// Update the pan offset. Returns the new transform if this pointer owns the pan.
    pub fn pointer_move(&mut self, pointer: PointerId, screen: ScreenPoint) -> Option<Transform> {
        let pan = self.pan.filter(|pan| pan.pointer == pointer)?;
        let delta = screen - pan.start_screen;
        if !delta.0.is_finite() {
            return None;
        }
        self.transform = self.transform.with_offset(pan.start_offset + delta.0);
        Some(self.transform)
    }

    /// End the pan owned by `pointer` (pointer-up or the touch point went away).
    pub fn pointer_up(&mut self, pointer: PointerId) -> bool {
        if self.pan.is_some_and(|pan| pan.pointer == pointer) {
            self.pan = None;
            true
        } else {
            false
        }
    }

    /// A cancelled pointer ends its pan like a release.
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> bool {
        self.pointer_up(pointer)
    }

    /// Zoom by `factor` around a screen point.
    pub fn zoom_at(&mut self, screen: ScreenPoint, factor: f32) -> Transform {
        self.transform = self.transform.zoom_at(screen, factor);
        self.transform
    }

    /// Recentre on a world point, keeping the zoom.
    pub fn center_on(&mut self, point: CanvasPoint) -> Transform {
        let container = self.container.unwrap_or(Vec2::ZERO);
        self.transform = Transform::centered_on(point, container, self.transform.k);
        self.transform
    }

    /// Centre on the root the first time nodes and a container size are both known.
    ///
    /// Runs at most once per viewport; later node-list changes never move the view.
    pub fn ensure_centered(&mut self, nodes: &[Node]) -> Option<Transform> {
        if self.centered || self.container.is_none() {
            return None;
        }
        let target = nodes.iter().find(|n| n.is_root()).or_else(|| nodes.first())?;
        self.centered = true;
        log::debug!("centering viewport on {}", target.id);
        Some(self.center_on(target.position))
    }

    /// Reset to the identity transform. The one-shot centering stays spent.
    pub fn reset(&mut self) -> Transform {
        self.pan = None;
        self.transform = Transform::IDENTITY;
        self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>, x: f32, y: f32) -> Node {
        let n = Node::new(NodeId::new(id), CanvasPoint::new(x, y), id);
        match parent {
            Some(p) => n.with_parent(NodeId::new(p)),
            None => n,
        }
    }

    #[test]
    fn pan_adds_travel_to_starting_offset() {
        let mut viewport = Viewport::new();
        viewport.set_transform(Transform::new(10.0, 20.0, 2.0));

        assert!(viewport.pointer_down(1, ScreenPoint::new(100.0, 100.0), &PointerTarget::Canvas));
        let t = viewport.pointer_move(1, ScreenPoint::new(130.0, 90.0)).unwrap();
        assert_eq!(t, Transform::new(40.0, 10.0, 2.0));

        // Moves are relative to the gesture start, not cumulative.
        let t = viewport.pointer_move(1, ScreenPoint::new(105.0, 100.0)).unwrap();
        assert_eq!(t, Transform::new(15.0, 20.0, 2.0));

        assert!(viewport.pointer_up(1));
        assert!(viewport.pointer_move(1, ScreenPoint::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn toolbox_and_nodes_never_start_a_pan() {
        let mut viewport = Viewport::new();
        let id = NodeId::new("a");
        assert!(!viewport.pointer_down(1, ScreenPoint::new(0.0, 0.0), &PointerTarget::Toolbox(id.clone())));
        assert!(!viewport.pointer_down(1, ScreenPoint::new(0.0, 0.0), &PointerTarget::Node(id)));
        assert!(!viewport.is_panning());
    }

    #[test]
    fn only_one_pan_at_a_time() {
        let mut viewport = Viewport::new();
        assert!(viewport.pointer_down(1, ScreenPoint::new(0.0, 0.0), &PointerTarget::Canvas));
        assert!(!viewport.pointer_down(2, ScreenPoint::new(50.0, 50.0), &PointerTarget::Canvas));

        // The second touch point doesn't drive or end the gesture.
        assert!(viewport.pointer_move(2, ScreenPoint::new(80.0, 80.0)).is_none());
        assert!(!viewport.pointer_up(2));
        assert!(viewport.is_panning());

        assert!(viewport.pointer_cancel(1));
        assert!(!viewport.is_panning());
    }

    #[test]
    fn centers_once_on_root() {
        let mut viewport = Viewport::new();
        viewport.set_transform(Transform::new(0.0, 0.0, 2.0));

        // No container yet: nothing happens and the one-shot isn't spent.
        let nodes = vec![node("child", Some("root"), 0.0, 0.0), node("root", None, 100.0, 50.0)];
        assert!(viewport.ensure_centered(&nodes).is_none());

        viewport.set_container_size(Vec2::new(800.0, 600.0));
        assert!(viewport.ensure_centered(&[]).is_none());

        let t = viewport.ensure_centered(&nodes).unwrap();
        assert_eq!(t, Transform::new(200.0, 200.0, 2.0));

        let moved = vec![node("root", None, -500.0, -500.0)];
        assert!(viewport.ensure_centered(&moved).is_none());
        assert_eq!(viewport.transform(), t);
    }

    #[test]
    fn centers_on_first_node_without_root() {
        let mut viewport = Viewport::new();
        viewport.set_container_size(Vec2::new(200.0, 200.0));
        let nodes = vec![node("a", Some("gone"), 10.0, 10.0), node("b", Some("gone"), 50.0, 50.0)];
        let t = viewport.ensure_centered(&nodes).unwrap();
        assert_eq!(t.world_to_screen(CanvasPoint::new(10.0, 10.0)), ScreenPoint::new(100.0, 100.0));
    }

    #[test]
    fn zero_container_is_unknown() {
        let mut viewport = Viewport::new();
        viewport.set_container_size(Vec2::new(0.0, 300.0));
        assert!(viewport.container_size().is_none());
    }
}
