use node::{CanvasPoint, Node, NodeId};
use std::collections::HashSet;

/// What the layout engine needs to know about the parent of a new child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParentContext {
    pub position: CanvasPoint,
    /// Root depth is 0.
    pub depth: usize,
    /// Angle of the parent as seen from its own parent. `None` lays the
    /// children out root-style around the full circle.
    pub bearing: Option<f32>,
}

impl ParentContext {
    pub fn root(position: CanvasPoint) -> Self {
        Self {
            position,
            depth: 0,
            bearing: None,
        }
    }

    /// Resolve the context for `parent_id` from a flat node list.
    ///
    /// Returns `None` when the parent isn't in the list (deleted or not yet
    /// loaded). The bearing comes from the grandparent's position, falling
    /// back to the parent's recorded direction when the grandparent is gone.
    pub fn from_tree(nodes: &[Node], parent_id: &NodeId) -> Option<Self> {
        let parent = find(nodes, parent_id)?;
        let depth = depth_of(nodes, parent_id);

        let bearing = match &parent.parent_id {
            None => None,
            Some(grandparent_id) => {
                let from_grandparent = find(nodes, grandparent_id).and_then(|grandparent| {
                    let delta = parent.position.finite_or_zero() - grandparent.position.finite_or_zero();
                    (delta.0.length_squared() > f32::EPSILON).then(|| delta.angle())
                });
                from_grandparent.or_else(|| parent.direction.map(|d| d.bearing()))
            }
        };

        Some(Self {
            position: parent.position.finite_or_zero(),
            depth,
            bearing,
        })
    }
}

fn find<'a>(nodes: &'a [Node], id: &NodeId) -> Option<&'a Node> {
    nodes.iter().find(|n| &n.id == id)
}

/// Number of resolvable ancestors above `id`. Stops at a missing parent or a cycle.
pub fn depth_of(nodes: &[Node], id: &NodeId) -> usize {
    let mut depth = 0;
    let mut seen = HashSet::new();
    let mut current = find(nodes, id);
    seen.insert(id.clone());

    while let Some(parent_id) = current.and_then(|n| n.parent_id.as_ref()) {
        if !seen.insert(parent_id.clone()) {
            break;
        }
        match find(nodes, parent_id) {
            Some(parent) => {
                depth += 1;
                current = Some(parent);
            }
            None => break,
        }
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::Direction;

    fn node(id: &str, parent: Option<&str>, x: f32, y: f32) -> Node {
        let n = Node::new(NodeId::new(id), CanvasPoint::new(x, y), id);
        match parent {
            Some(p) => n.with_parent(NodeId::new(p)),
            None => n,
        }
    }

    #[test]
    fn depth_counts_ancestors() {
        let nodes = vec![
            node("root", None, 0.0, 0.0),
            node("a", Some("root"), 100.0, 0.0),
            node("b", Some("a"), 200.0, 0.0),
        ];
        assert_eq!(depth_of(&nodes, &NodeId::new("root")), 0);
        assert_eq!(depth_of(&nodes, &NodeId::new("a")), 1);
        assert_eq!(depth_of(&nodes, &NodeId::new("b")), 2);
    }

    #[test]
    fn depth_stops_at_cycles_and_gaps() {
        let nodes = vec![node("a", Some("b"), 0.0, 0.0), node("b", Some("a"), 0.0, 0.0)];
        assert_eq!(depth_of(&nodes, &NodeId::new("a")), 1);

        let nodes = vec![node("orphan", Some("gone"), 0.0, 0.0)];
        assert_eq!(depth_of(&nodes, &NodeId::new("orphan")), 0);
    }

    #[test]
    fn root_parent_has_no_bearing() {
        let nodes = vec![node("root", None, 400.0, 300.0)];
        let ctx = ParentContext::from_tree(&nodes, &NodeId::new("root")).unwrap();
        assert_eq!(ctx, ParentContext::root(CanvasPoint::new(400.0, 300.0)));
    }

    #[test]
    fn bearing_points_away_from_grandparent() {
        let nodes = vec![node("root", None, 0.0, 0.0), node("a", Some("root"), 0.0, 100.0)];
        let ctx = ParentContext::from_tree(&nodes, &NodeId::new("a")).unwrap();
        assert_eq!(ctx.depth, 1);
        let bearing = ctx.bearing.unwrap();
        assert!((bearing - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn bearing_falls_back_to_recorded_direction() {
        let nodes = vec![node("a", Some("gone"), 50.0, 50.0).with_direction(Direction::BottomLeft)];
        let ctx = ParentContext::from_tree(&nodes, &NodeId::new("a")).unwrap();
        assert_eq!(ctx.bearing, Some(Direction::BottomLeft.bearing()));
    }

    #[test]
    fn missing_parent_resolves_to_none() {
        let nodes = vec![node("root", None, 0.0, 0.0)];
        assert!(ParentContext::from_tree(&nodes, &NodeId::new("nope")).is_none());
    }
}
