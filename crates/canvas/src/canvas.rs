use crate::{
    CanvasStore, Minimap, MinimapConfig, MinimapScene, NodeStyle, PointerId, PointerTarget, Scene,
    Transform, Viewport,
};
use glam::Vec2;
use node::{Node, NodeId, NodePatch, ScreenPoint};
use std::collections::HashSet;

/// Events emitted by the canvas.
///
/// Queued rather than dispatched inline so a listener reacting to one
/// event can't re-enter the canvas mid-update.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
    NodeAdded(NodeId),
    NodeUpdated(NodeId),
    NodeRemoved(NodeId),
    IdentityReplaced { temp: NodeId, real: NodeId },
    SelectionChanged,
    TransformChanged(Transform),
    ContentChanged,
}

/// The canvas state: node store, camera, minimap and selection.
pub struct Canvas {
    /// Nodes and edges. Only the canvas mutates them.
    store: CanvasStore,

    /// Viewport (pan/zoom) state.
    pub viewport: Viewport,

    pub minimap: Minimap,

    /// Screen-space node sizes.
    pub style: NodeStyle,

    /// Currently selected node IDs.
    pub selection: HashSet<NodeId>,

    events: Vec<CanvasEvent>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(MinimapConfig::default())
    }
}

impl Canvas {
    pub fn new(minimap: MinimapConfig) -> Self {
        Self {
            store: CanvasStore::new(),
            viewport: Viewport::new(),
            minimap: Minimap::new(minimap),
            style: NodeStyle::default(),
            selection: HashSet::new(),
            events: Vec::new(),
        }
    }

    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    pub fn transform(&self) -> Transform {
        self.viewport.transform()
    }

    /// Drain queued events in the order they happened.
    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: CanvasEvent) {
        self.events.push(event);
    }

    fn emit_transform(&mut self, transform: Transform) {
        self.emit(CanvasEvent::TransformChanged(transform));
    }

    fn after_content_change(&mut self) {
        self.emit(CanvasEvent::ContentChanged);
        if let Some(t) = self.viewport.ensure_centered(self.store.nodes()) {
            self.emit_transform(t);
        }
    }

    // === Store ===

    /// Add a node to the canvas.
    pub fn add_node(&mut self, node: Node) {
        let id = node.id.clone();
        self.store.add_node(node);
        self.emit(CanvasEvent::NodeAdded(id));
        self.after_content_change();
    }

    /// Optimistically add a node under a temporary id.
    pub fn stage_node(&mut self, node: Node) {
        let id = node.id.clone();
        self.store.stage(node);
        self.emit(CanvasEvent::NodeAdded(id));
        self.after_content_change();
    }

    /// Confirm a staged node under its backend id.
    pub fn commit_node(&mut self, temp: &NodeId, real: &NodeId) -> bool {
        self.replace_identity(temp, real)
    }

    /// Drop a staged node whose create failed.
    pub fn rollback_node(&mut self, temp: &NodeId) -> Option<Node> {
        let removed = self.store.rollback(temp)?;
        self.forget_selected(temp);
        self.emit(CanvasEvent::NodeRemoved(temp.clone()));
        self.emit(CanvasEvent::ContentChanged);
        Some(removed)
    }

    pub fn replace_identity(&mut self, temp: &NodeId, real: &NodeId) -> bool {
        if !self.store.replace_identity(temp, real) {
            return false;
        }
        if self.selection.remove(temp) {
            self.selection.insert(real.clone());
        }
        self.emit(CanvasEvent::IdentityReplaced {
            temp: temp.clone(),
            real: real.clone(),
        });
        self.emit(CanvasEvent::ContentChanged);
        true
    }

    pub fn update_node(&mut self, id: &NodeId, patch: &NodePatch) -> bool {
        if !self.store.update_node(id, patch) {
            return false;
        }
        self.emit(CanvasEvent::NodeUpdated(id.clone()));
        self.emit(CanvasEvent::ContentChanged);
        true
    }

    /// Remove a node and its edges. Its children stay, with a dangling parent.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let removed = self.store.remove_node(id)?;
        self.forget_selected(id);
        self.emit(CanvasEvent::NodeRemoved(id.clone()));
        self.emit(CanvasEvent::ContentChanged);
        Some(removed)
    }

    /// Replace the whole node list with a fresh load.
    pub fn replace_all(&mut self, nodes: Vec<Node>) {
        self.store.replace_all(nodes);
        let live: HashSet<NodeId> = self.store.nodes().iter().map(|n| n.id.clone()).collect();
        self.selection.retain(|id| live.contains(id));
        self.after_content_change();
    }

    // === Selection ===

    /// Select a node, optionally adding to selection.
    pub fn select(&mut self, id: NodeId, add_to_selection: bool) {
        if !add_to_selection {
            self.selection.clear();
        }
        self.selection.insert(id);
        self.emit(CanvasEvent::SelectionChanged);
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.emit(CanvasEvent::SelectionChanged);
        }
    }

    fn forget_selected(&mut self, id: &NodeId) {
        if self.selection.remove(id) {
            self.emit(CanvasEvent::SelectionChanged);
        }
    }

    // === Viewport ===

    pub fn set_container_size(&mut self, size: Vec2) {
        self.viewport.set_container_size(size);
        if let Some(t) = self.viewport.ensure_centered(self.store.nodes()) {
            self.emit_transform(t);
        }
    }

    pub fn set_transform(&mut self, transform: Transform) {
        let t = self.viewport.set_transform(transform);
        self.emit_transform(t);
    }

    /// Pointer pressed. Empty canvas starts a pan; a node press selects it.
    pub fn pointer_down(&mut self, pointer: PointerId, screen: ScreenPoint, target: PointerTarget) {
        if let PointerTarget::Node(id) = &target {
            self.select(id.clone(), false);
        }
        self.viewport.pointer_down(pointer, screen, &target);
    }

    pub fn pointer_move(&mut self, pointer: PointerId, screen: ScreenPoint) {
        if let Some(t) = self.viewport.pointer_move(pointer, screen) {
            self.emit_transform(t);
        }
    }

    pub fn pointer_up(&mut self, pointer: PointerId) {
        self.viewport.pointer_up(pointer);
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId) {
        self.viewport.pointer_cancel(pointer);
    }

    /// Zoom at a screen point.
    pub fn zoom_at(&mut self, screen: ScreenPoint, factor: f32) {
        let t = self.viewport.zoom_at(screen, factor);
        self.emit_transform(t);
    }

    pub fn reset_view(&mut self) {
        let t = self.viewport.reset();
        self.emit_transform(t);
    }

    /// Navigate to the logical point under a minimap click.
    pub fn minimap_click(&mut self, pixel: Vec2) -> Transform {
        let target = self.minimap.click(pixel);
        let t = self.viewport.center_on(target);
        self.emit_transform(t);
        t
    }

    // === Rendering ===

    pub fn scene(&self) -> Scene {
        Scene::build(&self.store, self.transform(), &self.style, &self.selection)
    }

    pub fn minimap_scene(&self) -> MinimapScene {
        self.minimap
            .scene(&self.store.unique_nodes(), self.store.edges(), &self.transform())
    }
}
