use node::{Edge, Node, NodeId, NodePatch};
use std::collections::{HashMap, HashSet};

/// In-memory mirror of a map's nodes and edges.
///
/// Every mutation is synchronous and local. Edges follow `parent_id`: adding
/// or reparenting a node synthesizes its parent edge, removing a node drops
/// every edge touching it. Children of a removed node keep their dangling
/// `parent_id`; they are not reparented or deleted.
#[derive(Clone, Debug, Default)]
pub struct CanvasStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Temporary ids staged locally and not yet confirmed by the backend.
    pending: HashSet<NodeId>,
}

impl CanvasStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw node list in insertion order. May hold transient duplicates; see `unique_nodes`.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.unique_ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// The parentless node, or the first node when no explicit root exists.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_root()).or_else(|| self.nodes.first())
    }

    pub fn children_of(&self, id: &NodeId) -> Vec<&Node> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .filter(|n| n.parent_id.as_ref() == Some(id))
            .filter(|n| seen.insert(n.id.clone()))
            .collect()
    }

    pub fn child_count(&self, id: &NodeId) -> usize {
        self.children_of(id).len()
    }

    pub fn is_pending(&self, id: &NodeId) -> bool {
        self.pending.contains(id)
    }

    fn unique_ids(&self) -> HashSet<&NodeId> {
        self.nodes.iter().map(|n| &n.id).collect()
    }

    fn has_edge(&self, from: &NodeId, to: &NodeId) -> bool {
        self.edges.iter().any(|e| e.connects(from, to))
    }

    fn ensure_parent_edge(&mut self, node: &Node) {
        if let Some(parent) = &node.parent_id {
            if !self.has_edge(parent, &node.id) {
                self.edges.push(Edge::new(parent.clone(), node.id.clone()));
            }
        }
    }

    /// Append a node, synthesizing its parent edge if it is missing.
    ///
    /// An id that is already present is appended anyway; `unique_nodes`
    /// collapses the copies.
    pub fn add_node(&mut self, mut node: Node) {
        node.sanitize();
        self.ensure_parent_edge(&node);
        self.nodes.push(node);
    }

    /// Nodes de-duplicated by id, in first-seen order. Later copies are
    /// shallow-merged over earlier ones (last write wins).
    pub fn unique_nodes(&self) -> Vec<Node> {
        let mut index: HashMap<&NodeId, usize> = HashMap::new();
        let mut unique: Vec<Node> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            match index.get(&node.id) {
                Some(&i) => unique[i].merge_from(node),
                None => {
                    index.insert(&node.id, unique.len());
                    unique.push(node.clone());
                }
            }
        }
        unique
    }

    /// Swap a temporary id for the backend-assigned one everywhere it appears.
    pub fn replace_identity(&mut self, temp: &NodeId, real: &NodeId) -> bool {
        if temp == real {
            self.pending.remove(temp);
            return self.contains(temp);
        }

        let mut changed = false;
        for node in &mut self.nodes {
            if &node.id == temp {
                node.id = real.clone();
                changed = true;
            }
            if node.parent_id.as_ref() == Some(temp) {
                node.parent_id = Some(real.clone());
                changed = true;
            }
        }
        for edge in &mut self.edges {
            changed |= edge.rename_endpoint(temp, real);
        }
        // The real id may already be present, e.g. from a reload.
        let mut seen = HashSet::new();
        self.edges.retain(|e| seen.insert((e.from.clone(), e.to.clone())));
        if self.pending.remove(temp) {
            log::debug!("confirmed {temp} as {real}");
        }
        changed
    }

    /// Merge `patch` into the node. Returns `false` for unknown ids and for
    /// reparents that would create a cycle.
    pub fn update_node(&mut self, id: &NodeId, patch: &NodePatch) -> bool {
        if !self.contains(id) {
            log::debug!("update for unknown node {id} ignored");
            return false;
        }

        if let Some(new_parent) = &patch.parent_id {
            if self.would_cycle(id, new_parent) {
                log::error!("refusing to reparent {id} under its own descendant {new_parent}");
                return false;
            }
            self.edges.retain(|e| !(&e.to == id && &e.from != new_parent));
            if !self.has_edge(new_parent, id) {
                self.edges.push(Edge::new(new_parent.clone(), id.clone()));
            }
        }

        for node in self.nodes.iter_mut().filter(|n| &n.id == id) {
            node.apply(patch);
        }
        true
    }

    /// True if making `parent` the parent of `id` would close a loop.
    fn would_cycle(&self, id: &NodeId, parent: &NodeId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(parent.clone());
        while let Some(candidate) = current {
            if &candidate == id {
                return true;
            }
            if !seen.insert(candidate.clone()) {
                return false;
            }
            current = self.node(&candidate).and_then(|n| n.parent_id.clone());
        }
        false
    }

    /// Remove the node and every edge touching it. Children are left in place.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let position = self.nodes.iter().position(|n| &n.id == id)?;
        let removed = self.nodes.remove(position);
        self.nodes.retain(|n| &n.id != id);
        self.edges.retain(|e| !e.touches(id));
        self.pending.remove(id);
        Some(removed)
    }

    /// Optimistically insert a node under a temporary id.
    pub fn stage(&mut self, node: Node) {
        self.pending.insert(node.id.clone());
        self.add_node(node);
    }

    /// Confirm a staged node under its backend id.
    pub fn commit(&mut self, temp: &NodeId, real: &NodeId) -> bool {
        self.replace_identity(temp, real)
    }

    /// Drop a staged node whose create failed.
    pub fn rollback(&mut self, temp: &NodeId) -> Option<Node> {
        if !self.pending.contains(temp) {
            log::debug!("rollback of {temp} skipped: not pending");
            return None;
        }
        self.remove_node(temp)
    }

    /// Replace everything with a freshly loaded node list, deriving edges from parent links.
    pub fn replace_all(&mut self, nodes: Vec<Node>) {
        self.nodes.clear();
        self.edges.clear();
        self.pending.clear();
        for node in nodes {
            self.add_node(node);
        }
    }
}
