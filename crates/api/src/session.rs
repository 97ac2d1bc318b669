use crate::writer::{lock, AlertQueue, WriteQueue};
use crate::CompletionTracker;
use canvas::{Canvas, MinimapConfig};
use gateway::{CreateNode, Gateway, GatewayError, SyncGateway};
use layout::{place_child, LayoutConfig, ParentContext};
use node::{CanvasPoint, ContainerId, IdGenerator, Node, NodeId, NodePatch, UuidGenerator};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Something the user has to be told about.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAlert {
    /// The node was removed locally but the backend still has it.
    DeleteFailed { id: NodeId, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AddChildError {
    #[error("another node is still being created")]
    CreateInFlight,
    #[error("the map already has a root")]
    RootExists,
    #[error("the backend did not accept the new node")]
    Rejected,
}

/// Which create currently holds the single create slot, and which staged
/// nodes were abandoned by a dropped [`PendingCreate`].
#[derive(Debug, Default)]
struct CreateSlot {
    in_flight: Option<NodeId>,
    abandoned: Vec<NodeId>,
}

/// A node staged locally whose create hasn't been confirmed yet.
///
/// Holds the session's create slot. Dropping it without passing it to
/// [`MindMap::complete`] frees the slot, and the staged node is discarded
/// the next time the session stages or loads.
#[must_use = "a pending create blocks further creates until finished"]
#[derive(Debug)]
pub struct PendingCreate {
    temp: NodeId,
    request: CreateNode,
    slot: Arc<Mutex<CreateSlot>>,
}

impl PendingCreate {
    pub fn temp_id(&self) -> &NodeId {
        &self.temp
    }

    pub fn request(&self) -> &CreateNode {
        &self.request
    }

    /// Give the slot back. False if this create no longer holds it.
    fn release(&self) -> bool {
        let mut slot = lock(&self.slot);
        if slot.in_flight.as_ref() == Some(&self.temp) {
            slot.in_flight = None;
            true
        } else {
            false
        }
    }
}

impl Drop for PendingCreate {
    fn drop(&mut self) {
        if self.release() {
            log::warn!("create of {} abandoned before it finished", self.temp);
            lock(&self.slot).abandoned.push(self.temp.clone());
        }
    }
}

/// One open mind map: canvas state plus its persistence.
///
/// Every edit applies to the canvas synchronously. Updates and deletes are
/// then queued for the backend in order and never block the session; call
/// [`MindMap::flush`] to wait for them. Creates return their backend id, so
/// they run as a separate task whose answer is handed back through
/// [`MindMap::complete`]. At most one create is in flight at a time.
///
/// Dropping the session cancels queued writes and completion fetches.
pub struct MindMap<G: Gateway + 'static> {
    canvas: Canvas,
    gateway: SyncGateway<G>,
    writes: WriteQueue,
    layout: LayoutConfig,
    container: ContainerId,
    ids: Arc<dyn IdGenerator>,
    creates: Arc<Mutex<CreateSlot>>,
    /// Staged nodes edited before their create finished.
    unsynced: HashSet<NodeId>,
    completion: CompletionTracker,
    alerts: AlertQueue,
}

impl<G: Gateway + 'static> MindMap<G> {
    pub fn new(gateway: SyncGateway<G>, container: ContainerId) -> Self {
        let alerts = AlertQueue::default();
        Self {
            canvas: Canvas::default(),
            writes: WriteQueue::spawn(gateway.clone(), alerts.clone()),
            gateway,
            layout: LayoutConfig::default(),
            container,
            ids: Arc::new(UuidGenerator),
            creates: Arc::default(),
            unsynced: HashSet::new(),
            completion: CompletionTracker::new(),
            alerts,
        }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout.sanitized();
        self
    }

    pub fn with_minimap(mut self, minimap: MinimapConfig) -> Self {
        self.canvas = Canvas::new(minimap);
        self
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Canvas access for view-only changes (pan, zoom, selection).
    ///
    /// Node edits made here are not persisted; use the session methods.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn gateway(&self) -> &SyncGateway<G> {
        &self.gateway
    }

    pub fn container(&self) -> &ContainerId {
        &self.container
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn is_creating(&self) -> bool {
        lock(&self.creates).in_flight.is_some()
    }

    pub fn completion(&self) -> &CompletionTracker {
        &self.completion
    }

    pub fn take_alerts(&mut self) -> Vec<SessionAlert> {
        std::mem::take(&mut *lock(&self.alerts))
    }

    /// Wait until every queued update and delete has reached the backend.
    pub async fn flush(&self) {
        self.writes.flush().await;
    }

    /// Provision the backing map if it doesn't exist yet.
    pub async fn ensure_container(&self) -> Result<(), GatewayError> {
        self.gateway.create_container(&self.container).await
    }

    /// Replace local state with the backend's and start loading completion.
    ///
    /// A node staged by a create still in flight is kept.
    pub async fn load(&mut self) {
        self.discard_abandoned();
        let nodes = self.gateway.list(&self.container).await;
        log::debug!("loaded {} nodes for {}", nodes.len(), self.container);

        let in_flight = lock(&self.creates).in_flight.clone();
        let staged = in_flight.and_then(|temp| self.canvas.store().unique_nodes().into_iter().find(|n| n.id == temp));

        self.completion.clear();
        for node in &nodes {
            if let Some(list) = &node.todo_list_id {
                self.completion.watch(node.id.clone(), list.clone(), &self.gateway);
            }
        }
        self.canvas.replace_all(nodes);
        if let Some(node) = staged {
            log::debug!("keeping staged {} across reload", node.id);
            self.canvas.stage_node(node);
        }
    }

    /// Apply every completion fetch that has answered for a node still linked to the same list.
    pub async fn settle_completion(&mut self) -> usize {
        let mut applied = 0;
        for (id, list, completed) in self.completion.settle().await {
            let still_linked = self
                .canvas
                .store()
                .node(&id)
                .is_some_and(|n| n.todo_list_id.as_ref() == Some(&list));
            if still_linked && self.canvas.update_node(&id, &NodePatch::completed(completed)) {
                applied += 1;
            }
        }
        applied
    }

    // === Create ===

    /// Stage a child of `parent` at its radial slot and prepare the create.
    ///
    /// Returns `None` without touching the canvas while another create is in flight.
    pub fn begin_add_child(
        &mut self,
        parent: &NodeId,
        label: impl Into<String>,
        description: Option<String>,
    ) -> Option<PendingCreate> {
        self.discard_abandoned();
        if self.is_creating() {
            log::debug!("add child under {parent} ignored: a create is in flight");
            return None;
        }

        let nodes = self.canvas.store().unique_nodes();
        let context = ParentContext::from_tree(&nodes, parent);
        if context.is_none() {
            log::debug!("parent {parent} not loaded, placing child around the origin");
        }
        let existing = self.canvas.store().child_count(parent);
        let placement = place_child(&self.layout, context.as_ref(), existing);

        let mut node = Node::new(self.ids.next_id(), placement.position, label)
            .with_parent(parent.clone())
            .with_direction(placement.direction);
        node.description = description;
        Some(self.stage(node))
    }

    /// Stage the root node at the origin. Refused while a parentless node exists.
    pub fn begin_add_root(&mut self, label: impl Into<String>) -> Result<PendingCreate, AddChildError> {
        self.discard_abandoned();
        if self.is_creating() {
            return Err(AddChildError::CreateInFlight);
        }
        if self.canvas.store().nodes().iter().any(Node::is_root) {
            return Err(AddChildError::RootExists);
        }
        let node = Node::new(self.ids.next_id(), CanvasPoint::ORIGIN, label);
        Ok(self.stage(node))
    }

    fn stage(&mut self, node: Node) -> PendingCreate {
        let request = CreateNode::for_node(self.container.clone(), &node);
        let temp = node.id.clone();
        self.canvas.stage_node(node);
        lock(&self.creates).in_flight = Some(temp.clone());
        PendingCreate {
            temp,
            request,
            slot: self.creates.clone(),
        }
    }

    /// Roll back nodes staged by creates whose [`PendingCreate`] was dropped.
    fn discard_abandoned(&mut self) {
        let abandoned = std::mem::take(&mut lock(&self.creates).abandoned);
        for temp in abandoned {
            self.canvas.rollback_node(&temp);
            self.completion.cancel(&temp);
            self.unsynced.remove(&temp);
        }
    }

    /// Send the create to the backend. The task doesn't borrow the session,
    /// which stays usable until the answer is passed to [`MindMap::complete`].
    /// Dropping the task cancels the request.
    pub fn send_create(&self, pending: &PendingCreate) -> smol::Task<Option<NodeId>> {
        let gateway = self.gateway.clone();
        let request = pending.request.clone();
        smol::spawn(async move { gateway.create(&request).await })
    }

    /// Settle a create with the backend's answer: swap in the real id, or
    /// roll the staged node back when there is none.
    ///
    /// Edits made to the staged node meanwhile are written back under the
    /// real id. If the node was deleted meanwhile, the backend copy is deleted.
    pub fn complete(&mut self, pending: PendingCreate, created: Option<NodeId>) -> Option<NodeId> {
        pending.release();
        let temp = pending.temp.clone();
        let edited = self.unsynced.remove(&temp);

        let Some(real) = created else {
            log::warn!("create of {temp} failed, rolling back");
            self.canvas.rollback_node(&temp);
            self.completion.cancel(&temp);
            return None;
        };

        if !self.canvas.commit_node(&temp, &real) {
            log::warn!("{temp} was removed before its create finished, deleting {}", real.short());
            self.writes.delete(real);
            return None;
        }

        self.completion.cancel(&temp);
        let committed = self.canvas.store().unique_nodes().into_iter().find(|n| n.id == real);
        if let Some(node) = committed {
            if let Some(list) = &node.todo_list_id {
                self.completion.watch(real.clone(), list.clone(), &self.gateway);
            }
            if edited {
                log::debug!("writing back edits made to {temp} as {}", real.short());
                self.writes.update(real.clone(), NodePatch::from(&node));
            }
        }
        Some(real)
    }

    /// Send a staged create and settle it. Dropping this future abandons the create.
    pub async fn finish_add_child(&mut self, pending: PendingCreate) -> Option<NodeId> {
        let created = self.send_create(&pending).await;
        self.complete(pending, created)
    }

    pub async fn add_child(
        &mut self,
        parent: &NodeId,
        label: impl Into<String>,
        description: Option<String>,
    ) -> Result<NodeId, AddChildError> {
        let pending = self
            .begin_add_child(parent, label, description)
            .ok_or(AddChildError::CreateInFlight)?;
        self.finish_add_child(pending).await.ok_or(AddChildError::Rejected)
    }

    pub async fn add_root(&mut self, label: impl Into<String>) -> Result<NodeId, AddChildError> {
        let pending = self.begin_add_root(label)?;
        self.finish_add_child(pending).await.ok_or(AddChildError::Rejected)
    }

    // === Update ===

    /// Apply a partial update locally and queue it for the backend.
    ///
    /// A node whose create hasn't finished is written back in full once it has.
    pub fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> bool {
        if id.is_empty() {
            log::error!("update without a node id dropped: {patch:?}");
            return false;
        }
        if !self.canvas.update_node(id, &patch) {
            log::debug!("update of unknown node {id} ignored");
            return false;
        }

        if let Some(list) = &patch.todo_list_id {
            self.completion.watch(id.clone(), list.clone(), &self.gateway);
        }

        if self.canvas.store().is_pending(id) {
            self.unsynced.insert(id.clone());
        } else {
            self.writes.update(id.clone(), patch);
        }
        true
    }

    pub fn move_node(&mut self, id: &NodeId, position: CanvasPoint) -> bool {
        self.update_node(id, NodePatch::position(position))
    }

    pub fn rename_node(&mut self, id: &NodeId, label: impl Into<String>) -> bool {
        self.update_node(id, NodePatch::label(label))
    }

    // === Delete ===

    /// Remove a node locally and queue its deletion. Children are kept.
    ///
    /// Returns whether the node was on the canvas. A backend failure shows up
    /// as a [`SessionAlert`] since the node will reappear on the next load.
    pub fn delete_node(&mut self, id: &NodeId) -> bool {
        let pending = self.canvas.store().is_pending(id);
        let removed = self.canvas.remove_node(id).is_some();
        if !removed {
            log::debug!("delete of {id}: not on the canvas");
        }
        self.completion.cancel(id);
        self.unsynced.remove(id);

        // `complete` deletes the backend copy of a pending node once it has an id.
        if !pending {
            self.writes.delete(id.clone());
        }
        removed
    }
}
