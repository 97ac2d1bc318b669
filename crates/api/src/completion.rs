use gateway::{Gateway, SyncGateway};
use node::{NodeId, TodoListId};
use std::collections::HashMap;

/// Outstanding todo-completion fetches, one per node.
///
/// Each fetch is a `smol::Task`; dropping it cancels the fetch. A node's
/// fetch is dropped when the node goes away, changes identity or links a
/// different list, so a late answer can never land on the wrong node.
#[derive(Default)]
pub struct CompletionTracker {
    tasks: HashMap<NodeId, (TodoListId, smol::Task<Option<bool>>)>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start fetching completion of `list` for `node`, replacing any fetch
    /// for a different list.
    pub fn watch<G: Gateway + 'static>(&mut self, node: NodeId, list: TodoListId, gateway: &SyncGateway<G>) {
        if self.tasks.get(&node).is_some_and(|(current, _)| *current == list) {
            return;
        }
        let task = gateway.spawn_completion(list.clone());
        if self.tasks.insert(node.clone(), (list, task)).is_some() {
            log::debug!("completion fetch for {node} replaced");
        }
    }

    pub fn cancel(&mut self, node: &NodeId) -> bool {
        self.tasks.remove(node).is_some()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn is_watching(&self, node: &NodeId) -> bool {
        self.tasks.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every outstanding fetch and return the ones that answered.
    pub async fn settle(&mut self) -> Vec<(NodeId, TodoListId, bool)> {
        let mut settled = Vec::new();
        for (node, (list, task)) in std::mem::take(&mut self.tasks) {
            if let Some(completed) = task.await {
                settled.push((node, list, completed));
            }
        }
        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::{MemoryGateway, Operation};

    fn gateway() -> SyncGateway<MemoryGateway> {
        let backend = MemoryGateway::new();
        backend.set_todo_list(TodoListId::new("done"), vec![true]);
        backend.set_todo_list(TodoListId::new("open"), vec![false]);
        SyncGateway::new(backend)
    }

    #[test]
    fn settles_every_watched_node() {
        smol::block_on(async {
            let gateway = gateway();
            let mut tracker = CompletionTracker::new();
            tracker.watch(NodeId::new("a"), TodoListId::new("done"), &gateway);
            tracker.watch(NodeId::new("b"), TodoListId::new("open"), &gateway);

            let mut settled = tracker.settle().await;
            settled.sort_by(|x, y| x.0.as_str().cmp(y.0.as_str()));
            assert_eq!(
                settled,
                vec![
                    (NodeId::new("a"), TodoListId::new("done"), true),
                    (NodeId::new("b"), TodoListId::new("open"), false),
                ]
            );
            assert!(tracker.is_empty());
        });
    }

    #[test]
    fn cancelled_fetch_never_reports() {
        smol::block_on(async {
            let gateway = gateway();
            let mut tracker = CompletionTracker::new();
            tracker.watch(NodeId::new("a"), TodoListId::new("done"), &gateway);
            assert!(tracker.cancel(&NodeId::new("a")));
            assert!(tracker.settle().await.is_empty());
        });
    }

    #[test]
    fn same_list_is_not_refetched() {
        smol::block_on(async {
            let gateway = gateway();
            let mut tracker = CompletionTracker::new();
            tracker.watch(NodeId::new("a"), TodoListId::new("done"), &gateway);
            tracker.watch(NodeId::new("a"), TodoListId::new("done"), &gateway);
            tracker.settle().await;
            assert_eq!(gateway.backend().calls(Operation::TodoCompletion), 1);
        });
    }

    #[test]
    fn relinking_replaces_the_fetch() {
        smol::block_on(async {
            let gateway = gateway();
            let mut tracker = CompletionTracker::new();
            tracker.watch(NodeId::new("a"), TodoListId::new("done"), &gateway);
            tracker.watch(NodeId::new("a"), TodoListId::new("open"), &gateway);
            assert_eq!(tracker.len(), 1);
            let settled = tracker.settle().await;
            assert_eq!(settled, vec![(NodeId::new("a"), TodoListId::new("open"), false)]);
        });
    }
}
