//! Background persistence of updates and deletes.
//!
//! Writes are queued without blocking the session and applied by a single
//! worker task in submission order, so a later edit of a node always lands
//! after an earlier one.

use crate::SessionAlert;
use gateway::{Gateway, SyncGateway};
use node::{NodeId, NodePatch};
use smol::channel::{unbounded, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

enum Write {
    Update(NodeId, NodePatch),
    Delete(NodeId),
    Flush(Sender<()>),
}

/// Alerts raised by background writes, drained by the session owner.
pub(crate) type AlertQueue = Arc<Mutex<Vec<SessionAlert>>>;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ordered write-behind queue. Dropping it cancels writes not yet applied.
pub(crate) struct WriteQueue {
    sender: Sender<Write>,
    _worker: smol::Task<()>,
}

impl WriteQueue {
    pub(crate) fn spawn<G: Gateway + 'static>(gateway: SyncGateway<G>, alerts: AlertQueue) -> Self {
        let (sender, receiver) = unbounded();
        let worker = smol::spawn(async move {
            while let Ok(write) = receiver.recv().await {
                match write {
                    Write::Update(id, patch) => gateway.update(&id, &patch).await,
                    Write::Delete(id) => {
                        if let Err(err) = gateway.delete(&id).await {
                            lock(&alerts).push(SessionAlert::DeleteFailed {
                                id,
                                message: err.to_string(),
                            });
                        }
                    }
                    Write::Flush(done) => {
                        let _ = done.send(()).await;
                    }
                }
            }
        });
        Self {
            sender,
            _worker: worker,
        }
    }

    fn push(&self, write: Write) {
        if self.sender.try_send(write).is_err() {
            log::error!("write queue closed, change not persisted");
        }
    }

    pub(crate) fn update(&self, id: NodeId, patch: NodePatch) {
        log::trace!("queueing update of {}", id.short());
        self.push(Write::Update(id, patch));
    }

    pub(crate) fn delete(&self, id: NodeId) {
        log::trace!("queueing delete of {}", id.short());
        self.push(Write::Delete(id));
    }

    /// Wait until every write queued so far has been applied.
    pub(crate) async fn flush(&self) {
        let (done, wait) = unbounded();
        self.push(Write::Flush(done));
        let _ = wait.recv().await;
    }
}
