use crate::NodeId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of temporary node identities used before the backend confirms a create.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> NodeId;
}

/// Random v4 UUIDs (OS CSPRNG via `uuid`).
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> NodeId {
        NodeId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Deterministic `tmp-1`, `tmp-2`, ... ids for tests and scripted sessions.
#[derive(Debug, Default)]
pub struct SequentialIds {
    prefix: Option<String>,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            next: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> NodeId {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        let prefix = self.prefix.as_deref().unwrap_or("tmp");
        NodeId::new(format!("{prefix}-{n}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_are_unique_and_parseable() {
        let ids = UuidGenerator;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_id().as_str(), "tmp-1");
        assert_eq!(ids.next_id().as_str(), "tmp-2");

        let ids = SequentialIds::with_prefix("draft");
        assert_eq!(ids.next_id().as_str(), "draft-1");
    }
}
