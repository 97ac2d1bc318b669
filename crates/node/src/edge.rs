use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Id of the connector derived from a parent link.
    pub fn between(from: &NodeId, to: &NodeId) -> Self {
        Self(format!("{from}->{to}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

/// Directed parent -> child connector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            id: EdgeId::between(&from, &to),
            from,
            to,
        }
    }

    pub fn touches(&self, id: &NodeId) -> bool {
        &self.from == id || &self.to == id
    }

    pub fn connects(&self, from: &NodeId, to: &NodeId) -> bool {
        &self.from == from && &self.to == to
    }

    /// Rewrite any endpoint equal to `old`, keeping the derived id in step.
    pub fn rename_endpoint(&mut self, old: &NodeId, new: &NodeId) -> bool {
        let mut changed = false;
        if &self.from == old {
            self.from = new.clone();
            changed = true;
        }
        if &self.to == old {
            self.to = new.clone();
            changed = true;
        }
        if changed {
            self.id = EdgeId::between(&self.from, &self.to);
        }
        changed
    }
}
