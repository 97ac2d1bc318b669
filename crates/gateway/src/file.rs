use crate::{CreateNode, Gateway, GatewayError, NodeRecord};
use async_trait::async_trait;
use node::{ContainerId, NodeId, NodePatch, TodoListId};
use serde::{Deserialize, Serialize};
use smol::lock::Mutex;
use smol::stream::StreamExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Version of the map document format
pub const MAP_FORMAT_VERSION: u32 = 1;

const TODO_LISTS_FILE: &str = "todo_lists.json";

/// One map on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapDocument {
    version: u32,
    container: ContainerId,
    modified_at: Option<String>,
    #[serde(default)]
    nodes: Vec<NodeRecord>,
}

impl MapDocument {
    fn new(container: ContainerId) -> Self {
        Self {
            version: MAP_FORMAT_VERSION,
            container,
            modified_at: Some(chrono::Utc::now().to_rfc3339()),
            nodes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

/// Stores each map as `{root}/{container}.json`.
///
/// Todo lists live in a shared `todo_lists.json` next to the maps.
/// A single lock serializes read-modify-write cycles within the process.
pub struct FileGateway {
    root: PathBuf,
    lock: Mutex<()>,
}

impl FileGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, container: &ContainerId) -> Result<PathBuf, GatewayError> {
        let name = container.as_str();
        let valid = !name.is_empty()
            && name != TODO_LISTS_FILE.trim_end_matches(".json")
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(GatewayError::Rejected(format!("invalid map name {name:?}")));
        }
        Ok(self.root.join(format!("{name}.json")))
    }

    async fn load(path: &Path) -> Result<MapDocument, GatewayError> {
        let contents = smol::fs::read_to_string(path).await?;
        let document: MapDocument = serde_json::from_str(&contents)?;
        if document.version > MAP_FORMAT_VERSION {
            return Err(GatewayError::Rejected(format!(
                "map file version {} is newer than supported version {}",
                document.version, MAP_FORMAT_VERSION
            )));
        }
        Ok(document)
    }

    async fn save(path: &Path, document: &mut MapDocument) -> Result<(), GatewayError> {
        document.modified_at = Some(chrono::Utc::now().to_rfc3339());
        let json = serde_json::to_string_pretty(document)?;
        let staging = path.with_extension("json.tmp");
        smol::fs::write(&staging, json).await?;
        smol::fs::rename(&staging, path).await?;
        Ok(())
    }

    /// Find the map holding `id`. A store directory that doesn't exist yet holds nothing.
    async fn locate(&self, id: &NodeId) -> Result<Option<(PathBuf, MapDocument)>, GatewayError> {
        let mut entries = match smol::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.try_next().await? {
            let path = entry.path();
            let is_map = path.extension().is_some_and(|ext| ext == "json")
                && path.file_name().is_some_and(|name| name != TODO_LISTS_FILE);
            if !is_map {
                continue;
            }
            let document = match Self::load(&path).await {
                Ok(document) => document,
                Err(err) => {
                    log::warn!("skipping unreadable map {}: {err}", path.display());
                    continue;
                }
            };
            if document.nodes.iter().any(|record| &record.id == id) {
                return Ok(Some((path, document)));
            }
        }
        Ok(None)
    }

    async fn todo_lists(&self) -> Result<HashMap<TodoListId, Vec<TodoItem>>, GatewayError> {
        let path = self.root.join(TODO_LISTS_FILE);
        if !smol::fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            return Ok(HashMap::new());
        }
        let contents = smol::fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Create or replace a todo list.
    pub async fn put_todo_list(&self, list: TodoListId, items: Vec<TodoItem>) -> Result<(), GatewayError> {
        let _guard = self.lock.lock().await;
        smol::fs::create_dir_all(&self.root).await?;
        let mut lists = self.todo_lists().await?;
        log::debug!("storing todo list {list} with {} items", items.len());
        lists.insert(list, items);
        let json = serde_json::to_string_pretty(&lists)?;
        smol::fs::write(self.root.join(TODO_LISTS_FILE), json).await?;
        Ok(())
    }
}

#[async_trait]
impl Gateway for FileGateway {
    async fn create_container(&self, container: &ContainerId) -> Result<(), GatewayError> {
        let path = self.document_path(container)?;
        let _guard = self.lock.lock().await;
        smol::fs::create_dir_all(&self.root).await?;
        if smol::fs::metadata(&path).await.is_ok() {
            return Ok(());
        }
        log::info!("creating map {} at {}", container, path.display());
        Self::save(&path, &mut MapDocument::new(container.clone())).await
    }

    async fn create_node(&self, request: &CreateNode) -> Result<NodeId, GatewayError> {
        let path = self.document_path(&request.container_id)?;
        let _guard = self.lock.lock().await;
        if smol::fs::metadata(&path).await.is_err() {
            return Err(GatewayError::MissingContainer(request.container_id.clone()));
        }
        let mut document = Self::load(&path).await?;
        let id = NodeId::new(uuid::Uuid::new_v4().to_string());
        document.nodes.push(request.clone().into_record(id.clone()));
        Self::save(&path, &mut document).await?;
        log::debug!("created node {} in {}", id.short(), request.container_id);
        Ok(id)
    }

    async fn update_node(&self, id: &NodeId, patch: &NodePatch) -> Result<(), GatewayError> {
        let _guard = self.lock.lock().await;
        let (path, mut document) = self
            .locate(id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(format!("node {id}")))?;
        for record in document.nodes.iter_mut().filter(|record| &record.id == id) {
            record.apply(patch);
        }
        Self::save(&path, &mut document).await
    }

    async fn delete_node(&self, id: &NodeId) -> Result<(), GatewayError> {
        let _guard = self.lock.lock().await;
        let (path, mut document) = self
            .locate(id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(format!("node {id}")))?;
        document.nodes.retain(|record| &record.id != id);
        Self::save(&path, &mut document).await
    }

    async fn list_nodes(&self, container: &ContainerId) -> Result<Vec<NodeRecord>, GatewayError> {
        let path = self.document_path(container)?;
        if smol::fs::metadata(&path).await.is_err() {
            return Err(GatewayError::MissingContainer(container.clone()));
        }
        Ok(Self::load(&path).await?.nodes)
    }

    async fn todo_completion(&self, list: &TodoListId) -> Result<bool, GatewayError> {
        let lists = self.todo_lists().await?;
        let items = lists
            .get(list)
            .ok_or_else(|| GatewayError::NotFound(format!("todo list {list}")))?;
        Ok(!items.is_empty() && items.iter().all(|item| item.done))
    }
}
