//! Command and query execution against a [`MindMap`].

use crate::{Command, CommandResult, MindMap, Query, QueryResult};
use gateway::Gateway;
use node::ScreenPoint;

/// Execute a command against a map session.
pub async fn execute_command<G: Gateway + 'static>(map: &mut MindMap<G>, command: Command) -> CommandResult {
    match command {
        Command::AddChild {
            parent,
            label,
            description,
        } => {
            let result = match parent {
                Some(parent) => map.add_child(&parent, label, description).await,
                None => map.add_root(label).await,
            };
            match result {
                Ok(id) => CommandResult::created(vec![id]),
                Err(err) => CommandResult::error(err.to_string()),
            }
        }

        Command::UpdateNode { id, patch } => {
            if patch.is_empty() {
                return CommandResult::success();
            }
            if map.update_node(&id, patch) {
                CommandResult::modified(vec![id])
            } else {
                CommandResult::error(format!("No node {:?}", id.as_str()))
            }
        }

        Command::MoveNode { id, position } => {
            if map.move_node(&id, position) {
                CommandResult::modified(vec![id])
            } else {
                CommandResult::error(format!("No node {:?}", id.as_str()))
            }
        }

        Command::DeleteNode { id } => {
            map.delete_node(&id);
            CommandResult::deleted(vec![id])
        }

        Command::Select { id, add_to_selection } => {
            if !map.canvas().store().contains(&id) {
                return CommandResult::error(format!("No node {:?}", id.as_str()));
            }
            map.canvas_mut().select(id, add_to_selection);
            CommandResult::success()
        }

        Command::ClearSelection => {
            map.canvas_mut().clear_selection();
            CommandResult::success()
        }

        Command::Pan { delta } => {
            let canvas = map.canvas_mut();
            let transform = canvas.transform();
            canvas.set_transform(transform.with_offset(transform.offset() + delta));
            CommandResult::success()
        }

        Command::Zoom { factor, anchor } => {
            let canvas = map.canvas_mut();
            let anchor = anchor.unwrap_or_else(|| {
                let size = canvas.viewport.container_size().unwrap_or_default();
                ScreenPoint(size / 2.0)
            });
            canvas.zoom_at(anchor, factor);
            CommandResult::success()
        }

        Command::ResetView => {
            map.canvas_mut().reset_view();
            CommandResult::success()
        }

        Command::SetContainerSize { size } => {
            map.canvas_mut().set_container_size(size);
            CommandResult::success()
        }

        Command::MinimapClick { pixel } => {
            map.canvas_mut().minimap_click(pixel);
            CommandResult::success()
        }

        Command::Batch { commands } => {
            let mut all_created = Vec::new();
            let mut all_modified = Vec::new();
            let mut all_deleted = Vec::new();

            for cmd in commands {
                match Box::pin(execute_command(map, cmd)).await {
                    CommandResult::Success {
                        created,
                        modified,
                        deleted,
                    } => {
                        all_created.extend(created);
                        all_modified.extend(modified);
                        all_deleted.extend(deleted);
                    }
                    CommandResult::Error { message } => {
                        return CommandResult::error(format!("Batch failed: {}", message));
                    }
                }
            }

            CommandResult::Success {
                created: all_created,
                modified: all_modified,
                deleted: all_deleted,
            }
        }
    }
}

/// Execute a query against a map session.
pub fn execute_query<G: Gateway + 'static>(map: &MindMap<G>, query: Query) -> QueryResult {
    let canvas = map.canvas();
    let store = canvas.store();
    match query {
        Query::GetNodes => QueryResult::Nodes {
            nodes: store.unique_nodes(),
        },

        Query::GetNode { id } => QueryResult::Node {
            node: store.unique_nodes().into_iter().find(|n| n.id == id),
        },

        Query::GetEdges => QueryResult::Edges {
            edges: store.edges().to_vec(),
        },

        Query::GetChildren { id } => QueryResult::Nodes {
            nodes: store.children_of(&id).into_iter().cloned().collect(),
        },

        Query::GetTransform => QueryResult::Transform {
            transform: canvas.transform(),
        },

        Query::GetMinimap => QueryResult::Minimap {
            minimap: canvas.minimap_scene(),
        },

        Query::GetSelection => {
            let mut ids: Vec<_> = canvas.selection.iter().cloned().collect();
            ids.sort();
            QueryResult::Selection { ids }
        }

        Query::GetNodeCount => QueryResult::Count { count: store.len() },
    }
}
