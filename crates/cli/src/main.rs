//! mindmap - edit radial mind maps stored on disk from the command line.
//!
//! Maps live as JSON documents under the store directory. Every invocation
//! loads one map, applies a command or query and prints the result as JSON.

mod logger;
mod render;
mod settings;

use anyhow::{bail, Context, Result};
use api::{execute_command, execute_query, Command, CommandResult, MindMap, Query, SessionAlert};
use clap::{Parser, Subcommand};
use gateway::{FileGateway, SyncGateway, TodoItem};
use glam::Vec2;
use logger::MindmapLogger;
use node::{CanvasPoint, ContainerId, NodeId, NodePatch, TodoListId};
use serde::Serialize;
use settings::Settings;
use std::path::PathBuf;

const DEFAULT_ROOT_LABEL: &str = "Central idea";

/// mindmap - radial mind maps from the command line
#[derive(Parser)]
#[command(name = "mindmap")]
#[command(about = "Create and edit radial mind maps")]
struct Cli {
    /// Directory holding map documents (default: ~/.mindmap/maps)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Name of the map to open
    #[arg(long, global = true, default_value = "default")]
    map: String,

    /// Settings file (default: ~/.mindmap/config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the map, with a root node if it is empty
    Init {
        /// Label of the root node
        label: Option<String>,
    },

    /// Print every node
    List,

    /// Add a node next to its siblings (under the root by default)
    Add {
        label: String,
        #[arg(short, long)]
        parent: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Change a node's label
    Rename { id: String, label: String },

    /// Move a node to canvas coordinates
    Move {
        id: String,
        #[arg(allow_negative_numbers = true)]
        x: f32,
        #[arg(allow_negative_numbers = true)]
        y: f32,
    },

    /// Delete a node (its children are kept)
    Delete { id: String },

    /// Store a todo list: open items as arguments, finished ones with --done
    Todo {
        list: String,
        items: Vec<String>,
        #[arg(long)]
        done: Vec<String>,
    },

    /// Link a node to a todo list, so it shows the list's completion
    Link { id: String, list: String },

    /// Run a JSON command
    Exec {
        /// e.g. {"type": "add_child", "parent": "...", "label": "Idea"}
        json: String,
    },

    /// Run a JSON query
    Query {
        /// e.g. {"type": "get_children", "id": "..."}
        json: String,
    },

    /// Draw the map to an SVG file
    Render {
        #[arg(long, default_value_t = 1200.0)]
        width: f32,
        #[arg(long, default_value_t = 800.0)]
        height: f32,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match MindmapLogger::init(settings.level_filter(cli.verbose)) {
        Ok(()) if cli.verbose > 0 => {
            if let Some(path) = logger::current_log_path() {
                eprintln!("logging to {}", path.display());
            }
        }
        Ok(()) => {}
        Err(err) => eprintln!("warning: file logging disabled: {err:#}"),
    }

    smol::block_on(run(cli, settings))
}

async fn run(cli: Cli, settings: Settings) -> Result<()> {
    let mut map = open(&cli, &settings).await?;

    match cli.command {
        Commands::Init { label } => init(&mut map, label).await,
        Commands::List => print_json(&execute_query(&map, Query::GetNodes)),
        Commands::Add {
            label,
            parent,
            description,
        } => {
            let parent = match parent {
                Some(id) => NodeId::new(id),
                None => match map.canvas().store().nodes().iter().find(|n| n.is_root()) {
                    Some(root) => root.id.clone(),
                    None => bail!("Map {:?} has no root; run `mindmap init` or pass --parent", cli.map),
                },
            };
            let command = Command::AddChild {
                parent: Some(parent),
                label,
                description,
            };
            run_command(&mut map, command).await
        }
        Commands::Rename { id, label } => {
            let command = Command::UpdateNode {
                id: NodeId::new(id),
                patch: NodePatch::label(label),
            };
            run_command(&mut map, command).await
        }
        Commands::Move { id, x, y } => {
            let command = Command::MoveNode {
                id: NodeId::new(id),
                position: CanvasPoint::new(x, y),
            };
            run_command(&mut map, command).await
        }
        Commands::Delete { id } => run_command(&mut map, Command::DeleteNode { id: NodeId::new(id) }).await,
        Commands::Todo { list, items, done } => {
            let items: Vec<TodoItem> = items
                .into_iter()
                .map(|title| TodoItem { title, done: false })
                .chain(done.into_iter().map(|title| TodoItem { title, done: true }))
                .collect();
            let count = items.len();
            map.gateway()
                .backend()
                .put_todo_list(TodoListId::new(list.as_str()), items)
                .await
                .with_context(|| format!("Failed to store todo list {list}"))?;
            println!("Stored todo list {list} with {count} items");
            Ok(())
        }
        Commands::Link { id, list } => {
            let command = Command::UpdateNode {
                id: NodeId::new(id),
                patch: NodePatch {
                    todo_list_id: Some(TodoListId::new(list)),
                    ..Default::default()
                },
            };
            run_command(&mut map, command).await
        }
        Commands::Exec { json } => {
            let command: Command = serde_json::from_str(&json).context("Failed to parse command JSON")?;
            run_command(&mut map, command).await
        }
        Commands::Query { json } => {
            let query: Query = serde_json::from_str(&json).context("Failed to parse query JSON")?;
            print_json(&execute_query(&map, query))
        }
        Commands::Render { width, height, output } => {
            map.canvas_mut().set_container_size(Vec2::new(width, height));
            let svg = render::render_svg(map.canvas(), width, height);
            std::fs::write(&output, svg).with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Wrote {}", output.display());
            Ok(())
        }
    }
}

async fn open(cli: &Cli, settings: &Settings) -> Result<MindMap<FileGateway>> {
    let store = match &cli.store {
        Some(path) => path.clone(),
        None => dirs::home_dir()
            .context("Could not find home directory")?
            .join(".mindmap")
            .join("maps"),
    };
    log::debug!("opening map {} in {}", cli.map, store.display());

    let gateway = SyncGateway::new(FileGateway::new(store));
    let mut map = MindMap::new(gateway, ContainerId::new(cli.map.as_str()))
        .with_layout(settings.layout.clone())
        .with_minimap(settings.minimap.clone());
    map.canvas_mut().style = settings.style.clone();

    map.load().await;
    map.settle_completion().await;
    Ok(map)
}

async fn init(map: &mut MindMap<FileGateway>, label: Option<String>) -> Result<()> {
    map.ensure_container()
        .await
        .with_context(|| format!("Failed to create map {}", map.container()))?;

    if !map.canvas().store().nodes().iter().any(|n| n.is_root()) {
        let label = label.unwrap_or_else(|| DEFAULT_ROOT_LABEL.to_string());
        run_command(
            map,
            Command::AddChild {
                parent: None,
                label,
                description: None,
            },
        )
        .await
    } else {
        println!("Map {} already has a root ({} nodes)", map.container(), map.canvas().store().len());
        Ok(())
    }
}

async fn run_command(map: &mut MindMap<FileGateway>, command: Command) -> Result<()> {
    let result = execute_command(map, command).await;
    map.flush().await;
    let alerts = map.take_alerts();
    for alert in &alerts {
        match alert {
            SessionAlert::DeleteFailed { id, message } => {
                eprintln!("warning: {id} was removed here but is still stored: {message}");
            }
        }
    }
    print_json(&result)?;
    if let CommandResult::Error { message } = result {
        bail!(message);
    }
    if !alerts.is_empty() {
        bail!("{} change(s) could not be saved", alerts.len());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
