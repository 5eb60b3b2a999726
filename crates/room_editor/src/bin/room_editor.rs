//! Command line front end for room editor projects
//!
//! Usage:
//!   room_editor new castle.json --width 16 --height 12
//!   room_editor add-tile castle.json wall
//!   room_editor info castle.json
//!   room_editor export castle.json map.json

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use room_editor::{EditorPreferences, Project};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "room_editor")]
#[command(about = "Create, inspect and export tile room projects")]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Without a command, summarize the last project when preferences allow it
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project holding one empty room
    New {
        path: PathBuf,
        /// Room width in cells (defaults to the preferences)
        #[arg(long)]
        width: Option<u32>,
        /// Room height in cells (defaults to the preferences)
        #[arg(long)]
        height: Option<u32>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print tiles, brushes, rooms and templates
    Info { path: PathBuf },
    /// Write the map data read by the game
    Export { path: PathBuf, out: PathBuf },
    /// Register a tile in the project catalog
    AddTile {
        path: PathBuf,
        name: String,
        #[arg(long, default_value_t = 1)]
        width: u32,
        #[arg(long, default_value_t = 1)]
        height: u32,
        /// Image shown for the tile in editors
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a tile that nothing uses any more
    RemoveTile { path: PathBuf, name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let mut prefs = EditorPreferences::load();

    let Some(command) = cli.command else {
        return match prefs.last_project() {
            Some(path) => info(&prefs, &path),
            None => {
                println!("No command given. Run with --help for usage.");
                Ok(())
            }
        };
    };

    match command {
        Commands::New {
            path,
            width,
            height,
            force,
        } => new_project(&mut prefs, &path, width, height, force),
        Commands::Info { path } => info(&prefs, &path),
        Commands::Export { path, out } => {
            let project = open(&prefs, &path)?;
            project
                .export_map(&out)
                .with_context(|| format!("Failed to export to {}", out.display()))
        }
        Commands::AddTile {
            path,
            name,
            width,
            height,
            image,
        } => {
            let mut project = open(&prefs, &path)?;
            let id = project
                .context
                .register_tile(name.as_str(), (width, height), image)?;
            project.mark_dirty();
            project.save_current()?;
            println!("Added tile '{}' with id {}", name, id);
            Ok(())
        }
        Commands::RemoveTile { path, name } => {
            let mut project = open(&prefs, &path)?;
            let id = project
                .context
                .catalog
                .by_name(&name)
                .map(|t| t.id)
                .with_context(|| format!("No tile named '{}'", name))?;
            project.context.remove_tile(id)?;
            project.mark_dirty();
            project.save_current()?;
            println!("Removed tile '{}'", name);
            Ok(())
        }
    }
}

fn open(prefs: &EditorPreferences, path: &Path) -> Result<Project> {
    Project::load_with_capacity(path, prefs.snapshot_capacity)
        .with_context(|| format!("Failed to open {}", path.display()))
}

fn new_project(
    prefs: &mut EditorPreferences,
    path: &Path,
    width: Option<u32>,
    height: Option<u32>,
    force: bool,
) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let size = (
        width.unwrap_or(prefs.default_room_size.0),
        height.unwrap_or(prefs.default_room_size.1),
    );
    let mut project = Project::new(prefs.snapshot_capacity, prefs.palette_size);
    project.context.rooms.create_room((0, 0), size)?;
    project.save(path)?;

    prefs.add_recent_project(path.to_path_buf(), project.name().to_string());
    if let Err(e) = prefs.save() {
        tracing::warn!("Could not save preferences: {}", e);
    }

    println!("Created {} with a {}x{} room", path.display(), size.0, size.1);
    Ok(())
}

fn info(prefs: &EditorPreferences, path: &Path) -> Result<()> {
    let project = open(prefs, path)?;
    let context = &project.context;

    println!("{} (version {})", project.name(), project.version);

    println!("Tiles: {}", context.catalog.len());
    for tile in context.catalog.iter() {
        let pinned = match context.tile_dependent(tile.id) {
            Some(by) => format!(" [used by {}]", by),
            None => String::new(),
        };
        println!(
            "  {:>4} {} {}x{}{}",
            tile.id, tile.name, tile.footprint.0, tile.footprint.1, pinned
        );
    }

    println!("Brush groups: {}", context.brushes.groups().len());
    for group in context.brushes.groups() {
        println!("  {} ({} brushes)", group.name, group.brushes.len());
    }

    println!("Rooms: {}", context.rooms.len());
    for room in context.rooms.rooms() {
        let layers: Vec<&str> = room.layers().iter().map(|l| l.name()).collect();
        println!(
            "  {} at {:?} size {}x{} layers [{}]",
            room.name(),
            room.origin(),
            room.size().0,
            room.size().1,
            layers.join(", ")
        );
    }

    for group in context.templates.groups() {
        println!("Templates in '{}': {}", group.name, group.templates.len());
    }
    Ok(())
}
