use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use gaze_core::{
    AssetName, Bounds, Grid, DEFAULT_ASSET_ROOT, DEFAULT_PREFIX, DEFAULT_X_STEPS,
    DEFAULT_Y_STEPS, FPS,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

mod jobs;
mod registry;
mod video;

use registry::{PhotoEntry, PhotoRegistry};

#[derive(Parser, Debug)]
#[command(about = "Offline tooling for gaze-following portrait grids", version)]
struct Args {
    /// Photo registry file
    #[arg(long, value_name = "FILE", default_value = "photos.json", global = true)]
    registry: PathBuf,

    /// Directory holding the imported source portraits
    #[arg(long, value_name = "DIR", default_value = "photos", global = true)]
    photos_dir: PathBuf,

    /// Root directory of generated assets
    #[arg(long, value_name = "DIR", default_value = DEFAULT_ASSET_ROOT, global = true)]
    outputs: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the filenames of a pose grid
    Grid {
        #[arg(long, default_value_t = DEFAULT_X_STEPS)]
        width: u32,
        #[arg(long, default_value_t = DEFAULT_Y_STEPS)]
        height: u32,
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,
        /// Print samples as JSON instead of filenames
        #[arg(long)]
        json: bool,
    },
    /// Decode pose asset filenames
    Parse {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Emit generation jobs (JSON lines) for images not yet on disk
    Jobs {
        /// Registry key; defaults to the newest photo
        #[arg(long)]
        photo: Option<String>,
    },
    /// Concatenate a grid's images into its seekable video
    Video {
        #[arg(long)]
        photo: Option<String>,
        #[arg(long, default_value_t = FPS)]
        fps: f64,
    },
    /// Manage the photo registry
    Photos {
        #[command(subcommand)]
        command: PhotosCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PhotosCommand {
    List,
    /// Import a portrait (copied into the photos directory)
    Add {
        key: String,
        #[arg(long, value_name = "PATH")]
        source: PathBuf,
        #[arg(long, default_value_t = DEFAULT_X_STEPS)]
        x_steps: u32,
        #[arg(long, default_value_t = DEFAULT_Y_STEPS)]
        y_steps: u32,
        /// Asset prefix; defaults to the key
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Drop a photo and delete its imported copy and generated outputs
    Remove { key: String },
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Grid {
            width,
            height,
            prefix,
            json,
        } => {
            let grid = gaze_core::generate(width, height, &prefix)?;
            log::info!("[grid] {} {}x{}: {} samples", prefix, width, height, grid.len());
            if json {
                serde_json::to_writer_pretty(&mut out, grid.samples())?;
                writeln!(out)?;
            } else {
                for name in grid.filenames() {
                    writeln!(out, "{}", name)?;
                }
            }
        }
        Command::Parse { names } => {
            for name in &names {
                let parsed = AssetName::parse(name).with_context(|| format!("parsing {name}"))?;
                writeln!(
                    out,
                    "{}\tprefix={} index={} x={} y={} yaw={} pitch={} pupil_x={} pupil_y={}",
                    name,
                    parsed.prefix,
                    parsed.index,
                    parsed.x,
                    parsed.y,
                    parsed.pose.yaw,
                    parsed.pose.pitch,
                    parsed.pose.pupil_x,
                    parsed.pose.pupil_y
                )?;
            }
        }
        Command::Jobs { photo } => {
            let reg = PhotoRegistry::load(&args.registry)?;
            let entry = select(&reg, photo.as_deref())?;
            let grid = entry_grid(entry)?;
            let plan = jobs::plan_jobs(&grid, &entry.source, &args.outputs);
            log::info!(
                "[jobs] {}: {} to generate, {} already present",
                entry.key,
                plan.jobs.len(),
                plan.skipped
            );
            log::info!(
                "[jobs] estimated cost: ${:.2}",
                jobs::estimate_cost(plan.jobs.len())
            );
            for job in &plan.jobs {
                serde_json::to_writer(&mut out, job)?;
                writeln!(out)?;
            }
        }
        Command::Video { photo, fps } => {
            let reg = PhotoRegistry::load(&args.registry)?;
            let entry = select(&reg, photo.as_deref())?;
            let grid = entry_grid(entry)?;
            let path = video::build_video(&grid, &args.outputs, fps)?;
            writeln!(out, "{}", path.display())?;
        }
        Command::Photos { command } => photos(
            command,
            &args.registry,
            &args.photos_dir,
            &args.outputs,
            &mut out,
        )?,
    }
    Ok(())
}

fn photos(
    command: PhotosCommand,
    registry: &Path,
    photos_dir: &Path,
    outputs: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let mut reg = PhotoRegistry::load(registry)?;
    match command {
        PhotosCommand::List => {
            for (i, e) in reg.entries().iter().enumerate() {
                let marker = if i == 0 { "*" } else { " " };
                writeln!(
                    out,
                    "{} {}\t{}x{}\t{}\t{}",
                    marker,
                    e.key,
                    e.x_steps,
                    e.y_steps,
                    e.prefix,
                    e.source.display()
                )?;
            }
        }
        PhotosCommand::Add {
            key,
            source,
            x_steps,
            y_steps,
            prefix,
        } => {
            let prefix = prefix.unwrap_or_else(|| key.clone());
            let mut entry = PhotoEntry {
                key: key.clone(),
                source,
                prefix,
                x_steps,
                y_steps,
            };
            // validate before touching the photos directory
            entry.validate()?;
            entry.source = registry::import_source(&entry.source, photos_dir, &key)?;
            reg.add(entry)?;
            reg.save(registry)?;
            log::info!("[photos] added {} ({} photos)", key, reg.len());
        }
        PhotosCommand::Remove { key } => {
            let entry = reg
                .remove(&key)
                .ok_or_else(|| anyhow!("no photo {:?} in {}", key, registry.display()))?;
            registry::delete_photo_files(&entry, photos_dir, outputs)?;
            reg.save(registry)?;
            match reg.default_entry() {
                Some(next) => log::info!("[photos] removed {}, default is now {}", key, next.key),
                None => log::info!("[photos] removed {}, registry is empty", key),
            }
        }
    }
    Ok(())
}

fn select<'a>(reg: &'a PhotoRegistry, key: Option<&str>) -> Result<&'a PhotoEntry> {
    match key {
        Some(key) => reg.get(key).ok_or_else(|| anyhow!("no photo {:?}", key)),
        None => reg
            .default_entry()
            .ok_or_else(|| anyhow!("photo registry is empty")),
    }
}

fn entry_grid(entry: &PhotoEntry) -> Result<Grid> {
    Ok(Grid::new(entry.grid_spec()?, Bounds::default())?)
}
