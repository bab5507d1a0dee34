use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use termfuse::anim::registry::{Entry, Registry, RegistryOptions};
use termfuse::driver::AnimationDriver;
use termfuse::frame::Frame;
use termfuse::help::{render_help_overlay, KEY_HELP};
use termfuse::input::{map_key, Action};
use termfuse::presets::PresetStore;
use termfuse::settings::{Settings, MAX_FPS, MIN_FPS};
use termfuse::terminal::Terminal;
use termfuse::viz::mandelbrot::DeepZoomPolicy;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "termfuse")]
#[command(author = "termfuse contributors")]
#[command(version)]
#[command(about = "Terminal parametric animations that modulate each other", long_about = None)]
struct Cli {
    /// Entry to start with (see --list)
    #[arg(short, long)]
    entry: Option<String>,

    /// Frames per second (10-120)
    #[arg(short, long)]
    fps: Option<u32>,

    /// Random seed for the stochastic generators
    #[arg(short, long)]
    seed: Option<u64>,

    /// List the available entries and exit
    #[arg(short, long)]
    list: bool,

    /// Print the list as JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// Render headlessly and print the last frame to stdout
    #[arg(short, long)]
    print: bool,

    /// Frames to simulate in print mode
    #[arg(long, default_value = "60")]
    frames: u32,

    /// Print mode width
    #[arg(long, default_value = "80")]
    width: usize,

    /// Print mode height
    #[arg(long, default_value = "24")]
    height: usize,

    /// Settings file (default: the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append logs to this file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(path: Option<&Path>, level: &str) -> Result<()> {
    // stdout belongs to the alternate screen, so only log to a file
    let Some(path) = path else {
        return Ok(());
    };

    let level: LevelFilter = level
        .parse()
        .with_context(|| format!("invalid log level '{level}'"))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

fn registry_options(settings: &Settings, seed: Option<u64>) -> RegistryOptions {
    let deep_zoom = settings.mandelbrot.deep_zoom.then(|| DeepZoomPolicy {
        zoom_threshold: settings.mandelbrot.zoom_threshold,
        ..DeepZoomPolicy::default()
    });

    RegistryOptions {
        seed: seed.or(settings.seed),
        deep_zoom,
        composite_strength: settings.composite.strength,
        composite_mapping: settings.composite.mapping,
    }
}

fn list_entries(registry: &Registry, json: bool) -> Result<()> {
    if json {
        let entries: Vec<_> = (0..registry.len())
            .map(|i| {
                let kind = match registry.entry(i) {
                    Some(Entry::Fused(_)) => "fusion",
                    _ => "generator",
                };
                serde_json::json!({
                    "id": registry.entry_id(i),
                    "title": registry.entry_title(i),
                    "kind": kind,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for i in 0..registry.len() {
            println!("{:<18} {}", registry.entry_id(i), registry.entry_title(i));
        }
    }
    Ok(())
}

fn print_frames(driver: &mut AnimationDriver, frames: u32, width: usize, height: usize, fps: u32) {
    let mut frame = Frame::new(width.max(1), height.max(1));
    let dt = 1.0 / fps as f64;
    for _ in 0..frames.max(1) {
        driver.tick(dt, &mut frame);
    }
    print!("{}", frame.to_ansi_string());
}

fn run_interactive(driver: &mut AnimationDriver, presets: &mut PresetStore, fps: u32) -> Result<()> {
    let mut term = Terminal::new().context("failed to initialise the terminal")?;
    let (width, height) = term.size();
    let mut frame = Frame::new(width as usize, height as usize);
    let frame_time = Duration::from_secs_f64(1.0 / fps as f64);
    let mut show_help = false;
    let mut last = Instant::now();

    loop {
        if term.refresh_size()? {
            let (width, height) = term.size();
            frame.resize(width as usize, height as usize);
        }

        while let Some((code, modifiers)) = term.check_key()? {
            match map_key(code, modifiers) {
                Some(Action::Quit) => return Ok(()),
                Some(Action::Event(event)) => driver.handle(event),
                Some(Action::SavePreset(slot)) => {
                    if let Err(err) = presets.store(slot, driver.snapshot()) {
                        warn!(%err, slot, "could not save preset");
                    }
                }
                Some(Action::LoadPreset(slot)) => match presets.get(slot) {
                    Ok(snapshot) => {
                        driver.restore(snapshot);
                        info!(slot, "loaded preset");
                    }
                    Err(err) => warn!(%err, "could not load preset"),
                },
                Some(Action::ToggleHelp) => show_help = !show_help,
                None => {}
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        driver.tick(dt, &mut frame);
        if show_help {
            render_help_overlay(&mut frame, KEY_HELP);
        }
        term.present(&frame)?;

        let elapsed = now.elapsed();
        if elapsed < frame_time {
            term.sleep(frame_time - elapsed);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::load(),
    };

    let log_file = cli.log.clone().or_else(|| settings.log_file.clone());
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| settings.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    init_logging(log_file.as_deref(), &log_level)?;

    let registry = Registry::standard(&registry_options(&settings, cli.seed))
        .context("failed to build the animation registry")?;

    if cli.list {
        return list_entries(&registry, cli.json);
    }

    let fps = cli.fps.unwrap_or(settings.fps()).clamp(MIN_FPS, MAX_FPS);
    let mut driver = AnimationDriver::new(registry);
    if let Some(start) = cli.entry.as_deref().or(settings.start.as_deref()) {
        driver
            .select_id(start)
            .with_context(|| "use --list to see the available entries")?;
    }

    if cli.print {
        print_frames(&mut driver, cli.frames, cli.width, cli.height, fps);
        return Ok(());
    }

    let mut presets = PresetStore::open_or_empty(settings.presets_path());
    info!(entry = driver.active_id(), fps, presets = %presets.path().display(), "starting");
    run_interactive(&mut driver, &mut presets, fps)
}
