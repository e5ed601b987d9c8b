//! Command-line interface for SnapTile
//!
//! Exposes the geometry engine for inspection (`diff`, `free-space`,
//! `tile-rect`), replays recorded window scenarios against the in-memory
//! windowing provider and manages the settings file.

use crate::config::{SettingsStore, SettingsValidator, TilingSettings, ValidationSeverity};
use crate::models::rectangle::{rect_diff, Point, Rect, SplitPreference};
use crate::models::side::Side;
use crate::models::window::{WindowId, WindowSnapshot};
use crate::platform::display::MonitorInfo;
use crate::platform::windowing::{InMemoryWindowingProvider, WindowingProvider};
use crate::services::{
    tile_rect_for_side, FreeSpaceComputer, TileCoordinator, TilingEvent, TilingService,
    WindowLayout,
};
use crate::{trace_performance, Result, SnapTileError};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// SnapTile command-line interface
#[derive(Parser)]
#[command(name = "snaptile")]
#[command(about = "Snap-tiling layout engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct SnapTileCli {
    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Settings file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable JSON output for machine-readable results
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Subtract one rectangle from another
    Diff {
        /// Minuend as x,y,width,height
        a: Rect,
        /// Subtrahend as x,y,width,height
        b: Rect,
        #[command(flatten)]
        geometry: GeometryArgs,
    },

    /// Free rectangles of a work area next to a set of tiles
    FreeSpace {
        /// Work area as x,y,width,height
        #[arg(short, long)]
        work_area: Rect,
        /// Tiled rectangle (repeatable)
        #[arg(short, long = "tile")]
        tiles: Vec<Rect>,
        #[command(flatten)]
        geometry: GeometryArgs,
    },

    /// Target rectangle for tiling against a side
    TileRect {
        /// left, right, top, bottom, top-left, top-right, bottom-left, bottom-right
        side: Side,
        /// Work area as x,y,width,height
        #[arg(short, long)]
        work_area: Rect,
        /// Tiled rectangle (repeatable)
        #[arg(short, long = "tile")]
        tiles: Vec<Rect>,
        #[command(flatten)]
        geometry: GeometryArgs,
    },

    /// Replay a JSON window scenario and print the resulting layout
    Replay {
        /// Scenario file
        scenario: PathBuf,
    },

    /// Settings management commands
    Config(ConfigCommands),
}

/// Overrides for the loaded settings
#[derive(Args, Debug, Clone, Default)]
pub struct GeometryArgs {
    /// Gap between tiled windows in pixels
    #[arg(long)]
    pub gap: Option<i32>,

    /// Free slabs this thin or thinner are dropped
    #[arg(long)]
    pub ignore_margin: Option<i32>,

    /// auto, vertical or horizontal
    #[arg(long)]
    pub split: Option<SplitPreference>,
}

impl GeometryArgs {
    fn apply(&self, mut settings: TilingSettings) -> TilingSettings {
        if let Some(gap) = self.gap {
            settings.window_gap = gap;
        }
        if let Some(ignore_margin) = self.ignore_margin {
            settings.ignore_margin = ignore_margin;
        }
        if let Some(split) = self.split {
            settings.split_preference = split;
        }
        settings
    }
}

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub action: ConfigActions,
}

#[derive(Subcommand)]
pub enum ConfigActions {
    /// Show current settings
    Show,

    /// Write a default settings file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate settings
    Validate {
        /// Settings file path (defaults to the active one)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Recorded session for `replay`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub settings: Option<TilingSettings>,
    pub monitors: Vec<MonitorInfo>,
    /// Initial windows, topmost first
    #[serde(default)]
    pub windows: Vec<WindowSnapshot>,
    #[serde(default)]
    pub launchable_apps: Vec<String>,
    #[serde(default)]
    pub pointer: Point,
    #[serde(default)]
    pub current_monitor: usize,
    pub steps: Vec<ScenarioStep>,
}

/// One scenario step: an engine event or something the user or the
/// windowing platform did
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioStep {
    Event(TilingEvent),
    Platform(PlatformAction),
}

/// Changes applied to the in-memory provider; each one is followed by the
/// notification the platform would send
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum PlatformAction {
    /// A new window appears on top
    CreateWindow { window: WindowSnapshot },
    /// A window is painted for the first time
    Paint { window_id: WindowId },
    /// A window is raised and focused
    Focus { window_id: WindowId },
    /// A window is closed
    Close { window_id: WindowId },
    /// The user drags the grabbed edge of a window
    Drag { window_id: WindowId, frame: Rect },
    /// The pointer moves
    Pointer { x: i32, y: i32 },
}

/// Outcome of a replay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub steps: usize,
    pub failed_steps: Vec<usize>,
    pub layout: Vec<WindowLayout>,
}

/// Replay `scenario` and report the final layout
///
/// Failing steps are logged and recorded; the replay continues.
pub fn replay_scenario(scenario: Scenario, fallback_settings: TilingSettings) -> Result<ReplayReport> {
    for monitor in &scenario.monitors {
        monitor.validate()?;
    }

    let provider = Arc::new(InMemoryWindowingProvider::new_with(
        scenario.monitors,
        scenario.windows,
    ));
    for app_id in scenario.launchable_apps {
        provider.add_launchable_app(app_id);
    }
    provider.set_pointer(scenario.pointer);
    provider.set_current_monitor(scenario.current_monitor);

    let settings = scenario.settings.unwrap_or(fallback_settings);
    let coordinator = TileCoordinator::new(provider.clone(), settings);
    let mut service = TilingService::new(coordinator);

    let steps = scenario.steps.len();
    let mut failed_steps = Vec::new();
    for (index, step) in scenario.steps.into_iter().enumerate() {
        if let Err(e) = apply_step(&provider, &mut service, step) {
            warn!("Scenario step {} failed: {}", index, e);
            failed_steps.push(index);
        }
    }

    Ok(ReplayReport {
        steps,
        failed_steps,
        layout: service.coordinator().layout()?,
    })
}

fn apply_step(
    provider: &InMemoryWindowingProvider,
    service: &mut TilingService,
    step: ScenarioStep,
) -> Result<()> {
    let event = match step {
        ScenarioStep::Event(event) => event,
        ScenarioStep::Platform(action) => match action {
            PlatformAction::CreateWindow { window } => {
                let window_id = window.window_id;
                provider.insert_window(window);
                TilingEvent::WindowCreated { window_id }
            }
            PlatformAction::Paint { window_id } => {
                provider.mark_first_frame(window_id)?;
                TilingEvent::FirstFrame { window_id }
            }
            PlatformAction::Focus { window_id } => {
                provider.raise(window_id)?;
                TilingEvent::Focused { window_id }
            }
            PlatformAction::Close { window_id } => {
                provider
                    .remove_window(window_id)
                    .ok_or(SnapTileError::WindowNotFound(window_id))?;
                TilingEvent::Unmanaging { window_id }
            }
            PlatformAction::Drag { window_id, frame } => {
                provider.set_frame_directly(window_id, frame)?;
                TilingEvent::ResizeTick { window_id }
            }
            PlatformAction::Pointer { x, y } => {
                provider.set_pointer(Point::new(x, y));
                return Ok(());
            }
        },
    };

    service.handle(event)
}

/// CLI command executor
pub struct SnapTileCliExecutor {
    settings_store: SettingsStore,
    json_output: bool,
}

impl SnapTileCliExecutor {
    pub fn new(settings_store: SettingsStore, json_output: bool) -> Self {
        Self {
            settings_store,
            json_output,
        }
    }

    /// Execute a CLI command
    pub async fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Diff { a, b, geometry } => {
                let settings = geometry.apply(self.load_settings()?);
                let rects = trace_performance!("rect_diff", {
                    rect_diff(
                        Some(&a),
                        Some(&b),
                        settings.ignore_margin,
                        settings.split_policy(a),
                    )
                });
                self.print_rects(&rects)
            }
            Commands::FreeSpace {
                work_area,
                tiles,
                geometry,
            } => {
                let settings = geometry.apply(self.load_settings()?);
                let rects = trace_performance!("free_space", {
                    FreeSpaceComputer::from_settings(&settings, work_area)
                        .free_rects_around(&tiles, work_area)
                });
                self.print_rects(&rects)
            }
            Commands::TileRect {
                side,
                work_area,
                tiles,
                geometry,
            } => {
                let settings = geometry.apply(self.load_settings()?);
                let rect = trace_performance!("tile_rect", {
                    let partition = FreeSpaceComputer::from_settings(&settings, work_area)
                        .screen_partition(&tiles, work_area);
                    tile_rect_for_side(side, work_area, &partition, settings.window_gap)
                });
                self.print_rects(&[rect])
            }
            Commands::Replay { scenario } => self.execute_replay(&scenario).await,
            Commands::Config(config_cmd) => self.execute_config_command(config_cmd).await,
        }
    }

    async fn execute_replay(&self, path: &Path) -> Result<()> {
        info!("Replaying scenario {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let scenario: Scenario = serde_json::from_str(&content)?;

        let fallback = self.load_settings()?;
        let report = trace_performance!("replay", { replay_scenario(scenario, fallback)? });

        if self.json_output {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("Replayed {} steps ({} failed)", report.steps, report.failed_steps.len());
        for window in &report.layout {
            let tiled = window
                .tiled_rect
                .map(|rect| rect.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:>4}  frame {:<20} tiled {:<20} {:?} group {:?}",
                window.window_id,
                window.frame.to_string(),
                tiled,
                window.status,
                window.group
            );
        }
        Ok(())
    }

    async fn execute_config_command(&self, cmd: ConfigCommands) -> Result<()> {
        match cmd.action {
            ConfigActions::Show => {
                let settings = self.load_settings()?;
                if self.json_output {
                    let show_json = serde_json::json!({
                        "path": self.settings_store.path(),
                        "settings": settings,
                    });
                    println!("{}", serde_json::to_string_pretty(&show_json)?);
                } else {
                    println!("# {}", self.settings_store.path().display());
                    print!("{}", toml::to_string_pretty(&settings)?);
                }
            }
            ConfigActions::Init { force } => {
                let created = if force {
                    self.settings_store.save(&TilingSettings::default())?;
                    true
                } else {
                    self.settings_store.initialize()?
                };

                let path = self.settings_store.path().display();
                if created {
                    info!("Wrote default settings to {}", path);
                    println!("Created {}", path);
                } else {
                    println!("{} already exists (use --force to overwrite)", path);
                }
            }
            ConfigActions::Validate { file } => {
                let store = match file {
                    Some(file) => SettingsStore::new(file),
                    None => self.settings_store.clone(),
                };
                let settings = store
                    .load()
                    .map_err(|e| SnapTileError::ConfigurationError(e.to_string()))?;
                let results = SettingsValidator::new().validate(&settings);

                if self.json_output {
                    let findings: Vec<_> = results
                        .iter()
                        .map(|result| {
                            serde_json::json!({
                                "rule": result.rule.name,
                                "severity": format!("{:?}", result.rule.severity),
                                "field": result.field,
                                "message": result.message,
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&findings)?);
                } else if results.is_empty() {
                    println!("{} is valid", store.path().display());
                } else {
                    for result in &results {
                        let label = match result.rule.severity {
                            ValidationSeverity::Error => "error",
                            ValidationSeverity::Warning => "warning",
                            ValidationSeverity::Info => "info",
                        };
                        println!("{}: {} ({})", label, result.message, result.field);
                    }
                }

                if SettingsValidator::has_errors(&results) {
                    return Err(SnapTileError::ValidationError(format!(
                        "{} has invalid settings",
                        store.path().display()
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    fn load_settings(&self) -> Result<TilingSettings> {
        self.settings_store
            .load()
            .map_err(|e| SnapTileError::ConfigurationError(e.to_string()).into())
    }

    fn print_rects(&self, rects: &[Rect]) -> Result<()> {
        if self.json_output {
            println!("{}", serde_json::to_string_pretty(rects)?);
        } else if rects.is_empty() {
            println!("(none)");
        } else {
            for rect in rects {
                println!("{}", rect);
            }
        }
        Ok(())
    }
}

/// Run the CLI interface
pub async fn run_cli(cli: SnapTileCli) -> Result<()> {
    let store = match &cli.config {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::default(),
    };
    let executor = SnapTileCliExecutor::new(store, cli.json);

    if let Err(e) = executor.execute(cli.command).await {
        if cli.json {
            let error_json = serde_json::json!({
                "error": true,
                "message": e.to_string()
            });
            println!("{}", serde_json::to_string_pretty(&error_json)?);
        } else {
            error!("Command failed: {}", e);
        }
        return Err(e);
    }

    Ok(())
}
