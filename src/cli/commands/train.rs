//! Train command - Train a cat and a mouse against each other

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    app::{AgentConfig, App, DEFAULT_DATA_DIR},
    cli::output::{format_number, print_kv, print_result, print_section},
    maze::Maze,
    pipeline::{
        MetricsObserver, ProgressObserver, TrainingConfig, TrainingPipeline, TrainingResult,
        WindowSummary,
    },
    q_learning::{QLearningAgent, Role},
};

#[derive(Parser, Debug)]
#[command(about = "Train cat and mouse agents")]
pub struct TrainArgs {
    /// Maze file (one row per line, 0 = free, other digits = wall)
    #[arg(long, short = 'm')]
    pub maze: PathBuf,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 10_000)]
    pub episodes: usize,

    /// Step limit per episode
    #[arg(long, default_value_t = 100)]
    pub max_steps: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for Q-table snapshots
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Snapshot both Q-tables every N episodes
    #[arg(long, default_value_t = 1000)]
    pub snapshot_interval: u64,

    /// Learning rate α for both agents
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount rate γ for both agents
    #[arg(long)]
    pub discount_rate: Option<f64>,

    /// Report the catch rate over windows of this many episodes
    #[arg(long, default_value_t = 1000)]
    pub metrics_window: usize,

    /// Continue training the cat from a stored snapshot (e.g. QTableCat5000);
    /// episode numbering and exploration pick up where it left off
    #[arg(long)]
    pub resume_cat: Option<String>,

    /// Continue training the mouse from a stored snapshot (e.g. QTableMouse5000);
    /// episode numbering and exploration pick up where it left off
    #[arg(long)]
    pub resume_mouse: Option<String>,

    /// Write a JSON training summary to this file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    config: &'a TrainingConfig,
    cat: &'a AgentConfig,
    mouse: &'a AgentConfig,
    cat_table: String,
    mouse_table: String,
    windows: &'a [WindowSummary],
}

impl TrainArgs {
    fn agent_config(&self, role: Role) -> AgentConfig {
        let mut config =
            AgentConfig::for_role(role).with_snapshot_interval(self.snapshot_interval);
        if let Some(rate) = self.learning_rate {
            config = config.with_learning_rate(rate);
        }
        if let Some(rate) = self.discount_rate {
            config = config.with_discount_rate(rate);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(role_seed(seed, role));
        }
        config
    }
}

/// Per-role seed, so the two agents do not explore in lockstep.
pub(crate) fn role_seed(seed: u64, role: Role) -> u64 {
    match role {
        Role::Cat => seed.wrapping_add(1),
        Role::Mouse => seed.wrapping_add(2),
    }
}

pub(crate) fn build_agent(
    app: &App,
    role: Role,
    maze: &Maze,
    config: AgentConfig,
    snapshot: Option<&str>,
) -> Result<QLearningAgent> {
    match snapshot {
        Some(name) => app
            .load_agent(role, maze, name, config)
            .with_context(|| format!("Failed to load {role} Q-table '{name}'")),
        None => app
            .create_agent(role, maze, config)
            .with_context(|| format!("Failed to create {role} agent")),
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let maze = Maze::load(&args.maze)
        .with_context(|| format!("Failed to load maze {}", args.maze.display()))?;
    info!(
        rows = maze.rows(),
        cols = maze.cols(),
        free_cells = maze.free_count(),
        "maze loaded"
    );

    let app = App::with_data_dir(&args.data_dir);
    let cat_config = args.agent_config(Role::Cat);
    let mouse_config = args.agent_config(Role::Mouse);
    let mut cat = build_agent(
        &app,
        Role::Cat,
        &maze,
        cat_config.clone(),
        args.resume_cat.as_deref(),
    )?;
    let mut mouse = build_agent(
        &app,
        Role::Mouse,
        &maze,
        mouse_config.clone(),
        args.resume_mouse.as_deref(),
    )?;

    let config = TrainingConfig {
        episodes: args.episodes,
        max_steps: args.max_steps,
        seed: args.seed,
        noise: 0.0,
    };
    let metrics = MetricsObserver::new(args.metrics_window);
    let mut pipeline =
        TrainingPipeline::new(config.clone()).with_observer(Box::new(metrics.clone()));
    if !args.quiet {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    let repository = app.table_repository();
    let result = pipeline
        .run(&mut cat, &mut mouse, &*repository)
        .context("Training failed")?;

    let cat_table = app
        .save_agent(&cat, cat.episode())
        .context("Failed to save cat")?;
    let mouse_table = app
        .save_agent(&mouse, mouse.episode())
        .context("Failed to save mouse")?;

    print_result("Training complete", &result);
    print_kv("Cat exploration", &format!("{:.4}", cat.exploration_rate()));
    print_kv("Mouse exploration", &format!("{:.4}", mouse.exploration_rate()));
    print_kv("Cat table", &cat_table);
    print_kv("Mouse table", &mouse_table);

    let windows = metrics.windows();
    if windows.len() > 1 {
        print_section("Catch rate by window");
        for window in &windows {
            print_kv(
                &format!("Up to {}", format_number(window.last_episode)),
                &format!(
                    "{:.1}% ({:.1} steps)",
                    window.catch_rate * 100.0,
                    window.mean_steps
                ),
            );
        }
    }

    if let Some(path) = &args.summary {
        let summary = TrainingSummaryFile {
            training: &result,
            config: &config,
            cat: &cat_config,
            mouse: &mouse_config,
            cat_table,
            mouse_table,
            windows: &windows,
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create summary file {}", path.display()))?;
        to_writer_pretty(file, &summary).context("Failed to write training summary")?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
