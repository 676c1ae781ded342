//! Evaluate command - Play trained agents against each other without learning

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use super::train::{build_agent, role_seed};
use crate::{
    app::{AgentConfig, App, DEFAULT_DATA_DIR},
    cli::output::{print_kv, print_result},
    maze::Maze,
    pipeline::{TrainingConfig, TrainingPipeline},
    q_learning::Role,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate trained agents")]
pub struct EvaluateArgs {
    /// Maze file the agents were trained on
    #[arg(long, short = 'm')]
    pub maze: PathBuf,

    /// Cat Q-table snapshot name (e.g. QTableCat10000); untrained if omitted
    #[arg(long)]
    pub cat: Option<String>,

    /// Mouse Q-table snapshot name (e.g. QTableMouse10000); untrained if omitted
    #[arg(long)]
    pub mouse: Option<String>,

    /// Number of evaluation episodes
    #[arg(long, short = 'e', default_value_t = 100)]
    pub episodes: usize,

    /// Step limit per episode
    #[arg(long, default_value_t = 100)]
    pub max_steps: usize,

    /// Probability of a random action instead of the greedy one
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding Q-table snapshots
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    if !(0.0..=1.0).contains(&args.noise) {
        bail!("--noise must be between 0 and 1, got {}", args.noise);
    }

    let maze = Maze::load(&args.maze)
        .with_context(|| format!("Failed to load maze {}", args.maze.display()))?;
    let app = App::with_data_dir(&args.data_dir);

    let config = |role: Role| {
        let config = AgentConfig::for_role(role);
        match args.seed {
            Some(seed) => config.with_seed(role_seed(seed, role)),
            None => config,
        }
    };
    let mut cat = build_agent(&app, Role::Cat, &maze, config(Role::Cat), args.cat.as_deref())?;
    let mut mouse = build_agent(
        &app,
        Role::Mouse,
        &maze,
        config(Role::Mouse),
        args.mouse.as_deref(),
    )?;

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        episodes: args.episodes,
        max_steps: args.max_steps,
        seed: args.seed,
        noise: args.noise,
    });
    let result = pipeline
        .evaluate(&mut cat, &mut mouse)
        .context("Evaluation failed")?;

    print_result("Evaluation", &result);
    print_kv("Cat table", args.cat.as_deref().unwrap_or("untrained"));
    print_kv("Mouse table", args.mouse.as_deref().unwrap_or("untrained"));
    print_kv("Noise", &format!("{:.2}", args.noise));

    if let Some(path) = &args.export {
        result
            .save(path)
            .with_context(|| format!("Failed to export results to {}", path.display()))?;
        println!("\nResults exported to {}", path.display());
    }

    Ok(())
}
