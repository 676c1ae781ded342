//! Training and evaluation loops for a cat/mouse pair

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::env::PursuitEnv;
use crate::{
    Error, Result,
    ports::{Observer, TableRepository},
    q_learning::{QLearningAgent, Role, SelectionMode},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of episodes
    pub episodes: usize,

    /// Step limit per episode; an episode that reaches it counts as an escape
    pub max_steps: usize,

    /// Random seed for start positions
    pub seed: Option<u64>,

    /// Probability of a random action during evaluation
    pub noise: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            max_steps: 100,
            seed: None,
            noise: 0.0,
        }
    }
}

/// What happened in one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    /// 1-based episode number
    pub episode: usize,
    /// Steps played
    pub steps: usize,
    /// Whether the cat caught the mouse
    pub caught: bool,
    /// Sum of the cat's rewards
    pub cat_return: f64,
    /// Sum of the mouse's rewards
    pub mouse_return: f64,
}

/// Result of a training or evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub episodes: usize,

    /// Episodes ending in a capture
    pub catches: usize,

    /// Episodes hitting the step limit
    pub escapes: usize,

    /// Fraction of episodes ending in a capture
    pub catch_rate: f64,

    /// Average episode length in steps
    pub mean_steps: f64,
}

impl TrainingResult {
    /// Summarise a list of episode outcomes
    pub fn from_outcomes(outcomes: &[EpisodeOutcome]) -> Self {
        let episodes = outcomes.len();
        let catches = outcomes.iter().filter(|o| o.caught).count();
        let (catch_rate, mean_steps) = if episodes > 0 {
            (
                catches as f64 / episodes as f64,
                outcomes.iter().map(|o| o.steps).sum::<usize>() as f64 / episodes as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            episodes,
            catches,
            escapes: episodes - catches,
            catch_rate,
            mean_steps,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs episodes between a cat and a mouse agent
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train both agents.
    ///
    /// Every step, each agent picks an ε-greedy action, both move at once and
    /// both fold the transition into their Q-tables. After each episode the
    /// exploration schedules advance, which also snapshots the tables into
    /// `repository` on the configured interval.
    ///
    /// Schedules continue from each agent's [`QLearningAgent::episode`], so
    /// an agent restored from `QTableCat5000` snapshots its next table as
    /// `QTableCat6000` rather than overwriting earlier ones.
    pub fn run(
        &mut self,
        cat: &mut QLearningAgent,
        mouse: &mut QLearningAgent,
        repository: &dyn TableRepository,
    ) -> Result<TrainingResult> {
        self.execute(cat, mouse, SelectionMode::Train, Some(repository))
    }

    /// Play episodes greedily (with the configured noise) without learning.
    pub fn evaluate(
        &mut self,
        cat: &mut QLearningAgent,
        mouse: &mut QLearningAgent,
    ) -> Result<TrainingResult> {
        let mode = SelectionMode::Evaluate {
            noise: self.config.noise,
        };
        self.execute(cat, mouse, mode, None)
    }

    fn execute(
        &mut self,
        cat: &mut QLearningAgent,
        mouse: &mut QLearningAgent,
        mode: SelectionMode,
        repository: Option<&dyn TableRepository>,
    ) -> Result<TrainingResult> {
        check_pair(cat, mouse)?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let mut env = PursuitEnv::random_start(cat.maze().clone(), &mut rng)?;
        let mut outcomes = Vec::with_capacity(self.config.episodes);
        let (cat_start, mouse_start) = (cat.episode(), mouse.episode());

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        for episode in 1..=self.config.episodes {
            env.reset_random(&mut rng)?;
            let outcome = self.play_episode(episode, &mut env, cat, mouse, mode, repository)?;

            if let Some(repository) = repository {
                cat.update_exploration(cat_start + episode as u64, repository)?;
                mouse.update_exploration(mouse_start + episode as u64, repository)?;
            }

            debug!(
                episode,
                steps = outcome.steps,
                caught = outcome.caught,
                "episode finished"
            );
            for observer in &mut self.observers {
                observer.on_episode_end(&outcome)?;
            }
            outcomes.push(outcome);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::from_outcomes(&outcomes))
    }

    fn play_episode(
        &self,
        episode: usize,
        env: &mut PursuitEnv,
        cat: &mut QLearningAgent,
        mouse: &mut QLearningAgent,
        mode: SelectionMode,
        repository: Option<&dyn TableRepository>,
    ) -> Result<EpisodeOutcome> {
        let learn = repository.is_some();
        let mut outcome = EpisodeOutcome {
            episode,
            steps: 0,
            caught: false,
            cat_return: 0.0,
            mouse_return: 0.0,
        };

        while outcome.steps < self.config.max_steps {
            let cat_action = cat.select_action(env.cat(), env.mouse(), mode)?;
            let mouse_action = mouse.select_action(env.cat(), env.mouse(), mode)?;
            let step = env.step(cat_action, mouse_action);

            if learn {
                outcome.cat_return += cat.update_policy(&step.cat)?;
                outcome.mouse_return += mouse.update_policy(&step.mouse)?;
            } else {
                outcome.cat_return += cat.compute_reward(&step.cat);
                outcome.mouse_return += mouse.compute_reward(&step.mouse);
            }

            outcome.steps += 1;
            if step.caught {
                outcome.caught = true;
                break;
            }
        }

        Ok(outcome)
    }
}

fn check_pair(cat: &QLearningAgent, mouse: &QLearningAgent) -> Result<()> {
    if cat.role() != Role::Cat || mouse.role() != Role::Mouse {
        return Err(Error::InvalidConfiguration {
            message: format!(
                "expected a Cat and a Mouse agent, got {} and {}",
                cat.role(),
                mouse.role()
            ),
        });
    }
    if cat.maze() != mouse.maze() {
        return Err(Error::InvalidConfiguration {
            message: "cat and mouse agents were built for different mazes".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::InMemoryRepository, app::AgentConfig, maze::Maze};

    fn pair(maze: &Maze) -> (QLearningAgent, QLearningAgent) {
        let cat = QLearningAgent::new(
            Role::Cat,
            maze.clone(),
            AgentConfig::for_role(Role::Cat).with_seed(1),
        )
        .unwrap();
        let mouse = QLearningAgent::new(
            Role::Mouse,
            maze.clone(),
            AgentConfig::for_role(Role::Mouse).with_seed(2),
        )
        .unwrap();
        (cat, mouse)
    }

    #[test]
    fn test_result_from_outcomes() {
        let outcome = |steps, caught| EpisodeOutcome {
            episode: 1,
            steps,
            caught,
            cat_return: 0.0,
            mouse_return: 0.0,
        };
        let result = TrainingResult::from_outcomes(&[outcome(4, true), outcome(10, false)]);
        assert_eq!(result.episodes, 2);
        assert_eq!(result.catches, 1);
        assert_eq!(result.escapes, 1);
        assert_eq!(result.catch_rate, 0.5);
        assert_eq!(result.mean_steps, 7.0);

        let empty = TrainingResult::from_outcomes(&[]);
        assert_eq!(empty.catch_rate, 0.0);
    }

    #[test]
    fn test_training_run_counts_episodes() {
        let maze = Maze::open(3, 3).unwrap();
        let (mut cat, mut mouse) = pair(&maze);
        let repo = InMemoryRepository::new();
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            episodes: 30,
            max_steps: 20,
            seed: Some(9),
            noise: 0.0,
        });

        let result = pipeline.run(&mut cat, &mut mouse, &repo).unwrap();
        assert_eq!(result.episodes, 30);
        assert_eq!(result.catches + result.escapes, 30);
        assert!(result.mean_steps >= 1.0 && result.mean_steps <= 20.0);
        assert!(cat.exploration_rate() < 1.0);
        // Default interval 1000: nothing to snapshot within 30 episodes.
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn test_training_snapshots_on_interval() {
        let maze = Maze::open(2, 2).unwrap();
        let config = |role| AgentConfig::for_role(role).with_snapshot_interval(5);
        let mut cat = QLearningAgent::new(Role::Cat, maze.clone(), config(Role::Cat)).unwrap();
        let mut mouse = QLearningAgent::new(Role::Mouse, maze, config(Role::Mouse)).unwrap();

        let repo = InMemoryRepository::new();
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            episodes: 10,
            max_steps: 5,
            seed: Some(4),
            noise: 0.0,
        });
        pipeline.run(&mut cat, &mut mouse, &repo).unwrap();

        assert_eq!(
            repo.names(),
            vec![
                "QTableCat10".to_string(),
                "QTableCat5".to_string(),
                "QTableMouse10".to_string(),
                "QTableMouse5".to_string(),
            ]
        );
    }

    #[test]
    fn test_repeated_runs_continue_episode_numbering() {
        let maze = Maze::open(2, 2).unwrap();
        let config = |role| AgentConfig::for_role(role).with_snapshot_interval(5);
        let mut cat = QLearningAgent::new(Role::Cat, maze.clone(), config(Role::Cat)).unwrap();
        let mut mouse = QLearningAgent::new(Role::Mouse, maze, config(Role::Mouse)).unwrap();

        let repo = InMemoryRepository::new();
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            episodes: 5,
            max_steps: 5,
            seed: Some(4),
            noise: 0.0,
        });
        pipeline.run(&mut cat, &mut mouse, &repo).unwrap();
        pipeline.run(&mut cat, &mut mouse, &repo).unwrap();

        assert_eq!(cat.episode(), 10);
        assert_eq!(mouse.episode(), 10);
        assert_eq!(cat.exploration_rate(), cat.scheduled_exploration(10));
        assert!(repo.contains("QTableCat5"));
        assert!(repo.contains("QTableCat10"));
        assert_eq!(repo.load("QTableCat5").unwrap().episode, 5);
    }

    #[test]
    fn test_evaluation_leaves_tables_untouched() {
        let maze = Maze::open(3, 3).unwrap();
        let (mut cat, mut mouse) = pair(&maze);
        let before = cat.q_table().clone();

        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            episodes: 5,
            max_steps: 10,
            seed: Some(3),
            noise: 0.2,
        });
        let result = pipeline.evaluate(&mut cat, &mut mouse).unwrap();
        assert_eq!(result.episodes, 5);
        assert_eq!(cat.q_table(), &before);
        assert_eq!(cat.exploration_rate(), 1.0);
    }

    #[test]
    fn test_rejects_swapped_roles() {
        let maze = Maze::open(2, 2).unwrap();
        let (mut cat, mut mouse) = pair(&maze);
        let mut pipeline = TrainingPipeline::new(TrainingConfig::default());
        let repo = InMemoryRepository::new();
        assert!(matches!(
            pipeline.run(&mut mouse, &mut cat, &repo),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_rejects_mismatched_mazes() {
        let (mut cat, _) = pair(&Maze::open(2, 2).unwrap());
        let (_, mut mouse) = pair(&Maze::open(3, 3).unwrap());
        let mut pipeline = TrainingPipeline::new(TrainingConfig::default());
        assert!(pipeline.evaluate(&mut cat, &mut mouse).is_err());
    }
}
