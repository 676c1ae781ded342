//! Pursuit environment: applies actions to positions on the maze

use rand::{Rng, seq::IndexedRandom};

use crate::{
    Error, Result,
    maze::{Action, Cell, Maze},
    q_learning::Transition,
};

/// Result of one simultaneous step of both agents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// The step from the cat's point of view
    pub cat: Transition,
    /// The step from the mouse's point of view
    pub mouse: Transition,
    /// Both agents ended on the same cell
    pub caught: bool,
}

/// Cat and mouse positions on a fixed maze
#[derive(Debug, Clone)]
pub struct PursuitEnv {
    maze: Maze,
    cat: Cell,
    mouse: Cell,
}

impl PursuitEnv {
    /// Place both agents on the maze.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPosition`] if either position is not free.
    pub fn new(maze: Maze, cat: Cell, mouse: Cell) -> Result<Self> {
        maze.require_free(cat)?;
        maze.require_free(mouse)?;
        Ok(Self { maze, cat, mouse })
    }

    /// Place both agents on two distinct free cells chosen uniformly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the maze has fewer than two
    /// free cells.
    pub fn random_start<R: Rng + ?Sized>(maze: Maze, rng: &mut R) -> Result<Self> {
        let (cat, mouse) = Self::random_positions(&maze, rng)?;
        Ok(Self { maze, cat, mouse })
    }

    /// Move both agents to fresh distinct random cells.
    pub fn reset_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let (cat, mouse) = Self::random_positions(&self.maze, rng)?;
        self.cat = cat;
        self.mouse = mouse;
        Ok(())
    }

    fn random_positions<R: Rng + ?Sized>(maze: &Maze, rng: &mut R) -> Result<(Cell, Cell)> {
        let cells: Vec<Cell> = maze.free_cells().collect();
        let picked: Vec<Cell> = cells.choose_multiple(rng, 2).copied().collect();
        match picked.as_slice() {
            [cat, mouse] => Ok((*cat, *mouse)),
            _ => Err(Error::InvalidConfiguration {
                message: format!(
                    "maze needs at least two free cells for a pursuit, found {}",
                    cells.len()
                ),
            }),
        }
    }

    /// Where `action` takes an agent standing on `from`.
    ///
    /// Moves into walls or off the grid leave the agent in place. The
    /// opponent's cell is never blocked, which is what makes a capture
    /// possible.
    pub fn apply(&self, from: Cell, action: Action) -> Cell {
        action
            .target(from)
            .filter(|&to| self.maze.is_free(to))
            .unwrap_or(from)
    }

    /// Move both agents at once.
    pub fn step(&mut self, cat_action: Action, mouse_action: Action) -> StepOutcome {
        let (old_cat, old_mouse) = (self.cat, self.mouse);
        self.cat = self.apply(old_cat, cat_action);
        self.mouse = self.apply(old_mouse, mouse_action);

        let transition = |action| Transition {
            action,
            old_cat,
            new_cat: self.cat,
            old_mouse,
            new_mouse: self.mouse,
        };

        StepOutcome {
            cat: transition(cat_action),
            mouse: transition(mouse_action),
            caught: self.is_caught(),
        }
    }

    pub fn is_caught(&self) -> bool {
        self.cat == self.mouse
    }

    pub fn cat(&self) -> Cell {
        self.cat
    }

    pub fn mouse(&self) -> Cell {
        self.mouse
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }
}
