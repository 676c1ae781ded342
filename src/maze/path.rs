//! Breadth-first shortest paths over the free-cell graph

use std::{cmp::Ordering, collections::VecDeque, fmt};

use super::{
    grid::{Cell, Maze},
    moves::Action,
};

/// Step distance between two cells. `Unreachable` compares greater than any
/// finite distance and equal to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distance {
    Steps(usize),
    Unreachable,
}

impl Distance {
    pub fn is_zero(self) -> bool {
        self == Distance::Steps(0)
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Distance::Steps(a), Distance::Steps(b)) => a.cmp(b),
            (Distance::Steps(_), Distance::Unreachable) => Ordering::Less,
            (Distance::Unreachable, Distance::Steps(_)) => Ordering::Greater,
            (Distance::Unreachable, Distance::Unreachable) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Steps(steps) => write!(f, "{steps}"),
            Distance::Unreachable => f.write_str("inf"),
        }
    }
}

/// One shortest path from `start` to `goal`, both ends included.
///
/// Neighbours are expanded in action order (up, down, left, right), which
/// fixes the tie-break between equally short paths. Returns `None` when either
/// end is not a free cell or the goal lies in another connected region.
pub fn shortest_path(maze: &Maze, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
    if !maze.is_free(start) || !maze.is_free(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut parent: Vec<Option<Cell>> = vec![None; maze.cell_count()];
    let mut visited = vec![false; maze.cell_count()];
    let mut queue = VecDeque::from([start]);
    visited[maze.offset(start)] = true;

    while let Some(current) = queue.pop_front() {
        for action in [Action::Up, Action::Down, Action::Left, Action::Right] {
            let Some(next) = action.target(current) else {
                continue;
            };
            if !maze.is_free(next) || visited[maze.offset(next)] {
                continue;
            }
            visited[maze.offset(next)] = true;
            parent[maze.offset(next)] = Some(current);

            if next == goal {
                let mut path = vec![goal];
                let mut cursor = goal;
                while let Some(previous) = parent[maze.offset(cursor)] {
                    path.push(previous);
                    cursor = previous;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(next);
        }
    }

    None
}

/// Step distance between two cells: the path length in edges.
pub fn distance(maze: &Maze, from: Cell, to: Cell) -> Distance {
    match shortest_path(maze, from, to) {
        Some(path) => Distance::Steps(path.len() - 1),
        None => Distance::Unreachable,
    }
}
