//! Agent roles and their distance-shaped rewards

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    maze::{Cell, Distance},
};

/// Terminal bonus on capture: earned by the cat, paid by the mouse.
pub const CAUGHT_BONUS: f64 = 10.0;

/// Reward for a one-step change in pursuit distance.
pub const SHAPING_REWARD: f64 = 1.0;

/// Which side of the pursuit an agent plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Cat,
    Mouse,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::Cat => "Cat",
            Role::Mouse => "Mouse",
        }
    }

    pub fn opponent(self) -> Role {
        match self {
            Role::Cat => Role::Mouse,
            Role::Mouse => Role::Cat,
        }
    }

    /// This role's own cell out of a (cat, mouse) pair.
    pub fn own_cell(self, cat: Cell, mouse: Cell) -> Cell {
        match self {
            Role::Cat => cat,
            Role::Mouse => mouse,
        }
    }

    /// The opponent's cell out of a (cat, mouse) pair.
    pub fn opponent_cell(self, cat: Cell, mouse: Cell) -> Cell {
        self.opponent().own_cell(cat, mouse)
    }

    /// +1 for the cat, which wants the distance to shrink; -1 for the mouse.
    pub fn reward_sign(self) -> f64 {
        match self {
            Role::Cat => 1.0,
            Role::Mouse => -1.0,
        }
    }

    /// Reward for a transition whose pursuit distance went from `old` to `new`.
    ///
    /// Shrinking the distance scores `+1` for the cat and `-1` for the mouse,
    /// growing it the opposite, and no change scores zero. Unreachable counts
    /// as larger than any finite distance, so two unreachable distances are
    /// equal. A capture (`new == 0`) adds `±10` on top.
    pub fn reward(self, old: Distance, new: Distance) -> f64 {
        let shaping = match new.cmp(&old) {
            Ordering::Less => SHAPING_REWARD,
            Ordering::Greater => -SHAPING_REWARD,
            Ordering::Equal => 0.0,
        };
        let capture = if new.is_zero() { CAUGHT_BONUS } else { 0.0 };
        self.reward_sign() * (shaping + capture)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cat" => Ok(Role::Cat),
            "mouse" => Ok(Role::Mouse),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown role '{other}' (expected 'cat' or 'mouse')"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cat_rewards_closing_in() {
        assert_eq!(Role::Cat.reward(Distance::Steps(4), Distance::Steps(3)), 1.0);
        assert_eq!(Role::Cat.reward(Distance::Steps(3), Distance::Steps(4)), -1.0);
        assert_eq!(Role::Cat.reward(Distance::Steps(3), Distance::Steps(3)), 0.0);
    }

    #[test]
    fn test_mouse_rewards_escaping() {
        assert_eq!(Role::Mouse.reward(Distance::Steps(3), Distance::Steps(4)), 1.0);
        assert_eq!(Role::Mouse.reward(Distance::Steps(4), Distance::Steps(3)), -1.0);
        assert_eq!(Role::Mouse.reward(Distance::Steps(2), Distance::Steps(2)), 0.0);
    }

    #[test]
    fn test_capture_bonus() {
        assert_eq!(Role::Cat.reward(Distance::Steps(1), Distance::Steps(0)), 11.0);
        assert_eq!(Role::Mouse.reward(Distance::Steps(1), Distance::Steps(0)), -11.0);
        assert_eq!(Role::Cat.reward(Distance::Steps(0), Distance::Steps(0)), 10.0);
        assert_eq!(Role::Mouse.reward(Distance::Steps(0), Distance::Steps(0)), -10.0);
    }

    #[test]
    fn test_unreachable_distances() {
        use Distance::{Steps, Unreachable};
        assert_eq!(Role::Cat.reward(Unreachable, Steps(5)), 1.0);
        assert_eq!(Role::Cat.reward(Steps(5), Unreachable), -1.0);
        assert_eq!(Role::Cat.reward(Unreachable, Unreachable), 0.0);
        assert_eq!(Role::Mouse.reward(Unreachable, Unreachable), 0.0);
    }

    #[test]
    fn test_rewards_are_mirrored() {
        let distances = [
            Distance::Steps(0),
            Distance::Steps(1),
            Distance::Steps(7),
            Distance::Unreachable,
        ];
        for old in distances {
            for new in distances {
                assert_eq!(Role::Cat.reward(old, new), -Role::Mouse.reward(old, new));
            }
        }
    }

    #[test]
    fn test_cells_by_role() {
        let cat = Cell::new(0, 0);
        let mouse = Cell::new(1, 1);
        assert_eq!(Role::Cat.own_cell(cat, mouse), cat);
        assert_eq!(Role::Mouse.own_cell(cat, mouse), mouse);
        assert_eq!(Role::Mouse.opponent_cell(cat, mouse), cat);
    }

    #[test]
    fn test_parse_role() {
        assert_eq!("Cat".parse::<Role>().unwrap(), Role::Cat);
        assert_eq!(" mouse ".parse::<Role>().unwrap(), Role::Mouse);
        assert!("dog".parse::<Role>().is_err());
    }
}
