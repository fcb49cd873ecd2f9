//! The two sides of the pursuit game.

use serde::{Deserialize, Serialize};

/// One of the two agents on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agent {
    /// The cat. Maximizes the evaluation; wins by landing on the evader.
    Pursuer,
    /// The mouse. Minimizes the evaluation; wins by surviving the turn budget.
    Evader,
}

impl Agent {
    /// Returns the lowercase protocol name.
    pub const fn name(self) -> &'static str {
        match self {
            Agent::Pursuer => "pursuer",
            Agent::Evader => "evader",
        }
    }

    /// Parses an agent from its protocol name. `cat` and `mouse` are accepted
    /// as aliases.
    pub fn from_name(s: &str) -> Option<Agent> {
        match s {
            "pursuer" | "cat" => Some(Agent::Pursuer),
            "evader" | "mouse" => Some(Agent::Evader),
            _ => None,
        }
    }

    /// Returns the agent that moves against this one.
    pub const fn opponent(self) -> Agent {
        match self {
            Agent::Pursuer => Agent::Evader,
            Agent::Evader => Agent::Pursuer,
        }
    }

    /// Returns true for the side the search maximizes for.
    pub const fn is_maximizing(self) -> bool {
        matches!(self, Agent::Pursuer)
    }

    /// Single-character board symbol used by the text renderer.
    pub const fn symbol(self) -> char {
        match self {
            Agent::Pursuer => 'C',
            Agent::Evader => 'M',
        }
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
