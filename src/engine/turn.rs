use serde::{Deserialize, Serialize};

/// One already-tokenised player input: `{"command": "take", "args": ["tea"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnInput {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// What the session answers for one turn: `{"message": "...", "game_over": false}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutput {
    pub message: String,
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Won,
    Lost,
    Quit,
}

impl TurnInput {
    pub fn new(command: impl Into<String>, args: &[&str]) -> Self {
        TurnInput {
            command: command.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Split a typed line into verb and arguments (trimmed, lower-cased).
    pub fn parse(line: &str) -> Self {
        let lower = line.trim().to_lowercase();
        let mut parts = lower.split_whitespace();
        let command = parts.next().unwrap_or("").to_string();
        let args = parts.map(|p| p.to_string()).collect();
        TurnInput { command, args }
    }

    /// Transports may send padding such as `args: [""]`; those never count.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.args
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
    }

    pub fn first_arg(&self) -> Option<&str> {
        self.args().next()
    }

    /// The whole input as one trimmed, lower-cased line, the way sub-dialogues
    /// read it.
    pub fn line(&self) -> String {
        std::iter::once(self.command.trim())
            .chain(self.args())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn normalized(&self) -> Self {
        TurnInput::parse(&self.line())
    }
}
