//! The two sub-dialogues that take over the prompt: guessing the password of
//! the locked computer and typing shell commands into the terminal.
//!
//! Both functions only decide; the controller applies the outcome.

use crate::world::{PasswordLock, TerminalPuzzle};

/// Who reads the next raw line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Password,
    Terminal(TerminalStage),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TerminalStage {
    #[default]
    Shell,
    SecretFiles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordOutcome {
    Unlocked,
    Left,
    Wrong { remaining: u32 },
    LockedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalOutcome {
    Left,
    Advanced,
    Escaped,
    NotFound,
}

pub fn password_turn(lock: &PasswordLock, attempts_left: u32, line: &str) -> PasswordOutcome {
    if line == lock.secret {
        PasswordOutcome::Unlocked
    } else if line == "leave" {
        PasswordOutcome::Left
    } else if attempts_left <= 1 {
        PasswordOutcome::LockedOut
    } else {
        PasswordOutcome::Wrong {
            remaining: attempts_left - 1,
        }
    }
}

pub fn terminal_turn(puzzle: &TerminalPuzzle, stage: TerminalStage, line: &str) -> TerminalOutcome {
    if line == "leave" {
        return TerminalOutcome::Left;
    }

    match stage {
        TerminalStage::Shell if line == puzzle.first_command => TerminalOutcome::Advanced,
        TerminalStage::SecretFiles if line == puzzle.final_command => TerminalOutcome::Escaped,
        _ => TerminalOutcome::NotFound,
    }
}

/// Substitute a `{key}` placeholder in story text.
pub fn fill(template: &str, key: &str, value: impl ToString) -> String {
    template.replace(&format!("{{{key}}}"), &value.to_string())
}
