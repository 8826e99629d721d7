mod commands;
mod dialogue;
mod output;
mod player;
mod render;
mod reveals;
mod turn;

pub use commands::{dispatch, verbs};
pub use dialogue::{
    Mode, PasswordOutcome, TerminalOutcome, TerminalStage, fill, password_turn, terminal_turn,
};
pub use output::{Output, OutputBlock};
pub use player::{Player, Take};
pub use render::{show_commands, show_inventory, show_map, show_room};
pub use reveals::{evaluate_reveals, stack_loaded, trigger_with_reveals};
pub use turn::{Ending, TurnInput, TurnOutput};
