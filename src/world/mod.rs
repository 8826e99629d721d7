mod error;
mod loader;
mod model;
mod registry;
mod validator;

pub use error::LoadError;
pub use loader::{academy, load_world_from_file, load_world_from_str};

// Re-export only what the engine, the binary and the tests reach for.
pub use model::{
    Entity, Exit, Item, ItemLocation, PasswordLock, Reveal, RevealTrigger, Room, Rules,
    TerminalPuzzle, World,
};
pub use registry::{Event, Interaction, Registry};
pub use validator::{ValidationError, validate_world};

#[cfg(test)]
pub(crate) mod fixtures;
