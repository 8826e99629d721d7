//! A tiny two-room world for unit tests.

use super::{World, load_world_from_str};

pub(crate) const SMALL_WORLD: &str = r#"
[world]
id = "small"
name = "Small"
start_room = "hall"
capacity = 10

[rules]
unlock_item = "badge"
locked_doors_text = "The doors are shut."
collapse_text = "The stack crashes to the floor."
stack_drop_text = "Those stay with you."

[[room]]
name = "hall"
desc = "A narrow hall."

[[room.exit]]
direction = "north"
target = "attic"

[[room]]
name = "attic"
desc = "Dusty rafters."

[[room.exit]]
direction = "south"
target = "hall"

[[item]]
name = "lamp"
room = "hall"
desc = "A brass lamp."
weight = 3

[[item]]
name = "key"
room = "hall"
desc = "A small key."
weight = 1

[[item]]
name = "badge"
room = "hall"
desc = "A visitor badge."
weight = 1

[[item]]
name = "anvil"
room = "hall"
desc = "Far too heavy."
weight = 50

[[item]]
name = "secret"
room = "hall"
desc = "You should not see this yet."
weight = 1
hidden = true

[[item]]
name = "top"
room = "attic"
desc = "Top box."
weight = 2
stack_index = 0

[[item]]
name = "middle"
room = "attic"
desc = "Middle box."
weight = 2
stack_index = 1

[[item]]
name = "bottom"
room = "attic"
desc = "Bottom box."
weight = 2
stack_index = 2

[[entity]]
name = "door"
room = "hall"
desc = "A locked door."

[[entity]]
name = "ghost"
room = "hall"
desc = "Boo."
hidden = true

[[entity]]
name = "owl"
room = "attic"
desc = "A sleepy owl."

[[event]]
id = "open-door"
outcome = "The door unlocks with a loud click."

[[event]]
id = "owl-lit"
outcome = "The owl blinks at the light."

[[interaction]]
item = "key"
entity = "door"
event = "open-door"

[[interaction]]
item = "lamp"
entity = "owl"
event = "owl-lit"
"#;

pub(crate) fn small_world() -> World {
    load_world_from_str(SMALL_WORLD).expect("fixture world is valid")
}
