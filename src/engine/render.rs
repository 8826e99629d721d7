use crate::engine::output::Output;
use crate::engine::player::Player;
use crate::world::World;

const COMMANDS_HELP: &str = "-exit -> quits the game

-commands -> shows the commands

-look -> shows the content of the room.

-approach <entity> -> to approach an entity

-leave -> to leave an entity

-inventory -> shows items in the inventory

-take <item> -> to take an item into your inventory

-drop <item> -> to drop an item from your inventory and move it to the current room

-use <item> -> to make use of a certain item when you approach an entity

-move <direction> -> to move to a different room

-map -> shows the directions you can take";

/// The room view: title, description, visible entities (the engaged one marked)
/// and visible items with their weights.
pub fn show_room(out: &mut Output, world: &World, player: &Player) {
    let Some(room) = world.room(&player.room) else {
        return;
    };

    out.title(format!("You are in {}", room.name));
    out.say(room.desc.clone());

    let entities: Vec<String> = world
        .entities_in(&room.name)
        .map(|entity| {
            if player.is_engaged_with(&entity.name) {
                format!("- {} (currently approached)", entity.name)
            } else {
                format!("- {}", entity.name)
            }
        })
        .collect();
    if !entities.is_empty() {
        out.say(format!("You can approach:\n{}", entities.join("\n")));
    }

    let items: Vec<String> = world
        .items_in(&room.name)
        .map(|item| format!("- {}: {} Weight: {}", item.name, item.desc, item.weight))
        .collect();
    if !items.is_empty() {
        out.say(format!("The room contains:\n{}", items.join("\n")));
    }
}

pub fn show_inventory(out: &mut Output, world: &World, player: &Player) {
    let lines: Vec<String> = world
        .inventory()
        .map(|item| format!("- {}: {} Weight: {}", item.name, item.desc, item.weight))
        .collect();

    if lines.is_empty() {
        out.say(format!(
            "Your inventory is empty.\nAvailable space: {}",
            player.available
        ));
    } else {
        out.say(format!(
            "Available space: {}\nYour inventory contains:\n{}",
            player.available,
            lines.join("\n")
        ));
    }
}

pub fn show_map(out: &mut Output, world: &World, player: &Player) {
    let Some(room) = world.room(&player.room) else {
        return;
    };

    let mut exits: Vec<String> = room
        .exits
        .iter()
        .map(|e| format!("{}: {}", e.direction, e.target))
        .collect();
    exits.sort();
    out.say(exits.join("\n"));
}

pub fn show_commands(out: &mut Output) {
    out.say(COMMANDS_HELP);
}
