use std::collections::BTreeMap;

use super::registry::Registry;

//////////////////////////////
/// GAME STRUCTS AND ENUMS ///
//////////////////////////////

/// Runtime world type used by the game loop.
///
/// A session owns its own `World`; the parsed template is cloned per session so no
/// reveal, description or event flag ever leaks between players.
#[derive(Debug, Clone)]
pub struct World {
    pub id: String,
    pub name: String,
    pub intro: String,
    pub farewell: String,
    pub start_room: String,
    pub capacity: u32,
    pub rooms: BTreeMap<String, Room>,
    pub items: BTreeMap<String, Item>,
    pub entities: BTreeMap<String, Entity>,
    pub registry: Registry,
    pub reveals: Vec<Reveal>,
    pub rules: Rules,
    pub password: PasswordLock,
    pub terminal: TerminalPuzzle,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub name: String,
    pub desc: String,
    pub exits: Vec<Exit>,
}

#[derive(Debug, Clone)]
pub struct Exit {
    pub direction: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLocation {
    Room(String),
    Inventory,
    Consumed, // handed over through a successful `use`
}

#[derive(Debug, Clone)]
pub struct Item {
    pub name: String,
    pub desc: String,
    pub weight: u32,
    pub hidden: bool,
    /// Position in the ordered stack, if the item belongs to one.
    pub stack_index: Option<usize>,
    pub location: ItemLocation,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub desc: String,
    pub hidden: bool,
    pub room: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealTrigger {
    Approach(String),
    Event(String),
}

/// A one-shot change to the world: un-hide things and rewrite entity descriptions.
#[derive(Debug, Clone)]
pub struct Reveal {
    pub id: String,
    pub trigger: RevealTrigger,
    pub show_items: Vec<String>,
    pub show_entities: Vec<String>,
    pub describe: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Rules {
    pub unlock_item: String,
    pub locked_doors_text: String,
    pub forbidden_item: String,
    pub forbidden_text: String,
    pub challenge_event: String,
    pub collapse_text: String,
    pub stack_drop_text: String,
}

#[derive(Debug, Clone)]
pub struct PasswordLock {
    pub entity: String,
    pub secret: String,
    pub attempts: u32,
    pub unlock_event: String,
    pub wrong_text: String,     // {remaining}
    pub prompt_text: String,    // {remaining}
    pub locked_text: String,
}

#[derive(Debug, Clone)]
pub struct TerminalPuzzle {
    pub entity: String,
    pub first_command: String,
    pub final_command: String,
    pub hint_text: String,
    pub progress_desc: String,
    pub victory_text: String,
    pub not_found_text: String, // {input}
}

impl Item {
    pub fn is_stacked(&self) -> bool {
        self.stack_index.is_some()
    }
}

impl World {
    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    /// Target room of `direction` leaving `room`, if such an exit exists.
    pub fn exit_target(&self, room: &str, direction: &str) -> Option<&str> {
        self.rooms
            .get(room)?
            .exits
            .iter()
            .find(|e| e.direction == direction)
            .map(|e| e.target.as_str())
    }

    /// An item lying in `room` that the player can currently see.
    pub fn visible_item_in(&self, room: &str, name: &str) -> Option<&Item> {
        self.items
            .get(name)
            .filter(|item| !item.hidden && item.location == ItemLocation::Room(room.to_string()))
    }

    /// An entity of `room` that the player can currently see.
    pub fn visible_entity_in(&self, room: &str, name: &str) -> Option<&Entity> {
        self.entities
            .get(name)
            .filter(|entity| !entity.hidden && entity.room == room)
    }

    pub fn items_in<'a>(&'a self, room: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.values().filter(move |item| {
            !item.hidden && matches!(&item.location, ItemLocation::Room(r) if r == room)
        })
    }

    pub fn entities_in<'a>(&'a self, room: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities
            .values()
            .filter(move |entity| !entity.hidden && entity.room == room)
    }

    pub fn inventory(&self) -> impl Iterator<Item = &Item> {
        self.items
            .values()
            .filter(|item| item.location == ItemLocation::Inventory)
    }

    pub fn carries(&self, name: &str) -> bool {
        self.items
            .get(name)
            .is_some_and(|item| item.location == ItemLocation::Inventory)
    }

    pub fn stack_len(&self) -> usize {
        self.items.values().filter(|item| item.is_stacked()).count()
    }

    /// Un-hide an item or entity. Unknown names are ignored.
    pub fn reveal(&mut self, name: &str) {
        if let Some(item) = self.items.get_mut(name) {
            item.hidden = false;
        }
        if let Some(entity) = self.entities.get_mut(name) {
            entity.hidden = false;
        }
    }

    pub fn describe(&mut self, entity: &str, text: impl Into<String>) {
        if let Some(e) = self.entities.get_mut(entity) {
            e.desc = text.into();
        }
    }

    pub fn description(&self, entity: &str) -> Option<&str> {
        self.entities.get(entity).map(|e| e.desc.as_str())
    }
}
