use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::error::LoadError;
use super::model::{
    Entity, Exit, Item, ItemLocation, PasswordLock, Reveal, RevealTrigger, Room, Rules,
    TerminalPuzzle, World,
};
use super::registry::{Event, Interaction, Registry};
use super::validator::validate_world;

const ACADEMY_TOML: &str = include_str!("../../public/academy.toml");

static ACADEMY: OnceCell<World> = OnceCell::new();

////////////////////
/// TOML STRUCTS ///
////////////////////

#[derive(Deserialize)]
struct WorldFile {
    world: WorldHeader,
    #[serde(default)]
    rules: RulesConfig,
    #[serde(default)]
    password: PasswordConfig,
    #[serde(default)]
    terminal: TerminalConfig,
    #[serde(default)]
    room: Vec<RoomConfig>, // [[room]] blocks
    #[serde(default)]
    item: Vec<ItemConfig>, // [[item]] blocks
    #[serde(default)]
    entity: Vec<EntityConfig>,
    #[serde(default)]
    event: Vec<EventConfig>,
    #[serde(default)]
    interaction: Vec<InteractionConfig>,
    #[serde(default)]
    reveal: Vec<RevealConfig>,
}

#[derive(Deserialize)]
struct WorldHeader {
    id: String,
    name: String,
    start_room: String,
    capacity: u32,
    #[serde(default)]
    intro: String,
    #[serde(default = "default_farewell")]
    farewell: String,
}

#[derive(Deserialize)]
struct RoomConfig {
    name: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    exit: Vec<ExitConfig>, // [[room.exit]]
}

#[derive(Deserialize)]
struct ExitConfig {
    direction: String,
    target: String,
}

#[derive(Deserialize)]
struct ItemConfig {
    name: String,
    room: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    stack_index: Option<usize>,
}

#[derive(Deserialize)]
struct EntityConfig {
    name: String,
    room: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    hidden: bool,
}

#[derive(Deserialize)]
struct EventConfig {
    id: String,
    outcome: String,
}

#[derive(Deserialize)]
struct InteractionConfig {
    item: String,
    entity: String,
    event: String,
}

#[derive(Deserialize)]
struct RevealConfig {
    id: String,
    #[serde(default)]
    on_approach: Option<String>,
    #[serde(default)]
    after_event: Option<String>,
    #[serde(default)]
    show_items: Vec<String>,
    #[serde(default)]
    show_entities: Vec<String>,
    #[serde(default)]
    describe: BTreeMap<String, String>, // entity name -> new description
    /// Keep `describe` text exactly as written (line breaks and indentation).
    #[serde(default)]
    verbatim: bool,
}

#[derive(Deserialize, Default)]
struct RulesConfig {
    #[serde(default)]
    unlock_item: String,
    #[serde(default)]
    locked_doors_text: String,
    #[serde(default)]
    forbidden_item: String,
    #[serde(default)]
    forbidden_text: String,
    #[serde(default)]
    challenge_event: String,
    #[serde(default)]
    collapse_text: String,
    #[serde(default)]
    stack_drop_text: String,
}

#[derive(Deserialize)]
struct PasswordConfig {
    #[serde(default)]
    entity: String,
    #[serde(default)]
    secret: String,
    #[serde(default = "default_attempts")]
    attempts: u32,
    #[serde(default)]
    unlock_event: String,
    #[serde(default)]
    wrong_text: String,
    #[serde(default)]
    prompt_text: String,
    #[serde(default)]
    locked_text: String,
}

#[derive(Deserialize, Default)]
struct TerminalConfig {
    #[serde(default)]
    entity: String,
    #[serde(default)]
    first_command: String,
    #[serde(default)]
    final_command: String,
    #[serde(default)]
    hint_text: String,
    #[serde(default)]
    progress_desc: String,
    #[serde(default)]
    victory_text: String,
    #[serde(default)]
    not_found_text: String,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        PasswordConfig {
            entity: String::new(),
            secret: String::new(),
            attempts: default_attempts(),
            unlock_event: String::new(),
            wrong_text: String::new(),
            prompt_text: String::new(),
            locked_text: String::new(),
        }
    }
}

fn default_farewell() -> String {
    "Thank you for playing!".to_string()
}

fn default_attempts() -> u32 {
    3
}

/////////////////////////////
/// TOML PARSER FUNCTIONS ///
/////////////////////////////

/// The bundled academy world, parsed once per process. Sessions clone it.
pub fn academy() -> Result<&'static World, LoadError> {
    ACADEMY.get_or_try_init(|| load_world_from_str(ACADEMY_TOML))
}

/// Public API: load a world from a .toml file on disk.
pub fn load_world_from_file(path: &Path) -> Result<World, LoadError> {
    let contents = fs::read_to_string(path)?;
    load_world_from_str(&contents)
}

pub fn load_world_from_str(contents: &str) -> Result<World, LoadError> {
    let world_file: WorldFile = toml::from_str(contents)?;
    let world = build_world(world_file)?;

    let errors = validate_world(&world);
    if !errors.is_empty() {
        return Err(LoadError::Invalid(errors));
    }
    Ok(world)
}

fn build_world(world_file: WorldFile) -> Result<World, LoadError> {
    if world_file.world.id.trim().is_empty() {
        return Err(LoadError::Malformed("world.id may not be empty".into()));
    }
    if world_file.world.start_room.trim().is_empty() {
        return Err(LoadError::Malformed(
            "world.start_room may not be empty".into(),
        ));
    }

    let mut rooms: BTreeMap<String, Room> = BTreeMap::new();
    for rc in world_file.room {
        if rooms.contains_key(&rc.name) {
            return Err(LoadError::Malformed(format!("Duplicate room: {}", rc.name)));
        }
        let exits = rc
            .exit
            .into_iter()
            .map(|e| Exit {
                direction: e.direction.trim().to_lowercase(),
                target: e.target,
            })
            .collect();
        rooms.insert(
            rc.name.clone(),
            Room {
                name: rc.name,
                desc: normalize_multiline_desc(&rc.desc),
                exits,
            },
        );
    }

    let mut items: BTreeMap<String, Item> = BTreeMap::new();
    for ic in world_file.item {
        if items.contains_key(&ic.name) {
            return Err(LoadError::Malformed(format!("Duplicate item: {}", ic.name)));
        }
        items.insert(
            ic.name.clone(),
            Item {
                name: ic.name,
                desc: normalize_multiline_desc(&ic.desc),
                weight: ic.weight,
                hidden: ic.hidden,
                stack_index: ic.stack_index,
                location: ItemLocation::Room(ic.room),
            },
        );
    }

    for item in items.values().filter(|i| i.weight > world_file.world.capacity) {
        tracing::warn!(
            item = %item.name,
            weight = item.weight,
            capacity = world_file.world.capacity,
            "item is heavier than the player can ever carry"
        );
    }

    let mut entities: BTreeMap<String, Entity> = BTreeMap::new();
    for ec in world_file.entity {
        if entities.contains_key(&ec.name) || items.contains_key(&ec.name) {
            return Err(LoadError::Malformed(format!(
                "Duplicate entity: {}",
                ec.name
            )));
        }
        entities.insert(
            ec.name.clone(),
            Entity {
                name: ec.name,
                desc: normalize_multiline_desc(&ec.desc),
                hidden: ec.hidden,
                room: ec.room,
            },
        );
    }

    let mut events: Vec<Event> = Vec::new();
    for ev in world_file.event {
        if events.iter().any(|e| e.id == ev.id) {
            return Err(LoadError::Malformed(format!("Duplicate event: {}", ev.id)));
        }
        events.push(Event::new(ev.id, normalize_multiline_desc(&ev.outcome)));
    }

    let mut interactions: Vec<Interaction> = Vec::new();
    for ic in world_file.interaction {
        if interactions
            .iter()
            .any(|i| i.item == ic.item && i.entity == ic.entity)
        {
            return Err(LoadError::Malformed(format!(
                "Duplicate interaction: {} on {}",
                ic.item, ic.entity
            )));
        }
        interactions.push(Interaction {
            item: ic.item,
            entity: ic.entity,
            event: ic.event,
        });
    }

    let mut reveals: Vec<Reveal> = Vec::new();
    for rc in world_file.reveal {
        // Fired reveals are remembered by id, so a reused id would never fire.
        if reveals.iter().any(|r| r.id == rc.id) {
            return Err(LoadError::Malformed(format!("Duplicate reveal: {}", rc.id)));
        }
        reveals.push(build_reveal(rc)?);
    }

    let rules = world_file.rules;
    let password = world_file.password;
    let terminal = world_file.terminal;

    Ok(World {
        id: world_file.world.id,
        name: world_file.world.name,
        intro: normalize_multiline_desc(&world_file.world.intro),
        farewell: normalize_multiline_desc(&world_file.world.farewell),
        start_room: world_file.world.start_room,
        capacity: world_file.world.capacity,
        rooms,
        items,
        entities,
        registry: Registry::new(events, interactions),
        reveals,
        rules: Rules {
            unlock_item: rules.unlock_item,
            locked_doors_text: normalize_multiline_desc(&rules.locked_doors_text),
            forbidden_item: rules.forbidden_item,
            forbidden_text: normalize_multiline_desc(&rules.forbidden_text),
            challenge_event: rules.challenge_event,
            collapse_text: normalize_multiline_desc(&rules.collapse_text),
            stack_drop_text: normalize_multiline_desc(&rules.stack_drop_text),
        },
        password: PasswordLock {
            entity: password.entity,
            secret: password.secret.trim().to_lowercase(),
            attempts: password.attempts,
            unlock_event: password.unlock_event,
            wrong_text: normalize_multiline_desc(&password.wrong_text),
            prompt_text: normalize_multiline_desc(&password.prompt_text),
            locked_text: normalize_multiline_desc(&password.locked_text),
        },
        terminal: TerminalPuzzle {
            entity: terminal.entity,
            first_command: terminal.first_command.trim().to_lowercase(),
            final_command: terminal.final_command.trim().to_lowercase(),
            hint_text: normalize_multiline_desc(&terminal.hint_text),
            progress_desc: normalize_multiline_desc(&terminal.progress_desc),
            victory_text: normalize_multiline_desc(&terminal.victory_text),
            not_found_text: normalize_multiline_desc(&terminal.not_found_text),
        },
    })
}

fn build_reveal(rc: RevealConfig) -> Result<Reveal, LoadError> {
    let trigger = match (rc.on_approach, rc.after_event) {
        (Some(entity), None) => RevealTrigger::Approach(entity),
        (None, Some(event)) => RevealTrigger::Event(event),
        _ => {
            return Err(LoadError::Malformed(format!(
                "reveal '{}' needs exactly one of on_approach or after_event",
                rc.id
            )));
        }
    };

    Ok(Reveal {
        id: rc.id,
        trigger,
        show_items: rc.show_items,
        show_entities: rc.show_entities,
        describe: rc
            .describe
            .into_iter()
            .map(|(entity, text)| {
                let text = if rc.verbatim {
                    text.trim_matches('\n').to_string()
                } else {
                    normalize_multiline_desc(&text)
                };
                (entity, text)
            })
            .collect(),
    })
}

/// Wrapped lines join with a space, one blank line becomes a newline and two or
/// more become a paragraph break. Indentation inside the TOML is dropped.
fn normalize_multiline_desc(raw: &str) -> String {
    let mut result = String::new();
    let mut pending_blank_lines = 0usize;
    let mut first_text_seen = false;

    for line in raw.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            pending_blank_lines += 1;
            continue;
        }

        if !first_text_seen {
            result.push_str(trimmed);
            first_text_seen = true;
        } else {
            match pending_blank_lines {
                0 => {
                    result.push(' ');
                    result.push_str(trimmed);
                }
                1 => {
                    result.push('\n');
                    result.push_str(trimmed);
                }
                _ => {
                    result.push_str("\n\n");
                    result.push_str(trimmed);
                }
            }
        }

        pending_blank_lines = 0;
    }

    result
}
