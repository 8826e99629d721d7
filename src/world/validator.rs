use std::collections::BTreeSet;

use super::model::{ItemLocation, RevealTrigger, World};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

/// Cross-reference check of a freshly built world. Returns every problem found,
/// not just the first.
pub fn validate_world(world: &World) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    if world.rooms.is_empty() {
        errors.push(ValidationError::new("world has no rooms"));
    }

    if !world.rooms.contains_key(&world.start_room) {
        errors.push(ValidationError::new(format!(
            "start_room '{}' not found among rooms",
            world.start_room
        )));
    }

    for (room_name, room) in &world.rooms {
        for exit in &room.exits {
            if !world.rooms.contains_key(&exit.target) {
                errors.push(ValidationError::new(format!(
                    "room '{}' exit '{}' targets missing room '{}'",
                    room_name, exit.direction, exit.target
                )));
            }
        }
    }

    for item in world.items.values() {
        if let ItemLocation::Room(r) = &item.location {
            if !world.rooms.contains_key(r) {
                errors.push(ValidationError::new(format!(
                    "item '{}' room '{}' not found",
                    item.name, r
                )));
            }
        }
    }

    for entity in world.entities.values() {
        if !world.rooms.contains_key(&entity.room) {
            errors.push(ValidationError::new(format!(
                "entity '{}' room '{}' not found",
                entity.name, entity.room
            )));
        }
    }

    validate_stack(world, &mut errors);

    for interaction in world.registry.interactions() {
        if !world.items.contains_key(&interaction.item) {
            errors.push(ValidationError::new(format!(
                "interaction '{} on {}' references missing item '{}'",
                interaction.item, interaction.entity, interaction.item
            )));
        }
        if !world.entities.contains_key(&interaction.entity) {
            errors.push(ValidationError::new(format!(
                "interaction '{} on {}' references missing entity '{}'",
                interaction.item, interaction.entity, interaction.entity
            )));
        }
        if world.registry.event(&interaction.event).is_none() {
            errors.push(ValidationError::new(format!(
                "interaction '{} on {}' references missing event '{}'",
                interaction.item, interaction.entity, interaction.event
            )));
        }
    }

    for reveal in &world.reveals {
        match &reveal.trigger {
            RevealTrigger::Approach(entity) if !world.entities.contains_key(entity) => {
                errors.push(ValidationError::new(format!(
                    "reveal '{}' waits for missing entity '{}'",
                    reveal.id, entity
                )));
            }
            RevealTrigger::Event(event) if world.registry.event(event).is_none() => {
                errors.push(ValidationError::new(format!(
                    "reveal '{}' waits for missing event '{}'",
                    reveal.id, event
                )));
            }
            _ => {}
        }
        for name in &reveal.show_items {
            if !world.items.contains_key(name) {
                errors.push(ValidationError::new(format!(
                    "reveal '{}' shows missing item '{}'",
                    reveal.id, name
                )));
            }
        }
        for name in reveal.show_entities.iter().chain(reveal.describe.keys()) {
            if !world.entities.contains_key(name) {
                errors.push(ValidationError::new(format!(
                    "reveal '{}' references missing entity '{}'",
                    reveal.id, name
                )));
            }
        }
    }

    validate_rules(world, &mut errors);

    errors
}

fn validate_stack(world: &World, errors: &mut Vec<ValidationError>) {
    let unique: BTreeSet<usize> = world
        .items
        .values()
        .filter_map(|item| item.stack_index)
        .collect();

    if unique.len() != world.stack_len() {
        errors.push(ValidationError::new("stack_index values must be unique"));
    }
    if unique.iter().copied().ne(0..unique.len()) {
        errors.push(ValidationError::new(
            "stack_index values must run 0, 1, 2, ... without gaps",
        ));
    }
}

fn validate_rules(world: &World, errors: &mut Vec<ValidationError>) {
    let rules = &world.rules;
    for (field, name) in [
        ("rules.unlock_item", &rules.unlock_item),
        ("rules.forbidden_item", &rules.forbidden_item),
    ] {
        if !name.is_empty() && !world.items.contains_key(name) {
            errors.push(ValidationError::new(format!(
                "{} references missing item '{}'",
                field, name
            )));
        }
    }
    if !rules.challenge_event.is_empty() && world.registry.event(&rules.challenge_event).is_none()
    {
        errors.push(ValidationError::new(format!(
            "rules.challenge_event references missing event '{}'",
            rules.challenge_event
        )));
    }

    let password = &world.password;
    if !password.entity.is_empty() {
        if !world.entities.contains_key(&password.entity) {
            errors.push(ValidationError::new(format!(
                "password.entity references missing entity '{}'",
                password.entity
            )));
        }
        if world.registry.event(&password.unlock_event).is_none() {
            errors.push(ValidationError::new(format!(
                "password.unlock_event references missing event '{}'",
                password.unlock_event
            )));
        }
        if password.secret.is_empty() {
            errors.push(ValidationError::new("password.secret may not be empty"));
        }
        if password.attempts == 0 {
            errors.push(ValidationError::new("password.attempts must be at least 1"));
        }
    }

    let terminal = &world.terminal;
    if !terminal.entity.is_empty() {
        if !world.entities.contains_key(&terminal.entity) {
            errors.push(ValidationError::new(format!(
                "terminal.entity references missing entity '{}'",
                terminal.entity
            )));
        }
        if terminal.first_command.is_empty() || terminal.final_command.is_empty() {
            errors.push(ValidationError::new(
                "terminal needs both first_command and final_command",
            ));
        }
    }
}
