use std::collections::BTreeSet;

use crate::world::{Reveal, RevealTrigger, World};

/// Apply every reveal whose trigger currently holds and that has not fired yet.
/// Approach reveals key off the entity the player is engaged with at the start
/// of the turn; event reveals off the registry.
pub fn evaluate_reveals(world: &mut World, engaged: Option<&str>, fired: &mut BTreeSet<String>) {
    let due: Vec<Reveal> = world
        .reveals
        .iter()
        .filter(|r| !fired.contains(&r.id))
        .filter(|r| match &r.trigger {
            RevealTrigger::Approach(entity) => engaged == Some(entity.as_str()),
            RevealTrigger::Event(event) => world.registry.is_triggered(event),
        })
        .cloned()
        .collect();

    for reveal in due {
        apply(world, &reveal);
        fired.insert(reveal.id);
    }
}

/// Trigger an event and immediately run the reveals bound to it, so the world
/// the player sees next already reflects the outcome.
pub fn trigger_with_reveals(
    world: &mut World,
    fired: &mut BTreeSet<String>,
    event: &str,
) -> Option<String> {
    let outcome = world.registry.trigger(event)?;

    let due: Vec<Reveal> = world
        .reveals
        .iter()
        .filter(|r| !fired.contains(&r.id))
        .filter(|r| matches!(&r.trigger, RevealTrigger::Event(e) if e == event))
        .cloned()
        .collect();

    for reveal in due {
        apply(world, &reveal);
        fired.insert(reveal.id);
    }

    Some(outcome)
}

/// True once every interaction that consumes a stack item has fired.
pub fn stack_loaded(world: &World) -> bool {
    let mut stack_events = world
        .registry
        .interactions()
        .iter()
        .filter(|i| world.items.get(&i.item).is_some_and(|item| item.is_stacked()))
        .peekable();

    stack_events.peek().is_some() && stack_events.all(|i| world.registry.is_triggered(&i.event))
}

fn apply(world: &mut World, reveal: &Reveal) {
    tracing::debug!(reveal = %reveal.id, "reveal applied");

    for name in reveal.show_items.iter().chain(&reveal.show_entities) {
        world.reveal(name);
    }
    for (entity, text) in &reveal.describe {
        world.describe(entity, text.clone());
    }
}
