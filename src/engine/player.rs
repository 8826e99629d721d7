use crate::engine::output::Output;
use crate::engine::render::show_room;
use crate::world::{ItemLocation, World};

/// Where the player stands, what they are engaged with and how much more they
/// can carry. The items themselves stay in `World::items`; carrying one just
/// means its location is `Inventory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub room: String,
    pub engaged: Option<String>,
    pub carried: u32,
    pub available: u32,
    /// Index of the next stack item that may be taken safely.
    pub next_stack: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Take {
    Refused,
    Taken,
    Collapsed,
}

impl Player {
    pub fn new(world: &World) -> Self {
        Player {
            room: world.start_room.clone(),
            engaged: None,
            carried: 0,
            available: world.capacity,
            next_stack: 0,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.carried + self.available
    }

    pub fn is_engaged_with(&self, entity: &str) -> bool {
        self.engaged.as_deref() == Some(entity)
    }

    /// Any move drops the current engagement, even one that goes nowhere.
    pub fn move_to(&mut self, out: &mut Output, world: &World, direction: &str) -> bool {
        self.engaged = None;

        match world.exit_target(&self.room, direction) {
            Some(target) => {
                self.room = target.to_string();
                out.say(format!("You are in {}", self.room));
                true
            }
            None => {
                out.say("You can't go that way!");
                false
            }
        }
    }

    pub fn take(&mut self, out: &mut Output, world: &mut World, name: &str) -> Take {
        let Some(item) = world.visible_item_in(&self.room, name) else {
            out.say(format!("You can't take {}", name));
            return Take::Refused;
        };

        if item.weight > self.available {
            out.say("Weight limit reached! Please drop an item before taking more.");
            return Take::Refused;
        }

        if let Some(index) = item.stack_index {
            if index != self.next_stack {
                tracing::debug!(item = %name, index, expected = self.next_stack, "stack collapsed");
                out.say(world.rules.collapse_text.clone());
                return Take::Collapsed;
            }
            self.next_stack += 1;
        }

        let weight = item.weight;
        if let Some(item) = world.items.get_mut(name) {
            item.location = ItemLocation::Inventory;
        }
        self.carried += weight;
        self.available -= weight;

        out.say(format!("{} has been added to your inventory.", name));
        Take::Taken
    }

    pub fn drop_item(&mut self, out: &mut Output, world: &mut World, name: &str) -> bool {
        let Some(item) = world
            .items
            .get_mut(name)
            .filter(|item| item.location == ItemLocation::Inventory)
        else {
            out.say(format!("You don't have {}.", name));
            return false;
        };

        // Stack items only ever move forward: into the player's hands, then into use.
        if item.is_stacked() {
            out.say(world.rules.stack_drop_text.clone());
            return false;
        }

        item.location = ItemLocation::Room(self.room.clone());
        self.carried -= item.weight;
        self.available += item.weight;

        out.say(format!("You dropped {}.", name));
        true
    }

    pub fn approach(&mut self, out: &mut Output, world: &World, name: &str) -> bool {
        self.engaged = None;

        match world.visible_entity_in(&self.room, name) {
            Some(entity) => {
                self.engaged = Some(entity.name.clone());
                out.say(entity.desc.clone());
                true
            }
            None => {
                out.say(format!("You can't approach {}.", name));
                false
            }
        }
    }

    pub fn leave(&mut self, out: &mut Output, world: &World) {
        if self.engaged.take().is_some() {
            show_room(out, world, self);
        } else {
            out.say(
                "You have not approached anything. If you wish to leave the game, use the exit command.",
            );
        }
    }

    /// Use a carried item on the engaged entity. Returns the id of the event it
    /// set off; nothing changes when no interaction matches.
    pub fn use_item(
        &mut self,
        out: &mut Output,
        world: &mut World,
        item_name: &str,
        target: &str,
    ) -> Option<String> {
        let Some(engaged) = self.engaged.as_deref() else {
            out.say("Approach to use an item.");
            return None;
        };

        if engaged != target {
            out.say(format!("{} not found.", target));
            return None;
        }

        if !world.carries(item_name) {
            out.say(format!("You don't have {}.", item_name));
            return None;
        }

        let Some(event_id) = world
            .registry
            .find(item_name, target)
            .map(|i| i.event.clone())
        else {
            out.say(format!("You can't use {} on {}.", item_name, target));
            return None;
        };

        if let Some(item) = world.items.get_mut(item_name) {
            item.location = ItemLocation::Consumed;
            self.carried -= item.weight;
            self.available += item.weight;
        }

        if let Some(outcome) = world.registry.trigger(&event_id) {
            out.event(outcome);
        }
        Some(event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::fixtures::small_world;

    fn setup() -> (World, Player, Output) {
        let world = small_world();
        let player = Player::new(&world);
        (world, player, Output::new())
    }

    #[test]
    fn player_can_move_to_available_room() {
        let (world, mut player, mut out) = setup();
        assert!(player.move_to(&mut out, &world, "north"));
        assert_eq!(player.room, "attic");
        assert_eq!(out.message(), "You are in attic");
    }

    #[test]
    fn player_cannot_move_to_unavailable_room() {
        let (world, mut player, mut out) = setup();
        assert!(!player.move_to(&mut out, &world, "east"));
        assert_eq!(player.room, "hall");
        assert_eq!(out.message(), "You can't go that way!");
    }

    #[test]
    fn move_clears_engagement_even_when_blocked() {
        let (world, mut player, mut out) = setup();
        player.approach(&mut out, &world, "door");
        player.move_to(&mut out, &world, "west");
        assert_eq!(player.engaged, None);
    }

    #[test]
    fn take_moves_item_into_inventory_and_counts_weight() {
        let (mut world, mut player, mut out) = setup();
        assert_eq!(player.take(&mut out, &mut world, "lamp"), Take::Taken);

        assert!(world.carries("lamp"));
        assert!(world.visible_item_in("hall", "lamp").is_none());
        assert_eq!(player.carried, 3);
        assert_eq!(player.available, 7);
        assert_eq!(out.message(), "lamp has been added to your inventory.");
    }

    #[test]
    fn cannot_take_absent_hidden_or_unknown_items() {
        let (mut world, mut player, mut out) = setup();
        assert_eq!(player.take(&mut out, &mut world, "top"), Take::Refused);
        assert_eq!(player.take(&mut out, &mut world, "secret"), Take::Refused);
        assert_eq!(player.take(&mut out, &mut world, "unicorn"), Take::Refused);
        assert!(world.inventory().next().is_none());
        assert_eq!(player.available, 10);
        assert!(out.message().starts_with("You can't take top"));
    }

    #[test]
    fn weight_limit_refuses_heavy_items() {
        let (mut world, mut player, mut out) = setup();
        assert_eq!(player.take(&mut out, &mut world, "anvil"), Take::Refused);
        assert!(!world.carries("anvil"));
        assert!(out.message().starts_with("Weight limit reached!"));
    }

    #[test]
    fn stack_items_must_come_off_in_order() {
        let (mut world, mut player, mut out) = setup();
        player.move_to(&mut out, &world, "north");

        assert_eq!(player.take(&mut out, &mut world, "top"), Take::Taken);
        assert_eq!(player.take(&mut out, &mut world, "middle"), Take::Taken);
        assert_eq!(player.next_stack, 2);
        assert_eq!(player.take(&mut out, &mut world, "bottom"), Take::Taken);
    }

    #[test]
    fn out_of_order_stack_take_collapses() {
        let (mut world, mut player, mut out) = setup();
        player.move_to(&mut out, &world, "north");
        out = Output::new();

        assert_eq!(player.take(&mut out, &mut world, "middle"), Take::Collapsed);
        assert!(!world.carries("middle"));
        assert_eq!(player.next_stack, 0);
        assert_eq!(out.message(), "The stack crashes to the floor.");
    }

    #[test]
    fn drop_returns_item_to_current_room() {
        let (mut world, mut player, mut out) = setup();
        player.take(&mut out, &mut world, "badge");
        player.move_to(&mut out, &world, "north");

        assert!(player.drop_item(&mut out, &mut world, "badge"));
        assert!(world.visible_item_in("attic", "badge").is_some());
        assert_eq!(player.carried, 0);
        assert_eq!(player.available, 10);
    }

    #[test]
    fn cannot_drop_what_is_not_carried() {
        let (mut world, mut player, mut out) = setup();
        assert!(!player.drop_item(&mut out, &mut world, "lamp"));
        assert!(world.visible_item_in("hall", "lamp").is_some());
        assert_eq!(out.message(), "You don't have lamp.");
    }

    #[test]
    fn stack_items_cannot_be_dropped() {
        let (mut world, mut player, mut out) = setup();
        player.move_to(&mut out, &world, "north");
        player.take(&mut out, &mut world, "top");
        out = Output::new();

        assert!(!player.drop_item(&mut out, &mut world, "top"));
        assert!(world.carries("top"));
        assert_eq!(player.carried, 2);
        assert_eq!(out.message(), "Those stay with you.");
    }

    #[test]
    fn approach_engages_visible_entities_only() {
        let (world, mut player, mut out) = setup();
        assert!(player.approach(&mut out, &world, "door"));
        assert_eq!(player.engaged.as_deref(), Some("door"));

        assert!(!player.approach(&mut out, &world, "ghost"));
        assert_eq!(player.engaged, None);

        assert!(!player.approach(&mut out, &world, "owl"));
        assert_eq!(player.engaged, None);
    }

    #[test]
    fn new_engagement_replaces_the_former() {
        let (mut world, mut player, mut out) = setup();
        world.reveal("ghost");
        player.approach(&mut out, &world, "door");
        player.approach(&mut out, &world, "ghost");
        assert_eq!(player.engaged.as_deref(), Some("ghost"));
    }

    #[test]
    fn leave_disengages_and_shows_room() {
        let (world, mut player, mut out) = setup();
        player.approach(&mut out, &world, "door");
        out = Output::new();

        player.leave(&mut out, &world);
        assert_eq!(player.engaged, None);
        assert!(out.message().starts_with("You are in hall"));
    }

    #[test]
    fn leave_without_engagement_is_neutral() {
        let (world, mut player, mut out) = setup();
        player.leave(&mut out, &world);
        player.leave(&mut out, &world);
        assert_eq!(player.engaged, None);
        assert!(out.message().starts_with("You have not approached anything."));
    }

    #[test]
    fn valid_use_consumes_item_and_triggers_event() {
        let (mut world, mut player, mut out) = setup();
        player.take(&mut out, &mut world, "key");
        player.approach(&mut out, &world, "door");
        out = Output::new();

        let fired = player.use_item(&mut out, &mut world, "key", "door");
        assert_eq!(fired.as_deref(), Some("open-door"));
        assert!(world.registry.is_triggered("open-door"));
        assert_eq!(world.items["key"].location, ItemLocation::Consumed);
        assert_eq!(player.available, 10);
        assert_eq!(out.message(), "The door unlocks with a loud click.");
    }

    #[test]
    fn invalid_use_changes_nothing() {
        let (mut world, mut player, mut out) = setup();
        player.take(&mut out, &mut world, "lamp");
        player.approach(&mut out, &world, "door");
        let before = player.clone();
        out = Output::new();

        assert!(player.use_item(&mut out, &mut world, "lamp", "door").is_none());
        assert_eq!(player, before);
        assert!(world.carries("lamp"));
        assert!(world.registry.events().all(|e| !e.triggered));
        assert_eq!(out.message(), "You can't use lamp on door.");
    }

    #[test]
    fn use_requires_engagement_target_and_item() {
        let (mut world, mut player, mut out) = setup();
        player.use_item(&mut out, &mut world, "key", "unspecified-entity");
        assert_eq!(out.message(), "Approach to use an item.");

        player.approach(&mut out, &world, "door");
        out = Output::new();
        player.use_item(&mut out, &mut world, "key", "owl");
        assert_eq!(out.message(), "owl not found.");

        out = Output::new();
        player.use_item(&mut out, &mut world, "key", "door");
        assert_eq!(out.message(), "You don't have key.");
        assert!(!world.registry.is_triggered("open-door"));
    }
}
