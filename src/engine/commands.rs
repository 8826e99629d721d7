use crate::Game;
use crate::engine::dialogue::Mode;
use crate::engine::output::Output;
use crate::engine::player::Take;
use crate::engine::render::{show_commands, show_inventory, show_map, show_room};
use crate::engine::turn::{Ending, TurnInput};

type Handler = fn(&mut Game, &TurnInput, &mut Output);

/// Target used by `use` when nothing is approached; never an entity name.
const NO_TARGET: &str = "unspecified-entity";

const COMMANDS: &[(&str, Handler)] = &[
    ("look", look),
    ("exit", exit),
    ("commands", commands),
    ("take", take),
    ("drop", drop_item),
    ("inventory", inventory),
    ("approach", approach),
    ("use", use_item),
    ("leave", leave),
    ("move", move_to),
    ("map", map),
];

/// Resolve the verb and run its handler.
pub fn dispatch(game: &mut Game, input: &TurnInput, out: &mut Output) {
    let verb = input.command.trim();

    match COMMANDS.iter().find(|(name, _)| *name == verb) {
        Some((_, handler)) => handler(game, input, out),
        None => out.say(format!("Unknown command: {}", verb)),
    }
}

pub fn verbs() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|(name, _)| *name)
}

fn look(game: &mut Game, _input: &TurnInput, out: &mut Output) {
    show_room(out, &game.world, &game.player);
}

fn exit(game: &mut Game, _input: &TurnInput, out: &mut Output) {
    out.say(game.world.farewell.clone());
    game.end(Ending::Quit);
}

fn commands(_game: &mut Game, _input: &TurnInput, out: &mut Output) {
    show_commands(out);
}

fn take(game: &mut Game, input: &TurnInput, out: &mut Output) {
    let Some(name) = input.first_arg() else {
        out.say("Specify an item to take.");
        return;
    };

    if game.player.take(out, &mut game.world, name) == Take::Collapsed {
        game.end(Ending::Lost);
    }
}

fn drop_item(game: &mut Game, input: &TurnInput, out: &mut Output) {
    match input.first_arg() {
        Some(name) => {
            game.player.drop_item(out, &mut game.world, name);
        }
        None => out.say("Specify an item to drop."),
    }
}

fn inventory(game: &mut Game, _input: &TurnInput, out: &mut Output) {
    show_inventory(out, &game.world, &game.player);
}

fn approach(game: &mut Game, input: &TurnInput, out: &mut Output) {
    let Some(name) = input.first_arg() else {
        out.say("Specify an entity to approach.");
        return;
    };

    if !game.player.approach(out, &game.world, name) {
        return;
    }

    let password = &game.world.password;
    if !password.entity.is_empty()
        && game.player.is_engaged_with(&password.entity)
        && !game.world.registry.is_triggered(&password.unlock_event)
    {
        game.set_mode(Mode::Password);
    } else if !game.world.terminal.entity.is_empty()
        && game.player.is_engaged_with(&game.world.terminal.entity)
    {
        game.set_mode(Mode::Terminal(game.terminal_progress));
    }
}

fn use_item(game: &mut Game, input: &TurnInput, out: &mut Output) {
    let Some(item) = input.first_arg() else {
        out.say("Specify an item to use.");
        return;
    };

    let target = game.player.engaged.clone().unwrap_or_else(|| NO_TARGET.to_string());
    game.player.use_item(out, &mut game.world, item, &target);
}

fn leave(game: &mut Game, _input: &TurnInput, out: &mut Output) {
    game.player.leave(out, &game.world);
}

fn move_to(game: &mut Game, input: &TurnInput, out: &mut Output) {
    let unlock_item = &game.world.rules.unlock_item;
    if !unlock_item.is_empty() && !game.world.carries(unlock_item) {
        out.say(game.world.rules.locked_doors_text.clone());
        return;
    }

    match input.first_arg() {
        Some(direction) => {
            game.player.move_to(out, &game.world, direction);
        }
        None => out.say("Specify a direction to move (e.g., north)."),
    }
}

fn map(game: &mut Game, _input: &TurnInput, out: &mut Output) {
    show_map(out, &game.world, &game.player);
}
