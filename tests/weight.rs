use proptest::prelude::*;

use academy_escape::academy;
use academy_escape::engine::{Output, Player};
use academy_escape::world::World;

const ITEMS: &[&str] = &[
    "tea",
    "lanyard",
    "cd",
    "first-plate",
    "second-plate",
    "third-plate",
    "fourth-plate",
    "missing",
];

#[derive(Debug, Clone)]
enum Op {
    Take(usize),
    Drop(usize),
    Move(bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ITEMS.len()).prop_map(Op::Take),
        (0..ITEMS.len()).prop_map(Op::Drop),
        any::<bool>().prop_map(Op::Move),
    ]
}

/// The academy with everything in view and the player in the coding lab, so
/// every take can at least be attempted.
fn open_world() -> (World, Player) {
    let mut world = academy().expect("bundled world loads").clone();
    let names: Vec<String> = world.items.keys().cloned().collect();
    for name in &names {
        world.reveal(name);
    }
    let mut player = Player::new(&world);
    player.room = "coding-lab".into();
    (world, player)
}

proptest! {
    #[test]
    fn carried_plus_available_is_always_capacity(ops in proptest::collection::vec(op(), 0..40)) {
        let (mut world, mut player) = open_world();
        let capacity = world.capacity;

        for op in ops {
            let mut out = Output::new();
            match op {
                Op::Take(i) => { player.take(&mut out, &mut world, ITEMS[i]); }
                Op::Drop(i) => { player.drop_item(&mut out, &mut world, ITEMS[i]); }
                Op::Move(north) => {
                    let dir = if north { "north" } else { "south" };
                    player.move_to(&mut out, &world, dir);
                }
            }

            prop_assert_eq!(player.capacity(), capacity);
            let held: u32 = world.inventory().map(|item| item.weight).sum();
            prop_assert_eq!(held, player.carried);
        }
    }

    #[test]
    fn stack_cursor_only_moves_forward(takes in proptest::collection::vec(3usize..7, 1..10)) {
        let (mut world, mut player) = open_world();
        let mut last = player.next_stack;

        for i in takes {
            player.take(&mut Output::new(), &mut world, ITEMS[i.min(ITEMS.len() - 2)]);
            prop_assert!(player.next_stack >= last);
            last = player.next_stack;
        }
    }
}
