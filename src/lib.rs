pub mod engine;
pub mod world;

use std::collections::BTreeSet;

use engine::{
    Ending, Mode, Output, PasswordOutcome, Player, TerminalOutcome, TerminalStage, TurnInput,
    TurnOutput, dispatch, evaluate_reveals, fill, password_turn, stack_loaded, terminal_turn,
    trigger_with_reveals,
};
use world::{LoadError, World};

pub use world::{academy, load_world_from_file, load_world_from_str};

/// One player's session: a private copy of the world plus everything the
/// narrative needs to remember between turns.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) world: World,
    pub(crate) player: Player,
    pub(crate) mode: Mode,
    /// Furthest terminal stage reached; re-approaching the terminal resumes here.
    pub(crate) terminal_progress: TerminalStage,
    pub(crate) attempts_left: u32,
    pub(crate) intro_shown: bool,
    pub(crate) fired_reveals: BTreeSet<String>,
    pub(crate) ending: Option<Ending>,
}

#[cfg(feature = "wasm")]
mod wasm_bindings {
    use super::*;
    use serde_wasm_bindgen::to_value;
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    pub struct WasmGame {
        game: Game,
    }

    #[wasm_bindgen]
    impl WasmGame {
        /// Start a fresh session on the bundled academy world.
        #[wasm_bindgen(constructor)]
        pub fn new() -> Result<WasmGame, JsValue> {
            let game = Game::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(WasmGame { game })
        }

        /// Play one typed line; returns `{ message, game_over }`.
        #[wasm_bindgen]
        pub fn step(&mut self, line: &str) -> JsValue {
            let result = self.game.step_line(line);
            to_value(&result).unwrap_or(JsValue::NULL)
        }

        /// Play one pre-tokenised turn, the shape a web transport posts.
        #[wasm_bindgen]
        pub fn submit(&mut self, command: &str, args: Vec<String>) -> JsValue {
            let result = self.game.step(&TurnInput {
                command: command.to_string(),
                args,
            });
            to_value(&result).unwrap_or(JsValue::NULL)
        }
    }
}

impl Game {
    /// A new session on the bundled academy world.
    pub fn new() -> Result<Self, LoadError> {
        Ok(Game::from_world(academy()?.clone()))
    }

    pub fn from_world(world: World) -> Self {
        let player = Player::new(&world);
        let attempts_left = world.password.attempts;

        Game {
            world,
            player,
            mode: Mode::Normal,
            terminal_progress: TerminalStage::Shell,
            attempts_left,
            intro_shown: false,
            fired_reveals: BTreeSet::new(),
            ending: None,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    pub fn is_over(&self) -> bool {
        self.ending.is_some()
    }

    pub fn step_line(&mut self, line: &str) -> TurnOutput {
        self.step(&TurnInput::parse(line))
    }

    /// Play one turn.
    pub fn step(&mut self, input: &TurnInput) -> TurnOutput {
        let mut out = Output::new();
        self.run_turn(&input.normalized(), &mut out);

        TurnOutput {
            message: out.message(),
            game_over: self.is_over(),
        }
    }

    fn run_turn(&mut self, input: &TurnInput, out: &mut Output) {
        // A finished session never changes again.
        if self.is_over() {
            out.say(self.world.farewell.clone());
            return;
        }

        let engaged = self.player.engaged.clone();
        evaluate_reveals(&mut self.world, engaged.as_deref(), &mut self.fired_reveals);

        if self.check_stack_challenge(out) {
            return;
        }

        if self.check_forbidden_item(out) {
            return;
        }

        if input.command == "start" && !self.intro_shown {
            self.intro_shown = true;
            out.say(self.world.intro.clone());
            return;
        }

        if input.command == "exit" {
            out.say(self.world.farewell.clone());
            self.end(Ending::Quit);
            return;
        }

        match self.mode {
            Mode::Password => {
                if self.password_input(input, out) {
                    return;
                }
            }
            Mode::Terminal(stage) => {
                self.terminal_input(stage, input, out);
                return;
            }
            Mode::Normal => {}
        }

        dispatch(self, input, out);

        if !self.is_over() && self.world.carries(&self.world.rules.forbidden_item) {
            // The forbidden text replaces whatever the pick-up said.
            *out = Output::new();
            self.check_forbidden_item(out);
        }
    }

    /// When the whole stack has been handed over, the challenge completes and
    /// that is all this turn says.
    fn check_stack_challenge(&mut self, out: &mut Output) -> bool {
        let challenge = self.world.rules.challenge_event.clone();
        if challenge.is_empty()
            || self.world.registry.is_triggered(&challenge)
            || !stack_loaded(&self.world)
        {
            return false;
        }

        match trigger_with_reveals(&mut self.world, &mut self.fired_reveals, &challenge) {
            Some(outcome) => {
                out.event(outcome);
                true
            }
            None => false,
        }
    }

    fn check_forbidden_item(&mut self, out: &mut Output) -> bool {
        let forbidden = &self.world.rules.forbidden_item;
        if forbidden.is_empty() || !self.world.carries(forbidden) {
            return false;
        }

        out.event(self.world.rules.forbidden_text.clone());
        self.end(Ending::Lost);
        true
    }

    /// Returns false when the line should go on to the dispatcher (`leave`).
    fn password_input(&mut self, input: &TurnInput, out: &mut Output) -> bool {
        let line = input.line();

        match password_turn(&self.world.password, self.attempts_left, &line) {
            PasswordOutcome::Unlocked => {
                self.set_mode(Mode::Normal);
                let event = self.world.password.unlock_event.clone();
                if let Some(outcome) =
                    trigger_with_reveals(&mut self.world, &mut self.fired_reveals, &event)
                {
                    out.event(outcome);
                }
                true
            }
            PasswordOutcome::Left => {
                self.set_mode(Mode::Normal);
                false
            }
            PasswordOutcome::Wrong { remaining } => {
                self.attempts_left = remaining;
                let lock = &self.world.password;
                let prompt = fill(&lock.prompt_text, "remaining", remaining);
                out.say(fill(&lock.wrong_text, "remaining", remaining));
                let entity = lock.entity.clone();
                self.world.describe(&entity, prompt);
                true
            }
            PasswordOutcome::LockedOut => {
                self.attempts_left = 0;
                out.event(self.world.password.locked_text.clone());
                self.end(Ending::Lost);
                true
            }
        }
    }

    fn terminal_input(&mut self, stage: TerminalStage, input: &TurnInput, out: &mut Output) {
        let line = input.line();
        let puzzle = &self.world.terminal;

        match terminal_turn(puzzle, stage, &line) {
            TerminalOutcome::Left => {
                self.set_mode(Mode::Normal);
                self.player.leave(out, &self.world);
            }
            TerminalOutcome::Advanced => {
                out.say(puzzle.hint_text.clone());
                let (entity, desc) = (puzzle.entity.clone(), puzzle.progress_desc.clone());
                self.terminal_progress = TerminalStage::SecretFiles;
                self.set_mode(Mode::Terminal(TerminalStage::SecretFiles));
                if !desc.is_empty() {
                    self.world.describe(&entity, desc);
                }
            }
            TerminalOutcome::Escaped => {
                out.event(puzzle.victory_text.clone());
                self.end(Ending::Won);
            }
            TerminalOutcome::NotFound => {
                out.say(fill(&puzzle.not_found_text, "input", &line));
            }
        }
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "mode changed");
            self.mode = mode;
        }
    }

    pub(crate) fn end(&mut self, ending: Ending) {
        if self.ending.is_none() {
            tracing::info!(world = %self.world.name, ending = ?ending, "session ended");
            self.ending = Some(ending);
            self.mode = Mode::Normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut Game, lines: &[&str]) -> TurnOutput {
        let mut last = TurnOutput::default();
        for line in lines {
            last = game.step_line(line);
        }
        last
    }

    #[test]
    fn start_shows_the_introduction_once() {
        let mut game = Game::new().expect("academy loads");
        let first = game.step_line("start");
        assert!(first.message.starts_with("It's the last day at the Academy"));
        assert!(!first.game_over);

        let second = game.step_line("start");
        assert_eq!(second.message, "Unknown command: start");
    }

    #[test]
    fn finished_sessions_only_say_goodbye() {
        let mut game = Game::new().expect("academy loads");
        let out = game.step_line("exit");
        assert_eq!(out.message, "Thank you for playing!");
        assert!(out.game_over);
        assert_eq!(game.ending(), Some(Ending::Quit));

        let before = game.player().clone();
        let after = game.step_line("approach kettle");
        assert_eq!(after.message, "Thank you for playing!");
        assert!(after.game_over);
        assert_eq!(game.player(), &before);
        assert!(game.world().items["tea"].hidden);
    }

    #[test]
    fn password_is_only_checked_at_the_computer() {
        let mut game = Game::new().expect("academy loads");
        let out = game.step_line("iiwsccrtc");
        assert_eq!(out.message, "Unknown command: iiwsccrtc");
        assert!(!game.world().registry.is_triggered("computer-is-unlocked"));
    }

    #[test]
    fn wrong_guesses_rewrite_the_computer_prompt() {
        let mut game = Game::new().expect("academy loads");
        game.player.room = "coding-lab".into();
        play(&mut game, &["approach computer"]);
        assert_eq!(game.mode(), Mode::Password);

        let out = game.step_line("waterfall");
        assert_eq!(out.message, "Incorrect password. Remaining attempts: 9");
        assert_eq!(game.attempts_left(), 9);
        assert!(
            game.world()
                .description("computer")
                .is_some_and(|d| d.contains("Remaining attempts: 9."))
        );
    }

    #[test]
    fn leaving_the_password_prompt_never_costs_an_attempt() {
        let mut game = Game::new().expect("academy loads");
        game.player.room = "coding-lab".into();
        game.attempts_left = 1;
        play(&mut game, &["approach computer"]);

        let out = game.step_line("leave");
        assert!(out.message.starts_with("You are in coding-lab"));
        assert!(!out.game_over);
        assert_eq!(game.mode(), Mode::Normal);
        assert_eq!(game.player().engaged, None);
    }

    #[test]
    fn terminal_progress_survives_leaving() {
        let mut game = Game::new().expect("academy loads");
        game.player.room = "terminal-room".into();
        game.world.reveal("terminal");

        play(&mut game, &["approach terminal", "cd /secret-files", "leave"]);
        assert_eq!(game.mode(), Mode::Normal);

        play(&mut game, &["approach terminal"]);
        assert_eq!(game.mode(), Mode::Terminal(TerminalStage::SecretFiles));

        let out = game.step_line("cat unlock-exits-instructions.txt");
        assert!(out.game_over);
        assert_eq!(game.ending(), Some(Ending::Won));
    }

    #[test]
    fn unknown_shell_commands_are_echoed() {
        let mut game = Game::new().expect("academy loads");
        game.player.room = "terminal-room".into();
        game.world.reveal("terminal");

        play(&mut game, &["approach terminal"]);
        let out = game.step_line("ls -la");
        assert_eq!(out.message, "bash: ls -la: command not found");
        assert!(!out.game_over);
    }
}
