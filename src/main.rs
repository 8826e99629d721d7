use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use academy_escape::engine::TurnOutput;
use academy_escape::{Game, load_world_from_file};

#[derive(Parser)]
#[command(
    name = "academy-escape",
    about = "Escape the Academy: a text adventure played one command at a time",
    version
)]
struct Cli {
    /// Play a different world file instead of the bundled academy
    #[arg(short, long)]
    world: Option<PathBuf>,

    /// Print every turn as one JSON object per line
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    // Story goes to stdout; logs stay on stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn flush_output(turn: &TurnOutput, json: bool) -> io::Result<()> {
    let mut stdout = io::stdout().lock();

    if json {
        let line = serde_json::to_string(turn).map_err(io::Error::other)?;
        writeln!(stdout, "{}", line)?;
    } else if !turn.message.is_empty() {
        writeln!(stdout, "\n{}\n", turn.message)?;
    }
    stdout.flush()
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let game = match &cli.world {
        Some(path) => load_world_from_file(path).map(Game::from_world),
        None => Game::new(),
    };
    let mut game = match game {
        Ok(game) => game,
        Err(e) => {
            tracing::error!(error = %e, "failed to load world");
            eprintln!("Failed to load world: {e}");
            process::exit(1);
        }
    };

    if !cli.json {
        println!("Welcome to {}!", game.world().name);
    }
    flush_output(&game.step_line("start"), cli.json)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if !cli.json {
            print!("> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let turn = game.step_line(&line);
        flush_output(&turn, cli.json)?;

        if turn.game_over {
            break;
        }
    }

    Ok(())
}
