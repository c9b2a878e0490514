use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slide_2048::advisor::external::CommandAdvisor;
use slide_2048::config::GameConfig;
use slide_2048::engine::Move;
use slide_2048::serialization;
use slide_2048::session::{GameSession, WINNING_TILE};

/// Play 2048 in the terminal.
#[derive(Parser, Debug)]
struct Args {
    /// Optional TOML configuration (spawn probability, heuristic weights).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Seed for a reproducible game; OS entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Resume from a snapshot (.json or postcard).
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,
    /// Program to ask on `c`; it reads the grid as JSON on stdin and
    /// answers with a direction on stdout.
    #[arg(long, value_name = "CMD")]
    advisor_cmd: Option<String>,
    /// Tracing filter, e.g. "warn", "debug".
    #[arg(long, default_value = "warn")]
    log: String,
}

const HELP: &str = "\
w/a/s/d  move up/left/down/right
h        hint from the local advisor
c        ask the external advisor (--advisor-cmd)
r        restart
save F   write a snapshot to F
load F   read a snapshot from F
q        quit";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(args.log.clone()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => GameConfig::from_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = GameSession::new(rng, config)?;
    if let Some(path) = &args.load {
        let snap = serialization::read_from_path(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        game.restore(&snap)?;
    }

    let mut external = args.advisor_cmd.as_deref().and_then(CommandAdvisor::from_command_line);

    println!("{HELP}");
    let mut announced_win = game.has_won();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("\n{}Score: {}", game.grid(), game.score());
        if game.has_won() && !announced_win {
            println!("You reached {WINNING_TILE}! Keep going or press q.");
            announced_win = true;
        }
        if game.is_game_over() {
            println!("Game over. Final score: {}. r to restart, q to quit.", game.score());
        }
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else { continue };
        match cmd.to_ascii_lowercase().as_str() {
            "q" | "quit" => break,
            "r" | "restart" => {
                game.new_game();
                announced_win = false;
            }
            "h" | "hint" => match game.suggest_move() {
                Ok(dir) => println!("Hint: {dir}"),
                Err(_) => println!("Hint: no moves available"),
            },
            "c" | "consult" => match external.as_mut() {
                Some(advisor) => match game.consult(advisor) {
                    Some(dir) => println!("Advisor suggests: {dir}"),
                    None => println!("Advisor gave no usable suggestion."),
                },
                None => println!("No external advisor configured; start with --advisor-cmd."),
            },
            "save" => match words.next() {
                Some(path) => match serialization::write_to_path(path, &game.snapshot()) {
                    Ok(()) => println!("Saved to {path}"),
                    Err(e) => println!("Save failed: {e}"),
                },
                None => println!("usage: save FILE"),
            },
            "load" => match words.next() {
                Some(path) => match serialization::read_from_path(path) {
                    Ok(snap) => match game.restore(&snap) {
                        Ok(_) => {
                            announced_win = game.has_won();
                            println!("Loaded {path}");
                        }
                        Err(e) => println!("Load failed: {e}"),
                    },
                    Err(e) => println!("Load failed: {e}"),
                },
                None => println!("usage: load FILE"),
            },
            other => match other.parse::<Move>() {
                Ok(dir) => {
                    let turn = game.apply_move(dir)?;
                    if !turn.changed {
                        println!("No tiles moved. Try a different direction.");
                    }
                }
                Err(_) => println!("{HELP}"),
            },
        }
    }
    println!("Thanks for playing! Final score: {}", game.score());
    Ok(())
}
