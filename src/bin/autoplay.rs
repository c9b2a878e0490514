use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slide_2048::config::GameConfig;
use slide_2048::serialization::{self, Snapshot};
use slide_2048::session::GameSession;

/// Play games with the heuristic advisor and report results.
#[derive(Parser, Debug)]
struct Args {
    /// Number of games to play.
    #[arg(long, default_value_t = 1)]
    games: u64,
    /// Stop a game after this many moves.
    #[arg(long)]
    steps: Option<u64>,
    /// Stop a game once this tile appears.
    #[arg(long)]
    stop_tile: Option<u32>,
    /// Base seed; game `i` uses `seed + i`. OS entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Optional TOML configuration (spawn probability, heuristic weights).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Write the best game's final snapshot here (.json or postcard).
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
    /// Suppress progress and per-game output.
    #[arg(long)]
    quiet: bool,
    /// Tracing filter, e.g. "warn", "debug".
    #[arg(long, default_value = "warn")]
    log: String,
}

struct GameResult {
    score: u64,
    moves: u64,
    highest_tile: u32,
    snapshot: Snapshot,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(args.log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(path) => GameConfig::from_toml(path)?,
        None => GameConfig::default(),
    };
    if args.games == 0 {
        anyhow::bail!("--games must be at least 1");
    }

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:30}] {pos}/{len} | {msg}")?
                .progress_chars("=> ")
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let start = Instant::now();
    let mut results = Vec::with_capacity(args.games as usize);
    for i in 0..args.games {
        let rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(i)),
            None => StdRng::from_entropy(),
        };
        let result = play_one(GameSession::new(rng, config.clone())?, args.steps, args.stop_tile);
        info!(game = i, score = result.score, moves = result.moves, highest = result.highest_tile, "game finished");
        pb.set_message(format!("last score: {} | best tile: {}", result.score, result.highest_tile));
        pb.inc(1);
        if !args.quiet {
            pb.println(format!(
                "game {:>4}: score {:>7} | moves {:>5} | highest {:>5}",
                i, result.score, result.moves, result.highest_tile
            ));
        }
        results.push(result);
    }
    pb.finish_and_clear();

    let elapsed = start.elapsed().as_secs_f64().max(1e-6);
    let total_moves: u64 = results.iter().map(|r| r.moves).sum();
    let mean_score = results.iter().map(|r| r.score as f64).sum::<f64>() / results.len() as f64;
    let wins = results.iter().filter(|r| r.highest_tile >= 2048).count();
    println!(
        "Games: {} | mean score: {:.1} | reached 2048: {} | moves/sec: {:.1}",
        results.len(),
        mean_score,
        wins,
        total_moves as f64 / elapsed
    );

    if let Some(out_path) = args.out {
        if let Some(best) = results.iter().max_by_key(|r| r.score) {
            serialization::write_to_path(&out_path, &best.snapshot)?;
            println!("Wrote best game to {}", out_path.display());
        }
    }
    Ok(())
}

fn play_one(mut game: GameSession<StdRng>, steps: Option<u64>, stop_tile: Option<u32>) -> GameResult {
    while let Ok(dir) = game.suggest_move() {
        match game.apply_move(dir) {
            Ok(turn) if turn.state.game_over => break,
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "turn failed");
                break;
            }
        }
        if steps.is_some_and(|limit| game.moves() >= limit) {
            break;
        }
        if stop_tile.is_some_and(|tile| game.grid().highest_tile() >= tile) {
            break;
        }
    }
    GameResult {
        score: game.score(),
        moves: game.moves(),
        highest_tile: game.grid().highest_tile(),
        snapshot: game.snapshot(),
    }
}
