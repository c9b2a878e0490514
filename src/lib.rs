//! slide-2048: a 2048 board engine with a heuristic move advisor
//!
//! This crate provides:
//! - A compact `Grid` type with move resolution (`resolve`, `Grid::slide`),
//!   tile spawning (`Spawner`) and terminal detection (`is_game_over`)
//! - A one-ply heuristic advisor (`advisor` module) plus a seam for optional
//!   external advisors
//! - A `GameSession` that owns the grid, score and RNG and runs full turns
//! - Snapshots of a session as JSON or postcard (`serialization` module)
//!
//! Quick start:
//! ```
//! use slide_2048::engine::Move;
//! use slide_2048::session::GameSession;
//!
//! // Deterministic session: same seed, same spawns
//! let mut game = GameSession::from_seed(42);
//! let mut turns = 0;
//! while !game.is_game_over() && turns < 20 {
//!     let dir = game.suggest_move().unwrap();
//!     let turn = game.apply_move(dir).unwrap();
//!     assert!(turn.changed);
//!     turns += 1;
//! }
//! assert!(game.score() > 0);
//! ```
//!
//! Pure engine use, without a session:
//! ```
//! use slide_2048::engine::{resolve, Grid, Move, Spawner};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let spawner = Spawner::default();
//! let g = spawner.spawn(Grid::EMPTY, &mut rng).unwrap().grid;
//! let g = spawner.spawn(g, &mut rng).unwrap().grid;
//! let out = resolve(g, Move::Left);
//! assert_eq!(out.changed, out.grid != g);
//! ```
//!
pub mod advisor;
pub mod config;
pub mod engine;
pub mod error;
pub mod serialization;
pub mod session;

pub use error::EngineError;
