//! One game: the live grid, the score and the random source.
//!
//! A turn runs resolve → spawn → terminal check in that order and either
//! completes or leaves the session untouched.
//!
//! ```
//! use slide_2048::session::GameSession;
//!
//! let mut game = GameSession::from_seed(42);
//! assert_eq!(game.score(), 0);
//! assert_eq!(game.grid().count_empty(), 14);
//!
//! let dir = game.suggest_move().unwrap();
//! let turn = game.apply_move(dir).unwrap();
//! assert!(turn.changed);
//! assert!(turn.spawned.is_some());
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::advisor::external::{self, ExternalAdvisor};
use crate::advisor::HeuristicAdvisor;
use crate::config::{ConfigError, GameConfig};
use crate::engine::{Grid, GridValues, Move, Spawned, Spawner};
use crate::error::EngineError;
use crate::serialization::Snapshot;

/// Tile value that counts as a win.
pub const WINNING_TILE: u32 = 2048;

/// Public view of a session after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub grid: Grid,
    pub score: u64,
    pub game_over: bool,
    /// A tile of at least [`WINNING_TILE`] is on the grid.
    pub won: bool,
}

/// Result of [`GameSession::apply_move`].
///
/// When `changed` is false nothing happened: `score_delta` is 0, `spawned`
/// is `None` and `state` equals the state before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub changed: bool,
    pub score_delta: u64,
    pub spawned: Option<Spawned>,
    pub state: SessionState,
}

pub struct GameSession<R: Rng = StdRng> {
    grid: Grid,
    score: u64,
    moves: u64,
    rng: R,
    spawner: Spawner,
    advisor: HeuristicAdvisor,
}

impl GameSession<StdRng> {
    /// Deterministic session; the same seed replays the same spawns.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_parts(StdRng::seed_from_u64(seed), Spawner::default(), HeuristicAdvisor::new())
    }

    /// Session seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::with_parts(StdRng::from_entropy(), Spawner::default(), HeuristicAdvisor::new())
    }
}

impl<R: Rng> GameSession<R> {
    /// Build a session around `rng` and start the first game.
    ///
    /// `config` is validated first; nothing is spawned if it is rejected.
    pub fn new(rng: R, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = config.spawn.spawner()?;
        Ok(Self::with_parts(rng, spawner, HeuristicAdvisor::with_weights(config.heuristic)))
    }

    fn with_parts(rng: R, spawner: Spawner, advisor: HeuristicAdvisor) -> Self {
        let mut session = Self { grid: Grid::EMPTY, score: 0, moves: 0, rng, spawner, advisor };
        session.new_game();
        session
    }

    /// Reset score and move count, clear the grid and spawn two tiles.
    pub fn new_game(&mut self) -> SessionState {
        let mut grid = Grid::EMPTY;
        for _ in 0..2 {
            let spawned = self.spawner.spawn(grid, &mut self.rng);
            debug_assert!(spawned.is_ok(), "spawn into a near-empty grid failed");
            if let Ok(spawned) = spawned {
                grid = spawned.grid;
            }
        }
        self.grid = grid;
        self.score = 0;
        self.moves = 0;
        info!(grid = ?self.grid, "new game");
        self.state()
    }

    /// Play one turn in `direction`.
    ///
    /// An illegal direction is a no-op. Otherwise the score grows by the
    /// merge total, a tile is spawned, and game over is re-evaluated on the
    /// post-spawn grid.
    pub fn apply_move(&mut self, direction: Move) -> Result<Turn, EngineError> {
        let outcome = self.grid.resolve(direction);
        if !outcome.changed {
            debug!(%direction, "move does not change the grid");
            return Ok(Turn { changed: false, score_delta: 0, spawned: None, state: self.state() });
        }

        // A changed move either merged (freeing a cell) or slid into a gap
        // (keeping one), so the spawn below cannot hit a full grid.
        debug_assert!(!outcome.grid.is_full(), "changed move filled the grid");
        let spawned = self.spawner.spawn(outcome.grid, &mut self.rng)?;

        self.grid = spawned.grid;
        self.score += outcome.score_delta;
        self.moves += 1;
        let state = self.state();
        debug!(
            %direction,
            delta = outcome.score_delta,
            score = self.score,
            spawn_row = spawned.row,
            spawn_col = spawned.col,
            spawn_value = spawned.value,
            game_over = state.game_over,
            "applied move"
        );
        Ok(Turn { changed: true, score_delta: outcome.score_delta, spawned: Some(spawned), state })
    }

    /// Local heuristic recommendation for the live grid.
    pub fn suggest_move(&self) -> Result<Move, EngineError> {
        self.advisor.best_move(self.grid)
    }

    /// Ask an external advisor; any failure or illegal answer is `None`.
    pub fn consult<A: ExternalAdvisor + ?Sized>(&self, advisor: &mut A) -> Option<Move> {
        external::consult(advisor, self.grid, self.score)
    }

    pub fn export_grid(&self) -> GridValues {
        self.grid.values()
    }

    /// Replace the live grid, keeping the score.
    ///
    /// On error the session is unchanged.
    pub fn import_grid<Row: AsRef<[Option<u32>]>>(&mut self, rows: &[Row]) -> Result<SessionState, EngineError> {
        let grid = Grid::from_values(rows)?;
        Ok(self.replace(grid, self.score))
    }

    /// Replace the live grid and the score.
    pub fn import_grid_with_score<Row: AsRef<[Option<u32>]>>(
        &mut self,
        rows: &[Row],
        score: u64,
    ) -> Result<SessionState, EngineError> {
        let grid = Grid::from_values(rows)?;
        Ok(self.replace(grid, score))
    }

    /// Like [`import_grid`](Self::import_grid) for 16 row-major cells.
    pub fn import_flat(&mut self, cells: &[Option<u32>]) -> Result<SessionState, EngineError> {
        let grid = Grid::from_flat(cells)?;
        Ok(self.replace(grid, self.score))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { score: self.score, moves: self.moves, grid: self.export_grid() }
    }

    /// Load a snapshot; on error the session is unchanged.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<SessionState, EngineError> {
        let grid = snapshot.grid()?;
        let state = self.replace(grid, snapshot.score);
        self.moves = snapshot.moves;
        Ok(state)
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            grid: self.grid,
            score: self.score,
            game_over: self.grid.is_game_over(),
            won: self.grid.has_tile_at_least(WINNING_TILE),
        }
    }

    #[inline]
    pub fn grid(&self) -> Grid { self.grid }

    #[inline]
    pub fn score(&self) -> u64 { self.score }

    /// Changed moves played since the last new game or restore.
    #[inline]
    pub fn moves(&self) -> u64 { self.moves }

    #[inline]
    pub fn is_game_over(&self) -> bool { self.grid.is_game_over() }

    #[inline]
    pub fn has_won(&self) -> bool { self.grid.has_tile_at_least(WINNING_TILE) }

    pub fn advisor(&self) -> &HeuristicAdvisor { &self.advisor }

    fn replace(&mut self, grid: Grid, score: u64) -> SessionState {
        self.grid = grid;
        self.score = score;
        info!(grid = ?grid, score, "grid imported");
        self.state()
    }
}
