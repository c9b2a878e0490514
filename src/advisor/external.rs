//! Optional out-of-process advisors (a remote reasoning service, a human
//! coach, another engine).
//!
//! An external advisor is a best-effort side channel: it is called only on
//! explicit request, any failure becomes "no suggestion", and whatever it
//! returns is checked against the grid before being shown.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::engine::{Grid, Move};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    #[error("advisor unavailable")]
    Unavailable,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0:?}")]
    InvalidResponse(String),
}

/// Something that can suggest a direction for `(grid, score)`.
///
/// Implemented for any `FnMut(&Grid, u64) -> Result<Move, AdvisorError>`.
pub trait ExternalAdvisor {
    fn suggest(&mut self, grid: &Grid, score: u64) -> Result<Move, AdvisorError>;
}

impl<F> ExternalAdvisor for F
where
    F: FnMut(&Grid, u64) -> Result<Move, AdvisorError>,
{
    fn suggest(&mut self, grid: &Grid, score: u64) -> Result<Move, AdvisorError> {
        self(grid, score)
    }
}

/// Runs a program once per request.
///
/// The program gets `{"grid": [[..]], "score": N}` on stdin, with `null` for
/// empty cells, and the first direction named on its stdout is the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAdvisor {
    program: String,
    args: Vec<String>,
}

impl CommandAdvisor {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { program: program.into(), args: args.into_iter().map(Into::into).collect() }
    }

    /// Split a command line on whitespace; `None` if it is blank.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let program = words.next()?;
        Some(Self::new(program, words))
    }
}

impl ExternalAdvisor for CommandAdvisor {
    fn suggest(&mut self, grid: &Grid, score: u64) -> Result<Move, AdvisorError> {
        let request = serde_json::json!({ "grid": grid.values(), "score": score });
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => AdvisorError::Unavailable,
                _ => AdvisorError::Transport(e.to_string()),
            })?;
        if let Some(mut stdin) = child.stdin.take() {
            writeln!(stdin, "{request}").map_err(|e| AdvisorError::Transport(e.to_string()))?;
        }
        let output = child.wait_with_output().map_err(|e| AdvisorError::Transport(e.to_string()))?;
        if !output.status.success() {
            return Err(AdvisorError::Transport(format!("{} exited with {}", self.program, output.status)));
        }
        let reply = String::from_utf8_lossy(&output.stdout);
        debug!(program = %self.program, reply = %reply.trim(), "external advisor replied");
        parse_advice(&reply)
    }
}

/// Pull a direction out of a free-text reply such as `"Left."` or `"up"`.
///
/// The first word that names a direction wins.
pub fn parse_advice(text: &str) -> Result<Move, AdvisorError> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| w.len() > 1)
        .find_map(|w| w.parse::<Move>().ok())
        .ok_or_else(|| AdvisorError::InvalidResponse(text.to_string()))
}

/// Ask `advisor` for a move, downgrading every failure to `None`.
///
/// Suggestions that would not change `grid` are dropped too.
pub fn consult<A: ExternalAdvisor + ?Sized>(advisor: &mut A, grid: Grid, score: u64) -> Option<Move> {
    match advisor.suggest(&grid, score) {
        Ok(dir) if grid.resolve(dir).changed => Some(dir),
        Ok(dir) => {
            warn!(%dir, "external advisor suggested an illegal move");
            None
        }
        Err(e) => {
            warn!(error = %e, "external advisor failed");
            None
        }
    }
}
