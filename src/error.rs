use std::num::ParseIntError;

#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("no {count} entries sum to {target}")]
    NoSum { count: usize, target: u64 },
    #[error("cannot parse {0:?} as a number")]
    BadNumber(String, #[source] ParseIntError),
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error("rule {0} is not defined")]
    UnknownRule(usize),
    #[error("rule {0} refers back to itself")]
    RecursiveRule(usize),
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error("cannot arrange tiles: {0}")]
    Arrangement(String),
    #[error("no orientation of tile {0} fits its neighbours")]
    NoOrientation(u64),
}

pub type Result<T, E = PuzzleError> = std::result::Result<T, E>;
