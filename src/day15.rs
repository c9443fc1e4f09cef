use rustc_hash::FxHashMap;

use crate::error::{PuzzleError, Result};
use crate::input;

pub fn solve(part: u8, s: &str) -> Result<String> {
    let starting = s.trim().split(',').map(input::parse_num).collect::<Result<Vec<usize>>>()?;
    let turn = if part == 1 {2020} else {30_000_000};
    Ok(spoken_at(&starting, turn)?.to_string())
}

/// The number spoken on (1-based) `turn`.
pub fn spoken_at(starting: &[usize], turn: usize) -> Result<usize> {
    let Some((&last_start, earlier)) = starting.split_last() else {
        return Err(PuzzleError::Malformed("no starting numbers".to_owned()));
    };
    if turn <= starting.len() {
        return Ok(starting[turn.max(1) - 1]);
    }

    // last_seen[n]: the last turn n was spoken before the current one, 0 if never.
    // Every spoken age is below `turn`, so only starting numbers can fall outside.
    let mut last_seen = vec![0u32; turn];
    let mut beyond: FxHashMap<usize, u32> = FxHashMap::default();
    for (t, &n) in earlier.iter().enumerate() {
        match last_seen.get_mut(n) {
            Some(seen) => *seen = t as u32 + 1,
            None => { beyond.insert(n, t as u32 + 1); }
        }
    }

    let mut current = last_start;
    for t in starting.len() .. turn {
        let slot = match last_seen.get_mut(current) {
            Some(slot) => slot,
            None => beyond.entry(current).or_default(),
        };
        let next = match *slot {
            0 => 0,
            seen => t - seen as usize,
        };
        *slot = t as u32;
        current = next;
    }
    Ok(current)
}
