use itertools::Itertools;

use crate::error::{PuzzleError, Result};
use crate::input;

const TARGET: u64 = 2020;

pub fn solve(part: u8, s: &str) -> Result<String> {
    let entries = input::numbers::<u64>(s)?;
    log::debug!("{} expense entries", entries.len());
    let product = if part == 1 {
        let (a, b) = find_pair(&entries, TARGET).ok_or(PuzzleError::NoSum { count: 2, target: TARGET })?;
        a * b
    } else {
        let (a, b, c) = find_triple(&entries, TARGET).ok_or(PuzzleError::NoSum { count: 3, target: TARGET })?;
        a * b * c
    };
    Ok(product.to_string())
}

pub fn find_pair(entries: &[u64], target: u64) -> Option<(u64, u64)> {
    entries.iter().copied().tuple_combinations().find(|&(a, b)| a.checked_add(b) == Some(target))
}

/// First three entries at distinct positions, in input order, that sum to `target`.
pub fn find_triple(entries: &[u64], target: u64) -> Option<(u64, u64, u64)> {
    entries.iter().copied().tuple_combinations().find(|&(a, b, c)| {
        a.checked_add(b).and_then(|ab| ab.checked_add(c)) == Some(target)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        1721
        979
        366
        299
        675
        1456
    "};

    #[test]
    fn test_example() {
        assert_eq!(solve(1, EXAMPLE).unwrap(), "514579");
        assert_eq!(solve(2, EXAMPLE).unwrap(), "241861950");
    }

    #[test]
    fn test_find_triple_returns_the_values() {
        let entries = [5, 1000, 17, 20, 1000, 3];
        assert_eq!(find_triple(&entries, 2020), Some((1000, 20, 1000)));
        assert_eq!(find_triple(&entries, 42), Some((5, 17, 20)));
    }

    #[test]
    fn test_entries_are_not_reused() {
        assert_eq!(find_pair(&[1010, 7], 2020), None);
        assert_eq!(find_triple(&[1000, 20], 2020), None);
        assert!(matches!(solve(2, "1010\n1010\n"), Err(PuzzleError::NoSum { count: 3, .. })));
    }

    #[test]
    fn test_sums_do_not_wrap() {
        assert_eq!(solve(1, "18446744073709551615\n2000\n20\n").unwrap(), "40000");
        assert_eq!(solve(2, "18446744073709551615\n2021\n1000\n20\n1000\n").unwrap(), "20000000");
        assert_eq!(find_pair(&[u64::MAX, 2021], 2020), None);
        assert_eq!(find_triple(&[u64::MAX, 1, 2020], 2020), None);
    }
}
