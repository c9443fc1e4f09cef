use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PuzzleError, Result};

/// `day{N}.in`, or `day{N}test{T}.in` for the numbered example input.
pub fn input_path(dir: &Path, day: u8, test: Option<u32>) -> PathBuf {
    match test {
        None => dir.join(format!("day{}.in", day)),
        Some(test) => dir.join(format!("day{}test{}.in", day, test)),
    }
}

pub fn read_input(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

/// Lines in order, without terminators or trailing whitespace.
pub fn lines(s: &str) -> impl Iterator<Item = &str> {
    s.lines().map(str::trim_end)
}

/// Blank-line separated blocks of lines. Runs of blank lines count as one separator.
pub fn paragraphs(s: &str) -> Vec<Vec<&str>> {
    let mut blocks = vec![];
    let mut current = vec![];
    for line in lines(s) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

pub fn parse_num<T: FromStr<Err = ParseIntError>>(s: &str) -> Result<T> {
    s.trim().parse().map_err(|e| PuzzleError::BadNumber(s.to_owned(), e))
}

/// One number per non-blank line.
pub fn numbers<T: FromStr<Err = ParseIntError>>(s: &str) -> Result<Vec<T>> {
    lines(s).filter(|line| !line.is_empty()).map(parse_num).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs() {
        let blocks = paragraphs("a\nb\r\n\n\n c\n\nd  \n");
        assert_eq!(blocks, vec![vec!["a", "b"], vec![" c"], vec!["d"]]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(numbers::<u64>("1\n\n22\r\n333\n").unwrap(), vec![1, 22, 333]);
        let err = numbers::<u64>("1\ntwo\n").unwrap_err();
        assert!(matches!(err, PuzzleError::BadNumber(ref s, _) if s == "two"));
    }

    #[test]
    fn test_input_path() {
        let dir = Path::new("inputs");
        assert_eq!(input_path(dir, 14, None), Path::new("inputs/day14.in"));
        assert_eq!(input_path(dir, 14, Some(2)), Path::new("inputs/day14test2.in"));
    }
}
