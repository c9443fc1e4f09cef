use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::{PuzzleError, Result};
use crate::input;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Rule {
    Literal(String),
    /// Sequences of rule ids, any one of which may match.
    Alternatives(Vec<Vec<usize>>),
}

#[derive(Debug, Default)]
pub struct Grammar {
    rules: FxHashMap<usize, Rule>,
}

impl Grammar {
    /// Splits the input into a grammar and the lines that are not rules.
    pub fn parse(s: &str) -> Result<(Grammar, Vec<&str>)> {
        let rule_re = Regex::new(r#"^(\d+):\s*(?:"([^"]*)"|([\d\s|]*))$"#)?;
        let mut grammar = Grammar::default();
        let mut messages = vec![];
        for line in input::lines(s) {
            let Some(caps) = rule_re.captures(line) else {
                if !line.is_empty() {
                    messages.push(line.trim());
                }
                continue;
            };
            let id = input::parse_num(&caps[1])?;
            let rule = match (caps.get(2), caps.get(3)) {
                (Some(literal), _) => Rule::Literal(literal.as_str().to_owned()),
                (None, Some(body)) => Rule::Alternatives(
                    body.as_str().split('|').map(|seq|
                        seq.split_whitespace().map(input::parse_num).collect::<Result<Vec<_>>>()
                    ).collect::<Result<Vec<_>>>()?
                ),
                (None, None) => unreachable!("rule regex always captures a body"),
            };
            grammar.rules.insert(id, rule);
        }
        log::debug!("{} rules, {} messages", grammar.rules.len(), messages.len());
        Ok((grammar, messages))
    }

    /// Regex source for rule `id`, unanchored.
    pub fn pattern(&self, id: usize) -> Result<String> {
        self.expand(id, &mut FxHashMap::default(), &mut vec![])
    }

    /// Anchored regex matching exactly the strings of rule `id`.
    pub fn compile(&self, id: usize) -> Result<Regex> {
        Ok(Regex::new(&format!("^(?:{})$", self.pattern(id)?))?)
    }

    fn expand(&self, id: usize, cache: &mut FxHashMap<usize, String>, active: &mut Vec<usize>) -> Result<String> {
        if let Some(pattern) = cache.get(&id) {
            return Ok(pattern.clone());
        }
        if active.contains(&id) {
            return Err(PuzzleError::RecursiveRule(id));
        }
        let rule = self.rules.get(&id).ok_or(PuzzleError::UnknownRule(id))?;

        active.push(id);
        let pattern = match rule {
            Rule::Literal(text) => regex::escape(text),
            Rule::Alternatives(alternatives) => {
                let mut branches = Vec::with_capacity(alternatives.len());
                for seq in alternatives {
                    let mut branch = String::new();
                    for &sub in seq {
                        branch += &self.expand(sub, cache, active)?;
                    }
                    branches.push(branch);
                }
                if branches.len() == 1 {
                    branches.swap_remove(0)
                } else {
                    format!("(?:{})", branches.join("|"))
                }
            }
        };
        active.pop();

        cache.insert(id, pattern.clone());
        Ok(pattern)
    }

    /// Shortest and longest string rule `id` can match.
    fn length_bounds(&self, id: usize, active: &mut Vec<usize>) -> Result<(usize, usize)> {
        if active.contains(&id) {
            return Err(PuzzleError::RecursiveRule(id));
        }
        let rule = self.rules.get(&id).ok_or(PuzzleError::UnknownRule(id))?;
        active.push(id);
        let bounds = match rule {
            Rule::Literal(text) => (text.len(), text.len()),
            Rule::Alternatives(alternatives) => {
                let mut bounds: Option<(usize, usize)> = None;
                for seq in alternatives {
                    let (mut lo, mut hi) = (0, 0);
                    for &sub in seq {
                        let (sub_lo, sub_hi) = self.length_bounds(sub, active)?;
                        lo += sub_lo;
                        hi += sub_hi;
                    }
                    bounds = Some(match bounds {
                        None => (lo, hi),
                        Some((min, max)) => (min.min(lo), max.max(hi)),
                    });
                }
                bounds.unwrap_or((0, 0))
            }
        };
        active.pop();
        Ok(bounds)
    }

    /// The single length of every string of rule `id`, if there is one.
    fn fixed_length(&self, id: usize) -> Result<Option<usize>> {
        let (lo, hi) = self.length_bounds(id, &mut vec![])?;
        Ok((lo == hi && lo > 0).then_some(lo))
    }
}

/// Rule 0 once rules 8 and 11 loop (`8: 42 | 42 8`, `11: 42 31 | 42 11 31`):
/// `m` strings of rule 42 followed by `k` strings of rule 31, `m > k >= 1`.
enum LoopingMatcher {
    /// Both rules have fixed lengths, so one greedy split decides.
    Fixed { split: Regex, len42: usize, len31: usize },
    /// One regex per possible `k`.
    Bounded(Vec<Regex>),
}

impl LoopingMatcher {
    fn new(grammar: &Grammar, longest_message: usize) -> Result<LoopingMatcher> {
        if grammar.rules.get(&0) != Some(&Rule::Alternatives(vec![vec![8, 11]])) {
            return Err(PuzzleError::Malformed("looping rules need rule 0 to be `8 11`".to_owned()));
        }
        let p42 = grammar.pattern(42)?;
        let p31 = grammar.pattern(31)?;

        if let (Some(len42), Some(len31)) = (grammar.fixed_length(42)?, grammar.fixed_length(31)?) {
            log::debug!("rule 42 matches {} characters, rule 31 matches {}", len42, len31);
            let split = Regex::new(&format!("^((?:{})+)((?:{})+)$", p42, p31))?;
            return Ok(LoopingMatcher::Fixed { split, len42, len31 });
        }

        let (min42, _) = grammar.length_bounds(42, &mut vec![])?;
        let (min31, _) = grammar.length_bounds(31, &mut vec![])?;
        if min42 == 0 || min31 == 0 {
            return Err(PuzzleError::Malformed("rules 42 and 31 must not match the empty string".to_owned()));
        }
        let max_k = longest_message.saturating_sub(min42) / (min42 + min31);
        log::debug!("rules 42 and 31 vary in length, trying up to {} nestings", max_k);
        let regexes = (1 ..= max_k).map(|k|
            Regex::new(&format!("^(?:{}){{{},}}(?:{}){{{}}}$", p42, k + 1, p31, k))
        ).collect::<Result<Vec<_>, _>>()?;
        Ok(LoopingMatcher::Bounded(regexes))
    }

    fn is_match(&self, message: &str) -> bool {
        match self {
            LoopingMatcher::Fixed { split, len42, len31 } => split.captures(message).is_some_and(|caps|
                caps[1].len() / len42 > caps[2].len() / len31
            ),
            LoopingMatcher::Bounded(regexes) => regexes.iter().any(|re| re.is_match(message)),
        }
    }
}

pub fn solve(part: u8, s: &str) -> Result<String> {
    let (grammar, messages) = Grammar::parse(s)?;
    let count = if part == 1 {
        let re = grammar.compile(0)?;
        messages.iter().filter(|message| re.is_match(message)).count()
    } else {
        let longest = messages.iter().map(|message| message.len()).max().unwrap_or(0);
        let matcher = LoopingMatcher::new(&grammar, longest)?;
        messages.iter().filter(|message| matcher.is_match(message)).count()
    };
    Ok(count.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const EXAMPLE: &str = indoc! {r#"
        0: 4 1 5
        1: 2 3 | 3 2
        2: 4 4 | 5 5
        3: 4 5 | 5 4
        4: "a"
        5: "b"

        ababbb
        bababa
        abbbab
        aaabbb
        aaaabbb
    "#};

    #[test]
    fn test_example_part1() {
        assert_eq!(solve(1, EXAMPLE).unwrap(), "2");
    }

    #[test]
    fn test_compiled_pattern() {
        let (grammar, _) = Grammar::parse(EXAMPLE).unwrap();
        let re = grammar.compile(0).unwrap();
        for accepted in ["aaaabb", "aaabab", "abbabb", "abbbab", "aabaab", "aabbbb", "abaaab", "ababbb"] {
            assert!(re.is_match(accepted), "{accepted}");
        }
        for rejected in ["bababa", "aaabbb", "aaaabbb", "ababb", "", "abab bb"] {
            assert!(!re.is_match(rejected), "{rejected}");
        }
    }

    #[test]
    fn test_undefined_and_recursive_rules() {
        let (grammar, _) = Grammar::parse("0: 1 2\n1: \"a\"\n").unwrap();
        assert!(matches!(grammar.pattern(0), Err(PuzzleError::UnknownRule(2))));

        let (grammar, _) = Grammar::parse("0: 1\n1: 2 | 1 2\n2: \"b\"\n").unwrap();
        assert!(matches!(grammar.pattern(0), Err(PuzzleError::RecursiveRule(1))));
    }

    #[test]
    fn test_looping_rules_fixed_length() {
        let input = indoc! {r#"
            0: 8 11
            8: 42
            11: 42 31
            42: "a"
            31: "b"

            aab
            aaab
            aabb
            aaabb
            ab
            ba
            aaaabbb
        "#};
        assert_eq!(solve(1, input).unwrap(), "1");
        assert_eq!(solve(2, input).unwrap(), "4");
    }

    #[test]
    fn test_looping_rules_varying_length() {
        let input = indoc! {r#"
            0: 8 11
            8: 42
            11: 42 31
            42: 1 | 1 1
            31: 2
            1: "a"
            2: "b"

            aab
            aabb
            aaabb
            ab
            abb
            aaaab
        "#};
        assert_eq!(solve(1, input).unwrap(), "2");
        assert_eq!(solve(2, input).unwrap(), "3");
    }

    #[test]
    fn test_example_part2() {
        let input = indoc! {r#"
            42: 9 14 | 10 1
            9: 14 27 | 1 26
            10: 23 14 | 28 1
            1: "a"
            11: 42 31
            5: 1 14 | 15 1
            19: 14 1 | 14 14
            12: 24 14 | 19 1
            16: 15 1 | 14 14
            31: 14 17 | 1 13
            6: 14 14 | 1 14
            2: 1 24 | 14 4
            0: 8 11
            13: 14 3 | 1 12
            15: 1 | 14
            17: 14 2 | 1 7
            23: 25 1 | 22 14
            28: 16 1
            4: 1 1
            20: 14 14 | 1 15
            3: 5 14 | 16 1
            27: 1 6 | 14 18
            14: "b"
            21: 14 1 | 1 14
            25: 1 1 | 1 14
            22: 14 14
            8: 42
            26: 14 22 | 1 20
            18: 15 15
            7: 14 5 | 1 21
            24: 14 1

            abbbbbabbbaaaababbaabbbbabababbbabbbbbbabaaaa
            bbabbbbaabaabba
            babbbbaabbbbbabbbbbbaabaaabaaa
            aaabbbbbbaaaabaababaabababbabaaabbababababaaa
            bbbbbbbaaaabbbbaaabbabaaa
            bbbababbbbaaaaaaaabbababaaababaabab
            ababaaaaaabaaab
            ababaaaaabbbaba
            baabbaaaabbaaaababbaababb
            abbbbabbbbaaaababbbbbbaaaababb
            aaaaabbaabaaaaababaa
            aaaabbaaaabbaaa
            aaaabbaabbaaaaaaabbbabbbaaabbaabaaa
            babaaabbbaaabaababbaabababaaab
            aabbbbbaabbbaaaaaabbbbbababaaaaabbaaabba
        "#};
        assert_eq!(solve(1, input).unwrap(), "3");
        assert_eq!(solve(2, input).unwrap(), "12");

        let (grammar, _) = Grammar::parse(input).unwrap();
        assert_eq!(grammar.fixed_length(42).unwrap(), Some(5));
        assert_eq!(grammar.fixed_length(31).unwrap(), Some(5));
    }

    #[test]
    fn test_looping_rules_need_root() {
        let input = "0: 42 31\n42: \"a\"\n31: \"b\"\n\nab\n";
        assert!(matches!(solve(2, input), Err(PuzzleError::Malformed(_))));
    }
}
