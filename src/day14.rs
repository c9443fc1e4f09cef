use bitvec::prelude::*;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::{PuzzleError, Result};
use crate::input;

const WORD_BITS: usize = 36;
const WORD: u64 = (1 << WORD_BITS) - 1;

/// A 36-character `X10` mask split into its three kinds of bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mask {
    ones: u64,
    zeros: u64,
    floating: u64,
}

impl Mask {
    pub fn parse(s: &str) -> Result<Mask> {
        if s.len() != WORD_BITS {
            return Err(PuzzleError::Malformed(format!("mask {:?} is not {} bits", s, WORD_BITS)));
        }
        let mut mask = Mask::default();
        for (i, c) in s.bytes().rev().enumerate() {
            let bit = 1u64 << i;
            match c {
                b'1' => mask.ones |= bit,
                b'0' => mask.zeros |= bit,
                b'X' => mask.floating |= bit,
                _ => return Err(PuzzleError::Malformed(format!("unexpected {:?} in mask {:?}", c as char, s))),
            }
        }
        Ok(mask)
    }

    /// Value decoder: ones and zeros overwrite, X passes the value's bit through.
    pub fn apply_to_value(&self, value: u64) -> u64 {
        (value & !self.zeros | self.ones) & WORD
    }

    /// Memory address decoder: ones overwrite, zeros pass through, and every X takes
    /// both values, giving 2^X addresses.
    pub fn addresses(&self, address: u64) -> Vec<u64> {
        let base = (address | self.ones) & !self.floating;
        let floating_bits = self.floating.view_bits::<Lsb0>().iter_ones().collect::<Vec<_>>();
        (0u64 .. 1 << floating_bits.len()).map(|combo| {
            combo.view_bits::<Lsb0>().iter_ones().fold(base, |addr, i| addr | 1 << floating_bits[i])
        }).collect()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Instruction {
    SetMask(Mask),
    Write { address: u64, value: u64 },
}

fn parse(s: &str) -> Result<Vec<Instruction>> {
    let mask_re = Regex::new(r"^mask = ([X10]{36})$")?;
    let mem_re = Regex::new(r"^mem\[(\d+)\] = (\d+)$")?;
    let mut program = vec![];
    for line in input::lines(s) {
        if let Some(caps) = mask_re.captures(line) {
            program.push(Instruction::SetMask(Mask::parse(&caps[1])?));
        } else if let Some(caps) = mem_re.captures(line) {
            let (address, value) = (input::parse_num(&caps[1])?, input::parse_num(&caps[2])?);
            if address > WORD || value > WORD {
                return Err(PuzzleError::Malformed(format!("{:?} does not fit in {} bits", line, WORD_BITS)));
            }
            program.push(Instruction::Write { address, value });
        } else if !line.is_empty() {
            log::debug!("skipping {:?}", line);
        }
    }
    Ok(program)
}

pub fn solve(part: u8, s: &str) -> Result<String> {
    let mut mem: FxHashMap<u64, u64> = FxHashMap::default();
    let mut mask = Mask::default();
    for instruction in parse(s)? {
        match instruction {
            Instruction::SetMask(new_mask) => mask = new_mask,
            Instruction::Write { address, value } if part == 1 => {
                mem.insert(address, mask.apply_to_value(value));
            }
            Instruction::Write { address, value } => {
                for decoded in mask.addresses(address) {
                    mem.insert(decoded, value);
                }
            }
        }
    }
    log::debug!("{} memory cells written", mem.len());
    Ok(mem.values().map(|&value| u128::from(value)).sum::<u128>().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_example_part1() {
        let input = indoc! {"
            mask = XXXXXXXXXXXXXXXXXXXXXXXXXXXXX1XXXX0X
            mem[8] = 11
            mem[7] = 101
            mem[8] = 0
        "};
        assert_eq!(solve(1, input).unwrap(), "165");
    }

    #[test]
    fn test_example_part2() {
        let input = indoc! {"
            mask = 000000000000000000000000000000X1001X
            mem[42] = 100
            mask = 00000000000000000000000000000000X0XX
            mem[26] = 1
        "};
        assert_eq!(solve(2, input).unwrap(), "208");
    }

    #[test]
    fn test_floating_addresses() {
        let mask = Mask::parse("000000000000000000000000000000X1001X").unwrap();
        let mut addresses = mask.addresses(42);
        addresses.sort_unstable();
        assert_eq!(addresses, vec![26, 27, 58, 59]);

        let mask = Mask::parse("0000X000000X00000000000000X00000XX1X").unwrap();
        let mut addresses = mask.addresses(0b1010_0110);
        assert_eq!(addresses.len(), 1 << 6);
        addresses.sort_unstable();
        addresses.dedup();
        assert_eq!(addresses.len(), 1 << 6);
    }

    #[test]
    fn test_unmatched_lines_are_skipped() {
        let input = "mem[3] = 5\nnonsense\nmem[x] = 1\nmem[4] = 6\n";
        assert_eq!(solve(1, input).unwrap(), "11");
        assert_eq!(solve(2, input).unwrap(), "11");
    }

    #[test]
    fn test_values_are_36_bits() {
        assert_eq!(Mask::default().apply_to_value(1 << 40 | 5), 5);
        let mask = Mask::parse("1XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX").unwrap();
        assert_eq!(mask.apply_to_value(3), 1 << 35 | 3);

        for part in [1, 2] {
            let wide_value = solve(part, "mem[0] = 18446744073709551615\nmem[1] = 1\n");
            assert!(matches!(wide_value, Err(PuzzleError::Malformed(_))));
            let wide_address = solve(part, "mem[68719476736] = 1\n");
            assert!(matches!(wide_address, Err(PuzzleError::Malformed(_))));
        }
    }

    #[test]
    fn test_bad_mask() {
        assert!(Mask::parse("X10").is_err());
        assert!(Mask::parse("00000000000000000000000000000000002X").is_err());
    }
}
