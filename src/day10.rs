use crate::error::Result;
use crate::input;

pub fn solve(part: u8, s: &str) -> Result<String> {
    let mut adapters = input::numbers::<u64>(s)?;
    adapters.sort_unstable();
    if part == 1 {
        let [ones, _, threes] = joltage_steps(&adapters);
        Ok((ones * threes).to_string())
    } else {
        Ok(count_arrangements(&adapters).to_string())
    }
}

/// Tallies of 1-, 2- and 3-jolt steps along the chain from the outlet, counting the
/// device's own adapter as a final 3-jolt step. The chain ends at the first gap wider
/// than 3 jolts.
pub fn joltage_steps(sorted: &[u64]) -> [u64; 3] {
    let mut tallies = [0, 0, 1];
    let mut previous = 0;
    for &jolts in sorted {
        match jolts - previous {
            0 => {}
            diff @ 1..=3 => tallies[diff as usize - 1] += 1,
            diff => {
                log::warn!("no adapter bridges {} jolts after {}", diff, previous);
                break;
            }
        }
        previous = jolts;
    }
    tallies
}

pub fn count_arrangements(sorted: &[u64]) -> u64 {
    // ways[i]: chains from the outlet ending at adapter i
    let mut ways: Vec<u64> = Vec::with_capacity(sorted.len());
    for (i, &jolts) in sorted.iter().enumerate() {
        let from_outlet = u64::from(jolts <= 3);
        let from_adapters = (0 .. i).rev()
            .take_while(|&k| jolts - sorted[k] <= 3)
            .map(|k| ways[k])
            .sum::<u64>();
        ways.push(from_outlet + from_adapters);
    }
    ways.last().copied().unwrap_or(1)
}
