use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use eyre::WrapErr;

mod day01;
mod day10;
mod day14;
mod day15;
mod day19;
mod day20;
mod error;
mod grid;
mod input;

type Solver = fn(u8, &str) -> error::Result<String>;

/// Advent of Code 2020 solutions
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Puzzle day
    #[arg(value_parser = clap::value_parser!(u8).range(1..=25))]
    day: u8,

    /// Puzzle part
    #[arg(value_parser = clap::value_parser!(u8).range(1..=2))]
    part: u8,

    /// Run on the numbered example input instead of the real one
    #[arg(short, long)]
    test: Option<u32>,

    /// Directory holding the `dayN.in` files
    #[arg(short, long, default_value = ".")]
    input_dir: PathBuf,

    /// Read this file instead of the day's input
    #[arg(short, long, conflicts_with = "test")]
    file: Option<PathBuf>,
}

fn solver(day: u8) -> Option<Solver> {
    match day {
        1 => Some(day01::solve),
        10 => Some(day10::solve),
        14 => Some(day14::solve),
        15 => Some(day15::solve),
        19 => Some(day19::solve),
        20 => Some(day20::solve),
        _ => None,
    }
}

fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let solve = solver(args.day).ok_or_else(|| eyre::eyre!("day {} has no solution", args.day))?;
    let path = match args.file {
        Some(path) => path,
        None => input::input_path(&args.input_dir, args.day, args.test),
    };
    log::debug!("reading {}", path.display());
    let input = input::read_input(&path).wrap_err_with(|| format!("reading {}", path.display()))?;

    let time = Instant::now();
    let answer = solve(args.part, &input).wrap_err_with(|| format!("day {} part {}", args.day, args.part))?;
    println!("{}", answer);
    log::info!("{} seconds elapsed", time.elapsed().as_secs_f32());
    Ok(())
}
