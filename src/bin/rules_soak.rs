//! Random-playout soak runner for the rules engine.
//!
//! Usage:
//! `cargo run --release --bin rules_soak`
//! `cargo run --release --bin rules_soak -- --games 500 --plies 300 --seed 42`
//!
//! Set `RUST_LOG=debug` to print every ply.

use std::ops::Range;

use log::{error, info};

use plum_rules::game_state::game_state::Outcome;
use plum_rules::utils::random_playout::{random_playout, PlayoutEnd};

fn parse_arg_u64(args: &[String], flag: &str, default: u64) -> u64 {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(v) = args[i + 1].parse::<u64>() {
                return v;
            }
        }
    }
    default
}

/// Seeds `first, first + 1, ...`, cut short at `u64::MAX`.
fn seed_range(first: u64, games: u64) -> Range<u64> {
    first..first.saturating_add(games)
}

fn main() -> Result<(), String> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let games = parse_arg_u64(&args, "--games", 100).max(1);
    let plies = u32::try_from(parse_arg_u64(&args, "--plies", 200).max(1)).map_err(|e| e.to_string())?;
    let first_seed = parse_arg_u64(&args, "--seed", 1);

    let (mut mates, mut stalemates, mut unfinished, mut total_plies) = (0u64, 0u64, 0u64, 0u64);
    for seed in seed_range(first_seed, games) {
        let summary = random_playout(seed, plies).map_err(|e| {
            error!("seed {seed} failed: {e}");
            format!("seed {seed}: {e}")
        })?;
        total_plies += u64::from(summary.plies);
        match summary.end {
            PlayoutEnd::Finished(Outcome::Checkmate { .. }) => mates += 1,
            PlayoutEnd::Finished(Outcome::Stalemate) => stalemates += 1,
            PlayoutEnd::MaxPlies => unfinished += 1,
        }
    }

    info!("soak finished without invariant violations");
    println!(
        "games={games} plies={total_plies} checkmates={mates} stalemates={stalemates} unfinished={unfinished}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn seed_zero_is_kept() {
        let args = args("rules_soak --seed 0 --games 0");
        assert_eq!(parse_arg_u64(&args, "--seed", 1), 0);
        assert_eq!(parse_arg_u64(&args, "--games", 100), 0);
        assert_eq!(parse_arg_u64(&args, "--plies", 200), 200);
    }

    #[test]
    fn seeds_stop_at_the_top_of_the_range() {
        assert_eq!(seed_range(u64::MAX - 1, 5), u64::MAX - 1..u64::MAX);
        assert_eq!(seed_range(u64::MAX, 3).count(), 0);
        assert_eq!(seed_range(0, 3).collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
