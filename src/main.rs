/* main.rs
 *
 * Copyright 2026 emviolet
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 *
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

mod engine;
mod game;
mod solvability;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::engine::auto_foundation::{self, AutoFoundationPolicy};
use crate::engine::heuristics::Heuristic;
use crate::engine::hinting;
use crate::engine::metrics;
use crate::engine::search::{self, Algorithm, SearchConfig};
use crate::game::{parse, DeckSize, GameState};

#[derive(Debug, Clone)]
struct SolveOptions {
    input_path: Option<String>,
    seed: Option<u64>,
    deck_size: DeckSize,
    algorithm: Algorithm,
    heuristic: Option<Heuristic>,
    max_states: Option<usize>,
    max_depth: Option<usize>,
    weight: Option<f64>,
    time_budget_ms: Option<u64>,
    normalize_free_cells: bool,
    auto_foundation: Option<AutoFoundationPolicy>,
    out_path: Option<String>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            input_path: None,
            seed: None,
            deck_size: DeckSize::FiftyTwo,
            algorithm: Algorithm::AStar,
            heuristic: None,
            max_states: None,
            max_depth: None,
            weight: None,
            time_budget_ms: None,
            normalize_free_cells: false,
            auto_foundation: None,
            out_path: None,
        }
    }
}

#[derive(Debug, Clone)]
struct FindSolvableOptions {
    start_seed: u64,
    attempts: u32,
    deck_size: DeckSize,
    algorithm: Algorithm,
    max_states: Option<usize>,
}

impl Default for FindSolvableOptions {
    fn default() -> Self {
        Self {
            start_seed: 1,
            attempts: solvability::default_find_solvable_attempts(),
            deck_size: DeckSize::FiftyTwo,
            algorithm: Algorithm::AStar,
            max_states: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Solve,
    Hint,
    Deal,
    CheckSolvable,
    FindSolvable,
}

#[derive(Debug, Clone)]
enum Command {
    Solve(SolveOptions),
    Hint(SolveOptions),
    Deal(SolveOptions),
    CheckSolvable(SolveOptions),
    FindSolvable(FindSolvableOptions),
}

fn parse_u64(value: Option<String>, flag: &str) -> Result<u64, String> {
    value
        .ok_or_else(|| format!("missing value for {flag}"))?
        .parse::<u64>()
        .map_err(|_| format!("invalid value for {flag}"))
}

fn parse_u32(value: Option<String>, flag: &str) -> Result<u32, String> {
    value
        .ok_or_else(|| format!("missing value for {flag}"))?
        .parse::<u32>()
        .map_err(|_| format!("invalid value for {flag}"))
}

fn parse_usize(value: Option<String>, flag: &str) -> Result<usize, String> {
    value
        .ok_or_else(|| format!("missing value for {flag}"))?
        .parse::<usize>()
        .map_err(|_| format!("invalid value for {flag}"))
}

fn parse_f64(value: Option<String>, flag: &str) -> Result<f64, String> {
    value
        .ok_or_else(|| format!("missing value for {flag}"))?
        .parse::<f64>()
        .map_err(|_| format!("invalid value for {flag}"))
}

fn parse_deck_size(value: &str) -> Result<DeckSize, String> {
    match value {
        "12" => Ok(DeckSize::Twelve),
        "28" => Ok(DeckSize::TwentyEight),
        "52" => Ok(DeckSize::FiftyTwo),
        _ => Err("deck size must be one of: 12, 28, 52".to_string()),
    }
}

fn print_help() {
    let algorithms: Vec<&str> = Algorithm::ALL.iter().map(|algorithm| algorithm.id()).collect();
    println!(
        "freecellist, a FreeCell solver\n\
         \n\
         Usage:\n\
         \x20 freecellist --solve PATH [options]\n\
         \x20 freecellist --seed N [options]\n\
         \x20 freecellist --hint (--solve PATH | --seed N) [options]\n\
         \x20 freecellist --deal [--seed N] [--deck 12|28|52] [--out PATH]\n\
         \x20 freecellist --check-solvable --seed N [options]\n\
         \x20 freecellist --find-solvable [--start-seed N] [--attempts N] [options]\n\
         \n\
         Options:\n\
         \x20 --algorithm {}\n\
         \x20 --heuristic foundation-deficit|rank-distance|blocker-aware|shape-penalty|progress-penalty\n\
         \x20 --deck 12|28|52          deck variant for seeded deals\n\
         \x20 --max-states N           exploration budget override\n\
         \x20 --max-depth N            DFS/IDS depth cutoff override\n\
         \x20 --weight W               weighted A* heuristic weight\n\
         \x20 --time-budget-ms N       wall-clock guard for one run\n\
         \x20 --auto-foundation naive|safe  advance safe cards before solving\n\
         \x20 --normalize-free-cells   hash free cells as an unordered set\n\
         \x20 --out PATH               write the report or layout to a file",
        algorithms.join("|")
    );
}

fn parse_args(args: &[String]) -> Result<Option<Command>, String> {
    if args.len() <= 1 {
        print_help();
        return Ok(None);
    }

    let mut mode = Mode::Solve;
    let mut solve = SolveOptions::default();
    let mut find = FindSolvableOptions::default();
    let mut idx = 1usize;

    while idx < args.len() {
        match args[idx].as_str() {
            "--solve" => {
                solve.input_path = Some(
                    args.get(idx + 1)
                        .cloned()
                        .ok_or_else(|| "missing value for --solve".to_string())?,
                );
                idx += 2;
            }
            "--seed" => {
                solve.seed = Some(parse_u64(args.get(idx + 1).cloned(), "--seed")?);
                idx += 2;
            }
            "--deck" => {
                let raw = args
                    .get(idx + 1)
                    .ok_or_else(|| "missing value for --deck".to_string())?;
                solve.deck_size = parse_deck_size(raw)?;
                find.deck_size = solve.deck_size;
                idx += 2;
            }
            "--algorithm" => {
                let raw = args
                    .get(idx + 1)
                    .ok_or_else(|| "missing value for --algorithm".to_string())?;
                let algorithm = Algorithm::from_id(raw)
                    .ok_or_else(|| format!("unknown algorithm: {raw}"))?;
                solve.algorithm = algorithm;
                find.algorithm = algorithm;
                idx += 2;
            }
            "--heuristic" => {
                let raw = args
                    .get(idx + 1)
                    .ok_or_else(|| "missing value for --heuristic".to_string())?;
                solve.heuristic =
                    Some(Heuristic::from_id(raw).ok_or_else(|| format!("unknown heuristic: {raw}"))?);
                idx += 2;
            }
            "--max-states" => {
                let value = parse_usize(args.get(idx + 1).cloned(), "--max-states")?;
                solve.max_states = Some(value);
                find.max_states = Some(value);
                idx += 2;
            }
            "--max-depth" => {
                solve.max_depth = Some(parse_usize(args.get(idx + 1).cloned(), "--max-depth")?);
                idx += 2;
            }
            "--weight" => {
                solve.weight = Some(parse_f64(args.get(idx + 1).cloned(), "--weight")?);
                idx += 2;
            }
            "--time-budget-ms" => {
                solve.time_budget_ms =
                    Some(parse_u64(args.get(idx + 1).cloned(), "--time-budget-ms")?);
                idx += 2;
            }
            "--auto-foundation" => {
                let raw = args
                    .get(idx + 1)
                    .ok_or_else(|| "missing value for --auto-foundation".to_string())?;
                solve.auto_foundation = Some(
                    AutoFoundationPolicy::from_id(raw)
                        .ok_or_else(|| format!("unknown auto-foundation policy: {raw}"))?,
                );
                idx += 2;
            }
            "--normalize-free-cells" => {
                solve.normalize_free_cells = true;
                idx += 1;
            }
            "--out" => {
                solve.out_path = Some(
                    args.get(idx + 1)
                        .cloned()
                        .ok_or_else(|| "missing value for --out".to_string())?,
                );
                idx += 2;
            }
            "--hint" => {
                mode = Mode::Hint;
                idx += 1;
            }
            "--deal" => {
                mode = Mode::Deal;
                idx += 1;
            }
            "--check-solvable" => {
                mode = Mode::CheckSolvable;
                idx += 1;
            }
            "--find-solvable" => {
                mode = Mode::FindSolvable;
                idx += 1;
            }
            "--start-seed" => {
                find.start_seed = parse_u64(args.get(idx + 1).cloned(), "--start-seed")?;
                idx += 2;
            }
            "--attempts" => {
                find.attempts = parse_u32(args.get(idx + 1).cloned(), "--attempts")?;
                idx += 2;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            other => {
                return Err(format!("unknown argument: {other}"));
            }
        }
    }

    Ok(Some(match mode {
        Mode::Solve => Command::Solve(solve),
        Mode::Hint => Command::Hint(solve),
        Mode::Deal => Command::Deal(solve),
        Mode::CheckSolvable => Command::CheckSolvable(solve),
        Mode::FindSolvable => Command::FindSolvable(find),
    }))
}

fn build_config(options: &SolveOptions) -> SearchConfig {
    let mut config = SearchConfig::for_algorithm(options.algorithm);
    if let Some(heuristic) = options.heuristic {
        config.heuristic = heuristic;
    }
    if let Some(max_states) = options.max_states {
        config.max_states = max_states;
    }
    if let Some(max_depth) = options.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(weight) = options.weight {
        config.weight = weight;
    }
    config.time_budget_ms = options.time_budget_ms;
    config.normalize_free_cells = options.normalize_free_cells;
    config
}

fn load_game(options: &SolveOptions) -> Result<(GameState, String), String> {
    if let Some(path) = &options.input_path {
        let text =
            fs::read_to_string(path).map_err(|err| format!("unable to read {path}: {err}"))?;
        let game =
            parse::parse_layout(&text).map_err(|err| format!("unable to parse {path}: {err}"))?;
        let label = Path::new(path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        return Ok((game, label));
    }
    if let Some(seed) = options.seed {
        return Ok((
            GameState::new_with_seed(seed, options.deck_size),
            format!("seed {seed}"),
        ));
    }
    Err("missing input: pass --solve PATH or --seed N".to_string())
}

fn write_or_print(out_path: Option<&String>, contents: &str, what: &str) -> Result<(), String> {
    match out_path {
        Some(path) => {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| err.to_string())?;
                }
            }
            fs::write(path, contents).map_err(|err| err.to_string())?;
            eprintln!("Wrote {what}: {path}");
            Ok(())
        }
        None => {
            print!("{contents}");
            Ok(())
        }
    }
}

fn run_solve(options: &SolveOptions) -> Result<(), String> {
    let (initial, label) = load_game(options)?;
    let config = build_config(options);
    if options.algorithm == Algorithm::AStar && !config.heuristic.is_admissible() {
        eprintln!(
            "note: heuristic {} is not admissible; A* results may be suboptimal",
            config.heuristic.id()
        );
    }

    let mut game = initial.clone();
    let mut prefix = Vec::new();
    if let Some(policy) = options.auto_foundation {
        prefix = auto_foundation::advance(&mut game, policy);
        if !prefix.is_empty() {
            eprintln!(
                "Auto-foundation ({}) advanced {} card(s) before the search.",
                policy.id(),
                prefix.len()
            );
        }
    }

    let outcome = search::solve(&game, options.algorithm, &config);
    let mut metrics = outcome.metrics;
    let solution = outcome.solution.map(|line| {
        let mut combined = prefix.clone();
        combined.extend(line);
        combined
    });
    if let Some(line) = &solution {
        metrics.solution_length = line.len();
    }

    let layout = parse::serialize_layout(&initial);
    let report = metrics::render_report(
        &label,
        options.algorithm.label(),
        Some(&layout),
        solution.as_deref(),
        &metrics,
    );
    write_or_print(options.out_path.as_ref(), &report, "solution report")
}

fn run_hint(options: &SolveOptions) -> Result<(), String> {
    let (game, _) = load_game(options)?;
    let config = build_config(options);
    match hinting::hint(&game, options.algorithm, &config) {
        Some(mv) => println!("Hint: {}.", mv.describe()),
        None if game.is_solved() => println!("Already solved."),
        None if !game.has_legal_moves() => println!("No legal moves remain."),
        None => println!("No hint available within the exploration budget."),
    }
    Ok(())
}

fn run_deal(options: &SolveOptions) -> Result<(), String> {
    let game = match options.seed {
        Some(seed) => GameState::new_with_seed(seed, options.deck_size),
        None => GameState::new_shuffled(options.deck_size),
    };
    let layout = parse::serialize_layout(&game);
    write_or_print(options.out_path.as_ref(), &layout, "puzzle layout")
}

fn run_check_solvable(options: &SolveOptions) -> Result<(), String> {
    let seed = options
        .seed
        .ok_or_else(|| "missing input: --check-solvable requires --seed N".to_string())?;
    let config = build_config(options);
    let cancel = std::sync::atomic::AtomicBool::new(false);
    let result = solvability::is_seed_solvable(
        seed,
        options.deck_size,
        options.algorithm,
        &config,
        &cancel,
    )
    .ok_or_else(|| "solvability check canceled".to_string())?;

    if result.solvable {
        println!(
            "Seed {seed} is solvable in {} move(s) ({} states explored).",
            result.solution_length.unwrap_or(0),
            result.explored_states
        );
        if let Some(first) = result.line.as_ref().and_then(|line| line.first()) {
            println!("First move: {}.", first.describe());
        }
    } else if result.hit_state_limit {
        println!(
            "Seed {seed}: no solution within {} explored states.",
            config.max_states
        );
    } else {
        println!(
            "Seed {seed} is not solvable ({} states explored).",
            result.explored_states
        );
    }
    Ok(())
}

fn run_find_solvable(options: &FindSolvableOptions) -> Result<(), String> {
    let mut config = SearchConfig::for_algorithm(options.algorithm);
    if let Some(max_states) = options.max_states {
        config.max_states = max_states;
    }

    match solvability::find_solvable_seed_parallel(
        options.start_seed,
        options.attempts,
        options.deck_size,
        options.algorithm,
        config,
    ) {
        Some((seed, checked, line)) => {
            println!(
                "Found solvable seed {seed} after checking {checked} deal(s); solution length {}.",
                line.len()
            );
            Ok(())
        }
        None => {
            println!(
                "No solvable deal found in {} attempt(s) from seed {}.",
                options.attempts, options.start_seed
            );
            Ok(())
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Solve(options) => run_solve(&options),
        Command::Hint(options) => run_hint(&options),
        Command::Deal(options) => run_deal(&options),
        Command::CheckSolvable(options) => run_check_solvable(&options),
        Command::FindSolvable(options) => run_find_solvable(&options),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    match parse_args(&args) {
        Ok(Some(command)) => match run(command) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("{message}");
                ExitCode::FAILURE
            }
        },
        Ok(None) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
