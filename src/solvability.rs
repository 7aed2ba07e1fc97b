/* solvability.rs
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

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use crate::engine::search::{self, Algorithm, SearchConfig};
use crate::game::{DeckSize, GameState, Move};

#[derive(Debug, Clone)]
pub struct SeedSolvabilityResult {
    pub solvable: bool,
    pub explored_states: usize,
    pub solution_length: Option<usize>,
    pub hit_state_limit: bool,
    pub line: Option<Vec<Move>>,
}

pub fn default_find_solvable_attempts() -> u32 {
    thread::available_parallelism()
        .map(|n| (n.get() * 6).clamp(16, 128) as u32)
        .unwrap_or(48)
}

pub fn is_seed_solvable(
    seed: u64,
    deck_size: DeckSize,
    algorithm: Algorithm,
    config: &SearchConfig,
    cancel: &AtomicBool,
) -> Option<SeedSolvabilityResult> {
    let game = GameState::new_with_seed(seed, deck_size);
    let outcome = search::solve_cancelable(&game, algorithm, config, cancel)?;
    Some(match outcome.solution {
        Some(line) => SeedSolvabilityResult {
            solvable: true,
            explored_states: outcome.metrics.states_explored,
            solution_length: Some(line.len()),
            hit_state_limit: false,
            line: Some(line),
        },
        None => SeedSolvabilityResult {
            solvable: false,
            explored_states: outcome.metrics.states_explored,
            solution_length: None,
            hit_state_limit: outcome.metrics.hit_state_limit,
            line: None,
        },
    })
}

/// Scans seeds start_seed, start_seed+1, ... on all available cores and
/// returns the first solvable deal as (seed, seeds checked, solution line).
pub fn find_solvable_seed_parallel(
    start_seed: u64,
    attempts: u32,
    deck_size: DeckSize,
    algorithm: Algorithm,
    config: SearchConfig,
) -> Option<(u64, u32, Vec<Move>)> {
    if attempts == 0 {
        return None;
    }

    let worker_count = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(attempts as usize)
        .max(1);

    let next_index = Arc::new(AtomicU32::new(0));
    let stop = Arc::new(AtomicBool::new(false));
    let (sender, receiver) = mpsc::channel::<(u64, u32, Vec<Move>)>();

    for _ in 0..worker_count {
        let next_index = Arc::clone(&next_index);
        let stop = Arc::clone(&stop);
        let sender = sender.clone();
        thread::spawn(move || loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            let index = next_index.fetch_add(1, Ordering::Relaxed);
            if index >= attempts {
                break;
            }

            let seed = start_seed.wrapping_add(u64::from(index));
            let game = GameState::new_with_seed(seed, deck_size);
            let Some(outcome) = search::solve_cancelable(&game, algorithm, &config, &stop) else {
                break;
            };
            if let Some(line) = outcome.solution {
                if !stop.swap(true, Ordering::Relaxed) {
                    let _ = sender.send((seed, index + 1, line));
                }
                break;
            }
        });
    }

    drop(sender);
    receiver.recv().ok()
}
