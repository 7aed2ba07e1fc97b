use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use crate::engine::heuristics::Heuristic;
use crate::engine::metrics::{MetricsTracker, SearchMetrics};
use crate::game::{GameState, Move};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    AStar,
    WeightedAStar,
    Greedy,
    Bfs,
    Dfs,
    Ids,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::AStar,
        Algorithm::WeightedAStar,
        Algorithm::Greedy,
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Ids,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "astar" => Some(Self::AStar),
            "weighted-astar" => Some(Self::WeightedAStar),
            "greedy" => Some(Self::Greedy),
            "bfs" => Some(Self::Bfs),
            "dfs" => Some(Self::Dfs),
            "ids" => Some(Self::Ids),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::AStar => "astar",
            Self::WeightedAStar => "weighted-astar",
            Self::Greedy => "greedy",
            Self::Bfs => "bfs",
            Self::Dfs => "dfs",
            Self::Ids => "ids",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AStar => "A*",
            Self::WeightedAStar => "Weighted A*",
            Self::Greedy => "Greedy",
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::Ids => "IDS",
        }
    }
}

/// Per-call tuning for one search run. The engine keeps no ambient state;
/// every knob travels through this value.
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub heuristic: Heuristic,
    /// Heuristic weight for the weighted A* frontier; ignored elsewhere.
    pub weight: f64,
    /// Exploration budget. Reaching it is a normal negative result.
    pub max_states: usize,
    /// Depth cutoff for the DFS stack and the IDS limit sweep.
    pub max_depth: usize,
    /// Optional wall-clock guard for pathological frontiers.
    pub time_budget_ms: Option<u64>,
    /// Opt-in: hash free cells as a sorted multiset instead of by slot.
    pub normalize_free_cells: bool,
}

impl SearchConfig {
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        let max_states = match algorithm {
            Algorithm::AStar | Algorithm::WeightedAStar | Algorithm::Greedy => 500_000,
            Algorithm::Bfs | Algorithm::Dfs | Algorithm::Ids => 200_000,
        };
        Self {
            heuristic: Heuristic::BlockerAware,
            weight: 1.5,
            max_states,
            max_depth: 150,
            time_budget_ms: None,
            normalize_free_cells: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub solution: Option<Vec<Move>>,
    pub metrics: SearchMetrics,
}

pub fn solve(start: &GameState, algorithm: Algorithm, config: &SearchConfig) -> SearchOutcome {
    let cancel = AtomicBool::new(false);
    solve_cancelable(start, algorithm, config, &cancel)
        .expect("search without a cancel signal runs to completion")
}

/// Runs one search; returns None only when the cancel flag is raised.
pub fn solve_cancelable(
    start: &GameState,
    algorithm: Algorithm,
    config: &SearchConfig,
    cancel: &AtomicBool,
) -> Option<SearchOutcome> {
    match algorithm {
        Algorithm::AStar => best_first(start, config, cancel, true, 1.0),
        Algorithm::WeightedAStar => best_first(start, config, cancel, true, config.weight),
        Algorithm::Greedy => best_first(start, config, cancel, false, 1.0),
        Algorithm::Bfs => breadth_first(start, config, cancel),
        Algorithm::Dfs => depth_first(start, config, cancel),
        Algorithm::Ids => iterative_deepening(start, config, cancel),
    }
}

struct Node {
    state: GameState,
    path: Vec<Move>,
    f: f64,
    serial: u64,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.serial == other.serial
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Max-heap ordering inverted so the smallest f pops first; equal f breaks
// ties by insertion serial, keeping replays deterministic.
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.serial.cmp(&self.serial))
    }
}

fn best_first(
    start: &GameState,
    config: &SearchConfig,
    cancel: &AtomicBool,
    use_path_cost: bool,
    weight: f64,
) -> Option<SearchOutcome> {
    let mut tracker = MetricsTracker::start();
    let mut visited: HashSet<u64> = HashSet::new();
    visited.insert(hash_state(start, config));

    let mut frontier = BinaryHeap::new();
    let mut serial = 0u64;
    frontier.push(Node {
        f: score(0, config.heuristic.evaluate(start), use_path_cost, weight),
        serial,
        state: start.clone(),
        path: Vec::new(),
    });

    loop {
        if cancel.load(AtomicOrdering::Relaxed) {
            return None;
        }
        if tracker.states_explored >= config.max_states {
            tracker.hit_state_limit = true;
            break;
        }
        if out_of_time(&tracker, config) {
            tracker.hit_time_limit = true;
            break;
        }
        let Some(node) = frontier.pop() else {
            break;
        };
        tracker.bump_explored();
        tracker.note_depth(node.path.len());

        if node.state.is_solved() {
            let length = node.path.len();
            return Some(SearchOutcome {
                solution: Some(node.path),
                metrics: tracker.finish(length),
            });
        }

        for (mv, next) in successors(&node.state) {
            tracker.states_generated += 1;
            let key = hash_state(&next, config);
            if visited.contains(&key) {
                continue;
            }
            visited.insert(key);
            serial += 1;
            let g = node.path.len() + 1;
            let mut path = node.path.clone();
            path.push(mv);
            frontier.push(Node {
                f: score(g, config.heuristic.evaluate(&next), use_path_cost, weight),
                serial,
                state: next,
                path,
            });
            tracker.note_queue_len(frontier.len());
        }
    }

    Some(SearchOutcome {
        solution: None,
        metrics: tracker.finish(0),
    })
}

fn breadth_first(
    start: &GameState,
    config: &SearchConfig,
    cancel: &AtomicBool,
) -> Option<SearchOutcome> {
    let mut tracker = MetricsTracker::start();
    let mut visited: HashSet<u64> = HashSet::new();
    visited.insert(hash_state(start, config));

    let mut frontier: VecDeque<(GameState, Vec<Move>)> = VecDeque::new();
    frontier.push_back((start.clone(), Vec::new()));

    loop {
        if cancel.load(AtomicOrdering::Relaxed) {
            return None;
        }
        if tracker.states_explored >= config.max_states {
            tracker.hit_state_limit = true;
            break;
        }
        if out_of_time(&tracker, config) {
            tracker.hit_time_limit = true;
            break;
        }
        let Some((state, path)) = frontier.pop_front() else {
            break;
        };
        tracker.bump_explored();
        tracker.note_depth(path.len());

        if state.is_solved() {
            let length = path.len();
            return Some(SearchOutcome {
                solution: Some(path),
                metrics: tracker.finish(length),
            });
        }

        for (mv, next) in successors(&state) {
            tracker.states_generated += 1;
            let key = hash_state(&next, config);
            if visited.contains(&key) {
                continue;
            }
            visited.insert(key);
            let mut next_path = path.clone();
            next_path.push(mv);
            frontier.push_back((next, next_path));
            tracker.note_queue_len(frontier.len());
        }
    }

    Some(SearchOutcome {
        solution: None,
        metrics: tracker.finish(0),
    })
}

fn depth_first(
    start: &GameState,
    config: &SearchConfig,
    cancel: &AtomicBool,
) -> Option<SearchOutcome> {
    let mut tracker = MetricsTracker::start();
    let mut visited: HashSet<u64> = HashSet::new();
    visited.insert(hash_state(start, config));

    let mut stack: Vec<(GameState, Vec<Move>)> = vec![(start.clone(), Vec::new())];

    loop {
        if cancel.load(AtomicOrdering::Relaxed) {
            return None;
        }
        if tracker.states_explored >= config.max_states {
            tracker.hit_state_limit = true;
            break;
        }
        if out_of_time(&tracker, config) {
            tracker.hit_time_limit = true;
            break;
        }
        let Some((state, path)) = stack.pop() else {
            break;
        };
        tracker.bump_explored();
        tracker.note_depth(path.len());

        if path.len() > config.max_depth {
            continue;
        }
        if state.is_solved() {
            let length = path.len();
            return Some(SearchOutcome {
                solution: Some(path),
                metrics: tracker.finish(length),
            });
        }

        // Reverse push order so the first enumerated move is expanded first.
        for (mv, next) in successors(&state).into_iter().rev() {
            tracker.states_generated += 1;
            let key = hash_state(&next, config);
            if visited.contains(&key) {
                continue;
            }
            visited.insert(key);
            let mut next_path = path.clone();
            next_path.push(mv);
            stack.push((next, next_path));
            tracker.note_queue_len(stack.len());
        }
    }

    Some(SearchOutcome {
        solution: None,
        metrics: tracker.finish(0),
    })
}

fn iterative_deepening(
    start: &GameState,
    config: &SearchConfig,
    cancel: &AtomicBool,
) -> Option<SearchOutcome> {
    let mut tracker = MetricsTracker::start();

    for depth_limit in 0..=config.max_depth {
        let mut visited: HashSet<u64> = HashSet::new();
        let mut stack: Vec<(GameState, Vec<Move>)> = vec![(start.clone(), Vec::new())];
        let mut pass_explored = 0usize;
        let mut limit_reached = false;

        loop {
            if cancel.load(AtomicOrdering::Relaxed) {
                return None;
            }
            if pass_explored >= config.max_states {
                tracker.hit_state_limit = true;
                break;
            }
            if out_of_time(&tracker, config) {
                tracker.hit_time_limit = true;
                break;
            }
            let Some((state, path)) = stack.pop() else {
                break;
            };
            pass_explored += 1;
            tracker.bump_explored();
            tracker.note_depth(path.len());

            // Nodes at the limit are cut off without a goal check; reaching
            // one means the next, deeper pass still has work to do.
            if path.len() >= depth_limit {
                limit_reached = true;
                continue;
            }
            if state.is_solved() {
                let length = path.len();
                return Some(SearchOutcome {
                    solution: Some(path),
                    metrics: tracker.finish(length),
                });
            }

            for (mv, next) in successors(&state).into_iter().rev() {
                tracker.states_generated += 1;
                let key = hash_state(&next, config);
                if visited.contains(&key) {
                    continue;
                }
                visited.insert(key);
                let mut next_path = path.clone();
                next_path.push(mv);
                stack.push((next, next_path));
                tracker.note_queue_len(stack.len());
            }
        }

        if tracker.hit_time_limit || !limit_reached {
            break;
        }
    }

    Some(SearchOutcome {
        solution: None,
        metrics: tracker.finish(0),
    })
}

fn successors(state: &GameState) -> Vec<(Move, GameState)> {
    state
        .valid_moves()
        .into_iter()
        .map(|mv| {
            let mut next = state.clone();
            let applied = next.apply_move(mv);
            debug_assert!(applied, "move generator only emits legal moves");
            debug_assert_eq!(next.card_count(), state.card_count());
            (mv, next)
        })
        .collect()
}

fn score(g: usize, h: i64, use_path_cost: bool, weight: f64) -> f64 {
    let h = weight * h as f64;
    if use_path_cost {
        g as f64 + h
    } else {
        h
    }
}

fn hash_state(state: &GameState, config: &SearchConfig) -> u64 {
    if config.normalize_free_cells {
        state.state_hash_normalized()
    } else {
        state.state_hash()
    }
}

fn out_of_time(tracker: &MetricsTracker, config: &SearchConfig) -> bool {
    config
        .time_budget_ms
        .is_some_and(|budget| tracker.elapsed().as_millis() >= u128::from(budget))
}
