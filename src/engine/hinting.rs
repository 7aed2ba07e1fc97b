use crate::engine::search::{self, Algorithm, SearchConfig};
use crate::game::{GameState, Move};

/// A hint is the first move of a fresh solve under the active algorithm.
/// Returns None when the solver gives up within its budget.
pub fn hint(state: &GameState, algorithm: Algorithm, config: &SearchConfig) -> Option<Move> {
    search::solve(state, algorithm, config)
        .solution
        .and_then(|moves| moves.into_iter().next())
}
