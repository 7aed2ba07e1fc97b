use super::freecell::is_run;
use super::{GameState, Move, MoveSource};

impl GameState {
    /// Enumerates every legal move in a fixed order: foundation moves, then
    /// free-cell moves, then single-card cascade moves, then supermoves,
    /// each category by ascending source index. The order is part of the
    /// engine contract; DFS pushes it in reverse to bias exploration.
    pub fn valid_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();

        for src in 0..self.cascades.len() {
            if let Some(card) = self.cascade_top(src) {
                if self.can_move_to_foundation(card) {
                    moves.push(Move::ToFoundation {
                        source: MoveSource::Cascade(src),
                        suit: card.suit,
                    });
                }
            }
        }
        for cell in 0..self.free_cells.len() {
            if let Some(card) = self.free_cell_card(cell) {
                if self.can_move_to_foundation(card) {
                    moves.push(Move::ToFoundation {
                        source: MoveSource::FreeCell(cell),
                        suit: card.suit,
                    });
                }
            }
        }

        // All empty free cells are interchangeable: one move per source,
        // targeting the first empty cell.
        if let Some(cell) = self.free_cells.iter().position(Option::is_none) {
            for src in 0..self.cascades.len() {
                if !self.cascades[src].is_empty() {
                    moves.push(Move::ToFreeCell {
                        source: MoveSource::Cascade(src),
                        cell,
                    });
                }
            }
        }

        for src in 0..self.cascades.len() {
            if let Some(card) = self.cascade_top(src) {
                for dst in 0..self.cascades.len() {
                    if dst != src && self.can_move_to_cascade(card, dst) {
                        moves.push(Move::ToCascade {
                            source: MoveSource::Cascade(src),
                            dst,
                        });
                    }
                }
            }
        }
        for cell in 0..self.free_cells.len() {
            if let Some(card) = self.free_cell_card(cell) {
                for dst in 0..self.cascades.len() {
                    if self.can_move_to_cascade(card, dst) {
                        moves.push(Move::ToCascade {
                            source: MoveSource::FreeCell(cell),
                            dst,
                        });
                    }
                }
            }
        }

        // Supermoves cover runs of two or more; single cards were emitted
        // above. Shorter runs come first (start index walks toward the
        // cascade root).
        for src in 0..self.cascades.len() {
            let pile = &self.cascades[src];
            if pile.len() < 2 {
                continue;
            }
            for dst in 0..self.cascades.len() {
                if dst == src {
                    continue;
                }
                let limit = self.max_movable(if self.cascades[dst].is_empty() {
                    Some(dst)
                } else {
                    None
                });
                for start in (0..=pile.len() - 2).rev() {
                    let run = &pile[start..];
                    if run.len() > limit || !is_run(run) {
                        continue;
                    }
                    if self.can_move_to_cascade(run[0], dst) {
                        moves.push(Move::Supermove {
                            src,
                            dst,
                            count: run.len(),
                        });
                    }
                }
            }
        }

        moves
    }

    pub fn has_legal_moves(&self) -> bool {
        !self.valid_moves().is_empty()
    }
}
