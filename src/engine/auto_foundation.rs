use crate::game::{GameState, Move, MoveSource, Suit};

/// How eagerly the pass promotes cards after a committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoFoundationPolicy {
    /// Promote any card the foundation will accept.
    Naive,
    /// Promote only when every lower rank already sits in the foundation of
    /// every suit, so no cascade still needs the card for building.
    AllLowerPresent,
}

impl AutoFoundationPolicy {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "naive" => Some(Self::Naive),
            "safe" => Some(Self::AllLowerPresent),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Naive => "naive",
            Self::AllLowerPresent => "safe",
        }
    }
}

/// Repeatedly advances eligible cards to the foundations until a full sweep
/// finds nothing to move. Terminates because every promotion grows the
/// foundation count, which is bounded by the deck size.
pub fn advance(state: &mut GameState, policy: AutoFoundationPolicy) -> Vec<Move> {
    let mut applied = Vec::new();
    while let Some(mv) = next_auto_move(state, policy) {
        let ok = state.apply_move(mv);
        debug_assert!(ok, "auto-foundation only selects legal moves");
        applied.push(mv);
    }
    applied
}

fn next_auto_move(state: &GameState, policy: AutoFoundationPolicy) -> Option<Move> {
    for src in 0..state.cascades().len() {
        if let Some(card) = state.cascade_top(src) {
            if state.can_move_to_foundation(card) && allowed(state, card.rank, policy) {
                return Some(Move::ToFoundation {
                    source: MoveSource::Cascade(src),
                    suit: card.suit,
                });
            }
        }
    }
    for cell in 0..state.free_cells().len() {
        if let Some(card) = state.free_cell_card(cell) {
            if state.can_move_to_foundation(card) && allowed(state, card.rank, policy) {
                return Some(Move::ToFoundation {
                    source: MoveSource::FreeCell(cell),
                    suit: card.suit,
                });
            }
        }
    }
    None
}

fn allowed(state: &GameState, rank: u8, policy: AutoFoundationPolicy) -> bool {
    match policy {
        AutoFoundationPolicy::Naive => true,
        AutoFoundationPolicy::AllLowerPresent => (1..rank)
            .all(|below| Suit::ALL.iter().all(|suit| state.foundation_top_rank(*suit) >= below)),
    }
}
