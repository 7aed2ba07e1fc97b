use crate::game::{Card, GameState};

/// Scoring functions estimating distance to the solved state. The first
/// three never overestimate the true remaining move count; the penalty
/// evaluators do and are only suitable for greedy orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Cards still missing from the foundations.
    FoundationDeficit,
    /// Per card, the ranks of its suit still missing below it (at least 1).
    RankDistance,
    /// Like `RankDistance`, but charges for blocking cards stacked above
    /// each needed card, discounting blockers already accounted for.
    BlockerAware,
    /// Board-shape penalty: incomplete foundations, occupied cells, broken
    /// sequences, and immobile top cards.
    ShapePenalty,
    /// Coarser penalty rewarding foundation progress and tidy cascades.
    ProgressPenalty,
}

impl Heuristic {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "foundation-deficit" => Some(Self::FoundationDeficit),
            "rank-distance" => Some(Self::RankDistance),
            "blocker-aware" => Some(Self::BlockerAware),
            "shape-penalty" => Some(Self::ShapePenalty),
            "progress-penalty" => Some(Self::ProgressPenalty),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::FoundationDeficit => "foundation-deficit",
            Self::RankDistance => "rank-distance",
            Self::BlockerAware => "blocker-aware",
            Self::ShapePenalty => "shape-penalty",
            Self::ProgressPenalty => "progress-penalty",
        }
    }

    pub fn is_admissible(self) -> bool {
        matches!(
            self,
            Self::FoundationDeficit | Self::RankDistance | Self::BlockerAware
        )
    }

    pub fn evaluate(self, state: &GameState) -> i64 {
        match self {
            Self::FoundationDeficit => foundation_deficit(state),
            Self::RankDistance => rank_distance(state),
            Self::BlockerAware => blocker_aware(state),
            Self::ShapePenalty => shape_penalty(state),
            Self::ProgressPenalty => progress_penalty(state),
        }
    }
}

fn foundation_deficit(state: &GameState) -> i64 {
    let in_foundations: usize = state.foundations().iter().map(Vec::len).sum();
    state.deck_size().card_count() as i64 - in_foundations as i64
}

fn rank_distance(state: &GameState) -> i64 {
    let tops: [u8; 4] = std::array::from_fn(|idx| state.foundations()[idx].len() as u8);
    let card_cost = |card: &Card| -> i64 {
        let top = tops[card.suit.foundation_index()];
        let missing = (1..card.rank).filter(|rank| *rank > top).count() as i64;
        missing.max(1)
    };

    let cascade_cost: i64 = state
        .cascades()
        .iter()
        .flat_map(|pile| pile.iter())
        .map(card_cost)
        .sum();
    let cell_cost: i64 = state.free_cells().iter().flatten().map(card_cost).sum();
    cascade_cost + cell_cost
}

fn blocker_aware(state: &GameState) -> i64 {
    let mut next_needed = [0u8; 4];
    let mut moved = [[false; 14]; 4];
    for (suit_idx, pile) in state.foundations().iter().enumerate() {
        for card in pile {
            moved[suit_idx][card.rank as usize] = true;
        }
        next_needed[suit_idx] = pile.len() as u8 + 1;
    }

    // (card, cascade position); None marks a free-cell card with no blockers.
    let mut cards: Vec<(Card, Option<(usize, usize)>)> = Vec::new();
    for (idx, pile) in state.cascades().iter().enumerate() {
        for (pos, card) in pile.iter().enumerate() {
            cards.push((*card, Some((idx, pos))));
        }
    }
    for card in state.free_cells().iter().flatten() {
        cards.push((*card, None));
    }
    cards.sort_by_key(|(card, _)| (card.suit.foundation_index(), card.rank));

    let mut total = 0i64;
    for (card, location) in cards {
        let suit_idx = card.suit.foundation_index();
        if card.rank < next_needed[suit_idx] {
            continue;
        }
        let blockers = match location {
            Some((idx, pos)) => state.cascades()[idx][pos + 1..]
                .iter()
                .filter(|above| !moved[above.suit.foundation_index()][above.rank as usize])
                .count() as i64,
            None => 0,
        };
        if card.rank == next_needed[suit_idx] {
            total += (blockers + 1).max(1);
            next_needed[suit_idx] += 1;
            moved[suit_idx][card.rank as usize] = true;
        } else {
            let gap = i64::from(card.rank - next_needed[suit_idx]);
            total += (blockers + gap + 1).max(1);
        }
    }
    total
}

fn shape_penalty(state: &GameState) -> i64 {
    let mut score = 0i64;

    for pile in state.foundations() {
        score += (13 - pile.len() as i64) * 50;
    }

    score += occupied_free_cells(state) * 100;

    for pile in state.cascades() {
        for pair in pile.windows(2) {
            if pair[0].rank != pair[1].rank + 1 {
                score += 20;
            }
            if pair[0].color_red() == pair[1].color_red() {
                score += 10;
            }
        }
    }

    score + mobility_penalty(state)
}

fn mobility_penalty(state: &GameState) -> i64 {
    let mut penalty = 0i64;
    for (idx, pile) in state.cascades().iter().enumerate() {
        let Some(top) = pile.last().copied() else {
            continue;
        };
        if state.can_move_to_foundation(top) {
            continue;
        }
        let relocatable = (0..state.cascades().len())
            .any(|dst| dst != idx && state.can_move_to_cascade(top, dst));
        if !relocatable {
            penalty += 50;
        }
    }
    penalty + occupied_free_cells(state) * 50
}

fn progress_penalty(state: &GameState) -> i64 {
    let mut score = 0i64;
    for pile in state.foundations() {
        score -= pile.len() as i64 * 10;
    }
    score += occupied_free_cells(state) * 5;
    for pile in state.cascades() {
        for pair in pile.windows(2) {
            let ordered =
                pair[0].rank == pair[1].rank + 1 && pair[0].color_red() != pair[1].color_red();
            if !ordered {
                score += 1;
            }
        }
    }
    score
}

fn occupied_free_cells(state: &GameState) -> i64 {
    state.free_cells().iter().filter(|slot| slot.is_some()).count() as i64
}
