use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{Card, DeckSize, Move, MoveSource, Suit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(super) deck_size: DeckSize,
    pub(super) cascades: [Vec<Card>; 8],
    pub(super) free_cells: [Option<Card>; 4],
    pub(super) foundations: [Vec<Card>; 4],
}

// Hash covers exactly the three card containers so it agrees with equality.
// Free-cell slots hash positionally: which cell holds a card is significant.
impl Hash for GameState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cascades.hash(state);
        self.free_cells.hash(state);
        self.foundations.hash(state);
    }
}

impl GameState {
    pub fn new_shuffled(deck_size: DeckSize) -> Self {
        let mut rng = rand::thread_rng();
        Self::new_with_seed(rng.gen(), deck_size)
    }

    pub fn new_with_seed(seed: u64, deck_size: DeckSize) -> Self {
        let mut deck = full_deck(deck_size);
        let mut rng = StdRng::seed_from_u64(seed);
        deck.shuffle(&mut rng);

        let mut game = Self {
            deck_size,
            cascades: std::array::from_fn(|_| Vec::new()),
            free_cells: [None; 4],
            foundations: std::array::from_fn(|_| Vec::new()),
        };

        for (idx, card) in deck.into_iter().enumerate() {
            game.cascades[idx % 8].push(card);
        }

        game
    }

    pub(crate) fn from_parts(
        deck_size: DeckSize,
        cascades: [Vec<Card>; 8],
        free_cells: [Option<Card>; 4],
        foundations: [Vec<Card>; 4],
    ) -> Self {
        Self {
            deck_size,
            cascades,
            free_cells,
            foundations,
        }
    }

    pub fn deck_size(&self) -> DeckSize {
        self.deck_size
    }

    pub fn cascades(&self) -> &[Vec<Card>; 8] {
        &self.cascades
    }

    pub fn free_cells(&self) -> &[Option<Card>; 4] {
        &self.free_cells
    }

    pub fn foundations(&self) -> &[Vec<Card>; 4] {
        &self.foundations
    }

    pub fn cascade_top(&self, idx: usize) -> Option<Card> {
        self.cascades.get(idx).and_then(|pile| pile.last().copied())
    }

    pub fn free_cell_card(&self, cell: usize) -> Option<Card> {
        self.free_cells.get(cell).and_then(|slot| *slot)
    }

    pub fn foundation_top_rank(&self, suit: Suit) -> u8 {
        self.foundations[suit.foundation_index()]
            .last()
            .map(|card| card.rank)
            .unwrap_or(0)
    }

    pub fn card_count(&self) -> usize {
        let cascade_count: usize = self.cascades.iter().map(Vec::len).sum();
        let foundation_count: usize = self.foundations.iter().map(Vec::len).sum();
        let cell_count = self.free_cells.iter().filter(|slot| slot.is_some()).count();
        cascade_count + foundation_count + cell_count
    }

    /// Solved means every card has reached its foundation: all cascades and
    /// free cells are empty.
    pub fn is_solved(&self) -> bool {
        self.cascades.iter().all(Vec::is_empty) && self.free_cells.iter().all(Option::is_none)
    }

    pub fn can_move_to_foundation(&self, card: Card) -> bool {
        let foundation = &self.foundations[card.suit.foundation_index()];
        match foundation.last() {
            None => card.rank == 1,
            Some(top) => card.rank == top.rank + 1,
        }
    }

    pub fn can_move_to_cascade(&self, card: Card, dst: usize) -> bool {
        let Some(pile) = self.cascades.get(dst) else {
            return false;
        };
        match pile.last() {
            None => true,
            Some(top) => card.rank + 1 == top.rank && card.color_red() != top.color_red(),
        }
    }

    /// Supermove capacity: (empty free cells + 1) * 2^(empty cascades).
    /// The destination is excluded from the empty-cascade count when it is
    /// itself empty, since it cannot double as routing space.
    pub fn max_movable(&self, dest: Option<usize>) -> usize {
        let free_empty = self.free_cells.iter().filter(|slot| slot.is_none()).count();
        let empty_cascades = self
            .cascades
            .iter()
            .enumerate()
            .filter(|(idx, pile)| pile.is_empty() && dest != Some(*idx))
            .count();
        (free_empty + 1) * (1usize << empty_cascades)
    }

    /// Applies a move if it is legal under the current state. Returns false
    /// and leaves the state untouched otherwise; interactive callers poll
    /// legality continuously, so illegal requests are not an error.
    pub fn apply_move(&mut self, mv: Move) -> bool {
        match mv {
            Move::ToFoundation { source, suit } => {
                let Some(card) = self.source_card(source) else {
                    return false;
                };
                if card.suit != suit || !self.can_move_to_foundation(card) {
                    return false;
                }
                let taken = self.take_source_card(source);
                debug_assert_eq!(taken, Some(card));
                self.foundations[suit.foundation_index()].push(card);
                true
            }
            Move::ToFreeCell { source, cell } => {
                // Cell-to-cell shuffles are never legal moves.
                let MoveSource::Cascade(src) = source else {
                    return false;
                };
                if cell >= self.free_cells.len() || self.free_cells[cell].is_some() {
                    return false;
                }
                let Some(card) = self.cascades.get_mut(src).and_then(Vec::pop) else {
                    return false;
                };
                self.free_cells[cell] = Some(card);
                true
            }
            Move::ToCascade { source, dst } => {
                if let MoveSource::Cascade(src) = source {
                    if src == dst {
                        return false;
                    }
                }
                let Some(card) = self.source_card(source) else {
                    return false;
                };
                if !self.can_move_to_cascade(card, dst) {
                    return false;
                }
                let taken = self.take_source_card(source);
                debug_assert_eq!(taken, Some(card));
                self.cascades[dst].push(card);
                true
            }
            Move::Supermove { src, dst, count } => {
                if !self.can_supermove(src, dst, count) {
                    return false;
                }
                let start = self.cascades[src].len() - count;
                let moved = self.cascades[src].split_off(start);
                self.cascades[dst].extend(moved);
                true
            }
        }
    }

    pub fn can_supermove(&self, src: usize, dst: usize, count: usize) -> bool {
        if src == dst || src >= self.cascades.len() || dst >= self.cascades.len() {
            return false;
        }
        let pile = &self.cascades[src];
        if count < 2 || count > pile.len() {
            return false;
        }
        let run = &pile[pile.len() - count..];
        if !is_run(run) {
            return false;
        }
        let limit = self.max_movable(if self.cascades[dst].is_empty() {
            Some(dst)
        } else {
            None
        });
        count <= limit && self.can_move_to_cascade(run[0], dst)
    }

    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Opt-in canonicalization: hashes free cells as a sorted multiset so
    /// states differing only in slot assignment collapse into one visited
    /// entry. The default `state_hash` keeps slot identity significant.
    pub fn state_hash_normalized(&self) -> u64 {
        let mut cells: Vec<Card> = self.free_cells.iter().copied().flatten().collect();
        cells.sort_by_key(|card| (card.suit.foundation_index(), card.rank));

        let mut hasher = DefaultHasher::new();
        self.cascades.hash(&mut hasher);
        cells.hash(&mut hasher);
        self.foundations.hash(&mut hasher);
        hasher.finish()
    }

    fn source_card(&self, source: MoveSource) -> Option<Card> {
        match source {
            MoveSource::Cascade(idx) => self.cascade_top(idx),
            MoveSource::FreeCell(idx) => self.free_cell_card(idx),
        }
    }

    fn take_source_card(&mut self, source: MoveSource) -> Option<Card> {
        match source {
            MoveSource::Cascade(idx) => self.cascades.get_mut(idx).and_then(Vec::pop),
            MoveSource::FreeCell(idx) => self.free_cells.get_mut(idx).and_then(Option::take),
        }
    }
}

#[cfg(test)]
impl GameState {
    pub(crate) fn cascades_mut(&mut self) -> &mut [Vec<Card>; 8] {
        &mut self.cascades
    }

    pub(crate) fn free_cells_mut(&mut self) -> &mut [Option<Card>; 4] {
        &mut self.free_cells
    }

    pub(crate) fn foundations_mut(&mut self) -> &mut [Vec<Card>; 4] {
        &mut self.foundations
    }
}

pub(crate) fn is_run(cards: &[Card]) -> bool {
    cards.windows(2).all(|pair| {
        let a = pair[0];
        let b = pair[1];
        a.rank == b.rank + 1 && a.color_red() != b.color_red()
    })
}

fn full_deck(deck_size: DeckSize) -> Vec<Card> {
    let mut deck = Vec::with_capacity(deck_size.card_count());
    for suit in Suit::ALL {
        for rank in 1..=deck_size.rank_count() {
            deck.push(Card { suit, rank });
        }
    }
    deck
}
