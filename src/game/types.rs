#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Diamonds | Suit::Hearts)
    }

    pub fn short(self) -> &'static str {
        match self {
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Hearts => "H",
            Suit::Spades => "S",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '♣' => Some(Suit::Clubs),
            '♦' => Some(Suit::Diamonds),
            '♥' => Some(Suit::Hearts),
            '♠' => Some(Suit::Spades),
            _ => None,
        }
    }

    pub fn foundation_index(self) -> usize {
        match self {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: u8,
}

impl Card {
    pub fn color_red(&self) -> bool {
        self.suit.is_red()
    }
}

/// Deck variants: the full 52-card game plus the reduced-rank practice decks.
/// Every variant keeps all four suits; only the rank range shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeckSize {
    Twelve,
    TwentyEight,
    FiftyTwo,
}

impl DeckSize {
    pub fn card_count(self) -> usize {
        match self {
            Self::Twelve => 12,
            Self::TwentyEight => 28,
            Self::FiftyTwo => 52,
        }
    }

    pub fn rank_count(self) -> u8 {
        match self {
            Self::Twelve => 3,
            Self::TwentyEight => 7,
            Self::FiftyTwo => 13,
        }
    }

    pub fn from_card_count(value: usize) -> Option<Self> {
        match value {
            12 => Some(Self::Twelve),
            28 => Some(Self::TwentyEight),
            52 => Some(Self::FiftyTwo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveSource {
    Cascade(usize),
    FreeCell(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    ToFoundation { source: MoveSource, suit: Suit },
    ToFreeCell { source: MoveSource, cell: usize },
    ToCascade { source: MoveSource, dst: usize },
    Supermove { src: usize, dst: usize, count: usize },
}

impl Move {
    pub fn describe(&self) -> String {
        match *self {
            Move::Supermove { src, dst, count } => {
                format!(
                    "Move {count} cards from Cascade {} to Cascade {}",
                    src + 1,
                    dst + 1
                )
            }
            Move::ToFoundation { source, suit } => {
                format!(
                    "Move card from {} to {} Foundation",
                    describe_source(source),
                    suit.short()
                )
            }
            Move::ToFreeCell { source, cell } => {
                format!(
                    "Move card from {} to Free Cell {}",
                    describe_source(source),
                    cell + 1
                )
            }
            Move::ToCascade { source, dst } => {
                format!(
                    "Move card from {} to Cascade {}",
                    describe_source(source),
                    dst + 1
                )
            }
        }
    }
}

fn describe_source(source: MoveSource) -> String {
    match source {
        MoveSource::Cascade(idx) => format!("Cascade {}", idx + 1),
        MoveSource::FreeCell(idx) => format!("Free Cell {}", idx + 1),
    }
}

pub fn rank_label(rank: u8) -> &'static str {
    match rank {
        1 => "A",
        2 => "2",
        3 => "3",
        4 => "4",
        5 => "5",
        6 => "6",
        7 => "7",
        8 => "8",
        9 => "9",
        10 => "10",
        11 => "J",
        12 => "Q",
        13 => "K",
        _ => "?",
    }
}
