use std::fmt;

use super::{rank_label, Card, DeckSize, GameState, Suit};

/// Failures while reading puzzle text. Parsing fails before any game state
/// is constructed, so callers never see a partially filled board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidSuit { token: String },
    InvalidRank { token: String },
    UnsupportedCardCount { count: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidSuit { token } => write!(f, "invalid suit in card: {token}"),
            ParseError::InvalidRank { token } => write!(f, "invalid rank in card: {token}"),
            ParseError::UnsupportedCardCount { count } => {
                write!(f, "unsupported card count: {count} (expected 12, 28 or 52)")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses a tab-separated puzzle layout: one row per depth level, one column
/// per cascade, each cell a rank token followed by a suit symbol. Columns
/// beyond the eighth are ignored.
pub fn parse_layout(text: &str) -> Result<GameState, ParseError> {
    let mut cascades: [Vec<Card>; 8] = std::array::from_fn(|_| Vec::new());

    for row in text.lines() {
        if row.trim().is_empty() {
            continue;
        }
        for (col, token) in row.split('\t').enumerate() {
            if col >= cascades.len() {
                break;
            }
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            cascades[col].push(parse_card(token)?);
        }
    }

    let count: usize = cascades.iter().map(Vec::len).sum();
    let deck_size = DeckSize::from_card_count(count)
        .ok_or(ParseError::UnsupportedCardCount { count })?;

    Ok(GameState::from_parts(
        deck_size,
        cascades,
        [None; 4],
        std::array::from_fn(|_| Vec::new()),
    ))
}

/// Renders the cascades back to the tab-separated layout format. Parsing the
/// result of `serialize_layout` reproduces the same state.
pub fn serialize_layout(state: &GameState) -> String {
    let max_depth = state.cascades().iter().map(Vec::len).max().unwrap_or(0);
    let mut out = String::new();
    for row in 0..max_depth {
        let cells: Vec<String> = state
            .cascades()
            .iter()
            .map(|pile| pile.get(row).map(card_token).unwrap_or_default())
            .collect();
        out.push_str(cells.join("\t").trim_end());
        out.push('\n');
    }
    out
}

fn parse_card(token: &str) -> Result<Card, ParseError> {
    let (rank, rest) = if let Some(rest) = token.strip_prefix("10") {
        (10, rest)
    } else {
        let mut chars = token.chars();
        let rank_char = chars.next().ok_or_else(|| ParseError::InvalidRank {
            token: token.to_string(),
        })?;
        let rank = match rank_char {
            'A' => 1,
            'J' => 11,
            'Q' => 12,
            'K' => 13,
            digit @ '2'..='9' => digit as u8 - b'0',
            _ => {
                return Err(ParseError::InvalidRank {
                    token: token.to_string(),
                })
            }
        };
        (rank, chars.as_str())
    };

    let suit = rest
        .chars()
        .next()
        .and_then(Suit::from_symbol)
        .ok_or_else(|| ParseError::InvalidSuit {
            token: token.to_string(),
        })?;

    Ok(Card { suit, rank })
}

fn card_token(card: &Card) -> String {
    format!("{}{}", rank_label(card.rank), card.suit.symbol())
}
