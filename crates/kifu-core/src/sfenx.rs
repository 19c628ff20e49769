//! Compact position encoding ("sfenx") and the perspective flip.
//!
//! Format: the board row by row from row a to row i, columns 1 to 9 inside a
//! row, runs of empty squares written as a digit, Sente pieces upper-case and
//! Gote pieces lower-case. A single space follows, then eight letters: four
//! for Sente's hand and four for Gote's. Each letter is `'a'` advanced by
//!
//! 1. pawns
//! 2. lances + 5 * knights
//! 3. silvers + 5 * golds
//! 4. bishops + 5 * rooks
//!
//! This string is persisted alongside move statistics, so its bytes must not
//! change.

use std::sync::LazyLock;

use regex::Regex;

use crate::board::{Hand, Piece, PieceKind, Position, Side};
use crate::error::EncodingError;
use crate::moves::Move;

/// Encoding of the standard starting layout.
pub const INITIAL_SFENX: &str = "lnsgkgsnl1b5r1ppppppppp999PPPPPPPPP1R5B1LNSGKGSNL aaaaaaaa";

static SFENX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z0-9]*) ([a-z]{8})$").unwrap());

/// Hand slots: (single-weight kind, five-weight kind).
const HAND_SLOTS: [(PieceKind, Option<PieceKind>); 4] = [
    (PieceKind::Pawn, None),
    (PieceKind::Lance, Some(PieceKind::Knight)),
    (PieceKind::Silver, Some(PieceKind::Gold)),
    (PieceKind::Bishop, Some(PieceKind::Rook)),
];

fn grid_to_str(grid: &[Option<Piece>; 81]) -> String {
    let mut out = String::with_capacity(81);
    for row in grid.chunks(9) {
        let mut empty = 0u8;
        for square in row {
            match square {
                Some(piece) => {
                    if empty > 0 {
                        out.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    out.push(piece.to_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push((b'0' + empty) as char);
        }
    }
    out
}

fn hand_to_str(hand: &Hand, out: &mut String) {
    for (single, five) in HAND_SLOTS {
        let weight = hand.count(single) + five.map(|k| hand.count(k) * 5).unwrap_or(0);
        out.push((b'a' + weight) as char);
    }
}

/// Encode a position. The side to move is not part of the encoding.
pub fn encode(position: &Position) -> String {
    let mut out = grid_to_str(position.grid());
    out.push(' ');
    hand_to_str(position.hand(Side::Sente), &mut out);
    hand_to_str(position.hand(Side::Gote), &mut out);
    out
}

impl Position {
    pub fn to_sfenx(&self) -> String {
        encode(self)
    }

    /// Rebuild a position from its encoding.
    pub fn from_sfenx(sfenx: &str, side_to_move: Side) -> Result<Position, EncodingError> {
        let invalid = || EncodingError::InvalidSfenx(sfenx.to_string());
        let caps = SFENX_RE.captures(sfenx).ok_or_else(invalid)?;

        let mut grid = [None; 81];
        let mut index = 0usize;
        for c in caps[1].chars() {
            if let Some(run) = c.to_digit(10) {
                index += run as usize;
            } else {
                let piece = Piece::from_char(c).ok_or_else(invalid)?;
                let slot = grid.get_mut(index).ok_or_else(invalid)?;
                *slot = Some(piece);
                index += 1;
            }
        }
        if index != 81 {
            return Err(invalid());
        }

        let hands = caps[2].as_bytes();
        let sente = str_to_hand(&hands[..4]).ok_or_else(invalid)?;
        let gote = str_to_hand(&hands[4..]).ok_or_else(invalid)?;
        Ok(Position::from_parts(grid, sente, gote, side_to_move))
    }
}

fn str_to_hand(block: &[u8]) -> Option<Hand> {
    let mut hand = Hand::default();
    for (&b, (single, five)) in block.iter().zip(HAND_SLOTS) {
        let weight = b - b'a';
        match five {
            Some(five) => {
                hand.set(single, weight % 5);
                hand.set(five, weight / 5);
            }
            None => hand.set(single, weight),
        }
    }
    (block.len() == 4).then_some(hand)
}

/// Rotate an encoded position by 180 degrees and swap ownership.
///
/// The board string is reversed with letter case swapped and the two hand
/// blocks trade places. Applying it twice gives back the input.
pub fn flip_sfenx(sfenx: &str) -> Result<String, EncodingError> {
    let caps = SFENX_RE
        .captures(sfenx)
        .ok_or_else(|| EncodingError::InvalidSfenx(sfenx.to_string()))?;
    let grid = &caps[1];
    let hands = &caps[2];

    let mut out: String = grid
        .chars()
        .rev()
        .map(|c| {
            if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect();
    out.push(' ');
    out.push_str(&hands[4..]);
    out.push_str(&hands[..4]);
    Ok(out)
}

/// Rotate a move written in compact notation. Terminal words pass through.
pub fn flip_move(notation: &str) -> Result<String, EncodingError> {
    let mv: Move = notation.parse()?;
    Ok(mv.rotated().to_string())
}
