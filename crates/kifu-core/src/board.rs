//! Shogi board state and move application.
//!
//! Squares are addressed as column 1-9 and row a-i, stored row-major with
//! index `row * 9 + (column - 1)`. Row a is Gote's back rank.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReplayError;
use crate::moves::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// First player, rendered upper-case.
    Sente,
    Gote,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Sente => Side::Gote,
            Side::Gote => Side::Sente,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Lance,
    Knight,
    Silver,
    Gold,
    Bishop,
    Rook,
    King,
    ProPawn,
    ProLance,
    ProKnight,
    ProSilver,
    Horse,
    Dragon,
}

impl PieceKind {
    /// Kinds that can sit in a hand, in hand-slot order.
    pub const HAND_KINDS: [PieceKind; 7] = [
        PieceKind::Pawn,
        PieceKind::Lance,
        PieceKind::Knight,
        PieceKind::Silver,
        PieceKind::Gold,
        PieceKind::Bishop,
        PieceKind::Rook,
    ];

    /// Upper-case code used in both the move notation and sfenx.
    pub fn code(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Lance => 'L',
            PieceKind::Knight => 'N',
            PieceKind::Silver => 'S',
            PieceKind::Gold => 'G',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::King => 'K',
            PieceKind::ProPawn => 'T',
            PieceKind::ProLance => 'V',
            PieceKind::ProKnight => 'U',
            PieceKind::ProSilver => 'M',
            PieceKind::Horse => 'H',
            PieceKind::Dragon => 'D',
        }
    }

    pub fn from_code(code: char) -> Option<PieceKind> {
        let kind = match code.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'L' => PieceKind::Lance,
            'N' => PieceKind::Knight,
            'S' => PieceKind::Silver,
            'G' => PieceKind::Gold,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'K' => PieceKind::King,
            'T' => PieceKind::ProPawn,
            'V' => PieceKind::ProLance,
            'U' => PieceKind::ProKnight,
            'M' => PieceKind::ProSilver,
            'H' => PieceKind::Horse,
            'D' => PieceKind::Dragon,
            _ => return None,
        };
        Some(kind)
    }

    /// Promoted form, or `self` for kinds that do not promote.
    pub fn promoted(self) -> PieceKind {
        match self {
            PieceKind::Pawn => PieceKind::ProPawn,
            PieceKind::Lance => PieceKind::ProLance,
            PieceKind::Knight => PieceKind::ProKnight,
            PieceKind::Silver => PieceKind::ProSilver,
            PieceKind::Bishop => PieceKind::Horse,
            PieceKind::Rook => PieceKind::Dragon,
            other => other,
        }
    }

    /// Base form a captured piece reverts to.
    pub fn unpromoted(self) -> PieceKind {
        match self {
            PieceKind::ProPawn => PieceKind::Pawn,
            PieceKind::ProLance => PieceKind::Lance,
            PieceKind::ProKnight => PieceKind::Knight,
            PieceKind::ProSilver => PieceKind::Silver,
            PieceKind::Horse => PieceKind::Bishop,
            PieceKind::Dragon => PieceKind::Rook,
            other => other,
        }
    }

    fn hand_slot(self) -> Option<usize> {
        PieceKind::HAND_KINDS.iter().position(|&k| k == self)
    }

    /// Total number of pieces of this base kind in a standard set.
    pub fn supply(self) -> u8 {
        match self.unpromoted() {
            PieceKind::Pawn => 18,
            PieceKind::Bishop | PieceKind::Rook | PieceKind::King => 2,
            _ => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: Side,
}

impl Piece {
    pub fn new(kind: PieceKind, owner: Side) -> Self {
        Self { kind, owner }
    }

    pub fn to_char(self) -> char {
        match self.owner {
            Side::Sente => self.kind.code(),
            Side::Gote => self.kind.code().to_ascii_lowercase(),
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let owner = if c.is_ascii_uppercase() { Side::Sente } else { Side::Gote };
        PieceKind::from_code(c).map(|kind| Piece { kind, owner })
    }
}

/// A board square: column 1-9, row 0-8 (a-i).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    col: u8,
    row: u8,
}

impl Square {
    pub fn new(col: u8, row: u8) -> Option<Square> {
        if (1..=9).contains(&col) && row < 9 {
            Some(Square { col, row })
        } else {
            None
        }
    }

    /// Parse a column digit and row letter such as `'7', 'g'`.
    pub fn from_chars(col: char, row: char) -> Option<Square> {
        let col = col.to_digit(10)? as u8;
        if !('a'..='i').contains(&row) {
            return None;
        }
        Square::new(col, row as u8 - b'a')
    }

    pub fn row_letter(self) -> char {
        (b'a' + self.row) as char
    }

    pub fn index(self) -> usize {
        self.row as usize * 9 + (self.col as usize - 1)
    }

    /// The same square seen from the other side of the board.
    pub fn rotated(self) -> Square {
        Square {
            col: 10 - self.col,
            row: 8 - self.row,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col, self.row_letter())
    }
}

/// Captured pieces held by one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hand([u8; 7]);

impl Hand {
    pub fn count(&self, kind: PieceKind) -> u8 {
        kind.hand_slot().map(|slot| self.0[slot]).unwrap_or(0)
    }

    pub fn set(&mut self, kind: PieceKind, count: u8) {
        if let Some(slot) = kind.hand_slot() {
            self.0[slot] = count;
        }
    }

    fn add(&mut self, kind: PieceKind) {
        if let Some(slot) = kind.unpromoted().hand_slot() {
            self.0[slot] += 1;
        }
    }

    fn take(&mut self, kind: PieceKind) -> bool {
        match kind.hand_slot() {
            Some(slot) if self.0[slot] > 0 => {
                self.0[slot] -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }
}

/// Per-kind piece totals across board and hands, kings excluded.
pub type Supply = [u8; 7];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    grid: [Option<Piece>; 81],
    sente_hand: Hand,
    gote_hand: Hand,
    side_to_move: Side,
}

const BACK_RANK: [PieceKind; 9] = [
    PieceKind::Lance,
    PieceKind::Knight,
    PieceKind::Silver,
    PieceKind::Gold,
    PieceKind::King,
    PieceKind::Gold,
    PieceKind::Silver,
    PieceKind::Knight,
    PieceKind::Lance,
];

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The standard opening layout with Sente to move.
    pub fn new() -> Self {
        let mut pos = Self::empty(Side::Sente);
        for (i, &kind) in BACK_RANK.iter().enumerate() {
            pos.grid[i] = Some(Piece::new(kind, Side::Gote));
            pos.grid[72 + i] = Some(Piece::new(kind, Side::Sente));
        }
        for i in 0..9 {
            pos.grid[18 + i] = Some(Piece::new(PieceKind::Pawn, Side::Gote));
            pos.grid[54 + i] = Some(Piece::new(PieceKind::Pawn, Side::Sente));
        }
        // Gote: bishop 2b, rook 8b. Sente: rook 2h, bishop 8h.
        pos.grid[10] = Some(Piece::new(PieceKind::Bishop, Side::Gote));
        pos.grid[16] = Some(Piece::new(PieceKind::Rook, Side::Gote));
        pos.grid[64] = Some(Piece::new(PieceKind::Rook, Side::Sente));
        pos.grid[70] = Some(Piece::new(PieceKind::Bishop, Side::Sente));
        pos
    }

    /// A board with no pieces and empty hands.
    pub fn empty(side_to_move: Side) -> Self {
        Self {
            grid: [None; 81],
            sente_hand: Hand::default(),
            gote_hand: Hand::default(),
            side_to_move,
        }
    }

    pub(crate) fn from_parts(
        grid: [Option<Piece>; 81],
        sente_hand: Hand,
        gote_hand: Hand,
        side_to_move: Side,
    ) -> Self {
        Self {
            grid,
            sente_hand,
            gote_hand,
            side_to_move,
        }
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.index()]
    }

    pub fn grid(&self) -> &[Option<Piece>; 81] {
        &self.grid
    }

    pub fn hand(&self, side: Side) -> &Hand {
        match side {
            Side::Sente => &self.sente_hand,
            Side::Gote => &self.gote_hand,
        }
    }

    fn hand_mut(&mut self, side: Side) -> &mut Hand {
        match side {
            Side::Sente => &mut self.sente_hand,
            Side::Gote => &mut self.gote_hand,
        }
    }

    /// Apply one move for the side to move and hand the position back.
    ///
    /// No legality checking is done beyond what keeps the piece supply
    /// intact: the source of a relocation must be occupied, a drop needs the
    /// piece in hand and an empty target, and kings never enter a hand.
    pub fn apply(mut self, mv: &Move) -> Result<Position, ReplayError> {
        let mover = self.side_to_move;
        match *mv {
            Move::Terminal(_) => {}
            Move::Drop { kind, to } => {
                if self.grid[to.index()].is_some() {
                    return Err(ReplayError::OccupiedTarget(mv.to_string()));
                }
                if !self.hand_mut(mover).take(kind) {
                    return Err(ReplayError::EmptyHand(mv.to_string()));
                }
                self.grid[to.index()] = Some(Piece::new(kind, mover));
            }
            Move::Relocate { from, to, promote } => {
                let moving = self.grid[from.index()]
                    .ok_or_else(|| ReplayError::EmptySource(mv.to_string()))?;

                if let Some(captured) = self.grid[to.index()] {
                    if captured.kind == PieceKind::King {
                        return Err(ReplayError::KingCaptured(mv.to_string()));
                    }
                    self.hand_mut(mover).add(captured.kind);
                }

                let kind = if promote { moving.kind.promoted() } else { moving.kind };
                self.grid[from.index()] = None;
                self.grid[to.index()] = Some(Piece::new(kind, mover));
            }
        }
        self.side_to_move = mover.opponent();
        Ok(self)
    }

    /// Parse compact notation and apply it.
    pub fn apply_notation(self, notation: &str) -> Result<Position, ReplayError> {
        let mv: Move = notation.parse()?;
        self.apply(&mv)
    }

    /// Count every non-king piece by base kind, on the board and in hands.
    pub fn supply(&self) -> Supply {
        let mut totals = [0u8; 7];
        for piece in self.grid.iter().flatten() {
            if let Some(slot) = piece.kind.unpromoted().hand_slot() {
                totals[slot] += 1;
            }
        }
        for (slot, &kind) in PieceKind::HAND_KINDS.iter().enumerate() {
            totals[slot] += self.sente_hand.count(kind) + self.gote_hand.count(kind);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        let mut chars = s.chars();
        Square::from_chars(chars.next().unwrap(), chars.next().unwrap()).unwrap()
    }

    #[test]
    fn test_initial_layout() {
        let pos = Position::new();
        assert_eq!(pos.side_to_move(), Side::Sente);
        assert_eq!(pos.piece_at(sq("5i")), Some(Piece::new(PieceKind::King, Side::Sente)));
        assert_eq!(pos.piece_at(sq("5a")), Some(Piece::new(PieceKind::King, Side::Gote)));
        assert_eq!(pos.piece_at(sq("2h")), Some(Piece::new(PieceKind::Rook, Side::Sente)));
        assert_eq!(pos.piece_at(sq("8h")), Some(Piece::new(PieceKind::Bishop, Side::Sente)));
        assert_eq!(pos.piece_at(sq("8b")), Some(Piece::new(PieceKind::Rook, Side::Gote)));
        assert_eq!(pos.piece_at(sq("2b")), Some(Piece::new(PieceKind::Bishop, Side::Gote)));
        assert_eq!(pos.piece_at(sq("7g")), Some(Piece::new(PieceKind::Pawn, Side::Sente)));
        assert!(pos.piece_at(sq("5e")).is_none());
    }

    #[test]
    fn test_initial_supply_is_full() {
        let supply = Position::new().supply();
        assert_eq!(supply, [18, 4, 4, 4, 4, 2, 2]);
    }

    #[test]
    fn test_square_index_and_display() {
        assert_eq!(sq("1a").index(), 0);
        assert_eq!(sq("9a").index(), 8);
        assert_eq!(sq("1i").index(), 72);
        assert_eq!(sq("7g").to_string(), "7g");
        assert_eq!(sq("7g").rotated(), sq("3c"));
        assert!(Square::from_chars('0', 'a').is_none());
        assert!(Square::from_chars('1', 'j').is_none());
    }

    #[test]
    fn test_relocate_flips_turn() {
        let pos = Position::new().apply_notation("7g7f").unwrap();
        assert_eq!(pos.side_to_move(), Side::Gote);
        assert!(pos.piece_at(sq("7g")).is_none());
        assert_eq!(pos.piece_at(sq("7f")), Some(Piece::new(PieceKind::Pawn, Side::Sente)));
    }

    #[test]
    fn test_capture_demotes_into_hand() {
        // Bishop exchange: 7g7f 3c3d 8h2b+ 3a2b
        let pos = ["7g7f", "3c3d", "8h2b+"]
            .iter()
            .try_fold(Position::new(), |pos, mv| pos.apply_notation(mv))
            .unwrap();
        assert_eq!(pos.piece_at(sq("2b")), Some(Piece::new(PieceKind::Horse, Side::Sente)));
        assert_eq!(pos.hand(Side::Sente).count(PieceKind::Bishop), 1);

        let pos = pos.apply_notation("3a2b").unwrap();
        assert_eq!(pos.hand(Side::Gote).count(PieceKind::Bishop), 1);
        assert_eq!(pos.hand(Side::Gote).count(PieceKind::Horse), 0);
        assert_eq!(pos.supply(), [18, 4, 4, 4, 4, 2, 2]);
    }

    #[test]
    fn test_drop_uses_hand() {
        let pos = ["7g7f", "3c3d", "8h2b+", "3a2b", "B*4e"]
            .iter()
            .try_fold(Position::new(), |pos, mv| pos.apply_notation(mv))
            .unwrap();
        assert_eq!(pos.piece_at(sq("4e")), Some(Piece::new(PieceKind::Bishop, Side::Sente)));
        assert!(pos.hand(Side::Sente).is_empty());
        assert_eq!(pos.supply(), [18, 4, 4, 4, 4, 2, 2]);
    }

    #[test]
    fn test_relocate_from_empty_square_fails() {
        let err = Position::new().apply_notation("5e5d").unwrap_err();
        assert_eq!(err, ReplayError::EmptySource("5e5d".into()));
    }

    #[test]
    fn test_drop_without_hand_fails() {
        let err = Position::new().apply_notation("P*5e").unwrap_err();
        assert_eq!(err, ReplayError::EmptyHand("P*5e".into()));
    }

    #[test]
    fn test_drop_on_occupied_square_fails() {
        let err = Position::new().apply_notation("P*7g").unwrap_err();
        assert_eq!(err, ReplayError::OccupiedTarget("P*7g".into()));
    }

    #[test]
    fn test_terminal_only_flips_turn() {
        let before = Position::new();
        let after = before.clone().apply_notation("resign").unwrap();
        assert_eq!(after.side_to_move(), Side::Gote);
        assert_eq!(after.grid(), before.grid());
    }

    #[test]
    fn test_promoting_gold_keeps_kind() {
        assert_eq!(PieceKind::Gold.promoted(), PieceKind::Gold);
        assert_eq!(PieceKind::Dragon.unpromoted(), PieceKind::Rook);
    }
}
