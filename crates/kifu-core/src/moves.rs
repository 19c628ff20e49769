//! Canonical move tokens and their compact notation.
//!
//! Relocations are written `7g7f` (with a trailing `+` when promoting),
//! drops `P*5e`, and game-ending moves as a lower-case word.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::board::{PieceKind, Square};
use crate::error::EncodingError;

static RELOCATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-9])([a-i])([1-9])([a-i])(\+)?$").unwrap());

static DROP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z])\*([1-9])([a-i])$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalKind {
    Resign,
    Timeout,
    Interrupt,
    Repetition,
    Sennichite,
    Foul,
}

impl TerminalKind {
    pub const ALL: [TerminalKind; 6] = [
        TerminalKind::Resign,
        TerminalKind::Timeout,
        TerminalKind::Interrupt,
        TerminalKind::Repetition,
        TerminalKind::Sennichite,
        TerminalKind::Foul,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TerminalKind::Resign => "resign",
            TerminalKind::Timeout => "timeout",
            TerminalKind::Interrupt => "interrupt",
            TerminalKind::Repetition => "repetition",
            TerminalKind::Sennichite => "sennichite",
            TerminalKind::Foul => "foul",
        }
    }

    pub fn from_word(word: &str) -> Option<TerminalKind> {
        TerminalKind::ALL.into_iter().find(|k| k.as_str() == word)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Relocate { from: Square, to: Square, promote: bool },
    Drop { kind: PieceKind, to: Square },
    Terminal(TerminalKind),
}

impl Move {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Move::Terminal(_))
    }

    /// Destination square, if the move touches the board.
    pub fn destination(&self) -> Option<Square> {
        match *self {
            Move::Relocate { to, .. } | Move::Drop { to, .. } => Some(to),
            Move::Terminal(_) => None,
        }
    }

    /// The same move seen from the other side of the board.
    pub fn rotated(&self) -> Move {
        match *self {
            Move::Relocate { from, to, promote } => Move::Relocate {
                from: from.rotated(),
                to: to.rotated(),
                promote,
            },
            Move::Drop { kind, to } => Move::Drop {
                kind,
                to: to.rotated(),
            },
            terminal @ Move::Terminal(_) => terminal,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Relocate { from, to, promote } => {
                write!(f, "{from}{to}")?;
                if *promote {
                    f.write_str("+")?;
                }
                Ok(())
            }
            Move::Drop { kind, to } => write!(f, "{}*{to}", kind.code()),
            Move::Terminal(kind) => f.write_str(kind.as_str()),
        }
    }
}

fn square_at(caps: &regex::Captures<'_>, col: usize, row: usize) -> Option<Square> {
    let col = caps[col].chars().next()?;
    let row = caps[row].chars().next()?;
    Square::from_chars(col, row)
}

impl FromStr for Move {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EncodingError::InvalidMove(s.to_string());

        if let Some(kind) = TerminalKind::from_word(s) {
            return Ok(Move::Terminal(kind));
        }

        if let Some(caps) = RELOCATE_RE.captures(s) {
            let from = square_at(&caps, 1, 2).ok_or_else(invalid)?;
            let to = square_at(&caps, 3, 4).ok_or_else(invalid)?;
            return Ok(Move::Relocate {
                from,
                to,
                promote: caps.get(5).is_some(),
            });
        }

        if let Some(caps) = DROP_RE.captures(s) {
            let kind = caps[1]
                .chars()
                .next()
                .and_then(PieceKind::from_code)
                .ok_or_else(invalid)?;
            let to = square_at(&caps, 2, 3).ok_or_else(invalid)?;
            return Ok(Move::Drop { kind, to });
        }

        Err(invalid())
    }
}

impl Serialize for Move {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
