//! Replay a decoded move list and emit one statistics record per board move.
//!
//! Every record is written from the mover's point of view: Sente positions
//! go through [`flip_sfenx`] and Sente moves through [`Move::rotated`], so
//! both colours share a single frame of reference.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Position, Side};
use crate::error::{KifuError, ReplayError};
use crate::game_data::ProcessedGame;
use crate::kif;
use crate::moves::{Move, TerminalKind};
use crate::sfenx::flip_sfenx;

/// Position before a move plus the move itself, both from the mover's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub sfenx: String,
    #[serde(rename = "move")]
    pub mv: String,
    #[serde(rename = "win")]
    pub won: bool,
    #[serde(rename = "lose")]
    pub lost: bool,
}

#[derive(Debug, Clone)]
pub struct ReplayedGame {
    pub records: Vec<CanonicalRecord>,
    pub final_position: Position,
    /// Set only when the game ended in resignation.
    pub winner: Option<Side>,
}

/// Side that made the move at 0-based ply `ply`.
fn mover_at(ply: usize) -> Side {
    if ply % 2 == 0 {
        Side::Sente
    } else {
        Side::Gote
    }
}

/// Winner implied by the last move: the opponent of whoever resigned.
/// Every other ending (timeout, interruption, repetition, sennichite, foul)
/// leaves the game unlabelled.
pub fn winner_of(moves: &[Move]) -> Option<Side> {
    match moves.last() {
        Some(Move::Terminal(TerminalKind::Resign)) => Some(mover_at(moves.len() - 1).opponent()),
        _ => None,
    }
}

/// Position encoding and move notation for one record, if the move is on the board.
type RecordPair = Option<(String, String)>;

fn step(position: Position, mv: &Move) -> Result<(Position, RecordPair), ReplayError> {
    let mover = position.side_to_move();
    let prev = position.to_sfenx();
    let next = position.apply(mv)?;
    if mv.is_terminal() {
        return Ok((next, None));
    }

    let pair = match mover {
        Side::Sente => (flip_sfenx(&prev)?, mv.rotated().to_string()),
        Side::Gote => (prev, mv.to_string()),
    };
    Ok((next, Some(pair)))
}

/// Replay `moves` from the starting position.
///
/// Fails on the first move that cannot be applied; no partial records are
/// returned.
pub fn replay(moves: &[Move]) -> Result<ReplayedGame, ReplayError> {
    let winner = winner_of(moves);
    let mut position = Position::new();
    let mut records = Vec::with_capacity(moves.len());

    for (ply, mv) in moves.iter().enumerate() {
        let mover = position.side_to_move();
        let (next, pair) = step(position, mv).map_err(|e| ReplayError::AtPly {
            ply: ply + 1,
            source: Box::new(e),
        })?;
        position = next;

        if let Some((sfenx, mv)) = pair {
            let (won, lost) = match winner {
                Some(w) => (mover == w, mover != w),
                None => (false, false),
            };
            records.push(CanonicalRecord { sfenx, mv, won, lost });
        }
    }

    debug!(records = records.len(), ?winner, "replay finished");
    Ok(ReplayedGame {
        records,
        final_position: position,
        winner,
    })
}

/// Replay moves stored in compact notation.
pub fn replay_notation<S: AsRef<str>>(notations: &[S]) -> Result<ReplayedGame, ReplayError> {
    let moves = notations
        .iter()
        .map(|s| s.as_ref().parse::<Move>())
        .collect::<Result<Vec<_>, _>>()?;
    replay(&moves)
}

/// Decode a KIF transcript and replay it in one go.
pub fn process_kif(text: &str) -> Result<ProcessedGame, KifuError> {
    let (metadata, moves) = kif::decode(text)?;
    let replay = replay(&moves)?;
    Ok(ProcessedGame {
        metadata,
        moves,
        replay,
    })
}
