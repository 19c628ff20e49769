use serde::{Deserialize, Serialize};

use crate::moves::Move;
use crate::replay::ReplayedGame;

/// Header fields copied verbatim from a KIF transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KifMetadata {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub event: Option<String>,
    pub handicap: Option<String>,
    pub black_player: Option<String>,
    pub white_player: Option<String>,
    pub result: Option<String>, // e.g. "まで9手で先手の勝ち"
}

/// One decoded and replayed transcript.
#[derive(Debug, Clone)]
pub struct ProcessedGame {
    pub metadata: KifMetadata,
    pub moves: Vec<Move>,
    pub replay: ReplayedGame,
}

impl ProcessedGame {
    /// Moves in compact notation, terminal word included.
    pub fn move_notations(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.to_string()).collect()
    }
}
