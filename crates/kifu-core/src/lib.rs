//! KIF shogi transcript decoding and board replay.
//!
//! `kif::decode` turns a transcript into metadata and canonical moves,
//! `replay::replay` folds those moves over a board and produces one
//! perspective-normalized statistics record per move. The main entry point
//! for callers holding raw text is `process_kif()`.

pub mod board;
pub mod error;
pub mod game_data;
pub mod kif;
pub mod moves;
pub mod replay;
pub mod sfenx;

pub use board::{Piece, PieceKind, Position, Side, Square};
pub use error::{DecodeError, DecodeErrorKind, EncodingError, KifuError, ReplayError};
pub use game_data::{KifMetadata, ProcessedGame};
pub use kif::decode;
pub use moves::{Move, TerminalKind};
pub use replay::{process_kif, replay, replay_notation, CanonicalRecord, ReplayedGame};
pub use sfenx::{encode, flip_move, flip_sfenx, INITIAL_SFENX};
