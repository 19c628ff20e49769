//! Error types for decoding, replaying and encoding.

use thiserror::Error;

/// Why a transcript line could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error("invalid full-width digit: {0}")]
    InvalidDigit(char),

    #[error("invalid row numeral: {0}")]
    InvalidRow(char),

    #[error("invalid piece: {0}")]
    InvalidPiece(String),

    #[error("no destination square in move: {0}")]
    MissingDestination(String),

    #[error("same-square marker used before any destination")]
    SameBeforeDestination,

    #[error("neither source square nor drop marker in move: {0}")]
    MissingSource(String),

    #[error("both promote and drop markers in move: {0}")]
    ConflictingDecoration(String),

    #[error("promotion without source square: {0}")]
    PromoteWithoutSource(String),

    #[error("drop marker together with source square: {0}")]
    DropWithSource(String),

    #[error("drop without piece: {0}")]
    DropWithoutPiece(String),

    #[error("expected move number {expected}, found {found}")]
    MoveNumberMismatch { expected: usize, found: usize },

    #[error("move after terminal move")]
    MoveAfterTerminal,

    #[error("unrecognized line")]
    UnrecognizedLine,
}

/// A decode failure, pinned to the 1-based transcript line that caused it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("kif parse error (line {line}): {kind}; line: \"{text}\"")]
pub struct DecodeError {
    pub line: usize,
    pub text: String,
    pub kind: DecodeErrorKind,
}

/// Malformed sfenx or move notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("invalid sfenx: {0}")]
    InvalidSfenx(String),

    #[error("invalid move notation: {0}")]
    InvalidMove(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("no piece on source square: {0}")]
    EmptySource(String),

    #[error("piece not in hand: {0}")]
    EmptyHand(String),

    #[error("drop target is occupied: {0}")]
    OccupiedTarget(String),

    #[error("king cannot be captured: {0}")]
    KingCaptured(String),

    #[error(transparent)]
    Notation(#[from] EncodingError),

    #[error("move {ply}: {source}")]
    AtPly {
        ply: usize,
        #[source]
        source: Box<ReplayError>,
    },
}

/// Umbrella error for a full decode-and-replay of one transcript.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KifuError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Replay(#[from] ReplayError),
}
