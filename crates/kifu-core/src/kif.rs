//! KIF transcript decoder.
//!
//! Reads the header block, then the move list that follows the
//! `手数----指手---------` marker, and turns every move line into a [`Move`].
//! Decoding is all-or-nothing: the first bad line aborts with its 1-based
//! line number.

use std::sync::LazyLock;

use regex::{Match, Regex};
use tracing::debug;

use crate::board::{PieceKind, Square};
use crate::error::{DecodeError, DecodeErrorKind};
use crate::game_data::KifMetadata;
use crate::moves::{Move, TerminalKind};

const SECTION_MARKER: &str = "手数----指手---------";
const VARIATION_PREFIX: &str = "変化：";

static TERMINAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(投了|中断|持将棋|千日手|切れ負け|時間切れ|反則負け|詰み)").unwrap()
});

// Move number, description, optional elapsed-time annotation.
static MOVE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(.+?)(?:\s+\(\s*[^()]*\))?\+?\s*$").unwrap()
});

static DESTINATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([０-９])(\p{Han})|同").unwrap());

static SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([1-9])([1-9])\)").unwrap());

static PIECE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"成銀|成桂|成香|玉|王|飛|龍|竜|角|馬|金|銀|全|桂|圭|香|杏|歩|と").unwrap()
});

fn zenkaku_to_number(c: char) -> Result<u8, DecodeErrorKind> {
    let n = match c {
        '１' => 1,
        '２' => 2,
        '３' => 3,
        '４' => 4,
        '５' => 5,
        '６' => 6,
        '７' => 7,
        '８' => 8,
        '９' => 9,
        other => return Err(DecodeErrorKind::InvalidDigit(other)),
    };
    Ok(n)
}

/// Kanji row numeral to a 0-based row (一 is row a).
fn kanji_to_row(c: char) -> Result<u8, DecodeErrorKind> {
    let row = match c {
        '一' => 0,
        '二' => 1,
        '三' => 2,
        '四' => 3,
        '五' => 4,
        '六' => 5,
        '七' => 6,
        '八' => 7,
        '九' => 8,
        other => return Err(DecodeErrorKind::InvalidRow(other)),
    };
    Ok(row)
}

/// Kanji of a piece that can be dropped.
fn drop_piece_kind(token: &str) -> Result<PieceKind, DecodeErrorKind> {
    let kind = match token {
        "歩" => PieceKind::Pawn,
        "香" => PieceKind::Lance,
        "桂" => PieceKind::Knight,
        "銀" => PieceKind::Silver,
        "角" => PieceKind::Bishop,
        "飛" => PieceKind::Rook,
        "玉" => PieceKind::King,
        "金" => PieceKind::Gold,
        other => return Err(DecodeErrorKind::InvalidPiece(other.to_string())),
    };
    Ok(kind)
}

fn terminal_kind(word: &str) -> Option<TerminalKind> {
    let kind = match word {
        // A mated player is recorded as having resigned.
        "投了" | "詰み" => TerminalKind::Resign,
        "中断" => TerminalKind::Interrupt,
        "持将棋" => TerminalKind::Repetition,
        "千日手" => TerminalKind::Sennichite,
        "切れ負け" | "時間切れ" => TerminalKind::Timeout,
        "反則負け" => TerminalKind::Foul,
        _ => return None,
    };
    Some(kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoration {
    Promote,
    Drop,
}

/// Find `成` or `打` after the piece token. `不成` declines promotion, and
/// the `成` of 成銀/成桂/成香 belongs to the piece token itself.
fn find_decoration(
    desc: &str,
    piece: Option<Match<'_>>,
) -> Result<Option<Decoration>, DecodeErrorKind> {
    let tail = piece.map_or(desc, |m| &desc[m.end()..]);
    let tail = tail.replace("不成", "");
    match (tail.contains('成'), tail.contains('打')) {
        (true, true) => Err(DecodeErrorKind::ConflictingDecoration(desc.to_string())),
        (true, false) => Ok(Some(Decoration::Promote)),
        (false, true) => Ok(Some(Decoration::Drop)),
        (false, false) => Ok(None),
    }
}

/// Decode one move description such as `７六歩(77)`, `同　銀(42)` or `５五角打`.
///
/// `prev_to` is the destination of the previous move, used to resolve `同`.
pub fn parse_move_description(
    desc: &str,
    prev_to: Option<Square>,
) -> Result<Move, DecodeErrorKind> {
    let dest = DESTINATION_RE
        .captures(desc)
        .ok_or_else(|| DecodeErrorKind::MissingDestination(desc.to_string()))?;

    let to = match (dest.get(1), dest.get(2)) {
        (Some(col), Some(row)) => {
            let col = col.as_str().chars().next().map(zenkaku_to_number);
            let row = row.as_str().chars().next().map(kanji_to_row);
            match (col, row) {
                (Some(col), Some(row)) => Square::new(col?, row?)
                    .ok_or_else(|| DecodeErrorKind::MissingDestination(desc.to_string()))?,
                _ => return Err(DecodeErrorKind::MissingDestination(desc.to_string())),
            }
        }
        _ => prev_to.ok_or(DecodeErrorKind::SameBeforeDestination)?,
    };

    let piece = PIECE_RE.find(desc);
    let decoration = find_decoration(desc, piece)?;

    if let Some(src) = SOURCE_RE.captures(desc) {
        if decoration == Some(Decoration::Drop) {
            return Err(DecodeErrorKind::DropWithSource(desc.to_string()));
        }
        let col = src[1].parse::<u8>().unwrap_or(0);
        let row = src[2].parse::<u8>().unwrap_or(0);
        let from = row
            .checked_sub(1)
            .and_then(|row| Square::new(col, row))
            .ok_or_else(|| DecodeErrorKind::MissingSource(desc.to_string()))?;
        return Ok(Move::Relocate {
            from,
            to,
            promote: decoration == Some(Decoration::Promote),
        });
    }

    match decoration {
        Some(Decoration::Drop) => {
            let piece = piece.ok_or_else(|| DecodeErrorKind::DropWithoutPiece(desc.to_string()))?;
            let kind = drop_piece_kind(piece.as_str())?;
            Ok(Move::Drop { kind, to })
        }
        Some(Decoration::Promote) => Err(DecodeErrorKind::PromoteWithoutSource(desc.to_string())),
        None => Err(DecodeErrorKind::MissingSource(desc.to_string())),
    }
}

fn parse_header(line: &str, metadata: &mut KifMetadata) {
    let fields: [(&str, &mut Option<String>); 6] = [
        ("開始日時：", &mut metadata.start_time),
        ("終了日時：", &mut metadata.end_time),
        ("棋戦：", &mut metadata.event),
        ("手合割：", &mut metadata.handicap),
        ("先手：", &mut metadata.black_player),
        ("後手：", &mut metadata.white_player),
    ];
    for (label, field) in fields {
        if let Some(value) = line.strip_prefix(label) {
            *field = Some(value.to_string());
            return;
        }
    }
}

/// Decoder accumulator threaded through the line fold.
#[derive(Debug, Default)]
struct DecodeState {
    metadata: KifMetadata,
    moves: Vec<Move>,
    in_moves: bool,
    prev_to: Option<Square>,
    finished: bool,
}

impl DecodeState {
    fn expect_move_number(&self, found: &str) -> Result<(), DecodeErrorKind> {
        if self.moves.last().is_some_and(Move::is_terminal) {
            return Err(DecodeErrorKind::MoveAfterTerminal);
        }
        let expected = self.moves.len() + 1;
        let found = found.parse::<usize>().unwrap_or(0);
        if found != expected {
            return Err(DecodeErrorKind::MoveNumberMismatch { expected, found });
        }
        Ok(())
    }

    fn feed(mut self, line: &str) -> Result<Self, DecodeErrorKind> {
        if !self.in_moves {
            if line.contains(SECTION_MARKER) {
                debug!("entering move section");
                self.in_moves = true;
            } else {
                parse_header(line, &mut self.metadata);
            }
            return Ok(self);
        }

        if line.starts_with('*') {
            return Ok(self);
        }

        if line.contains("まで") && line.contains("手で") {
            debug!(result = line, "result line");
            self.metadata.result = Some(line.to_string());
            self.finished = true;
            return Ok(self);
        }

        if line.starts_with(VARIATION_PREFIX) {
            debug!("variation branch reached, main line complete");
            self.finished = true;
            return Ok(self);
        }

        if let Some(caps) = TERMINAL_RE.captures(line) {
            self.expect_move_number(&caps[1])?;
            if let Some(kind) = terminal_kind(&caps[2]) {
                self.moves.push(Move::Terminal(kind));
            }
            return Ok(self);
        }

        let caps = MOVE_LINE_RE
            .captures(line)
            .ok_or(DecodeErrorKind::UnrecognizedLine)?;
        self.expect_move_number(&caps[1])?;
        let mv = parse_move_description(&caps[2], self.prev_to)?;
        self.prev_to = mv.destination();
        self.moves.push(mv);
        Ok(self)
    }
}

/// Decode a KIF transcript into its metadata and move list.
pub fn decode(text: &str) -> Result<(KifMetadata, Vec<Move>), DecodeError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut state = DecodeState::default();

    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        state = state.feed(line).map_err(|kind| DecodeError {
            line: index + 1,
            text: line.to_string(),
            kind,
        })?;
        if state.finished {
            break;
        }
    }

    debug!(moves = state.moves.len(), "kif decoded");
    Ok((state.metadata, state.moves))
}
