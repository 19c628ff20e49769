//! Content hash used to detect games that were already uploaded.
//!
//! The hash is SHA-256 over a JSON signature with sorted keys, unescaped
//! UTF-8 and `", "` / `": "` separators. Hashes already stored in
//! `game_records` were produced with exactly this layout, so it must not
//! change.

use std::io;

use kifu_core::KifMetadata;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use sha2::{Digest, Sha256};

use crate::error::UploadError;

/// Fields in lexicographic key order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GameSignature<'a> {
    end_time: Option<&'a str>,
    moves: &'a [String],
    players: [&'a str; 2],
    result: Option<&'a str>,
    start_time: Option<&'a str>,
}

/// Separators with a trailing space after `,` and `:`.
struct SpacedSeparators;

impl Formatter for SpacedSeparators {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// The JSON document the hash is computed over.
pub fn game_signature(moves: &[String], metadata: &KifMetadata) -> Result<String, UploadError> {
    let mut players = [
        metadata.black_player.as_deref().unwrap_or(""),
        metadata.white_player.as_deref().unwrap_or(""),
    ];
    players.sort_unstable();

    let signature = GameSignature {
        end_time: metadata.end_time.as_deref(),
        moves,
        players,
        result: metadata.result.as_deref(),
        start_time: metadata.start_time.as_deref(),
    };

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, SpacedSeparators);
    signature.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Hex-encoded SHA-256 of the game signature.
pub fn game_hash(moves: &[String], metadata: &KifMetadata) -> Result<String, UploadError> {
    let signature = game_signature(moves, metadata)?;
    Ok(hex::encode(Sha256::digest(signature.as_bytes())))
}
