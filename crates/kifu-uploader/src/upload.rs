//! Per-file pipeline: decode, replay, hash, deduplicate, store.

use std::path::Path;

use kifu_core::{process_kif, ProcessedGame};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::db;
use crate::error::UploadError;
use crate::hash::game_hash;

/// A transcript that decoded and replayed cleanly, ready to store.
#[derive(Debug, Clone)]
pub struct PreparedGame {
    pub game: ProcessedGame,
    pub game_hash: String,
}

impl PreparedGame {
    pub fn record_count(&self) -> usize {
        self.game.replay.records.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Stored { game_id: i64, records: usize },
    /// Parsed only; nothing was written.
    DryRun { records: usize },
    Duplicate,
    NoRecords,
}

/// Decode and replay a transcript and compute its hash. Nothing is written.
pub fn prepare_game(content: &str) -> Result<PreparedGame, UploadError> {
    let game = process_kif(content)?;
    let game_hash = game_hash(&game.move_notations(), &game.metadata)?;
    Ok(PreparedGame { game, game_hash })
}

pub fn prepare_file(path: &Path) -> Result<PreparedGame, UploadError> {
    let content = std::fs::read_to_string(path)?;
    prepare_game(&content)
}

/// Store a prepared game unless it is a duplicate or has no board moves.
pub async fn upload_game(
    pool: &PgPool,
    prepared: &PreparedGame,
    user_id: Option<&str>,
    skip_duplicate_check: bool,
) -> Result<UploadOutcome, UploadError> {
    if !skip_duplicate_check && db::game_exists(pool, &prepared.game_hash, user_id).await? {
        warn!(game_hash = %prepared.game_hash, "Skipping: game already uploaded");
        return Ok(UploadOutcome::Duplicate);
    }

    let records = &prepared.game.replay.records;
    if records.is_empty() {
        warn!("Skipping: no statistics records");
        return Ok(UploadOutcome::NoRecords);
    }

    let game_id = db::insert_game(
        pool,
        &prepared.game_hash,
        &prepared.game.metadata,
        records,
        user_id,
    )
    .await?;

    info!(game_id, records = records.len(), "Upload complete");
    Ok(UploadOutcome::Stored {
        game_id,
        records: records.len(),
    })
}

/// Running totals printed at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub success: u32,
    pub skipped: u32,
    pub errors: u32,
}

impl Summary {
    pub fn record(&mut self, outcome: &Result<UploadOutcome, UploadError>) {
        match outcome {
            Ok(UploadOutcome::Stored { .. } | UploadOutcome::DryRun { .. }) => self.success += 1,
            Ok(UploadOutcome::Duplicate | UploadOutcome::NoRecords) => self.skipped += 1,
            Err(_) => self.errors += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: &str = "先手：sente
後手：gote
手数----指手---------消費時間--
1 ７六歩(77)   ( 0:01/00:00:01)
2 ３四歩(33)   ( 0:01/00:00:01)
3 投了   ( 0:01/00:00:02)
まで2手で後手の勝ち
";

    #[test]
    fn test_prepare_game() {
        let prepared = prepare_game(GAME).unwrap();
        assert_eq!(prepared.record_count(), 2);
        assert_eq!(prepared.game_hash.len(), 64);
        assert_eq!(prepared.game.move_notations(), vec!["7g7f", "3c3d", "resign"]);
    }

    #[test]
    fn test_prepare_game_is_deterministic() {
        assert_eq!(
            prepare_game(GAME).unwrap().game_hash,
            prepare_game(GAME).unwrap().game_hash
        );
    }

    #[test]
    fn test_prepare_game_rejects_bad_transcript() {
        let bad = GAME.replace("３四歩(33)", "３四歩");
        let err = prepare_game(&bad).unwrap_err();
        match err {
            UploadError::Kifu(kifu_core::KifuError::Decode(e)) => assert_eq!(e.line, 5),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = Summary::default();
        summary.record(&Ok(UploadOutcome::Stored { game_id: 1, records: 3 }));
        summary.record(&Ok(UploadOutcome::DryRun { records: 3 }));
        summary.record(&Ok(UploadOutcome::Duplicate));
        summary.record(&Ok(UploadOutcome::NoRecords));
        summary.record(&Err(UploadError::Config("x")));
        assert_eq!(
            summary,
            Summary {
                success: 2,
                skipped: 2,
                errors: 1
            }
        );
    }
}
