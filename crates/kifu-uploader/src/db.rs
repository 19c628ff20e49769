//! Postgres persistence for game records and move statistics

use chrono::Utc;
use kifu_core::{CanonicalRecord, KifMetadata};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::UploadError;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Create the tables if they are missing.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- One row per uploaded game
CREATE TABLE IF NOT EXISTS game_records (
    id            BIGSERIAL PRIMARY KEY,
    game_hash     TEXT NOT NULL,
    start_time    TEXT,
    end_time      TEXT,
    black_player  TEXT,
    white_player  TEXT,
    event         TEXT,
    handicap      TEXT,
    result        TEXT,
    move_count    INTEGER NOT NULL,
    recorded_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    user_id       TEXT
);

CREATE INDEX IF NOT EXISTS idx_game_records_hash
    ON game_records (game_hash, user_id);

-- One row per non-terminal move, from the mover's point of view
CREATE TABLE IF NOT EXISTS shogi_moves_statistics (
    id       BIGSERIAL PRIMARY KEY,
    sfenx    TEXT NOT NULL,
    move     TEXT NOT NULL,
    win      BOOLEAN NOT NULL DEFAULT FALSE,
    lose     BOOLEAN NOT NULL DEFAULT FALSE,
    timeout  BOOLEAN NOT NULL DEFAULT FALSE,
    user_id  TEXT
);

CREATE INDEX IF NOT EXISTS idx_shogi_moves_statistics_sfenx
    ON shogi_moves_statistics (sfenx);
"#;

/// Whether a game with this hash was already stored for the user
/// (or anonymously, when `user_id` is `None`).
pub async fn game_exists(
    pool: &PgPool,
    game_hash: &str,
    user_id: Option<&str>,
) -> Result<bool, UploadError> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM game_records
         WHERE game_hash = $1 AND user_id IS NOT DISTINCT FROM $2
         LIMIT 1",
    )
    .bind(game_hash)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// Insert all statistics rows and the game record in one transaction.
/// Returns the new game record id.
pub async fn insert_game(
    pool: &PgPool,
    game_hash: &str,
    metadata: &KifMetadata,
    records: &[CanonicalRecord],
    user_id: Option<&str>,
) -> Result<i64, UploadError> {
    let len = records.len();
    let mut v_sfenx: Vec<&str> = Vec::with_capacity(len);
    let mut v_move: Vec<&str> = Vec::with_capacity(len);
    let mut v_win: Vec<bool> = Vec::with_capacity(len);
    let mut v_lose: Vec<bool> = Vec::with_capacity(len);

    for record in records {
        v_sfenx.push(&record.sfenx);
        v_move.push(&record.mv);
        v_win.push(record.won);
        v_lose.push(record.lost);
    }

    let mut tx = pool.begin().await?;

    // Bulk insert using UNNEST arrays (one query per game)
    sqlx::query(
        r#"INSERT INTO shogi_moves_statistics (user_id, sfenx, move, win, lose, timeout)
           SELECT $1, t.sfenx, t.move, t.win, t.lose, FALSE FROM UNNEST(
               $2::text[], $3::text[], $4::bool[], $5::bool[]
           ) AS t(sfenx, move, win, lose)"#,
    )
    .bind(user_id)
    .bind(&v_sfenx)
    .bind(&v_move)
    .bind(&v_win)
    .bind(&v_lose)
    .execute(&mut *tx)
    .await?;

    let (id,): (i64,) = sqlx::query_as(
        r#"INSERT INTO game_records (
            game_hash, start_time, end_time, black_player, white_player,
            event, handicap, result, move_count, recorded_at, user_id
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id"#,
    )
    .bind(game_hash)
    .bind(&metadata.start_time)
    .bind(&metadata.end_time)
    .bind(&metadata.black_player)
    .bind(&metadata.white_player)
    .bind(&metadata.event)
    .bind(&metadata.handicap)
    .bind(&metadata.result)
    .bind(len as i32)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}
