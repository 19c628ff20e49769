//! KIF uploader
//!
//! Parses KIF transcripts, replays them into per-move statistics and uploads
//! the result to Postgres.
//!
//! Usage: kifu-uploader [PATH] [--user-id ID] [--skip-duplicate-check] [--dry-run]

use std::process::ExitCode;

use kifu_uploader::config::{Args, UploaderConfig};
use kifu_uploader::files::collect_kif_files;
use kifu_uploader::upload::{prepare_file, upload_game, Summary, UploadOutcome};
use kifu_uploader::db;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = UploaderConfig::from_env(&args)?;

    let files = collect_kif_files(&args.path)?;
    if files.is_empty() {
        error!(path = %args.path.display(), "No kif files found");
        return Ok(ExitCode::FAILURE);
    }

    info!(
        files = files.len(),
        user_id = config.user_id.as_deref().unwrap_or("(anonymous)"),
        skip_duplicate_check = args.skip_duplicate_check,
        dry_run = args.dry_run,
        "Starting upload"
    );

    let pool = match (&config.database_url, args.dry_run) {
        (Some(url), false) => {
            info!("Connecting to database...");
            let pool = db::create_pool(url, config.max_connections).await?;
            db::run_migrations(&pool).await?;
            Some(pool)
        }
        _ => None,
    };

    let mut summary = Summary::default();

    for path in &files {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        info!(file = %name, "Processing");

        let prepared = match prepare_file(path) {
            Ok(p) => p,
            Err(e) => {
                error!(file = %name, "{e}");
                summary.errors += 1;
                continue;
            }
        };

        let outcome = match &pool {
            Some(pool) => {
                upload_game(
                    pool,
                    &prepared,
                    config.user_id.as_deref(),
                    args.skip_duplicate_check,
                )
                .await
            }
            None => {
                let metadata = &prepared.game.metadata;
                info!(
                    moves = prepared.game.moves.len(),
                    records = prepared.record_count(),
                    black = metadata.black_player.as_deref().unwrap_or("-"),
                    white = metadata.white_player.as_deref().unwrap_or("-"),
                    result = metadata.result.as_deref().unwrap_or("-"),
                    "Parsed (dry run)"
                );
                Ok(UploadOutcome::DryRun {
                    records: prepared.record_count(),
                })
            }
        };

        if let Err(e) = &outcome {
            error!(file = %name, "{e}");
        }
        summary.record(&outcome);
    }

    info!(
        success = summary.success,
        skipped = summary.skipped,
        errors = summary.errors,
        "Done"
    );

    if summary.errors > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
