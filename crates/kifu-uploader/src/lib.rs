//! Batch uploader for KIF transcripts.
//!
//! Collects `.kif` files, decodes and replays each one with `kifu_core`, and
//! stores the per-move statistics plus a game record in Postgres.

pub mod config;
pub mod db;
pub mod error;
pub mod files;
pub mod hash;
pub mod upload;

pub use config::{Args, UploaderConfig};
pub use error::UploadError;
pub use upload::{prepare_game, PreparedGame, Summary, UploadOutcome};
