//! Uploader configuration from command-line arguments and environment variables

use std::env;
use std::path::PathBuf;

use crate::error::UploadError;

const DEFAULT_PATH: &str = "kifu";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Parsed command-line arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    /// A `.kif` file or a directory of them
    pub path: PathBuf,
    pub user_id: Option<String>,
    pub skip_duplicate_check: bool,
    pub dry_run: bool,
}

impl Args {
    /// Parse `[PATH] [--user-id ID] [--skip-duplicate-check] [--dry-run]`.
    /// The iterator must not include the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, UploadError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Args::default();
        let mut path = None;
        let mut iter = args.into_iter().map(Into::into);

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--user-id" => {
                    let id = iter
                        .next()
                        .ok_or_else(|| UploadError::Args("--user-id needs a value".into()))?;
                    parsed.user_id = Some(id);
                }
                "--skip-duplicate-check" => parsed.skip_duplicate_check = true,
                "--dry-run" => parsed.dry_run = true,
                flag if flag.starts_with("--") => {
                    return Err(UploadError::Args(format!("unknown option {flag}")));
                }
                _ if path.is_some() => {
                    return Err(UploadError::Args(format!("unexpected argument {arg}")));
                }
                _ => path = Some(PathBuf::from(arg)),
            }
        }

        parsed.path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_PATH));
        Ok(parsed)
    }
}

#[derive(Clone, Debug)]
pub struct UploaderConfig {
    /// Postgres connection URL; absent in dry-run mode
    pub database_url: Option<String>,

    /// Owner recorded on every uploaded row (anonymous when unset)
    pub user_id: Option<String>,

    pub max_connections: u32,
}

impl UploaderConfig {
    /// Load configuration from the environment. `--user-id` wins over
    /// `UPLOAD_USER_ID`; `DATABASE_URL` is only required outside dry-run mode.
    pub fn from_env(args: &Args) -> Result<Self, UploadError> {
        let database_url = env::var("DATABASE_URL").ok();
        if database_url.is_none() && !args.dry_run {
            return Err(UploadError::Config("DATABASE_URL not set"));
        }

        let user_id = args
            .user_id
            .clone()
            .or_else(|| env::var("UPLOAD_USER_ID").ok())
            .filter(|id| !id.is_empty());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Ok(Self {
            database_url,
            user_id,
            max_connections,
        })
    }
}
