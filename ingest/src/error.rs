use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The page is not shaped like a match report.
    #[error("unexpected page structure: {context}")]
    Structure { context: &'static str },

    /// The page parsed but no map section contained any player rows.
    #[error("no player rows found in any map section")]
    EmptyResult,

    /// Fetch failed past the retry budget.
    #[error("fetching {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("database error: {0}")]
    Persistence(#[from] diesel::result::Error),

    #[error("connecting to database: {0}")]
    Connection(#[from] diesel::result::ConnectionError),

    #[error("running migrations: {0}")]
    Migration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
