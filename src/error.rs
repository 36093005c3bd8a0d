use thiserror::Error;

use crate::models::MemberId;

/// Rejections raised by the stats form and configuration loading.
/// Scoring itself never fails.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("no leader with id {0}")]
    UnknownLeader(MemberId),

    #[error("unknown book of the Bible: {0}")]
    UnknownBook(String),

    #[error("{book} has {total} chapters, cannot record {read} read")]
    ChaptersOutOfRange { book: String, read: u32, total: u32 },

    #[error("prayer hours must be a non-negative number, got {0}")]
    InvalidPrayerHours(f64),

    #[error("week must be between 1 and 52, got {0}")]
    InvalidWeek(u32),

    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("failed to read config {path}: {message}")]
    Config { path: String, message: String },
}
