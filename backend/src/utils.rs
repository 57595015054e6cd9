use crate::error::ApiError;
use time::OffsetDateTime;
use uuid::Uuid;

pub fn parse_vote_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::InvalidId)
}

/// Creation timestamp, epoch milliseconds. The client clock of record.
pub fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
