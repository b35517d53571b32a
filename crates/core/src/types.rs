use uuid::Uuid;

/// Entity identifiers are process-unique opaque strings.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Prefix for upload queue identifiers.
pub const UPLOAD_ID_PREFIX: &str = "u_";

/// Prefix for video identifiers.
pub const VIDEO_ID_PREFIX: &str = "v_";

/// Prefix for notification identifiers.
pub const NOTIFICATION_ID_PREFIX: &str = "n_";

/// Generate a new identifier with the given prefix.
///
/// UUIDv7 keeps identifiers roughly ordered by creation time.
pub fn new_id(prefix: &str) -> EntityId {
    format!("{prefix}{}", Uuid::now_v7().simple())
}
