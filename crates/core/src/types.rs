/// Warehouse and reservation primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Users are keyed by an opaque UUID string.
pub type UserId = String;
