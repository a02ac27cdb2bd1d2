/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh member row id (`u-` prefixed UUID v4).
///
/// The prefix keeps row ids visually distinct from institution-issued
/// identifiers in logs and roster exports.
pub fn member_row_id() -> String {
    format!("u-{}", uuid::Uuid::new_v4())
}
