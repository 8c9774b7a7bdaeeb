/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Short, upper-cased form of an opaque reference shown to customers.
///
/// Matches what customers see in e-mail subjects: the first eight hex
/// characters of the UUID.
pub fn short_ref(reference: &uuid::Uuid) -> String {
    reference.simple().to_string()[..8].to_uppercase()
}
