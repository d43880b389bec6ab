//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM with compile-time query checking.
//! Supports both SQLite and PostgreSQL backends.

pub mod context;
pub mod models;
pub mod pool;
pub mod util;

#[cfg(feature = "postgres")]
pub mod pg_tls;

// Repositories
mod customer;
mod document;
mod door;
mod iot;
mod user;
mod visitor;

pub use context::DbContext;
pub use customer::CustomerRepository;
pub use document::DocumentRepository;
pub use door::{DoorAccessRepository, DoorGroupRepository, DoorPanelRepository};
pub use iot::{IotDeviceRepository, IotEventRepository};
pub use pool::{DbError, DbPool};
pub use user::{Credentials, UserRepository};
pub use visitor::VisitorRepository;

use chrono::{DateTime, Utc};

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Parse an optional datetime string from the database.
pub fn parse_datetime_opt(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

/// Generate a new record identifier.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_falls_back_to_epoch() {
        assert_eq!(parse_datetime("garbage"), DateTime::UNIX_EPOCH);
        let dt = parse_datetime("2024-05-01T12:00:00+00:00");
        assert_eq!(dt.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn test_parse_datetime_opt() {
        assert_eq!(parse_datetime_opt(None), None);
        assert_eq!(parse_datetime_opt(Some("nope".to_string())), None);
        assert!(parse_datetime_opt(Some("2024-05-01T12:00:00Z".to_string())).is_some());
    }
}
