//! Diesel ORM models for database tables.
//!
//! Timestamps are stored as RFC 3339 text and JSON payloads as text so that
//! the same records work on both SQLite and PostgreSQL.

use diesel::prelude::*;

use super::{parse_datetime, parse_datetime_opt};
use crate::models::{
    Customer, Document, DoorAccessState, DoorGroup, DoorPanel, IotDevice, IotEvent, User, Visitor,
};
use crate::schema;

/// Customer record from the database.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::customers)]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
}

impl From<CustomerRecord> for Customer {
    fn from(record: CustomerRecord) -> Self {
        Customer {
            id: record.id,
            name: record.name,
        }
    }
}

/// Visitor record from the database.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::visitors)]
pub struct VisitorRecord {
    pub id: String,
    pub name: String,
}

impl From<VisitorRecord> for Visitor {
    fn from(record: VisitorRecord) -> Self {
        Visitor {
            id: record.id,
            name: record.name,
        }
    }
}

/// Door panel record from the database.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::door_panels)]
pub struct DoorPanelRecord {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
}

impl From<DoorPanelRecord> for DoorPanel {
    fn from(record: DoorPanelRecord) -> Self {
        DoorPanel {
            id: record.id,
            name: record.name,
            location: record.location,
        }
    }
}

/// Door group record from the database.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::door_groups)]
pub struct DoorGroupRecord {
    pub id: String,
    pub name: String,
}

impl From<DoorGroupRecord> for DoorGroup {
    fn from(record: DoorGroupRecord) -> Self {
        DoorGroup {
            id: record.id,
            name: record.name,
        }
    }
}

/// The single door-access sync row.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::door_access_state)]
pub struct DoorAccessStateRecord {
    pub id: String,
    pub last_synced_with: Option<String>,
    pub synced_at: Option<String>,
}

impl From<DoorAccessStateRecord> for DoorAccessState {
    fn from(record: DoorAccessStateRecord) -> Self {
        DoorAccessState {
            last_synced_with: record.last_synced_with,
            synced_at: parse_datetime_opt(record.synced_at),
        }
    }
}

/// IoT device record from the database.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::iot_devices)]
pub struct IotDeviceRecord {
    pub id: String,
    pub device_id: String,
}

impl From<IotDeviceRecord> for IotDevice {
    fn from(record: IotDeviceRecord) -> Self {
        IotDevice {
            id: record.id,
            device_id: record.device_id,
        }
    }
}

/// IoT event record from the database.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::iot_events)]
pub struct IotEventRecord {
    pub id: String,
    pub device_id: String,
    pub payload: String,
    pub received_at: String,
}

impl From<IotEventRecord> for IotEvent {
    fn from(record: IotEventRecord) -> Self {
        IotEvent {
            id: record.id,
            device_id: record.device_id,
            payload: serde_json::from_str(&record.payload).unwrap_or(serde_json::Value::Null),
            received_at: parse_datetime(&record.received_at),
        }
    }
}

/// User record, including the password hash.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::users)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            username: record.username,
            created_at: parse_datetime(&record.created_at),
        }
    }
}

/// Document record from the database.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::documents)]
pub struct DocumentRecord {
    pub id: String,
    pub filename: String,
    pub path: String,
    pub created_at: String,
    pub prompt: Option<String>,
    pub analysis_type: Option<String>,
    pub result: Option<String>,
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        Document {
            id: record.id,
            filename: record.filename,
            path: record.path,
            created_at: parse_datetime(&record.created_at),
            prompt: record.prompt,
            analysis_type: record.analysis_type,
            result: record.result,
        }
    }
}
