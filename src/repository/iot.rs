//! IoT device registry and ingested event log.

use chrono::{SecondsFormat, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{IotDeviceRecord, IotEventRecord};
use super::new_id;
use super::pool::{DbError, DbPool};
use crate::models::{IotDevice, IotDeviceInput, IotEvent};
use crate::schema::{iot_devices, iot_events};
use crate::with_conn;

#[derive(Clone)]
pub struct IotDeviceRepository {
    pool: DbPool,
}

impl IotDeviceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<IotDevice>, DbError> {
        with_conn!(self.pool, conn => {
            iot_devices::table
                .order((iot_devices::device_id.asc(), iot_devices::id.asc()))
                .load::<IotDeviceRecord>(&mut conn)
                .await
                .map(|records| records.into_iter().map(IotDevice::from).collect())
        })
    }

    pub async fn get(&self, id: &str) -> Result<Option<IotDevice>, DbError> {
        with_conn!(self.pool, conn => {
            iot_devices::table
                .find(id)
                .first::<IotDeviceRecord>(&mut conn)
                .await
                .optional()
                .map(|opt| opt.map(IotDevice::from))
        })
    }

    pub async fn create(&self, input: &IotDeviceInput) -> Result<IotDevice, DbError> {
        let record = IotDeviceRecord {
            id: new_id(),
            device_id: input.device_id.clone(),
        };

        with_conn!(self.pool, conn => {
            diesel::insert_into(iot_devices::table)
                .values(&record)
                .execute(&mut conn)
                .await
        })?;

        Ok(record.into())
    }

    pub async fn update(
        &self,
        id: &str,
        input: &IotDeviceInput,
    ) -> Result<Option<IotDevice>, DbError> {
        let rows = with_conn!(self.pool, conn => {
            diesel::update(iot_devices::table.find(id))
                .set(iot_devices::device_id.eq(&input.device_id))
                .execute(&mut conn)
                .await
        })?;

        Ok((rows > 0).then(|| IotDevice {
            id: id.to_string(),
            device_id: input.device_id.clone(),
        }))
    }

    pub async fn delete(&self, id: &str) -> Result<Option<IotDevice>, DbError> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        with_conn!(self.pool, conn => {
            diesel::delete(iot_devices::table.find(id))
                .execute(&mut conn)
                .await
        })?;

        Ok(Some(existing))
    }
}

/// Append-only log of vendor data points.
#[derive(Clone)]
pub struct IotEventRepository {
    pool: DbPool,
}

impl IotEventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Store one event stamped with the current time.
    pub async fn ingest(
        &self,
        device_id: &str,
        payload: &serde_json::Value,
    ) -> Result<IotEvent, DbError> {
        let record = IotEventRecord {
            id: new_id(),
            device_id: device_id.to_string(),
            payload: payload.to_string(),
            received_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        with_conn!(self.pool, conn => {
            diesel::insert_into(iot_events::table)
                .values(&record)
                .execute(&mut conn)
                .await
        })?;

        Ok(record.into())
    }

    /// All events, newest first.
    pub async fn list(&self) -> Result<Vec<IotEvent>, DbError> {
        with_conn!(self.pool, conn => {
            iot_events::table
                .order((iot_events::received_at.desc(), iot_events::id.desc()))
                .load::<IotEventRecord>(&mut conn)
                .await
                .map(|records| records.into_iter().map(IotEvent::from).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::setup_test_db;
    use serde_json::json;

    #[tokio::test]
    async fn test_ingest_keeps_payload() {
        let (ctx, _dir) = setup_test_db().await;
        let repo = ctx.iot_events();

        let event = repo
            .ingest("sensor-1", &json!({"temp": 21.5, "unit": "C"}))
            .await
            .unwrap();

        let events = repo.list().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, event.id);
        assert_eq!(events[0].payload, json!({"temp": 21.5, "unit": "C"}));
    }

    #[tokio::test]
    async fn test_events_newest_first() {
        let (ctx, _dir) = setup_test_db().await;
        let repo = ctx.iot_events();

        let first = repo.ingest("a", &json!(1)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.ingest("b", &json!(2)).await.unwrap();

        let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_device_crud() {
        let (ctx, _dir) = setup_test_db().await;
        let repo = ctx.iot_devices();

        let device = repo
            .create(&IotDeviceInput {
                device_id: "sensor-1".to_string(),
            })
            .await
            .unwrap();
        let updated = repo
            .update(
                &device.id,
                &IotDeviceInput {
                    device_id: "sensor-2".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.device_id, "sensor-2");
        assert_eq!(repo.list().await.unwrap(), vec![updated]);
    }
}
