//! Door-access repositories: panels, groups, and the controller sync row.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{DoorAccessStateRecord, DoorGroupRecord, DoorPanelRecord};
use super::new_id;
use super::pool::{DbError, DbPool};
use crate::models::{DoorAccessState, DoorGroup, DoorGroupInput, DoorPanel, DoorPanelInput};
use crate::schema::{door_access_state, door_groups, door_panels};
use crate::{with_conn, with_conn_split};

/// Key of the single door-access state row.
const STATE_KEY: &str = "default";

#[derive(Clone)]
pub struct DoorPanelRepository {
    pool: DbPool,
}

impl DoorPanelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<DoorPanel>, DbError> {
        with_conn!(self.pool, conn => {
            door_panels::table
                .order((door_panels::name.asc(), door_panels::id.asc()))
                .load::<DoorPanelRecord>(&mut conn)
                .await
                .map(|records| records.into_iter().map(DoorPanel::from).collect())
        })
    }

    pub async fn get(&self, id: &str) -> Result<Option<DoorPanel>, DbError> {
        with_conn!(self.pool, conn => {
            door_panels::table
                .find(id)
                .first::<DoorPanelRecord>(&mut conn)
                .await
                .optional()
                .map(|opt| opt.map(DoorPanel::from))
        })
    }

    pub async fn create(&self, input: &DoorPanelInput) -> Result<DoorPanel, DbError> {
        let record = DoorPanelRecord {
            id: new_id(),
            name: input.name.clone(),
            location: input.location.clone(),
        };

        with_conn!(self.pool, conn => {
            diesel::insert_into(door_panels::table)
                .values(&record)
                .execute(&mut conn)
                .await
        })?;

        Ok(record.into())
    }

    /// Replace name and location. An omitted location clears it.
    pub async fn update(
        &self,
        id: &str,
        input: &DoorPanelInput,
    ) -> Result<Option<DoorPanel>, DbError> {
        let rows = with_conn!(self.pool, conn => {
            diesel::update(door_panels::table.find(id))
                .set((
                    door_panels::name.eq(&input.name),
                    door_panels::location.eq(&input.location),
                ))
                .execute(&mut conn)
                .await
        })?;

        Ok((rows > 0).then(|| DoorPanel {
            id: id.to_string(),
            name: input.name.clone(),
            location: input.location.clone(),
        }))
    }

    pub async fn delete(&self, id: &str) -> Result<Option<DoorPanel>, DbError> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        with_conn!(self.pool, conn => {
            diesel::delete(door_panels::table.find(id))
                .execute(&mut conn)
                .await
        })?;

        Ok(Some(existing))
    }
}

#[derive(Clone)]
pub struct DoorGroupRepository {
    pool: DbPool,
}

impl DoorGroupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<DoorGroup>, DbError> {
        with_conn!(self.pool, conn => {
            door_groups::table
                .order((door_groups::name.asc(), door_groups::id.asc()))
                .load::<DoorGroupRecord>(&mut conn)
                .await
                .map(|records| records.into_iter().map(DoorGroup::from).collect())
        })
    }

    pub async fn get(&self, id: &str) -> Result<Option<DoorGroup>, DbError> {
        with_conn!(self.pool, conn => {
            door_groups::table
                .find(id)
                .first::<DoorGroupRecord>(&mut conn)
                .await
                .optional()
                .map(|opt| opt.map(DoorGroup::from))
        })
    }

    pub async fn create(&self, input: &DoorGroupInput) -> Result<DoorGroup, DbError> {
        let record = DoorGroupRecord {
            id: new_id(),
            name: input.name.clone(),
        };

        with_conn!(self.pool, conn => {
            diesel::insert_into(door_groups::table)
                .values(&record)
                .execute(&mut conn)
                .await
        })?;

        Ok(record.into())
    }

    pub async fn update(
        &self,
        id: &str,
        input: &DoorGroupInput,
    ) -> Result<Option<DoorGroup>, DbError> {
        let rows = with_conn!(self.pool, conn => {
            diesel::update(door_groups::table.find(id))
                .set(door_groups::name.eq(&input.name))
                .execute(&mut conn)
                .await
        })?;

        Ok((rows > 0).then(|| DoorGroup {
            id: id.to_string(),
            name: input.name.clone(),
        }))
    }

    pub async fn delete(&self, id: &str) -> Result<Option<DoorGroup>, DbError> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        with_conn!(self.pool, conn => {
            diesel::delete(door_groups::table.find(id))
                .execute(&mut conn)
                .await
        })?;

        Ok(Some(existing))
    }
}

/// Persisted record of the last sync with the local door-access controller.
#[derive(Clone)]
pub struct DoorAccessRepository {
    pool: DbPool,
}

impl DoorAccessRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Current sync state; all fields are `None` before the first sync.
    pub async fn get(&self) -> Result<DoorAccessState, DbError> {
        let record = with_conn!(self.pool, conn => {
            door_access_state::table
                .find(STATE_KEY)
                .first::<DoorAccessStateRecord>(&mut conn)
                .await
                .optional()
        })?;

        Ok(record.map(DoorAccessState::from).unwrap_or_default())
    }

    /// Record a sync against `controller_url`, replacing any previous state.
    pub async fn record_sync(
        &self,
        controller_url: &str,
        synced_at: DateTime<Utc>,
    ) -> Result<DoorAccessState, DbError> {
        let record = DoorAccessStateRecord {
            id: STATE_KEY.to_string(),
            last_synced_with: Some(controller_url.to_string()),
            synced_at: Some(synced_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
        };

        with_conn_split!(self.pool,
            sqlite: conn => {
                diesel::replace_into(door_access_state::table)
                    .values(&record)
                    .execute(&mut conn)
                    .await
            },
            postgres: conn => {
                diesel::insert_into(door_access_state::table)
                    .values(&record)
                    .on_conflict(door_access_state::id)
                    .do_update()
                    .set((
                        door_access_state::last_synced_with.eq(&record.last_synced_with),
                        door_access_state::synced_at.eq(&record.synced_at),
                    ))
                    .execute(&mut conn)
                    .await
            }
        )?;

        Ok(record.into())
    }
}
