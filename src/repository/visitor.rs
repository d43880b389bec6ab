use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::VisitorRecord;
use super::new_id;
use super::pool::{DbError, DbPool};
use crate::models::{Visitor, VisitorInput};
use crate::schema::visitors;
use crate::with_conn;

/// Visitor repository.
#[derive(Clone)]
pub struct VisitorRepository {
    pool: DbPool,
}

impl VisitorRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Visitor>, DbError> {
        with_conn!(self.pool, conn => {
            visitors::table
                .order((visitors::name.asc(), visitors::id.asc()))
                .load::<VisitorRecord>(&mut conn)
                .await
                .map(|records| records.into_iter().map(Visitor::from).collect())
        })
    }

    pub async fn get(&self, id: &str) -> Result<Option<Visitor>, DbError> {
        with_conn!(self.pool, conn => {
            visitors::table
                .find(id)
                .first::<VisitorRecord>(&mut conn)
                .await
                .optional()
                .map(|opt| opt.map(Visitor::from))
        })
    }

    pub async fn create(&self, input: &VisitorInput) -> Result<Visitor, DbError> {
        let record = VisitorRecord {
            id: new_id(),
            name: input.name.clone(),
        };

        with_conn!(self.pool, conn => {
            diesel::insert_into(visitors::table)
                .values(&record)
                .execute(&mut conn)
                .await
        })?;

        Ok(record.into())
    }

    pub async fn update(&self, id: &str, input: &VisitorInput) -> Result<Option<Visitor>, DbError> {
        let rows = with_conn!(self.pool, conn => {
            diesel::update(visitors::table.find(id))
                .set(visitors::name.eq(&input.name))
                .execute(&mut conn)
                .await
        })?;

        Ok((rows > 0).then(|| Visitor {
            id: id.to_string(),
            name: input.name.clone(),
        }))
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Visitor>, DbError> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        with_conn!(self.pool, conn => {
            diesel::delete(visitors::table.find(id))
                .execute(&mut conn)
                .await
        })?;

        Ok(Some(existing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::setup_test_db;

    #[tokio::test]
    async fn test_visitor_crud() {
        let (ctx, _dir) = setup_test_db().await;
        let repo = ctx.visitors();

        let bob = repo
            .create(&VisitorInput {
                name: "Bob".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(repo.list().await.unwrap(), vec![bob.clone()]);

        let deleted = repo.delete(&bob.id).await.unwrap();
        assert_eq!(deleted, Some(bob.clone()));
        assert!(repo.get(&bob.id).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
