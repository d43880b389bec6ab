//! Customer repository.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::CustomerRecord;
use super::new_id;
use super::pool::{DbError, DbPool};
use crate::models::{Customer, CustomerInput};
use crate::schema::customers;
use crate::with_conn;

#[derive(Clone)]
pub struct CustomerRepository {
    pool: DbPool,
}

impl CustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List all customers ordered by name.
    pub async fn list(&self) -> Result<Vec<Customer>, DbError> {
        with_conn!(self.pool, conn => {
            customers::table
                .order((customers::name.asc(), customers::id.asc()))
                .load::<CustomerRecord>(&mut conn)
                .await
                .map(|records| records.into_iter().map(Customer::from).collect())
        })
    }

    pub async fn get(&self, id: &str) -> Result<Option<Customer>, DbError> {
        with_conn!(self.pool, conn => {
            customers::table
                .find(id)
                .first::<CustomerRecord>(&mut conn)
                .await
                .optional()
                .map(|opt| opt.map(Customer::from))
        })
    }

    pub async fn create(&self, input: &CustomerInput) -> Result<Customer, DbError> {
        let record = CustomerRecord {
            id: new_id(),
            name: input.name.clone(),
        };

        with_conn!(self.pool, conn => {
            diesel::insert_into(customers::table)
                .values(&record)
                .execute(&mut conn)
                .await
        })?;

        Ok(record.into())
    }

    /// Replace a customer's fields. Returns `None` if the id does not exist.
    pub async fn update(
        &self,
        id: &str,
        input: &CustomerInput,
    ) -> Result<Option<Customer>, DbError> {
        let rows = with_conn!(self.pool, conn => {
            diesel::update(customers::table.find(id))
                .set(customers::name.eq(&input.name))
                .execute(&mut conn)
                .await
        })?;

        if rows == 0 {
            return Ok(None);
        }
        Ok(Some(Customer {
            id: id.to_string(),
            name: input.name.clone(),
        }))
    }

    /// Delete a customer, returning the removed row.
    pub async fn delete(&self, id: &str) -> Result<Option<Customer>, DbError> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        with_conn!(self.pool, conn => {
            diesel::delete(customers::table.find(id))
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

    fn input(name: &str) -> CustomerInput {
        CustomerInput {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_customer_crud() {
        let (ctx, _dir) = setup_test_db().await;
        let repo = ctx.customers();

        let alice = repo.create(&input("Alice")).await.unwrap();
        assert_eq!(alice.name, "Alice");
        assert!(!alice.id.is_empty());

        let fetched = repo.get(&alice.id).await.unwrap().unwrap();
        assert_eq!(fetched, alice);

        let renamed = repo.update(&alice.id, &input("Alicia")).await.unwrap().unwrap();
        assert_eq!(renamed.name, "Alicia");
        assert_eq!(repo.get(&alice.id).await.unwrap().unwrap().name, "Alicia");

        let deleted = repo.delete(&alice.id).await.unwrap().unwrap();
        assert_eq!(deleted.name, "Alicia");
        assert!(repo.get(&alice.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_customer() {
        let (ctx, _dir) = setup_test_db().await;
        let repo = ctx.customers();

        assert!(repo.get("nope").await.unwrap().is_none());
        assert!(repo.update("nope", &input("x")).await.unwrap().is_none());
        assert!(repo.delete("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let (ctx, _dir) = setup_test_db().await;
        let repo = ctx.customers();

        repo.create(&input("Zed")).await.unwrap();
        repo.create(&input("Amy")).await.unwrap();

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }
}
