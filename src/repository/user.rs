//! User accounts for HTTP Basic authentication.
//!
//! Hashing happens in the server layer; this repository only stores and
//! returns the opaque hash string.

use chrono::{SecondsFormat, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::UserRecord;
use super::new_id;
use super::pool::{DbError, DbPool};
use crate::models::User;
use crate::schema::users;
use crate::with_conn;

/// A user together with the stored password hash.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new user. A duplicate username surfaces as a
    /// `UniqueViolation` database error.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<User, DbError> {
        let record = UserRecord {
            id: new_id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        with_conn!(self.pool, conn => {
            diesel::insert_into(users::table)
                .values(&record)
                .execute(&mut conn)
                .await
        })?;

        Ok(record.into())
    }

    pub async fn get(&self, id: &str) -> Result<Option<User>, DbError> {
        with_conn!(self.pool, conn => {
            users::table
                .find(id)
                .first::<UserRecord>(&mut conn)
                .await
                .optional()
                .map(|opt| opt.map(User::from))
        })
    }

    /// Look up a user and their hash by username.
    pub async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>, DbError> {
        let record = with_conn!(self.pool, conn => {
            users::table
                .filter(users::username.eq(username))
                .first::<UserRecord>(&mut conn)
                .await
                .optional()
        })?;

        Ok(record.map(|record| Credentials {
            password_hash: record.password_hash.clone(),
            user: record.into(),
        }))
    }

    pub async fn exists(&self, username: &str) -> Result<bool, DbError> {
        use diesel::dsl::count_star;

        let count: i64 = with_conn!(self.pool, conn => {
            users::table
                .filter(users::username.eq(username))
                .select(count_star())
                .first(&mut conn)
                .await
        })?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::setup_test_db;
    use crate::repository::util::is_unique_violation;

    #[tokio::test]
    async fn test_create_and_find_credentials() {
        let (ctx, _dir) = setup_test_db().await;
        let repo = ctx.users();

        let user = repo.create("alice", "$2b$04$hash").await.unwrap();
        assert!(repo.exists("alice").await.unwrap());
        assert!(!repo.exists("bob").await.unwrap());

        let creds = repo.find_credentials("alice").await.unwrap().unwrap();
        assert_eq!(creds.user, user);
        assert_eq!(creds.password_hash, "$2b$04$hash");
        assert_eq!(repo.get(&user.id).await.unwrap(), Some(user));

        assert!(repo.find_credentials("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let (ctx, _dir) = setup_test_db().await;
        let repo = ctx.users();

        repo.create("alice", "h1").await.unwrap();
        let err = repo.create("alice", "h2").await.unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
