//! Analyzed document persistence.

use chrono::{SecondsFormat, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::DocumentRecord;
use super::new_id;
use super::pool::{DbError, DbPool};
use crate::models::{Document, NewDocument};
use crate::schema::documents;
use crate::with_conn;

/// Repository for analyzed uploads. Rows are insert-only.
#[derive(Clone)]
pub struct DocumentRepository {
    pool: DbPool,
}

impl DocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a document row stamped with the current time.
    pub async fn create(&self, doc: &NewDocument) -> Result<Document, DbError> {
        let record = DocumentRecord {
            id: new_id(),
            filename: doc.filename.clone(),
            path: doc.path.clone(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            prompt: doc.prompt.clone(),
            analysis_type: doc.analysis_type.clone(),
            result: doc.result.clone(),
        };

        with_conn!(self.pool, conn => {
            diesel::insert_into(documents::table)
                .values(&record)
                .execute(&mut conn)
                .await
        })?;

        Ok(record.into())
    }

    /// All documents, newest first.
    pub async fn list(&self) -> Result<Vec<Document>, DbError> {
        with_conn!(self.pool, conn => {
            documents::table
                .order((documents::created_at.desc(), documents::id.desc()))
                .load::<DocumentRecord>(&mut conn)
                .await
                .map(|records| records.into_iter().map(Document::from).collect())
        })
    }

    pub async fn get(&self, id: &str) -> Result<Option<Document>, DbError> {
        with_conn!(self.pool, conn => {
            documents::table
                .find(id)
                .first::<DocumentRecord>(&mut conn)
                .await
                .optional()
                .map(|opt| opt.map(Document::from))
        })
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        use diesel::dsl::count_star;

        with_conn!(self.pool, conn => {
            documents::table
                .select(count_star())
                .first(&mut conn)
                .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::setup_test_db;

    #[tokio::test]
    async fn test_document_create_and_get() {
        let (ctx, _dir) = setup_test_db().await;
        let repo = ctx.documents();

        let doc = repo
            .create(&NewDocument {
                filename: "cv.pdf".to_string(),
                path: "uploads/cv.pdf".to_string(),
                prompt: Some("Summarize".to_string()),
                analysis_type: Some("cv".to_string()),
                result: Some("A strong candidate".to_string()),
            })
            .await
            .unwrap();

        let fetched = repo.get(&doc.id).await.unwrap().unwrap();
        assert_eq!(fetched, doc);
        assert_eq!(fetched.result.as_deref(), Some("A strong candidate"));
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_optional_fields_stay_null() {
        let (ctx, _dir) = setup_test_db().await;
        let repo = ctx.documents();

        let doc = repo
            .create(&NewDocument {
                filename: "notes.txt".to_string(),
                path: "uploads/notes.txt".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed, vec![doc]);
        assert_eq!(listed[0].analysis_type, None);
    }
}
