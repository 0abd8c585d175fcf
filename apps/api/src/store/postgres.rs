use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::{ResumeFields, ResumeRecord};
use crate::store::{RecordStore, StoreError};

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list(&self, owner: Uuid) -> Result<Vec<ResumeRecord>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRecord>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<ResumeRecord, StoreError> {
        sqlx::query_as::<_, ResumeRecord>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { id })
    }

    async fn create(&self, owner: Uuid, fields: ResumeFields) -> Result<ResumeRecord, StoreError> {
        let record = sqlx::query_as::<_, ResumeRecord>(
            r#"
            INSERT INTO resumes
                (user_id, resume_name, full_name, profile, skills,
                 experience, education, referees, cover_letter)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(owner)
        .bind(&fields.resume_name)
        .bind(&fields.full_name)
        .bind(&fields.profile)
        .bind(&fields.skills)
        .bind(&fields.experience)
        .bind(&fields.education)
        .bind(&fields.referees)
        .bind(&fields.cover_letter)
        .fetch_one(&self.pool)
        .await?;

        info!("Created resume {} for user {owner}", record.id);
        Ok(record)
    }

    async fn update(&self, owner: Uuid, id: Uuid, fields: ResumeFields) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE resumes
            SET resume_name = $3, full_name = $4, profile = $5, skills = $6,
                experience = $7, education = $8, referees = $9, cover_letter = $10,
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&fields.resume_name)
        .bind(&fields.full_name)
        .bind(&fields.profile)
        .bind(&fields.skills)
        .bind(&fields.experience)
        .bind(&fields.education)
        .bind(&fields.referees)
        .bind(&fields.cover_letter)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }
        info!("Updated resume {id} for user {owner}");
        Ok(())
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }
        info!("Deleted resume {id} for user {owner}");
        Ok(())
    }
}
