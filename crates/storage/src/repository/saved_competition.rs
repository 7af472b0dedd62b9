use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::SavedCompetition;

/// Repository for the viewer × competition save relation
pub struct SavedCompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SavedCompetitionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The save record for (`user_id`, `competition_id`), if any
    pub async fn find(
        &self,
        user_id: Uuid,
        competition_id: Uuid,
    ) -> Result<Option<SavedCompetition>> {
        let saved = sqlx::query_as::<_, SavedCompetition>(
            r#"
            SELECT id, user_id, competition_id, created_at
            FROM saved_competitions
            WHERE competition_id = $1 AND user_id = $2
            LIMIT 1
            "#,
        )
        .bind(competition_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(saved)
    }

    /// Save a competition for a viewer; saving twice returns the existing record
    pub async fn insert(&self, user_id: Uuid, competition_id: Uuid) -> Result<SavedCompetition> {
        let saved = sqlx::query_as::<_, SavedCompetition>(
            r#"
            INSERT INTO saved_competitions (user_id, competition_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, competition_id)
                DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, competition_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(competition_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).missing_reference())?;

        tracing::debug!(%user_id, %competition_id, "Competition saved");

        Ok(saved)
    }

    /// Remove a viewer's save record
    pub async fn delete(&self, user_id: Uuid, competition_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM saved_competitions
            WHERE competition_id = $1 AND user_id = $2
            "#,
        )
        .bind(competition_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tracing::debug!(%user_id, %competition_id, "Competition unsaved");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    #[ignore] // Only run when Postgres is available
    async fn test_saving_unknown_competition_is_not_found(pool: PgPool) {
        let repo = SavedCompetitionRepository::new(&pool);
        let result = repo.insert(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[sqlx::test]
    #[ignore] // Only run when Postgres is available
    async fn test_delete_missing_save_is_not_found(pool: PgPool) {
        let repo = SavedCompetitionRepository::new(&pool);
        let result = repo.delete(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(StorageError::NotFound)));
        assert!(repo.find(Uuid::new_v4(), Uuid::new_v4()).await.unwrap().is_none());
    }
}
