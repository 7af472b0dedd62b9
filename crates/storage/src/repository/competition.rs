use std::collections::HashMap;

use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::dto::competition::{
    CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest,
};
use crate::error::{Result, StorageError};
use crate::filter::{FilterOptions, Predicate};
use crate::models::{Competition, CompetitionStatus};

const COMPETITION_COLUMNS: &str = "c.id, c.title, c.description, c.image_url, c.category, \
     c.start_date, c.deadline, c.prize_value, c.entry_difficulty, c.sponsor, c.entry_url, \
     c.status, c.created_at, c.updated_at, c.created_by";

const RETURNING_COLUMNS: &str = "id, title, description, image_url, category, start_date, \
     deadline, prize_value, entry_difficulty, sponsor, entry_url, status, created_at, \
     updated_at, created_by";

#[derive(FromRow)]
struct ListingRow {
    #[sqlx(flatten)]
    competition: Competition,
    is_saved: bool,
}

#[derive(FromRow)]
struct LineRow {
    competition_id: Uuid,
    line: String,
}

/// Ordered child lists stored next to a competition
#[derive(Debug, Clone, Copy)]
enum ChildList {
    Requirements,
    Eligibility,
}

impl ChildList {
    fn table(&self) -> &'static str {
        match self {
            Self::Requirements => "competition_requirements",
            Self::Eligibility => "competition_eligibility",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Requirements => "requirement",
            Self::Eligibility => "criteria",
        }
    }
}

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    /// Create a new CompetitionRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active competitions matching `filters`, flagged with the viewer's saves
    pub async fn list_active(
        &self,
        filters: &FilterOptions,
        viewer: Option<Uuid>,
    ) -> Result<Vec<CompetitionResponse>> {
        let predicates = filters.listing_predicates();
        tracing::debug!(predicates = predicates.len(), "Listing active competitions");

        self.select(&predicates, viewer, "c.deadline ASC, c.created_at DESC")
            .await
    }

    /// Every competition regardless of status, newest first
    pub async fn list_all(&self) -> Result<Vec<CompetitionResponse>> {
        self.select(&[], None, "c.created_at DESC").await
    }

    /// Get a competition row by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            "SELECT {COMPETITION_COLUMNS} FROM competitions c WHERE c.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(competition)
    }

    /// Get a competition by ID with its child lists
    pub async fn find_detailed(&self, id: Uuid, viewer: Option<Uuid>) -> Result<CompetitionResponse> {
        let competition = self.find_by_id(id).await?;
        let is_saved = match viewer {
            Some(viewer) => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS (SELECT 1 FROM saved_competitions \
                     WHERE competition_id = $1 AND user_id = $2)",
                )
                .bind(id)
                .bind(viewer)
                .fetch_one(self.pool)
                .await?
            }
            None => false,
        };

        let mut detailed = self.attach_lines(vec![(competition, is_saved)]).await?;
        detailed.pop().ok_or(StorageError::NotFound)
    }

    /// Create a new competition together with its requirement and eligibility lists
    pub async fn create(
        &self,
        req: &CreateCompetitionRequest,
        created_by: Option<Uuid>,
    ) -> Result<CompetitionResponse> {
        let mut tx = self.pool.begin().await?;

        let competition = sqlx::query_as::<_, Competition>(&format!(
            r#"
            INSERT INTO competitions (
                title, description, image_url, category, start_date, deadline,
                prize_value, entry_difficulty, sponsor, entry_url, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {RETURNING_COLUMNS}
            "#
        ))
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.image_url)
        .bind(req.category)
        .bind(req.start_date)
        .bind(req.deadline)
        .bind(req.prize_value)
        .bind(req.entry_difficulty)
        .bind(&req.sponsor)
        .bind(&req.entry_url)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StorageError::from(e).rejected_row())?;

        replace_lines(&mut tx, ChildList::Requirements, competition.id, &req.requirements).await?;
        replace_lines(&mut tx, ChildList::Eligibility, competition.id, &req.eligibility).await?;

        tx.commit().await?;

        tracing::info!(competition_id = %competition.id, "Competition created");

        Ok(CompetitionResponse::from_parts(
            competition,
            req.requirements.clone(),
            req.eligibility.clone(),
            false,
        ))
    }

    /// Apply `req` on top of `existing`; list fields replace the stored lists when present
    pub async fn update(
        &self,
        existing: &Competition,
        req: &UpdateCompetitionRequest,
    ) -> Result<CompetitionResponse> {
        let mut tx = self.pool.begin().await?;

        let competition = sqlx::query_as::<_, Competition>(&format!(
            r#"
            UPDATE competitions
            SET
                title = $2,
                description = $3,
                image_url = $4,
                category = $5,
                start_date = $6,
                deadline = $7,
                prize_value = $8,
                entry_difficulty = $9,
                sponsor = $10,
                entry_url = $11,
                status = $12,
                updated_at = now()
            WHERE id = $1
            RETURNING {RETURNING_COLUMNS}
            "#
        ))
        .bind(existing.id)
        .bind(req.title.as_ref().unwrap_or(&existing.title))
        .bind(req.description.as_ref().unwrap_or(&existing.description))
        .bind(req.image_url.as_ref().unwrap_or(&existing.image_url))
        .bind(req.category.unwrap_or(existing.category))
        .bind(req.start_date.unwrap_or(existing.start_date))
        .bind(req.deadline.unwrap_or(existing.deadline))
        .bind(req.prize_value.unwrap_or(existing.prize_value))
        .bind(req.entry_difficulty.unwrap_or(existing.entry_difficulty))
        .bind(req.sponsor.as_ref().unwrap_or(&existing.sponsor))
        .bind(req.entry_url.as_ref().unwrap_or(&existing.entry_url))
        .bind(req.status.unwrap_or(existing.status))
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StorageError::from(e).rejected_row())?
        .ok_or(StorageError::NotFound)?;

        if let Some(requirements) = &req.requirements {
            replace_lines(&mut tx, ChildList::Requirements, competition.id, requirements).await?;
        }
        if let Some(eligibility) = &req.eligibility {
            replace_lines(&mut tx, ChildList::Eligibility, competition.id, eligibility).await?;
        }

        tx.commit().await?;

        tracing::info!(competition_id = %competition.id, "Competition updated");

        let mut updated = self.attach_lines(vec![(competition, false)]).await?;
        updated.pop().ok_or(StorageError::NotFound)
    }

    /// Move a competition out of the public listing
    pub async fn archive(&self, id: Uuid) -> Result<CompetitionResponse> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            r#"
            UPDATE competitions
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {RETURNING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(CompetitionStatus::Archived)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        tracing::info!(competition_id = %id, "Competition archived");

        let mut archived = self.attach_lines(vec![(competition, false)]).await?;
        archived.pop().ok_or(StorageError::NotFound)
    }

    /// Delete a competition by ID; child rows and saves cascade
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM competitions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tracing::info!(competition_id = %id, "Competition deleted");

        Ok(())
    }

    async fn select(
        &self,
        predicates: &[Predicate],
        viewer: Option<Uuid>,
        order_by: &str,
    ) -> Result<Vec<CompetitionResponse>> {
        let mut query = QueryBuilder::new("SELECT ");
        query.push(COMPETITION_COLUMNS);

        match viewer {
            Some(viewer) => {
                query.push(
                    ", EXISTS (SELECT 1 FROM saved_competitions s \
                     WHERE s.competition_id = c.id AND s.user_id = ",
                );
                query.push_bind(viewer);
                query.push(") AS is_saved");
            }
            None => {
                query.push(", FALSE AS is_saved");
            }
        }

        query.push(" FROM competitions c WHERE 1=1");
        for predicate in predicates {
            predicate.push_sql(&mut query, "c");
        }
        query.push(" ORDER BY ");
        query.push(order_by);

        let rows: Vec<ListingRow> = query.build_query_as().fetch_all(self.pool).await?;

        self.attach_lines(
            rows.into_iter()
                .map(|row| (row.competition, row.is_saved))
                .collect(),
        )
        .await
    }

    async fn attach_lines(
        &self,
        rows: Vec<(Competition, bool)>,
    ) -> Result<Vec<CompetitionResponse>> {
        let ids: Vec<Uuid> = rows.iter().map(|(c, _)| c.id).collect();

        let mut requirements = self.load_lines(ChildList::Requirements, &ids).await?;
        let mut eligibility = self.load_lines(ChildList::Eligibility, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|(competition, is_saved)| {
                let id = competition.id;
                CompetitionResponse::from_parts(
                    competition,
                    requirements.remove(&id).unwrap_or_default(),
                    eligibility.remove(&id).unwrap_or_default(),
                    is_saved,
                )
            })
            .collect())
    }

    async fn load_lines(
        &self,
        list: ChildList,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<String>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, LineRow>(&format!(
            "SELECT competition_id, {column} AS line FROM {table} \
             WHERE competition_id = ANY($1) ORDER BY competition_id, position",
            column = list.column(),
            table = list.table(),
        ))
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in rows {
            grouped.entry(row.competition_id).or_default().push(row.line);
        }

        Ok(grouped)
    }
}

async fn replace_lines(
    tx: &mut Transaction<'_, Postgres>,
    list: ChildList,
    competition_id: Uuid,
    lines: &[String],
) -> Result<()> {
    sqlx::query(&format!(
        "DELETE FROM {} WHERE competition_id = $1",
        list.table()
    ))
    .bind(competition_id)
    .execute(&mut **tx)
    .await?;

    if lines.is_empty() {
        return Ok(());
    }

    let mut insert = QueryBuilder::<Postgres>::new(format!(
        "INSERT INTO {} (competition_id, position, {}) ",
        list.table(),
        list.column()
    ));
    insert.push_values(lines.iter().enumerate(), |mut row, (position, line)| {
        row.push_bind(competition_id)
            .push_bind(position as i32)
            .push_bind(line.clone());
    });
    insert.build().execute(&mut **tx).await?;

    Ok(())
}
