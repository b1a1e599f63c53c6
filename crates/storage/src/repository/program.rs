use sqlx::{PgConnection, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::program::{CreateProgramRequest, ProgramResultsRequest, UpdateProgramRequest};
use crate::error::{Result, StorageError};
use crate::models::Program;

const PROGRAM_COLUMNS: &str = r#"
    program_id, name, channel, air_date, genre, image_url, description, real_audience,
    allow_score_prediction, team1_name, team2_name, real_score_team1, real_score_team2,
    is_event_program, bonus_title, bonus_choices, bonus_answer, created_at
"#;

/// Repository for Program database operations
pub struct ProgramRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProgramRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List programs, optionally restricted to a genre and a channel
    pub async fn list(&self, genre: Option<&str>, channel: Option<&str>) -> Result<Vec<Program>> {
        let mut query = QueryBuilder::new("SELECT ");
        query.push(PROGRAM_COLUMNS);
        query.push(" FROM programs WHERE 1=1");

        if let Some(genre) = genre {
            query.push(" AND genre = ");
            query.push_bind(genre);
        }

        if let Some(channel) = channel {
            query.push(" AND channel = ");
            query.push_bind(channel);
        }

        query.push(" ORDER BY air_date ASC, created_at DESC");

        let programs = query.build_query_as::<Program>().fetch_all(self.pool).await?;

        Ok(programs)
    }

    pub async fn list_ids(&self) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT program_id FROM programs ORDER BY air_date")
            .fetch_all(self.pool)
            .await?;

        Ok(ids)
    }

    pub async fn find_by_id(&self, program_id: Uuid) -> Result<Program> {
        let sql = format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE program_id = $1");

        let program = sqlx::query_as::<_, Program>(&sql)
            .bind(program_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(program)
    }

    pub async fn create(&self, req: &CreateProgramRequest) -> Result<Program> {
        let sql = format!(
            r#"
            INSERT INTO programs (
                name, channel, air_date, genre, image_url, description,
                allow_score_prediction, team1_name, team2_name,
                is_event_program, bonus_title, bonus_choices
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PROGRAM_COLUMNS}
            "#
        );

        let program = sqlx::query_as::<_, Program>(&sql)
            .bind(&req.name)
            .bind(&req.channel)
            .bind(req.air_date)
            .bind(&req.genre)
            .bind(&req.image_url)
            .bind(&req.description)
            .bind(req.allow_score_prediction)
            .bind(&req.team1_name)
            .bind(&req.team2_name)
            .bind(req.is_event_program)
            .bind(&req.bonus_title)
            .bind(&req.bonus_choices)
            .fetch_one(self.pool)
            .await?;

        Ok(program)
    }

    /// Apply a partial update; absent fields keep their current value
    pub async fn update(&self, existing: &Program, req: &UpdateProgramRequest) -> Result<Program> {
        let sql = format!(
            r#"
            UPDATE programs
            SET
                name = $2,
                channel = $3,
                air_date = $4,
                genre = $5,
                image_url = $6,
                description = $7,
                allow_score_prediction = $8,
                team1_name = $9,
                team2_name = $10,
                is_event_program = $11,
                bonus_title = $12,
                bonus_choices = $13
            WHERE program_id = $1
            RETURNING {PROGRAM_COLUMNS}
            "#
        );

        let program = sqlx::query_as::<_, Program>(&sql)
            .bind(existing.program_id)
            .bind(req.name.as_ref().unwrap_or(&existing.name))
            .bind(req.channel.as_ref().unwrap_or(&existing.channel))
            .bind(req.air_date.unwrap_or(existing.air_date))
            .bind(req.genre.as_ref().unwrap_or(&existing.genre))
            .bind(req.image_url.as_ref().or(existing.image_url.as_ref()))
            .bind(req.description.as_ref().or(existing.description.as_ref()))
            .bind(req.allow_score_prediction.unwrap_or(existing.allow_score_prediction))
            .bind(req.team1_name.as_ref().or(existing.team1_name.as_ref()))
            .bind(req.team2_name.as_ref().or(existing.team2_name.as_ref()))
            .bind(req.is_event_program.unwrap_or(existing.is_event_program))
            .bind(req.bonus_title.as_ref().or(existing.bonus_title.as_ref()))
            .bind(req.bonus_choices.as_ref().unwrap_or(&existing.bonus_choices))
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(program)
    }

    /// Record the observed audience and, when relevant, the final score and bonus answer
    pub async fn set_results(
        conn: &mut PgConnection,
        program_id: Uuid,
        req: &ProgramResultsRequest,
    ) -> Result<Program> {
        let sql = format!(
            r#"
            UPDATE programs
            SET
                real_audience = $2,
                real_score_team1 = $3,
                real_score_team2 = $4,
                bonus_answer = $5
            WHERE program_id = $1
            RETURNING {PROGRAM_COLUMNS}
            "#
        );

        let program = sqlx::query_as::<_, Program>(&sql)
            .bind(program_id)
            .bind(req.real_audience)
            .bind(req.real_score_team1)
            .bind(req.real_score_team2)
            .bind(&req.bonus_answer)
            .fetch_optional(conn)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(program)
    }

    pub async fn delete(&self, program_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM programs WHERE program_id = $1")
            .bind(program_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
