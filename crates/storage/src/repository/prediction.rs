use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::prediction::NewPrediction;
use crate::error::{Result, StorageError};
use crate::models::{Prediction, ScoringRecord};
use crate::repository::store::{RecordFilter, ScoringStore};
use crate::services::scoring::ScoreBreakdown;

const PREDICTION_COLUMNS: &str = r#"
    prediction_id, user_id, program_id, predicted_audience,
    predicted_score_team1, predicted_score_team2, predicted_bonus_answer, submitted_at,
    calculated_accuracy, calculated_score, total_score
"#;

pub struct PredictionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PredictionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a prediction unless the user already has one for this program.
    ///
    /// The (user_id, program_id) unique constraint decides; there is no prior lookup.
    pub async fn create(&self, prediction: &NewPrediction) -> Result<Prediction> {
        let sql = format!(
            r#"
            INSERT INTO predictions (
                user_id, program_id, predicted_audience,
                predicted_score_team1, predicted_score_team2, predicted_bonus_answer
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT ON CONSTRAINT predictions_user_program_key DO NOTHING
            RETURNING {PREDICTION_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, Prediction>(&sql)
            .bind(prediction.user_id)
            .bind(prediction.program_id)
            .bind(prediction.predicted_audience)
            .bind(prediction.predicted_score_team1)
            .bind(prediction.predicted_score_team2)
            .bind(&prediction.predicted_bonus_answer)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| {
                let error = StorageError::from(e);
                if error.is_foreign_key_violation() {
                    StorageError::NotFound
                } else {
                    error
                }
            })?;

        inserted.ok_or_else(StorageError::duplicate_prediction)
    }

    /// Store the derived score columns of one prediction
    pub async fn cache_score(
        conn: &mut PgConnection,
        prediction_id: Uuid,
        score: &ScoreBreakdown,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE predictions
            SET calculated_accuracy = $2,
                calculated_score = $3,
                total_score = $4
            WHERE prediction_id = $1
            "#,
        )
        .bind(prediction_id)
        .bind(score.calculated_accuracy)
        .bind(score.calculated_score)
        .bind(score.total_score)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn fetch_records(&self, filter: &RecordFilter) -> Result<Vec<ScoringRecord>> {
        let records = records_query(filter)
            .build_query_as::<ScoringRecord>()
            .fetch_all(self.pool)
            .await?;

        Ok(records)
    }

    /// Same as `fetch_records`, on a connection that may be inside a transaction
    pub async fn fetch_records_in(
        conn: &mut PgConnection,
        filter: &RecordFilter,
    ) -> Result<Vec<ScoringRecord>> {
        let records = records_query(filter)
            .build_query_as::<ScoringRecord>()
            .fetch_all(conn)
            .await?;

        Ok(records)
    }
}

fn records_query(filter: &RecordFilter) -> QueryBuilder<'_, Postgres> {
    let mut query = QueryBuilder::new(
        r#"
        SELECT
            pr.prediction_id,
            pr.user_id,
            pf.username,
            pf.avatar_url,
            p.program_id,
            p.name AS program_name,
            p.channel,
            p.genre,
            p.air_date,
            pr.submitted_at,
            pr.predicted_audience,
            p.real_audience,
            p.allow_score_prediction,
            pr.predicted_score_team1,
            pr.predicted_score_team2,
            p.real_score_team1,
            p.real_score_team2,
            p.is_event_program,
            pr.predicted_bonus_answer,
            p.bonus_answer
        FROM predictions pr
        INNER JOIN programs p ON pr.program_id = p.program_id
        INNER JOIN profiles pf ON pr.user_id = pf.profile_id
        WHERE 1=1
        "#,
    );

    if let Some(from) = filter.from {
        query.push(" AND p.air_date >= ");
        query.push_bind(from.and_time(chrono::NaiveTime::MIN));
    }

    if let Some(until) = filter.until {
        query.push(" AND p.air_date < ");
        query.push_bind(until.and_time(chrono::NaiveTime::MIN));
    }

    if let Some(ref genre) = filter.genre {
        query.push(" AND p.genre = ");
        query.push_bind(genre);
    }

    if let Some(ref channel) = filter.channel {
        query.push(" AND p.channel = ");
        query.push_bind(channel);
    }

    if let Some(user_id) = filter.user_id {
        query.push(" AND pr.user_id = ");
        query.push_bind(user_id);
    }

    if let Some(program_id) = filter.program_id {
        query.push(" AND pr.program_id = ");
        query.push_bind(program_id);
    }

    query.push(" ORDER BY p.air_date DESC, pr.submitted_at DESC");

    query
}

#[async_trait]
impl ScoringStore for PredictionRepository<'_> {
    async fn scoring_records(&self, filter: &RecordFilter) -> Result<Vec<ScoringRecord>> {
        self.fetch_records(filter).await
    }

    async fn registered_users(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
