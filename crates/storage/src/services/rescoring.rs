use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::program::ProgramResultsRequest;
use crate::error::Result;
use crate::models::Program;
use crate::repository::prediction::PredictionRepository;
use crate::repository::program::ProgramRepository;
use crate::repository::store::RecordFilter;
use crate::services::scoring::score_prediction;

/// Recompute and store the score columns of every prediction on `program_id`.
///
/// All writes commit together, so readers never see a half-rescored program.
pub async fn rescore_program(pool: &PgPool, program_id: Uuid) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let count = rescore_in(&mut *tx, program_id).await?;
    tx.commit().await?;

    Ok(count)
}

/// Record a program's results, then refresh the scores of its predictions.
pub async fn set_results_and_rescore(
    pool: &PgPool,
    program_id: Uuid,
    results: &ProgramResultsRequest,
) -> Result<(Program, u64)> {
    let mut tx = pool.begin().await?;

    let program = ProgramRepository::set_results(&mut *tx, program_id, results).await?;
    let count = rescore_in(&mut *tx, program.program_id).await?;

    tx.commit().await?;

    Ok((program, count))
}

pub async fn rescore_all(pool: &PgPool) -> Result<u64> {
    let program_ids = ProgramRepository::new(pool).list_ids().await?;

    let mut count = 0u64;

    for program_id in program_ids {
        count += rescore_program(pool, program_id).await?;
    }

    Ok(count)
}

async fn rescore_in(conn: &mut PgConnection, program_id: Uuid) -> Result<u64> {
    let records =
        PredictionRepository::fetch_records_in(conn, &RecordFilter::for_program(program_id))
            .await?;

    let mut count = 0u64;

    for record in records {
        let score = score_prediction(&record.scoring_input());
        PredictionRepository::cache_score(conn, record.prediction_id, &score).await?;
        count += 1;
    }

    Ok(count)
}
