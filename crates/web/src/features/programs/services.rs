use chrono::NaiveDate;
use sqlx::PgPool;
use storage::{
    dto::program::{
        CreateProgramRequest, ProgramFilter, ProgramResultsRequest, UpdateProgramRequest,
    },
    error::Result,
    models::Program,
    repository::program::ProgramRepository,
    services::{rescoring, schedule},
};
use uuid::Uuid;

/// List programs matching the filter, in display order
pub async fn list_programs(
    pool: &PgPool,
    filter: &ProgramFilter,
    today: NaiveDate,
) -> Result<Vec<Program>> {
    let repo = ProgramRepository::new(pool);
    let programs = repo
        .list(filter.genre.as_deref(), filter.channel.as_deref())
        .await?;

    Ok(schedule::select_programs(programs, filter, today))
}

/// Get program by ID
pub async fn get_program(pool: &PgPool, program_id: Uuid) -> Result<Program> {
    let repo = ProgramRepository::new(pool);
    repo.find_by_id(program_id).await
}

/// Create a new program
pub async fn create_program(pool: &PgPool, request: &CreateProgramRequest) -> Result<Program> {
    let repo = ProgramRepository::new(pool);
    repo.create(request).await
}

/// Update a program
pub async fn update_program(
    pool: &PgPool,
    program_id: Uuid,
    request: &UpdateProgramRequest,
) -> Result<Program> {
    let repo = ProgramRepository::new(pool);

    let existing = repo.find_by_id(program_id).await?;
    let program = repo.update(&existing, request).await?;

    // Toggling score prediction or the event flag changes how results score.
    if program.has_results() {
        rescoring::rescore_program(pool, program.program_id).await?;
    }

    Ok(program)
}

/// Delete a program and its predictions
pub async fn delete_program(pool: &PgPool, program_id: Uuid) -> Result<()> {
    let repo = ProgramRepository::new(pool);
    repo.delete(program_id).await
}

/// Record observed results and rescore the program's predictions
pub async fn set_program_results(
    pool: &PgPool,
    program_id: Uuid,
    request: &ProgramResultsRequest,
) -> Result<(Program, u64)> {
    rescoring::set_results_and_rescore(pool, program_id, request).await
}

/// Rescore every stored prediction
pub async fn rescore_all(pool: &PgPool) -> Result<u64> {
    rescoring::rescore_all(pool).await
}
