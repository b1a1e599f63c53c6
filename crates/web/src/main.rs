use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod cache;
mod config;
mod error;
mod features;
mod listener;
mod middleware;
mod state;

use cache::LeaderboardCache;
use config::Config;
use features::{leaderboard, predictions, profiles, programs, scoring};
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        programs::handlers::list_programs,
        programs::handlers::get_program,
        programs::handlers::create_program,
        programs::handlers::update_program,
        programs::handlers::delete_program,
        programs::handlers::set_program_results,
        programs::handlers::recompute_all_scores,
        predictions::handlers::submit_prediction,
        predictions::handlers::get_user_predictions,
        leaderboard::handlers::get_leaderboard,
        leaderboard::handlers::get_leaderboard_trend,
        leaderboard::handlers::get_leaderboard_stats,
        profiles::handlers::create_profile,
        profiles::handlers::get_profile,
        scoring::handlers::preview_score,
    ),
    components(
        schemas(
            storage::dto::program::CreateProgramRequest,
            storage::dto::program::UpdateProgramRequest,
            storage::dto::program::ProgramResultsRequest,
            storage::dto::program::RescoreResponse,
            storage::dto::prediction::CreatePredictionRequest,
            storage::dto::prediction::ScoredPredictionResponse,
            storage::dto::prediction::UserPredictionsResponse,
            storage::dto::prediction::ScorePreviewRequest,
            storage::dto::profile::CreateProfileRequest,
            storage::dto::leaderboard::TimeWindow,
            storage::dto::leaderboard::LeaderboardView,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::leaderboard::Trend,
            storage::dto::leaderboard::PreviousRank,
            storage::dto::leaderboard::TrendRequest,
            storage::dto::leaderboard::LeaderboardStats,
            storage::dto::common::PaginationMeta,
            storage::services::scoring::ScoreBreakdown,
            storage::services::scoring::MatchOutcome,
            storage::services::leaderboard::ScoreSummary,
            storage::models::Program,
            storage::models::Prediction,
            storage::models::Profile,
        )
    ),
    tags(
        (name = "programs", description = "TV program schedule and results"),
        (name = "predictions", description = "Audience predictions"),
        (name = "leaderboard", description = "Player rankings"),
        (name = "profiles", description = "Player profiles"),
        (name = "scoring", description = "Scoring rules"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

fn api_routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .nest("/programs", programs::routes::routes(api_keys.clone()))
        .nest("/predictions", predictions::routes::routes(api_keys.clone()))
        .nest("/users", predictions::routes::user_routes())
        .nest("/leaderboard", leaderboard::routes::routes())
        .nest("/profiles", profiles::routes::routes(api_keys.clone()))
        .nest("/scoring", scoring::routes::routes())
        .nest("/admin/scores", programs::routes::admin_routes(api_keys))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting audience prediction API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::with_max_connections(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("No API keys configured, protected endpoints will reject every request");
    }

    let cache = Arc::new(LeaderboardCache::new());
    tokio::spawn(listener::run(db.pool().clone(), Arc::clone(&cache)));

    let state = AppState {
        db,
        cache,
        rules: config.rules,
        utc_offset: config.utc_offset,
    };

    let app = Router::new()
        .nest("/api", api_routes(api_keys))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
