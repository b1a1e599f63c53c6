use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    create_program, delete_program, get_program, list_programs, recompute_all_scores,
    set_program_results, update_program,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_program))
        .route("/:program_id", put(update_program).delete(delete_program))
        .route("/:program_id/results", put(set_program_results))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_programs))
        .route("/:program_id", get(get_program))
        .merge(protected)
}

pub fn admin_routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/recompute-all", post(recompute_all_scores))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
