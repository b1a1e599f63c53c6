use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{get_user_predictions, submit_prediction};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/", post(submit_prediction))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/:user_id/predictions", get(get_user_predictions))
}
