use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{create_profile, get_profile};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_profile))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:profile_id", get(get_profile))
        .merge(protected)
}
