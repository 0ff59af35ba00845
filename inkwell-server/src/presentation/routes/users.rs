use axum::Router;
use axum::middleware;
use axum::routing::{get, put};

use crate::presentation::AppState;
use crate::presentation::handlers::users::{get_profile, list_bookmarks, update_profile};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/{id}", get(get_profile));

    let protected = Router::new()
        .route("/bookmarks", get(list_bookmarks))
        .route("/profile", put(update_profile))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
