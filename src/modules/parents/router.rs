use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::parents::controller::{
    create_parent, delete_parent, get_parent, get_parents,
};
use crate::state::AppState;

pub fn init_parents_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_parent).get(get_parents))
        .route("/{id}", get(get_parent).delete(delete_parent))
}
