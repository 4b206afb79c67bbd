use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::classes::controller::{
    create_class, delete_class, get_class, get_classes, update_class,
};
use crate::state::AppState;

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class).get(get_classes))
        .route(
            "/{id}",
            get(get_class).patch(update_class).delete(delete_class),
        )
}
