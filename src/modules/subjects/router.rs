use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::subjects::controller::{
    create_subject, delete_subject, get_my_subjects, get_subject, get_subjects, update_subject,
};
use crate::state::AppState;

pub fn init_subjects_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subject).get(get_subjects))
        .route(
            "/{id}",
            get(get_subject).patch(update_subject).delete(delete_subject),
        )
}

/// Mounted under the teacher tree; lists the current teacher's own
/// subjects.
pub fn init_teacher_subjects_router() -> Router<AppState> {
    Router::new().route("/", get(get_my_subjects))
}
