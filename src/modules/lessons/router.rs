use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::lessons::controller::{
    create_lesson, delete_lesson, get_student_lesson, get_student_lessons, get_teacher_lesson,
    get_teacher_lessons, update_lesson,
};
use crate::state::AppState;

pub fn init_teacher_lessons_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_lesson).get(get_teacher_lessons))
        .route(
            "/{id}",
            get(get_teacher_lesson)
                .patch(update_lesson)
                .delete(delete_lesson),
        )
}

pub fn init_student_lessons_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_student_lessons))
        .route("/{id}", get(get_student_lesson))
}
