use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::exams::controller::{
    create_exam, delete_exam, get_student_exam, get_student_exams, get_teacher_exam,
    get_teacher_exams, submit_attempt, update_exam,
};
use crate::state::AppState;

pub fn init_teacher_exams_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_exam).get(get_teacher_exams))
        .route(
            "/{id}",
            get(get_teacher_exam).patch(update_exam).delete(delete_exam),
        )
}

pub fn init_student_exams_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_student_exams).post(submit_attempt))
        .route("/{id}", get(get_student_exam))
}
