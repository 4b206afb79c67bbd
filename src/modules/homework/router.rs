use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::homework::controller::{
    create_homework, delete_homework, get_my_submissions, get_student_homework,
    get_teacher_homework, get_teacher_homework_by_id, submit_homework, update_homework,
};
use crate::state::AppState;

pub fn init_teacher_homework_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_homework).get(get_teacher_homework))
        .route(
            "/{id}",
            get(get_teacher_homework_by_id)
                .patch(update_homework)
                .delete(delete_homework),
        )
}

pub fn init_student_homework_router() -> Router<AppState> {
    Router::new().route("/", get(get_student_homework).post(submit_homework))
}

pub fn init_student_submissions_router() -> Router<AppState> {
    Router::new().route("/", get(get_my_submissions))
}
