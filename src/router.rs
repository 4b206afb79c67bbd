use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::{require_admin, require_student, require_teacher};
use crate::modules::auth::router::init_auth_router;
use crate::modules::classes::router::init_classes_router;
use crate::modules::exams::router::{init_student_exams_router, init_teacher_exams_router};
use crate::modules::grades::router::init_grades_router;
use crate::modules::homework::router::{
    init_student_homework_router, init_student_submissions_router, init_teacher_homework_router,
};
use crate::modules::lessons::router::{
    init_student_lessons_router, init_teacher_lessons_router,
};
use crate::modules::parents::router::init_parents_router;
use crate::modules::students::router::init_students_router;
use crate::modules::subjects::router::{init_subjects_router, init_teacher_subjects_router};
use crate::modules::teachers::router::init_teachers_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .nest("/grades", init_grades_router())
        .nest("/classes", init_classes_router())
        .nest("/subjects", init_subjects_router())
        .nest("/teachers", init_teachers_router())
        .nest("/students", init_students_router())
        .nest("/parents", init_parents_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let teacher_routes = Router::new()
        .nest("/subjects", init_teacher_subjects_router())
        .nest("/lessons", init_teacher_lessons_router())
        .nest("/homework", init_teacher_homework_router())
        .nest("/exams", init_teacher_exams_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_teacher,
        ));

    let student_routes = Router::new()
        .nest("/lessons", init_student_lessons_router())
        .nest("/homework", init_student_homework_router())
        .nest("/submissions", init_student_submissions_router())
        .nest("/exams", init_student_exams_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_student,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/admin", admin_routes)
                .nest("/teacher", teacher_routes)
                .nest("/student", student_routes),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
