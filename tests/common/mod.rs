use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use slateboard::config::cors::CorsConfig;
use slateboard::config::jwt::JwtConfig;
use slateboard::modules::auth::model::{User, UserRole};
use slateboard::router::init_router;
use slateboard::state::AppState;
use slateboard::storage::{CreatedProfile, MemoryStorage, NewProfile, NewUser, Storage};
use slateboard::utils::jwt::create_access_token;

pub struct TestApp {
    pub app: Router,
    pub storage: Arc<MemoryStorage>,
    pub jwt_config: JwtConfig,
}

/// The real router over an in-memory storage backend, so requests run
/// the full middleware + validator + handler chain without Postgres.
pub fn test_app() -> TestApp {
    let storage = Arc::new(MemoryStorage::new());
    let jwt_config = JwtConfig {
        secret: "test-secret".to_string(),
        access_token_expiry: 3600,
    };
    let state = AppState {
        storage: storage.clone(),
        jwt_config: jwt_config.clone(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    };

    TestApp {
        app: init_router(state),
        storage,
        jwt_config,
    }
}

/// Low bcrypt cost keeps the suite fast.
fn test_hash(password: &str) -> String {
    bcrypt::hash(password, 4).unwrap()
}

#[allow(dead_code)]
pub async fn seed_user(
    app: &TestApp,
    email: &str,
    password: &str,
    role: UserRole,
) -> (User, CreatedProfile) {
    let profile = match role {
        UserRole::Admin => NewProfile::Admin,
        UserRole::Teacher => NewProfile::Teacher {
            assignments: vec![],
        },
        UserRole::Student => NewProfile::Student {
            grade_id: None,
            class_id: None,
            parent_id: None,
        },
        UserRole::Parent => NewProfile::Parent,
    };

    app.storage
        .create_user_with_profile(
            NewUser {
                name: Some("Test User".to_string()),
                email: email.to_string(),
                password_hash: test_hash(password),
                role,
            },
            profile,
        )
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn seed_admin(app: &TestApp) -> String {
    let (user, _) = seed_user(app, &unique_email("admin"), "password123", UserRole::Admin).await;
    token_for(app, &user)
}

#[allow(dead_code)]
pub fn token_for_parts(app: &TestApp, user_id: Uuid, email: &str) -> String {
    create_access_token(user_id, email, &app.jwt_config).unwrap()
}

#[allow(dead_code)]
pub async fn seed_teacher(app: &TestApp) -> (String, Uuid) {
    let (user, profile) = seed_user(
        app,
        &unique_email("teacher"),
        "password123",
        UserRole::Teacher,
    )
    .await;
    let teacher_id = match profile {
        CreatedProfile::Teacher(teacher) => teacher.id,
        _ => unreachable!(),
    };
    (token_for(app, &user), teacher_id)
}

#[allow(dead_code)]
pub async fn seed_student(app: &TestApp) -> (String, Uuid) {
    let (user, profile) = seed_user(
        app,
        &unique_email("student"),
        "password123",
        UserRole::Student,
    )
    .await;
    let student_id = match profile {
        CreatedProfile::Student(student) => student.id,
        _ => unreachable!(),
    };
    (token_for(app, &user), student_id)
}

#[allow(dead_code)]
pub fn token_for(app: &TestApp, user: &User) -> String {
    create_access_token(user.id, &user.email, &app.jwt_config).unwrap()
}

#[allow(dead_code)]
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@test.com", prefix, Uuid::new_v4())
}

/// Fire one request through the router and decode the JSON body (Null
/// when the body is empty or not JSON).
pub async fn request(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}
