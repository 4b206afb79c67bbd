//! # Slateboard API
//!
//! A role-scoped school-management REST API built with Rust, Axum, and
//! PostgreSQL. Four exact-match roles (admin, teacher, student,
//! parent) gate a CRUD surface over grades, classes, subjects,
//! teaching assignments, lessons, homework and exams, with a
//! relational-integrity layer in front of every mutating operation.
//!
//! ## Architecture
//!
//! The codebase follows a modular structure:
//!
//! ```text
//! src/
//! ├── config/           # Env-driven configuration (database, JWT, CORS)
//! ├── middleware/       # Auth extractor, role gate, ownership scopes
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Signup and login
//! │   ├── grades/      # Grades (admin)
//! │   ├── classes/     # Classes under grades (admin)
//! │   ├── subjects/    # Subjects (admin) + teacher's own subjects
//! │   ├── teachers/    # Teacher accounts and assignments (admin)
//! │   ├── students/    # Student accounts and placement (admin)
//! │   ├── parents/     # Parent accounts (admin)
//! │   ├── lessons/     # Lessons (teacher-owned, student-readable)
//! │   ├── homework/    # Homework and submissions
//! │   └── exams/       # Exams and attempts
//! ├── storage/          # Storage trait + Postgres and in-memory backends
//! └── utils/            # Errors, JWT, password hashing
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Business logic
//! - `model.rs`: Entities and DTOs
//! - `router.rs`: Axum router configuration
//!
//! ## Authorization model
//!
//! Every request resolves its principal by verifying the bearer token
//! and re-reading the user from storage, so the role in a stale token
//! never wins. Role checks are exact-match with no hierarchy; an admin
//! is rejected from teacher-gated routes. Teacher- and student-owned
//! rows are scoped through the profile id derived from the session,
//! and cross-tenant access reads as 404.
//!
//! ## Relational integrity
//!
//! All reference checks run before any write: classes must belong to
//! their grade, emails are unique, a teacher's lesson/homework/exam
//! must fall under one of their teaching assignments (ambiguous
//! subject-only requests are rejected rather than guessed), and
//! multi-row writes are transactional end to end.

pub mod config;
pub mod docs;
pub mod integrity;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod storage;
pub mod utils;
pub mod validator;
