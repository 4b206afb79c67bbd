pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_student_lessons_router, init_teacher_lessons_router};
