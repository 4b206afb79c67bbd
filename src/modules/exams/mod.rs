pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_student_exams_router, init_teacher_exams_router};
