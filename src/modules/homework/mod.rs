pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{
    init_student_homework_router, init_student_submissions_router, init_teacher_homework_router,
};
