pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_subjects_router, init_teacher_subjects_router};
