pub mod auth;
pub mod classes;
pub mod exams;
pub mod grades;
pub mod homework;
pub mod lessons;
pub mod parents;
pub mod students;
pub mod subjects;
pub mod teachers;
