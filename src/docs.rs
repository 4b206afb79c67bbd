use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginDto, LoginResponse, PublicUser, SignupDto, SignupResponse, UserRole,
};
use crate::modules::classes::model::{Class, CreateClassDto, UpdateClassDto};
use crate::modules::exams::model::{
    AttemptStatus, CreateExamDto, Exam, ExamAttempt, ExamDetail, ExamListItem, SubmitAttemptDto,
    UpdateExamDto,
};
use crate::modules::grades::model::{CreateGradeDto, Grade, UpdateGradeDto};
use crate::modules::homework::model::{
    CreateHomeworkDto, CreateSubmissionDto, Homework, HomeworkDetail, HomeworkListItem,
    Submission, SubmissionStatus, SubmissionWithStudent, UpdateHomeworkDto,
};
use crate::modules::lessons::model::{CreateLessonDto, Lesson, UpdateLessonDto};
use crate::modules::parents::model::{CreateParentDto, Parent, ParentDetail};
use crate::modules::students::model::{CreateStudentDto, Student, StudentDetail, UpdateStudentDto};
use crate::modules::subjects::model::{CreateSubjectDto, Subject, UpdateSubjectDto};
use crate::modules::teachers::model::{
    AssignmentDetail, AssignmentInput, CreateTeacherDto, Teacher, TeacherDetail,
    TeachingAssignment, UpdateTeacherDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::signup,
        crate::modules::auth::controller::login,
        crate::modules::grades::controller::get_grades,
        crate::modules::grades::controller::get_grade,
        crate::modules::grades::controller::create_grade,
        crate::modules::grades::controller::update_grade,
        crate::modules::grades::controller::delete_grade,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_my_subjects,
        crate::modules::subjects::controller::get_subject,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::update_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::parents::controller::get_parents,
        crate::modules::parents::controller::get_parent,
        crate::modules::parents::controller::create_parent,
        crate::modules::parents::controller::delete_parent,
        crate::modules::lessons::controller::get_teacher_lessons,
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::get_teacher_lesson,
        crate::modules::lessons::controller::update_lesson,
        crate::modules::lessons::controller::delete_lesson,
        crate::modules::lessons::controller::get_student_lessons,
        crate::modules::lessons::controller::get_student_lesson,
        crate::modules::homework::controller::get_teacher_homework,
        crate::modules::homework::controller::create_homework,
        crate::modules::homework::controller::get_teacher_homework_by_id,
        crate::modules::homework::controller::update_homework,
        crate::modules::homework::controller::delete_homework,
        crate::modules::homework::controller::get_student_homework,
        crate::modules::homework::controller::submit_homework,
        crate::modules::homework::controller::get_my_submissions,
        crate::modules::exams::controller::get_teacher_exams,
        crate::modules::exams::controller::create_exam,
        crate::modules::exams::controller::get_teacher_exam,
        crate::modules::exams::controller::update_exam,
        crate::modules::exams::controller::delete_exam,
        crate::modules::exams::controller::get_student_exams,
        crate::modules::exams::controller::get_student_exam,
        crate::modules::exams::controller::submit_attempt,
    ),
    components(
        schemas(
            ErrorResponse,
            UserRole,
            PublicUser,
            SignupDto,
            SignupResponse,
            LoginDto,
            LoginResponse,
            Grade,
            CreateGradeDto,
            UpdateGradeDto,
            Class,
            CreateClassDto,
            UpdateClassDto,
            Subject,
            CreateSubjectDto,
            UpdateSubjectDto,
            Teacher,
            TeachingAssignment,
            AssignmentInput,
            AssignmentDetail,
            TeacherDetail,
            CreateTeacherDto,
            UpdateTeacherDto,
            Student,
            StudentDetail,
            CreateStudentDto,
            UpdateStudentDto,
            Parent,
            ParentDetail,
            CreateParentDto,
            Lesson,
            CreateLessonDto,
            UpdateLessonDto,
            Homework,
            HomeworkDetail,
            HomeworkListItem,
            CreateHomeworkDto,
            UpdateHomeworkDto,
            Submission,
            SubmissionStatus,
            SubmissionWithStudent,
            CreateSubmissionDto,
            Exam,
            ExamDetail,
            ExamListItem,
            CreateExamDto,
            UpdateExamDto,
            ExamAttempt,
            AttemptStatus,
            SubmitAttemptDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Signup and login"),
        (name = "Grades", description = "Grade management"),
        (name = "Classes", description = "Class management"),
        (name = "Subjects", description = "Subject management"),
        (name = "Teachers", description = "Teacher management"),
        (name = "Students", description = "Student management"),
        (name = "Parents", description = "Parent management"),
        (name = "Lessons", description = "Lesson management"),
        (name = "Homework", description = "Homework and submissions"),
        (name = "Exams", description = "Exams and attempts")
    ),
    info(
        title = "Slateboard API",
        version = "0.1.0",
        description = "Role-scoped school management REST API built with Rust, Axum, and PostgreSQL.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
