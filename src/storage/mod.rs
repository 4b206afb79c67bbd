//! Persistence collaborator.
//!
//! Handlers and validators talk to a [`Storage`] trait object rather
//! than a concrete database, so the whole validation layer can be
//! exercised in tests without Postgres. Multi-row writes that must not
//! partially apply (user+profile creation, user+profile updates,
//! assignment replacement, cascading deletes, attempt upserts) are
//! dedicated trait methods so each backend can draw its own atomic
//! boundary around them.

use uuid::Uuid;

use crate::modules::auth::model::{User, UserRole};
use crate::modules::classes::model::Class;
use crate::modules::exams::model::{Exam, ExamAttempt, NewExam};
use crate::modules::grades::model::Grade;
use crate::modules::homework::model::{Homework, NewHomework, Submission};
use crate::modules::lessons::model::{Lesson, NewLesson};
use crate::modules::parents::model::Parent;
use crate::modules::students::model::Student;
use crate::modules::subjects::model::Subject;
use crate::modules::teachers::model::{AssignmentInput, Teacher, TeachingAssignment};
use crate::utils::errors::AppError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// Insert payload for a new user row. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Role profile created together with a user, in the same transaction.
/// Admins are the one role without a profile row.
#[derive(Debug, Clone)]
pub enum NewProfile {
    Student {
        grade_id: Option<Uuid>,
        class_id: Option<Uuid>,
        parent_id: Option<Uuid>,
    },
    Teacher {
        assignments: Vec<AssignmentInput>,
    },
    Parent,
    Admin,
}

#[derive(Debug, Clone)]
pub enum CreatedProfile {
    Student(Student),
    Teacher(Teacher),
    Parent(Parent),
    Admin,
}

/// Partial update of user columns. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserFieldUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserFieldUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

/// Partial update of student columns. The double option on `parent_id`
/// distinguishes "leave alone" from "detach".
#[derive(Debug, Clone, Default)]
pub struct StudentFieldUpdate {
    pub grade_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub parent_id: Option<Option<Uuid>>,
}

impl StudentFieldUpdate {
    pub fn is_empty(&self) -> bool {
        self.grade_id.is_none() && self.class_id.is_none() && self.parent_id.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LessonFieldUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct HomeworkFieldUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ExamFieldUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    // Users
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Creates the user row and its role profile atomically. A
    /// duplicate email surfaces as `Conflict`.
    async fn create_user_with_profile(
        &self,
        user: NewUser,
        profile: NewProfile,
    ) -> Result<(User, CreatedProfile), AppError>;

    // Grades
    async fn list_grades(&self) -> Result<Vec<Grade>, AppError>;
    async fn find_grade(&self, id: Uuid) -> Result<Option<Grade>, AppError>;
    async fn create_grade(&self, name: &str) -> Result<Grade, AppError>;
    async fn update_grade(&self, id: Uuid, name: &str) -> Result<Option<Grade>, AppError>;
    async fn delete_grade(&self, id: Uuid) -> Result<bool, AppError>;

    // Classes
    async fn list_classes(&self, grade_id: Option<Uuid>) -> Result<Vec<Class>, AppError>;
    async fn find_class(&self, id: Uuid) -> Result<Option<Class>, AppError>;
    async fn create_class(&self, name: &str, grade_id: Uuid) -> Result<Class, AppError>;
    async fn update_class(
        &self,
        id: Uuid,
        name: Option<&str>,
        grade_id: Option<Uuid>,
    ) -> Result<Option<Class>, AppError>;
    async fn delete_class(&self, id: Uuid) -> Result<bool, AppError>;

    // Subjects
    async fn list_subjects(&self) -> Result<Vec<Subject>, AppError>;
    async fn find_subject(&self, id: Uuid) -> Result<Option<Subject>, AppError>;
    async fn create_subject(&self, name: &str) -> Result<Subject, AppError>;
    async fn update_subject(&self, id: Uuid, name: &str) -> Result<Option<Subject>, AppError>;
    async fn delete_subject(&self, id: Uuid) -> Result<bool, AppError>;
    /// Distinct subjects covered by a teacher's assignments.
    async fn list_subjects_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<Subject>, AppError>;

    // Teachers & assignments
    async fn list_teachers(&self) -> Result<Vec<Teacher>, AppError>;
    async fn find_teacher(&self, id: Uuid) -> Result<Option<Teacher>, AppError>;
    async fn find_teacher_by_user(&self, user_id: Uuid) -> Result<Option<Teacher>, AppError>;
    async fn list_assignments_for_teacher(
        &self,
        teacher_id: Uuid,
    ) -> Result<Vec<TeachingAssignment>, AppError>;
    /// Assignments of one teacher for one subject, optionally narrowed
    /// to a class. The resolution logic in `integrity` builds on this.
    async fn list_assignments_for_subject(
        &self,
        teacher_id: Uuid,
        subject_id: Uuid,
        class_id: Option<Uuid>,
    ) -> Result<Vec<TeachingAssignment>, AppError>;
    /// Updates user columns and, when `assignments` is present,
    /// replaces the teacher's assignment set wholesale — all in one
    /// transaction.
    async fn update_teacher(
        &self,
        teacher_id: Uuid,
        user: UserFieldUpdate,
        assignments: Option<Vec<AssignmentInput>>,
    ) -> Result<(), AppError>;
    /// Removes assignments, homework and exams, then the teacher row,
    /// then the user row.
    async fn delete_teacher_cascade(&self, teacher_id: Uuid) -> Result<bool, AppError>;

    // Students
    async fn list_students(&self) -> Result<Vec<Student>, AppError>;
    async fn find_student(&self, id: Uuid) -> Result<Option<Student>, AppError>;
    async fn find_student_by_user(&self, user_id: Uuid) -> Result<Option<Student>, AppError>;
    /// Updates user and student columns in one transaction.
    async fn update_student(
        &self,
        student_id: Uuid,
        user: UserFieldUpdate,
        student: StudentFieldUpdate,
    ) -> Result<(), AppError>;
    /// Removes submissions and exam attempts, then the student row,
    /// then the user row.
    async fn delete_student_cascade(&self, student_id: Uuid) -> Result<bool, AppError>;

    // Parents
    async fn list_parents(&self) -> Result<Vec<Parent>, AppError>;
    async fn find_parent(&self, id: Uuid) -> Result<Option<Parent>, AppError>;
    /// Detaches students referencing this parent, then removes the
    /// parent row and its user row.
    async fn delete_parent_cascade(&self, parent_id: Uuid) -> Result<bool, AppError>;

    // Lessons
    async fn list_lessons(&self, subject_id: Option<Uuid>) -> Result<Vec<Lesson>, AppError>;
    /// Lessons under any of the teacher's (subject, class) assignments.
    async fn list_lessons_for_teacher(
        &self,
        teacher_id: Uuid,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<Lesson>, AppError>;
    async fn find_lesson(&self, id: Uuid) -> Result<Option<Lesson>, AppError>;
    async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson, AppError>;
    async fn update_lesson(
        &self,
        id: Uuid,
        fields: LessonFieldUpdate,
    ) -> Result<Option<Lesson>, AppError>;
    async fn delete_lesson(&self, id: Uuid) -> Result<bool, AppError>;

    // Homework
    async fn list_homework(&self) -> Result<Vec<Homework>, AppError>;
    async fn list_homework_for_teacher(&self, teacher_id: Uuid)
    -> Result<Vec<Homework>, AppError>;
    async fn find_homework(&self, id: Uuid) -> Result<Option<Homework>, AppError>;
    async fn create_homework(&self, homework: NewHomework) -> Result<Homework, AppError>;
    async fn update_homework(
        &self,
        id: Uuid,
        fields: HomeworkFieldUpdate,
    ) -> Result<Option<Homework>, AppError>;
    /// Removes the homework's submissions first, then the homework.
    async fn delete_homework_cascade(&self, id: Uuid) -> Result<bool, AppError>;

    // Submissions
    async fn find_submission(
        &self,
        homework_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Submission>, AppError>;
    async fn list_submissions_for_student(
        &self,
        student_id: Uuid,
        homework_id: Option<Uuid>,
    ) -> Result<Vec<Submission>, AppError>;
    async fn list_submissions_for_homework(
        &self,
        homework_id: Uuid,
    ) -> Result<Vec<Submission>, AppError>;
    /// A duplicate (homework, student) pair surfaces as `Conflict`.
    async fn create_submission(
        &self,
        homework_id: Uuid,
        student_id: Uuid,
        content: String,
    ) -> Result<Submission, AppError>;

    // Exams
    async fn list_exams(&self) -> Result<Vec<Exam>, AppError>;
    async fn list_exams_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<Exam>, AppError>;
    async fn find_exam(&self, id: Uuid) -> Result<Option<Exam>, AppError>;
    async fn create_exam(&self, exam: NewExam) -> Result<Exam, AppError>;
    async fn update_exam(&self, id: Uuid, fields: ExamFieldUpdate)
    -> Result<Option<Exam>, AppError>;
    /// Removes the exam's attempts first, then the exam.
    async fn delete_exam_cascade(&self, id: Uuid) -> Result<bool, AppError>;

    // Exam attempts
    async fn find_attempt(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<ExamAttempt>, AppError>;
    async fn list_attempts_for_exam(&self, exam_id: Uuid) -> Result<Vec<ExamAttempt>, AppError>;
    /// Creates the attempt on first submission, updates it in place on
    /// any later one; the (exam, student) row count never exceeds one.
    async fn upsert_attempt(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        answers: Option<String>,
    ) -> Result<ExamAttempt, AppError>;
}
