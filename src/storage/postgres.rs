//! PostgreSQL storage backend.
//!
//! Runtime-checked sqlx queries over the pool from
//! [`crate::config::database`]. Multi-row writes run inside a single
//! transaction so a failure mid-sequence leaves no partial state.

use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::auth::model::User;
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

use super::{
    CreatedProfile, ExamFieldUpdate, HomeworkFieldUpdate, LessonFieldUpdate, NewProfile, NewUser,
    Storage, StudentFieldUpdate, UserFieldUpdate,
};

#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Surface a unique-constraint violation as a domain conflict instead
/// of a 500.
fn conflict_on_unique(err: sqlx::Error, msg: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::conflict(msg);
        }
    }
    AppError::from(err)
}

#[async_trait::async_trait]
impl Storage for PgStorage {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user_with_profile(
        &self,
        user: NewUser,
        profile: NewProfile,
    ) -> Result<(User, CreatedProfile), AppError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, email, password, role",
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Email already exists"))?;

        let created_profile = match profile {
            NewProfile::Student {
                grade_id,
                class_id,
                parent_id,
            } => {
                let student = sqlx::query_as::<_, Student>(
                    "INSERT INTO students (id, user_id, grade_id, class_id, parent_id)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING id, user_id, grade_id, class_id, parent_id",
                )
                .bind(Uuid::new_v4())
                .bind(created.id)
                .bind(grade_id)
                .bind(class_id)
                .bind(parent_id)
                .fetch_one(&mut *tx)
                .await?;
                CreatedProfile::Student(student)
            }
            NewProfile::Teacher { assignments } => {
                let teacher = sqlx::query_as::<_, Teacher>(
                    "INSERT INTO teachers (id, user_id) VALUES ($1, $2) RETURNING id, user_id",
                )
                .bind(Uuid::new_v4())
                .bind(created.id)
                .fetch_one(&mut *tx)
                .await?;

                for assignment in &assignments {
                    sqlx::query(
                        "INSERT INTO teaching_assignments (id, teacher_id, subject_id, class_id)
                         VALUES ($1, $2, $3, $4)",
                    )
                    .bind(Uuid::new_v4())
                    .bind(teacher.id)
                    .bind(assignment.subject_id)
                    .bind(assignment.class_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| conflict_on_unique(e, "Assignment already exists"))?;
                }
                CreatedProfile::Teacher(teacher)
            }
            NewProfile::Parent => {
                let parent = sqlx::query_as::<_, Parent>(
                    "INSERT INTO parents (id, user_id) VALUES ($1, $2) RETURNING id, user_id",
                )
                .bind(Uuid::new_v4())
                .bind(created.id)
                .fetch_one(&mut *tx)
                .await?;
                CreatedProfile::Parent(parent)
            }
            NewProfile::Admin => CreatedProfile::Admin,
        };

        tx.commit().await?;
        Ok((created, created_profile))
    }

    async fn list_grades(&self) -> Result<Vec<Grade>, AppError> {
        let grades = sqlx::query_as::<_, Grade>("SELECT id, name FROM grades ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(grades)
    }

    async fn find_grade(&self, id: Uuid) -> Result<Option<Grade>, AppError> {
        let grade = sqlx::query_as::<_, Grade>("SELECT id, name FROM grades WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(grade)
    }

    async fn create_grade(&self, name: &str) -> Result<Grade, AppError> {
        let grade = sqlx::query_as::<_, Grade>(
            "INSERT INTO grades (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(grade)
    }

    async fn update_grade(&self, id: Uuid, name: &str) -> Result<Option<Grade>, AppError> {
        let grade = sqlx::query_as::<_, Grade>(
            "UPDATE grades SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(grade)
    }

    async fn delete_grade(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_classes(&self, grade_id: Option<Uuid>) -> Result<Vec<Class>, AppError> {
        let classes = sqlx::query_as::<_, Class>(
            "SELECT id, name, grade_id FROM classes
             WHERE ($1::uuid IS NULL OR grade_id = $1)
             ORDER BY grade_id, name",
        )
        .bind(grade_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(classes)
    }

    async fn find_class(&self, id: Uuid) -> Result<Option<Class>, AppError> {
        let class = sqlx::query_as::<_, Class>(
            "SELECT id, name, grade_id FROM classes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(class)
    }

    async fn create_class(&self, name: &str, grade_id: Uuid) -> Result<Class, AppError> {
        let class = sqlx::query_as::<_, Class>(
            "INSERT INTO classes (id, name, grade_id) VALUES ($1, $2, $3)
             RETURNING id, name, grade_id",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(grade_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(class)
    }

    async fn update_class(
        &self,
        id: Uuid,
        name: Option<&str>,
        grade_id: Option<Uuid>,
    ) -> Result<Option<Class>, AppError> {
        let class = sqlx::query_as::<_, Class>(
            "UPDATE classes
             SET name = COALESCE($2, name), grade_id = COALESCE($3, grade_id)
             WHERE id = $1
             RETURNING id, name, grade_id",
        )
        .bind(id)
        .bind(name)
        .bind(grade_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(class)
    }

    async fn delete_class(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, AppError> {
        let subjects = sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(subjects)
    }

    async fn find_subject(&self, id: Uuid) -> Result<Option<Subject>, AppError> {
        let subject = sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(subject)
    }

    async fn create_subject(&self, name: &str) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(subject)
    }

    async fn update_subject(&self, id: Uuid, name: &str) -> Result<Option<Subject>, AppError> {
        let subject = sqlx::query_as::<_, Subject>(
            "UPDATE subjects SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(subject)
    }

    async fn delete_subject(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_subjects_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<Subject>, AppError> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT DISTINCT s.id, s.name FROM subjects s
             JOIN teaching_assignments ta ON ta.subject_id = s.id
             WHERE ta.teacher_id = $1
             ORDER BY s.name",
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(subjects)
    }

    async fn list_teachers(&self) -> Result<Vec<Teacher>, AppError> {
        let teachers =
            sqlx::query_as::<_, Teacher>("SELECT id, user_id FROM teachers ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(teachers)
    }

    async fn find_teacher(&self, id: Uuid) -> Result<Option<Teacher>, AppError> {
        let teacher =
            sqlx::query_as::<_, Teacher>("SELECT id, user_id FROM teachers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(teacher)
    }

    async fn find_teacher_by_user(&self, user_id: Uuid) -> Result<Option<Teacher>, AppError> {
        let teacher =
            sqlx::query_as::<_, Teacher>("SELECT id, user_id FROM teachers WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(teacher)
    }

    async fn list_assignments_for_teacher(
        &self,
        teacher_id: Uuid,
    ) -> Result<Vec<TeachingAssignment>, AppError> {
        let assignments = sqlx::query_as::<_, TeachingAssignment>(
            "SELECT id, teacher_id, subject_id, class_id FROM teaching_assignments
             WHERE teacher_id = $1",
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }

    async fn list_assignments_for_subject(
        &self,
        teacher_id: Uuid,
        subject_id: Uuid,
        class_id: Option<Uuid>,
    ) -> Result<Vec<TeachingAssignment>, AppError> {
        let assignments = sqlx::query_as::<_, TeachingAssignment>(
            "SELECT id, teacher_id, subject_id, class_id FROM teaching_assignments
             WHERE teacher_id = $1 AND subject_id = $2
               AND ($3::uuid IS NULL OR class_id = $3)",
        )
        .bind(teacher_id)
        .bind(subject_id)
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }

    async fn update_teacher(
        &self,
        teacher_id: Uuid,
        user: UserFieldUpdate,
        assignments: Option<Vec<AssignmentInput>>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Uuid =
            sqlx::query_scalar("SELECT user_id FROM teachers WHERE id = $1")
                .bind(teacher_id)
                .fetch_one(&mut *tx)
                .await?;

        if !user.is_empty() {
            sqlx::query(
                "UPDATE users
                 SET name = COALESCE($2, name),
                     email = COALESCE($3, email),
                     password = COALESCE($4, password)
                 WHERE id = $1",
            )
            .bind(user_id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "Email already exists"))?;
        }

        if let Some(assignments) = assignments {
            sqlx::query("DELETE FROM teaching_assignments WHERE teacher_id = $1")
                .bind(teacher_id)
                .execute(&mut *tx)
                .await?;

            for assignment in &assignments {
                sqlx::query(
                    "INSERT INTO teaching_assignments (id, teacher_id, subject_id, class_id)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(Uuid::new_v4())
                .bind(teacher_id)
                .bind(assignment.subject_id)
                .bind(assignment.class_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| conflict_on_unique(e, "Assignment already exists"))?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_teacher_cascade(&self, teacher_id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM teachers WHERE id = $1")
                .bind(teacher_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(user_id) = user_id else {
            return Ok(false);
        };

        sqlx::query(
            "DELETE FROM submissions
             WHERE homework_id IN (SELECT id FROM homework WHERE teacher_id = $1)",
        )
        .bind(teacher_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "DELETE FROM exam_attempts
             WHERE exam_id IN (SELECT id FROM exams WHERE teacher_id = $1)",
        )
        .bind(teacher_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM homework WHERE teacher_id = $1")
            .bind(teacher_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM exams WHERE teacher_id = $1")
            .bind(teacher_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM teaching_assignments WHERE teacher_id = $1")
            .bind(teacher_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(teacher_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT id, user_id, grade_id, class_id, parent_id FROM students ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    async fn find_student(&self, id: Uuid) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT id, user_id, grade_id, class_id, parent_id FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn find_student_by_user(&self, user_id: Uuid) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT id, user_id, grade_id, class_id, parent_id FROM students WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn update_student(
        &self,
        student_id: Uuid,
        user: UserFieldUpdate,
        student: StudentFieldUpdate,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Uuid =
            sqlx::query_scalar("SELECT user_id FROM students WHERE id = $1")
                .bind(student_id)
                .fetch_one(&mut *tx)
                .await?;

        if !user.is_empty() {
            sqlx::query(
                "UPDATE users
                 SET name = COALESCE($2, name),
                     email = COALESCE($3, email),
                     password = COALESCE($4, password)
                 WHERE id = $1",
            )
            .bind(user_id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "Email already exists"))?;
        }

        if !student.is_empty() {
            // The CASE pair lets "detach parent" (explicit null) pass
            // through while an omitted field leaves the column alone.
            let (touch_parent, parent_id) = match student.parent_id {
                Some(value) => (true, value),
                None => (false, None),
            };
            sqlx::query(
                "UPDATE students
                 SET grade_id = COALESCE($2, grade_id),
                     class_id = COALESCE($3, class_id),
                     parent_id = CASE WHEN $4 THEN $5 ELSE parent_id END
                 WHERE id = $1",
            )
            .bind(student_id)
            .bind(student.grade_id)
            .bind(student.class_id)
            .bind(touch_parent)
            .bind(parent_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_student_cascade(&self, student_id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM students WHERE id = $1")
                .bind(student_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(user_id) = user_id else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM submissions WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM exam_attempts WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn list_parents(&self) -> Result<Vec<Parent>, AppError> {
        let parents = sqlx::query_as::<_, Parent>("SELECT id, user_id FROM parents ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(parents)
    }

    async fn find_parent(&self, id: Uuid) -> Result<Option<Parent>, AppError> {
        let parent = sqlx::query_as::<_, Parent>("SELECT id, user_id FROM parents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(parent)
    }

    async fn delete_parent_cascade(&self, parent_id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM parents WHERE id = $1")
                .bind(parent_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(user_id) = user_id else {
            return Ok(false);
        };

        sqlx::query("UPDATE students SET parent_id = NULL WHERE parent_id = $1")
            .bind(parent_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM parents WHERE id = $1")
            .bind(parent_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn list_lessons(&self, subject_id: Option<Uuid>) -> Result<Vec<Lesson>, AppError> {
        let lessons = sqlx::query_as::<_, Lesson>(
            "SELECT id, title, content, subject_id, class_id, order_index FROM lessons
             WHERE ($1::uuid IS NULL OR subject_id = $1)
             ORDER BY subject_id, order_index",
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lessons)
    }

    async fn list_lessons_for_teacher(
        &self,
        teacher_id: Uuid,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<Lesson>, AppError> {
        let lessons = sqlx::query_as::<_, Lesson>(
            "SELECT l.id, l.title, l.content, l.subject_id, l.class_id, l.order_index
             FROM lessons l
             JOIN teaching_assignments ta
               ON ta.subject_id = l.subject_id AND ta.class_id = l.class_id
             WHERE ta.teacher_id = $1
               AND ($2::uuid IS NULL OR l.subject_id = $2)
             ORDER BY l.subject_id, l.order_index",
        )
        .bind(teacher_id)
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lessons)
    }

    async fn find_lesson(&self, id: Uuid) -> Result<Option<Lesson>, AppError> {
        let lesson = sqlx::query_as::<_, Lesson>(
            "SELECT id, title, content, subject_id, class_id, order_index
             FROM lessons WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lesson)
    }

    async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson, AppError> {
        let lesson = sqlx::query_as::<_, Lesson>(
            "INSERT INTO lessons (id, title, content, subject_id, class_id, order_index)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, title, content, subject_id, class_id, order_index",
        )
        .bind(Uuid::new_v4())
        .bind(&lesson.title)
        .bind(&lesson.content)
        .bind(lesson.subject_id)
        .bind(lesson.class_id)
        .bind(lesson.order_index)
        .fetch_one(&self.pool)
        .await?;
        Ok(lesson)
    }

    async fn update_lesson(
        &self,
        id: Uuid,
        fields: LessonFieldUpdate,
    ) -> Result<Option<Lesson>, AppError> {
        let lesson = sqlx::query_as::<_, Lesson>(
            "UPDATE lessons
             SET title = COALESCE($2, title),
                 content = COALESCE($3, content),
                 order_index = COALESCE($4, order_index)
             WHERE id = $1
             RETURNING id, title, content, subject_id, class_id, order_index",
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(fields.order_index)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lesson)
    }

    async fn delete_lesson(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_homework(&self) -> Result<Vec<Homework>, AppError> {
        let homework = sqlx::query_as::<_, Homework>(
            "SELECT id, title, description, due_date, subject_id, teacher_id, class_id
             FROM homework ORDER BY due_date",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(homework)
    }

    async fn list_homework_for_teacher(
        &self,
        teacher_id: Uuid,
    ) -> Result<Vec<Homework>, AppError> {
        let homework = sqlx::query_as::<_, Homework>(
            "SELECT id, title, description, due_date, subject_id, teacher_id, class_id
             FROM homework WHERE teacher_id = $1 ORDER BY due_date",
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(homework)
    }

    async fn find_homework(&self, id: Uuid) -> Result<Option<Homework>, AppError> {
        let homework = sqlx::query_as::<_, Homework>(
            "SELECT id, title, description, due_date, subject_id, teacher_id, class_id
             FROM homework WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(homework)
    }

    async fn create_homework(&self, homework: NewHomework) -> Result<Homework, AppError> {
        let homework = sqlx::query_as::<_, Homework>(
            "INSERT INTO homework
                 (id, title, description, due_date, subject_id, teacher_id, class_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, title, description, due_date, subject_id, teacher_id, class_id",
        )
        .bind(Uuid::new_v4())
        .bind(&homework.title)
        .bind(&homework.description)
        .bind(homework.due_date)
        .bind(homework.subject_id)
        .bind(homework.teacher_id)
        .bind(homework.class_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(homework)
    }

    async fn update_homework(
        &self,
        id: Uuid,
        fields: HomeworkFieldUpdate,
    ) -> Result<Option<Homework>, AppError> {
        let homework = sqlx::query_as::<_, Homework>(
            "UPDATE homework
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 due_date = COALESCE($4, due_date)
             WHERE id = $1
             RETURNING id, title, description, due_date, subject_id, teacher_id, class_id",
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.due_date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(homework)
    }

    async fn delete_homework_cascade(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM submissions WHERE homework_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM homework WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_submission(
        &self,
        homework_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Submission>, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            "SELECT id, homework_id, student_id, content, status, created_at
             FROM submissions WHERE homework_id = $1 AND student_id = $2",
        )
        .bind(homework_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(submission)
    }

    async fn list_submissions_for_student(
        &self,
        student_id: Uuid,
        homework_id: Option<Uuid>,
    ) -> Result<Vec<Submission>, AppError> {
        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT id, homework_id, student_id, content, status, created_at
             FROM submissions
             WHERE student_id = $1 AND ($2::uuid IS NULL OR homework_id = $2)
             ORDER BY created_at DESC",
        )
        .bind(student_id)
        .bind(homework_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(submissions)
    }

    async fn list_submissions_for_homework(
        &self,
        homework_id: Uuid,
    ) -> Result<Vec<Submission>, AppError> {
        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT id, homework_id, student_id, content, status, created_at
             FROM submissions WHERE homework_id = $1 ORDER BY created_at DESC",
        )
        .bind(homework_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(submissions)
    }

    async fn create_submission(
        &self,
        homework_id: Uuid,
        student_id: Uuid,
        content: String,
    ) -> Result<Submission, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            "INSERT INTO submissions (id, homework_id, student_id, content, status)
             VALUES ($1, $2, $3, $4, 'SUBMITTED')
             RETURNING id, homework_id, student_id, content, status, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(homework_id)
        .bind(student_id)
        .bind(&content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "You already submitted this homework"))?;
        Ok(submission)
    }

    async fn list_exams(&self) -> Result<Vec<Exam>, AppError> {
        let exams = sqlx::query_as::<_, Exam>(
            "SELECT id, title, description, duration_minutes, due_date,
                    subject_id, teacher_id, class_id
             FROM exams ORDER BY due_date",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(exams)
    }

    async fn list_exams_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<Exam>, AppError> {
        let exams = sqlx::query_as::<_, Exam>(
            "SELECT id, title, description, duration_minutes, due_date,
                    subject_id, teacher_id, class_id
             FROM exams WHERE teacher_id = $1 ORDER BY due_date",
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(exams)
    }

    async fn find_exam(&self, id: Uuid) -> Result<Option<Exam>, AppError> {
        let exam = sqlx::query_as::<_, Exam>(
            "SELECT id, title, description, duration_minutes, due_date,
                    subject_id, teacher_id, class_id
             FROM exams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(exam)
    }

    async fn create_exam(&self, exam: NewExam) -> Result<Exam, AppError> {
        let exam = sqlx::query_as::<_, Exam>(
            "INSERT INTO exams
                 (id, title, description, duration_minutes, due_date,
                  subject_id, teacher_id, class_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, title, description, duration_minutes, due_date,
                       subject_id, teacher_id, class_id",
        )
        .bind(Uuid::new_v4())
        .bind(&exam.title)
        .bind(&exam.description)
        .bind(exam.duration_minutes)
        .bind(exam.due_date)
        .bind(exam.subject_id)
        .bind(exam.teacher_id)
        .bind(exam.class_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exam)
    }

    async fn update_exam(
        &self,
        id: Uuid,
        fields: ExamFieldUpdate,
    ) -> Result<Option<Exam>, AppError> {
        let exam = sqlx::query_as::<_, Exam>(
            "UPDATE exams
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 duration_minutes = COALESCE($4, duration_minutes),
                 due_date = COALESCE($5, due_date)
             WHERE id = $1
             RETURNING id, title, description, duration_minutes, due_date,
                       subject_id, teacher_id, class_id",
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.duration_minutes)
        .bind(fields.due_date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(exam)
    }

    async fn delete_exam_cascade(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM exam_attempts WHERE exam_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_attempt(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<ExamAttempt>, AppError> {
        let attempt = sqlx::query_as::<_, ExamAttempt>(
            "SELECT id, exam_id, student_id, answers, score, status, submitted_at
             FROM exam_attempts WHERE exam_id = $1 AND student_id = $2",
        )
        .bind(exam_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(attempt)
    }

    async fn list_attempts_for_exam(&self, exam_id: Uuid) -> Result<Vec<ExamAttempt>, AppError> {
        let attempts = sqlx::query_as::<_, ExamAttempt>(
            "SELECT id, exam_id, student_id, answers, score, status, submitted_at
             FROM exam_attempts WHERE exam_id = $1",
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attempts)
    }

    async fn upsert_attempt(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        answers: Option<String>,
    ) -> Result<ExamAttempt, AppError> {
        // A resubmission keeps earlier answers when the new body omits
        // them, mirroring the create-or-update semantics on the unique
        // (exam_id, student_id) pair.
        let attempt = sqlx::query_as::<_, ExamAttempt>(
            "INSERT INTO exam_attempts
                 (id, exam_id, student_id, answers, status, submitted_at)
             VALUES ($1, $2, $3, $4, 'SUBMITTED', NOW())
             ON CONFLICT (exam_id, student_id) DO UPDATE
             SET answers = COALESCE($4, exam_attempts.answers),
                 status = 'SUBMITTED',
                 submitted_at = NOW()
             RETURNING id, exam_id, student_id, answers, score, status, submitted_at",
        )
        .bind(Uuid::new_v4())
        .bind(exam_id)
        .bind(student_id)
        .bind(&answers)
        .fetch_one(&self.pool)
        .await?;
        Ok(attempt)
    }
}
