//! In-memory storage backend.
//!
//! Keeps every table in a map behind one mutex, so the composite
//! operations are atomic by construction. Backs the test suites; the
//! behavior (uniqueness conflicts, cascade order, upsert semantics)
//! mirrors the Postgres backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::modules::auth::model::User;
use crate::modules::classes::model::Class;
use crate::modules::exams::model::{AttemptStatus, Exam, ExamAttempt, NewExam};
use crate::modules::grades::model::Grade;
use crate::modules::homework::model::{Homework, NewHomework, Submission, SubmissionStatus};
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

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    grades: HashMap<Uuid, Grade>,
    classes: HashMap<Uuid, Class>,
    subjects: HashMap<Uuid, Subject>,
    teachers: HashMap<Uuid, Teacher>,
    parents: HashMap<Uuid, Parent>,
    students: HashMap<Uuid, Student>,
    assignments: HashMap<Uuid, TeachingAssignment>,
    lessons: HashMap<Uuid, Lesson>,
    homework: HashMap<Uuid, Homework>,
    submissions: HashMap<Uuid, Submission>,
    exams: HashMap<Uuid, Exam>,
    attempts: HashMap<Uuid, ExamAttempt>,
}

#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Rejecting duplicate pairs before any map is touched keeps the
/// composite writes all-or-nothing.
fn check_distinct_assignments(assignments: &[AssignmentInput]) -> Result<(), AppError> {
    for (i, a) in assignments.iter().enumerate() {
        let duplicate = assignments[..i]
            .iter()
            .any(|b| b.subject_id == a.subject_id && b.class_id == a.class_id);
        if duplicate {
            return Err(AppError::conflict("Assignment already exists"));
        }
    }
    Ok(())
}

impl Inner {
    fn insert_assignment(
        &mut self,
        teacher_id: Uuid,
        input: &AssignmentInput,
    ) -> Result<TeachingAssignment, AppError> {
        let duplicate = self.assignments.values().any(|a| {
            a.teacher_id == teacher_id
                && a.subject_id == input.subject_id
                && a.class_id == input.class_id
        });
        if duplicate {
            return Err(AppError::conflict("Assignment already exists"));
        }

        let assignment = TeachingAssignment {
            id: Uuid::new_v4(),
            teacher_id,
            subject_id: input.subject_id,
            class_id: input.class_id,
        };
        self.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user_with_profile(
        &self,
        user: NewUser,
        profile: NewProfile,
    ) -> Result<(User, CreatedProfile), AppError> {
        let mut inner = self.lock();

        if inner.users.values().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Email already exists"));
        }

        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password: user.password_hash,
            role: user.role,
        };

        let created_profile = match profile {
            NewProfile::Student {
                grade_id,
                class_id,
                parent_id,
            } => {
                let student = Student {
                    id: Uuid::new_v4(),
                    user_id: created.id,
                    grade_id,
                    class_id,
                    parent_id,
                };
                inner.students.insert(student.id, student.clone());
                CreatedProfile::Student(student)
            }
            NewProfile::Teacher { assignments } => {
                check_distinct_assignments(&assignments)?;
                let teacher = Teacher {
                    id: Uuid::new_v4(),
                    user_id: created.id,
                };
                inner.teachers.insert(teacher.id, teacher.clone());
                for input in &assignments {
                    inner.insert_assignment(teacher.id, input)?;
                }
                CreatedProfile::Teacher(teacher)
            }
            NewProfile::Parent => {
                let parent = Parent {
                    id: Uuid::new_v4(),
                    user_id: created.id,
                };
                inner.parents.insert(parent.id, parent.clone());
                CreatedProfile::Parent(parent)
            }
            NewProfile::Admin => CreatedProfile::Admin,
        };

        inner.users.insert(created.id, created.clone());
        Ok((created, created_profile))
    }

    async fn list_grades(&self) -> Result<Vec<Grade>, AppError> {
        let mut grades: Vec<Grade> = self.lock().grades.values().cloned().collect();
        grades.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(grades)
    }

    async fn find_grade(&self, id: Uuid) -> Result<Option<Grade>, AppError> {
        Ok(self.lock().grades.get(&id).cloned())
    }

    async fn create_grade(&self, name: &str) -> Result<Grade, AppError> {
        let grade = Grade {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.lock().grades.insert(grade.id, grade.clone());
        Ok(grade)
    }

    async fn update_grade(&self, id: Uuid, name: &str) -> Result<Option<Grade>, AppError> {
        let mut inner = self.lock();
        Ok(inner.grades.get_mut(&id).map(|grade| {
            grade.name = name.to_string();
            grade.clone()
        }))
    }

    async fn delete_grade(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.lock().grades.remove(&id).is_some())
    }

    async fn list_classes(&self, grade_id: Option<Uuid>) -> Result<Vec<Class>, AppError> {
        let mut classes: Vec<Class> = self
            .lock()
            .classes
            .values()
            .filter(|c| grade_id.is_none_or(|g| c.grade_id == g))
            .cloned()
            .collect();
        classes.sort_by(|a, b| (a.grade_id, &a.name).cmp(&(b.grade_id, &b.name)));
        Ok(classes)
    }

    async fn find_class(&self, id: Uuid) -> Result<Option<Class>, AppError> {
        Ok(self.lock().classes.get(&id).cloned())
    }

    async fn create_class(&self, name: &str, grade_id: Uuid) -> Result<Class, AppError> {
        let class = Class {
            id: Uuid::new_v4(),
            name: name.to_string(),
            grade_id,
        };
        self.lock().classes.insert(class.id, class.clone());
        Ok(class)
    }

    async fn update_class(
        &self,
        id: Uuid,
        name: Option<&str>,
        grade_id: Option<Uuid>,
    ) -> Result<Option<Class>, AppError> {
        let mut inner = self.lock();
        Ok(inner.classes.get_mut(&id).map(|class| {
            if let Some(name) = name {
                class.name = name.to_string();
            }
            if let Some(grade_id) = grade_id {
                class.grade_id = grade_id;
            }
            class.clone()
        }))
    }

    async fn delete_class(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.lock().classes.remove(&id).is_some())
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, AppError> {
        let mut subjects: Vec<Subject> = self.lock().subjects.values().cloned().collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }

    async fn find_subject(&self, id: Uuid) -> Result<Option<Subject>, AppError> {
        Ok(self.lock().subjects.get(&id).cloned())
    }

    async fn create_subject(&self, name: &str) -> Result<Subject, AppError> {
        let subject = Subject {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.lock().subjects.insert(subject.id, subject.clone());
        Ok(subject)
    }

    async fn update_subject(&self, id: Uuid, name: &str) -> Result<Option<Subject>, AppError> {
        let mut inner = self.lock();
        Ok(inner.subjects.get_mut(&id).map(|subject| {
            subject.name = name.to_string();
            subject.clone()
        }))
    }

    async fn delete_subject(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.lock().subjects.remove(&id).is_some())
    }

    async fn list_subjects_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<Subject>, AppError> {
        let inner = self.lock();
        let mut subjects: Vec<Subject> = inner
            .subjects
            .values()
            .filter(|s| {
                inner
                    .assignments
                    .values()
                    .any(|a| a.teacher_id == teacher_id && a.subject_id == s.id)
            })
            .cloned()
            .collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }

    async fn list_teachers(&self) -> Result<Vec<Teacher>, AppError> {
        let mut teachers: Vec<Teacher> = self.lock().teachers.values().cloned().collect();
        teachers.sort_by_key(|t| t.id);
        Ok(teachers)
    }

    async fn find_teacher(&self, id: Uuid) -> Result<Option<Teacher>, AppError> {
        Ok(self.lock().teachers.get(&id).cloned())
    }

    async fn find_teacher_by_user(&self, user_id: Uuid) -> Result<Option<Teacher>, AppError> {
        Ok(self
            .lock()
            .teachers
            .values()
            .find(|t| t.user_id == user_id)
            .cloned())
    }

    async fn list_assignments_for_teacher(
        &self,
        teacher_id: Uuid,
    ) -> Result<Vec<TeachingAssignment>, AppError> {
        Ok(self
            .lock()
            .assignments
            .values()
            .filter(|a| a.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    async fn list_assignments_for_subject(
        &self,
        teacher_id: Uuid,
        subject_id: Uuid,
        class_id: Option<Uuid>,
    ) -> Result<Vec<TeachingAssignment>, AppError> {
        Ok(self
            .lock()
            .assignments
            .values()
            .filter(|a| {
                a.teacher_id == teacher_id
                    && a.subject_id == subject_id
                    && class_id.is_none_or(|c| a.class_id == c)
            })
            .cloned()
            .collect())
    }

    async fn update_teacher(
        &self,
        teacher_id: Uuid,
        user: UserFieldUpdate,
        assignments: Option<Vec<AssignmentInput>>,
    ) -> Result<(), AppError> {
        let mut inner = self.lock();

        let user_id = inner
            .teachers
            .get(&teacher_id)
            .map(|t| t.user_id)
            .ok_or_else(|| AppError::not_found("Teacher not found"))?;

        if let Some(assignments) = &assignments {
            check_distinct_assignments(assignments)?;
        }

        if let Some(email) = &user.email {
            if inner
                .users
                .values()
                .any(|u| u.email == *email && u.id != user_id)
            {
                return Err(AppError::conflict("Email already exists"));
            }
        }
        if let Some(row) = inner.users.get_mut(&user_id) {
            if let Some(name) = user.name {
                row.name = Some(name);
            }
            if let Some(email) = user.email {
                row.email = email;
            }
            if let Some(password) = user.password_hash {
                row.password = password;
            }
        }

        if let Some(assignments) = assignments {
            inner.assignments.retain(|_, a| a.teacher_id != teacher_id);
            for input in &assignments {
                inner.insert_assignment(teacher_id, input)?;
            }
        }

        Ok(())
    }

    async fn delete_teacher_cascade(&self, teacher_id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.lock();

        let Some(teacher) = inner.teachers.remove(&teacher_id) else {
            return Ok(false);
        };

        let homework_ids: Vec<Uuid> = inner
            .homework
            .values()
            .filter(|h| h.teacher_id == teacher_id)
            .map(|h| h.id)
            .collect();
        let exam_ids: Vec<Uuid> = inner
            .exams
            .values()
            .filter(|e| e.teacher_id == teacher_id)
            .map(|e| e.id)
            .collect();

        inner
            .submissions
            .retain(|_, s| !homework_ids.contains(&s.homework_id));
        inner.attempts.retain(|_, a| !exam_ids.contains(&a.exam_id));
        inner.homework.retain(|_, h| h.teacher_id != teacher_id);
        inner.exams.retain(|_, e| e.teacher_id != teacher_id);
        inner.assignments.retain(|_, a| a.teacher_id != teacher_id);
        inner.users.remove(&teacher.user_id);

        Ok(true)
    }

    async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        let mut students: Vec<Student> = self.lock().students.values().cloned().collect();
        students.sort_by_key(|s| s.id);
        Ok(students)
    }

    async fn find_student(&self, id: Uuid) -> Result<Option<Student>, AppError> {
        Ok(self.lock().students.get(&id).cloned())
    }

    async fn find_student_by_user(&self, user_id: Uuid) -> Result<Option<Student>, AppError> {
        Ok(self
            .lock()
            .students
            .values()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn update_student(
        &self,
        student_id: Uuid,
        user: UserFieldUpdate,
        student: StudentFieldUpdate,
    ) -> Result<(), AppError> {
        let mut inner = self.lock();

        let user_id = inner
            .students
            .get(&student_id)
            .map(|s| s.user_id)
            .ok_or_else(|| AppError::not_found("Student not found"))?;

        if let Some(email) = &user.email {
            if inner
                .users
                .values()
                .any(|u| u.email == *email && u.id != user_id)
            {
                return Err(AppError::conflict("Email already exists"));
            }
        }
        if let Some(row) = inner.users.get_mut(&user_id) {
            if let Some(name) = user.name {
                row.name = Some(name);
            }
            if let Some(email) = user.email {
                row.email = email;
            }
            if let Some(password) = user.password_hash {
                row.password = password;
            }
        }

        if let Some(row) = inner.students.get_mut(&student_id) {
            if let Some(grade_id) = student.grade_id {
                row.grade_id = Some(grade_id);
            }
            if let Some(class_id) = student.class_id {
                row.class_id = Some(class_id);
            }
            if let Some(parent_id) = student.parent_id {
                row.parent_id = parent_id;
            }
        }

        Ok(())
    }

    async fn delete_student_cascade(&self, student_id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.lock();

        let Some(student) = inner.students.remove(&student_id) else {
            return Ok(false);
        };

        inner.submissions.retain(|_, s| s.student_id != student_id);
        inner.attempts.retain(|_, a| a.student_id != student_id);
        inner.users.remove(&student.user_id);

        Ok(true)
    }

    async fn list_parents(&self) -> Result<Vec<Parent>, AppError> {
        let mut parents: Vec<Parent> = self.lock().parents.values().cloned().collect();
        parents.sort_by_key(|p| p.id);
        Ok(parents)
    }

    async fn find_parent(&self, id: Uuid) -> Result<Option<Parent>, AppError> {
        Ok(self.lock().parents.get(&id).cloned())
    }

    async fn delete_parent_cascade(&self, parent_id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.lock();

        let Some(parent) = inner.parents.remove(&parent_id) else {
            return Ok(false);
        };

        for student in inner.students.values_mut() {
            if student.parent_id == Some(parent_id) {
                student.parent_id = None;
            }
        }
        inner.users.remove(&parent.user_id);

        Ok(true)
    }

    async fn list_lessons(&self, subject_id: Option<Uuid>) -> Result<Vec<Lesson>, AppError> {
        let mut lessons: Vec<Lesson> = self
            .lock()
            .lessons
            .values()
            .filter(|l| subject_id.is_none_or(|s| l.subject_id == s))
            .cloned()
            .collect();
        lessons.sort_by_key(|l| (l.subject_id, l.order_index));
        Ok(lessons)
    }

    async fn list_lessons_for_teacher(
        &self,
        teacher_id: Uuid,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<Lesson>, AppError> {
        let inner = self.lock();
        let pairs: Vec<(Uuid, Uuid)> = inner
            .assignments
            .values()
            .filter(|a| a.teacher_id == teacher_id)
            .map(|a| (a.subject_id, a.class_id))
            .collect();

        let mut lessons: Vec<Lesson> = inner
            .lessons
            .values()
            .filter(|l| pairs.contains(&(l.subject_id, l.class_id)))
            .filter(|l| subject_id.is_none_or(|s| l.subject_id == s))
            .cloned()
            .collect();
        lessons.sort_by_key(|l| (l.subject_id, l.order_index));
        Ok(lessons)
    }

    async fn find_lesson(&self, id: Uuid) -> Result<Option<Lesson>, AppError> {
        Ok(self.lock().lessons.get(&id).cloned())
    }

    async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson, AppError> {
        let lesson = Lesson {
            id: Uuid::new_v4(),
            title: lesson.title,
            content: lesson.content,
            subject_id: lesson.subject_id,
            class_id: lesson.class_id,
            order_index: lesson.order_index,
        };
        self.lock().lessons.insert(lesson.id, lesson.clone());
        Ok(lesson)
    }

    async fn update_lesson(
        &self,
        id: Uuid,
        fields: LessonFieldUpdate,
    ) -> Result<Option<Lesson>, AppError> {
        let mut inner = self.lock();
        Ok(inner.lessons.get_mut(&id).map(|lesson| {
            if let Some(title) = fields.title {
                lesson.title = title;
            }
            if let Some(content) = fields.content {
                lesson.content = content;
            }
            if let Some(order_index) = fields.order_index {
                lesson.order_index = order_index;
            }
            lesson.clone()
        }))
    }

    async fn delete_lesson(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.lock().lessons.remove(&id).is_some())
    }

    async fn list_homework(&self) -> Result<Vec<Homework>, AppError> {
        let mut homework: Vec<Homework> = self.lock().homework.values().cloned().collect();
        homework.sort_by_key(|h| h.due_date);
        Ok(homework)
    }

    async fn list_homework_for_teacher(
        &self,
        teacher_id: Uuid,
    ) -> Result<Vec<Homework>, AppError> {
        let mut homework: Vec<Homework> = self
            .lock()
            .homework
            .values()
            .filter(|h| h.teacher_id == teacher_id)
            .cloned()
            .collect();
        homework.sort_by_key(|h| h.due_date);
        Ok(homework)
    }

    async fn find_homework(&self, id: Uuid) -> Result<Option<Homework>, AppError> {
        Ok(self.lock().homework.get(&id).cloned())
    }

    async fn create_homework(&self, homework: NewHomework) -> Result<Homework, AppError> {
        let homework = Homework {
            id: Uuid::new_v4(),
            title: homework.title,
            description: homework.description,
            due_date: homework.due_date,
            subject_id: homework.subject_id,
            teacher_id: homework.teacher_id,
            class_id: homework.class_id,
        };
        self.lock().homework.insert(homework.id, homework.clone());
        Ok(homework)
    }

    async fn update_homework(
        &self,
        id: Uuid,
        fields: HomeworkFieldUpdate,
    ) -> Result<Option<Homework>, AppError> {
        let mut inner = self.lock();
        Ok(inner.homework.get_mut(&id).map(|homework| {
            if let Some(title) = fields.title {
                homework.title = title;
            }
            if let Some(description) = fields.description {
                homework.description = description;
            }
            if let Some(due_date) = fields.due_date {
                homework.due_date = due_date;
            }
            homework.clone()
        }))
    }

    async fn delete_homework_cascade(&self, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.lock();
        inner.submissions.retain(|_, s| s.homework_id != id);
        Ok(inner.homework.remove(&id).is_some())
    }

    async fn find_submission(
        &self,
        homework_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Submission>, AppError> {
        Ok(self
            .lock()
            .submissions
            .values()
            .find(|s| s.homework_id == homework_id && s.student_id == student_id)
            .cloned())
    }

    async fn list_submissions_for_student(
        &self,
        student_id: Uuid,
        homework_id: Option<Uuid>,
    ) -> Result<Vec<Submission>, AppError> {
        let mut submissions: Vec<Submission> = self
            .lock()
            .submissions
            .values()
            .filter(|s| s.student_id == student_id)
            .filter(|s| homework_id.is_none_or(|h| s.homework_id == h))
            .cloned()
            .collect();
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(submissions)
    }

    async fn list_submissions_for_homework(
        &self,
        homework_id: Uuid,
    ) -> Result<Vec<Submission>, AppError> {
        let mut submissions: Vec<Submission> = self
            .lock()
            .submissions
            .values()
            .filter(|s| s.homework_id == homework_id)
            .cloned()
            .collect();
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(submissions)
    }

    async fn create_submission(
        &self,
        homework_id: Uuid,
        student_id: Uuid,
        content: String,
    ) -> Result<Submission, AppError> {
        let mut inner = self.lock();

        let duplicate = inner
            .submissions
            .values()
            .any(|s| s.homework_id == homework_id && s.student_id == student_id);
        if duplicate {
            return Err(AppError::conflict("You already submitted this homework"));
        }

        let submission = Submission {
            id: Uuid::new_v4(),
            homework_id,
            student_id,
            content,
            status: SubmissionStatus::Submitted,
            created_at: Utc::now(),
        };
        inner.submissions.insert(submission.id, submission.clone());
        Ok(submission)
    }

    async fn list_exams(&self) -> Result<Vec<Exam>, AppError> {
        let mut exams: Vec<Exam> = self.lock().exams.values().cloned().collect();
        exams.sort_by_key(|e| e.due_date);
        Ok(exams)
    }

    async fn list_exams_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<Exam>, AppError> {
        let mut exams: Vec<Exam> = self
            .lock()
            .exams
            .values()
            .filter(|e| e.teacher_id == teacher_id)
            .cloned()
            .collect();
        exams.sort_by_key(|e| e.due_date);
        Ok(exams)
    }

    async fn find_exam(&self, id: Uuid) -> Result<Option<Exam>, AppError> {
        Ok(self.lock().exams.get(&id).cloned())
    }

    async fn create_exam(&self, exam: NewExam) -> Result<Exam, AppError> {
        let exam = Exam {
            id: Uuid::new_v4(),
            title: exam.title,
            description: exam.description,
            duration_minutes: exam.duration_minutes,
            due_date: exam.due_date,
            subject_id: exam.subject_id,
            teacher_id: exam.teacher_id,
            class_id: exam.class_id,
        };
        self.lock().exams.insert(exam.id, exam.clone());
        Ok(exam)
    }

    async fn update_exam(
        &self,
        id: Uuid,
        fields: ExamFieldUpdate,
    ) -> Result<Option<Exam>, AppError> {
        let mut inner = self.lock();
        Ok(inner.exams.get_mut(&id).map(|exam| {
            if let Some(title) = fields.title {
                exam.title = title;
            }
            if let Some(description) = fields.description {
                exam.description = Some(description);
            }
            if let Some(duration_minutes) = fields.duration_minutes {
                exam.duration_minutes = duration_minutes;
            }
            if let Some(due_date) = fields.due_date {
                exam.due_date = due_date;
            }
            exam.clone()
        }))
    }

    async fn delete_exam_cascade(&self, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.lock();
        inner.attempts.retain(|_, a| a.exam_id != id);
        Ok(inner.exams.remove(&id).is_some())
    }

    async fn find_attempt(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<ExamAttempt>, AppError> {
        Ok(self
            .lock()
            .attempts
            .values()
            .find(|a| a.exam_id == exam_id && a.student_id == student_id)
            .cloned())
    }

    async fn list_attempts_for_exam(&self, exam_id: Uuid) -> Result<Vec<ExamAttempt>, AppError> {
        Ok(self
            .lock()
            .attempts
            .values()
            .filter(|a| a.exam_id == exam_id)
            .cloned()
            .collect())
    }

    async fn upsert_attempt(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        answers: Option<String>,
    ) -> Result<ExamAttempt, AppError> {
        let mut inner = self.lock();

        let existing = inner
            .attempts
            .values_mut()
            .find(|a| a.exam_id == exam_id && a.student_id == student_id);

        if let Some(attempt) = existing {
            if let Some(answers) = answers {
                attempt.answers = Some(answers);
            }
            attempt.status = AttemptStatus::Submitted;
            attempt.submitted_at = Some(Utc::now());
            return Ok(attempt.clone());
        }

        let attempt = ExamAttempt {
            id: Uuid::new_v4(),
            exam_id,
            student_id,
            answers,
            score: None,
            status: AttemptStatus::Submitted,
            submitted_at: Some(Utc::now()),
        };
        inner.attempts.insert(attempt.id, attempt.clone());
        Ok(attempt)
    }
}
