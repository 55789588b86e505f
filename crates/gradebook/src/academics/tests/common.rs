use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::academics::domain::{
    AcademicDataset, Course, CourseId, GradeId, GradeRecord, GradeSubmission, Student, StudentId,
    Term, TermId,
};
use crate::academics::repository::{AcademicRepository, RepositoryError};
use crate::academics::service::GradeReportService;
use crate::academics::academic_router;

pub(super) const STUDENT: &str = "s-100";
pub(super) const OTHER_STUDENT: &str = "s-200";

pub(super) fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn grade(id: u32, course_id: u32, letter: &str, credit_hours: u32) -> GradeRecord {
    GradeRecord {
        id: GradeId(id),
        course_id: CourseId(course_id),
        letter_grade: letter.to_string(),
        percentage: None,
        credit_hours,
    }
}

/// Two terms for `STUDENT` (Spring listed before Fall) and one for
/// `OTHER_STUDENT`.
pub(super) fn dataset() -> AcademicDataset {
    AcademicDataset {
        students: vec![
            Student {
                id: StudentId(STUDENT.to_string()),
                name: "Jordan Reyes".to_string(),
                email: Some("jordan@example.edu".to_string()),
            },
            Student {
                id: StudentId(OTHER_STUDENT.to_string()),
                name: "Sam Okafor".to_string(),
                email: None,
            },
        ],
        terms: vec![
            Term {
                id: TermId(2),
                student_id: StudentId(STUDENT.to_string()),
                title: "Spring 2025".to_string(),
                start_date: date(2025, 1, 13),
                end_date: date(2025, 5, 9),
            },
            Term {
                id: TermId(1),
                student_id: StudentId(STUDENT.to_string()),
                title: "Fall 2024".to_string(),
                start_date: date(2024, 8, 26),
                end_date: date(2024, 12, 13),
            },
            Term {
                id: TermId(9),
                student_id: StudentId(OTHER_STUDENT.to_string()),
                title: "Fall 2024".to_string(),
                start_date: date(2024, 8, 26),
                end_date: date(2024, 12, 13),
            },
        ],
        courses: vec![
            course(10, 1, "Calculus I"),
            course(11, 1, "Composition"),
            course(20, 2, "Physics"),
            course(21, 2, "Studio Art"),
            course(90, 9, "Statistics"),
        ],
        grades: vec![
            grade(100, 10, "A", 4),
            grade(101, 11, "B", 3),
            grade(200, 20, "C", 4),
            grade(900, 90, "A-", 3),
        ],
    }
}

fn course(id: u32, term_id: u32, title: &str) -> Course {
    Course {
        id: CourseId(id),
        term_id: TermId(term_id),
        title: title.to_string(),
    }
}

pub(super) fn build_service() -> (GradeReportService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::from_dataset(dataset()));
    let service = GradeReportService::new(repository.clone(), Arc::new(generated_at()));
    (service, repository)
}

pub(super) fn router_with_service(service: GradeReportService<MemoryRepository>) -> axum::Router {
    academic_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<AcademicDataset>>,
}

impl MemoryRepository {
    pub(super) fn from_dataset(dataset: AcademicDataset) -> Self {
        Self {
            records: Arc::new(Mutex::new(dataset)),
        }
    }

    pub(super) fn grades(&self) -> Vec<GradeRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .grades
            .clone()
    }
}

impl AcademicRepository for MemoryRepository {
    fn student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.students.iter().find(|s| &s.id == id).cloned())
    }

    fn term(&self, id: TermId) -> Result<Option<Term>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.terms.iter().find(|t| t.id == id).cloned())
    }

    fn terms_for_student(&self, id: &StudentId) -> Result<Vec<Term>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .terms
            .iter()
            .filter(|t| &t.student_id == id)
            .cloned()
            .collect())
    }

    fn course(&self, id: CourseId) -> Result<Option<Course>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.courses.iter().find(|c| c.id == id).cloned())
    }

    fn courses_for_term(&self, id: TermId) -> Result<Vec<Course>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .courses
            .iter()
            .filter(|c| c.term_id == id)
            .cloned()
            .collect())
    }

    fn grades_for_term(&self, id: TermId) -> Result<Vec<GradeRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let courses: Vec<CourseId> = guard
            .courses
            .iter()
            .filter(|c| c.term_id == id)
            .map(|c| c.id)
            .collect();
        Ok(guard
            .grades
            .iter()
            .filter(|g| courses.contains(&g.course_id))
            .cloned()
            .collect())
    }

    fn upsert_grade(&self, submission: GradeSubmission) -> Result<GradeRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match submission.id {
            Some(id) => {
                let slot = guard
                    .grades
                    .iter_mut()
                    .find(|g| g.id == id && g.course_id == submission.course_id)
                    .ok_or(RepositoryError::NotFound)?;
                *slot = submission.into_record(id);
                Ok(slot.clone())
            }
            None => {
                if guard.grades.iter().any(|g| g.course_id == submission.course_id) {
                    return Err(RepositoryError::Conflict);
                }
                let next = guard.grades.iter().map(|g| g.id.0).max().unwrap_or(0) + 1;
                let record = submission.into_record(GradeId(next));
                guard.grades.push(record.clone());
                Ok(record)
            }
        }
    }
}

pub(super) struct UnavailableRepository;

impl AcademicRepository for UnavailableRepository {
    fn student(&self, _id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn term(&self, _id: TermId) -> Result<Option<Term>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn terms_for_student(&self, _id: &StudentId) -> Result<Vec<Term>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn course(&self, _id: CourseId) -> Result<Option<Course>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn courses_for_term(&self, _id: TermId) -> Result<Vec<Course>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn grades_for_term(&self, _id: TermId) -> Result<Vec<GradeRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_grade(&self, _submission: GradeSubmission) -> Result<GradeRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn submission(course_id: u32, letter: &str, credit_hours: u32) -> GradeSubmission {
    GradeSubmission {
        id: None,
        course_id: CourseId(course_id),
        letter_grade: letter.to_string(),
        percentage: Some(88.5),
        credit_hours,
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
