use chrono::{DateTime, NaiveDate, Utc};
use gradebook::academics::{
    AcademicDataset, AcademicRepository, Course, CourseId, DatasetError, GradeId, GradeRecord,
    GradeSubmission, RepositoryError, Student, StudentId, Term, TermId,
};
use gradebook::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct RecordStore {
    students: HashMap<StudentId, Student>,
    terms: BTreeMap<TermId, Term>,
    courses: BTreeMap<CourseId, Course>,
    grades: BTreeMap<GradeId, GradeRecord>,
}

/// Record store held in memory, optionally seeded from a JSON dataset.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAcademicRepository {
    records: Arc<Mutex<RecordStore>>,
}

impl InMemoryAcademicRepository {
    pub(crate) fn from_dataset(dataset: AcademicDataset) -> Result<Self, DatasetError> {
        dataset.validate()?;
        let store = RecordStore {
            students: dataset
                .students
                .into_iter()
                .map(|student| (student.id.clone(), student))
                .collect(),
            terms: dataset.terms.into_iter().map(|term| (term.id, term)).collect(),
            courses: dataset
                .courses
                .into_iter()
                .map(|course| (course.id, course))
                .collect(),
            grades: dataset
                .grades
                .into_iter()
                .map(|grade| (grade.id, grade))
                .collect(),
        };

        Ok(Self {
            records: Arc::new(Mutex::new(store)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, RecordStore>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("record store lock poisoned".to_string()))
    }
}

impl AcademicRepository for InMemoryAcademicRepository {
    fn student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.students.get(id).cloned())
    }

    fn term(&self, id: TermId) -> Result<Option<Term>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.terms.get(&id).cloned())
    }

    fn terms_for_student(&self, id: &StudentId) -> Result<Vec<Term>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .terms
            .values()
            .filter(|term| &term.student_id == id)
            .cloned()
            .collect())
    }

    fn course(&self, id: CourseId) -> Result<Option<Course>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.courses.get(&id).cloned())
    }

    fn courses_for_term(&self, id: TermId) -> Result<Vec<Course>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .courses
            .values()
            .filter(|course| course.term_id == id)
            .cloned()
            .collect())
    }

    fn grades_for_term(&self, id: TermId) -> Result<Vec<GradeRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .grades
            .values()
            .filter(|grade| {
                guard
                    .courses
                    .get(&grade.course_id)
                    .is_some_and(|course| course.term_id == id)
            })
            .cloned()
            .collect())
    }

    fn upsert_grade(&self, submission: GradeSubmission) -> Result<GradeRecord, RepositoryError> {
        let mut guard = self.lock()?;
        let id = match submission.id {
            // A replacement must target the submitted course's own grade.
            Some(id) => match guard.grades.get(&id) {
                Some(existing) if existing.course_id == submission.course_id => id,
                _ => return Err(RepositoryError::NotFound),
            },
            None => {
                if guard
                    .grades
                    .values()
                    .any(|grade| grade.course_id == submission.course_id)
                {
                    return Err(RepositoryError::Conflict);
                }
                let next = guard.grades.keys().next_back().map_or(1, |last| last.0 + 1);
                GradeId(next)
            }
        };

        let record = submission.into_record(id);
        guard.grades.insert(id, record.clone());
        Ok(record)
    }
}

pub(crate) fn load_dataset(path: &Path) -> Result<AcademicDataset, AppError> {
    let reader = BufReader::new(File::open(path)?);
    let dataset = AcademicDataset::from_reader(reader)?;
    info!(
        path = %path.display(),
        students = dataset.students.len(),
        terms = dataset.terms.len(),
        grades = dataset.grades.len(),
        "loaded academic dataset"
    );
    Ok(dataset)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Midnight UTC on `date`, or the current instant when no date is pinned.
pub(crate) fn generated_at(date: Option<NaiveDate>) -> DateTime<Utc> {
    date.and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now)
}
