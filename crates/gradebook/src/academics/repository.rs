use super::domain::{
    Course, CourseId, GradeRecord, GradeSubmission, Student, StudentId, Term, TermId,
};

/// Storage abstraction over the academic record store.
///
/// Implementations own persistence and identity; the report service only
/// reads plain values through this trait and hands them to the builders.
pub trait AcademicRepository: Send + Sync {
    fn student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError>;
    fn term(&self, id: TermId) -> Result<Option<Term>, RepositoryError>;
    fn terms_for_student(&self, id: &StudentId) -> Result<Vec<Term>, RepositoryError>;
    fn course(&self, id: CourseId) -> Result<Option<Course>, RepositoryError>;
    fn courses_for_term(&self, id: TermId) -> Result<Vec<Course>, RepositoryError>;
    fn grades_for_term(&self, id: TermId) -> Result<Vec<GradeRecord>, RepositoryError>;
    /// Create the course's grade, or replace it when `submission.id` is set.
    fn upsert_grade(&self, submission: GradeSubmission) -> Result<GradeRecord, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
