use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::domain::{
    CourseId, GradeRecord, GradeSubmission, GradeValidationError, Student, StudentId, Term, TermId,
};
use super::gpa::{GpaAggregator, GpaSummary};
use super::projection::{ProjectionCalculator, ProjectionError, ProjectionResult};
use super::report::csv::{self, FormatError};
use super::report::{GpaReport, ReportBuilder, ReportError, TermRecords, TranscriptReport};
use super::repository::{AcademicRepository, RepositoryError};
use super::scale::GradeScale;

/// Source of the `generated_at` stamp placed on reports.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A fixed instant acts as a frozen clock.
impl Clock for DateTime<Utc> {
    fn now(&self) -> DateTime<Utc> {
        *self
    }
}

/// Rendered CSV body plus the download name it should be served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

/// Service answering report, GPA, and projection queries for one record store.
pub struct GradeReportService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    builder: ReportBuilder,
    aggregator: GpaAggregator,
    projections: ProjectionCalculator,
}

impl<R> GradeReportService<R>
where
    R: AcademicRepository + 'static,
{
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self::with_scale(repository, clock, GradeScale::standard())
    }

    pub fn with_scale(repository: Arc<R>, clock: Arc<dyn Clock>, scale: GradeScale) -> Self {
        let aggregator = GpaAggregator::new(scale);
        Self {
            repository,
            clock,
            builder: ReportBuilder::new(aggregator),
            aggregator,
            projections: ProjectionCalculator::new(scale),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Single-term report for a term the student owns.
    pub fn gpa_report(
        &self,
        student_id: &StudentId,
        term_id: TermId,
    ) -> Result<GpaReport, ReportServiceError> {
        let student = self.student(student_id)?;
        let term = self.owned_term(&student, term_id)?;
        let records = self.term_records(term)?;

        let report = self
            .builder
            .build_gpa_report(&student, &records, self.clock.now())?;
        info!(
            student = %student.id,
            term = %term_id,
            courses = report.term.courses.len(),
            "built gpa report"
        );
        Ok(report)
    }

    /// Full transcript. A student without terms gets an empty transcript.
    pub fn transcript_report(
        &self,
        student_id: &StudentId,
    ) -> Result<TranscriptReport, ReportServiceError> {
        let student = self.student(student_id)?;
        let terms = self
            .repository
            .terms_for_student(&student.id)?
            .into_iter()
            .map(|term| self.term_records(term))
            .collect::<Result<Vec<_>, _>>()?;

        let report = self
            .builder
            .build_transcript_report(&student, terms, self.clock.now())?;
        info!(
            student = %student.id,
            terms = report.terms.len(),
            total_credit_hours = report.total_credit_hours,
            "built transcript"
        );
        Ok(report)
    }

    pub fn grade_projection(
        &self,
        student_id: &StudentId,
        course_id: CourseId,
        current_percent: f64,
        final_weight: f64,
        target_letter: &str,
    ) -> Result<ProjectionResult, ReportServiceError> {
        let student = self.student(student_id)?;
        self.owned_course(&student, course_id)?;

        let result = self.projections.project_for_letter_target(
            course_id,
            current_percent,
            final_weight,
            target_letter,
        )?;
        debug!(
            course = %course_id,
            needed = result.needed_on_final,
            achievable = result.is_achievable,
            "projected final score"
        );
        Ok(result)
    }

    pub fn gpa_report_csv(
        &self,
        student_id: &StudentId,
        term_id: TermId,
    ) -> Result<CsvExport, ReportServiceError> {
        let report = self.gpa_report(student_id, term_id)?;
        Ok(CsvExport {
            filename: csv::gpa_report_filename(&report, report.generated_at),
            body: csv::gpa_report_csv(&report)?,
        })
    }

    pub fn transcript_csv(&self, student_id: &StudentId) -> Result<CsvExport, ReportServiceError> {
        let report = self.transcript_report(student_id)?;
        Ok(CsvExport {
            filename: csv::transcript_filename(report.generated_at),
            body: csv::transcript_csv(&report)?,
        })
    }

    pub fn term_gpa(
        &self,
        student_id: &StudentId,
        term_id: TermId,
    ) -> Result<GpaSummary, ReportServiceError> {
        let student = self.student(student_id)?;
        let term = self.owned_term(&student, term_id)?;
        let grades = self.repository.grades_for_term(term.id)?;
        Ok(self.aggregator.summarize(term.id, &grades))
    }

    pub fn term_grades(
        &self,
        student_id: &StudentId,
        term_id: TermId,
    ) -> Result<Vec<GradeRecord>, ReportServiceError> {
        let student = self.student(student_id)?;
        let term = self.owned_term(&student, term_id)?;
        Ok(self.repository.grades_for_term(term.id)?)
    }

    /// Validate and store a grade for a course the student owns.
    pub fn record_grade(
        &self,
        student_id: &StudentId,
        submission: GradeSubmission,
    ) -> Result<GradeRecord, ReportServiceError> {
        submission.validate()?;
        let student = self.student(student_id)?;
        self.owned_course(&student, submission.course_id)?;

        let record = self.repository.upsert_grade(submission)?;
        info!(
            student = %student.id,
            course = %record.course_id,
            grade = %record.id,
            "recorded grade"
        );
        Ok(record)
    }

    fn student(&self, id: &StudentId) -> Result<Student, ReportServiceError> {
        self.repository
            .student(id)?
            .ok_or_else(|| ReportError::StudentNotFound(id.clone()).into())
    }

    fn owned_term(&self, student: &Student, term_id: TermId) -> Result<Term, ReportServiceError> {
        match self.repository.term(term_id)? {
            Some(term) if term.student_id == student.id => Ok(term),
            _ => Err(ReportError::TermNotFound(term_id).into()),
        }
    }

    fn owned_course(&self, student: &Student, course_id: CourseId) -> Result<(), ReportServiceError> {
        let course = self
            .repository
            .course(course_id)?
            .ok_or(ReportError::CourseNotFound(course_id))?;
        match self.repository.term(course.term_id)? {
            Some(term) if term.student_id == student.id => Ok(()),
            _ => Err(ReportError::CourseNotFound(course_id).into()),
        }
    }

    fn term_records(&self, term: Term) -> Result<TermRecords, ReportServiceError> {
        let courses = self.repository.courses_for_term(term.id)?;
        let grades = self.repository.grades_for_term(term.id)?;
        Ok(TermRecords {
            term,
            courses,
            grades,
        })
    }
}

/// Error raised by the grade report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Validation(#[from] GradeValidationError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ReportServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ReportServiceError::Report(_) | ReportServiceError::Repository(RepositoryError::NotFound)
        )
    }

    /// Caller-supplied values were rejected.
    pub fn is_rejected_request(&self) -> bool {
        matches!(
            self,
            ReportServiceError::Projection(_) | ReportServiceError::Validation(_)
        )
    }
}
