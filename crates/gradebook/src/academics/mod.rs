//! Grade scale, GPA aggregation, grade projection, and report generation.
//!
//! Pure computation lives in [`scale`], [`gpa`], [`projection`], and
//! [`report`]; [`service`] and [`router`] put those behind a record store and
//! HTTP endpoints.

pub mod domain;
pub mod gpa;
pub mod projection;
pub mod report;
pub mod repository;
pub mod router;
pub mod scale;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AcademicDataset, Course, CourseId, DatasetError, GradeId, GradeRecord, GradeSubmission,
    GradeValidationError, LetterGrade, Student, StudentId, Term, TermId,
};
pub use gpa::{CreditedGrade, GpaAggregator, GpaSummary, GpaTally};
pub use projection::{ProjectionCalculator, ProjectionError, ProjectionResult};
pub use report::csv::FormatError;
pub use report::{
    CourseEntry, GpaReport, ReportBuilder, ReportError, TermRecords, TermReport, TranscriptReport,
};
pub use repository::{AcademicRepository, RepositoryError};
pub use router::academic_router;
pub use scale::{GradeScale, ScaleEntry};
pub use service::{Clock, CsvExport, GradeReportService, ReportServiceError, SystemClock};
