mod builder;
pub mod csv;
pub mod views;

pub use builder::{ReportBuilder, ReportError, TermRecords};
pub use views::{CourseEntry, GpaReport, TermReport, TranscriptReport};
