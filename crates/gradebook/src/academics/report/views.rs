use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One graded course as it appears in a report table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseEntry {
    pub title: String,
    pub credit_hours: u32,
    pub letter_grade: String,
    pub grade_points: f64,
}

/// Graded courses and GPA for a single term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermReport {
    pub term_title: String,
    pub term_start: NaiveDate,
    pub term_end: NaiveDate,
    pub courses: Vec<CourseEntry>,
    pub term_credit_hours: u32,
    pub term_gpa: f64,
}

/// Single-term GPA report with its student and generation header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaReport {
    pub report_title: String,
    pub generated_at: DateTime<Utc>,
    pub student_name: String,
    pub student_email: String,
    pub term: TermReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptReport {
    pub report_title: String,
    pub generated_at: DateTime<Utc>,
    pub student_name: String,
    pub student_email: String,
    pub terms: Vec<TermReport>,
    pub cumulative_gpa: f64,
    pub total_credit_hours: u32,
}
