//! Canonical CSV text for GPA and transcript reports.
//!
//! Header lines are written verbatim; table rows go through the `csv` writer so
//! course titles with commas, quotes, or line breaks stay parseable.

use super::views::{CourseEntry, GpaReport, TermReport, TranscriptReport};
use chrono::{DateTime, Utc};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
const DATE_FORMAT: &str = "%Y-%m-%d";
const FILENAME_DATE_FORMAT: &str = "%Y%m%d";
const COURSE_COLUMNS: [&str; 4] = ["Course Title", "Credit Hours", "Letter Grade", "Grade Points"];

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("failed to write csv row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv row: {0}")]
    Flush(String),
    #[error("csv row was not valid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub fn gpa_report_csv(report: &GpaReport) -> Result<String, FormatError> {
    let mut doc = CsvDocument::default();
    doc.line(&report.report_title);
    doc.line(&generated_line(&report.generated_at));
    doc.line(&student_line(&report.student_name, &report.student_email));
    doc.line(&format!("Term: {}", report.term.term_title));
    doc.line(&term_dates_line(&report.term));
    doc.blank();

    doc.course_table(&report.term.courses)?;
    doc.blank();
    doc.row([
        "Total Credit Hours".to_string(),
        report.term.term_credit_hours.to_string(),
        String::new(),
        "Term GPA".to_string(),
        two_decimals(report.term.term_gpa),
    ])?;

    Ok(doc.finish())
}

pub fn transcript_csv(report: &TranscriptReport) -> Result<String, FormatError> {
    let mut doc = CsvDocument::default();
    doc.line(&report.report_title);
    doc.line(&generated_line(&report.generated_at));
    doc.line(&student_line(&report.student_name, &report.student_email));
    doc.blank();

    for term in &report.terms {
        doc.line(&format!("Term: {}", term.term_title));
        doc.line(&term_dates_line(term));
        doc.blank();

        doc.course_table(&term.courses)?;
        doc.blank();
        doc.row([
            "Term Credit Hours".to_string(),
            term.term_credit_hours.to_string(),
            String::new(),
            "Term GPA".to_string(),
            two_decimals(term.term_gpa),
        ])?;
        doc.blank();
    }

    doc.line("CUMULATIVE SUMMARY");
    doc.row([
        "Total Credit Hours".to_string(),
        report.total_credit_hours.to_string(),
        String::new(),
        "Cumulative GPA".to_string(),
        two_decimals(report.cumulative_gpa),
    ])?;

    Ok(doc.finish())
}

/// Download name for a GPA report, e.g. `GPA_Report_Fall_2024_20250106.csv`.
///
/// The title ends up inside a quoted `Content-Disposition` parameter, so
/// spaces, quotes, path separators, and control characters become `_`.
pub fn gpa_report_filename(report: &GpaReport, on: DateTime<Utc>) -> String {
    let title: String = report
        .term
        .term_title
        .chars()
        .map(|c| match c {
            ' ' | '"' | '\\' | '/' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!(
        "GPA_Report_{}_{}.csv",
        title,
        on.format(FILENAME_DATE_FORMAT)
    )
}

pub fn transcript_filename(on: DateTime<Utc>) -> String {
    format!("Academic_Transcript_{}.csv", on.format(FILENAME_DATE_FORMAT))
}

fn generated_line(generated_at: &DateTime<Utc>) -> String {
    format!("Generated: {}", generated_at.format(TIMESTAMP_FORMAT))
}

fn student_line(name: &str, email: &str) -> String {
    format!("Student: {name} ({email})")
}

fn term_dates_line(term: &TermReport) -> String {
    format!(
        "Term Dates: {} to {}",
        term.term_start.format(DATE_FORMAT),
        term.term_end.format(DATE_FORMAT)
    )
}

fn two_decimals(value: f64) -> String {
    format!("{value:.2}")
}

#[derive(Default)]
struct CsvDocument {
    out: String,
}

impl CsvDocument {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn course_table(&mut self, courses: &[CourseEntry]) -> Result<(), FormatError> {
        self.row(COURSE_COLUMNS)?;
        for course in courses {
            self.row([
                course.title.clone(),
                course.credit_hours.to_string(),
                course.letter_grade.clone(),
                two_decimals(course.grade_points),
            ])?;
        }
        Ok(())
    }

    fn row<I, T>(&mut self, fields: I) -> Result<(), FormatError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(fields)?;
        let bytes = writer
            .into_inner()
            .map_err(|err| FormatError::Flush(err.to_string()))?;
        self.out.push_str(&String::from_utf8(bytes)?);
        Ok(())
    }

    fn finish(self) -> String {
        self.out
    }
}
