use super::super::domain::{Course, CourseId, GradeRecord, Student, StudentId, Term, TermId};
use super::super::gpa::{GpaAggregator, GpaTally};
use super::views::{CourseEntry, GpaReport, TermReport, TranscriptReport};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub const TRANSCRIPT_TITLE: &str = "Academic Transcript";

/// Records for one term as supplied by the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct TermRecords {
    pub term: Term,
    pub courses: Vec<Course>,
    pub grades: Vec<GradeRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("student {0} not found")]
    StudentNotFound(StudentId),
    #[error("term {0} not found")]
    TermNotFound(TermId),
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
}

/// Assembles term, GPA, and transcript reports from plain record values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBuilder {
    aggregator: GpaAggregator,
}

impl ReportBuilder {
    pub fn new(aggregator: GpaAggregator) -> Self {
        Self { aggregator }
    }

    /// Courses without a grade are left out; entries keep the order of
    /// `grades`.
    pub fn build_term_report(
        &self,
        term: &Term,
        courses: &[Course],
        grades: &[GradeRecord],
    ) -> Result<TermReport, ReportError> {
        self.term_report_with_tally(term, courses, grades)
            .map(|(report, _)| report)
    }

    pub fn build_gpa_report(
        &self,
        student: &Student,
        records: &TermRecords,
        generated_at: DateTime<Utc>,
    ) -> Result<GpaReport, ReportError> {
        ensure_owned(student, &records.term)?;
        let term = self.build_term_report(&records.term, &records.courses, &records.grades)?;

        Ok(GpaReport {
            report_title: format!("GPA Report - {}", records.term.title),
            generated_at,
            student_name: student.name.clone(),
            student_email: student.email.clone().unwrap_or_default(),
            term,
        })
    }

    /// Terms are ordered by start date. The cumulative GPA divides total
    /// grade-point-hours by total credit hours across every term, so a small
    /// term weighs only as much as its hours.
    pub fn build_transcript_report(
        &self,
        student: &Student,
        mut terms: Vec<TermRecords>,
        generated_at: DateTime<Utc>,
    ) -> Result<TranscriptReport, ReportError> {
        terms.sort_by_key(|records| records.term.start_date);

        let mut cumulative = GpaTally::default();
        let mut term_reports = Vec::with_capacity(terms.len());
        for records in &terms {
            ensure_owned(student, &records.term)?;
            let (report, tally) =
                self.term_report_with_tally(&records.term, &records.courses, &records.grades)?;
            cumulative.merge(&tally);
            term_reports.push(report);
        }

        Ok(TranscriptReport {
            report_title: TRANSCRIPT_TITLE.to_string(),
            generated_at,
            student_name: student.name.clone(),
            student_email: student.email.clone().unwrap_or_default(),
            terms: term_reports,
            cumulative_gpa: cumulative.gpa(),
            total_credit_hours: cumulative.credit_hours,
        })
    }

    fn term_report_with_tally(
        &self,
        term: &Term,
        courses: &[Course],
        grades: &[GradeRecord],
    ) -> Result<(TermReport, GpaTally), ReportError> {
        let titles: HashMap<CourseId, &str> = courses
            .iter()
            .map(|course| (course.id, course.title.as_str()))
            .collect();

        let scale = self.aggregator.scale();
        let courses = grades
            .iter()
            .map(|grade| -> Result<CourseEntry, ReportError> {
                let title = titles
                    .get(&grade.course_id)
                    .ok_or(ReportError::CourseNotFound(grade.course_id))?;
                Ok(CourseEntry {
                    title: (*title).to_string(),
                    credit_hours: grade.credit_hours,
                    letter_grade: grade.letter_grade.clone(),
                    grade_points: scale.points_of(&grade.letter_grade),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tally = self.aggregator.tally(grades);
        let report = TermReport {
            term_title: term.title.clone(),
            term_start: term.start_date,
            term_end: term.end_date,
            courses,
            term_credit_hours: tally.credit_hours,
            term_gpa: self.aggregator.calculate_gpa(Some(grades)),
        };

        Ok((report, tally))
    }
}

fn ensure_owned(student: &Student, term: &Term) -> Result<(), ReportError> {
    if term.student_id == student.id {
        Ok(())
    } else {
        Err(ReportError::TermNotFound(term.id))
    }
}
