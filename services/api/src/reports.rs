use crate::infra::{generated_at, load_dataset, InMemoryAcademicRepository};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use gradebook::academics::{
    CourseId, GradeReportService, ProjectionCalculator, ProjectionResult, StudentId, TermId,
};
use gradebook::error::AppError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct GpaReportArgs {
    /// JSON dataset holding students, terms, courses, and grades
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Student identifier
    #[arg(long)]
    pub(crate) student: String,
    /// Term identifier
    #[arg(long)]
    pub(crate) term: u32,
    #[arg(long, value_enum, default_value_t)]
    pub(crate) format: OutputFormat,
    /// Stamp the report with midnight UTC on this date (YYYY-MM-DD) instead of now
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) generated_on: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct TranscriptArgs {
    /// JSON dataset holding students, terms, courses, and grades
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Student identifier
    #[arg(long)]
    pub(crate) student: String,
    #[arg(long, value_enum, default_value_t)]
    pub(crate) format: OutputFormat,
    /// Stamp the report with midnight UTC on this date (YYYY-MM-DD) instead of now
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) generated_on: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ProjectArgs {
    /// Current course percentage before the final
    #[arg(long)]
    pub(crate) current: f64,
    /// Weight of the final as a fraction in (0, 1]
    #[arg(long)]
    pub(crate) weight: f64,
    /// Target letter grade, e.g. B+
    #[arg(long)]
    pub(crate) target: String,
    /// Course the projection is for
    #[arg(long, default_value_t = 0)]
    pub(crate) course: u32,
}

pub(crate) fn run_gpa_report(args: GpaReportArgs) -> Result<(), AppError> {
    let service = service_for(&args.data, args.generated_on)?;
    let student = StudentId(args.student);
    let term = TermId(args.term);

    let output = match args.format {
        OutputFormat::Csv => service.gpa_report_csv(&student, term)?.body,
        OutputFormat::Json => to_json(&service.gpa_report(&student, term)?)?,
    };
    print!("{output}");
    Ok(())
}

pub(crate) fn run_transcript(args: TranscriptArgs) -> Result<(), AppError> {
    let service = service_for(&args.data, args.generated_on)?;
    let student = StudentId(args.student);

    let output = match args.format {
        OutputFormat::Csv => service.transcript_csv(&student)?.body,
        OutputFormat::Json => to_json(&service.transcript_report(&student)?)?,
    };
    print!("{output}");
    Ok(())
}

pub(crate) fn run_projection(args: ProjectArgs) -> Result<(), AppError> {
    let result = ProjectionCalculator::default().project_for_letter_target(
        CourseId(args.course),
        args.current,
        args.weight,
        &args.target,
    )?;
    print!("{}", render_projection(&result));
    Ok(())
}

fn service_for(
    data: &Path,
    generated_on: Option<NaiveDate>,
) -> Result<GradeReportService<InMemoryAcademicRepository>, AppError> {
    let repository = InMemoryAcademicRepository::from_dataset(load_dataset(data)?)?;
    Ok(GradeReportService::new(
        Arc::new(repository),
        Arc::new(generated_at(generated_on)),
    ))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    Ok(rendered)
}

fn render_projection(result: &ProjectionResult) -> String {
    let verdict = if result.is_achievable {
        "achievable"
    } else if result.needed_on_final < 0.0 {
        "already secured"
    } else {
        "not achievable (needs more than 100%)"
    };

    format!(
        "Current grade: {:.2}%\nFinal weight: {:.0}%\nTarget: {} ({:.2}%)\nNeeded on final: {:.2}%\nOutlook: {}\n",
        result.current_grade,
        result.final_weight * 100.0,
        result.target_grade,
        result.target_percent,
        result.needed_on_final,
        verdict
    )
}
