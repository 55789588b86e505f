use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeId(pub u32);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Letter grades recognized by the grade scale, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "F")]
    F,
}

impl LetterGrade {
    pub const fn ordered() -> [Self; 13] {
        [
            Self::APlus,
            Self::A,
            Self::AMinus,
            Self::BPlus,
            Self::B,
            Self::BMinus,
            Self::CPlus,
            Self::C,
            Self::CMinus,
            Self::DPlus,
            Self::D,
            Self::DMinus,
            Self::F,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::DMinus => "D-",
            Self::F => "F",
        }
    }

    /// Case-insensitive parse; anything outside the scale is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.to_ascii_uppercase();
        Self::ordered()
            .into_iter()
            .find(|letter| letter.label() == upper)
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub student_id: StudentId,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub term_id: TermId,
    pub title: String,
}

/// Grade recorded against a course.
///
/// The letter is kept as entered; unknown letters are scored as zero points
/// by the grade scale rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub id: GradeId,
    pub course_id: CourseId,
    pub letter_grade: String,
    #[serde(default)]
    pub percentage: Option<f64>,
    pub credit_hours: u32,
}

pub const MIN_CREDIT_HOURS: u32 = 1;
pub const MAX_CREDIT_HOURS: u32 = 10;

/// Incoming grade save. `id` is set when replacing an existing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSubmission {
    #[serde(default)]
    pub id: Option<GradeId>,
    pub course_id: CourseId,
    pub letter_grade: String,
    #[serde(default)]
    pub percentage: Option<f64>,
    pub credit_hours: u32,
}

impl GradeSubmission {
    pub fn validate(&self) -> Result<(), GradeValidationError> {
        check_grade_fields(&self.letter_grade, self.credit_hours, self.percentage)
    }

    pub fn into_record(self, id: GradeId) -> GradeRecord {
        GradeRecord {
            id,
            course_id: self.course_id,
            letter_grade: self.letter_grade,
            percentage: self.percentage,
            credit_hours: self.credit_hours,
        }
    }
}

impl GradeRecord {
    /// Same field rules a submission has to pass before it is stored.
    pub fn validate(&self) -> Result<(), GradeValidationError> {
        check_grade_fields(&self.letter_grade, self.credit_hours, self.percentage)
    }
}

fn check_grade_fields(
    letter_grade: &str,
    credit_hours: u32,
    percentage: Option<f64>,
) -> Result<(), GradeValidationError> {
    if letter_grade.trim().is_empty() {
        return Err(GradeValidationError::MissingLetterGrade);
    }

    if !(MIN_CREDIT_HOURS..=MAX_CREDIT_HOURS).contains(&credit_hours) {
        return Err(GradeValidationError::CreditHoursOutOfRange(credit_hours));
    }

    if let Some(percentage) = percentage {
        if !percentage.is_finite() {
            return Err(GradeValidationError::InvalidPercentage);
        }
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeValidationError {
    #[error("letter grade is required")]
    MissingLetterGrade,
    #[error("credit hours must be between 1 and 10 (got {0})")]
    CreditHoursOutOfRange(u32),
    #[error("percentage must be a finite number")]
    InvalidPercentage,
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("malformed dataset: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("grade {grade} is invalid: {source}")]
    InvalidGrade {
        grade: GradeId,
        #[source]
        source: GradeValidationError,
    },
    #[error("course {0} has more than one grade")]
    DuplicateCourseGrade(CourseId),
}

/// Snapshot of a student's records, used to seed a record store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcademicDataset {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub terms: Vec<Term>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub grades: Vec<GradeRecord>,
}

impl AcademicDataset {
    /// Parses a JSON dataset and rejects records a grade save would refuse.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let dataset: Self = serde_json::from_reader(reader)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Every grade passes the submission field rules and no course carries
    /// more than one grade.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut graded = HashSet::with_capacity(self.grades.len());
        for grade in &self.grades {
            grade
                .validate()
                .map_err(|source| DatasetError::InvalidGrade {
                    grade: grade.id,
                    source,
                })?;
            if !graded.insert(grade.course_id) {
                return Err(DatasetError::DuplicateCourseGrade(grade.course_id));
            }
        }
        Ok(())
    }
}
