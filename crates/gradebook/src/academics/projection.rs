use super::domain::CourseId;
use super::scale::GradeScale;
use serde::Serialize;

/// Score needed on a course's remaining weighted component to reach a target
/// letter grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub course_id: CourseId,
    pub current_grade: f64,
    pub final_weight: f64,
    pub target_grade: String,
    pub target_percent: f64,
    pub needed_on_final: f64,
    pub is_achievable: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("final weight must be between 0 and 1 (got {0})")]
    InvalidFinalWeight(f64),
    #[error("invalid target grade '{0}'")]
    InvalidTargetGrade(String),
    #[error("percentages must be finite numbers (got {0})")]
    InvalidPercent(f64),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionCalculator {
    scale: GradeScale,
}

impl ProjectionCalculator {
    pub fn new(scale: GradeScale) -> Self {
        Self { scale }
    }

    /// Percentage needed on the remaining component, unclamped. Results above
    /// 100 or below 0 are returned as computed.
    pub fn project_needed(
        &self,
        current_percent: f64,
        final_weight: f64,
        target_percent: f64,
    ) -> Result<f64, ProjectionError> {
        // Negated so NaN is rejected too.
        if !(final_weight > 0.0 && final_weight <= 1.0) {
            return Err(ProjectionError::InvalidFinalWeight(final_weight));
        }
        if let Some(percent) = [current_percent, target_percent]
            .into_iter()
            .find(|percent| !percent.is_finite())
        {
            return Err(ProjectionError::InvalidPercent(percent));
        }

        Ok((target_percent - current_percent * (1.0 - final_weight)) / final_weight)
    }

    pub fn project_for_letter_target(
        &self,
        course_id: CourseId,
        current_percent: f64,
        final_weight: f64,
        target_letter: &str,
    ) -> Result<ProjectionResult, ProjectionError> {
        let target_percent = self
            .scale
            .target_percent(target_letter)
            .ok_or_else(|| ProjectionError::InvalidTargetGrade(target_letter.to_string()))?;
        let needed_on_final = self.project_needed(current_percent, final_weight, target_percent)?;

        Ok(ProjectionResult {
            course_id,
            current_grade: current_percent,
            final_weight,
            target_grade: target_letter.to_string(),
            target_percent,
            needed_on_final,
            is_achievable: (0.0..=100.0).contains(&needed_on_final),
        })
    }
}
