//! Letter-grade lookup table shared by every GPA and projection calculation.

use super::domain::LetterGrade;
use serde::Serialize;

/// Returned by [`GradeScale::percent_floor_of`] for letters outside the scale.
pub const INVALID_TARGET_PERCENT: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleEntry {
    pub letter: LetterGrade,
    pub points: f64,
    pub percent_floor: f64,
}

const fn entry(letter: LetterGrade, points: f64, percent_floor: f64) -> ScaleEntry {
    ScaleEntry {
        letter,
        points,
        percent_floor,
    }
}

// Descending by percent floor. A+ has no row of its own; it scores as A.
static STANDARD_SCALE: [ScaleEntry; 12] = [
    entry(LetterGrade::A, 4.0, 93.0),
    entry(LetterGrade::AMinus, 3.7, 90.0),
    entry(LetterGrade::BPlus, 3.3, 87.0),
    entry(LetterGrade::B, 3.0, 83.0),
    entry(LetterGrade::BMinus, 2.7, 80.0),
    entry(LetterGrade::CPlus, 2.3, 77.0),
    entry(LetterGrade::C, 2.0, 73.0),
    entry(LetterGrade::CMinus, 1.7, 70.0),
    entry(LetterGrade::DPlus, 1.3, 67.0),
    entry(LetterGrade::D, 1.0, 63.0),
    entry(LetterGrade::DMinus, 0.7, 60.0),
    entry(LetterGrade::F, 0.0, 0.0),
];

/// Immutable mapping from letter grades to grade points and percent floors.
#[derive(Debug, Clone, Copy)]
pub struct GradeScale {
    entries: &'static [ScaleEntry],
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::standard()
    }
}

impl GradeScale {
    pub fn standard() -> Self {
        Self {
            entries: &STANDARD_SCALE,
        }
    }

    pub fn entries(&self) -> &'static [ScaleEntry] {
        self.entries
    }

    pub fn entry(&self, letter: LetterGrade) -> Option<&'static ScaleEntry> {
        let letter = match letter {
            LetterGrade::APlus => LetterGrade::A,
            other => other,
        };
        self.entries.iter().find(|entry| entry.letter == letter)
    }

    /// Grade points for a raw letter. Unknown letters score 0.0 so a bad
    /// grade string never aborts an aggregate.
    pub fn points_of(&self, letter: &str) -> f64 {
        LetterGrade::parse(letter)
            .and_then(|letter| self.entry(letter))
            .map_or(0.0, |entry| entry.points)
    }

    /// Percentage floor for a raw letter, or [`INVALID_TARGET_PERCENT`] when
    /// the letter is not on the scale. Callers must check for the sentinel.
    pub fn percent_floor_of(&self, letter: &str) -> f64 {
        self.target_percent(letter).unwrap_or(INVALID_TARGET_PERCENT)
    }

    /// Typed form of [`percent_floor_of`](Self::percent_floor_of).
    pub fn target_percent(&self, letter: &str) -> Option<f64> {
        LetterGrade::parse(letter)
            .and_then(|letter| self.entry(letter))
            .map(|entry| entry.percent_floor)
    }

    /// Highest letter whose floor the percentage reaches. No rounding is
    /// applied, so 92.99 is an A-.
    pub fn letter_of_percent(&self, percent: f64) -> LetterGrade {
        self.entries
            .iter()
            .find(|entry| percent >= entry.percent_floor)
            .map_or(LetterGrade::F, |entry| entry.letter)
    }
}
