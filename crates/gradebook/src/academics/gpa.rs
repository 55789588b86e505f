use super::domain::{GradeRecord, TermId};
use super::scale::GradeScale;
use serde::Serialize;

/// Anything that carries a letter grade and the credit hours it is worth.
pub trait CreditedGrade {
    fn letter_grade(&self) -> &str;
    fn credit_hours(&self) -> u32;
}

impl CreditedGrade for GradeRecord {
    fn letter_grade(&self) -> &str {
        &self.letter_grade
    }

    fn credit_hours(&self) -> u32 {
        self.credit_hours
    }
}

impl CreditedGrade for (&str, u32) {
    fn letter_grade(&self) -> &str {
        self.0
    }

    fn credit_hours(&self) -> u32 {
        self.1
    }
}

/// Running sums behind a credit-weighted GPA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GpaTally {
    pub grade_point_hours: f64,
    pub credit_hours: u32,
    pub grade_count: usize,
}

impl GpaTally {
    pub fn record(&mut self, points: f64, credit_hours: u32) {
        self.grade_point_hours += points * f64::from(credit_hours);
        self.credit_hours = self.credit_hours.saturating_add(credit_hours);
        self.grade_count = self.grade_count.saturating_add(1);
    }

    pub fn merge(&mut self, other: &GpaTally) {
        self.grade_point_hours += other.grade_point_hours;
        self.credit_hours = self.credit_hours.saturating_add(other.credit_hours);
        self.grade_count = self.grade_count.saturating_add(other.grade_count);
    }

    /// Zero when no credit hours were recorded.
    pub fn gpa(&self) -> f64 {
        if self.credit_hours == 0 {
            0.0
        } else {
            self.grade_point_hours / f64::from(self.credit_hours)
        }
    }
}

/// GPA figures for a single term, as returned by the term GPA query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpaSummary {
    pub term_id: TermId,
    pub gpa: f64,
    pub total_credit_hours: u32,
    pub grade_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GpaAggregator {
    scale: GradeScale,
}

impl GpaAggregator {
    pub fn new(scale: GradeScale) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> &GradeScale {
        &self.scale
    }

    pub fn tally<'a, G, I>(&self, grades: I) -> GpaTally
    where
        G: CreditedGrade + 'a,
        I: IntoIterator<Item = &'a G>,
    {
        let mut tally = GpaTally::default();
        for grade in grades {
            tally.record(
                self.scale.points_of(grade.letter_grade()),
                grade.credit_hours(),
            );
        }
        tally
    }

    /// Credit-weighted mean of grade points. Absent or empty input, and input
    /// whose credit hours sum to zero, yield 0.0.
    pub fn calculate_gpa<G: CreditedGrade>(&self, grades: Option<&[G]>) -> f64 {
        match grades {
            Some(grades) if !grades.is_empty() => self.tally(grades).gpa(),
            _ => 0.0,
        }
    }

    pub fn summarize<G: CreditedGrade>(&self, term_id: TermId, grades: &[G]) -> GpaSummary {
        let tally = self.tally(grades);
        GpaSummary {
            term_id,
            gpa: tally.gpa(),
            total_credit_hours: tally.credit_hours,
            grade_count: tally.grade_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregator() -> GpaAggregator {
        GpaAggregator::default()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_or_absent_input_is_zero() {
        let empty: [(&str, u32); 0] = [];
        assert_eq!(aggregator().calculate_gpa(Some(&empty[..])), 0.0);
        assert_eq!(aggregator().calculate_gpa::<GradeRecord>(None), 0.0);
    }

    #[test]
    fn uniform_grades_average_exactly() {
        let grades: [(&str, u32); 3] = [("A", 3), ("A", 3), ("A", 3)];
        assert_eq!(aggregator().calculate_gpa(Some(&grades[..])), 4.0);
    }

    #[test]
    fn mixed_grades_average_by_points() {
        let grades: [(&str, u32); 3] = [("A", 3), ("B", 3), ("C", 3)];
        assert_close(aggregator().calculate_gpa(Some(&grades[..])), 3.0);
    }

    #[test]
    fn credit_hours_weight_the_average() {
        let grades: [(&str, u32); 2] = [("A", 3), ("C", 1)];
        assert_close(aggregator().calculate_gpa(Some(&grades[..])), 3.5);
    }

    #[test]
    fn zero_credit_hours_do_not_divide_by_zero() {
        let grades: [(&str, u32); 2] = [("A", 0), ("B", 0)];
        assert_eq!(aggregator().calculate_gpa(Some(&grades[..])), 0.0);
    }

    #[test]
    fn unknown_letters_count_as_zero_points() {
        let grades: [(&str, u32); 2] = [("A", 2), ("??", 2)];
        assert_close(aggregator().calculate_gpa(Some(&grades[..])), 2.0);
    }

    #[test]
    fn merged_tallies_match_a_single_pass() {
        let first: [(&str, u32); 1] = [("A", 3)];
        let second: [(&str, u32); 1] = [("C", 9)];
        let mut merged = aggregator().tally(&first);
        merged.merge(&aggregator().tally(&second));

        let combined: [(&str, u32); 2] = [("A", 3), ("C", 9)];
        assert_eq!(merged, aggregator().tally(&combined));
        assert_close(merged.gpa(), 2.5);
    }

    #[test]
    fn hour_totals_saturate_instead_of_overflowing() {
        let grades: [(&str, u32); 2] = [("A", u32::MAX), ("B", 3)];
        let mut tally = aggregator().tally(&grades);
        assert_eq!(tally.credit_hours, u32::MAX);
        assert_eq!(tally.grade_count, 2);

        tally.merge(&aggregator().tally(&grades));
        assert_eq!(tally.credit_hours, u32::MAX);
        assert_eq!(tally.grade_count, 4);
    }

    #[test]
    fn summarize_reports_hours_and_count() {
        let grades: [(&str, u32); 2] = [("B+", 4), ("A-", 3)];
        let summary = aggregator().summarize(TermId(2), &grades);
        assert_eq!(summary.term_id, TermId(2));
        assert_eq!(summary.total_credit_hours, 7);
        assert_eq!(summary.grade_count, 2);
        assert_close(summary.gpa, (3.3 * 4.0 + 3.7 * 3.0) / 7.0);
    }
}
