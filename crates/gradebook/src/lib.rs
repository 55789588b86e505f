//! Grade-point computation and academic reporting.
//!
//! The [`academics`] module holds the grade scale, GPA aggregation, grade
//! projection, and the term/transcript report builders and CSV formatter. The
//! remaining modules carry the service plumbing shared with `gradebook-api`.

pub mod academics;
pub mod config;
pub mod error;
pub mod telemetry;
