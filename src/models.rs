//! Domain records shared by the store, the file codec, and the TUI. These stay
//! plain data holders; the rules that bind them together live in
//! [`crate::store::Store`] so no record can be built into an inconsistent
//! state from outside the store.

use std::fmt;

use crate::grading;

/// Sequence number assigned to a lecture when it enters the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LectureId(pub u32);

/// Sequence number assigned to a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentId(pub u32);

/// Sequence number assigned to a grade record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GradeId(pub u32);

macro_rules! display_id {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        })*
    };
}

display_id!(LectureId, StudentId, GradeId);

#[derive(Debug, Clone, PartialEq)]
/// A course offering. The `name` doubles as the natural key other records use
/// to point at it, so the store keeps it unique.
pub struct Lecture {
    pub id: LectureId,
    /// Academic year the lecture belongs to, kept as free text ("2024").
    pub year: String,
    pub name: String,
    /// Free-form schedule text such as "Mon 10:00".
    pub time: String,
}

impl fmt::Display for Lecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One enrollment: a student attending a single lecture. The same person
/// enrolled in two lectures shows up as two records.
pub struct Student {
    pub id: StudentId,
    /// Name of the lecture this enrollment belongs to.
    pub lecture_name: String,
    pub year: String,
    /// Unique only within `lecture_name`.
    pub name: String,
    /// School-issued student number, stored verbatim.
    pub student_number: String,
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.student_number)
    }
}

/// The three component scores a grade is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scores {
    pub midterm: i32,
    pub final_exam: i32,
    pub assignment: i32,
}

impl Scores {
    pub fn new(midterm: i32, final_exam: i32, assignment: i32) -> Self {
        Self {
            midterm,
            final_exam,
            assignment,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// The single score record for a `(lecture_name, student_name)` pair.
///
/// `total` and `average` are derived from [`Scores`] and are only reachable
/// through accessors so callers cannot set them out of step with the
/// components.
pub struct Grade {
    pub id: GradeId,
    pub lecture_name: String,
    pub year: String,
    pub student_name: String,
    scores: Scores,
    total: i64,
    average: f64,
}

impl Grade {
    /// Build a grade and compute its derived fields.
    pub(crate) fn new(
        id: GradeId,
        lecture_name: String,
        year: String,
        student_name: String,
        scores: Scores,
    ) -> Self {
        let mut grade = Self {
            id,
            lecture_name,
            year,
            student_name,
            scores,
            total: 0,
            average: 0.0,
        };
        grade.set_scores(scores);
        grade
    }

    /// Overwrite all three components and recompute `total` and `average`.
    pub(crate) fn set_scores(&mut self, scores: Scores) {
        self.scores = scores;
        self.total = grading::total(scores);
        self.average = grading::average(self.total);
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn midterm(&self) -> i32 {
        self.scores.midterm
    }

    pub fn final_exam(&self) -> i32 {
        self.scores.final_exam
    }

    pub fn assignment(&self) -> i32 {
        self.scores.assignment
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn average(&self) -> f64 {
        self.average
    }

    /// Whether this grade belongs to the given lecture/student pair.
    pub fn is_keyed(&self, lecture_name: &str, student_name: &str) -> bool {
        self.lecture_name == lecture_name && self.student_name == student_name
    }
}
