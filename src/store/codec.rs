//! Text format used for the data file.
//!
//! The document is three sections in fixed order, each introduced by a marker
//! line, with one `|`-separated record per line:
//!
//! ```text
//! #LECTURES
//! id|year|name|time
//! #STUDENTS
//! id|lectureName|year|name|studentId
//! #GRADES
//! id|lectureName|year|studentName|midterm|finalExam|assignment|total|average
//! ```
//!
//! There is no escaping, so a `|` inside a value cannot be represented. The
//! TUI forms refuse the character for that reason.

use std::fmt::Write as _;
use std::str::FromStr;

use log::warn;

use crate::error::{StoreError, StoreResult};
use crate::grading;
use crate::models::{Grade, GradeId, Lecture, LectureId, Scores, Student, StudentId};

use super::records::Store;

const LECTURES_MARKER: &str = "#LECTURES";
const STUDENTS_MARKER: &str = "#STUDENTS";
const GRADES_MARKER: &str = "#GRADES";

const SEPARATOR: char = '|';

const LECTURE_FIELDS: usize = 4;
const STUDENT_FIELDS: usize = 5;
const GRADE_FIELDS: usize = 9;

/// Which block of the document the decoder is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Lectures,
    Students,
    Grades,
}

impl Section {
    fn from_marker(line: &str) -> Self {
        match line.trim_end() {
            LECTURES_MARKER => Section::Lectures,
            STUDENTS_MARKER => Section::Students,
            GRADES_MARKER => Section::Grades,
            _ => Section::None,
        }
    }
}

/// Serialize every record in the store.
pub fn encode(store: &Store) -> String {
    let mut out = String::new();

    out.push_str(LECTURES_MARKER);
    out.push('\n');
    for lecture in store.lectures() {
        let _ = writeln!(
            out,
            "{}|{}|{}|{}",
            lecture.id, lecture.year, lecture.name, lecture.time
        );
    }

    out.push_str(STUDENTS_MARKER);
    out.push('\n');
    for student in store.students() {
        let _ = writeln!(
            out,
            "{}|{}|{}|{}|{}",
            student.id, student.lecture_name, student.year, student.name, student.student_number
        );
    }

    out.push_str(GRADES_MARKER);
    out.push('\n');
    for grade in store.grades() {
        let _ = writeln!(
            out,
            "{}|{}|{}|{}|{}|{}|{}|{}|{:.2}",
            grade.id,
            grade.lecture_name,
            grade.year,
            grade.student_name,
            grade.midterm(),
            grade.final_exam(),
            grade.assignment(),
            grade.total(),
            grade.average()
        );
    }

    out
}

/// Parse a whole document into a fresh store.
///
/// Any malformed record fails the entire decode; nothing is skipped. Lines
/// ahead of the first marker and blank lines are ignored.
pub fn decode(text: &str) -> StoreResult<Store> {
    let mut store = Store::new();
    let mut section = Section::None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');

        if line.starts_with('#') {
            section = Section::from_marker(line);
            if section == Section::None {
                warn!("ignoring unknown section marker {line:?} at line {line_no}");
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let result = match section {
            Section::None => Ok(()),
            Section::Lectures => {
                let lecture = parse_lecture(line_no, line)?;
                store.insert_lecture(lecture)
            }
            Section::Students => {
                let student = parse_student(line_no, line)?;
                store.insert_student(student)
            }
            Section::Grades => {
                let grade = parse_grade(line_no, line)?;
                store.insert_grade(grade)
            }
        };
        result.map_err(|err| StoreError::parse(line_no, err.to_string()))?;
    }

    Ok(store)
}

fn split_fields(line_no: usize, line: &str, expected: usize, what: &str) -> StoreResult<Vec<String>> {
    let fields: Vec<String> = line.split(SEPARATOR).map(str::to_string).collect();
    if fields.len() != expected {
        return Err(StoreError::parse(
            line_no,
            format!(
                "{what} record needs {expected} fields, found {}",
                fields.len()
            ),
        ));
    }
    Ok(fields)
}

fn parse_number<T: FromStr>(line_no: usize, field: &str, value: &str) -> StoreResult<T> {
    value.trim().parse::<T>().map_err(|_| {
        StoreError::parse(line_no, format!("{field} is not a valid number: {value:?}"))
    })
}

fn parse_lecture(line_no: usize, line: &str) -> StoreResult<Lecture> {
    let mut fields = split_fields(line_no, line, LECTURE_FIELDS, "lecture")?.into_iter();
    let id = parse_number(line_no, "lecture id", &next(&mut fields))?;
    Ok(Lecture {
        id: LectureId(id),
        year: next(&mut fields),
        name: next(&mut fields),
        time: next(&mut fields),
    })
}

fn parse_student(line_no: usize, line: &str) -> StoreResult<Student> {
    let mut fields = split_fields(line_no, line, STUDENT_FIELDS, "student")?.into_iter();
    let id = parse_number(line_no, "student id", &next(&mut fields))?;
    Ok(Student {
        id: StudentId(id),
        lecture_name: next(&mut fields),
        year: next(&mut fields),
        name: next(&mut fields),
        student_number: next(&mut fields),
    })
}

fn parse_grade(line_no: usize, line: &str) -> StoreResult<Grade> {
    let fields = split_fields(line_no, line, GRADE_FIELDS, "grade")?;
    let id = parse_number(line_no, "grade id", &fields[0])?;
    let scores = Scores {
        midterm: parse_number(line_no, "midterm", &fields[4])?,
        final_exam: parse_number(line_no, "final exam", &fields[5])?,
        assignment: parse_number(line_no, "assignment", &fields[6])?,
    };
    let stored_total: i64 = parse_number(line_no, "total", &fields[7])?;
    let stored_average: f64 = parse_number(line_no, "average", &fields[8])?;

    let grade = Grade::new(
        GradeId(id),
        fields[1].clone(),
        fields[2].clone(),
        fields[3].clone(),
        scores,
    );
    if grade.total() != stored_total || !grading::same_average(grade.average(), stored_average) {
        warn!(
            "line {line_no}: stored total/average {stored_total}/{stored_average} disagree with scores, using {}/{}",
            grade.total(),
            grade.average()
        );
    }
    Ok(grade)
}

/// Pull the next field from a vector already checked for length.
fn next(fields: &mut std::vec::IntoIter<String>) -> String {
    fields.next().unwrap_or_default()
}
