use anyhow::{anyhow, Context, Result};
use ratatui::text::Line;

use crate::models::Scores;

use super::helpers::field_line;

/// Characters allowed in free-text fields. `|` is the data file's field
/// separator and has no escape, so it is refused at input time.
fn accepts_text_char(ch: char) -> bool {
    !ch.is_control() && ch != '|'
}

/// Score fields take digits plus a single leading minus sign.
fn push_score_char(value: &mut String, ch: char) -> bool {
    if ch.is_ascii_digit() || (ch == '-' && value.is_empty()) {
        value.push(ch);
        true
    } else {
        false
    }
}

fn required(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(anyhow!("{message}"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Internal representation of the "add lecture" form fields.
#[derive(Default, Clone)]
pub(crate) struct LectureForm {
    pub(crate) year: String,
    pub(crate) name: String,
    pub(crate) time: String,
    pub(crate) active: LectureField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub(crate) enum LectureField {
    #[default]
    Year,
    Name,
    Time,
}

impl LectureForm {
    /// Seed the year with the most recently used one so a term's lectures can
    /// be typed in quickly.
    pub(crate) fn with_year(year: Option<&str>) -> Self {
        let mut form = Self::default();
        if let Some(year) = year {
            form.year = year.to_string();
            form.active = LectureField::Name;
        }
        form
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            LectureField::Year => LectureField::Name,
            LectureField::Name => LectureField::Time,
            LectureField::Time => LectureField::Year,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            LectureField::Year => LectureField::Time,
            LectureField::Name => LectureField::Year,
            LectureField::Time => LectureField::Name,
        };
    }

    fn value_mut(&mut self, field: LectureField) -> &mut String {
        match field {
            LectureField::Year => &mut self.year,
            LectureField::Name => &mut self.name,
            LectureField::Time => &mut self.time,
        }
    }

    fn value(&self, field: LectureField) -> &str {
        match field {
            LectureField::Year => &self.year,
            LectureField::Name => &self.name,
            LectureField::Time => &self.time,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if !accepts_text_char(ch) {
            return false;
        }
        let field = self.active;
        self.value_mut(field).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Validate the inputs and return `(year, name, time)`.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String, String)> {
        let year = required(&self.year, "Year is required.")?;
        let name = required(&self.name, "Lecture name is required.")?;
        Ok((year, name, self.time.trim().to_string()))
    }

    pub(crate) fn build_line(&self, label: &str, field: LectureField) -> Line<'static> {
        let placeholder = if field == LectureField::Time {
            "<optional>"
        } else {
            "<required>"
        };
        field_line(label, self.value(field), self.active == field, placeholder)
    }

    pub(crate) fn value_len(&self, field: LectureField) -> usize {
        self.value(field).chars().count()
    }
}

/// Form state for enrolling a student. The lecture is picked from the
/// lectures that exist rather than typed, which keeps enrollments pointing at
/// real lectures.
#[derive(Clone)]
pub(crate) struct StudentForm {
    /// `(name, year)` of every lecture the student can be enrolled in.
    lectures: Vec<(String, String)>,
    lecture_index: usize,
    pub(crate) year: String,
    pub(crate) name: String,
    pub(crate) number: String,
    pub(crate) active: StudentField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum StudentField {
    Lecture,
    Year,
    Name,
    Number,
}

impl StudentForm {
    pub(crate) fn new(lectures: Vec<(String, String)>, preferred: Option<&str>) -> Self {
        let lecture_index = preferred
            .and_then(|name| lectures.iter().position(|(lecture, _)| lecture == name))
            .unwrap_or(0);
        let year = lectures
            .get(lecture_index)
            .map(|(_, year)| year.clone())
            .unwrap_or_default();
        Self {
            lectures,
            lecture_index,
            year,
            name: String::new(),
            number: String::new(),
            active: StudentField::Name,
            error: None,
        }
    }

    pub(crate) fn lecture(&self) -> Option<&str> {
        self.lectures
            .get(self.lecture_index)
            .map(|(name, _)| name.as_str())
    }

    /// Step through the available lectures. The year follows the lecture.
    pub(crate) fn cycle_lecture(&mut self, offset: isize) {
        if self.lectures.is_empty() {
            return;
        }
        let len = self.lectures.len() as isize;
        let next = (self.lecture_index as isize + offset).rem_euclid(len);
        self.lecture_index = next as usize;
        self.year = self.lectures[self.lecture_index].1.clone();
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            StudentField::Lecture => StudentField::Year,
            StudentField::Year => StudentField::Name,
            StudentField::Name => StudentField::Number,
            StudentField::Number => StudentField::Lecture,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            StudentField::Lecture => StudentField::Number,
            StudentField::Year => StudentField::Lecture,
            StudentField::Name => StudentField::Year,
            StudentField::Number => StudentField::Name,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if !accepts_text_char(ch) {
            return false;
        }
        match self.active {
            StudentField::Lecture => return false,
            StudentField::Year => self.year.push(ch),
            StudentField::Name => self.name.push(ch),
            StudentField::Number => self.number.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            StudentField::Lecture => {}
            StudentField::Year => {
                self.year.pop();
            }
            StudentField::Name => {
                self.name.pop();
            }
            StudentField::Number => {
                self.number.pop();
            }
        }
    }

    /// Validate the inputs and return `(lecture, year, name, student_number)`.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String, String, String)> {
        let lecture = self
            .lecture()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Add a lecture before enrolling students."))?;
        let year = required(&self.year, "Year is required.")?;
        let name = required(&self.name, "Student name is required.")?;
        let number = required(&self.number, "Student number is required.")?;
        Ok((lecture, year, name, number))
    }

    pub(crate) fn build_line(&self, label: &str, field: StudentField) -> Line<'static> {
        let is_active = self.active == field;
        match field {
            StudentField::Lecture => {
                let value = self
                    .lecture()
                    .map(|name| format!("< {name} >"))
                    .unwrap_or_default();
                field_line(label, &value, is_active, "<no lectures>")
            }
            StudentField::Year => field_line(label, &self.year, is_active, "<required>"),
            StudentField::Name => field_line(label, &self.name, is_active, "<required>"),
            StudentField::Number => field_line(label, &self.number, is_active, "<required>"),
        }
    }

    pub(crate) fn value_len(&self, field: StudentField) -> usize {
        match field {
            StudentField::Lecture => self.lecture().map(|n| n.chars().count() + 4).unwrap_or(0),
            StudentField::Year => self.year.chars().count(),
            StudentField::Name => self.name.chars().count(),
            StudentField::Number => self.number.chars().count(),
        }
    }
}

/// Score entry for one student in one lecture. Submitting always sends all
/// three scores; a blank field counts as zero.
#[derive(Clone)]
pub(crate) struct ScoreForm {
    pub(crate) lecture: String,
    pub(crate) student: String,
    pub(crate) midterm: String,
    pub(crate) final_exam: String,
    pub(crate) assignment: String,
    pub(crate) active: ScoreField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum ScoreField {
    Midterm,
    FinalExam,
    Assignment,
}

impl ScoreForm {
    /// Open the form, prefilled with the student's current scores if any.
    pub(crate) fn new(lecture: &str, student: &str, existing: Option<Scores>) -> Self {
        let (midterm, final_exam, assignment) = match existing {
            Some(scores) => (
                scores.midterm.to_string(),
                scores.final_exam.to_string(),
                scores.assignment.to_string(),
            ),
            None => Default::default(),
        };
        Self {
            lecture: lecture.to_string(),
            student: student.to_string(),
            midterm,
            final_exam,
            assignment,
            active: ScoreField::Midterm,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            ScoreField::Midterm => ScoreField::FinalExam,
            ScoreField::FinalExam => ScoreField::Assignment,
            ScoreField::Assignment => ScoreField::Midterm,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            ScoreField::Midterm => ScoreField::Assignment,
            ScoreField::FinalExam => ScoreField::Midterm,
            ScoreField::Assignment => ScoreField::FinalExam,
        };
    }

    fn value_mut(&mut self, field: ScoreField) -> &mut String {
        match field {
            ScoreField::Midterm => &mut self.midterm,
            ScoreField::FinalExam => &mut self.final_exam,
            ScoreField::Assignment => &mut self.assignment,
        }
    }

    fn value(&self, field: ScoreField) -> &str {
        match field {
            ScoreField::Midterm => &self.midterm,
            ScoreField::FinalExam => &self.final_exam,
            ScoreField::Assignment => &self.assignment,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let field = self.active;
        push_score_char(self.value_mut(field), ch)
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    pub(crate) fn parse_inputs(&self) -> Result<Scores> {
        Ok(Scores {
            midterm: parse_score(&self.midterm, "Midterm")?,
            final_exam: parse_score(&self.final_exam, "Final exam")?,
            assignment: parse_score(&self.assignment, "Assignment")?,
        })
    }

    pub(crate) fn build_line(&self, label: &str, field: ScoreField) -> Line<'static> {
        field_line(label, self.value(field), self.active == field, "0")
    }

    pub(crate) fn value_len(&self, field: ScoreField) -> usize {
        self.value(field).chars().count()
    }
}

fn parse_score(raw: &str, label: &str) -> Result<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i32>()
        .with_context(|| format!("{label} must be a whole number."))
}

/// What a pending delete confirmation is about to remove.
#[derive(Clone)]
pub(crate) enum DeleteTarget {
    Lecture(String),
    Student(String),
}

/// State for the delete confirmation dialog, including how many dependent
/// records the cascade will take with it.
#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) target: DeleteTarget,
    pub(crate) students: usize,
    pub(crate) grades: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lecture_form_requires_year_and_name() {
        let mut form = LectureForm::default();
        assert!(form.parse_inputs().is_err());
        for ch in "2024".chars() {
            form.push_char(ch);
        }
        form.toggle_field();
        assert!(form.parse_inputs().is_err());
        for ch in " OS ".chars() {
            form.push_char(ch);
        }
        let (year, name, time) = form.parse_inputs().unwrap();
        assert_eq!((year.as_str(), name.as_str(), time.as_str()), ("2024", "OS", ""));
    }

    #[test]
    fn text_fields_refuse_separator() {
        let mut form = LectureForm::with_year(Some("2024"));
        assert!(!form.push_char('|'));
        assert!(form.push_char('A'));
        assert_eq!(form.name, "A");
    }

    #[test]
    fn student_form_follows_lecture_year() {
        let lectures = vec![
            ("OS".to_string(), "2024".to_string()),
            ("AI".to_string(), "2025".to_string()),
        ];
        let mut form = StudentForm::new(lectures, Some("AI"));
        assert_eq!(form.lecture(), Some("AI"));
        assert_eq!(form.year, "2025");
        form.cycle_lecture(1);
        assert_eq!(form.lecture(), Some("OS"));
        assert_eq!(form.year, "2024");
        form.cycle_lecture(-1);
        assert_eq!(form.lecture(), Some("AI"));
    }

    #[test]
    fn student_form_without_lectures_fails() {
        let mut form = StudentForm::new(Vec::new(), None);
        form.name = "Kim".into();
        form.number = "1".into();
        form.year = "2024".into();
        assert!(form.parse_inputs().is_err());
    }

    #[test]
    fn blank_scores_count_as_zero() {
        let mut form = ScoreForm::new("OS", "Lee", None);
        for ch in "80".chars() {
            form.push_char(ch);
        }
        let scores = form.parse_inputs().unwrap();
        assert_eq!(scores, Scores::new(80, 0, 0));
    }

    #[test]
    fn score_fields_accept_leading_minus_only() {
        let mut form = ScoreForm::new("OS", "Lee", Some(Scores::new(1, 2, 3)));
        form.midterm.clear();
        assert!(form.push_char('-'));
        assert!(form.push_char('5'));
        assert!(!form.push_char('-'));
        assert!(!form.push_char('x'));
        assert_eq!(form.parse_inputs().unwrap(), Scores::new(-5, 2, 3));
    }

    #[test]
    fn lone_minus_is_rejected() {
        let mut form = ScoreForm::new("OS", "Lee", None);
        form.push_char('-');
        assert!(form.parse_inputs().is_err());
    }
}
