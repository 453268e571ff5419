use log::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::models::{Grade, GradeId, Lecture, LectureId, Scores, Student, StudentId};
use crate::query;

/// Counts of records removed by a (possibly cascading) delete, so the UI can
/// tell the user how much went away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removal {
    pub lectures: usize,
    pub students: usize,
    pub grades: usize,
}

/// Owns the three record collections and every rule that ties them together.
///
/// Collections are kept in insertion order because every view in the app
/// (and the file on disk) lists records in the order they were entered.
/// Mutating methods take `&mut self`, which gives each store a single writer
/// for the duration of any add, delete, upsert or load.
#[derive(Debug, Clone)]
pub struct Store {
    lectures: Vec<Lecture>,
    students: Vec<Student>,
    grades: Vec<Grade>,
    next_lecture: u32,
    next_student: u32,
    next_grade: u32,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Store {
    /// Two stores are equal when they hold the same records in the same
    /// order. Id counters are bookkeeping and do not take part.
    fn eq(&self, other: &Self) -> bool {
        self.lectures == other.lectures
            && self.students == other.students
            && self.grades == other.grades
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            lectures: Vec::new(),
            students: Vec::new(),
            grades: Vec::new(),
            next_lecture: 1,
            next_student: 1,
            next_grade: 1,
        }
    }

    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }

    pub fn is_empty(&self) -> bool {
        self.lectures.is_empty() && self.students.is_empty() && self.grades.is_empty()
    }

    pub fn lecture(&self, name: &str) -> Option<&Lecture> {
        self.lectures.iter().find(|lecture| lecture.name == name)
    }

    pub fn student(&self, lecture_name: &str, name: &str) -> Option<&Student> {
        self.students
            .iter()
            .find(|student| student.lecture_name == lecture_name && student.name == name)
    }

    pub fn grade(&self, lecture_name: &str, student_name: &str) -> Option<&Grade> {
        self.grades
            .iter()
            .find(|grade| grade.is_keyed(lecture_name, student_name))
    }

    /// Register a new lecture. Lecture names are the key students and grades
    /// refer to, so a second lecture with the same name is rejected.
    pub fn add_lecture(&mut self, year: &str, name: &str, time: &str) -> StoreResult<Lecture> {
        check_not_reserved("year", year)?;
        check_not_reserved("lecture name", name)?;
        if self.lecture(name).is_some() {
            return Err(StoreError::DuplicateName {
                kind: "Lecture",
                name: name.to_string(),
            });
        }

        let id = allocate(&mut self.next_lecture, "lecture")?;
        let lecture = Lecture {
            id: LectureId(id),
            year: year.to_string(),
            name: name.to_string(),
            time: time.to_string(),
        };
        self.lectures.push(lecture.clone());
        info!("added lecture id={} name={}", lecture.id, lecture.name);
        Ok(lecture)
    }

    /// Remove a lecture together with every student enrolled in it and every
    /// grade recorded under it. The existence check happens before anything is
    /// touched, so a failed call leaves all three collections as they were.
    pub fn delete_lecture(&mut self, name: &str) -> StoreResult<Removal> {
        let Some(index) = self.lectures.iter().position(|lecture| lecture.name == name) else {
            return Err(StoreError::NotFound {
                kind: "Lecture",
                name: name.to_string(),
            });
        };

        self.lectures.remove(index);
        let students = retain_counting(&mut self.students, |s| s.lecture_name != name);
        let grades = retain_counting(&mut self.grades, |g| g.lecture_name != name);

        let removal = Removal {
            lectures: 1,
            students,
            grades,
        };
        info!(
            "deleted lecture name={} cascaded_students={} cascaded_grades={}",
            name, removal.students, removal.grades
        );
        Ok(removal)
    }

    /// Enroll a student in an existing lecture.
    pub fn add_student(
        &mut self,
        lecture_name: &str,
        year: &str,
        name: &str,
        student_number: &str,
    ) -> StoreResult<Student> {
        if self.lecture(lecture_name).is_none() {
            return Err(StoreError::Referential(format!(
                "Lecture '{lecture_name}' does not exist."
            )));
        }
        check_not_reserved("year", year)?;
        if self.student(lecture_name, name).is_some() {
            return Err(StoreError::DuplicateName {
                kind: "Student",
                name: format!("{name} in {lecture_name}"),
            });
        }

        let id = allocate(&mut self.next_student, "student")?;
        let student = Student {
            id: StudentId(id),
            lecture_name: lecture_name.to_string(),
            year: year.to_string(),
            name: name.to_string(),
            student_number: student_number.to_string(),
        };
        self.students.push(student.clone());
        info!(
            "added student id={} lecture={} name={}",
            student.id, student.lecture_name, student.name
        );
        Ok(student)
    }

    /// Remove every student record carrying `name`, in any lecture, and every
    /// grade recorded for that name.
    ///
    /// The match is on the name alone rather than on the lecture/name pair: a
    /// person enrolled in several lectures disappears from all of them.
    pub fn delete_student(&mut self, name: &str) -> StoreResult<Removal> {
        let students = retain_counting(&mut self.students, |s| s.name != name);
        if students == 0 {
            return Err(StoreError::NotFound {
                kind: "Student",
                name: name.to_string(),
            });
        }
        let grades = retain_counting(&mut self.grades, |g| g.student_name != name);

        info!(
            "deleted student name={} records={} cascaded_grades={}",
            name, students, grades
        );
        Ok(Removal {
            lectures: 0,
            students,
            grades,
        })
    }

    /// Record scores for a student in a lecture.
    ///
    /// An existing grade for the pair is overwritten in full (all three
    /// components are replaced), otherwise a new grade is appended with the
    /// student's year. Derived fields are recomputed either way.
    pub fn upsert_grade(
        &mut self,
        lecture_name: &str,
        student_name: &str,
        scores: Scores,
    ) -> StoreResult<Grade> {
        let Some(student) = self.student(lecture_name, student_name) else {
            return Err(StoreError::Referential(format!(
                "Student '{student_name}' is not enrolled in '{lecture_name}'."
            )));
        };
        let year = student.year.clone();

        if let Some(grade) = self
            .grades
            .iter_mut()
            .find(|grade| grade.is_keyed(lecture_name, student_name))
        {
            grade.set_scores(scores);
            info!(
                "updated grade id={} lecture={} student={} total={}",
                grade.id,
                lecture_name,
                student_name,
                grade.total()
            );
            return Ok(grade.clone());
        }

        let id = allocate(&mut self.next_grade, "grade")?;
        let grade = Grade::new(
            GradeId(id),
            lecture_name.to_string(),
            year,
            student_name.to_string(),
            scores,
        );
        self.grades.push(grade.clone());
        info!(
            "added grade id={} lecture={} student={} total={}",
            grade.id,
            lecture_name,
            student_name,
            grade.total()
        );
        Ok(grade)
    }

    /// Drop every record and reset the id counters.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Swap in a fully built store, e.g. one freshly decoded from disk.
    pub fn replace_with(&mut self, other: Store) {
        debug!(
            "replacing store: lectures={} students={} grades={}",
            other.lectures.len(),
            other.students.len(),
            other.grades.len()
        );
        *self = other;
    }

    /// Append a lecture read from disk, keeping its stored id.
    pub(crate) fn insert_lecture(&mut self, lecture: Lecture) -> StoreResult<()> {
        check_not_reserved("year", &lecture.year)?;
        check_not_reserved("lecture name", &lecture.name)?;
        if self.lecture(&lecture.name).is_some() {
            return Err(StoreError::DuplicateName {
                kind: "Lecture",
                name: lecture.name,
            });
        }
        self.next_lecture = advance_past(self.next_lecture, lecture.id.0, "lecture")?;
        self.lectures.push(lecture);
        Ok(())
    }

    /// Append a student read from disk. The lecture must already be loaded.
    pub(crate) fn insert_student(&mut self, student: Student) -> StoreResult<()> {
        if self.lecture(&student.lecture_name).is_none() {
            return Err(StoreError::Referential(format!(
                "student '{}' refers to unknown lecture '{}'",
                student.name, student.lecture_name
            )));
        }
        check_not_reserved("year", &student.year)?;
        if self.student(&student.lecture_name, &student.name).is_some() {
            return Err(StoreError::DuplicateName {
                kind: "Student",
                name: format!("{} in {}", student.name, student.lecture_name),
            });
        }
        self.next_student = advance_past(self.next_student, student.id.0, "student")?;
        self.students.push(student);
        Ok(())
    }

    /// Append a grade read from disk. The student must already be loaded and
    /// the lecture/student pair must not have a grade yet.
    pub(crate) fn insert_grade(&mut self, grade: Grade) -> StoreResult<()> {
        if self
            .student(&grade.lecture_name, &grade.student_name)
            .is_none()
        {
            return Err(StoreError::Referential(format!(
                "grade refers to unknown student '{}' in '{}'",
                grade.student_name, grade.lecture_name
            )));
        }
        if self
            .grade(&grade.lecture_name, &grade.student_name)
            .is_some()
        {
            return Err(StoreError::DuplicateName {
                kind: "Grade",
                name: format!("{} in {}", grade.student_name, grade.lecture_name),
            });
        }
        self.next_grade = advance_past(self.next_grade, grade.id.0, "grade")?;
        self.grades.push(grade);
        Ok(())
    }
}

/// Hand out the id at `counter` and move the counter on. The last `u32` is
/// never handed out, so a counter that cannot advance is reported instead.
fn allocate(counter: &mut u32, kind: &'static str) -> StoreResult<u32> {
    let id = *counter;
    *counter = id.checked_add(1).ok_or(StoreError::IdsExhausted { kind })?;
    Ok(id)
}

/// Counter value after a record with `id` was loaded.
fn advance_past(counter: u32, id: u32, kind: &'static str) -> StoreResult<u32> {
    let after = id.checked_add(1).ok_or(StoreError::IdsExhausted { kind })?;
    Ok(counter.max(after))
}

/// Years and lecture names end up as filter values, so the "all" sentinel
/// cannot be one of them.
fn check_not_reserved(field: &'static str, value: &str) -> StoreResult<()> {
    if query::is_sentinel(value) {
        return Err(StoreError::Reserved {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// `Vec::retain` that reports how many elements were dropped.
fn retain_counting<T>(items: &mut Vec<T>, keep: impl FnMut(&T) -> bool) -> usize {
    let before = items.len();
    items.retain(keep);
    before - items.len()
}
