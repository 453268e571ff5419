//! Read-only filtered views over the store, used to drive the selectors and
//! tables in the TUI. Nothing here mutates the store, and every result keeps
//! the store's insertion order.

use log::debug;

use crate::models::{Grade, Lecture, Student};
use crate::store::Store;

/// Reserved selector value meaning "no restriction". The Korean word is the
/// label existing data files and users know; `all` is accepted as well.
pub const ALL: &str = "전체";

/// Whether `value` is one of the sentinel spellings. The store refuses these
/// as years and lecture names so a real value never reads as "all".
pub fn is_sentinel(value: &str) -> bool {
    value == ALL || value.eq_ignore_ascii_case("all")
}

/// A filter on one field: either anything goes or the value must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    All,
    Only(&'a str),
}

impl<'a> Selector<'a> {
    /// Interpret a selector string, mapping the sentinel values to `All`.
    /// Values are compared as given, without trimming.
    pub fn parse(value: &'a str) -> Self {
        if is_sentinel(value) {
            Selector::All
        } else {
            Selector::Only(value)
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(expected) => *expected == value,
        }
    }
}

/// Lectures held in `year`, or all of them for the sentinel.
pub fn filter_by_year<'s>(store: &'s Store, year: &str) -> Vec<&'s Lecture> {
    let selector = Selector::parse(year);
    store
        .lectures()
        .iter()
        .filter(|lecture| selector.matches(&lecture.year))
        .collect()
}

/// Distinct lecture names for `year` in first-seen order. Feeds the lecture
/// selector that depends on the chosen year.
pub fn lecture_names_for_year(store: &Store, year: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for lecture in filter_by_year(store, year) {
        if !names.contains(&lecture.name) {
            names.push(lecture.name.clone());
        }
    }
    names
}

/// Grades matching both the year and the lecture selector.
pub fn filter_grades<'s>(store: &'s Store, year: &str, lecture_name: &str) -> Vec<&'s Grade> {
    select_grades(store, Selector::parse(year), Selector::parse(lecture_name))
}

/// [`filter_grades`] for callers that already hold typed selectors.
pub fn select_grades<'s>(
    store: &'s Store,
    year: Selector<'_>,
    lecture: Selector<'_>,
) -> Vec<&'s Grade> {
    let grades: Vec<&Grade> = store
        .grades()
        .iter()
        .filter(|grade| year.matches(&grade.year) && lecture.matches(&grade.lecture_name))
        .collect();
    debug!(
        "filter_grades year={year:?} lecture={lecture:?} matched={}",
        grades.len()
    );
    grades
}

/// Distinct lecture years in first-seen order.
pub fn years(store: &Store) -> Vec<String> {
    let mut years: Vec<String> = Vec::new();
    for lecture in store.lectures() {
        if !years.contains(&lecture.year) {
            years.push(lecture.year.clone());
        }
    }
    years
}

/// Students enrolled in `lecture_name`.
pub fn students_for_lecture<'s>(store: &'s Store, lecture_name: &str) -> Vec<&'s Student> {
    store
        .students()
        .iter()
        .filter(|student| student.lecture_name == lecture_name)
        .collect()
}
