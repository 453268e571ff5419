use crate::query::{self, ALL};
use crate::store::Store;

/// The four tabs across the top of the window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tab {
    Lectures,
    Students,
    GradeEntry,
    GradeQuery,
}

impl Tab {
    pub(crate) const ALL: [Tab; 4] = [
        Tab::Lectures,
        Tab::Students,
        Tab::GradeEntry,
        Tab::GradeQuery,
    ];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Lectures => "1 Lectures",
            Tab::Students => "2 Students",
            Tab::GradeEntry => "3 Grade Entry",
            Tab::GradeQuery => "4 Grade Query",
        }
    }

    pub(crate) fn index(self) -> usize {
        Tab::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    pub(crate) fn from_digit(ch: char) -> Option<Tab> {
        let index = ch.to_digit(10)? as usize;
        index.checked_sub(1).and_then(|i| Tab::ALL.get(i).copied())
    }

    pub(crate) fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub(crate) fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Row selection for a table whose length can change underneath it.
#[derive(Default, Clone, Copy)]
pub(crate) struct ListCursor {
    pub(crate) selected: usize,
}

impl ListCursor {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = len as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, max) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    pub(crate) fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

/// Step through `options` starting from `current`, wrapping at both ends.
/// An unknown current value restarts at the first option.
fn cycle(options: &[String], current: &str, offset: isize) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let len = options.len() as isize;
    let next = match options.iter().position(|option| option == current) {
        Some(index) => (index as isize + offset).rem_euclid(len),
        None => 0,
    };
    options.get(next as usize).cloned()
}

/// Grade entry tab: one lecture at a time, listing its students.
#[derive(Default)]
pub(crate) struct GradeEntryScreen {
    pub(crate) lecture: Option<String>,
    pub(crate) cursor: ListCursor,
}

impl GradeEntryScreen {
    /// Keep the chosen lecture valid after the store changed.
    pub(crate) fn sync(&mut self, store: &Store) {
        let still_exists = self
            .lecture
            .as_deref()
            .is_some_and(|name| store.lecture(name).is_some());
        if !still_exists {
            self.lecture = store.lectures().first().map(|l| l.name.clone());
            self.cursor = ListCursor::default();
        }
        let len = self.student_count(store);
        self.cursor.clamp(len);
    }

    pub(crate) fn cycle_lecture(&mut self, store: &Store, offset: isize) {
        let names: Vec<String> = store.lectures().iter().map(|l| l.name.clone()).collect();
        let current = self.lecture.clone().unwrap_or_default();
        self.lecture = cycle(&names, &current, offset);
        self.cursor = ListCursor::default();
    }

    pub(crate) fn student_count(&self, store: &Store) -> usize {
        self.lecture
            .as_deref()
            .map(|name| query::students_for_lecture(store, name).len())
            .unwrap_or(0)
    }
}

/// Grade query tab: year and lecture selectors over the grade table.
pub(crate) struct GradeQueryScreen {
    pub(crate) year: String,
    pub(crate) lecture: String,
    pub(crate) cursor: ListCursor,
}

impl Default for GradeQueryScreen {
    fn default() -> Self {
        Self {
            year: ALL.to_string(),
            lecture: ALL.to_string(),
            cursor: ListCursor::default(),
        }
    }
}

impl GradeQueryScreen {
    /// Year options, sentinel first.
    pub(crate) fn year_options(store: &Store) -> Vec<String> {
        let mut options = vec![ALL.to_string()];
        options.extend(query::years(store));
        options
    }

    /// Lecture options for the chosen year, sentinel first.
    pub(crate) fn lecture_options(&self, store: &Store) -> Vec<String> {
        let mut options = vec![ALL.to_string()];
        options.extend(query::lecture_names_for_year(store, &self.year));
        options
    }

    pub(crate) fn cycle_year(&mut self, store: &Store) {
        let options = Self::year_options(store);
        self.year = cycle(&options, &self.year, 1).unwrap_or_else(|| ALL.to_string());
        self.lecture = ALL.to_string();
        self.cursor = ListCursor::default();
    }

    pub(crate) fn cycle_lecture(&mut self, store: &Store) {
        let options = self.lecture_options(store);
        self.lecture = cycle(&options, &self.lecture, 1).unwrap_or_else(|| ALL.to_string());
        self.cursor = ListCursor::default();
    }

    /// Fall back to the sentinel for selections that no longer exist.
    pub(crate) fn sync(&mut self, store: &Store) {
        if !Self::year_options(store).contains(&self.year) {
            self.year = ALL.to_string();
        }
        if !self.lecture_options(store).contains(&self.lecture) {
            self.lecture = ALL.to_string();
        }
        let len = query::filter_grades(store, &self.year, &self.lecture).len();
        self.cursor.clamp(len);
    }
}
