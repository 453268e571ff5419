use std::mem;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use log::{info, warn};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use ratatui::Frame;

use crate::query::{self, Selector};
use crate::store::{load_into, save_store, Store};

use super::forms::{
    ConfirmDelete, DeleteTarget, LectureField, LectureForm, ScoreField, ScoreForm, StudentField,
    StudentForm,
};
use super::helpers::{centered_rect, format_average, surface_error};
use super::screens::{GradeEntryScreen, GradeQueryScreen, ListCursor, Tab};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the tab bar.
const TABS_HEIGHT: u16 = 3;
/// Rows moved by PageUp/PageDown.
const PAGE: isize = 5;

const ABOUT_TEXT: [&str; 3] = [
    "Grade Manager",
    "Tracks lectures, enrolled students, and their grades for a term.",
    "Data is kept in a plain text file and saved on request.",
];

/// Modal states layered over the current tab.
enum Mode {
    Normal,
    AddingLecture(LectureForm),
    AddingStudent(StudentForm),
    EnteringScores(ScoreForm),
    ConfirmDelete(ConfirmDelete),
    About,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: Store,
    data_file: PathBuf,
    tab: Tab,
    lectures: ListCursor,
    students: ListCursor,
    entry: GradeEntryScreen,
    grade_query: GradeQueryScreen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: Store, data_file: PathBuf) -> Self {
        let mut app = Self {
            store,
            data_file,
            tab: Tab::Lectures,
            lectures: ListCursor::default(),
            students: ListCursor::default(),
            entry: GradeEntryScreen::default(),
            grade_query: GradeQueryScreen::default(),
            mode: Mode::Normal,
            status: None,
        };
        app.sync_views();
        app
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Current footer message, if any.
    pub fn status(&self) -> Option<(&str, StatusKind)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.kind))
    }

    /// Show a message in the footer.
    pub fn notify(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.set_status(text, kind);
    }

    /// Whether a dialog or form is open on top of the tab.
    pub fn has_modal(&self) -> bool {
        !matches!(self.mode, Mode::Normal)
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingLecture(form) => self.handle_add_lecture(code, form),
            Mode::AddingStudent(form) => self.handle_add_student(code, form),
            Mode::EnteringScores(form) => self.handle_scores(code, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::About => Mode::Normal,
        };

        Ok(exit)
    }

    /// Write the store to the data file.
    pub fn save(&mut self) -> Result<()> {
        match save_store(&self.store, &self.data_file) {
            Ok(()) => {
                self.set_status(
                    format!("Saved to {}.", self.data_file.display()),
                    StatusKind::Info,
                );
            }
            Err(err) => {
                warn!("save failed: {err}");
                self.set_status(format!("Save failed: {err}"), StatusKind::Error);
            }
        }
        Ok(())
    }

    /// Replace the in-memory records with the data file's contents. On any
    /// failure the records on screen stay as they were.
    pub fn reload(&mut self) -> Result<()> {
        match load_into(&mut self.store, &self.data_file) {
            Ok(()) => {
                self.sync_views();
                self.set_status(
                    format!("Loaded {}.", self.data_file.display()),
                    StatusKind::Info,
                );
            }
            Err(err) => {
                warn!("load failed: {err}");
                self.set_status(format!("Load failed: {err}"), StatusKind::Error);
            }
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
                return Ok(Mode::Normal);
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return Ok(Mode::Normal);
            }
            KeyCode::BackTab => {
                self.tab = self.tab.previous();
                return Ok(Mode::Normal);
            }
            KeyCode::Char('?') => return Ok(Mode::About),
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                if let Some(tab) = Tab::from_digit(ch) {
                    self.tab = tab;
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE),
            KeyCode::PageDown => self.move_selection(PAGE),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            _ => {}
        }

        let mode = match self.tab {
            Tab::Lectures => self.handle_lectures_key(code),
            Tab::Students => self.handle_students_key(code),
            Tab::GradeEntry => self.handle_entry_key(code),
            Tab::GradeQuery => self.handle_query_key(code),
        };
        Ok(mode)
    }

    fn handle_lectures_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Char('+') => {
                self.clear_status();
                let last_year = self.store.lectures().last().map(|l| l.year.as_str());
                Mode::AddingLecture(LectureForm::with_year(last_year))
            }
            KeyCode::Char('-') => match self.store.lectures().get(self.lectures.selected) {
                Some(lecture) => {
                    let name = lecture.name.clone();
                    let students = query::students_for_lecture(&self.store, &name).len();
                    let grades = query::select_grades(
                        &self.store,
                        Selector::All,
                        Selector::Only(&name),
                    )
                    .len();
                    self.clear_status();
                    Mode::ConfirmDelete(ConfirmDelete {
                        target: DeleteTarget::Lecture(name),
                        students,
                        grades,
                    })
                }
                None => {
                    self.set_status("No lecture selected to delete.", StatusKind::Error);
                    Mode::Normal
                }
            },
            _ => Mode::Normal,
        }
    }

    fn handle_students_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Char('+') => {
                if self.store.lectures().is_empty() {
                    self.set_status(
                        "Add a lecture before enrolling students.",
                        StatusKind::Error,
                    );
                    return Mode::Normal;
                }
                self.clear_status();
                let lectures = self
                    .store
                    .lectures()
                    .iter()
                    .map(|l| (l.name.clone(), l.year.clone()))
                    .collect();
                let preferred = self
                    .store
                    .students()
                    .get(self.students.selected)
                    .map(|s| s.lecture_name.as_str());
                Mode::AddingStudent(StudentForm::new(lectures, preferred))
            }
            KeyCode::Char('-') => match self.store.students().get(self.students.selected) {
                Some(student) => {
                    let name = student.name.clone();
                    let students = self
                        .store
                        .students()
                        .iter()
                        .filter(|s| s.name == name)
                        .count();
                    let grades = self
                        .store
                        .grades()
                        .iter()
                        .filter(|g| g.student_name == name)
                        .count();
                    self.clear_status();
                    Mode::ConfirmDelete(ConfirmDelete {
                        target: DeleteTarget::Student(name),
                        students,
                        grades,
                    })
                }
                None => {
                    self.set_status("No student selected to delete.", StatusKind::Error);
                    Mode::Normal
                }
            },
            _ => Mode::Normal,
        }
    }

    fn handle_entry_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Left => {
                self.entry.cycle_lecture(&self.store, -1);
                Mode::Normal
            }
            KeyCode::Right => {
                self.entry.cycle_lecture(&self.store, 1);
                Mode::Normal
            }
            KeyCode::Enter => {
                let Some(lecture) = self.entry.lecture.clone() else {
                    self.set_status("No lecture to grade yet.", StatusKind::Error);
                    return Mode::Normal;
                };
                let selected = query::students_for_lecture(&self.store, &lecture)
                    .get(self.entry.cursor.selected)
                    .map(|student| student.name.clone());
                match selected {
                    Some(student) => {
                        let existing = self
                            .store
                            .grade(&lecture, &student)
                            .map(|grade| grade.scores());
                        let form = ScoreForm::new(&lecture, &student, existing);
                        self.clear_status();
                        Mode::EnteringScores(form)
                    }
                    None => {
                        self.set_status("No student selected.", StatusKind::Error);
                        Mode::Normal
                    }
                }
            }
            _ => Mode::Normal,
        }
    }

    fn handle_query_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.grade_query.cycle_year(&self.store),
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.grade_query.cycle_lecture(&self.store)
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add_lecture(&mut self, code: KeyCode, mut form: LectureForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add lecture cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.toggle_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_lecture(&form) {
                Ok(()) => return Mode::Normal,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingLecture(form)
    }

    fn handle_add_student(&mut self, code: KeyCode, mut form: StudentForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add student cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.toggle_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left if form.active == StudentField::Lecture => form.cycle_lecture(-1),
            KeyCode::Right if form.active == StudentField::Lecture => form.cycle_lecture(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_student(&form) {
                Ok(()) => return Mode::Normal,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingStudent(form)
    }

    fn handle_scores(&mut self, code: KeyCode, mut form: ScoreForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Grade entry cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.toggle_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_scores(&form) {
                Ok(()) => return Mode::Normal,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::EnteringScores(form)
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(()) => Mode::Normal,
                    Err(err) => {
                        self.set_status(surface_error(&err), StatusKind::Error);
                        Mode::Normal
                    }
                }
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn save_new_lecture(&mut self, form: &LectureForm) -> Result<()> {
        let (year, name, time) = form.parse_inputs()?;
        let lecture = self
            .store
            .add_lecture(&year, &name, &time)
            .context("failed to add lecture")?;
        self.sync_views();
        self.lectures.select_last(self.store.lectures().len());
        self.set_status(format!("Added lecture {}.", lecture.name), StatusKind::Info);
        Ok(())
    }

    fn save_new_student(&mut self, form: &StudentForm) -> Result<()> {
        let (lecture, year, name, number) = form.parse_inputs()?;
        let student = self
            .store
            .add_student(&lecture, &year, &name, &number)
            .context("failed to add student")?;
        self.sync_views();
        self.students.select_last(self.store.students().len());
        self.set_status(
            format!("Enrolled {} in {}.", student.name, student.lecture_name),
            StatusKind::Info,
        );
        Ok(())
    }

    fn save_scores(&mut self, form: &ScoreForm) -> Result<()> {
        let scores = form.parse_inputs()?;
        let grade = self
            .store
            .upsert_grade(&form.lecture, &form.student, scores)
            .context("failed to record grade")?;
        self.sync_views();
        self.set_status(
            format!(
                "Recorded {} in {}: total {}, average {}.",
                grade.student_name,
                grade.lecture_name,
                grade.total(),
                format_average(grade.average())
            ),
            StatusKind::Info,
        );
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) -> Result<()> {
        let (label, removal) = match &confirm.target {
            DeleteTarget::Lecture(name) => (
                format!("lecture {name}"),
                self.store
                    .delete_lecture(name)
                    .context("failed to delete lecture")?,
            ),
            DeleteTarget::Student(name) => (
                format!("student {name}"),
                self.store
                    .delete_student(name)
                    .context("failed to delete student")?,
            ),
        };
        info!("ui delete {label}: {removal:?}");
        self.sync_views();
        self.set_status(
            format!(
                "Deleted {label} ({} enrollments, {} grades removed).",
                removal.students, removal.grades
            ),
            StatusKind::Info,
        );
        Ok(())
    }

    /// Re-derive every view after the store changed. Cascading deletes and
    /// loads can invalidate selections on tabs other than the current one.
    fn sync_views(&mut self) {
        self.lectures.clamp(self.store.lectures().len());
        self.students.clamp(self.store.students().len());
        self.entry.sync(&self.store);
        self.grade_query.sync(&self.store);
    }

    fn current_len(&self) -> usize {
        match self.tab {
            Tab::Lectures => self.store.lectures().len(),
            Tab::Students => self.store.students().len(),
            Tab::GradeEntry => self.entry.student_count(&self.store),
            Tab::GradeQuery => {
                query::filter_grades(&self.store, &self.grade_query.year, &self.grade_query.lecture)
                    .len()
            }
        }
    }

    fn current_cursor(&mut self) -> &mut ListCursor {
        match self.tab {
            Tab::Lectures => &mut self.lectures,
            Tab::Students => &mut self.students,
            Tab::GradeEntry => &mut self.entry.cursor,
            Tab::GradeQuery => &mut self.grade_query.cursor,
        }
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.current_len();
        self.current_cursor().move_selection(offset, len);
    }

    fn select_first(&mut self) {
        self.current_cursor().select_first();
    }

    fn select_last(&mut self) {
        let len = self.current_len();
        self.current_cursor().select_last(len);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TABS_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match self.tab {
            Tab::Lectures => self.draw_lectures(frame, chunks[1]),
            Tab::Students => self.draw_students(frame, chunks[1]),
            Tab::GradeEntry => self.draw_entry(frame, chunks[1]),
            Tab::GradeQuery => self.draw_query(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::AddingLecture(form) => self.draw_lecture_form(frame, area, form),
            Mode::AddingStudent(form) => self.draw_student_form(frame, area, form),
            Mode::EnteringScores(form) => self.draw_score_form(frame, area, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::About => self.draw_about(frame, area),
            Mode::Normal => {}
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<&str> = Tab::ALL.iter().map(|tab| tab.title()).collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Grade Manager • {}", self.data_file.display())),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn render_table(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        header: &[&str],
        widths: &[Constraint],
        rows: Vec<Row<'static>>,
        selected: usize,
    ) {
        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        if rows.is_empty() {
            let message = Paragraph::new("Nothing here yet.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(header.iter().map(|h| Cell::from(h.to_string())))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let table = Table::new(rows, widths.to_vec())
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("> ");
        let mut state = TableState::default().with_selected(Some(selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_lectures(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .store
            .lectures()
            .iter()
            .map(|l| {
                Row::new(vec![
                    l.id.to_string(),
                    l.year.clone(),
                    l.name.clone(),
                    l.time.clone(),
                ])
            })
            .collect();
        self.render_table(
            frame,
            area,
            "Lectures",
            &["ID", "Year", "Lecture", "Time"],
            &[
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Percentage(50),
                Constraint::Min(10),
            ],
            rows,
            self.lectures.selected,
        );
    }

    fn draw_students(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .store
            .students()
            .iter()
            .map(|s| {
                Row::new(vec![
                    s.id.to_string(),
                    s.lecture_name.clone(),
                    s.year.clone(),
                    s.name.clone(),
                    s.student_number.clone(),
                ])
            })
            .collect();
        self.render_table(
            frame,
            area,
            "Students",
            &["ID", "Lecture", "Year", "Name", "Student No."],
            &[
                Constraint::Length(6),
                Constraint::Percentage(30),
                Constraint::Length(8),
                Constraint::Percentage(30),
                Constraint::Min(10),
            ],
            rows,
            self.students.selected,
        );
    }

    fn draw_entry(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let lecture = self.entry.lecture.as_deref().unwrap_or("-");
        let header = Paragraph::new(Line::from(vec![
            Span::raw("Lecture: "),
            Span::styled(
                format!("< {lecture} >"),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Grade Entry"));
        frame.render_widget(header, chunks[0]);

        let rows: Vec<Row> = self
            .entry
            .lecture
            .as_deref()
            .map(|name| {
                query::students_for_lecture(&self.store, name)
                    .into_iter()
                    .map(|student| {
                        let grade = self.store.grade(name, &student.name);
                        let score = |value: Option<String>| value.unwrap_or_else(|| "-".into());
                        Row::new(vec![
                            student.name.clone(),
                            student.student_number.clone(),
                            score(grade.map(|g| g.midterm().to_string())),
                            score(grade.map(|g| g.final_exam().to_string())),
                            score(grade.map(|g| g.assignment().to_string())),
                            score(grade.map(|g| g.total().to_string())),
                            grade
                                .map(|g| format_average(g.average()))
                                .unwrap_or_else(|| "-".into()),
                        ])
                    })
                    .collect()
            })
            .unwrap_or_default();

        self.render_table(
            frame,
            chunks[1],
            "Students",
            &["Name", "Student No.", "Midterm", "Final", "Assignment", "Total", "Average"],
            &[
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Length(11),
                Constraint::Length(7),
                Constraint::Min(8),
            ],
            rows,
            self.entry.cursor.selected,
        );
    }

    fn draw_query(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let selectors = Paragraph::new(Line::from(vec![
            Span::raw("Year: "),
            Span::styled(
                self.grade_query.year.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Lecture: "),
            Span::styled(
                self.grade_query.lecture.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Grade Query"));
        frame.render_widget(selectors, chunks[0]);

        let rows: Vec<Row> = query::filter_grades(&self.store, &self.grade_query.year, &self.grade_query.lecture)
            .into_iter()
            .map(|g| {
                Row::new(vec![
                    g.id.to_string(),
                    g.lecture_name.clone(),
                    g.year.clone(),
                    g.student_name.clone(),
                    g.midterm().to_string(),
                    g.final_exam().to_string(),
                    g.assignment().to_string(),
                    g.total().to_string(),
                    format_average(g.average()),
                ])
            })
            .collect();

        self.render_table(
            frame,
            chunks[1],
            "Grades",
            &[
                "ID", "Lecture", "Year", "Student", "Midterm", "Final", "Assignment", "Total",
                "Average",
            ],
            &[
                Constraint::Length(5),
                Constraint::Percentage(20),
                Constraint::Length(6),
                Constraint::Percentage(15),
                Constraint::Length(8),
                Constraint::Length(6),
                Constraint::Length(11),
                Constraint::Length(6),
                Constraint::Min(8),
            ],
            rows,
            self.grade_query.cursor.selected,
        );
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut keys: Vec<(&str, &str)> = match (&self.mode, self.tab) {
            (Mode::Normal, Tab::Lectures) => vec![("[+]", "Add"), ("[-]", "Delete")],
            (Mode::Normal, Tab::Students) => vec![("[+]", "Enroll"), ("[-]", "Delete")],
            (Mode::Normal, Tab::GradeEntry) => {
                vec![("[←→]", "Lecture"), ("[Enter]", "Enter Scores")]
            }
            (Mode::Normal, Tab::GradeQuery) => vec![("[y]", "Year"), ("[l]", "Lecture")],
            (Mode::ConfirmDelete(_), _) => vec![("[y]", "Confirm"), ("[n]", "Cancel")],
            (Mode::About, _) => vec![("[any key]", "Close")],
            _ => vec![("[Tab]", "Next Field"), ("[Enter]", "Save"), ("[Esc]", "Cancel")],
        };
        if matches!(self.mode, Mode::Normal) {
            keys.extend([
                ("[↑↓]", "Select"),
                ("[Tab]", "Switch Tab"),
                ("[^S]", "Save"),
                ("[^O]", "Load"),
                ("[?]", "About"),
                ("[q]", "Quit"),
            ]);
        }

        let mut spans = Vec::with_capacity(keys.len() * 2);
        for (key, action) in keys {
            spans.push(Span::styled(key.to_string(), key_style));
            spans.push(Span::raw(format!(" {action}   ")));
        }
        Line::from(spans)
    }

    fn draw_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        mut lines: Vec<Line<'static>>,
        error: Option<&String>,
        cursor: (u16, u16),
    ) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        lines.push(Line::from(""));
        if let Some(error) = error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (column, row) = cursor;
        frame.set_cursor_position((inner.x + column, inner.y + row));
    }

    fn draw_lecture_form(&self, frame: &mut Frame, area: Rect, form: &LectureForm) {
        let fields = [
            ("Year", LectureField::Year),
            ("Lecture", LectureField::Name),
            ("Time", LectureField::Time),
        ];
        let lines = fields
            .iter()
            .map(|(label, field)| form.build_line(label, *field))
            .collect();
        let cursor = cursor_for(&fields, form.active, |f| form.value_len(f));
        self.draw_form(frame, area, "Add Lecture", lines, form.error.as_ref(), cursor);
    }

    fn draw_student_form(&self, frame: &mut Frame, area: Rect, form: &StudentForm) {
        let fields = [
            ("Lecture", StudentField::Lecture),
            ("Year", StudentField::Year),
            ("Name", StudentField::Name),
            ("Student No.", StudentField::Number),
        ];
        let lines = fields
            .iter()
            .map(|(label, field)| form.build_line(label, *field))
            .collect();
        let cursor = cursor_for(&fields, form.active, |f| form.value_len(f));
        self.draw_form(frame, area, "Enroll Student", lines, form.error.as_ref(), cursor);
    }

    fn draw_score_form(&self, frame: &mut Frame, area: Rect, form: &ScoreForm) {
        let fields = [
            ("Midterm", ScoreField::Midterm),
            ("Final", ScoreField::FinalExam),
            ("Assignment", ScoreField::Assignment),
        ];
        let lines = fields
            .iter()
            .map(|(label, field)| form.build_line(label, *field))
            .collect();
        let cursor = cursor_for(&fields, form.active, |f| form.value_len(f));
        let title = format!("Scores • {} • {}", form.lecture, form.student);
        self.draw_form(frame, area, &title, lines, form.error.as_ref(), cursor);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let (question, detail) = match &confirm.target {
            DeleteTarget::Lecture(name) => (
                format!("Delete lecture '{name}'?"),
                format!(
                    "This also removes {} enrolled students and {} grades.",
                    confirm.students, confirm.grades
                ),
            ),
            DeleteTarget::Student(name) => (
                format!("Delete every student named '{name}'?"),
                format!(
                    "This removes {} enrollments and {} grades across all lectures.",
                    confirm.students, confirm.grades
                ),
            ),
        };

        let lines = vec![
            Line::from(question),
            Line::from(detail),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_about(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let mut lines: Vec<Line> = ABOUT_TEXT.iter().map(|line| Line::from(*line)).collect();
        lines.insert(
            1,
            Line::from(format!("Version {}", env!("CARGO_PKG_VERSION"))),
        );
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("About").borders(Borders::ALL));
        frame.render_widget(paragraph, popup_area);
    }
}

/// Cursor position `(column, row)` for the focused field of a form laid out
/// one field per line as `Label: value`.
fn cursor_for<F: Copy + PartialEq>(
    fields: &[(&str, F)],
    active: F,
    value_len: impl Fn(F) -> usize,
) -> (u16, u16) {
    let row = fields
        .iter()
        .position(|(_, field)| *field == active)
        .unwrap_or(0);
    let (label, field) = fields[row];
    let column = label.chars().count() + ": ".len() + value_len(field);
    (column as u16, row as u16)
}
