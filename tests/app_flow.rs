use std::fs;

use crossterm::event::KeyCode;
use grade_manager::ui::{StatusKind, Tab};
use grade_manager::{App, Scores, Store};
use tempfile::tempdir;

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.handle_key(KeyCode::Char(ch)).unwrap();
    }
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(code).unwrap();
}

fn app_with(store: Store) -> (tempfile::TempDir, App) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.txt");
    (dir, App::new(store, path))
}

#[test]
fn adding_a_lecture_through_the_form() {
    let (_dir, mut app) = app_with(Store::new());
    assert_eq!(app.tab(), Tab::Lectures);

    press(&mut app, KeyCode::Char('+'));
    assert!(app.has_modal());
    type_text(&mut app, "2024");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "OS");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "Wed 13:00");
    press(&mut app, KeyCode::Enter);

    assert!(!app.has_modal());
    let lecture = app.store().lecture("OS").unwrap();
    assert_eq!(lecture.year, "2024");
    assert_eq!(lecture.time, "Wed 13:00");
    assert_eq!(app.status().map(|(_, kind)| kind), Some(StatusKind::Info));
}

#[test]
fn duplicate_lecture_keeps_form_open_with_error() {
    let mut store = Store::new();
    store.add_lecture("2024", "OS", "Wed").unwrap();
    let (_dir, mut app) = app_with(store);

    press(&mut app, KeyCode::Char('+'));
    // Year is prefilled from the last lecture and focus starts on the name.
    type_text(&mut app, "OS");
    press(&mut app, KeyCode::Enter);

    assert!(app.has_modal());
    assert_eq!(app.store().lectures().len(), 1);
    let (text, kind) = app.status().unwrap();
    assert_eq!(kind, StatusKind::Error);
    assert!(text.contains("already exists"));

    press(&mut app, KeyCode::Esc);
    assert!(!app.has_modal());
}

#[test]
fn confirming_lecture_delete_cascades() {
    let mut store = Store::new();
    store.add_lecture("2024", "Algorithms", "Mon").unwrap();
    store
        .add_student("Algorithms", "2024", "Kim", "2024001")
        .unwrap();
    store
        .upsert_grade("Algorithms", "Kim", Scores::new(1, 2, 3))
        .unwrap();
    let (_dir, mut app) = app_with(store);

    press(&mut app, KeyCode::Char('-'));
    assert!(app.has_modal());
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.store().lectures().len(), 1);

    press(&mut app, KeyCode::Char('-'));
    press(&mut app, KeyCode::Char('y'));
    assert!(app.store().is_empty());
}

#[test]
fn entering_scores_upserts_grade() {
    let mut store = Store::new();
    store.add_lecture("2024", "OS", "Wed").unwrap();
    store.add_student("OS", "2024", "Lee", "2024002").unwrap();
    let (_dir, mut app) = app_with(store);

    press(&mut app, KeyCode::Char('3'));
    assert_eq!(app.tab(), Tab::GradeEntry);
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "90");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "85");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "100");
    press(&mut app, KeyCode::Enter);

    let grade = app.store().grade("OS", "Lee").unwrap();
    assert_eq!(grade.total(), 275);
    assert_eq!(grade.average(), 91.67);

    // Reopening prefills the current scores; clearing a field means zero.
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Enter);
    let grade = app.store().grade("OS", "Lee").unwrap();
    assert_eq!(grade.scores(), Scores::new(0, 85, 100));
    assert_eq!(app.store().grades().len(), 1);
}

#[test]
fn enrolling_requires_a_lecture() {
    let (_dir, mut app) = app_with(Store::new());
    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::Char('+'));
    assert!(!app.has_modal());
    assert_eq!(app.status().map(|(_, kind)| kind), Some(StatusKind::Error));
}

#[test]
fn enrolling_a_student_through_the_form() {
    let mut store = Store::new();
    store.add_lecture("2024", "OS", "Wed").unwrap();
    let (_dir, mut app) = app_with(store);

    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::Char('+'));
    type_text(&mut app, "Lee");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "2024002");
    press(&mut app, KeyCode::Enter);

    let student = app.store().student("OS", "Lee").unwrap();
    assert_eq!(student.year, "2024");
    assert_eq!(student.student_number, "2024002");
}

#[test]
fn save_and_reload_through_app() {
    let mut store = Store::new();
    store.add_lecture("2024", "OS", "Wed").unwrap();
    let (dir, mut app) = app_with(store);

    app.save().unwrap();
    assert_eq!(app.status().map(|(_, kind)| kind), Some(StatusKind::Info));
    assert!(fs::read_to_string(dir.path().join("data.txt"))
        .unwrap()
        .contains("1|2024|OS|Wed"));

    fs::write(dir.path().join("data.txt"), "#LECTURES\nnot|a|valid\n").unwrap();
    app.reload().unwrap();
    assert_eq!(app.status().map(|(_, kind)| kind), Some(StatusKind::Error));
    assert!(app.store().lecture("OS").is_some());
}

#[test]
fn quit_key_exits() {
    let (_dir, mut app) = app_with(Store::new());
    assert!(app.handle_key(KeyCode::Char('q')).unwrap());
}
