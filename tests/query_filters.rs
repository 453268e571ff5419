use grade_manager::query::{
    filter_by_year, filter_grades, lecture_names_for_year, students_for_lecture, years, ALL,
};
use grade_manager::{Scores, Store};

fn term() -> Store {
    let mut store = Store::new();
    store.add_lecture("2024", "OS", "Wed").unwrap();
    store.add_lecture("2025", "OS2", "Thu").unwrap();
    store.add_lecture("2024", "DB", "Fri").unwrap();
    store.add_student("OS", "2024", "Lee", "1").unwrap();
    store.add_student("OS2", "2025", "Kim", "2").unwrap();
    store.add_student("DB", "2024", "Park", "3").unwrap();
    store.add_student("OS", "2024", "Choi", "4").unwrap();
    store.upsert_grade("OS", "Lee", Scores::new(1, 2, 3)).unwrap();
    store.upsert_grade("OS2", "Kim", Scores::new(4, 5, 6)).unwrap();
    store.upsert_grade("DB", "Park", Scores::new(7, 8, 9)).unwrap();
    store.upsert_grade("OS", "Choi", Scores::new(9, 9, 9)).unwrap();
    store
}

fn names<'a>(grades: impl IntoIterator<Item = &'a grade_manager::Grade>) -> Vec<&'a str> {
    grades
        .into_iter()
        .map(|g| g.student_name.as_str())
        .collect()
}

#[test]
fn sentinel_returns_every_grade_in_order() {
    let store = term();
    let all = filter_grades(&store, ALL, ALL);
    assert_eq!(names(all), vec!["Lee", "Kim", "Park", "Choi"]);

    let english = filter_grades(&store, "all", "all");
    assert_eq!(english.len(), 4);
}

#[test]
fn grades_filter_on_year_and_lecture() {
    let store = term();
    let os = filter_grades(&store, "2024", "OS");
    assert_eq!(names(os.clone()), vec!["Lee", "Choi"]);
    assert!(os
        .iter()
        .all(|g| g.year == "2024" && g.lecture_name == "OS"));

    assert_eq!(names(filter_grades(&store, "2024", ALL)), vec!["Lee", "Park", "Choi"]);
    assert_eq!(names(filter_grades(&store, ALL, "OS2")), vec!["Kim"]);
    assert!(filter_grades(&store, "2025", "OS").is_empty());
}

#[test]
fn filtering_never_mutates_the_store() {
    let store = term();
    let before = store.clone();
    let _ = filter_grades(&store, "2024", "OS");
    let _ = filter_by_year(&store, "2025");
    assert_eq!(store, before);
}

#[test]
fn lectures_by_year_keep_insertion_order() {
    let store = term();
    let lectures: Vec<&str> = filter_by_year(&store, "2024")
        .iter()
        .map(|l| l.name.as_str())
        .collect();
    assert_eq!(lectures, vec!["OS", "DB"]);
    assert_eq!(filter_by_year(&store, ALL).len(), 3);
    assert!(filter_by_year(&store, "1999").is_empty());
}

#[test]
fn selector_helpers() {
    let store = term();
    assert_eq!(years(&store), vec!["2024", "2025"]);
    assert_eq!(lecture_names_for_year(&store, "2024"), vec!["OS", "DB"]);
    let enrolled: Vec<&str> = students_for_lecture(&store, "OS")
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(enrolled, vec!["Lee", "Choi"]);
}

#[test]
fn sentinel_match_is_exact_on_stored_values() {
    let mut store = Store::new();
    store.add_lecture("2024", " all", "Mon").unwrap();
    store.add_lecture("2024", "OS", "Tue").unwrap();
    store.add_student(" all", "2024", "Lee", "1").unwrap();
    store.add_student("OS", "2024", "Kim", "2").unwrap();
    store.upsert_grade(" all", "Lee", Scores::new(1, 1, 1)).unwrap();
    store.upsert_grade("OS", "Kim", Scores::new(2, 2, 2)).unwrap();

    assert_eq!(names(filter_grades(&store, "2024", " all")), vec!["Lee"]);
    assert_eq!(names(filter_grades(&store, "2024", "OS")), vec!["Kim"]);
    assert!(filter_grades(&store, "2024", " OS").is_empty());
    assert_eq!(filter_by_year(&store, "all").len(), 2);
}
