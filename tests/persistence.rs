use std::fs;

use grade_manager::store::{
    decode, encode, load_into, read_store, read_store_or_default, save_store,
};
use grade_manager::{Scores, Store, StoreError};
use tempfile::tempdir;

fn sample() -> Store {
    let mut store = Store::new();
    store.add_lecture("2024", "OS", "Wed 13:00").unwrap();
    store.add_lecture("2025", "Algorithms", "Mon 10:00").unwrap();
    store.add_student("OS", "2024", "Lee", "2024002").unwrap();
    store.add_student("Algorithms", "2025", "Kim", "2025001").unwrap();
    store
        .upsert_grade("OS", "Lee", Scores::new(90, 85, 0))
        .unwrap();
    store
        .upsert_grade("Algorithms", "Kim", Scores::new(90, 85, 100))
        .unwrap();
    store
}

#[test]
fn encode_writes_sections_in_order() {
    let text = encode(&sample());
    let expected = "\
#LECTURES
1|2024|OS|Wed 13:00
2|2025|Algorithms|Mon 10:00
#STUDENTS
1|OS|2024|Lee|2024002
2|Algorithms|2025|Kim|2025001
#GRADES
1|OS|2024|Lee|90|85|0|175|58.33
2|Algorithms|2025|Kim|90|85|100|275|91.67
";
    assert_eq!(text, expected);
}

#[test]
fn decode_reverses_encode() {
    let store = sample();
    let decoded = decode(&encode(&store)).unwrap();
    assert_eq!(decoded, store);

    let grade = decoded.grade("OS", "Lee").unwrap();
    assert_eq!(grade.year, "2024");
    assert_eq!(grade.assignment(), 0);
    assert_eq!(grade.average(), 58.33);
}

#[test]
fn decode_keeps_stored_ids_and_continues_after_them() {
    let text = "#LECTURES\n4|2024|OS|Wed\n#STUDENTS\n#GRADES\n";
    let mut store = decode(text).unwrap();
    assert_eq!(store.lectures()[0].id.0, 4);
    let next = store.add_lecture("2024", "DB", "Thu").unwrap();
    assert_eq!(next.id.0, 5);
}

#[test]
fn decode_accepts_unrounded_average_text() {
    let text = "#LECTURES\n1|2024|OS|Wed\n#STUDENTS\n1|OS|2024|Lee|7\n#GRADES\n1|OS|2024|Lee|90|85|100|275|91.66666666666667\n";
    let store = decode(text).unwrap();
    assert_eq!(store.grades()[0].average(), 91.67);
}

#[test]
fn short_grade_line_is_a_parse_error() {
    let text = "#LECTURES\n1|2024|OS|Wed\n#STUDENTS\n1|OS|2024|Lee|7\n#GRADES\n1|OS|2024|Lee|90\n";
    let err = decode(text).unwrap_err();
    match err {
        StoreError::Parse { line, .. } => assert_eq!(line, 6),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn non_numeric_fields_are_parse_errors() {
    let bad_id = "#LECTURES\nx|2024|OS|Wed\n";
    assert!(matches!(
        decode(bad_id).unwrap_err(),
        StoreError::Parse { line: 2, .. }
    ));

    let bad_average = "#LECTURES\n1|2024|OS|Wed\n#STUDENTS\n1|OS|2024|Lee|7\n#GRADES\n1|OS|2024|Lee|1|2|3|6|two\n";
    assert!(matches!(
        decode(bad_average).unwrap_err(),
        StoreError::Parse { line: 6, .. }
    ));
}

#[test]
fn dangling_references_are_rejected() {
    let text = "#LECTURES\n1|2024|OS|Wed\n#STUDENTS\n1|DB|2024|Lee|7\n";
    assert!(matches!(
        decode(text).unwrap_err(),
        StoreError::Parse { line: 4, .. }
    ));
}

#[test]
fn save_then_load_round_trips_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("data.txt");
    let store = sample();

    save_store(&store, &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), encode(&store));

    let loaded = read_store(&path).unwrap();
    assert_eq!(loaded, store);
}

#[test]
fn save_replaces_previous_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.txt");
    save_store(&sample(), &path).unwrap();
    save_store(&Store::new(), &path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "#LECTURES\n#STUDENTS\n#GRADES\n"
    );
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn load_replaces_rather_than_merges() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.txt");
    fs::write(&path, "#LECTURES\n1|2030|Compilers|Fri\n").unwrap();

    let mut store = sample();
    load_into(&mut store, &path).unwrap();
    assert_eq!(store.lectures().len(), 1);
    assert_eq!(store.lectures()[0].name, "Compilers");
    assert!(store.students().is_empty());
    assert!(store.grades().is_empty());
}

#[test]
fn failed_load_leaves_store_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.txt");
    fs::write(
        &path,
        "#LECTURES\n1|2030|Compilers|Fri\n#GRADES\n1|Compilers|2030\n",
    )
    .unwrap();

    let mut store = sample();
    let before = store.clone();
    assert!(matches!(
        load_into(&mut store, &path).unwrap_err(),
        StoreError::Parse { .. }
    ));
    assert_eq!(store, before);

    let missing = dir.path().join("missing.txt");
    assert!(matches!(
        load_into(&mut store, &missing).unwrap_err(),
        StoreError::Io { .. }
    ));
    assert_eq!(store, before);
}

#[test]
fn missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let store = read_store_or_default(&dir.path().join("data.txt")).unwrap();
    assert!(store.is_empty());
}

#[test]
fn extreme_scores_load_without_overflow() {
    let text = "\
#LECTURES
1|2024|OS|Mon
#STUDENTS
1|OS|2024|Lee|1
#GRADES
1|OS|2024|Lee|2147483647|2147483647|2147483647|0|0
";
    let store = decode(text).unwrap();
    let grade = store.grade("OS", "Lee").unwrap();
    assert_eq!(grade.total(), 6_442_450_941);
    assert_eq!(grade.average(), 2_147_483_647.0);
    assert!(encode(&store).ends_with("|2147483647|6442450941|2147483647.00\n"));
}

#[test]
fn id_with_no_successor_is_a_parse_error() {
    let err = decode("#LECTURES\n4294967295|2024|OS|Mon\n").unwrap_err();
    assert!(matches!(err, StoreError::Parse { line: 2, .. }));
}

#[test]
fn adding_after_the_last_usable_id_fails_cleanly() {
    let mut store = decode("#LECTURES\n4294967294|2024|OS|Mon\n").unwrap();
    let err = store.add_lecture("2024", "DB", "Tue").unwrap_err();
    assert!(matches!(err, StoreError::IdsExhausted { .. }));
    assert_eq!(store.lectures().len(), 1);
}

#[test]
fn reserved_values_in_a_file_are_rejected() {
    let err = decode("#LECTURES\n1|2024|All|Mon\n").unwrap_err();
    assert!(matches!(err, StoreError::Parse { line: 2, .. }));
}
