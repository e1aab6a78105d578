use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tutortrack_core::model::sample::sample_address_book;
use tutortrack_core::{
    AddressBook, Assignment, AssignmentList, AssignmentName, Email, JsonStorage, LogicManager,
    Name, Phone, Storage, StorageError, Student, StudentId, Tutorial, TutorialClass, TutorialList,
    UserPrefs,
};

fn storage_in(dir: &Path) -> JsonStorage {
    JsonStorage::from_prefs(dir.join("preferences.json"), &UserPrefs::rooted_at(dir))
}

fn student(id: &str, name: &str) -> Student {
    Student::new(
        StudentId::parse(id).unwrap(),
        Name::parse(name).unwrap(),
        Phone::parse("91234567").unwrap(),
        Email::parse("student@example.com").unwrap(),
    )
}

#[test]
fn missing_files_read_as_none() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path());

    assert!(storage.read_user_prefs().unwrap().is_none());
    assert!(storage.read_address_book().unwrap().is_none());
    assert!(storage.read_tutorial_list().unwrap().is_none());
    assert!(storage.read_assignment_list().unwrap().is_none());
}

#[test]
fn saved_collections_load_back_equal() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir.path().join("nested"));

    let book = AddressBook::from_students(vec![student("A0001", "Alex Yeoh")]).unwrap();
    let mut tutorial = Tutorial::new(TutorialClass::parse("T01").unwrap());
    tutorial.add_student(StudentId::parse("A0001").unwrap());
    let tutorials = TutorialList::from_tutorials(vec![tutorial]).unwrap();
    let assignments = AssignmentList::from_assignments(vec![Assignment::new(
        AssignmentName::parse("Lab 1").unwrap(),
    )])
    .unwrap();
    let prefs = UserPrefs::rooted_at(dir.path());

    storage.save_address_book(&book).unwrap();
    storage.save_tutorial_list(&tutorials).unwrap();
    storage.save_assignment_list(&assignments).unwrap();
    storage.save_user_prefs(&prefs).unwrap();

    assert_eq!(storage.read_address_book().unwrap(), Some(book));
    assert_eq!(storage.read_tutorial_list().unwrap(), Some(tutorials));
    assert_eq!(storage.read_assignment_list().unwrap(), Some(assignments));
    assert_eq!(storage.read_user_prefs().unwrap(), Some(prefs));
    assert!(!storage.address_book_path().with_extension("json.tmp").exists());
}

#[test]
fn malformed_json_is_a_json_error() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path());
    fs::write(storage.address_book_path(), "{ not json").unwrap();

    let err = storage.read_address_book().unwrap_err();
    assert!(matches!(err, StorageError::Json { .. }));
    assert_eq!(err.path(), storage.address_book_path());
}

#[test]
fn duplicate_students_in_file_are_rejected() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path());
    let entry = serde_json::json!({
        "student_id": "A0001",
        "name": "Alex Yeoh",
        "phone": "91234567",
        "email": "alex@example.com"
    });
    let body = serde_json::json!({ "students": [entry.clone(), entry] });
    fs::write(storage.address_book_path(), body.to_string()).unwrap();

    let err = storage.read_address_book().unwrap_err();
    assert!(matches!(err, StorageError::Json { .. }));
}

#[test]
fn invalid_field_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path());
    let body = serde_json::json!({
        "tutorials": [{ "tutorial_class": "TUT-1", "students": [], "attendance": [] }]
    });
    fs::write(storage.tutorial_list_path(), body.to_string()).unwrap();

    let err = storage.read_tutorial_list().unwrap_err();
    assert!(
        err.to_string().contains("invalid tutorial class"),
        "unexpected error: {err}"
    );
}

#[test]
fn open_seeds_sample_students_when_address_book_is_missing() {
    let dir = TempDir::new().unwrap();
    let prefs = UserPrefs::rooted_at(dir.path());
    let logic = LogicManager::open(storage_in(dir.path()), prefs.clone());

    assert_eq!(logic.model().address_book(), &sample_address_book().unwrap());
    assert!(logic.model().tutorial_list().is_empty());
    assert!(logic.model().assignment_list().is_empty());
    assert_eq!(logic.model().user_prefs(), &prefs);
}

#[test]
fn open_starts_empty_when_address_book_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path());
    fs::write(storage.address_book_path(), "{ \"students\": 42 }").unwrap();

    let logic = LogicManager::open(storage, UserPrefs::rooted_at(dir.path()));
    assert!(logic.model().address_book().is_empty());
}

#[test]
fn open_repairs_links_that_disagree_across_files() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path());
    let book = serde_json::json!({
        "students": [{
            "student_id": "A0001",
            "name": "Alex Yeoh",
            "phone": "87438807",
            "email": "alex@example.com",
            "tutorial_class": "T09"
        }]
    });
    let tutorials = serde_json::json!({
        "tutorials": [{
            "tutorial_class": "T01",
            "students": ["A0001", "Z0404"],
            "attendance": [{ "date": "2024-01-01", "student_id": "Z0404", "present": true }]
        }]
    });
    let assignments = serde_json::json!({
        "assignments": [{ "name": "Lab 1", "statuses": { "A0001": true, "Z0404": true } }]
    });
    fs::write(storage.address_book_path(), book.to_string()).unwrap();
    fs::write(storage.tutorial_list_path(), tutorials.to_string()).unwrap();
    fs::write(storage.assignment_list_path(), assignments.to_string()).unwrap();

    let logic = LogicManager::open(storage, UserPrefs::rooted_at(dir.path()));

    let model = logic.model();
    let alex = model
        .address_book()
        .student_by_id(&StudentId::parse("A0001").unwrap())
        .unwrap();
    assert_eq!(alex.tutorial_class, None);
    let t01 = model
        .tutorial_list()
        .tutorial(&TutorialClass::parse("T01").unwrap())
        .unwrap();
    assert!(t01.roster().is_empty());
    assert!(t01.session_dates().is_empty());
    let lab = &model.assignment_list().assignments()[0];
    assert!(lab.is_completed_by(&StudentId::parse("A0001").unwrap()));
    assert_eq!(lab.completed_count(), 1);
}
