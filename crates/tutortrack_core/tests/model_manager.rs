use chrono::NaiveDate;
use std::cell::RefCell;
use std::rc::Rc;
use tutortrack_core::model::sample::sample_address_book;
use tutortrack_core::{
    AddressBook, Assignment, AssignmentList, AssignmentName, CollectionError, Email, ModelManager,
    Name, Phone, Student, StudentId, StudentPredicate, Tutorial, TutorialClass, TutorialList,
    UserPrefs,
};

fn student(id: &str, name: &str) -> Student {
    Student::new(
        StudentId::parse(id).unwrap(),
        Name::parse(name).unwrap(),
        Phone::parse("91234567").unwrap(),
        Email::parse("student@example.com").unwrap(),
    )
}

fn class(code: &str) -> TutorialClass {
    TutorialClass::parse(code).unwrap()
}

fn assignment(name: &str) -> Assignment {
    Assignment::new(AssignmentName::parse(name).unwrap())
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn sample_model() -> ModelManager {
    ModelManager::new(
        sample_address_book().unwrap(),
        UserPrefs::default(),
        AssignmentList::new(),
        TutorialList::new(),
    )
}

#[test]
fn add_then_delete_student_round_trips_membership() {
    let mut model = ModelManager::default();
    let s1 = student("A0001", "Alex Yeoh");

    model.add_student(s1.clone()).unwrap();
    assert!(model.has_student(&s1));
    assert_eq!(model.filtered_student_list(), &[s1.clone()]);

    model.delete_student(&s1).unwrap();
    assert!(!model.has_student(&s1));
    assert!(model.filtered_student_list().is_empty());
}

#[test]
fn duplicate_add_leaves_model_unchanged() {
    let mut model = sample_model();
    let before_len = model.address_book().len();

    let err = model.add_student(student("A0001", "Clash")).unwrap_err();
    assert!(matches!(err, CollectionError::DuplicateStudent(_)));
    assert_eq!(model.address_book().len(), before_len);
}

#[test]
fn attendance_is_rejected_until_student_is_assigned() {
    let mut model = ModelManager::default();
    let s1 = student("A0001", "Alex Yeoh");
    model.add_student(s1.clone()).unwrap();
    model.add_tutorial(Tutorial::new(class("T01"))).unwrap();

    assert!(!model.set_student_attendance(&s1.student_id, &class("T01"), date("2024-01-01")));

    model.assign_student(&s1, &class("T01")).unwrap();
    assert!(model.set_student_attendance(&s1.student_id, &class("T01"), date("2024-01-01")));
    let tutorial = model.tutorial_list().tutorial(&class("T01")).unwrap();
    assert_eq!(tutorial.attendance(date("2024-01-01"), &s1.student_id), Some(true));
}

#[test]
fn attendance_on_unknown_class_is_false() {
    let mut model = sample_model();
    let id = StudentId::parse("A0001").unwrap();
    assert!(!model.set_student_attendance(&id, &class("T42"), date("2024-01-01")));
    assert!(model.tutorial_list().is_empty());
}

#[test]
fn add_student_and_attendance_reset_view_to_show_all() {
    let mut model = sample_model();
    model.update_filtered_student_list(StudentPredicate::name_contains_any(vec![
        "Bernice".to_string(),
    ]));
    assert_eq!(model.filtered_student_list().len(), 1);

    model.add_student(student("A0100", "Zed Zee")).unwrap();
    assert_eq!(
        model.filtered_student_list().len(),
        model.address_book().len()
    );
    assert_eq!(model.filtered_predicate().label(), "all");

    model.update_filtered_student_list(StudentPredicate::name_contains_any(vec![
        "Bernice".to_string(),
    ]));
    model.set_student_attendance(
        &StudentId::parse("A0002").unwrap(),
        &class("T01"),
        date("2024-01-01"),
    );
    assert_eq!(
        model.filtered_student_list().len(),
        model.address_book().len()
    );
}

#[test]
fn set_student_keeps_active_predicate() {
    let mut model = sample_model();
    model.update_filtered_student_list(StudentPredicate::name_contains_any(vec![
        "Bernice".to_string(),
    ]));
    let target = model.filtered_student_list()[0].clone();

    let renamed = Student {
        name: Name::parse("Bernice Tan").unwrap(),
        ..target.clone()
    };
    model.set_student(&target, renamed.clone()).unwrap();
    assert_eq!(model.filtered_student_list(), &[renamed]);

    let away = Student {
        name: Name::parse("Someone Else").unwrap(),
        ..target
    };
    let current = model.filtered_student_list()[0].clone();
    model.set_student(&current, away).unwrap();
    assert!(model.filtered_student_list().is_empty());
}

#[test]
fn set_student_with_new_id_carries_roster_attendance_and_statuses() {
    let mut model = sample_model();
    model.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    model.add_assignment(assignment("Lab 1")).unwrap();
    let alex = model.address_book().students()[0].clone();
    model.assign_student(&alex, &class("T01")).unwrap();
    model.set_student_attendance(&alex.student_id, &class("T01"), date("2024-01-01"));
    let alex = model
        .address_book()
        .student_by_id(&alex.student_id)
        .cloned()
        .unwrap();
    model
        .set_assignment_status(&assignment("Lab 1"), &alex, true)
        .unwrap();

    let renamed = Student {
        student_id: StudentId::parse("A0100").unwrap(),
        ..alex.clone()
    };
    model.set_student(&alex, renamed.clone()).unwrap();

    let tutorial = model.tutorial_list().tutorial(&class("T01")).unwrap();
    assert_eq!(tutorial.roster(), &[renamed.student_id.clone()]);
    assert_eq!(
        tutorial.attendance(date("2024-01-01"), &renamed.student_id),
        Some(true)
    );
    assert_eq!(tutorial.attendance(date("2024-01-01"), &alex.student_id), None);
    let lab = &model.assignment_list().assignments()[0];
    assert!(lab.is_completed_by(&renamed.student_id));
    assert!(!lab.is_completed_by(&alex.student_id));

    // A new student reusing the old id starts with no links.
    model.add_student(student("A0001", "Newcomer")).unwrap();
    assert!(!model.set_student_attendance(
        &alex.student_id,
        &class("T01"),
        date("2024-01-08")
    ));
    assert!(!model.assignment_list().assignments()[0].is_completed_by(&alex.student_id));
}

#[test]
fn set_student_with_new_class_moves_roster() {
    let mut model = sample_model();
    model.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    model.add_tutorial(Tutorial::new(class("T02"))).unwrap();
    let alex = model.address_book().students()[0].clone();
    model.assign_student(&alex, &class("T01")).unwrap();
    model.set_student_attendance(&alex.student_id, &class("T01"), date("2024-01-01"));
    let alex = model
        .address_book()
        .student_by_id(&alex.student_id)
        .cloned()
        .unwrap();

    model
        .set_student(&alex, alex.with_tutorial_class(Some(class("T02"))))
        .unwrap();

    let tutorials = model.tutorial_list();
    let t01 = tutorials.tutorial(&class("T01")).unwrap();
    assert!(!t01.has_student(&alex.student_id));
    assert_eq!(t01.attendance(date("2024-01-01"), &alex.student_id), None);
    assert!(tutorials.tutorial(&class("T02")).unwrap().has_student(&alex.student_id));

    let alex = model
        .address_book()
        .student_by_id(&alex.student_id)
        .cloned()
        .unwrap();
    model.set_student(&alex, alex.with_tutorial_class(None)).unwrap();
    assert!(!model
        .tutorial_list()
        .tutorial(&class("T02"))
        .unwrap()
        .has_student(&alex.student_id));
}

#[test]
fn set_student_with_unknown_class_changes_nothing() {
    let mut model = sample_model();
    model.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    let alex = model.address_book().students()[0].clone();
    let book_before = model.address_book().clone();
    let tutorials_before = model.tutorial_list().clone();

    let err = model
        .set_student(&alex, alex.with_tutorial_class(Some(class("T09"))))
        .unwrap_err();
    assert_eq!(err, CollectionError::TutorialNotFound(class("T09")));
    assert_eq!(model.address_book(), &book_before);
    assert_eq!(model.tutorial_list(), &tutorials_before);

    let ghost = student("A0404", "Ghost");
    let err = model.set_student(&ghost, ghost.clone()).unwrap_err();
    assert_eq!(err, CollectionError::StudentNotFound(ghost.student_id.clone()));
}

#[test]
fn new_model_repairs_links_between_collections() {
    let stray = Student {
        tutorial_class: Some(class("T09")),
        ..student("A0001", "Alex Yeoh")
    };
    let unrostered = Student {
        tutorial_class: Some(class("T01")),
        ..student("A0002", "Bernice Yu")
    };
    let book = AddressBook::from_students(vec![stray, unrostered]).unwrap();
    let mut t01 = Tutorial::new(class("T01"));
    t01.add_student(StudentId::parse("A0001").unwrap());
    t01.add_student(StudentId::parse("Z0404").unwrap());
    let tutorials = TutorialList::from_tutorials(vec![t01]).unwrap();
    let mut lab = assignment("Lab 1");
    lab.set_status(StudentId::parse("A0002").unwrap(), true);
    lab.set_status(StudentId::parse("Z0404").unwrap(), true);
    let assignments = AssignmentList::from_assignments(vec![lab]).unwrap();

    let mut model = ModelManager::new(book, UserPrefs::default(), assignments, tutorials);

    let alex = model
        .address_book()
        .student_by_id(&StudentId::parse("A0001").unwrap())
        .unwrap();
    assert_eq!(alex.tutorial_class, None);
    let roster = model.tutorial_list().tutorial(&class("T01")).unwrap().roster();
    assert_eq!(roster, &[StudentId::parse("A0002").unwrap()]);
    assert_eq!(model.assignment_list().assignments()[0].completed_count(), 1);
    assert_eq!(model.reconcile_links(), 0);
}

#[test]
fn assign_student_checks_tutorial_before_student() {
    let mut model = ModelManager::default();
    let ghost = student("A0404", "Ghost");

    let err = model.assign_student(&ghost, &class("T01")).unwrap_err();
    assert_eq!(err, CollectionError::TutorialNotFound(class("T01")));

    model.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    let before = model.tutorial_list().clone();
    let err = model.assign_student(&ghost, &class("T01")).unwrap_err();
    assert_eq!(
        err,
        CollectionError::StudentNotFound(ghost.student_id.clone())
    );
    assert_eq!(model.tutorial_list(), &before);
}

#[test]
fn assign_student_moves_between_tutorials() {
    let mut model = sample_model();
    model.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    model.add_tutorial(Tutorial::new(class("T02"))).unwrap();
    let alex = model.address_book().students()[0].clone();

    model.assign_student(&alex, &class("T01")).unwrap();
    model.assign_student(&alex, &class("T02")).unwrap();

    let tutorials = model.tutorial_list();
    assert!(!tutorials.tutorial(&class("T01")).unwrap().has_student(&alex.student_id));
    assert!(tutorials.tutorial(&class("T02")).unwrap().has_student(&alex.student_id));
    let stored = model.address_book().student_by_id(&alex.student_id).unwrap();
    assert_eq!(stored.tutorial_class, Some(class("T02")));
}

#[test]
fn delete_student_cascades_to_rosters_and_statuses() {
    let mut model = sample_model();
    model.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    model.add_assignment(assignment("Lab 1")).unwrap();
    let alex = model.address_book().students()[0].clone();
    model.assign_student(&alex, &class("T01")).unwrap();
    model.set_student_attendance(&alex.student_id, &class("T01"), date("2024-01-01"));
    let alex = model
        .address_book()
        .student_by_id(&alex.student_id)
        .cloned()
        .unwrap();
    model
        .set_assignment_status(&assignment("Lab 1"), &alex, true)
        .unwrap();

    model.delete_student(&alex).unwrap();

    let tutorial = model.tutorial_list().tutorial(&class("T01")).unwrap();
    assert!(tutorial.roster().is_empty());
    assert!(tutorial.session_dates().is_empty());
    assert_eq!(model.assignment_list().assignments()[0].completed_count(), 0);
}

#[test]
fn delete_tutorial_clears_student_class() {
    let mut model = sample_model();
    model.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    let alex = model.address_book().students()[0].clone();
    model.assign_student(&alex, &class("T01")).unwrap();

    model.delete_tutorial(&Tutorial::new(class("T01"))).unwrap();

    assert!(!model.has_tutorial_class(&class("T01")));
    let stored = model.address_book().student_by_id(&alex.student_id).unwrap();
    assert_eq!(stored.tutorial_class, None);
}

#[test]
fn assignment_status_reports_missing_assignment_then_student() {
    let mut model = ModelManager::default();
    let ghost = student("A0404", "Ghost");

    let err = model
        .set_assignment_status(&assignment("Lab 1"), &ghost, true)
        .unwrap_err();
    assert!(matches!(err, CollectionError::AssignmentNotFound(_)));

    model.add_assignment(assignment("Lab 1")).unwrap();
    let err = model
        .set_assignment_status(&assignment("Lab 1"), &ghost, true)
        .unwrap_err();
    assert!(matches!(err, CollectionError::StudentNotFound(_)));
}

#[test]
fn check_assignment_summarizes_whole_address_book() {
    let mut model = sample_model();
    model.add_assignment(assignment("Lab 1")).unwrap();
    let alex = model.address_book().students()[0].clone();
    model
        .set_assignment_status(&assignment("Lab 1"), &alex, true)
        .unwrap();
    model.update_filtered_student_list(StudentPredicate::name_contains_any(vec![
        "Roy".to_string(),
    ]));

    let summary = model.check_assignment(&assignment("Lab 1")).unwrap();
    assert!(summary.starts_with("Assignment: Lab 1\nA0001 Alex Yeoh: completed"));
    assert!(summary.ends_with("1/6 completed"));
    assert_eq!(model.list_assignments(), "1. Lab 1");
}

#[test]
fn equality_ignores_tutorial_list() {
    let mut left = sample_model();
    let right = sample_model();
    left.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    assert_eq!(left, right);

    left.add_assignment(assignment("Lab 1")).unwrap();
    assert_ne!(left, right);
}

#[test]
fn subscribers_see_every_view_change() {
    let mut model = sample_model();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = model.subscribe(move |students| sink.borrow_mut().push(students.len()));

    model.update_filtered_student_list(StudentPredicate::name_contains_any(vec![
        "Alex".to_string(),
    ]));
    let alex = model.filtered_student_list()[0].clone();
    model.delete_student(&alex).unwrap();
    assert_eq!(*seen.borrow(), vec![1, 0]);

    assert!(model.unsubscribe(id));
    model.update_filtered_student_list(StudentPredicate::show_all());
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn clear_empties_collections_but_keeps_prefs() {
    let mut model = sample_model();
    model.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    model.add_assignment(assignment("Lab 1")).unwrap();
    model.set_address_book_file_path("elsewhere/book.json");

    model.clear();

    assert_eq!(model.address_book(), &AddressBook::new());
    assert!(model.tutorial_list().is_empty());
    assert!(model.assignment_list().is_empty());
    assert!(model.filtered_student_list().is_empty());
    assert_eq!(
        model.address_book_file_path(),
        std::path::Path::new("elsewhere/book.json")
    );
}
