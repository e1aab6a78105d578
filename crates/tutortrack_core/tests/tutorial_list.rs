use chrono::NaiveDate;
use tutortrack_core::{
    CollectionError, Email, Name, Phone, Student, StudentId, Tutorial, TutorialClass, TutorialList,
};

fn student(id: &str) -> Student {
    Student::new(
        StudentId::parse(id).unwrap(),
        Name::parse("Some Student").unwrap(),
        Phone::parse("91234567").unwrap(),
        Email::parse("student@example.com").unwrap(),
    )
}

fn class(code: &str) -> TutorialClass {
    TutorialClass::parse(code).unwrap()
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

#[test]
fn add_and_delete_tutorials_by_identity() {
    let mut list = TutorialList::new();
    list.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    assert!(list.has_tutorial(&Tutorial::new(class("T01"))));
    assert!(list.has_tutorial_class(&class("T01")));

    let err = list.add_tutorial(Tutorial::new(class("t01"))).unwrap_err();
    assert_eq!(err, CollectionError::DuplicateTutorial(class("T01")));
    assert_eq!(list.len(), 1);

    list.delete_tutorial(&Tutorial::new(class("T01"))).unwrap();
    assert!(list.is_empty());
    let err = list.delete_tutorial(&Tutorial::new(class("T01"))).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn assign_student_to_unknown_class_fails_without_changes() {
    let mut list = TutorialList::new();
    list.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    let before = list.clone();

    let err = list
        .assign_student(&student("A0001"), &class("T09"))
        .unwrap_err();
    assert_eq!(err, CollectionError::TutorialNotFound(class("T09")));
    assert_eq!(list, before);
}

#[test]
fn attendance_requires_roster_membership() {
    let mut list = TutorialList::new();
    list.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    let s1 = student("A0001");
    let day = date("2024-01-01");

    assert!(!list.set_attendance(&class("T01"), day, &s1.student_id));
    assert_eq!(list.tutorial(&class("T01")).unwrap().attendance(day, &s1.student_id), None);

    list.assign_student(&s1, &class("T01")).unwrap();
    assert!(list.set_attendance(&class("T01"), day, &s1.student_id));
    assert_eq!(
        list.tutorial(&class("T01")).unwrap().attendance(day, &s1.student_id),
        Some(true)
    );
}

#[test]
fn attendance_on_unknown_class_is_silent_false() {
    let mut list = TutorialList::new();
    list.add_tutorial(Tutorial::new(class("T01"))).unwrap();
    list.assign_student(&student("A0001"), &class("T01")).unwrap();
    let before = list.clone();

    let recorded = list.set_attendance(
        &class("T99"),
        date("2024-01-01"),
        &StudentId::parse("A0001").unwrap(),
    );
    assert!(!recorded);
    assert_eq!(list, before);
}

#[test]
fn roster_is_deduplicated_and_unassign_drops_attendance() {
    let mut tutorial = Tutorial::new(class("T01"));
    let id = StudentId::parse("A0001").unwrap();
    assert!(tutorial.add_student(id.clone()));
    assert!(!tutorial.add_student(id.clone()));
    assert_eq!(tutorial.roster().len(), 1);

    assert!(tutorial.mark_attendance(date("2024-01-01"), &id, false));
    assert!(tutorial.set_attendance(date("2024-01-08"), &id));
    assert_eq!(
        tutorial.session_dates(),
        vec![date("2024-01-01"), date("2024-01-08")]
    );

    let mut list = TutorialList::from_tutorials(vec![tutorial]).unwrap();
    assert_eq!(list.unassign_student(&id), 1);
    let tutorial = list.tutorial(&class("T01")).unwrap();
    assert!(tutorial.roster().is_empty());
    assert!(tutorial.session_dates().is_empty());
}

#[test]
fn attendance_on_lists_roster_with_absent_default() {
    let mut tutorial = Tutorial::new(class("T02"));
    let first = StudentId::parse("A0001").unwrap();
    let second = StudentId::parse("A0002").unwrap();
    tutorial.add_student(first.clone());
    tutorial.add_student(second.clone());
    tutorial.set_attendance(date("2024-02-05"), &second);

    assert_eq!(
        tutorial.attendance_on(date("2024-02-05")),
        vec![(first, false), (second, true)]
    );
}

#[test]
fn tutorial_wire_shape_lists_roster_and_attendance() {
    let mut tutorial = Tutorial::new(class("T01"));
    let id = StudentId::parse("A0001").unwrap();
    tutorial.add_student(id.clone());
    tutorial.set_attendance(date("2024-01-01"), &id);

    let json = serde_json::to_value(&tutorial).unwrap();
    assert_eq!(json["tutorial_class"], "T01");
    assert_eq!(json["students"], serde_json::json!(["A0001"]));
    assert_eq!(
        json["attendance"],
        serde_json::json!([{"date": "2024-01-01", "student_id": "A0001", "present": true}])
    );

    let decoded: Tutorial = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, tutorial);
}

#[test]
fn deserialize_rejects_attendance_for_unrostered_student() {
    let value = serde_json::json!({
        "tutorial_class": "T01",
        "students": [],
        "attendance": [{"date": "2024-01-01", "student_id": "A0001", "present": true}]
    });

    let err = serde_json::from_value::<Tutorial>(value).unwrap_err();
    assert!(
        err.to_string().contains("outside tutorial T01"),
        "unexpected error: {err}"
    );
}
