use std::collections::HashMap;

use chrono::NaiveDate;
use registro::{
    AggregateResult,
    ReportDocument,
    fetch::Resolved,
    records::{Enrollment, EnrollmentId, Grade, Person, PersonId, Role, Subject, SubjectId},
    report::{single_student_dossier, student_report, subject_report},
};
use rust_decimal_macros::dec;

fn student(id: PersonId) -> Person {
    Person::builder()
        .id(id)
        .first_name("María")
        .last_name("Pérez")
        .code(format!("EST-2025-{id:04}"))
        .email("maria.perez@uni.edu")
        .academic_program("Systems Engineering")
        .role(Role::Student)
        .build()
}

fn subject(id: SubjectId, name: &str, credits: u8) -> Subject {
    Subject::builder()
        .id(id)
        .name(name)
        .code(format!("SUB-{id:03}"))
        .credits(credits)
        .instructor_id(500)
        .build()
}

fn grade(id: i64, enrollment_id: EnrollmentId, score: rust_decimal::Decimal) -> Grade {
    Grade::builder()
        .id(id)
        .enrollment_id(enrollment_id)
        .score(score)
        .period("2024-1")
        .date(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap())
        .build()
}

fn found<T>(items: Vec<(i64, T)>) -> HashMap<i64, Resolved<T>> {
    items.into_iter().map(|(id, item)| (id, Resolved::Found(item))).collect()
}

#[test]
fn student_report_computes_per_subject_and_weighted_overall() {
    let student = student(1);
    let enrollments = vec![
        Enrollment::builder().id(10).student_id(1).subject_id(100).build(),
        Enrollment::builder().id(11).student_id(1).subject_id(101).build(),
    ];
    let mut grades = HashMap::new();
    grades.insert(10, vec![grade(1, 10, dec!(4.0)), grade(2, 10, dec!(4.5))]);
    grades.insert(11, Vec::new());
    let subjects = found(vec![
        (100, subject(100, "Cálculo I", 3)),
        (101, subject(101, "Física I", 2)),
    ]);

    let document = student_report(&student, &enrollments, &grades, &subjects, true);
    let ReportDocument::Student(report) = document else {
        panic!("expected a student document");
    };

    assert_eq!(report.subjects.len(), 2);
    assert_eq!(report.subjects[0].average.value(), Some(dec!(4.25)));
    assert!(report.subjects[1].average.is_no_data());
    // the ungraded 2-credit subject contributes nothing to the overall
    assert_eq!(report.overall_average.value(), Some(dec!(4.25)));
}

#[test]
fn unweighted_overall_ignores_credits() {
    let student = student(1);
    let enrollments = vec![
        Enrollment::builder().id(10).student_id(1).subject_id(100).build(),
        Enrollment::builder().id(11).student_id(1).subject_id(101).build(),
    ];
    let mut grades = HashMap::new();
    grades.insert(10, vec![grade(1, 10, dec!(4.0))]);
    grades.insert(11, vec![grade(2, 11, dec!(5.0))]);
    let subjects = found(vec![
        (100, subject(100, "Cálculo I", 1)),
        (101, subject(101, "Física I", 9)),
    ]);

    let document = student_report(&student, &enrollments, &grades, &subjects, false);
    let ReportDocument::Student(report) = document else {
        panic!("expected a student document");
    };
    assert_eq!(report.overall_average.value(), Some(dec!(4.5)));
}

#[test]
fn enrollment_with_unresolvable_subject_is_omitted_from_display() {
    let student = student(1);
    let enrollments = vec![
        Enrollment::builder().id(10).student_id(1).subject_id(100).build(),
        Enrollment::builder().id(11).student_id(1).subject_id(999).build(),
    ];
    let mut grades = HashMap::new();
    grades.insert(10, vec![grade(1, 10, dec!(3.0))]);
    grades.insert(11, vec![grade(2, 11, dec!(5.0))]);
    let mut subjects = found(vec![(100, subject(100, "Cálculo I", 3))]);
    subjects.insert(999, Resolved::Missing);

    let document = student_report(&student, &enrollments, &grades, &subjects, true);
    let ReportDocument::Student(report) = document else {
        panic!("expected a student document");
    };

    assert_eq!(report.subjects.len(), 1);
    assert_eq!(report.subjects[0].subject.id, 100);
    // the skipped subject's grades do not leak into the overall average
    assert_eq!(report.overall_average.value(), Some(dec!(3.00)));
}

#[test]
fn all_subjects_ungraded_yields_no_data_overall_not_zero() {
    let student = student(1);
    let enrollments = vec![Enrollment::builder().id(10).student_id(1).subject_id(100).build()];
    let mut grades = HashMap::new();
    grades.insert(10, Vec::new());
    let subjects = found(vec![(100, subject(100, "Cálculo I", 3))]);

    let document = student_report(&student, &enrollments, &grades, &subjects, true);
    let ReportDocument::Student(report) = document else {
        panic!("expected a student document");
    };
    assert_eq!(report.overall_average, AggregateResult::NoData);
}

#[test]
fn subject_report_keeps_placeholder_rows_for_missing_students() {
    let course = subject(100, "Cálculo I", 3);
    let enrollments = vec![
        Enrollment::builder().id(10).student_id(1).subject_id(100).build(),
        Enrollment::builder().id(11).student_id(2).subject_id(100).build(),
    ];
    let mut grades = HashMap::new();
    grades.insert(10, vec![grade(1, 10, dec!(4.0))]);
    grades.insert(11, vec![grade(2, 11, dec!(2.0))]);
    let mut students = found(vec![(1, student(1))]);
    students.insert(2, Resolved::Missing);

    let document = subject_report(&course, &enrollments, &grades, &students);
    let ReportDocument::Subject(report) = document else {
        panic!("expected a subject document");
    };

    assert_eq!(report.students.len(), 2);
    assert!(report.students[0].student.is_some());
    // the graded enrollment survives even though its student row is gone
    assert!(report.students[1].student.is_none());
    assert_eq!(report.students[1].average.value(), Some(dec!(2.00)));
}

#[test]
fn dossier_matches_student_report_shape() {
    let student = student(7);
    let enrollments = vec![Enrollment::builder().id(10).student_id(7).subject_id(100).build()];
    let mut grades = HashMap::new();
    grades.insert(10, vec![grade(1, 10, dec!(4.5))]);
    let subjects = found(vec![(100, subject(100, "Cálculo I", 4))]);

    let dossier = single_student_dossier(&student, &enrollments, &grades, &subjects);
    let report = student_report(&student, &enrollments, &grades, &subjects, true);
    assert_eq!(dossier, report);
}

#[test]
fn zero_scores_average_to_zero_not_no_data() {
    let student = student(1);
    let enrollments = vec![Enrollment::builder().id(10).student_id(1).subject_id(100).build()];
    let mut grades = HashMap::new();
    grades.insert(10, vec![grade(1, 10, dec!(0.0)), grade(2, 10, dec!(0.0))]);
    let subjects = found(vec![(100, subject(100, "Cálculo I", 3))]);

    let document = student_report(&student, &enrollments, &grades, &subjects, true);
    let ReportDocument::Student(report) = document else {
        panic!("expected a student document");
    };
    assert_eq!(report.subjects[0].average.value(), Some(dec!(0.00)));
    assert_eq!(report.overall_average.value(), Some(dec!(0.00)));
}
