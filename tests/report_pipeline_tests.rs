use chrono::NaiveDate;
use registro::{
    ReportDocument,
    pipeline::{build_student_dossier, build_student_report, build_subject_report, render,
               subject_status},
    records::{Enrollment, Grade, Person, Role, Subject},
    store::{MemoryStore, RecordSet, StoreError},
    validate::ValidationError,
};
use rust_decimal_macros::dec;

/// One student enrolled in two subjects: Cálculo (3 credits, grades 4.0 and
/// 4.5) and Física (2 credits, no grades yet).
fn fixture() -> MemoryStore {
    let set = RecordSet {
        persons:     vec![
            Person::builder()
                .id(1)
                .first_name("María")
                .last_name("Pérez")
                .code("EST-2025-0001")
                .email("maria.perez@uni.edu")
                .academic_program("Systems Engineering")
                .role(Role::Student)
                .build(),
            Person::builder()
                .id(2)
                .first_name("Jorge")
                .last_name("Rojas")
                .code("PROF-2024-0001")
                .email("jorge.rojas@uni.edu")
                .role(Role::Instructor)
                .build(),
        ],
        subjects:    vec![
            Subject::builder()
                .id(100)
                .name("Cálculo I")
                .code("MAT-101")
                .credits(3)
                .instructor_id(2)
                .build(),
            Subject::builder()
                .id(101)
                .name("Física I")
                .code("FIS-101")
                .credits(2)
                .instructor_id(2)
                .build(),
        ],
        enrollments: vec![
            Enrollment::builder().id(10).student_id(1).subject_id(100).build(),
            Enrollment::builder().id(11).student_id(1).subject_id(101).build(),
        ],
        grades:      vec![
            Grade::builder()
                .id(1)
                .enrollment_id(10)
                .score(dec!(4.0))
                .period("2024-1")
                .date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
                .build(),
            Grade::builder()
                .id(2)
                .enrollment_id(10)
                .score(dec!(4.5))
                .period("2024-1")
                .date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
                .notes("Second midterm")
                .build(),
        ],
    };
    MemoryStore::from_records(set).expect("valid fixture")
}

#[tokio::test]
async fn student_report_end_to_end_in_json() {
    let store = fixture();
    let student = store.person(1).unwrap().clone();
    let document = build_student_report(&store, &student, true).await.expect("assemble");
    let artifact = render(&document, "JSON").expect("render");

    let value: serde_json::Value = serde_json::from_slice(&artifact.content).unwrap();
    assert_eq!(value["kind"], "student");
    assert_eq!(value["subjects"][0]["subject"]["code"], "MAT-101");
    assert_eq!(value["subjects"][0]["average"], "4.25");
    assert_eq!(value["subjects"][1]["average"], serde_json::Value::Null);
    // only the graded 3-credit subject contributes
    assert_eq!(value["overall_average"], "4.25");
}

#[tokio::test]
async fn student_report_end_to_end_in_html_and_pdf() {
    let store = fixture();
    let student = store.person(1).unwrap().clone();
    let document = build_student_report(&store, &student, true).await.expect("assemble");

    let html = render(&document, "html").expect("render html");
    let page = html.content_str().unwrap();
    assert!(page.contains("4.25"));
    assert!(page.contains("N/A"));

    let pdf = render(&document, "pdf").expect("render pdf");
    assert!(pdf.content.starts_with(b"%PDF"));
    assert_eq!(pdf.content_type, "application/pdf");
    // the ungraded subject's row must carry the N/A token, not a blank cell
    let contains = |needle: &[u8]| pdf.content.windows(needle.len()).any(|w| w == needle);
    assert!(contains(b"(4.25) Tj"));
    assert!(contains(b"(N/A) Tj"));
}

#[tokio::test]
async fn subject_report_lists_enrolled_students() {
    let store = fixture();
    let subject = store.subject(100).unwrap().clone();
    let document = build_subject_report(&store, &subject).await.expect("assemble");

    let ReportDocument::Subject(report) = &document else {
        panic!("expected a subject document");
    };
    assert_eq!(report.students.len(), 1);
    assert_eq!(report.students[0].average.value(), Some(dec!(4.25)));
    assert_eq!(
        report.students[0].student.as_ref().map(|s| s.code.as_str()),
        Some("EST-2025-0001")
    );
}

#[tokio::test]
async fn dossier_is_the_student_report() {
    let store = fixture();
    let student = store.person(1).unwrap().clone();
    let dossier = build_student_dossier(&store, &student).await.expect("assemble");
    let report = build_student_report(&store, &student, true).await.expect("assemble");
    assert_eq!(dossier, report);
}

#[tokio::test]
async fn subject_status_reports_average_or_absence() {
    let store = fixture();

    let status = subject_status(&store, 1, 100).await.expect("fetch").expect("enrolled");
    assert_eq!(status.average.value(), Some(dec!(4.25)));
    assert_eq!(status.grades.len(), 2);

    let ungraded = subject_status(&store, 1, 101).await.expect("fetch").expect("enrolled");
    assert!(ungraded.average.is_no_data());

    // not enrolled at all
    assert!(subject_status(&store, 2, 100).await.expect("fetch").is_none());
}

#[tokio::test]
async fn unknown_format_surfaces_unsupported_format() {
    let store = fixture();
    let student = store.person(1).unwrap().clone();
    let document = build_student_report(&store, &student, true).await.expect("assemble");
    let err = render(&document, "xml").expect_err("xml must fail");
    assert!(err.to_string().contains("`xml`"));
}

#[test]
fn store_rejects_out_of_range_scores_at_the_boundary() {
    let mut store = fixture();
    let grade = Grade::builder()
        .id(9)
        .enrollment_id(10)
        .score(dec!(5.5))
        .period("2024-2")
        .date(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap())
        .build();
    assert!(matches!(
        store.add_grade(grade),
        Err(StoreError::Invalid(ValidationError::ScoreOutOfRange { .. }))
    ));
}

#[test]
fn store_rejects_duplicate_enrollments_and_orphan_grades() {
    let mut store = fixture();
    let duplicate = Enrollment::builder().id(99).student_id(1).subject_id(100).build();
    assert!(matches!(
        store.add_enrollment(duplicate),
        Err(StoreError::DuplicateEnrollment { student_id: 1, subject_id: 100 })
    ));

    let orphan = Grade::builder()
        .id(9)
        .enrollment_id(404)
        .score(dec!(3.0))
        .period("2024-2")
        .date(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap())
        .build();
    assert!(matches!(
        store.add_grade(orphan),
        Err(StoreError::UnknownEnrollment { enrollment_id: 404, .. })
    ));
}

#[test]
fn fixture_json_loads_and_validates() {
    let json = r#"{
        "persons": [
            {"id": 1, "first_name": "Ana", "last_name": "Gil", "code": "EST-2025-0002",
             "email": "ana.gil@uni.edu", "academic_program": null, "role": "student"}
        ],
        "subjects": [
            {"id": 1, "name": "Química", "code": "QUI-101", "credits": 3, "instructor_id": 7,
             "schedule": null, "description": null}
        ],
        "enrollments": [{"id": 1, "student_id": 1, "subject_id": 1}],
        "grades": [
            {"id": 1, "enrollment_id": 1, "score": "3.75", "period": "2024-1",
             "date": "2024-04-02", "notes": null}
        ]
    }"#;
    let store = MemoryStore::from_json(json).expect("fixture loads");
    assert_eq!(store.person_by_code("EST-2025-0002").map(|p| p.id), Some(1));
    assert!(store.subject_by_code("QUI-101").is_some());
}
