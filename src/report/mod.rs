#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Canonical report documents and the assembler that builds them.
//!
//! Every audience-specific report is first composed into a format-agnostic
//! [`ReportDocument`]; renderers consume that document and nothing else. The
//! document is a tagged sum type so renderers match exhaustively on its shape
//! instead of probing for optional keys.

/// Renderer registry and the artifact contract.
pub mod factory;
/// Self-contained HTML rendering.
pub mod html;
/// JSON rendering with lossless averages.
pub mod json;
/// Paginated PDF rendering.
pub mod pdf;

use std::collections::HashMap;

use bon::Builder;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    aggregate::{self, AggregateResult},
    fetch::Resolved,
    records::{Enrollment, EnrollmentId, Grade, Person, PersonId, Subject, SubjectId},
};

/// Display token used wherever an average is absent.
pub const NO_AVERAGE: &str = "N/A";
/// Placeholder label for entries whose related row could not be resolved.
pub const UNAVAILABLE: &str = "related data unavailable";

/// Identity block for the person a report is about.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(on(String, into))]
pub struct StudentHeader {
    /// Row identifier.
    pub id:               PersonId,
    /// Given name.
    pub first_name:       String,
    /// Family name.
    pub last_name:        String,
    /// Institutional code, also used in artifact filenames.
    pub code:             String,
    /// Academic program, when present.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub academic_program: Option<String>,
}

impl From<&Person> for StudentHeader {
    fn from(person: &Person) -> Self {
        Self {
            id:               person.id,
            first_name:       person.first_name.clone(),
            last_name:        person.last_name.clone(),
            code:             person.code.clone(),
            academic_program: person.academic_program.clone(),
        }
    }
}

impl StudentHeader {
    /// Full display name in `first last` order.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Identity block for the subject a report row describes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(on(String, into))]
pub struct SubjectHeader {
    /// Row identifier.
    pub id:      SubjectId,
    /// Display name.
    pub name:    String,
    /// Institutional code, also used in artifact filenames.
    pub code:    String,
    /// Credit weight.
    pub credits: u8,
}

impl From<&Subject> for SubjectHeader {
    fn from(subject: &Subject) -> Self {
        Self {
            id:      subject.id,
            name:    subject.name.clone(),
            code:    subject.code.clone(),
            credits: subject.credits,
        }
    }
}

/// One raw grade as it appears inside a report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GradeLine {
    /// Score in `[0.00, 5.00]`.
    pub score:  Decimal,
    /// Term label.
    pub period: String,
    /// Date the grade was recorded.
    pub date:   NaiveDate,
}

impl From<&Grade> for GradeLine {
    fn from(grade: &Grade) -> Self {
        Self {
            score:  grade.score,
            period: grade.period.clone(),
            date:   grade.date,
        }
    }
}

/// One subject row of a student-centric report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubjectLine {
    /// The subject this row describes.
    pub subject: SubjectHeader,
    /// Raw grades behind the average.
    pub grades:  Vec<GradeLine>,
    /// Per-subject average; explicit `NoData` when no grades exist yet.
    pub average: AggregateResult,
}

/// One student row of a subject-centric report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StudentLine {
    /// The student this row describes, or `None` when the student row could
    /// not be resolved; renderers show a placeholder for such rows.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub student: Option<StudentHeader>,
    /// Raw grades behind the average.
    pub grades:  Vec<GradeLine>,
    /// Per-student average; explicit `NoData` when no grades exist yet.
    pub average: AggregateResult,
}

/// Student-centric report body: every enrolled subject with its average, plus
/// the credit-weighted overall average.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StudentReport {
    /// Who the report is about.
    pub student:         StudentHeader,
    /// One row per enrollment with a resolvable subject.
    pub subjects:        Vec<SubjectLine>,
    /// Credit-weighted overall average; ungraded subjects do not contribute.
    pub overall_average: AggregateResult,
}

/// Subject-centric report body: every enrolled student with their average.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubjectReport {
    /// Which subject the report covers.
    pub subject:  SubjectHeader,
    /// One row per enrollment, including placeholder rows for students that
    /// could not be resolved.
    pub students: Vec<StudentLine>,
}

/// Metadata-only report body used when there is no audience-specific data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GenericReport {
    /// Optional title override.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
}

/// The canonical, format-agnostic report document.
///
/// Renderers never mutate a document; each render call constructs a fresh
/// artifact from it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportDocument {
    /// Subject list for a single student.
    Student(StudentReport),
    /// Student list for a single subject.
    Subject(SubjectReport),
    /// Metadata/timestamp wrapper with no data table.
    Generic(GenericReport),
}

impl ReportDocument {
    /// Institutional code driving the artifact filename, when one exists.
    pub fn filename_code(&self) -> Option<&str> {
        match self {
            ReportDocument::Student(r) => Some(&r.student.code),
            ReportDocument::Subject(r) => Some(&r.subject.code),
            ReportDocument::Generic(_) => None,
        }
    }

    /// Human-readable title driven by the audience of this document.
    pub fn title(&self) -> String {
        match self {
            ReportDocument::Student(r) => {
                format!("Academic Report - {}", r.student.display_name())
            }
            ReportDocument::Subject(r) => format!("Grade Report - {}", r.subject.name),
            ReportDocument::Generic(r) => {
                r.title.clone().unwrap_or_else(|| "Academic Report".to_string())
            }
        }
    }
}

/// Composes the student-centric report document.
///
/// Enrollments whose subject could not be resolved are omitted from the
/// subject list; that is a display-layer omission only, nothing is deleted.
/// When `credit_weighted` is set, the overall average scales each subject
/// average by its credit weight, excluding ungraded subjects entirely.
pub fn student_report(
    student: &Person,
    enrollments: &[Enrollment],
    grades_by_enrollment: &HashMap<EnrollmentId, Vec<Grade>>,
    subjects_by_id: &HashMap<SubjectId, Resolved<Subject>>,
    credit_weighted: bool,
) -> ReportDocument {
    let mut subjects = Vec::with_capacity(enrollments.len());
    let mut per_subject: Vec<(AggregateResult, u8)> = Vec::with_capacity(enrollments.len());

    for enrollment in enrollments {
        let Some(subject) = subjects_by_id.get(&enrollment.subject_id).and_then(Resolved::found)
        else {
            warn!(
                enrollment = enrollment.id,
                subject = enrollment.subject_id,
                "skipping enrollment with unresolvable subject"
            );
            continue;
        };

        let grades = grades_by_enrollment
            .get(&enrollment.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let average = average_of(grades);

        per_subject.push((average, subject.credits));
        subjects.push(SubjectLine {
            subject: SubjectHeader::from(subject),
            grades: grades.iter().map(GradeLine::from).collect(),
            average,
        });
    }

    let overall_average = if credit_weighted {
        aggregate::weighted_average(&per_subject)
    } else {
        let averages: Vec<Decimal> =
            per_subject.iter().filter_map(|(result, _)| result.value()).collect();
        aggregate::average(&averages)
    };

    debug!(
        student = student.id,
        subjects = subjects.len(),
        overall = %overall_average,
        "assembled student report"
    );

    ReportDocument::Student(StudentReport {
        student: StudentHeader::from(student),
        subjects,
        overall_average,
    })
}

/// Composes the subject-centric report document.
///
/// Enrollments whose student could not be resolved keep their row with a
/// placeholder identity, so the report never silently drops a graded
/// enrollment.
pub fn subject_report(
    subject: &Subject,
    enrollments: &[Enrollment],
    grades_by_enrollment: &HashMap<EnrollmentId, Vec<Grade>>,
    students_by_id: &HashMap<PersonId, Resolved<Person>>,
) -> ReportDocument {
    let mut students = Vec::with_capacity(enrollments.len());

    for enrollment in enrollments {
        let student = students_by_id.get(&enrollment.student_id).and_then(Resolved::found);
        if student.is_none() {
            warn!(
                enrollment = enrollment.id,
                student = enrollment.student_id,
                "student row unresolvable, keeping placeholder entry"
            );
        }

        let grades = grades_by_enrollment
            .get(&enrollment.id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        students.push(StudentLine {
            student: student.map(StudentHeader::from),
            grades:  grades.iter().map(GradeLine::from).collect(),
            average: average_of(grades),
        });
    }

    debug!(subject = subject.id, students = students.len(), "assembled subject report");

    ReportDocument::Subject(SubjectReport {
        subject: SubjectHeader::from(subject),
        students,
    })
}

/// Composes the administrative single-student dossier.
///
/// Identical in shape to [`student_report`]; which callers may invoke it is an
/// authorization concern that lives outside this crate.
pub fn single_student_dossier(
    student: &Person,
    enrollments: &[Enrollment],
    grades_by_enrollment: &HashMap<EnrollmentId, Vec<Grade>>,
    subjects_by_id: &HashMap<SubjectId, Resolved<Subject>>,
) -> ReportDocument {
    info!(student = student.id, "assembling administrative dossier");
    student_report(student, enrollments, grades_by_enrollment, subjects_by_id, true)
}

/// Averages the scores of a grade slice.
fn average_of(grades: &[Grade]) -> AggregateResult {
    let scores: Vec<Decimal> = grades.iter().map(|g| g.score).collect();
    aggregate::average(&scores)
}
