#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! End-to-end report orchestration: fetch, resolve, aggregate, assemble,
//! render.
//!
//! Each function here serves one report request and runs sequentially; the
//! only internal concurrency is the relation loader's paired fetches. All
//! lookup maps are request-scoped and dropped when the report is done.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::{
    aggregate::{self, AggregateResult},
    fetch::{RecordFetcher, RelationSource, resolve_relations},
    records::{Enrollment, EnrollmentId, Grade, Person, PersonId, Subject, SubjectId},
    report::{self, GradeLine, ReportDocument, SubjectHeader},
    report::factory::{ReportArtifact, renderer_for},
};

/// Fetches the grades of every enrollment into an id-keyed map.
async fn grades_by_enrollment<F: RecordFetcher>(
    fetcher: &F,
    enrollments: &[Enrollment],
) -> Result<HashMap<EnrollmentId, Vec<Grade>>> {
    let mut grades = HashMap::with_capacity(enrollments.len());
    for enrollment in enrollments {
        let rows = fetcher
            .fetch_grades_for_enrollment(enrollment.id)
            .await
            .with_context(|| format!("Could not fetch grades for enrollment {}", enrollment.id))?;
        grades.insert(enrollment.id, rows);
    }
    Ok(grades)
}

/// Assembles the student-centric report document for one student.
pub async fn build_student_report<F: RecordFetcher>(
    fetcher: &F,
    student: &Person,
    credit_weighted: bool,
) -> Result<ReportDocument> {
    let enrollments = fetcher
        .fetch_enrollments_for_student(student.id)
        .await
        .with_context(|| format!("Could not fetch enrollments for student {}", student.id))?;

    let sources: Vec<RelationSource<'_>> =
        enrollments.iter().map(RelationSource::Enrollment).collect();
    let relations = resolve_relations(fetcher, &sources).await?;
    let grades = grades_by_enrollment(fetcher, &enrollments).await?;

    Ok(report::student_report(
        student,
        &enrollments,
        &grades,
        &relations.subjects,
        credit_weighted,
    ))
}

/// Assembles the subject-centric report document for one subject.
pub async fn build_subject_report<F: RecordFetcher>(
    fetcher: &F,
    subject: &Subject,
) -> Result<ReportDocument> {
    let enrollments = fetcher
        .fetch_enrollments_for_subject(subject.id)
        .await
        .with_context(|| format!("Could not fetch enrollments for subject {}", subject.id))?;

    let sources: Vec<RelationSource<'_>> =
        enrollments.iter().map(RelationSource::Enrollment).collect();
    let relations = resolve_relations(fetcher, &sources).await?;
    let grades = grades_by_enrollment(fetcher, &enrollments).await?;

    Ok(report::subject_report(subject, &enrollments, &grades, &relations.students))
}

/// Assembles the administrative dossier for one student. Same document shape
/// as [`build_student_report`]; authorization of the caller is outside this
/// crate.
pub async fn build_student_dossier<F: RecordFetcher>(
    fetcher: &F,
    student: &Person,
) -> Result<ReportDocument> {
    info!(student = student.id, "building administrative dossier");
    build_student_report(fetcher, student, true).await
}

/// One subject's standing for one student: the raw grades and their average.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SubjectStatus {
    /// The subject in question.
    pub subject:    SubjectHeader,
    /// The linking enrollment.
    pub enrollment: Enrollment,
    /// Raw grades recorded so far.
    pub grades:     Vec<GradeLine>,
    /// Average over those grades; `NoData` when none exist yet.
    pub average:    AggregateResult,
}

/// Looks up one student's standing in one subject.
///
/// Returns `Ok(None)` when the student is not enrolled in the subject or the
/// subject row cannot be resolved.
pub async fn subject_status<F: RecordFetcher>(
    fetcher: &F,
    student_id: PersonId,
    subject_id: SubjectId,
) -> Result<Option<SubjectStatus>> {
    let enrollments = fetcher
        .fetch_enrollments_for_student(student_id)
        .await
        .with_context(|| format!("Could not fetch enrollments for student {student_id}"))?;
    let Some(enrollment) = enrollments.iter().find(|e| e.subject_id == subject_id).copied()
    else {
        return Ok(None);
    };

    let subject_ids = std::iter::once(subject_id).collect();
    let subjects = fetcher
        .fetch_subjects(&subject_ids)
        .await
        .with_context(|| format!("Could not fetch subject {subject_id}"))?;
    let Some(subject) = subjects.get(&subject_id) else {
        return Ok(None);
    };

    let grades = fetcher
        .fetch_grades_for_enrollment(enrollment.id)
        .await
        .with_context(|| format!("Could not fetch grades for enrollment {}", enrollment.id))?;
    let scores: Vec<_> = grades.iter().map(|g| g.score).collect();

    Ok(Some(SubjectStatus {
        subject: SubjectHeader::from(subject),
        enrollment,
        grades: grades.iter().map(GradeLine::from).collect(),
        average: aggregate::average(&scores),
    }))
}

/// Renders an already-assembled document into the requested format.
///
/// The format string is resolved case-insensitively; an unknown format fails
/// with `UnsupportedFormat` carrying the offending string, never a silent
/// fallback.
pub fn render(document: &ReportDocument, format: &str) -> Result<ReportArtifact> {
    let renderer = renderer_for(format)?;
    let artifact = renderer.render(document)?;
    info!(
        filename = %artifact.filename,
        content_type = artifact.content_type,
        bytes = artifact.content.len(),
        "rendered report artifact"
    );
    Ok(artifact)
}
