#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use tracing::debug;

use crate::records::{Enrollment, EnrollmentId, Grade, Person, PersonId, Subject, SubjectId};

/// Read-only access to the backing record store.
///
/// Implementations return empty maps/lists for empty or unknown input instead
/// of failing; errors are reserved for genuine store faults. The storage
/// engine itself (and any timeout/retry policy) lives behind this trait.
pub trait RecordFetcher {
    /// Fetches all persons whose ids appear in `ids`, keyed by id. Ids with no
    /// backing row are simply absent from the result.
    fn fetch_students(
        &self,
        ids: &HashSet<PersonId>,
    ) -> impl Future<Output = Result<HashMap<PersonId, Person>>> + Send;

    /// Fetches all subjects whose ids appear in `ids`, keyed by id.
    fn fetch_subjects(
        &self,
        ids: &HashSet<SubjectId>,
    ) -> impl Future<Output = Result<HashMap<SubjectId, Subject>>> + Send;

    /// Fetches every enrollment belonging to one student.
    fn fetch_enrollments_for_student(
        &self,
        id: PersonId,
    ) -> impl Future<Output = Result<Vec<Enrollment>>> + Send;

    /// Fetches every enrollment belonging to one subject.
    fn fetch_enrollments_for_subject(
        &self,
        id: SubjectId,
    ) -> impl Future<Output = Result<Vec<Enrollment>>> + Send;

    /// Fetches every grade recorded against one enrollment.
    fn fetch_grades_for_enrollment(
        &self,
        id: EnrollmentId,
    ) -> impl Future<Output = Result<Vec<Grade>>> + Send;
}

/// Resolution outcome for a single related entity.
///
/// An identifier referenced by the input but absent from the store (a deleted
/// row, say) resolves to [`Resolved::Missing`] rather than panicking or being
/// silently dropped, so downstream composition can render a "related data
/// unavailable" placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    /// The related row was found.
    Found(T),
    /// The related row could not be resolved.
    Missing,
}

impl<T> Resolved<T> {
    /// Returns the resolved entity, `None` when missing.
    pub fn found(&self) -> Option<&T> {
        match self {
            Resolved::Found(v) => Some(v),
            Resolved::Missing => None,
        }
    }
}

/// A record whose student/subject cross-references need resolving.
///
/// Grades reference students and subjects only through their owning
/// enrollment; a grade whose enrollment is unknown contributes no keys.
#[derive(Debug, Clone, Copy)]
pub enum RelationSource<'a> {
    /// An enrollment row.
    Enrollment(&'a Enrollment),
    /// A grade row paired with its owning enrollment, if known.
    Grade(&'a Grade, Option<&'a Enrollment>),
}

impl RelationSource<'_> {
    /// The (student, subject) key pair this record references, if any.
    fn keys(&self) -> Option<(PersonId, SubjectId)> {
        match self {
            RelationSource::Enrollment(e) => Some((e.student_id, e.subject_id)),
            RelationSource::Grade(_, Some(e)) => Some((e.student_id, e.subject_id)),
            RelationSource::Grade(_, None) => None,
        }
    }
}

/// Related students and subjects materialized as request-scoped lookup maps.
///
/// Every identifier referenced by the input appears as a key; the maps are
/// built once per report request and discarded afterwards, never shared or
/// mutated across requests.
#[derive(Debug, Default)]
pub struct ResolvedRelations {
    /// Student id → resolved person.
    pub students: HashMap<PersonId, Resolved<Person>>,
    /// Subject id → resolved subject.
    pub subjects: HashMap<SubjectId, Resolved<Subject>>,
}

impl ResolvedRelations {
    /// Looks up a resolved student, treating unknown ids as missing.
    pub fn student(&self, id: PersonId) -> Option<&Person> {
        self.students.get(&id).and_then(Resolved::found)
    }

    /// Looks up a resolved subject, treating unknown ids as missing.
    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.get(&id).and_then(Resolved::found)
    }
}

/// Resolves the student and subject references of a batch of records using
/// exactly one fetch per related-entity type.
///
/// Distinct keys are collected into sets first, so the fetch count is two (one
/// per entity type) regardless of how many records were passed in.
/// The two fetches are issued concurrently; sequential execution would be
/// equally correct.
pub async fn resolve_relations<F: RecordFetcher>(
    fetcher: &F,
    records: &[RelationSource<'_>],
) -> Result<ResolvedRelations> {
    let mut student_ids: HashSet<PersonId> = HashSet::new();
    let mut subject_ids: HashSet<SubjectId> = HashSet::new();

    for record in records {
        if let Some((student_id, subject_id)) = record.keys() {
            student_ids.insert(student_id);
            subject_ids.insert(subject_id);
        }
    }

    debug!(
        records = records.len(),
        students = student_ids.len(),
        subjects = subject_ids.len(),
        "resolving batch relations"
    );

    let (students_found, subjects_found) = futures::try_join!(
        fetcher.fetch_students(&student_ids),
        fetcher.fetch_subjects(&subject_ids),
    )?;

    let mut resolved = ResolvedRelations::default();
    for id in student_ids {
        let entry = match students_found.get(&id) {
            Some(person) => Resolved::Found(person.clone()),
            None => Resolved::Missing,
        };
        resolved.students.insert(id, entry);
    }
    for id in subject_ids {
        let entry = match subjects_found.get(&id) {
            Some(subject) => Resolved::Found(subject.clone()),
            None => Resolved::Missing,
        };
        resolved.subjects.insert(id, entry);
    }

    Ok(resolved)
}
