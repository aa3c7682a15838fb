#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! An in-memory implementation of the record fetch interface.
//!
//! Stands in for the out-of-scope persistence layer: it enforces the same
//! boundary validation a real store would (score ranges, credit ranges,
//! referential checks on insert) and serves the fetch contract the report
//! pipeline consumes. Backed by plain maps, loadable from a JSON fixture.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    codes,
    fetch::RecordFetcher,
    records::{Enrollment, EnrollmentId, Grade, GradeId, Person, PersonId, Role, Subject,
              SubjectId},
    validate::{self, ValidationError},
};

/// Errors raised when a record is rejected at the store boundary.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The record failed field-level validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// An enrollment for this (student, subject) pair already exists.
    #[error("Student {student_id} is already enrolled in subject {subject_id}.")]
    DuplicateEnrollment {
        /// The enrolled student.
        student_id: PersonId,
        /// The subject enrolled in.
        subject_id: SubjectId,
    },
    /// A grade referenced an enrollment the store does not hold.
    #[error("Grade {grade_id} references unknown enrollment {enrollment_id}.")]
    UnknownEnrollment {
        /// The offending grade.
        grade_id:      GradeId,
        /// The missing enrollment.
        enrollment_id: EnrollmentId,
    },
}

/// A flat, serializable snapshot of every record kind the store holds. This
/// is the JSON fixture shape the CLI loads.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RecordSet {
    /// Students, instructors, and admins.
    #[serde(default)]
    pub persons:     Vec<Person>,
    /// Subjects.
    #[serde(default)]
    pub subjects:    Vec<Subject>,
    /// Enrollments.
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
    /// Grades.
    #[serde(default)]
    pub grades:      Vec<Grade>,
}

/// In-memory record store implementing [`RecordFetcher`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Person rows keyed by id.
    persons:     HashMap<PersonId, Person>,
    /// Subject rows keyed by id.
    subjects:    HashMap<SubjectId, Subject>,
    /// Enrollment rows keyed by id.
    enrollments: HashMap<EnrollmentId, Enrollment>,
    /// Grade rows keyed by id.
    grades:      HashMap<GradeId, Grade>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a record snapshot, validating every record the way
    /// the boundary would on individual inserts.
    pub fn from_records(set: RecordSet) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for person in set.persons {
            store.add_person(person);
        }
        for subject in set.subjects {
            store.add_subject(subject)?;
        }
        for enrollment in set.enrollments {
            store.add_enrollment(enrollment)?;
        }
        for grade in set.grades {
            store.add_grade(grade)?;
        }
        debug!(
            persons = store.persons.len(),
            subjects = store.subjects.len(),
            enrollments = store.enrollments.len(),
            grades = store.grades.len(),
            "loaded record store"
        );
        Ok(store)
    }

    /// Parses a JSON fixture into a validated store.
    pub fn from_json(json: &str) -> Result<Self> {
        let set: RecordSet =
            serde_json::from_str(json).context("Could not parse record fixture JSON")?;
        Self::from_records(set).context("Record fixture failed boundary validation")
    }

    /// Inserts a person row.
    pub fn add_person(&mut self, person: Person) {
        self.persons.insert(person.id, person);
    }

    /// Inserts a subject row after validating its credit weight.
    pub fn add_subject(&mut self, subject: Subject) -> Result<(), StoreError> {
        validate::validate_subject(&subject)?;
        self.subjects.insert(subject.id, subject);
        Ok(())
    }

    /// Inserts an enrollment row, rejecting duplicate (student, subject)
    /// pairs.
    pub fn add_enrollment(&mut self, enrollment: Enrollment) -> Result<(), StoreError> {
        let duplicate = self.enrollments.values().any(|e| {
            e.student_id == enrollment.student_id && e.subject_id == enrollment.subject_id
        });
        if duplicate {
            return Err(StoreError::DuplicateEnrollment {
                student_id: enrollment.student_id,
                subject_id: enrollment.subject_id,
            });
        }
        self.enrollments.insert(enrollment.id, enrollment);
        Ok(())
    }

    /// Inserts a grade row after validating its score and owning enrollment.
    pub fn add_grade(&mut self, grade: Grade) -> Result<(), StoreError> {
        validate::validate_grade(&grade)?;
        if !self.enrollments.contains_key(&grade.enrollment_id) {
            return Err(StoreError::UnknownEnrollment {
                grade_id:      grade.id,
                enrollment_id: grade.enrollment_id,
            });
        }
        self.grades.insert(grade.id, grade);
        Ok(())
    }

    /// Looks up a person row.
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(&id)
    }

    /// Looks up a subject row.
    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.get(&id)
    }

    /// Looks up a person row by institutional code.
    pub fn person_by_code(&self, code: &str) -> Option<&Person> {
        self.persons.values().find(|p| p.code == code)
    }

    /// Looks up a subject row by institutional code.
    pub fn subject_by_code(&self, code: &str) -> Option<&Subject> {
        self.subjects.values().find(|s| s.code == code)
    }

    /// Every person holding the given role, in id order.
    pub fn persons_with_role(&self, role: Role) -> Vec<&Person> {
        self.persons
            .values()
            .filter(|p| p.role == role)
            .sorted_by_key(|p| p.id)
            .collect()
    }

    /// Issues the next institutional code for a role, continuing this year's
    /// sequence.
    pub fn next_institutional_code(&self, role: Role) -> String {
        let year = Local::now().year();
        let stem = codes::code_stem(role, year);
        let issued = self.persons.values().filter(|p| p.code.starts_with(&stem)).count();
        codes::institutional_code(role, year, issued as u32 + 1)
    }
}

impl RecordFetcher for MemoryStore {
    async fn fetch_students(&self, ids: &HashSet<PersonId>) -> Result<HashMap<PersonId, Person>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.persons.get(id).map(|p| (*id, p.clone())))
            .collect())
    }

    async fn fetch_subjects(
        &self,
        ids: &HashSet<SubjectId>,
    ) -> Result<HashMap<SubjectId, Subject>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.subjects.get(id).map(|s| (*id, s.clone())))
            .collect())
    }

    async fn fetch_enrollments_for_student(&self, id: PersonId) -> Result<Vec<Enrollment>> {
        let mut enrollments: Vec<Enrollment> =
            self.enrollments.values().filter(|e| e.student_id == id).copied().collect();
        enrollments.sort_by_key(|e| e.id);
        Ok(enrollments)
    }

    async fn fetch_enrollments_for_subject(&self, id: SubjectId) -> Result<Vec<Enrollment>> {
        let mut enrollments: Vec<Enrollment> =
            self.enrollments.values().filter(|e| e.subject_id == id).copied().collect();
        enrollments.sort_by_key(|e| e.id);
        Ok(enrollments)
    }

    async fn fetch_grades_for_enrollment(&self, id: EnrollmentId) -> Result<Vec<Grade>> {
        let mut grades: Vec<Grade> =
            self.grades.values().filter(|g| g.enrollment_id == id).cloned().collect();
        grades.sort_by_key(|g| g.id);
        Ok(grades)
    }
}
