#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use bon::Builder;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier for a person row (students, instructors, admins).
pub type PersonId = i64;
/// Identifier for a subject row.
pub type SubjectId = i64;
/// Identifier for an enrollment row.
pub type EnrollmentId = i64;
/// Identifier for a grade row.
pub type GradeId = i64;

/// Role tag distinguishing the kinds of person the record store holds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Enrolled in subjects, receives grades.
    Student,
    /// Assigned to subjects, issues grades.
    Instructor,
    /// Administrative staff.
    Admin,
}

impl Role {
    /// Institutional-code prefix for this role.
    pub fn code_prefix(self) -> &'static str {
        match self {
            Role::Student => "EST",
            Role::Instructor => "PROF",
            Role::Admin => "ADM",
        }
    }
}

/// A person record. Students and instructors share this shape and are told
/// apart by [`Role`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(on(String, into))]
pub struct Person {
    /// Row identifier.
    pub id:               PersonId,
    /// Given name, used only for report labeling.
    pub first_name:       String,
    /// Family name, used only for report labeling.
    pub last_name:        String,
    /// Institutional code, e.g. `EST-2025-0001`.
    pub code:             String,
    /// Contact email.
    pub email:            String,
    /// Academic program, present for students only.
    pub academic_program: Option<String>,
    /// Role tag.
    pub role:             Role,
}

impl Person {
    /// Full display name in `first last` order.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A subject (course) record with its credit weight and assigned instructor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(on(String, into))]
pub struct Subject {
    /// Row identifier.
    pub id:            SubjectId,
    /// Display name of the subject.
    pub name:          String,
    /// Institutional code, unique per subject.
    pub code:          String,
    /// Credit weight, an integer in `1..=10`.
    pub credits:       u8,
    /// Assigned instructor.
    pub instructor_id: PersonId,
    /// Weekly schedule, free text.
    pub schedule:      Option<String>,
    /// Course description, free text.
    pub description:   Option<String>,
}

/// The relationship record linking one student to one subject. Unique per
/// (student, subject) pair; owns zero or more grades.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Builder)]
pub struct Enrollment {
    /// Row identifier.
    pub id:         EnrollmentId,
    /// The enrolled student.
    pub student_id: PersonId,
    /// The subject enrolled in.
    pub subject_id: SubjectId,
}

/// A single grade belonging to exactly one enrollment.
#[derive(Serialize, Deserialize, Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct Grade {
    /// Row identifier.
    pub id:            GradeId,
    /// Owning enrollment.
    pub enrollment_id: EnrollmentId,
    /// Numeric score in the closed interval `[0.00, 5.00]`.
    pub score:         Decimal,
    /// Term label, e.g. `2024-1`.
    pub period:        String,
    /// Date the grade was recorded.
    pub date:          NaiveDate,
    /// Free-text notes.
    pub notes:         Option<String>,
}
