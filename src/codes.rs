#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::records::Role;

/// Formats an institutional code as `{PREFIX}-{YEAR}-{NNNN}`.
///
/// The prefix is derived from the role (`EST`, `PROF`, `ADM`); the sequence
/// number is zero-padded to four digits.
pub fn institutional_code(role: Role, year: i32, sequence: u32) -> String {
    format!("{}-{}-{:04}", role.code_prefix(), year, sequence)
}

/// The `{PREFIX}-{YEAR}-` stem shared by every code issued for a role within
/// one year; used to count already-issued codes.
pub fn code_stem(role: Role, year: i32) -> String {
    format!("{}-{}-", role.code_prefix(), year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_role_prefixed_and_padded() {
        assert_eq!(institutional_code(Role::Student, 2025, 1), "EST-2025-0001");
        assert_eq!(institutional_code(Role::Instructor, 2025, 42), "PROF-2025-0042");
        assert_eq!(institutional_code(Role::Admin, 2024, 1234), "ADM-2024-1234");
    }

    #[test]
    fn stem_matches_issued_codes() {
        let code = institutional_code(Role::Student, 2025, 7);
        assert!(code.starts_with(&code_stem(Role::Student, 2025)));
    }
}
