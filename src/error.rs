// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for archive operations.
//!
//! The `Display` form of every [`ArchiveError`] is the exact line shown to
//! the user, so handlers report a failure by printing the error itself.

use thiserror::Error;

/// Archive operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// The catalog holds no spellbooks
    #[error("No spellbooks in system.")]
    NoSpellbooks,

    /// The registry holds no students
    #[error("No students in system.")]
    NoStudents,

    /// Referenced serial number is not in the catalog
    #[error("No such spellbook in system.")]
    SpellbookNotFound,

    /// Referenced student ID is not registered
    #[error("No such student in system.")]
    StudentNotFound,

    /// Spellbook is already rented out
    #[error("Spellbook is currently unavailable.")]
    Unavailable,

    /// Spellbook is not rented by the claimed student
    #[error("Unable to return spellbook.")]
    NotRentedByStudent,

    /// The same student ID was given more than once
    #[error("Duplicate students provided.")]
    DuplicateStudents,

    /// Serial number is already in the catalog
    #[error("Spellbook already exists in system.")]
    SpellbookExists,

    /// Collection file has no line with the requested serial number
    #[error("No such spellbook in file.")]
    NotInFile,

    /// Single-spellbook source file could not be opened
    #[error("No such file.")]
    NoSuchFile,

    /// Collection file could not be opened
    #[error("No such collection.")]
    NoSuchCollection,
}

/// Errors raised while decoding a single collection file line.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Line does not have exactly four fields
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),

    /// Underlying reader failure
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(ArchiveError::NoSpellbooks.to_string(), "No spellbooks in system.");
        assert_eq!(ArchiveError::NoStudents.to_string(), "No students in system.");
        assert_eq!(
            ArchiveError::SpellbookNotFound.to_string(),
            "No such spellbook in system."
        );
        assert_eq!(
            ArchiveError::StudentNotFound.to_string(),
            "No such student in system."
        );
        assert_eq!(
            ArchiveError::Unavailable.to_string(),
            "Spellbook is currently unavailable."
        );
        assert_eq!(
            ArchiveError::NotRentedByStudent.to_string(),
            "Unable to return spellbook."
        );
        assert_eq!(
            ArchiveError::DuplicateStudents.to_string(),
            "Duplicate students provided."
        );
        assert_eq!(
            ArchiveError::SpellbookExists.to_string(),
            "Spellbook already exists in system."
        );
        assert_eq!(ArchiveError::NotInFile.to_string(), "No such spellbook in file.");
        assert_eq!(ArchiveError::NoSuchFile.to_string(), "No such file.");
        assert_eq!(ArchiveError::NoSuchCollection.to_string(), "No such collection.");
    }

    #[test]
    fn record_error_messages() {
        assert_eq!(RecordError::FieldCount(3).to_string(), "expected 4 fields, found 3");
    }

    #[test]
    fn errors_are_cloneable() {
        let error = ArchiveError::Unavailable;
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
