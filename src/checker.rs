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

//! Precondition checks shared by archive operations.
//!
//! A [`Checker`] borrows the archive's live collections and answers each
//! check with the [`ArchiveError`] whose message the user should see.

use crate::ArchiveError;
use crate::base::{SerialNumber, StudentId};
use crate::spellbook::{RentalStatus, Spellbook};
use crate::student::Student;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct Checker<'a> {
    spellbooks: &'a HashMap<SerialNumber, Spellbook>,
    students: &'a HashMap<StudentId, Student>,
}

impl<'a> Checker<'a> {
    pub fn new(
        spellbooks: &'a HashMap<SerialNumber, Spellbook>,
        students: &'a HashMap<StudentId, Student>,
    ) -> Self {
        Self {
            spellbooks,
            students,
        }
    }

    pub fn ensure_spellbooks(&self) -> Result<(), ArchiveError> {
        if self.spellbooks.is_empty() {
            return Err(ArchiveError::NoSpellbooks);
        }
        Ok(())
    }

    pub fn ensure_students(&self) -> Result<(), ArchiveError> {
        if self.students.is_empty() {
            return Err(ArchiveError::NoStudents);
        }
        Ok(())
    }

    pub fn spellbook(&self, serial: SerialNumber) -> Result<&'a Spellbook, ArchiveError> {
        self.spellbooks
            .get(&serial)
            .ok_or(ArchiveError::SpellbookNotFound)
    }

    pub fn student(&self, id: StudentId) -> Result<&'a Student, ArchiveError> {
        self.students.get(&id).ok_or(ArchiveError::StudentNotFound)
    }

    /// Fails unless `serial` is currently rented by `id`.
    pub fn ensure_rented_by(&self, serial: SerialNumber, id: StudentId) -> Result<(), ArchiveError> {
        if self.spellbook(serial)?.status() != RentalStatus::RentedBy(id) {
            return Err(ArchiveError::NotRentedByStudent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collections() -> (HashMap<SerialNumber, Spellbook>, HashMap<StudentId, Student>) {
        let mut spellbooks = HashMap::new();
        let mut book = Spellbook::new(SerialNumber(1), "Basics", "Flamel", "Fire");
        book.rent_to(StudentId::FIRST).unwrap();
        spellbooks.insert(SerialNumber(1), book);

        let mut students = HashMap::new();
        students.insert(StudentId::FIRST, Student::new(StudentId::FIRST, "Hermione"));
        (spellbooks, students)
    }

    #[test]
    fn empty_collections_are_reported() {
        let spellbooks = HashMap::new();
        let students = HashMap::new();
        let checker = Checker::new(&spellbooks, &students);

        assert_eq!(checker.ensure_spellbooks(), Err(ArchiveError::NoSpellbooks));
        assert_eq!(checker.ensure_students(), Err(ArchiveError::NoStudents));
    }

    #[test]
    fn lookups_report_missing_entities() {
        let (spellbooks, students) = collections();
        let checker = Checker::new(&spellbooks, &students);

        assert!(checker.spellbook(SerialNumber(1)).is_ok());
        assert_eq!(
            checker.spellbook(SerialNumber(9)).unwrap_err(),
            ArchiveError::SpellbookNotFound
        );
        assert!(checker.student(StudentId::FIRST).is_ok());
        assert_eq!(
            checker.student(StudentId(5)).unwrap_err(),
            ArchiveError::StudentNotFound
        );
    }

    #[test]
    fn rented_by_checks_current_holder() {
        let (spellbooks, students) = collections();
        let checker = Checker::new(&spellbooks, &students);

        assert_eq!(checker.ensure_rented_by(SerialNumber(1), StudentId::FIRST), Ok(()));
        assert_eq!(
            checker.ensure_rented_by(SerialNumber(1), StudentId(100_001)),
            Err(ArchiveError::NotRentedByStudent)
        );
    }
}
