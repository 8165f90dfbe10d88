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

//! Spellbook archive.
//!
//! The [`Archive`] owns the catalog of spellbooks and the registry of
//! students, and implements every query and rental transition on them.
//! Operations return data or an [`ArchiveError`]; rendering is left to the
//! [`CommandHandler`](crate::CommandHandler).
//!
//! # Rental Processing
//!
//! - **Rent**: Marks an available spellbook as held by a student.
//! - **Relinquish**: Returns a held spellbook, appending to both histories.
//! - **Relinquish all**: Returns every spellbook a student holds.
//!
//! Failed operations leave the archive untouched.

use crate::ArchiveError;
use crate::base::{SerialNumber, StudentId};
use crate::checker::Checker;
use crate::collection::{read_spellbooks, write_spellbooks};
use crate::command::ListFilter;
use crate::spellbook::{Attribute, Spellbook};
use crate::student::{Student, StudentIdAllocator};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Failure of [`Archive::save`].
#[derive(Error, Debug)]
pub enum SaveError {
    /// Precondition failure shown to the user
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The collection file could not be written
    #[error("unable to write collection: {0}")]
    Write(#[from] csv::Error),
}

/// In-memory catalog and student registry.
///
/// # Invariants
///
/// - A spellbook's renter is a registered student holding it in their
///   current list, and vice versa.
/// - Histories are append-only.
/// - Student IDs are unique and strictly increasing from [`StudentId::FIRST`].
#[derive(Debug)]
pub struct Archive {
    /// Spellbooks indexed by serial number.
    spellbooks: HashMap<SerialNumber, Spellbook>,
    /// Students indexed by ID.
    students: HashMap<StudentId, Student>,
    ids: StudentIdAllocator,
}

impl Archive {
    /// Creates an empty archive whose first student will be [`StudentId::FIRST`].
    pub fn new() -> Self {
        let mut ids = StudentIdAllocator::new();
        ids.reset();
        Archive {
            spellbooks: HashMap::new(),
            students: HashMap::new(),
            ids,
        }
    }

    fn checker(&self) -> Checker<'_> {
        Checker::new(&self.spellbooks, &self.students)
    }

    /// Fails with [`ArchiveError::NoSpellbooks`] when the catalog is empty.
    pub fn ensure_spellbooks(&self) -> Result<(), ArchiveError> {
        self.checker().ensure_spellbooks()
    }

    pub fn spellbook(&self, serial: SerialNumber) -> Option<&Spellbook> {
        self.spellbooks.get(&serial)
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.get(&id)
    }

    /// Returns all spellbooks sorted by serial number.
    pub fn spellbooks(&self) -> Vec<&Spellbook> {
        let mut books: Vec<&Spellbook> = self.spellbooks.values().collect();
        books.sort_by_key(|book| book.serial_number());
        books
    }

    fn lookup_all<'a>(&'a self, serials: &[SerialNumber]) -> Vec<&'a Spellbook> {
        serials
            .iter()
            .filter_map(|serial| self.spellbooks.get(serial))
            .collect()
    }

    // === Catalog queries ===

    /// Lists spellbooks sorted by serial number.
    ///
    /// The result may be empty when filtering for available books.
    pub fn list(&self, filter: ListFilter) -> Result<Vec<&Spellbook>, ArchiveError> {
        self.checker().ensure_spellbooks()?;
        let mut books = self.spellbooks();
        if filter == ListFilter::Available {
            books.retain(|book| book.is_available());
        }
        Ok(books)
    }

    /// Counts copies per short form, ordered by short form.
    pub fn number_copies(&self) -> Result<BTreeMap<String, usize>, ArchiveError> {
        self.checker().ensure_spellbooks()?;
        let mut copies = BTreeMap::new();
        for book in self.spellbooks.values() {
            *copies.entry(book.short_form()).or_insert(0) += 1;
        }
        Ok(copies)
    }

    /// Finds spellbooks whose `attribute` equals `value`, ignoring case.
    pub fn search(&self, attribute: Attribute, value: &str) -> Result<Vec<&Spellbook>, ArchiveError> {
        self.checker().ensure_spellbooks()?;
        let needle = value.to_lowercase();
        let mut books = self.spellbooks();
        books.retain(|book| book.attribute(attribute).to_lowercase() == needle);
        Ok(books)
    }

    /// Returns the distinct values of `attribute`, sorted.
    pub fn distinct(&self, attribute: Attribute) -> Result<BTreeSet<&str>, ArchiveError> {
        self.checker().ensure_spellbooks()?;
        Ok(self
            .spellbooks
            .values()
            .map(|book| book.attribute(attribute))
            .collect())
    }

    pub fn find_spellbook(&self, serial: SerialNumber) -> Result<&Spellbook, ArchiveError> {
        let checker = self.checker();
        checker.ensure_spellbooks()?;
        checker.spellbook(serial)
    }

    /// Returns the IDs of students who rented `serial`, oldest first.
    pub fn spellbook_history(&self, serial: SerialNumber) -> Result<&[StudentId], ArchiveError> {
        Ok(self.checker().spellbook(serial)?.history())
    }

    // === Student queries ===

    pub fn find_student(&self, id: StudentId) -> Result<&Student, ArchiveError> {
        let checker = self.checker();
        checker.ensure_students()?;
        checker.student(id)
    }

    /// Spellbooks currently held by `id`, in rental order.
    pub fn student_spellbooks(&self, id: StudentId) -> Result<Vec<&Spellbook>, ArchiveError> {
        let student = self.find_student(id)?;
        Ok(self.lookup_all(student.current()))
    }

    /// Spellbooks returned by `id`, oldest first.
    pub fn student_history(&self, id: StudentId) -> Result<Vec<&Spellbook>, ArchiveError> {
        let student = self.find_student(id)?;
        Ok(self.lookup_all(student.history()))
    }

    /// Registers a student under the next free ID.
    pub fn add_student(&mut self, name: impl Into<String>) -> StudentId {
        let id = self.ids.next_id();
        self.students.insert(id, Student::new(id, name));
        id
    }

    // === Rentals ===

    /// Rents `serial` to `student`.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::NoStudents`] / [`ArchiveError::NoSpellbooks`] - Empty registry or catalog.
    /// - [`ArchiveError::StudentNotFound`] / [`ArchiveError::SpellbookNotFound`] - Unknown ID.
    /// - [`ArchiveError::Unavailable`] - Spellbook is already rented.
    pub fn rent(&mut self, student: StudentId, serial: SerialNumber) -> Result<(), ArchiveError> {
        let checker = self.checker();
        checker.ensure_students()?;
        checker.ensure_spellbooks()?;
        checker.student(student)?;
        checker.spellbook(serial)?;

        // Both entries were just checked
        if let Some(book) = self.spellbooks.get_mut(&serial) {
            book.rent_to(student)?;
        }
        if let Some(renter) = self.students.get_mut(&student) {
            renter.borrow(serial);
        }
        Ok(())
    }

    /// Returns `serial` from `student`.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::NoStudents`] / [`ArchiveError::NoSpellbooks`] - Empty registry or catalog.
    /// - [`ArchiveError::StudentNotFound`] / [`ArchiveError::SpellbookNotFound`] - Unknown ID.
    /// - [`ArchiveError::NotRentedByStudent`] - `student` does not hold the spellbook.
    pub fn relinquish(
        &mut self,
        student: StudentId,
        serial: SerialNumber,
    ) -> Result<(), ArchiveError> {
        let checker = self.checker();
        checker.ensure_students()?;
        checker.ensure_spellbooks()?;
        self.return_spellbook(student, serial)
    }

    fn return_spellbook(
        &mut self,
        student: StudentId,
        serial: SerialNumber,
    ) -> Result<(), ArchiveError> {
        let checker = self.checker();
        checker.student(student)?;
        checker.spellbook(serial)?;
        checker.ensure_rented_by(serial, student)?;

        if let Some(book) = self.spellbooks.get_mut(&serial) {
            book.take_back(student)?;
        }
        if let Some(renter) = self.students.get_mut(&student) {
            renter.give_back(serial);
        }
        Ok(())
    }

    /// Returns every spellbook `student` currently holds, in rental order.
    pub fn relinquish_all(&mut self, student: StudentId) -> Result<(), ArchiveError> {
        let held = self.find_student(student)?.current().to_vec();

        for serial in held {
            if let Err(e) = self.return_spellbook(student, serial) {
                debug!(%student, %serial, error = %e, "skipping spellbook during relinquish all");
            }
        }
        if let Some(renter) = self.students.get_mut(&student) {
            renter.clear_current();
        }
        Ok(())
    }

    /// Short forms of the spellbooks every listed student has returned.
    ///
    /// `ids` are raw tokens; each must be a registered student ID and appear
    /// only once. Tokens are checked in order and the first failure wins.
    /// Returns `Ok(None)` when fewer than two tokens are given, after the
    /// empty registry and catalog checks.
    pub fn common<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Option<BTreeSet<String>>, ArchiveError> {
        let checker = self.checker();
        checker.ensure_students()?;
        checker.ensure_spellbooks()?;
        if ids.len() < 2 {
            return Ok(None);
        }

        let mut seen = HashSet::new();
        let mut common: Option<BTreeSet<String>> = None;

        for token in ids {
            let token = token.as_ref();
            if !is_integer(token) {
                return Err(ArchiveError::StudentNotFound);
            }
            let id: StudentId = token.parse().map_err(|_| ArchiveError::StudentNotFound)?;
            if !seen.insert(id) {
                return Err(ArchiveError::DuplicateStudents);
            }
            let student = checker.student(id)?;

            let history: BTreeSet<String> = self
                .lookup_all(student.history())
                .into_iter()
                .map(Spellbook::short_form)
                .collect();

            common = Some(match common {
                // The first student's history seeds the intersection
                None => history,
                Some(acc) => acc.intersection(&history).cloned().collect(),
            });
        }

        Ok(Some(common.unwrap_or_default()))
    }

    // === Collection files ===

    /// Adds the spellbook with `serial` from the collection file at `path`.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::NoSuchFile`] - The file cannot be opened.
    /// - [`ArchiveError::SpellbookExists`] - `serial` is already catalogued.
    /// - [`ArchiveError::NotInFile`] - No line in the file has `serial`.
    pub fn add_spellbook(
        &mut self,
        path: &Path,
        serial: SerialNumber,
    ) -> Result<&Spellbook, ArchiveError> {
        let file = File::open(path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "cannot open spellbook file");
            ArchiveError::NoSuchFile
        })?;
        self.add_spellbook_from(BufReader::new(file), serial)
    }

    /// Like [`add_spellbook`](Self::add_spellbook), reading from any source.
    pub fn add_spellbook_from<R: Read>(
        &mut self,
        reader: R,
        serial: SerialNumber,
    ) -> Result<&Spellbook, ArchiveError> {
        if self.spellbooks.contains_key(&serial) {
            return Err(ArchiveError::SpellbookExists);
        }

        let found = read_spellbooks(reader)
            .filter_map(|result| match result {
                Ok(book) => Some(book),
                Err(e) => {
                    debug!(error = %e, "skipping malformed row");
                    None
                }
            })
            .find(|book| book.serial_number() == serial)
            .ok_or(ArchiveError::NotInFile)?;

        Ok(&*self.spellbooks.entry(serial).or_insert(found))
    }

    /// Adds every spellbook from the collection file at `path`.
    ///
    /// Serial numbers already in the catalog and malformed lines are
    /// skipped. Returns the number of spellbooks added.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::NoSuchCollection`] if the file cannot be opened.
    pub fn add_collection(&mut self, path: &Path) -> Result<usize, ArchiveError> {
        let file = File::open(path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "cannot open collection file");
            ArchiveError::NoSuchCollection
        })?;
        Ok(self.add_collection_from(BufReader::new(file)))
    }

    /// Like [`add_collection`](Self::add_collection), reading from any source.
    pub fn add_collection_from<R: Read>(&mut self, reader: R) -> usize {
        let mut added = 0;
        for result in read_spellbooks(reader) {
            let book = match result {
                Ok(book) => book,
                Err(e) => {
                    debug!(error = %e, "skipping malformed row");
                    continue;
                }
            };
            let serial = book.serial_number();
            if self.spellbooks.contains_key(&serial) {
                debug!(%serial, "skipping spellbook already in system");
                continue;
            }
            self.spellbooks.insert(serial, book);
            added += 1;
        }
        added
    }

    /// Saves the catalog to `path`, sorted by serial number.
    ///
    /// # Errors
    ///
    /// - [`SaveError::Archive`] - The catalog is empty.
    /// - [`SaveError::Write`] - The file could not be created or written.
    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        self.checker().ensure_spellbooks()?;
        let file = File::create(path).map_err(csv::Error::from)?;
        write_spellbooks(self.spellbooks(), file)?;
        Ok(())
    }
}

impl Default for Archive {
    fn default() -> Self {
        Self::new()
    }
}

/// An optional `-` followed by one or more ASCII digits.
fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
