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

//! Spellbook entity and rental state.
//!
//! Implemented State Machine
//!
//! ```text
//!  Available ──rent_to(s)──► RentedBy(s) ──take_back(s)──► Available (+ s appended to history)
//! ```
//!
//! # Example
//!
//! ```
//! use spellbook_archive::{SerialNumber, Spellbook, StudentId};
//!
//! let mut book = Spellbook::new(SerialNumber(1), "Basics", "Flamel", "Fire");
//! book.rent_to(StudentId::FIRST).unwrap();
//! assert!(!book.is_available());
//! book.take_back(StudentId::FIRST).unwrap();
//! assert_eq!(book.history(), &[StudentId::FIRST]);
//! ```

use crate::ArchiveError;
use crate::base::{SerialNumber, StudentId};
use std::fmt;

/// Who, if anyone, currently holds a spellbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RentalStatus {
    #[default]
    Available,
    RentedBy(StudentId),
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "Currently available."),
            Self::RentedBy(student) => write!(f, "Rented by: {student}."),
        }
    }
}

/// Selects which descriptive field of a spellbook a search or listing reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Type,
    Inventor,
}

/// A rentable spellbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spellbook {
    serial_number: SerialNumber,
    title: String,
    inventor: String,
    kind: String,
    status: RentalStatus,
    /// Students who returned this book, oldest first.
    history: Vec<StudentId>,
}

impl Spellbook {
    pub fn new(
        serial_number: SerialNumber,
        title: impl Into<String>,
        inventor: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            serial_number,
            title: title.into(),
            inventor: inventor.into(),
            kind: kind.into(),
            status: RentalStatus::Available,
            history: Vec::new(),
        }
    }

    pub fn serial_number(&self) -> SerialNumber {
        self.serial_number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn inventor(&self) -> &str {
        &self.inventor
    }

    /// The spellbook's type (category).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn status(&self) -> RentalStatus {
        self.status
    }

    pub fn history(&self) -> &[StudentId] {
        &self.history
    }

    pub fn is_available(&self) -> bool {
        self.status == RentalStatus::Available
    }

    pub fn attribute(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::Type => &self.kind,
            Attribute::Inventor => &self.inventor,
        }
    }

    /// Returns `title (inventor)`.
    pub fn short_form(&self) -> String {
        format!("{} ({})", self.title, self.inventor)
    }

    /// Returns `title (inventor, type)`.
    pub fn long_form(&self) -> String {
        format!("{} ({}, {})", self.title, self.inventor, self.kind)
    }

    /// Marks the spellbook as rented by `student`.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::Unavailable`] if the book is already rented. The book
    /// is left untouched.
    pub fn rent_to(&mut self, student: StudentId) -> Result<(), ArchiveError> {
        if !self.is_available() {
            return Err(ArchiveError::Unavailable);
        }
        self.status = RentalStatus::RentedBy(student);
        Ok(())
    }

    /// Returns the spellbook from `student`, recording them in the history.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::NotRentedByStudent`] unless the book is currently
    /// rented by `student`.
    pub fn take_back(&mut self, student: StudentId) -> Result<(), ArchiveError> {
        if self.status != RentalStatus::RentedBy(student) {
            return Err(ArchiveError::NotRentedByStudent);
        }
        self.history.push(student);
        self.status = RentalStatus::Available;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basics() -> Spellbook {
        Spellbook::new(SerialNumber(1), "Basics", "Flamel", "Fire")
    }

    #[test]
    fn printable_forms() {
        let book = basics();
        assert_eq!(book.short_form(), "Basics (Flamel)");
        assert_eq!(book.long_form(), "Basics (Flamel, Fire)");
    }

    #[test]
    fn status_display() {
        assert_eq!(RentalStatus::Available.to_string(), "Currently available.");
        assert_eq!(
            RentalStatus::RentedBy(StudentId(100_001)).to_string(),
            "Rented by: 100001."
        );
    }

    #[test]
    fn attribute_selects_field() {
        let book = basics();
        assert_eq!(book.attribute(Attribute::Type), "Fire");
        assert_eq!(book.attribute(Attribute::Inventor), "Flamel");
    }

    #[test]
    fn rent_twice_is_rejected() {
        let mut book = basics();
        book.rent_to(StudentId(100_000)).unwrap();

        let result = book.rent_to(StudentId(100_001));
        assert_eq!(result, Err(ArchiveError::Unavailable));
        assert_eq!(book.status(), RentalStatus::RentedBy(StudentId(100_000)));
    }

    #[test]
    fn take_back_by_other_student_is_rejected() {
        let mut book = basics();
        book.rent_to(StudentId(100_000)).unwrap();

        let result = book.take_back(StudentId(100_001));
        assert_eq!(result, Err(ArchiveError::NotRentedByStudent));
        assert!(book.history().is_empty());
        assert!(!book.is_available());
    }

    #[test]
    fn take_back_available_book_is_rejected() {
        let mut book = basics();
        assert_eq!(
            book.take_back(StudentId(100_000)),
            Err(ArchiveError::NotRentedByStudent)
        );
    }

    #[test]
    fn history_is_append_only() {
        let mut book = basics();
        for id in [100_002, 100_000, 100_002] {
            book.rent_to(StudentId(id)).unwrap();
            book.take_back(StudentId(id)).unwrap();
        }
        assert_eq!(
            book.history(),
            &[StudentId(100_002), StudentId(100_000), StudentId(100_002)]
        );
        assert!(book.is_available());
    }
}
