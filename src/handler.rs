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

//! Command dispatch and output rendering.
//!
//! [`CommandHandler::execute`] parses one line, runs it against the
//! [`Archive`] and writes the result, one item per line. Failures are
//! written as the error's message; none of them stop the handler.

use crate::archive::{Archive, SaveError};
use crate::command::{Command, ListFilter};
use crate::spellbook::{Attribute, Spellbook};
use std::io::{self, Write};
use tracing::debug;

const HELP: &str = "\
EXIT ends the archive process
COMMANDS outputs this help string

LIST ALL [LONG] outputs either the short or long string for all spellbooks
LIST AVAILABLE [LONG] outputs either the short or long string for all available spellbooks
NUMBER COPIES outputs the number of copies of each spellbook
LIST TYPES outputs the name of every type in the system
LIST INVENTORS outputs the name of every inventor in the system

TYPE <type> outputs the short string of every spellbook with the specified type
INVENTOR <inventor> outputs the short string of every spellbook by the specified inventor

SPELLBOOK <serialNumber> [LONG] outputs either the short or long string for the specified spellbook
SPELLBOOK HISTORY <serialNumber> outputs the rental history of the specified spellbook

STUDENT <studentNumber> outputs the information of the specified student
STUDENT SPELLBOOKS <studentNumber> outputs the spellbooks currently rented by the specified student
STUDENT HISTORY <studentNumber> outputs the rental history of the specified student

RENT <studentNumber> <serialNumber> loans out the specified spellbook to the given student
RELINQUISH <studentNumber> <serialNumber> returns the specified spellbook from the student
RELINQUISH ALL <studentNumber> returns all spellbooks rented by the specified student

ADD STUDENT <name> adds a student to the system
ADD SPELLBOOK <filename> <serialNumber> adds a spellbook to the system

ADD COLLECTION <filename> adds a collection of spellbooks to the system
SAVE COLLECTION <filename> saves the system to a csv file

COMMON <studentNumber1> <studentNumber2> ... outputs the common spellbooks in students' history";

const SUCCESS: &str = "Success.";

/// Writes `$result`'s error message and returns early from the command.
macro_rules! try_or_report {
    ($self:ident, $result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => return writeln!($self.out, "{e}"),
        }
    };
}

/// Runs archive commands and writes their output to `W`.
pub struct CommandHandler<W: Write> {
    archive: Archive,
    out: W,
}

impl<W: Write> CommandHandler<W> {
    /// Creates a handler over a fresh, empty archive.
    pub fn new(out: W) -> Self {
        Self {
            archive: Archive::new(),
            out,
        }
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.out
    }

    /// Consumes the handler, returning the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Executes one command line.
    ///
    /// Returns `Ok(false)` only for `EXIT`. Unrecognised lines produce no
    /// output.
    ///
    /// # Errors
    ///
    /// Only failures of the output sink are returned.
    pub fn execute(&mut self, line: &str) -> io::Result<bool> {
        let Some(command) = Command::parse(line) else {
            debug!(line, "ignoring unrecognised command");
            return Ok(true);
        };

        let exit = command == Command::Exit;
        self.dispatch(command)?;
        Ok(!exit)
    }

    fn dispatch(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Exit => writeln!(self.out, "Ending Archive process.")?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::List { filter, long } => self.list(filter, long)?,
            Command::ListAttribute(attribute) => self.list_attribute(attribute)?,
            Command::ListUnknown => try_or_report!(self, self.archive.ensure_spellbooks()),
            Command::NumberCopies => self.number_copies()?,
            Command::Search { attribute, value } => self.search(attribute, &value)?,
            Command::Spellbook { serial, long } => {
                let book = try_or_report!(self, self.archive.find_spellbook(serial));
                if long {
                    write_long(&mut self.out, book)?;
                } else {
                    writeln!(self.out, "{}", book.short_form())?;
                }
            }
            Command::SpellbookHistory(serial) => {
                let history = try_or_report!(self, self.archive.spellbook_history(serial));
                if history.is_empty() {
                    writeln!(self.out, "No rental history.")?;
                }
                for student in history {
                    writeln!(self.out, "{student}")?;
                }
            }
            Command::Student(id) => {
                let student = try_or_report!(self, self.archive.find_student(id));
                writeln!(self.out, "{}: {}", student.id(), student.name())?;
            }
            Command::StudentSpellbooks(id) => {
                let books = try_or_report!(self, self.archive.student_spellbooks(id));
                if books.is_empty() {
                    writeln!(self.out, "Student not currently renting.")?;
                }
                write_short(&mut self.out, &books)?;
            }
            Command::StudentHistory(id) => {
                let books = try_or_report!(self, self.archive.student_history(id));
                if books.is_empty() {
                    writeln!(self.out, "No rental history for student.")?;
                }
                write_short(&mut self.out, &books)?;
            }
            Command::Rent { student, serial } => {
                try_or_report!(self, self.archive.rent(student, serial));
                writeln!(self.out, "{SUCCESS}")?;
            }
            Command::Relinquish { student, serial } => {
                try_or_report!(self, self.archive.relinquish(student, serial));
                writeln!(self.out, "{SUCCESS}")?;
            }
            Command::RelinquishAll(student) => {
                try_or_report!(self, self.archive.relinquish_all(student));
                writeln!(self.out, "{SUCCESS}")?;
            }
            Command::AddStudent { name } => {
                let id = self.archive.add_student(name);
                debug!(%id, "student added");
                writeln!(self.out, "{SUCCESS}")?;
            }
            Command::AddSpellbook { path, serial } => {
                let book = try_or_report!(self, self.archive.add_spellbook(&path, serial));
                writeln!(self.out, "Successfully added: {}.", book.short_form())?;
            }
            Command::AddCollection { path } => {
                match try_or_report!(self, self.archive.add_collection(&path)) {
                    0 => writeln!(self.out, "No spellbooks have been added to the system.")?,
                    added => writeln!(self.out, "{added} spellbooks successfully added.")?,
                }
            }
            Command::Save { path } => match self.archive.save(&path) {
                Ok(()) => writeln!(self.out, "{SUCCESS}")?,
                Err(SaveError::Archive(e)) => writeln!(self.out, "{e}")?,
                // Write failures are not reported to the user
                Err(e @ SaveError::Write(_)) => {
                    debug!(path = %path.display(), error = %e, "save failed");
                }
            },
            Command::Common(ids) => {
                let Some(common) = try_or_report!(self, self.archive.common(ids.as_slice())) else {
                    return Ok(());
                };
                if common.is_empty() {
                    writeln!(self.out, "No common spellbooks.")?;
                }
                for book in common {
                    writeln!(self.out, "{book}")?;
                }
            }
        }
        Ok(())
    }

    fn list(&mut self, filter: ListFilter, long: bool) -> io::Result<()> {
        let books = try_or_report!(self, self.archive.list(filter));
        if books.is_empty() {
            return writeln!(self.out, "No spellbooks available.");
        }
        if !long {
            return write_short(&mut self.out, &books);
        }
        for (i, book) in books.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            write_long(&mut self.out, book)?;
        }
        Ok(())
    }

    fn list_attribute(&mut self, attribute: Attribute) -> io::Result<()> {
        let values = try_or_report!(self, self.archive.distinct(attribute));
        for value in values {
            writeln!(self.out, "{value}")?;
        }
        Ok(())
    }

    fn number_copies(&mut self) -> io::Result<()> {
        let copies = try_or_report!(self, self.archive.number_copies());
        for (book, count) in copies {
            writeln!(self.out, "{book}: {count}")?;
        }
        Ok(())
    }

    fn search(&mut self, attribute: Attribute, value: &str) -> io::Result<()> {
        let books = try_or_report!(self, self.archive.search(attribute, value));
        if books.is_empty() {
            return match attribute {
                Attribute::Type => writeln!(self.out, "No spellbooks with type {value}."),
                Attribute::Inventor => writeln!(self.out, "No spellbooks by {value}."),
            };
        }
        write_short(&mut self.out, &books)
    }
}

fn write_short<W: Write>(out: &mut W, books: &[&Spellbook]) -> io::Result<()> {
    for book in books {
        writeln!(out, "{}", book.short_form())?;
    }
    Ok(())
}

/// Writes `serial: title (inventor, type)` followed by the rental status.
fn write_long<W: Write>(out: &mut W, book: &Spellbook) -> io::Result<()> {
    writeln!(out, "{}: {}", book.serial_number(), book.long_form())?;
    writeln!(out, "{}", book.status())
}
