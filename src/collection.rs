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

//! Flat-file collection format.
//!
//! A collection file is UTF-8 text with a fixed header line followed by one
//! spellbook per line:
//!
//! ```csv
//! serialNumber,title,inventor,type
//! 1,Basics,Flamel,Fire
//! 2,Advanced,Flamel,Fire
//! ```
//!
//! Fields are split on commas only. Quoting and escaping are not supported,
//! neither on read nor on write.

use crate::base::SerialNumber;
use crate::error::RecordError;
use crate::spellbook::Spellbook;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Header line written at the top of every saved collection.
pub const HEADER: [&str; 4] = ["serialNumber", "title", "inventor", "type"];

const FIELD_COUNT: usize = HEADER.len();

/// Raw record matching one collection line.
///
/// Fields: `serialNumber, title, inventor, type`
#[derive(Debug, Deserialize, Serialize)]
struct SpellbookRecord {
    serial_number: SerialNumber,
    title: String,
    inventor: String,
    kind: String,
}

impl SpellbookRecord {
    fn from_record(record: &StringRecord) -> Result<Self, RecordError> {
        if record.len() != FIELD_COUNT {
            return Err(RecordError::FieldCount(record.len()));
        }
        Ok(record.deserialize(None)?)
    }

    fn into_spellbook(self) -> Spellbook {
        Spellbook::new(self.serial_number, self.title, self.inventor, self.kind)
    }
}

impl From<&Spellbook> for SpellbookRecord {
    fn from(book: &Spellbook) -> Self {
        Self {
            serial_number: book.serial_number(),
            title: book.title().to_owned(),
            inventor: book.inventor().to_owned(),
            kind: book.kind().to_owned(),
        }
    }
}

/// Streams spellbooks from a collection reader.
///
/// The first line is skipped as a header whatever its content. Blank lines
/// are ignored. Each remaining line yields either a spellbook or the
/// [`RecordError`] explaining why it could not be decoded; callers decide
/// whether to skip it.
pub fn read_spellbooks<R: Read>(reader: R) -> impl Iterator<Item = Result<Spellbook, RecordError>> {
    let rdr = ReaderBuilder::new()
        .has_headers(true) // Skip first row as header
        .quoting(false)
        .flexible(true) // Field count is checked per record
        .from_reader(reader);

    rdr.into_records().map(|result| {
        let record = result?;
        SpellbookRecord::from_record(&record).map(SpellbookRecord::into_spellbook)
    })
}

/// Writes spellbooks to a collection writer, header first.
///
/// Spellbooks are written in the order given.
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_spellbooks<'a, W, I>(spellbooks: I, writer: W) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Spellbook>,
{
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for book in spellbooks {
        wtr.serialize(SpellbookRecord::from(book))?;
    }

    // Flush to ensure all data is written
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str) -> Vec<Result<Spellbook, RecordError>> {
        read_spellbooks(Cursor::new(input.to_owned())).collect()
    }

    #[test]
    fn parse_simple_collection() {
        let books: Vec<_> = read_all(
            "serialNumber,title,inventor,type\n\
             1,Basics,Flamel,Fire\n\
             2,Advanced Charms,Filius Flitwick,Charms\n",
        )
        .into_iter()
        .map(Result::unwrap)
        .collect();

        assert_eq!(books.len(), 2);
        assert_eq!(books[0].serial_number(), SerialNumber(1));
        assert_eq!(books[1].short_form(), "Advanced Charms (Filius Flitwick)");
        assert_eq!(books[1].kind(), "Charms");
    }

    #[test]
    fn header_is_skipped_positionally() {
        let books = read_all("anything,at,all,here\n5,Title,Inventor,Type\n");
        assert_eq!(books.len(), 1);
        assert_eq!(
            books[0].as_ref().unwrap().serial_number(),
            SerialNumber(5)
        );
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(read_all("serialNumber,title,inventor,type\n").is_empty());
        assert!(read_all("").is_empty());
    }

    #[test]
    fn malformed_lines_are_reported() {
        let results = read_all(
            "serialNumber,title,inventor,type\n\
             1,Basics,Flamel\n\
             x,Basics,Flamel,Fire\n\
             3,Basics,Flamel,Fire\n",
        );

        assert!(matches!(results[0], Err(RecordError::FieldCount(3))));
        assert!(matches!(results[1], Err(RecordError::Csv(_))));
        assert!(results[2].is_ok());
    }

    #[test]
    fn quotes_are_kept_verbatim() {
        let books = read_all("h,h,h,h\n1,\"Quoted,Inventor,Type\n");
        // The quote does not protect the comma, so this line has four fields.
        let book = books[0].as_ref().unwrap();
        assert_eq!(book.title(), "\"Quoted");
    }

    #[test]
    fn windows_line_endings_are_accepted() {
        let books = read_all("serialNumber,title,inventor,type\r\n1,Basics,Flamel,Fire\r\n");
        assert_eq!(books[0].as_ref().unwrap().kind(), "Fire");
    }

    #[test]
    fn write_collection_with_header() {
        let books = [
            Spellbook::new(SerialNumber(1), "Basics", "Flamel", "Fire"),
            Spellbook::new(SerialNumber(2), "Advanced", "Flamel", "Fire"),
        ];

        let mut output = Vec::new();
        write_spellbooks(&books, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "serialNumber,title,inventor,type\n1,Basics,Flamel,Fire\n2,Advanced,Flamel,Fire\n"
        );
    }

    #[test]
    fn written_collection_reads_back() {
        let books = [Spellbook::new(SerialNumber(9), "Dark Arts", "Snape", "Defence")];

        let mut output = Vec::new();
        write_spellbooks(&books, &mut output).unwrap();

        let read: Vec<_> = read_spellbooks(Cursor::new(output))
            .map(Result::unwrap)
            .collect();
        assert_eq!(read, books);
    }
}
