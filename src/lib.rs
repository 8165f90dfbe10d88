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

//! # Spellbook Archive
//!
//! This library provides a line-oriented archive for renting spellbooks to
//! students, with collection load and save in a flat comma-separated format.
//!
//! ## Core Components
//!
//! - [`Archive`]: Catalog of spellbooks and registry of students
//! - [`CommandHandler`]: Parses command lines and writes their output
//! - [`Spellbook`] / [`Student`]: Rentable items and borrowers
//! - [`ArchiveError`]: User-facing failures, displayed verbatim
//!
//! ## Example
//!
//! ```
//! use spellbook_archive::CommandHandler;
//!
//! let mut handler = CommandHandler::new(Vec::new());
//! handler.execute("add student Hermione Granger").unwrap();
//! handler.execute("student 100000").unwrap();
//! assert!(!handler.execute("exit").unwrap());
//!
//! let output = String::from_utf8(handler.into_inner()).unwrap();
//! assert_eq!(output, "Success.\n100000: Hermione Granger\nEnding Archive process.\n");
//! ```
//!
//! ## Threading
//!
//! The archive is single-threaded: each command is validated, applied and
//! rendered before the next is read.

mod archive;
mod base;
mod checker;
pub mod collection;
mod command;
pub mod error;
mod handler;
pub mod session;
mod spellbook;
mod student;

pub use archive::{Archive, SaveError};
pub use base::{SerialNumber, StudentId};
pub use checker::Checker;
pub use command::{Command, ListFilter};
pub use error::{ArchiveError, RecordError};
pub use handler::CommandHandler;
pub use spellbook::{Attribute, RentalStatus, Spellbook};
pub use student::{Student, StudentIdAllocator};
