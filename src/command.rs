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

//! Command grammar.
//!
//! A command line is split on whitespace. The first token selects the
//! command and, like every keyword, is matched case-insensitively. Lines
//! that do not form a known command parse to `None` and are ignored by the
//! handler.

use crate::base::{SerialNumber, StudentId};
use crate::spellbook::Attribute;
use std::path::PathBuf;

/// Which spellbooks a `LIST` command shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Available,
}

/// A parsed archive command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    List { filter: ListFilter, long: bool },
    /// `LIST TYPES` or `LIST INVENTORS`.
    ListAttribute(Attribute),
    /// `LIST` with a missing or unknown view; only the catalog check runs.
    ListUnknown,
    NumberCopies,
    /// `TYPE <value>` or `INVENTOR <value>`.
    Search { attribute: Attribute, value: String },
    Spellbook { serial: SerialNumber, long: bool },
    SpellbookHistory(SerialNumber),
    Student(StudentId),
    StudentSpellbooks(StudentId),
    StudentHistory(StudentId),
    Rent { student: StudentId, serial: SerialNumber },
    Relinquish { student: StudentId, serial: SerialNumber },
    RelinquishAll(StudentId),
    AddStudent { name: String },
    AddSpellbook { path: PathBuf, serial: SerialNumber },
    AddCollection { path: PathBuf },
    Save { path: PathBuf },
    /// Raw student ID tokens, validated when the command runs.
    Common(Vec<String>),
}

fn is_keyword(token: Option<&&str>, keyword: &str) -> bool {
    token.is_some_and(|t| t.eq_ignore_ascii_case(keyword))
}

fn arg<T: std::str::FromStr>(tokens: &[&str], index: usize) -> Option<T> {
    tokens.get(index)?.parse().ok()
}

impl Command {
    /// Parses one input line.
    ///
    /// Returns `None` for unknown commands, unknown sub-commands other than
    /// `LIST` views, and commands with missing or non-numeric ID arguments.
    pub fn parse(line: &str) -> Option<Command> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let head = tokens.first()?.to_ascii_lowercase();

        let command = match head.as_str() {
            "exit" => Command::Exit,
            "help" | "commands" => Command::Help,
            "list" => {
                let long = is_keyword(tokens.get(2), "long");
                let view = tokens.get(1).map(|t| t.to_ascii_lowercase());
                match view.as_deref().unwrap_or_default() {
                    "all" => Command::List {
                        filter: ListFilter::All,
                        long,
                    },
                    "available" => Command::List {
                        filter: ListFilter::Available,
                        long,
                    },
                    "types" => Command::ListAttribute(Attribute::Type),
                    "inventors" => Command::ListAttribute(Attribute::Inventor),
                    _ => Command::ListUnknown,
                }
            }
            "number" => Command::NumberCopies,
            "type" | "inventor" => Command::Search {
                attribute: if head == "type" {
                    Attribute::Type
                } else {
                    Attribute::Inventor
                },
                // Multi-word values are rejoined with single spaces
                value: tokens[1..].join(" "),
            },
            "spellbook" => {
                if is_keyword(tokens.get(1), "history") {
                    Command::SpellbookHistory(arg(&tokens, 2)?)
                } else {
                    Command::Spellbook {
                        serial: arg(&tokens, 1)?,
                        long: is_keyword(tokens.get(2), "long"),
                    }
                }
            }
            "student" => {
                if is_keyword(tokens.get(1), "spellbooks") {
                    Command::StudentSpellbooks(arg(&tokens, 2)?)
                } else if is_keyword(tokens.get(1), "history") {
                    Command::StudentHistory(arg(&tokens, 2)?)
                } else {
                    Command::Student(arg(&tokens, 1)?)
                }
            }
            "rent" => Command::Rent {
                student: arg(&tokens, 1)?,
                serial: arg(&tokens, 2)?,
            },
            "relinquish" => {
                if is_keyword(tokens.get(1), "all") {
                    Command::RelinquishAll(arg(&tokens, 2)?)
                } else {
                    Command::Relinquish {
                        student: arg(&tokens, 1)?,
                        serial: arg(&tokens, 2)?,
                    }
                }
            }
            "add" => match tokens.get(1)?.to_ascii_lowercase().as_str() {
                "student" => Command::AddStudent {
                    name: tokens.get(2..).unwrap_or_default().join(" "),
                },
                "spellbook" => Command::AddSpellbook {
                    path: PathBuf::from(tokens.get(2)?),
                    serial: arg(&tokens, 3)?,
                },
                "collection" => Command::AddCollection {
                    path: PathBuf::from(tokens.get(2)?),
                },
                _ => return None,
            },
            "save" => {
                // Both `SAVE <file>` and `SAVE COLLECTION <file>` are accepted
                let path = match tokens.get(2) {
                    Some(path) if is_keyword(tokens.get(1), "collection") => path,
                    _ => tokens.get(1)?,
                };
                Command::Save {
                    path: PathBuf::from(path),
                }
            }
            "common" => Command::Common(tokens[1..].iter().map(|t| t.to_string()).collect()),
            _ => return None,
        };

        Some(command)
    }
}
