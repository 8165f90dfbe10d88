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

//! Student entity and ID allocation.

use crate::base::{SerialNumber, StudentId};

/// A registered student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    name: String,
    /// Spellbooks currently held, in the order they were rented.
    current: Vec<SerialNumber>,
    /// Spellbooks returned, oldest first.
    history: Vec<SerialNumber>,
}

impl Student {
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            current: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current(&self) -> &[SerialNumber] {
        &self.current
    }

    pub fn history(&self) -> &[SerialNumber] {
        &self.history
    }

    pub(crate) fn borrow(&mut self, serial: SerialNumber) {
        self.current.push(serial);
    }

    /// Moves `serial` from the current holdings into the history.
    pub(crate) fn give_back(&mut self, serial: SerialNumber) {
        self.history.push(serial);
        if let Some(pos) = self.current.iter().position(|held| *held == serial) {
            self.current.remove(pos);
        }
    }

    pub(crate) fn clear_current(&mut self) {
        self.current.clear();
    }
}

/// Hands out strictly increasing student IDs.
///
/// The sequence starts at [`StudentId::FIRST`] and can be rewound with
/// [`reset`](Self::reset), so every fresh archive numbers students identically.
#[derive(Debug, Clone)]
pub struct StudentIdAllocator {
    next: StudentId,
}

impl StudentIdAllocator {
    pub fn new() -> Self {
        Self {
            next: StudentId::FIRST,
        }
    }

    /// Returns the next unused ID.
    pub fn next_id(&mut self) -> StudentId {
        let id = self.next;
        self.next = StudentId(id.0 + 1);
        id
    }

    pub fn reset(&mut self) {
        self.next = StudentId::FIRST;
    }
}

impl Default for StudentIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
