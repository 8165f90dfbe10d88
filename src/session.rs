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

//! Interactive line loop.

use crate::handler::CommandHandler;
use std::io::{self, BufRead, Write};
use tracing::info;

/// Prompt printed before each command by default.
pub const DEFAULT_PROMPT: &str = "user: ";

/// Reads commands from `input` until `EXIT` or end of input.
///
/// `prompt` is written before every line is read. A blank line follows
/// the output of every command except `EXIT`.
///
/// # Errors
///
/// Returns any I/O error from `input` or `output`.
pub fn run<R: BufRead, W: Write>(input: R, output: W, prompt: &str) -> io::Result<()> {
    let mut handler = CommandHandler::new(output);
    let mut lines = input.lines();
    let mut executed = 0usize;

    info!("archive session started");
    loop {
        let out = handler.output();
        write!(out, "{prompt}")?;
        out.flush()?;

        let Some(line) = lines.next().transpose()? else {
            info!(executed, "input closed");
            break;
        };
        executed += 1;

        if !handler.execute(&line)? {
            info!(executed, "archive session ended");
            break;
        }
        writeln!(handler.output())?;
    }

    handler.output().flush()
}
