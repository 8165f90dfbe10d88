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

use clap::Parser;
use spellbook_archive::session::{self, DEFAULT_PROMPT};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Spellbook Archive - Rent spellbooks to students
///
/// Reads one command per line and writes results to stdout.
/// Type `COMMANDS` for the list of commands and `EXIT` to quit.
#[derive(Parser, Debug)]
#[command(name = "spellbook-archive")]
#[command(about = "An interactive archive for renting spellbooks", long_about = None)]
struct Args {
    /// Read commands from FILE instead of stdin
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Text printed before each command is read
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Do not print a prompt
    #[arg(long, conflicts_with = "prompt")]
    no_prompt: bool,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    setup_tracing(args.verbose);

    let prompt = if args.no_prompt { "" } else { args.prompt.as_str() };
    let stdout = io::stdout().lock();

    let result = match &args.input {
        Some(path) => {
            let file = match File::open(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Error opening file '{}': {}", path.display(), e);
                    process::exit(1);
                }
            };
            session::run(BufReader::new(file), stdout, prompt)
        }
        None => session::run(io::stdin().lock(), stdout, prompt),
    };

    if let Err(e) = result {
        eprintln!("Error running archive: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so stdout carries command output only.
fn setup_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("spellbook_archive=debug")
        } else {
            EnvFilter::new("spellbook_archive=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
