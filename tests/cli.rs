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

//! End-to-end tests of the `spellbook-archive` binary.

use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;
use tempfile::NamedTempFile;

fn cmd() -> Command {
    Command::cargo_bin("spellbook-archive").unwrap()
}

fn collection() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"serialNumber,title,inventor,type\n1,Basics,Flamel,Fire\n2,Advanced,Flamel,Fire\n")
        .unwrap();
    file
}

#[test]
fn interactive_session_on_stdin() {
    let file = collection();
    let script = format!(
        "add collection {}\nadd student Luna Lovegood\nrent 100000 2\nlist available\nexit\n",
        file.path().display()
    );

    cmd()
        .write_stdin(script)
        .assert()
        .success()
        .stdout(
            "user: 2 spellbooks successfully added.\n\n\
             user: Success.\n\n\
             user: Success.\n\n\
             user: Basics (Flamel)\n\n\
             user: Ending Archive process.\n",
        );
}

#[test]
fn no_prompt_flag() {
    cmd()
        .arg("--no-prompt")
        .write_stdin("list all\nexit\n")
        .assert()
        .success()
        .stdout("No spellbooks in system.\n\nEnding Archive process.\n");
}

#[test]
fn custom_prompt() {
    cmd()
        .args(["--prompt", "> "])
        .write_stdin("exit\n")
        .assert()
        .success()
        .stdout("> Ending Archive process.\n");
}

#[test]
fn commands_from_file() {
    let mut script = NamedTempFile::new().unwrap();
    script.write_all(b"add student Dobby\nstudent 100000\nexit\n").unwrap();

    cmd()
        .arg("--no-prompt")
        .arg(script.path())
        .assert()
        .success()
        .stdout(contains("100000: Dobby"));
}

#[test]
fn end_of_input_exits_cleanly() {
    cmd().arg("--no-prompt").write_stdin("help\n").assert().success().stdout(contains(
        "RENT <studentNumber> <serialNumber> loans out the specified spellbook to the given student",
    ));
}

#[test]
fn missing_command_file_fails() {
    cmd()
        .arg("/definitely/not/here.txt")
        .assert()
        .failure()
        .stderr(contains("Error opening file"));
}
