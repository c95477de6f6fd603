/*  Copyright (C) 2023 by the compdb authors
    This file is part of compdb.

    compdb is a tool to generate compilation database for legacy C++ trees.

    compdb is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    compdb is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use thiserror::Error;

use crate::compilation::Entry;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error")]
    SyntaxError(#[from] serde_json::Error),
}

/// Writes the entries as a JSON array into the given file.
///
/// The content goes into a temporary file first, which replaces the
/// destination only when it's complete.
pub fn write(output: &Path, entries: &[Entry]) -> Result<(), Error> {
    let temp = temporary(output);
    // Create scope for the file, so it will be closed when the scope is over.
    {
        let file = File::create(&temp)?;
        let buffer = BufWriter::new(file);
        write_to(buffer, entries)?;
    }
    fs::rename(&temp, output)?;

    Ok(())
}

/// Serialize the entries with four spaces of indentation.
pub fn write_to(writer: impl Write, entries: &[Entry]) -> Result<(), Error> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(writer, formatter);
    entries.serialize(&mut serializer)?;

    let mut writer = serializer.into_inner();
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}

fn temporary(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
