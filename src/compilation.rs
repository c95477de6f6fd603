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

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::paths;

/// Represents an entry of the compilation database.
///
/// Only one of `arguments` and `command` is meant to be used by the
/// consumers. This tool always fills `arguments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub directory: PathBuf,
    pub file: PathBuf,
    pub arguments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Represents a compiler call for a single translation unit.
///
/// All paths are expected to be absolute and normalized.
#[derive(Debug, PartialEq)]
pub struct Compilation<'a> {
    pub working_dir: &'a Path,
    pub compiler: &'a str,
    pub standard: &'a str,
    pub source_root: &'a Path,
    pub source: &'a Path,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Path error")]
    PathError(#[from] paths::Error),
    #[error("encode error")]
    OsString,
    #[error("Source file has no name: {0:?}")]
    NoFileName(PathBuf),
}

impl TryFrom<Compilation<'_>> for Entry {
    type Error = Error;

    fn try_from(value: Compilation<'_>) -> Result<Self, Self::Error> {
        let source_dir = value.source.parent()
            .ok_or_else(|| Error::NoFileName(value.source.to_path_buf()))?;
        let file = paths::relative_to(value.source, value.working_dir)?;

        let arguments = vec![
            value.compiler.to_string(),
            format!("-std={}", value.standard),
            format!("-I{}", into_string(&paths::relative_to(source_dir, value.working_dir)?)?),
            format!("-I{}", into_string(&paths::relative_to(value.source_root, value.working_dir)?)?),
            String::from("-c"),
            into_string(&file)?,
            String::from("-o"),
            object_name(value.source)?,
        ];

        Ok(
            Entry {
                directory: value.working_dir.to_path_buf(),
                file,
                arguments,
                command: None,
                output: None,
            }
        )
    }
}

// The base name of the source with its last extension replaced by the
// object file extension.
fn object_name(source: &Path) -> Result<String, Error> {
    let object = source.with_extension("o");
    let name = object.file_name()
        .ok_or_else(|| Error::NoFileName(source.to_path_buf()))?;
    into_string(Path::new(name))
}

fn into_string(path: &Path) -> Result<String, Error> {
    path.to_path_buf().into_os_string().into_string().map_err(|_| Error::OsString)
}
