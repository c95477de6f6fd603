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

use std::path::PathBuf;

use serde::Deserialize;

// Represents the application configuration.
//
// Every field can be omitted from the configuration file. The defaults
// describe the layout of the legacy source release: two source roots next
// to each other, and a `build` directory where the compiler would run.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    pub source_roots: Vec<PathBuf>,
    pub working_directory: PathBuf,
    pub compiler_path: String,
    pub language_standard: String,
    pub output: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            source_roots: vec![
                PathBuf::from("RedAlert"),
                PathBuf::from("TiberianDawn"),
            ],
            working_directory: PathBuf::from("build"),
            compiler_path: String::from("/usr/bin/clang++"),
            language_standard: String::from("c++14"),
            output: PathBuf::from("compile_commands.json"),
        }
    }
}

pub mod io {
    use thiserror::Error;

    use super::*;

    /// This error type encompasses any error that can be returned by this module.
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("IO error")]
        IoError(#[from] std::io::Error),
        #[error("Syntax error")]
        SyntaxError(#[from] serde_json::Error),
    }

    /// Load the content of the given file and parse it as Configuration.
    pub fn from_file(file: &std::path::Path) -> Result<Configuration, Error> {
        let reader = std::fs::OpenOptions::new().read(true).open(file)?;
        let result = from_reader(reader)?;

        Ok(result)
    }

    /// Load the content of the given stream and parse it as Configuration.
    pub fn from_reader(reader: impl std::io::Read) -> Result<Configuration, serde_json::Error> {
        serde_json::from_reader(reader)
    }

}
