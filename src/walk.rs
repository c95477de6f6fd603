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

use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Source root is not a directory: {0:?}")]
    NotADirectory(PathBuf),
    #[error("Directory walk failed")]
    WalkError(#[from] walkdir::Error),
}

/// Lists every regular file under the given root, depth first.
///
/// The sequence is lazy and not sorted, the order is what the directory
/// listing gives. Directories are descended into, but never yielded.
/// Symbolic links are followed.
pub fn files(root: &Path) -> Result<impl Iterator<Item=Result<PathBuf, Error>>, Error> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let iterator = WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() =>
                Some(Ok(entry.into_path())),
            Ok(_) =>
                None,
            Err(error) =>
                Some(Err(Error::WalkError(error))),
        });

    Ok(iterator)
}
