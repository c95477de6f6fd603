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

use std::path::{Component, Path, PathBuf};

use path_absolutize::Absolutize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Paths {path:?} and {base:?} have different anchors")]
    DifferentAnchor { path: PathBuf, base: PathBuf },
    #[error("Can't walk up from {0:?}")]
    UnresolvedBase(PathBuf),
}

/// Make the path absolute (against the given root, when it's relative)
/// and drop the `.` and `..` components from it.
pub fn into_abspath(path: &Path, root: &Path) -> Result<PathBuf, std::io::Error> {
    let candidate = if path.is_absolute() {
        path.absolutize()
    } else {
        path.absolutize_from(root)
    };
    candidate.map(|x| x.to_path_buf())
}

/// Express `path` relative to `base`.
///
/// The path does not need to be under the base: the common part is dropped,
/// and every remaining directory of the base is stepped over with `..`.
/// The same path for both arguments gives `.`.
pub fn relative_to(path: &Path, base: &Path) -> Result<PathBuf, Error> {
    let (path_anchor, path_rest) = split_anchor(path);
    let (base_anchor, base_rest) = split_anchor(base);
    if path_anchor != base_anchor {
        return Err(Error::DifferentAnchor { path: path.to_path_buf(), base: base.to_path_buf() });
    }

    let common = path_rest.iter()
        .zip(base_rest.iter())
        .take_while(|(lhs, rhs)| lhs == rhs)
        .count();

    let mut result = PathBuf::new();
    for component in &base_rest[common..] {
        match component {
            Component::Normal(_) => result.push(".."),
            _ => return Err(Error::UnresolvedBase(base.to_path_buf())),
        }
    }
    for component in &path_rest[common..] {
        result.push(component);
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }

    Ok(result)
}

// Separates the prefix and root components from the rest of the path.
fn split_anchor(path: &Path) -> (Vec<Component>, Vec<Component>) {
    path.components()
        .filter(|component| *component != Component::CurDir)
        .partition(|component| matches!(component, Component::Prefix(_) | Component::RootDir))
}
