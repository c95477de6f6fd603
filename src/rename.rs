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

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Represents the outcome of renaming a single file.
///
/// When the file name was lowercase already, both paths are the same.
#[derive(Debug, Clone, PartialEq)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl Rename {
    pub fn is_effective(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Path has no file name: {0:?}")]
    NoFileName(PathBuf),
    #[error("Can't rename {from:?}, because {to:?} already exists")]
    Collision { from: PathBuf, to: PathBuf },
}

/// The same path with the file name in lowercase.
///
/// Only the last component is changed, the directories are kept as they are.
/// Parts of the name which are not valid unicode are kept as they are.
pub fn lowercase(path: &Path) -> Result<PathBuf, Error> {
    let name = path.file_name()
        .ok_or_else(|| Error::NoFileName(path.to_path_buf()))?;

    Ok(path.with_file_name(lowercase_name(name)))
}

#[cfg(unix)]
fn lowercase_name(name: &OsStr) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let mut bytes = name.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                result.extend_from_slice(valid.to_lowercase().as_bytes());
                break;
            }
            Err(error) => {
                let (valid, rest) = bytes.split_at(error.valid_up_to());
                let valid = std::str::from_utf8(valid).unwrap_or_default();
                result.extend_from_slice(valid.to_lowercase().as_bytes());

                let invalid = error.error_len().unwrap_or(rest.len());
                result.extend_from_slice(&rest[..invalid]);
                bytes = &rest[invalid..];
            }
        }
    }
    OsString::from_vec(result)
}

#[cfg(not(unix))]
fn lowercase_name(name: &OsStr) -> OsString {
    match name.to_str() {
        Some(valid) => OsString::from(valid.to_lowercase()),
        None => {
            log::warn!("Keeping file name which is not valid unicode: {:?}", name);
            name.to_os_string()
        }
    }
}

/// Renames the file on disk to its lowercase name.
///
/// An existing sibling with the target name is never overwritten, not even
/// when one of them is a symbolic link to the other.
pub fn rename(path: &Path) -> Result<Rename, Error> {
    let target = lowercase(path)?;
    if target != path {
        if target.symlink_metadata().is_ok() && !same_file(path, &target)? {
            return Err(Error::Collision { from: path.to_path_buf(), to: target });
        }
        fs::rename(path, &target)?;
        log::info!("Renamed {:?} to {:?}", path, target);
    }

    Ok(Rename { from: path.to_path_buf(), to: target })
}

/// Renames all the given files, and returns the mapping of the names.
///
/// Stops at the first failure. Files renamed before that are not restored.
pub fn rename_all(paths: impl IntoIterator<Item=PathBuf>) -> Result<Vec<Rename>, Error> {
    paths.into_iter()
        .map(|path| rename(&path))
        .collect()
}

// Both names are the same directory entry. Links are not followed.
#[cfg(unix)]
fn same_file(lhs: &Path, rhs: &Path) -> Result<bool, std::io::Error> {
    use std::os::unix::fs::MetadataExt;

    let (lhs, rhs) = (fs::symlink_metadata(lhs)?, fs::symlink_metadata(rhs)?);
    Ok(lhs.dev() == rhs.dev() && lhs.ino() == rhs.ino())
}

#[cfg(not(unix))]
fn same_file(lhs: &Path, rhs: &Path) -> Result<bool, std::io::Error> {
    let (lhs_meta, rhs_meta) = (fs::symlink_metadata(lhs)?, fs::symlink_metadata(rhs)?);
    if lhs_meta.file_type().is_symlink() || rhs_meta.file_type().is_symlink() {
        return Ok(false);
    }
    Ok(fs::canonicalize(lhs)? == fs::canonicalize(rhs)?)
}

#[cfg(test)]
mod test {
    use super::*;

    fn names(directory: &Path) -> Vec<String> {
        let mut result: Vec<String> = fs::read_dir(directory).unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        result.sort();
        result
    }

    #[test]
    fn test_lowercase() -> Result<(), Error> {
        assert_eq!(PathBuf::from("RedAlert/WIN32LIB/keyboard.cpp"),
                   lowercase(Path::new("RedAlert/WIN32LIB/KEYBOARD.CPP"))?);
        assert_eq!(PathBuf::from("RedAlert/conquer.cpp"),
                   lowercase(Path::new("RedAlert/conquer.cpp"))?);
        assert_eq!(PathBuf::from("/TiberianDawn/readme"),
                   lowercase(Path::new("/TiberianDawn/README"))?);

        assert!(matches!(lowercase(Path::new("/")), Err(Error::NoFileName(_))));

        Ok(())
    }

    #[test]
    fn test_rename() -> Result<(), Error> {
        let root = tempfile::tempdir().unwrap();
        let directory = root.path().join("RedAlert");
        fs::create_dir(&directory).unwrap();
        fs::write(directory.join("Foo.CPP"), "int main() {}").unwrap();

        let result = rename(&directory.join("Foo.CPP"))?;

        assert_eq!(Rename { from: directory.join("Foo.CPP"), to: directory.join("foo.cpp") }, result);
        assert!(result.is_effective());
        assert_eq!(vec!["foo.cpp"], names(&directory));
        assert_eq!(vec!["RedAlert"], names(root.path()));
        assert_eq!("int main() {}", fs::read_to_string(directory.join("foo.cpp")).unwrap());

        Ok(())
    }

    #[test]
    fn test_rename_is_idempotent() -> Result<(), Error> {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("CONQUER.CPP"), "").unwrap();
        fs::write(root.path().join("function.h"), "").unwrap();

        let first = rename_all(vec![root.path().join("CONQUER.CPP"), root.path().join("function.h")])?;
        assert_eq!(1, first.iter().filter(|rename| rename.is_effective()).count());

        let second = rename_all(first.into_iter().map(|rename| rename.to))?;
        assert_eq!(0, second.iter().filter(|rename| rename.is_effective()).count());
        assert_eq!(vec!["conquer.cpp", "function.h"], names(root.path()));

        Ok(())
    }

    #[test]
    fn test_rename_all_keeps_order() -> Result<(), Error> {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("B.CPP"), "").unwrap();
        fs::write(root.path().join("A.CPP"), "").unwrap();

        let result = rename_all(vec![root.path().join("B.CPP"), root.path().join("A.CPP")])?;

        let expected = vec![
            Rename { from: root.path().join("B.CPP"), to: root.path().join("b.cpp") },
            Rename { from: root.path().join("A.CPP"), to: root.path().join("a.cpp") },
        ];
        assert_eq!(expected, result);

        Ok(())
    }

    #[test]
    fn test_rename_missing_file() {
        let root = tempfile::tempdir().unwrap();

        let result = rename(&root.path().join("MISSING.CPP"));

        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_rename_collision() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("Foo.cpp"), "upper").unwrap();
        fs::write(root.path().join("foo.cpp"), "lower").unwrap();

        let result = rename(&root.path().join("Foo.cpp"));

        assert!(matches!(result, Err(Error::Collision { .. })));
        assert_eq!("upper", fs::read_to_string(root.path().join("Foo.cpp")).unwrap());
        assert_eq!("lower", fs::read_to_string(root.path().join("foo.cpp")).unwrap());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_rename_symlink_to_sibling() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("foo.cpp"), "real content").unwrap();
        std::os::unix::fs::symlink("foo.cpp", root.path().join("FOO.CPP")).unwrap();

        let result = rename(&root.path().join("FOO.CPP"));

        assert!(matches!(result, Err(Error::Collision { .. })));
        let target = root.path().join("foo.cpp");
        assert!(!fs::symlink_metadata(&target).unwrap().file_type().is_symlink());
        assert_eq!("real content", fs::read_to_string(&target).unwrap());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_rename_not_unicode() -> Result<(), Error> {
        use std::os::unix::ffi::OsStrExt;

        let root = tempfile::tempdir().unwrap();
        let file = root.path().join(OsStr::from_bytes(b"ART\xe9.PCX"));
        fs::write(&file, "").unwrap();

        let result = rename(&file)?;

        let expected = root.path().join(OsStr::from_bytes(b"art\xe9.pcx"));
        assert_eq!(expected, result.to);
        assert!(!file.exists());
        assert!(expected.exists());

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_lowercase_not_unicode() -> Result<(), Error> {
        use std::os::unix::ffi::OsStrExt;

        let result = lowercase(Path::new(OsStr::from_bytes(b"RedAlert/\xffKEY\xc3BOARD.CPP")))?;

        assert_eq!(Path::new(OsStr::from_bytes(b"RedAlert/\xffkey\xc3board.cpp")), result);

        Ok(())
    }
}
