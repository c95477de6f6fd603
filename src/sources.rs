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

use std::collections::HashSet;
use std::path::Path;

use lazy_static::lazy_static;

/// Files which are part of the tree, but must be left alone.
///
/// These are checked before the file names are normalized, so the match is
/// against the extension as it is on disk. Only the listed spellings count.
pub fn is_excluded(path: &Path) -> bool {
    extension(path)
        .map(|extension| EXCLUDED.contains(extension))
        .unwrap_or(false)
}

/// Translation units are recognized by their lowercase extension only,
/// so this check belongs after the rename step.
pub fn is_translation_unit(path: &Path) -> bool {
    extension(path)
        .map(|extension| TRANSLATION_UNITS.contains(extension))
        .unwrap_or(false)
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|extension| extension.to_str())
}

lazy_static! {
    static ref EXCLUDED: HashSet<&'static str> = {
        let mut set = HashSet::new();

        // resource scripts
        set.insert("rc");
        set.insert("RC");
        // project and solution metadata
        set.insert("vcxproj");
        set.insert("filters");

        set.shrink_to_fit();
        set
    };

    static ref TRANSLATION_UNITS: HashSet<&'static str> = {
        let mut set = HashSet::new();

        set.insert("cpp");

        set.shrink_to_fit();
        set
    };
}

#[cfg(test)]
mod test {
    use crate::sources::{is_excluded, is_translation_unit};
    use std::path::Path;

    #[test]
    fn test_excluded() {
        assert!(is_excluded(Path::new("RedAlert/REDALERT.RC")));
        assert!(is_excluded(Path::new("RedAlert/redalert.rc")));
        assert!(is_excluded(Path::new("RedAlert/RedAlert.vcxproj")));
        assert!(is_excluded(Path::new("RedAlert/RedAlert.vcxproj.filters")));

        assert!(!is_excluded(Path::new("RedAlert/RedAlert.Rc")));
        assert!(!is_excluded(Path::new("RedAlert/RedAlert.VCXPROJ")));
        assert!(!is_excluded(Path::new("RedAlert/RedAlert.Filters")));

        assert!(!is_excluded(Path::new("RedAlert/CONQUER.CPP")));
        assert!(!is_excluded(Path::new("RedAlert/FUNCTION.H")));
        assert!(!is_excluded(Path::new("RedAlert/README")));
        assert!(!is_excluded(Path::new("RedAlert/.rc")));
    }

    #[test]
    fn test_translation_units() {
        assert!(is_translation_unit(Path::new("RedAlert/conquer.cpp")));
        assert!(is_translation_unit(Path::new("RedAlert/WIN32LIB/keyboard.cpp")));

        assert!(!is_translation_unit(Path::new("RedAlert/CONQUER.CPP")));
        assert!(!is_translation_unit(Path::new("RedAlert/function.h")));
        assert!(!is_translation_unit(Path::new("RedAlert/keyboard.asm")));
        assert!(!is_translation_unit(Path::new("RedAlert/conquer.cpp.bak")));
        assert!(!is_translation_unit(Path::new("RedAlert/.cpp")));
    }
}
