//! Export table walking
//!
//! Walks a package's export table in on-disk order and decides, for every
//! entry, whether it is exported and into which directory. Entries are
//! filtered by:
//! - reserved "None" slots (always skipped)
//! - an optional single object name
//! - an optional class filter
//! - the asset category table, when walking in category mode
//!
//! Output directories are built fresh for each entry from the base
//! directory, the category folder and the group name, so one entry's group
//! never leaks into the next entry's path. Group names that are not a single
//! plain folder name are treated as ungrouped, so output stays under the base.

use std::fmt;
use std::fs;
use std::io;
use std::ops::Deref;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use crate::category::{category_for, AssetCategory};
use crate::package::{ExportEntry, Package, PackageError, NONE_NAME};

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("could not create output folder '{}': {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Package(#[from] PackageError),
}

/// How a class filter pattern is compared against class names
///
/// All modes ignore ASCII case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassMatch {
    #[default]
    Exact,
    Prefix,
    Substring,
}

impl FromStr for ClassMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(ClassMatch::Exact),
            "prefix" => Ok(ClassMatch::Prefix),
            "substring" | "contains" => Ok(ClassMatch::Substring),
            other => Err(format!(
                "unknown class match mode '{}' (expected exact, prefix or substring)",
                other
            )),
        }
    }
}

impl fmt::Display for ClassMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClassMatch::Exact => "exact",
            ClassMatch::Prefix => "prefix",
            ClassMatch::Substring => "substring",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFilter {
    pub pattern: String,
    pub mode: ClassMatch,
}

impl ClassFilter {
    pub fn new(pattern: impl Into<String>, mode: ClassMatch) -> Self {
        Self {
            pattern: pattern.into(),
            mode,
        }
    }

    pub fn matches(&self, class_name: &str) -> bool {
        let pattern = self.pattern.as_bytes();
        let class_name = class_name.as_bytes();
        match self.mode {
            ClassMatch::Exact => class_name.eq_ignore_ascii_case(pattern),
            ClassMatch::Prefix => {
                class_name.len() >= pattern.len()
                    && class_name[..pattern.len()].eq_ignore_ascii_case(pattern)
            }
            ClassMatch::Substring => {
                pattern.is_empty()
                    || class_name
                        .windows(pattern.len())
                        .any(|window| window.eq_ignore_ascii_case(pattern))
            }
        }
    }
}

/// Filter criteria for one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSelection {
    /// Only export the object with this name (case-insensitive)
    pub single_object: Option<String>,
    pub class_filter: Option<ClassFilter>,
    /// Export grouped objects into a sub-folder named after the group
    pub group_paths: bool,
}

impl ExportSelection {
    pub fn with_single_object(mut self, name: Option<String>) -> Self {
        self.single_object = name;
        self
    }

    pub fn with_class_filter(mut self, filter: Option<ClassFilter>) -> Self {
        self.class_filter = filter;
        self
    }

    pub fn with_group_paths(mut self, group_paths: bool) -> Self {
        self.group_paths = group_paths;
        self
    }
}

/// An export entry that passed every filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified<'a> {
    /// Position in the export table
    pub index: usize,
    pub entry: &'a ExportEntry,
    pub object_name: &'a str,
    pub class_name: &'a str,
    pub group_name: &'a str,
    /// Category the class was routed to (category mode only)
    pub category: Option<&'a AssetCategory>,
}

impl Classified<'_> {
    pub fn is_grouped(&self) -> bool {
        !self.group_name.eq_ignore_ascii_case(NONE_NAME)
    }

    /// Destination directory for this entry under `base`
    pub fn output_dir(&self, base: &Path, group_paths: bool) -> PathBuf {
        let mut dir = base.to_path_buf();
        if let Some(category) = self.category {
            dir.push(category.folder);
        }
        if group_paths && self.is_grouped() && is_folder_name(self.group_name) {
            dir.push(self.group_name);
        }
        dir
    }
}

/// Whether a name is one plain path component (no separators, `.`, `..`,
/// roots or prefixes)
fn is_folder_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Apply the selection to a single export slot
///
/// Returns `Ok(None)` for entries that are skipped. Only an unresolvable
/// object name is an error; an unresolvable class is logged and skipped.
pub fn classify<'a>(
    package: &'a dyn Package,
    index: usize,
    selection: &ExportSelection,
    categories: Option<&'a [AssetCategory]>,
) -> Result<Option<Classified<'a>>, PackageError> {
    let entry = package
        .exports()
        .get(index)
        .ok_or(PackageError::ExportIndex(index))?;

    let object_name = package.resolve_name(entry.object_name)?;
    if object_name.eq_ignore_ascii_case(NONE_NAME) {
        return Ok(None);
    }

    if let Some(single) = &selection.single_object {
        if !object_name.eq_ignore_ascii_case(single) {
            return Ok(None);
        }
    }

    let class_name = match package.resolve_class_name(entry.class) {
        Ok(name) => name,
        Err(e) => {
            warn!("Skipping '{}': class does not resolve ({})", object_name, e);
            return Ok(None);
        }
    };

    if let Some(filter) = &selection.class_filter {
        if !filter.matches(class_name) {
            return Ok(None);
        }
    }

    let category = match categories {
        Some(table) => match category_for(table, class_name) {
            Some(category) => Some(category),
            None => return Ok(None),
        },
        None => None,
    };

    let group_name = match package.resolve_group_name(entry.group) {
        Ok(name) if name.eq_ignore_ascii_case(NONE_NAME) || is_folder_name(name) => name,
        Ok(name) => {
            warn!("Group '{}' of '{}' is not a folder name; treating as ungrouped", name, object_name);
            NONE_NAME
        }
        Err(e) => {
            warn!("Group of '{}' does not resolve ({}); treating as ungrouped", object_name, e);
            NONE_NAME
        }
    };

    Ok(Some(Classified {
        index,
        entry,
        object_name,
        class_name,
        group_name,
        category,
    }))
}

/// Iterate the entries a selection picks, without touching the filesystem
pub fn classified<'a>(
    package: &'a dyn Package,
    selection: &'a ExportSelection,
    categories: Option<&'a [AssetCategory]>,
) -> impl Iterator<Item = Result<Classified<'a>, PackageError>> + 'a {
    (0..package.exports().len())
        .filter_map(move |index| classify(package, index, selection, categories).transpose())
}

/// Create a directory and any missing parents
///
/// A directory that already exists is not an error.
pub fn ensure_dir(path: &Path) -> Result<(), WalkError> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| WalkError::Path {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Created output folder {}", path.display());
    Ok(())
}

/// An entry to export and the (existing) directory it goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkItem<'a> {
    pub classified: Classified<'a>,
    pub output_dir: PathBuf,
}

impl<'a> Deref for WalkItem<'a> {
    type Target = Classified<'a>;

    fn deref(&self) -> &Self::Target {
        &self.classified
    }
}

/// Lazy walk over an export table
///
/// Each item's directory is created just before the item is yielded. The
/// first error ends the walk.
pub struct Walker<'a> {
    package: &'a dyn Package,
    base: PathBuf,
    selection: &'a ExportSelection,
    categories: Option<&'a [AssetCategory]>,
    next: usize,
}

/// Start walking a package into `base`
///
/// The base directory is created up front; failing to create it is a
/// [`WalkError::Path`].
pub fn walk<'a>(
    package: &'a dyn Package,
    base: &Path,
    selection: &'a ExportSelection,
    categories: Option<&'a [AssetCategory]>,
) -> Result<Walker<'a>, WalkError> {
    ensure_dir(base)?;
    Ok(Walker {
        package,
        base: base.to_path_buf(),
        selection,
        categories,
        next: 0,
    })
}

impl<'a> Iterator for Walker<'a> {
    type Item = Result<WalkItem<'a>, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.package.exports().len();
        while self.next < len {
            let index = self.next;
            self.next += 1;

            let classified = match classify(self.package, index, self.selection, self.categories) {
                Ok(Some(classified)) => classified,
                Ok(None) => continue,
                Err(e) => {
                    self.next = len;
                    return Some(Err(e.into()));
                }
            };

            let output_dir = classified.output_dir(&self.base, self.selection.group_paths);
            if let Err(e) = ensure_dir(&output_dir) {
                self.next = len;
                return Some(Err(e));
            }

            return Some(Ok(WalkItem {
                classified,
                output_dir,
            }));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ASSET_CATEGORIES;
    use crate::dump::{DumpPackage, PackageDump};
    use crate::package::ObjectRef;

    fn package(rows: &[(&str, &str, &str)]) -> DumpPackage {
        let mut dump = PackageDump::new("Test");
        for (name, class, group) in rows {
            dump.push_export(name, class, group, None);
        }
        DumpPackage::from(dump)
    }

    fn names_and_dirs(walker: Walker<'_>) -> Vec<(String, PathBuf)> {
        walker
            .map(|item| {
                let item = item.unwrap();
                (item.object_name.to_string(), item.output_dir.clone())
            })
            .collect()
    }

    fn scenario() -> DumpPackage {
        package(&[
            ("None", "None", "None"),
            ("Tex1", "Texture", "None"),
            ("Tex2", "Texture", "Grp1"),
            ("Tex3", "Texture", "None"),
        ])
    }

    #[test]
    fn test_class_match_modes() {
        assert!(ClassFilter::new("sound", ClassMatch::Exact).matches("Sound"));
        assert!(!ClassFilter::new("Sound", ClassMatch::Exact).matches("SoundGroup"));
        assert!(ClassFilter::new("Sound", ClassMatch::Prefix).matches("SoundGroup"));
        assert!(!ClassFilter::new("Sound", ClassMatch::Prefix).matches("AmbientSound"));
        assert!(ClassFilter::new("mesh", ClassMatch::Substring).matches("LodMesh"));
        assert!(!ClassFilter::new("Mesh", ClassMatch::Substring).matches("Texture"));
        assert!(!ClassFilter::new("LongerThanName", ClassMatch::Prefix).matches("Long"));
    }

    #[test]
    fn test_class_match_parse() {
        assert_eq!("Exact".parse::<ClassMatch>().unwrap(), ClassMatch::Exact);
        assert_eq!("prefix".parse::<ClassMatch>().unwrap(), ClassMatch::Prefix);
        assert_eq!("contains".parse::<ClassMatch>().unwrap(), ClassMatch::Substring);
        assert!("fuzzy".parse::<ClassMatch>().is_err());
        assert_eq!(ClassMatch::Substring.to_string(), "substring");
    }

    #[test]
    fn test_category_and_group_scenario() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let package = scenario();
        let selection = ExportSelection::default().with_group_paths(true);

        let walker = walk(&package, &out, &selection, Some(&ASSET_CATEGORIES[..])).unwrap();
        let items = names_and_dirs(walker);

        assert_eq!(
            items,
            vec![
                ("Tex1".to_string(), out.join("Textures")),
                ("Tex2".to_string(), out.join("Textures").join("Grp1")),
                ("Tex3".to_string(), out.join("Textures")),
            ]
        );
        assert!(out.join("Textures").join("Grp1").is_dir());
    }

    #[test]
    fn test_single_object_without_categories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let package = scenario();
        let selection = ExportSelection::default().with_single_object(Some("tex2".to_string()));

        let walker = walk(&package, &out, &selection, None).unwrap();
        assert_eq!(names_and_dirs(walker), vec![("Tex2".to_string(), out.clone())]);
    }

    #[test]
    fn test_single_object_absent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let package = scenario();
        let selection = ExportSelection::default().with_single_object(Some("Nope".to_string()));

        let walker = walk(&package, temp_dir.path(), &selection, None).unwrap();
        assert_eq!(walker.count(), 0);
    }

    #[test]
    fn test_none_entries_never_yielded() {
        let temp_dir = tempfile::tempdir().unwrap();
        let package = package(&[
            ("None", "Texture", "None"),
            ("NONE", "Sound", "None"),
            ("none", "None", "None"),
            ("Real", "Sound", "None"),
        ]);
        let selection = ExportSelection::default();

        let walker = walk(&package, temp_dir.path(), &selection, None).unwrap();
        let names: Vec<_> = names_and_dirs(walker).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Real"]);

        // Asking for "None" by name still yields nothing
        let selection = ExportSelection::default().with_single_object(Some("None".to_string()));
        let walker = walk(&package, temp_dir.path(), &selection, None).unwrap();
        assert_eq!(walker.count(), 0);
    }

    #[test]
    fn test_uncategorised_classes_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let package = package(&[
            ("Pal", "Palette", "None"),
            ("Actor", "None", "None"),
            ("Beep", "Sound", "None"),
            ("Skaarj", "LodMesh", "None"),
            ("Song", "Music", "None"),
        ]);
        let selection = ExportSelection::default();

        let walker = walk(&package, temp_dir.path(), &selection, Some(&ASSET_CATEGORIES[..])).unwrap();
        let leaves: Vec<_> = walker
            .map(|item| {
                let item = item.unwrap();
                let leaf = item.output_dir.file_name().unwrap().to_string_lossy().to_string();
                assert_eq!(leaf, item.category.unwrap().folder);
                (item.object_name.to_string(), leaf)
            })
            .collect();

        assert_eq!(
            leaves,
            vec![
                ("Actor".to_string(), "Classes".to_string()),
                ("Beep".to_string(), "Sounds".to_string()),
                ("Skaarj".to_string(), "Models".to_string()),
                ("Song".to_string(), "Music".to_string()),
            ]
        );
    }

    #[test]
    fn test_group_suffix_does_not_leak() {
        let temp_dir = tempfile::tempdir().unwrap();
        let package = package(&[("A", "Sound", "Alpha"), ("B", "Sound", "None")]);
        let selection = ExportSelection::default().with_group_paths(true);

        let walker = walk(&package, temp_dir.path(), &selection, None).unwrap();
        assert_eq!(
            names_and_dirs(walker),
            vec![
                ("A".to_string(), temp_dir.path().join("Alpha")),
                ("B".to_string(), temp_dir.path().to_path_buf()),
            ]
        );
    }

    #[test]
    fn test_group_names_stay_under_base() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let elsewhere = temp_dir.path().join("elsewhere");
        let package = package(&[
            ("Abs", "Sound", elsewhere.to_str().unwrap()),
            ("Up", "Sound", "../../escaped"),
            ("Dots", "Sound", ".."),
            ("Nested", "Sound", "a/b"),
            ("Back", "Sound", "a\\b"),
            ("Fine", "Sound", "Ambient"),
        ]);
        let selection = ExportSelection::default().with_group_paths(true);

        let walker = walk(&package, &out, &selection, None).unwrap();
        let items = names_and_dirs(walker);

        assert_eq!(items.len(), 6);
        for (name, dir) in &items[..5] {
            assert_eq!(dir, &out, "{} left the base", name);
        }
        assert_eq!(items[5], ("Fine".to_string(), out.join("Ambient")));
        assert!(!elsewhere.exists());
        assert!(!temp_dir.path().join("escaped").exists());
        assert!(!out.join("a").exists());
    }

    #[test]
    fn test_folder_names() {
        assert!(is_folder_name("Ambient"));
        assert!(is_folder_name("Grp.1"));
        assert!(!is_folder_name(""));
        assert!(!is_folder_name("."));
        assert!(!is_folder_name(".."));
        assert!(!is_folder_name("/abs"));
        assert!(!is_folder_name("a/b"));
        assert!(!is_folder_name("a\\b"));
    }

    #[test]
    fn test_groups_ignored_without_group_paths() {
        let temp_dir = tempfile::tempdir().unwrap();
        let package = package(&[("A", "Sound", "Alpha")]);
        let selection = ExportSelection::default();

        let walker = walk(&package, temp_dir.path(), &selection, None).unwrap();
        assert_eq!(
            names_and_dirs(walker),
            vec![("A".to_string(), temp_dir.path().to_path_buf())]
        );
        assert!(!temp_dir.path().join("Alpha").exists());
    }

    #[test]
    fn test_class_filter_modes_in_walk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let package = package(&[
            ("Gun", "LodMesh", "None"),
            ("Wall", "Mesh", "None"),
            ("Beep", "Sound", "None"),
        ]);

        let selection = ExportSelection::default()
            .with_class_filter(Some(ClassFilter::new("Mesh", ClassMatch::Substring)));
        let walker = walk(&package, temp_dir.path(), &selection, None).unwrap();
        assert_eq!(walker.count(), 2);

        let selection = ExportSelection::default()
            .with_class_filter(Some(ClassFilter::new("Mesh", ClassMatch::Exact)));
        let walker = walk(&package, temp_dir.path(), &selection, None).unwrap();
        let names: Vec<_> = names_and_dirs(walker).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Wall"]);
    }

    #[test]
    fn test_unresolvable_class_is_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut dump = PackageDump::new("Broken");
        dump.push_export("Good", "Texture", "None", None);
        let bad = dump.push_export("Bad", "Texture", "None", None);
        dump.exports[bad].entry.class = ObjectRef(-99);
        let package = DumpPackage::from(dump);
        let selection = ExportSelection::default();

        let walker = walk(&package, temp_dir.path(), &selection, Some(&ASSET_CATEGORIES[..])).unwrap();
        let names: Vec<_> = names_and_dirs(walker).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Good"]);
    }

    #[test]
    fn test_unresolvable_name_ends_walk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut dump = PackageDump::new("Broken");
        let bad = dump.push_export("Bad", "Texture", "None", None);
        dump.push_export("Good", "Texture", "None", None);
        dump.exports[bad].entry.object_name = 500;
        let package = DumpPackage::from(dump);
        let selection = ExportSelection::default();

        let mut walker = walk(&package, temp_dir.path(), &selection, None).unwrap();
        assert!(matches!(
            walker.next(),
            Some(Err(WalkError::Package(PackageError::NameIndex(500))))
        ));
        assert!(walker.next().is_none());
    }

    #[test]
    fn test_walk_twice_into_existing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let package = scenario();
        let selection = ExportSelection::default().with_group_paths(true);

        for _ in 0..2 {
            let walker = walk(&package, &out, &selection, Some(&ASSET_CATEGORIES[..])).unwrap();
            for item in walker {
                let item = item.unwrap();
                fs::write(item.output_dir.join(format!("{}.txt", item.object_name)), "x").unwrap();
            }
        }
        assert!(out.join("Textures").join("Grp1").join("Tex2.txt").is_file());
    }

    #[test]
    fn test_base_path_blocked_by_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let package = scenario();
        let selection = ExportSelection::default();

        let err = walk(&package, &blocker.join("out"), &selection, None).err().unwrap();
        assert!(matches!(err, WalkError::Path { .. }));
    }

    #[test]
    fn test_subfolder_blocked_by_file_ends_walk() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("Textures"), "not a directory").unwrap();
        let package = scenario();
        let selection = ExportSelection::default();

        let mut walker =
            walk(&package, temp_dir.path(), &selection, Some(&ASSET_CATEGORIES[..])).unwrap();
        assert!(matches!(walker.next(), Some(Err(WalkError::Path { .. }))));
        assert!(walker.next().is_none());
    }

    #[test]
    fn test_classified_preserves_table_order() {
        let package = package(&[
            ("Zeta", "Sound", "None"),
            ("Alpha", "Sound", "None"),
            ("Mid", "Sound", "None"),
        ]);
        let selection = ExportSelection::default();
        let names: Vec<_> = classified(&package, &selection, None)
            .map(|c| c.unwrap().object_name)
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }
}
