//! JSON package dumps
//!
//! A package dump is the export table of a package together with its name
//! table, import table and decoded object payloads, serialised as JSON.
//! [`DumpLoader`] finds dumps on disk and opens them as [`Package`]s.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::object::{Object, ObjectData, ObjectKind};
use crate::package::{ExportEntry, ObjectRef, Package, PackageError, PackageLoader, NONE_NAME};

/// File extension of package dumps
pub const DUMP_EXTENSION: &str = "json";

/// An import table record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    /// Index into the name table
    pub object_name: usize,
    /// Index into the name table
    pub class_name: usize,
}

/// An export record together with its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpExport {
    #[serde(flatten)]
    pub entry: ExportEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectData>,
}

/// On-disk layout of a package dump
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageDump {
    pub name: String,
    pub names: Vec<String>,
    #[serde(default)]
    pub imports: Vec<ImportEntry>,
    pub exports: Vec<DumpExport>,
}

impl PackageDump {
    /// Start an empty dump whose name table already holds "None"
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            names: vec![NONE_NAME.to_string()],
            ..Self::default()
        }
    }

    /// Intern a name and return its index
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(index) = self.names.iter().position(|n| n == name) {
            return index;
        }
        self.names.push(name.to_string());
        self.names.len() - 1
    }

    /// Reference an object by name, as an import of class "Class"
    ///
    /// "None" (any case) yields the null reference.
    pub fn reference(&mut self, object_name: &str) -> ObjectRef {
        if object_name.eq_ignore_ascii_case(NONE_NAME) {
            return ObjectRef::NONE;
        }
        let name = self.intern(object_name);
        if let Some(index) = self.imports.iter().position(|i| i.object_name == name) {
            return ObjectRef::import(index);
        }
        let class_name = self.intern("Class");
        self.imports.push(ImportEntry {
            object_name: name,
            class_name,
        });
        ObjectRef::import(self.imports.len() - 1)
    }

    /// Append an export by names
    pub fn push_export(
        &mut self,
        object_name: &str,
        class_name: &str,
        group_name: &str,
        object: Option<ObjectData>,
    ) -> usize {
        let object_name = self.intern(object_name);
        let class = self.reference(class_name);
        let group = self.reference(group_name);
        self.exports.push(DumpExport {
            entry: ExportEntry {
                object_name,
                class,
                group,
            },
            object,
        });
        self.exports.len() - 1
    }

    /// Builder form of [`PackageDump::push_export`]
    pub fn with_export(
        mut self,
        object_name: &str,
        class_name: &str,
        group_name: &str,
        object: Option<ObjectData>,
    ) -> Self {
        self.push_export(object_name, class_name, group_name, object);
        self
    }

    pub fn read(path: &Path) -> Result<Self, PackageError> {
        let contents = fs::read_to_string(path).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| PackageError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn write(&self, path: &Path) -> Result<(), PackageError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| PackageError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// A package opened from a dump
#[derive(Debug, Clone)]
pub struct DumpPackage {
    name: String,
    names: Vec<String>,
    imports: Vec<ImportEntry>,
    exports: Vec<ExportEntry>,
    objects: Vec<Option<ObjectData>>,
}

impl DumpPackage {
    pub fn open(path: &Path) -> Result<Self, PackageError> {
        let dump = PackageDump::read(path)?;
        debug!(
            "Loaded package '{}' from {} ({} names, {} imports, {} exports)",
            dump.name,
            path.display(),
            dump.names.len(),
            dump.imports.len(),
            dump.exports.len()
        );
        Ok(Self::from(dump))
    }
}

impl From<PackageDump> for DumpPackage {
    fn from(dump: PackageDump) -> Self {
        let (exports, objects) = dump
            .exports
            .into_iter()
            .map(|export| (export.entry, export.object))
            .unzip();
        Self {
            name: dump.name,
            names: dump.names,
            imports: dump.imports,
            exports,
            objects,
        }
    }
}

impl Package for DumpPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn exports(&self) -> &[ExportEntry] {
        &self.exports
    }

    fn resolve_name(&self, index: usize) -> Result<&str, PackageError> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or(PackageError::NameIndex(index))
    }

    fn resolve_object_name(&self, reference: ObjectRef) -> Result<&str, PackageError> {
        if reference.is_none() {
            return Ok(NONE_NAME);
        }
        let name_index = if let Some(index) = reference.export_index() {
            self.exports.get(index).map(|e| e.object_name)
        } else {
            reference
                .import_index()
                .and_then(|index| self.imports.get(index))
                .map(|i| i.object_name)
        };
        let name_index = name_index.ok_or(PackageError::ObjectRef(reference.0))?;
        self.resolve_name(name_index)
    }

    fn load_object(
        &self,
        index: usize,
        expected: Option<ObjectKind>,
    ) -> Result<Object, PackageError> {
        let entry = self
            .exports
            .get(index)
            .ok_or(PackageError::ExportIndex(index))?;
        let name = self.resolve_name(entry.object_name)?.to_string();
        let class_name = self.resolve_class_name(entry.class)?.to_string();
        let data = self.objects[index].clone().unwrap_or(ObjectData::Other);

        if let Some(expected) = expected {
            if data.kind() != expected {
                return Err(PackageError::UnexpectedKind {
                    object: name,
                    expected,
                    actual: data.kind(),
                });
            }
        }

        Ok(Object {
            package: self.name.clone(),
            name,
            class_name,
            data,
        })
    }
}

/// Opens package dumps from a list of search directories
#[derive(Debug, Clone, Default)]
pub struct DumpLoader {
    search_dirs: Vec<PathBuf>,
}

impl DumpLoader {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// Locate the dump for a package name
    ///
    /// A name that is itself an existing file is used as-is. Otherwise each
    /// search directory is tried for `<name>.json`.
    pub fn locate(&self, name: &str) -> Result<PathBuf, PackageError> {
        let direct = Path::new(name);
        if direct.is_file() {
            return Ok(direct.to_path_buf());
        }

        let file_name = format!("{}.{}", name, DUMP_EXTENSION);
        let mut searched = Vec::with_capacity(self.search_dirs.len());
        for dir in &self.search_dirs {
            let candidate = dir.join(&file_name);
            if candidate.is_file() {
                return Ok(candidate);
            }
            searched.push(candidate);
        }

        Err(PackageError::NotFound {
            name: name.to_string(),
            searched,
        })
    }
}

impl PackageLoader for DumpLoader {
    fn open(&self, name: &str) -> Result<Box<dyn Package>, PackageError> {
        let path = self.locate(name)?;
        Ok(Box::new(DumpPackage::open(&path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{SoundData, TextureData};

    fn sample_dump() -> PackageDump {
        PackageDump::new("Sample")
            .with_export(
                "Tex1",
                "Texture",
                "None",
                Some(ObjectData::Texture(TextureData {
                    width: 1,
                    height: 1,
                    rgba: vec![255, 0, 0, 255],
                })),
            )
            .with_export(
                "Beep",
                "Sound",
                "Effects",
                Some(ObjectData::Sound(SoundData {
                    format: "wav".to_string(),
                    data: b"RIFF".to_vec(),
                })),
            )
            .with_export("Effects", "Package", "None", None)
    }

    #[test]
    fn test_intern_reuses_names() {
        let mut dump = PackageDump::new("Pkg");
        let a = dump.intern("Texture");
        let b = dump.intern("Texture");
        assert_eq!(a, b);
        assert_eq!(dump.intern("None"), 0);
    }

    #[test]
    fn test_none_reference_is_null() {
        let mut dump = PackageDump::new("Pkg");
        assert!(dump.reference("none").is_none());
        assert!(dump.imports.is_empty());
    }

    #[test]
    fn test_resolution() {
        let package = DumpPackage::from(sample_dump());
        assert_eq!(package.name(), "Sample");
        assert_eq!(package.exports().len(), 3);

        let tex = &package.exports()[0];
        assert_eq!(package.resolve_name(tex.object_name).unwrap(), "Tex1");
        assert_eq!(package.resolve_class_name(tex.class).unwrap(), "Texture");
        assert_eq!(package.resolve_group_name(tex.group).unwrap(), "None");

        let sound = &package.exports()[1];
        assert_eq!(package.resolve_group_name(sound.group).unwrap(), "Effects");
    }

    #[test]
    fn test_export_reference_resolves_to_export_name() {
        let package = DumpPackage::from(sample_dump());
        assert_eq!(
            package.resolve_object_name(ObjectRef::export(2)).unwrap(),
            "Effects"
        );
    }

    #[test]
    fn test_bad_references() {
        let package = DumpPackage::from(sample_dump());
        assert!(matches!(
            package.resolve_object_name(ObjectRef(42)),
            Err(PackageError::ObjectRef(42))
        ));
        assert!(matches!(
            package.resolve_name(999),
            Err(PackageError::NameIndex(999))
        ));
    }

    #[test]
    fn test_load_object_checks_kind() {
        let package = DumpPackage::from(sample_dump());

        let tex = package.load_object(0, Some(ObjectKind::Texture)).unwrap();
        assert_eq!(tex.name, "Tex1");
        assert_eq!(tex.class_name, "Texture");
        assert_eq!(tex.package, "Sample");

        let err = package.load_object(0, Some(ObjectKind::Sound)).unwrap_err();
        assert!(matches!(err, PackageError::UnexpectedKind { .. }));

        let group = package.load_object(2, None).unwrap();
        assert_eq!(group.kind(), ObjectKind::Other);

        assert!(matches!(
            package.load_object(9, None),
            Err(PackageError::ExportIndex(9))
        ));
    }

    #[test]
    fn test_find_export() {
        let package = DumpPackage::from(sample_dump());
        assert_eq!(package.find_export("beep"), Some(1));
        assert_eq!(package.find_export("Missing"), None);
    }

    #[test]
    fn test_loader_search_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let system = temp_dir.path().join("System");
        let sounds = temp_dir.path().join("Sounds");
        fs::create_dir_all(&system).unwrap();
        fs::create_dir_all(&sounds).unwrap();
        sample_dump().write(&sounds.join("Sample.json")).unwrap();

        let loader = DumpLoader::new(vec![system, sounds.clone()]);
        assert_eq!(loader.locate("Sample").unwrap(), sounds.join("Sample.json"));

        let package = loader.open("Sample").unwrap();
        assert_eq!(package.exports().len(), 3);
    }

    #[test]
    fn test_loader_direct_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("Direct.json");
        sample_dump().write(&path).unwrap();

        let loader = DumpLoader::default();
        let package = loader.open(path.to_str().unwrap()).unwrap();
        assert_eq!(package.name(), "Sample");
    }

    #[test]
    fn test_loader_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let loader = DumpLoader::new(vec![temp_dir.path().to_path_buf()]);
        match loader.open("Nowhere") {
            Err(PackageError::NotFound { name, searched }) => {
                assert_eq!(name, "Nowhere");
                assert_eq!(searched, vec![temp_dir.path().join("Nowhere.json")]);
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("expected NotFound"),
        }
    }

    #[test]
    fn test_parse_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("Broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            DumpPackage::open(&path),
            Err(PackageError::Parse { .. })
        ));
    }

    #[test]
    fn test_dump_roundtrip_keeps_payload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("Sample.json");
        let dump = sample_dump();
        dump.write(&path).unwrap();
        assert_eq!(PackageDump::read(&path).unwrap(), dump);
    }
}
